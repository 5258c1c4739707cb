pub mod catalog;
pub mod diagram;
pub mod expansion;
pub mod fit;
pub mod interaction;
pub mod layout;
pub mod measure;
pub mod offsets;
pub mod payload;
pub mod schema;
pub mod svg;
pub mod transform;
pub mod visibility;

use wasm_bindgen::prelude::*;

use diagram::Diagram;
use fit::FitStep;
use interaction::{PointerButton, PointerTarget};
use payload::{ErdPayload, PayloadError};
use schema::{DiagramIdentity, SchemaModel};
use svg::SvgRenderer;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse a payload into the identity and model a diagram is loaded with.
/// Empty `catalog` or `schema` fall back to the names in the payload.
pub fn parse_payload(
    json: &str,
    catalog: &str,
    schema: &str,
) -> Result<(DiagramIdentity, SchemaModel), PayloadError> {
    let payload = ErdPayload::from_json(json)?;
    Ok((
        DiagramIdentity::named_or(catalog, schema, &payload),
        SchemaModel::from_payload(&payload),
    ))
}

/// Render an ERD payload to SVG at identity zoom. `expanded` is a
/// comma-separated list of tables to show in full.
#[wasm_bindgen(js_name = "erdToSvg")]
pub fn render_erd(payload: &str, expanded: Option<String>) -> Result<String, String> {
    let (identity, model) = parse_payload(payload, "", "").map_err(|e| e.to_string())?;
    let mut diagram = Diagram::new(identity, model);

    for name in expanded.as_deref().unwrap_or("").split(',') {
        let name = name.trim();
        if !name.is_empty() {
            diagram.expand(name);
        }
    }

    let svg = SvgRenderer::new(diagram.engine().clone()).render(&diagram.scene(), diagram.view(), None);
    Ok(svg)
}

/// Interactive diagram handle for a host page.
///
/// The host forwards DOM events and redraws with `renderSvg` whenever a
/// method reports a change.
#[wasm_bindgen]
pub struct ErdView {
    diagram: Diagram,
}

impl Default for ErdView {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ErdView {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ErdView {
        ErdView {
            diagram: Diagram::new(DiagramIdentity::default(), SchemaModel::default()),
        }
    }

    /// Load or refresh the schema `catalog.schema`. Switching to another
    /// schema resets offsets, expansion and zoom; reloading the same one
    /// keeps them. Empty names fall back to those in the payload.
    pub fn load(&mut self, payload: &str, catalog: &str, schema: &str) -> Result<(), String> {
        let (identity, model) = parse_payload(payload, catalog, schema).map_err(|e| e.to_string())?;
        self.diagram.load(identity, model);
        Ok(())
    }

    /// Returns what was hit: `"background"`, `"table"` or `"toggle"`.
    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) -> String {
        match self.diagram.pointer_down(x, y, PointerButton::from_dom(button)) {
            PointerTarget::Background => "background",
            PointerTarget::Table(_) => "table",
            PointerTarget::ExpandToggle(_) => "toggle",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.diagram.pointer_move(x, y)
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self) {
        self.diagram.pointer_up();
    }

    #[wasm_bindgen(js_name = "pointerLeave")]
    pub fn pointer_leave(&mut self) {
        self.diagram.pointer_leave();
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        self.diagram.wheel(x, y, delta_y);
    }

    /// Viewport size changed. Returns true if a pending fit ran.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.diagram.on_viewport_resize(width, height)
    }

    /// Fallback fit timer. Returns the delay in ms before the next call, or
    /// `undefined` when no further call is needed.
    #[wasm_bindgen(js_name = "fitTimer")]
    pub fn fit_timer(&mut self) -> Option<u32> {
        match self.diagram.on_fit_timer() {
            FitStep::RetryAfter(delay) => Some(delay.as_millis() as u32),
            FitStep::Done | FitStep::GaveUp => None,
        }
    }

    #[wasm_bindgen(js_name = "fitToView")]
    pub fn fit_to_view(&mut self) -> Result<(), String> {
        self.diagram.fit_to_view().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "resetZoom")]
    pub fn reset_zoom(&mut self) {
        self.diagram.reset_zoom();
    }

    #[wasm_bindgen(js_name = "zoomIn")]
    pub fn zoom_in(&mut self) {
        self.diagram.zoom_in();
    }

    #[wasm_bindgen(js_name = "zoomOut")]
    pub fn zoom_out(&mut self) {
        self.diagram.zoom_out();
    }

    #[wasm_bindgen(js_name = "resetLayout")]
    pub fn reset_layout(&mut self) {
        self.diagram.reset_layout();
    }

    /// Returns the table's new expanded state.
    #[wasm_bindgen(js_name = "toggleTable")]
    pub fn toggle_table(&mut self, name: &str) -> bool {
        self.diagram.toggle_expanded(name)
    }

    #[wasm_bindgen(js_name = "zoomPercent")]
    pub fn zoom_percent(&self) -> u32 {
        self.diagram.zoom_percent()
    }

    /// `[scale, translateX, translateY]`
    pub fn transform(&self) -> js_sys::Float64Array {
        let view = self.diagram.view();
        js_sys::Float64Array::from(&[view.scale, view.translate_x, view.translate_y][..])
    }

    #[wasm_bindgen(js_name = "renderSvg")]
    pub fn render_svg(&self) -> String {
        let renderer = SvgRenderer::new(self.diagram.engine().clone());
        renderer.render(&self.diagram.scene(), self.diagram.view(), self.diagram.viewport())
    }

    pub fn unmount(&mut self) {
        self.diagram.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "catalog_name": "main",
        "schema_name": "shop",
        "tables": [
            {"table_name": "users", "columns": [
                {"column_name": "id", "data_type": "INT", "ordinal_position": 1, "constraint_type": "PRIMARY KEY"},
                {"column_name": "name", "data_type": "STRING", "ordinal_position": 2},
                {"column_name": "email", "data_type": "STRING", "ordinal_position": 3},
                {"column_name": "created_at", "data_type": "TIMESTAMP", "ordinal_position": 4}
            ]},
            {"table_name": "orders", "columns": [
                {"column_name": "id", "data_type": "INT", "ordinal_position": 1, "constraint_type": "PRIMARY KEY"},
                {"column_name": "user_id", "data_type": "INT", "ordinal_position": 2, "constraint_type": "FOREIGN KEY",
                 "referenced_table_name": "users", "referenced_column_name": "id"}
            ]}
        ],
        "relationships": [
            {"constraint_name": "fk_orders_user", "source_table": "orders", "source_column": "user_id",
             "target_table": "users", "target_column": "id", "target_table_schema": "shop"}
        ]
    }"#;

    #[test]
    fn test_render_erd() {
        let svg = render_erd(PAYLOAD, None).unwrap();
        assert!(svg.contains("+1 more"));
        assert!(svg.contains(r#"class="edge""#));

        let svg = render_erd(PAYLOAD, Some("users, ghosts".into())).unwrap();
        assert!(svg.contains(">created_at<"));
        assert!(svg.contains(">Hide<"));
    }

    #[test]
    fn test_render_erd_rejects_bad_json() {
        let err = render_erd("{not json", None).unwrap_err();
        assert!(err.starts_with("Invalid ERD payload"));
    }

    #[test]
    fn test_view_fit_flow() {
        let mut view = ErdView::new();
        view.load(PAYLOAD, "", "").unwrap();
        assert_eq!(view.fit_timer(), Some(50));
        assert!(view.resize(800.0, 600.0));
        assert_eq!(view.fit_timer(), None);
        assert!(view.render_svg().contains(r#"width="800" height="600""#));
    }

    const USERS_ONLY: &str = r#"{
        "tables": [
            {"table_name": "users", "columns": [
                {"column_name": "id", "data_type": "INT", "ordinal_position": 1, "constraint_type": "PRIMARY KEY"},
                {"column_name": "name", "data_type": "STRING", "ordinal_position": 2},
                {"column_name": "email", "data_type": "STRING", "ordinal_position": 3},
                {"column_name": "created_at", "data_type": "TIMESTAMP", "ordinal_position": 4}
            ]}
        ],
        "relationships": []
    }"#;

    #[test]
    fn test_view_schema_switch_resets_state() {
        let mut view = ErdView::new();
        view.load(USERS_ONLY, "main", "a").unwrap();
        assert!(view.toggle_table("users"));
        view.wheel(0.0, 0.0, -1.0);
        assert_eq!(view.zoom_percent(), 110);

        // Same schema again keeps both.
        view.load(USERS_ONLY, "main", "a").unwrap();
        assert!(view.render_svg().contains(">created_at<"));
        assert_eq!(view.zoom_percent(), 110);

        view.load(USERS_ONLY, "main", "b").unwrap();
        assert!(!view.render_svg().contains(">created_at<"));
        assert_eq!(view.zoom_percent(), 100);
        assert!(view.toggle_table("users"));
    }

    #[test]
    fn test_view_payload_names_are_fallback() {
        let mut view = ErdView::new();
        view.load(PAYLOAD, "", "").unwrap();
        view.toggle_table("users");

        // Explicit names matching the payload are the same schema.
        view.load(PAYLOAD, "main", "shop").unwrap();
        assert!(view.render_svg().contains(">created_at<"));

        view.load(PAYLOAD, "main", "archive").unwrap();
        assert!(!view.render_svg().contains(">created_at<"));
    }
}
