use crate::diagram::{Scene, SceneTable};
use crate::layout::{LayoutEngine, RoutedEdge};
use crate::measure::TextMetrics;
use crate::schema::ConstraintKind;
use crate::transform::ViewTransform;
use std::fmt::{self, Write};

/// Extra canvas around content when no viewport size is given.
const CANVAS_MARGIN: f64 = 40.0;

pub struct SvgRenderer {
    metrics: TextMetrics,
    engine: LayoutEngine,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(LayoutEngine::default())
    }
}

impl SvgRenderer {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            metrics: TextMetrics::default(),
            engine,
        }
    }

    /// Render a scene. With `viewport` the canvas has that size and the view
    /// transform maps content into it; otherwise the canvas is sized to the
    /// transformed content.
    pub fn render(&self, scene: &Scene<'_>, view: &ViewTransform, viewport: Option<(f64, f64)>) -> String {
        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_document(&mut svg, scene, view, viewport);
        svg
    }

    fn write_document(
        &self,
        svg: &mut String,
        scene: &Scene<'_>,
        view: &ViewTransform,
        viewport: Option<(f64, f64)>,
    ) -> fmt::Result {
        let (width, height) = viewport.unwrap_or_else(|| match scene.bounds {
            Some(b) => {
                let (x, y) = view.to_screen((b.max_x, b.max_y));
                (x + CANVAS_MARGIN, y + CANVAS_MARGIN)
            }
            None => (400.0, 300.0),
        });

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        )?;

        writeln!(
            svg,
            r#"<style>
  .table-bg {{ fill: #fff; stroke: #d4d4d8; stroke-width: 1; }}
  .table-header {{ fill: #2563eb; }}
  .table-name {{ font-family: sans-serif; font-size: 12px; font-weight: 600; fill: #fff; }}
  .column-name {{ font-family: sans-serif; font-size: 11px; fill: #18181b; }}
  .column-type {{ font-family: sans-serif; font-size: 10px; fill: #71717a; }}
  .row-sep {{ stroke: #d4d4d8; stroke-width: 0.5; }}
  .toggle {{ font-family: sans-serif; font-size: 10px; fill: #71717a; cursor: pointer; }}
  .toggle-icon {{ fill: none; stroke: #71717a; stroke-width: 2; stroke-linecap: round; }}
  .edge {{ fill: none; stroke: #2563eb; stroke-width: 2; opacity: 0.6; }}
  .edge-origin {{ fill: #2563eb; opacity: 0.8; }}
</style>"#
        )?;

        writeln!(
            svg,
            r##"<defs><marker id="arrowhead" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto"><polygon points="0 0, 10 3.5, 0 7" fill="#2563eb" opacity="0.6" /></marker></defs>"##
        )?;

        writeln!(svg, r#"<g class="viewport" transform="{}">"#, view.affine().to_svg())?;

        // Edges behind tables
        for edge in &scene.edges {
            self.render_edge(svg, edge)?;
        }

        for table in &scene.tables {
            self.render_table(svg, table)?;
        }

        writeln!(svg, "</g>")?;
        writeln!(svg, "</svg>")
    }

    fn render_edge(&self, svg: &mut String, edge: &RoutedEdge) -> fmt::Result {
        let points: Vec<String> = edge
            .waypoints
            .iter()
            .map(|(x, y)| format!("{},{}", x, y))
            .collect();
        writeln!(
            svg,
            r#"<polyline class="edge" data-from="{}" data-to="{}" points="{}" marker-end="url(#arrowhead)" />"#,
            escape_xml(&edge.from),
            escape_xml(&edge.to),
            points.join(" ")
        )?;
        writeln!(
            svg,
            r#"<circle class="edge-origin" cx="{}" cy="{}" r="3" />"#,
            edge.origin.0, edge.origin.1
        )
    }

    fn render_table(&self, svg: &mut String, t: &SceneTable<'_>) -> fmt::Result {
        let e = &self.engine;
        let w = e.table_width;
        let h = t.table_box.height;

        writeln!(
            svg,
            r#"<g class="table" data-table="{}" transform="{}">"#,
            escape_xml(&t.table.name),
            t.local_transform().to_svg()
        )?;

        // Card and header with square bottom corners
        writeln!(svg, r#"<rect class="table-bg" width="{}" height="{}" rx="6" />"#, w, h)?;
        writeln!(
            svg,
            r#"<rect class="table-header" width="{}" height="{}" rx="6" />"#,
            w, e.header_height
        )?;
        writeln!(
            svg,
            r#"<rect class="table-header" y="{}" width="{}" height="6" />"#,
            e.header_height - 6.0,
            w
        )?;
        writeln!(
            svg,
            r#"<text class="table-name" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            w / 2.0,
            e.header_height / 2.0 + 1.0,
            escape_xml(&self.metrics.fit(&t.table.name, w - 16.0))
        )?;

        for (row, col) in t.view.displayed.iter().enumerate() {
            let y = e.header_height + row as f64 * e.row_height;
            let text_y = y + e.row_height / 2.0 + 1.0;

            if row > 0 {
                writeln!(
                    svg,
                    r#"<line class="row-sep" x1="8" y1="{}" x2="{}" y2="{}" />"#,
                    y,
                    w - 8.0,
                    y
                )?;
            }

            let name_x = match col.constraint {
                ConstraintKind::None => 8.0,
                kind => {
                    self.render_key_glyph(svg, kind, y)?;
                    24.0
                }
            };

            let type_width = self.metrics.text_width(&col.data_type).min(w / 2.0);
            let data_type = self.metrics.fit(&col.data_type, w / 2.0);
            let name = self.metrics.fit(&col.name, w - name_x - type_width - 16.0);
            writeln!(
                svg,
                r#"<text class="column-name" x="{}" y="{}" dominant-baseline="middle">{}</text>"#,
                name_x,
                text_y,
                escape_xml(&name)
            )?;
            writeln!(
                svg,
                r#"<text class="column-type" x="{}" y="{}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                w - 8.0,
                text_y,
                escape_xml(&data_type)
            )?;
        }

        if t.view.collapsible {
            self.render_toggle(svg, t)?;
        }

        writeln!(svg, "</g>")
    }

    fn render_key_glyph(&self, svg: &mut String, kind: ConstraintKind, row_y: f64) -> fmt::Result {
        let color = match kind {
            ConstraintKind::PrimaryKey => "#f59e0b",
            _ => "#3b82f6",
        };
        writeln!(
            svg,
            r#"<g class="key" transform="translate(8, {})"><circle cx="4" cy="8" r="3" fill="none" stroke="{c}" stroke-width="1.5" /><path d="M 7 5 L 11 1 M 9 3 L 11 5 L 12 4 L 10 2" fill="none" stroke="{c}" stroke-width="1.5" stroke-linecap="round" /></g>"#,
            row_y + 4.0,
            c = color
        )
    }

    fn render_toggle(&self, svg: &mut String, t: &SceneTable<'_>) -> fmt::Result {
        let e = &self.engine;
        let w = e.table_width;
        let y = e.header_height + t.view.displayed.len() as f64 * e.row_height;

        writeln!(
            svg,
            r#"<g class="toggle" data-toggle="{}" transform="translate(0, {})">"#,
            escape_xml(&t.table.name),
            y
        )?;
        writeln!(svg, r#"<line class="row-sep" x1="8" y1="0" x2="{}" y2="0" />"#, w - 8.0)?;
        writeln!(
            svg,
            r#"<rect width="{}" height="{}" fill="transparent" />"#,
            w, e.button_height
        )?;
        let icon = if t.expanded {
            "M 0 6 L 12 6"
        } else {
            "M 6 0 L 6 12 M 0 6 L 12 6"
        };
        writeln!(
            svg,
            r#"<path class="toggle-icon" transform="translate({}, 6)" d="{}" />"#,
            w / 2.0 - 20.0,
            icon
        )?;
        let label = if t.expanded {
            "Hide".to_string()
        } else {
            format!("+{} more", t.view.collapsed_hidden)
        };
        writeln!(
            svg,
            r#"<text class="toggle" x="{}" y="{}" dominant-baseline="middle">{}</text>"#,
            w / 2.0,
            e.button_height / 2.0 + 1.0,
            label
        )?;
        writeln!(svg, "</g>")
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
