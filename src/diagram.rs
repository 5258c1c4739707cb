//! One open ER diagram: immutable schema plus the interactive stores.

use crate::expansion::ExpansionState;
use crate::fit::{FitScheduler, FitStep};
use crate::interaction::{InteractionController, InteractionState, PointerButton, PointerTarget};
use crate::layout::{
    route_edges, Bounds, BoxRows, Endpoint, GridLayout, GridPosition, LayoutEngine, RoutedEdge,
    TableBox,
};
use crate::offsets::{DragOffset, DragOffsetStore};
use crate::schema::{DiagramIdentity, SchemaModel, Table};
use crate::transform::{Affine, TransformError, ViewConfig, ViewTransform};
use crate::visibility::{resolve, ColumnView};
use std::collections::HashMap;

/// A table as it is drawn this frame.
#[derive(Debug, Clone)]
pub struct SceneTable<'a> {
    pub table: &'a Table,
    pub grid: GridPosition,
    pub table_box: TableBox,
    pub view: ColumnView<'a>,
    pub expanded: bool,
}

impl SceneTable<'_> {
    /// Grid slot, then user offset. The view transform is applied on top.
    pub fn local_transform(&self) -> Affine {
        Affine::chain(&[
            Affine::translate(self.grid.x, self.grid.y),
            Affine::translate(self.table_box.x - self.grid.x, self.table_box.y - self.grid.y),
        ])
    }
}

/// All derived geometry for one render, in world space.
#[derive(Debug, Clone, Default)]
pub struct Scene<'a> {
    /// Input order; later tables draw on top.
    pub tables: Vec<SceneTable<'a>>,
    pub edges: Vec<RoutedEdge>,
    pub bounds: Option<Bounds>,
}

pub struct Diagram {
    identity: DiagramIdentity,
    model: SchemaModel,
    engine: LayoutEngine,
    expansion: ExpansionState,
    offsets: DragOffsetStore,
    view: ViewTransform,
    controller: InteractionController,
    fit: FitScheduler,
    viewport: Option<(f64, f64)>,
}

impl Diagram {
    pub fn new(identity: DiagramIdentity, model: SchemaModel) -> Self {
        Self::with_config(identity, model, LayoutEngine::default(), ViewConfig::default())
    }

    pub fn with_config(
        identity: DiagramIdentity,
        model: SchemaModel,
        engine: LayoutEngine,
        view_config: ViewConfig,
    ) -> Self {
        Self {
            identity,
            model,
            engine,
            expansion: ExpansionState::default(),
            offsets: DragOffsetStore::default(),
            view: ViewTransform::new(view_config),
            controller: InteractionController::default(),
            fit: FitScheduler::armed(),
            viewport: None,
        }
    }

    /// Replace the schema. A different identity resets every piece of
    /// interactive state; the same identity keeps it for surviving tables.
    pub fn load(&mut self, identity: DiagramIdentity, model: SchemaModel) {
        if identity != self.identity {
            log::debug!(
                "switching diagram {}.{} -> {}.{}",
                self.identity.catalog,
                self.identity.schema,
                identity.catalog,
                identity.schema
            );
            self.controller.cancel();
            self.expansion.clear();
            self.offsets.reset_all();
            self.view.reset();
            self.fit.rearm();
            self.identity = identity;
        } else {
            let stale_drag = matches!(
                self.controller.state(),
                InteractionState::DraggingTable(session) if !model.contains(&session.table)
            );
            if stale_drag {
                self.controller.cancel();
            }
            self.expansion.retain(|name| model.contains(name));
            self.offsets.retain(|name| model.contains(name));
        }
        self.model = model;
    }

    pub fn identity(&self) -> &DiagramIdentity {
        &self.identity
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn offsets(&self) -> &DragOffsetStore {
        &self.offsets
    }

    pub fn interaction(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn viewport(&self) -> Option<(f64, f64)> {
        self.viewport
    }

    // Expansion

    pub fn is_expanded(&self, table: &str) -> bool {
        self.expansion.is_expanded(table)
    }

    /// Toggle a table's columns. Unknown tables are ignored.
    pub fn toggle_expanded(&mut self, table: &str) -> bool {
        if !self.model.contains(table) {
            return false;
        }
        self.expansion.toggle(table)
    }

    pub fn expand(&mut self, table: &str) {
        if self.model.contains(table) {
            self.expansion.expand(table);
        }
    }

    pub fn expand_all(&mut self) {
        for table in &self.model.tables {
            self.expansion.expand(&table.name);
        }
    }

    // Derived geometry

    pub fn column_view(&self, table: &str) -> Option<ColumnView<'_>> {
        let table = self.model.table(table)?;
        Some(resolve(table, self.expansion.is_expanded(&table.name)))
    }

    pub fn grid_layout(&self) -> GridLayout {
        self.engine.layout(&self.model.tables, &self.model.relationships, |t| {
            BoxRows::from(&resolve(t, self.expansion.is_expanded(&t.name)))
        })
    }

    fn display_box(&self, name: &str, grid: &GridPosition) -> TableBox {
        let DragOffset { dx, dy } = self.offsets.get(name);
        TableBox {
            x: grid.x + dx,
            y: grid.y + dy,
            width: self.engine.table_width,
            height: grid.height,
        }
    }

    /// Grid position plus drag offset.
    pub fn display_position(&self, table: &str) -> Option<(f64, f64)> {
        let layout = self.grid_layout();
        let grid = layout.get(table)?;
        let b = self.display_box(table, grid);
        Some((b.x, b.y))
    }

    pub fn scene(&self) -> Scene<'_> {
        let layout = self.grid_layout();
        let tables: Vec<SceneTable> = self
            .model
            .tables
            .iter()
            .filter_map(|table| {
                let grid = *layout.get(&table.name)?;
                let expanded = self.expansion.is_expanded(&table.name);
                Some(SceneTable {
                    table,
                    grid,
                    table_box: self.display_box(&table.name, &grid),
                    view: resolve(table, expanded),
                    expanded,
                })
            })
            .collect();

        let edges = {
            let endpoints: HashMap<&str, Endpoint> = tables
                .iter()
                .map(|t| {
                    (
                        t.table.name.as_str(),
                        Endpoint {
                            table_box: t.table_box,
                            view: &t.view,
                        },
                    )
                })
                .collect();
            route_edges(&self.model.relationships, &endpoints, &self.engine)
        };
        let bounds = Bounds::of(tables.iter().map(|t| &t.table_box));

        Scene {
            tables,
            edges,
            bounds,
        }
    }

    pub fn content_bounds(&self) -> Option<Bounds> {
        let layout = self.grid_layout();
        let boxes: Vec<TableBox> = layout
            .positions
            .iter()
            .map(|(name, grid)| self.display_box(name, grid))
            .collect();
        Bounds::of(boxes.iter())
    }

    /// What sits under a screen point; the last-drawn table wins.
    pub fn hit_test(&self, screen_x: f64, screen_y: f64) -> PointerTarget {
        let (x, y) = self.view.to_world((screen_x, screen_y));
        let scene = self.scene();
        for t in scene.tables.iter().rev() {
            if !t.table_box.contains(x, y) {
                continue;
            }
            if t.view.collapsible {
                let toggle_top = t.table_box.top()
                    + self.engine.header_height
                    + t.view.displayed.len() as f64 * self.engine.row_height;
                if y >= toggle_top && y < toggle_top + self.engine.button_height {
                    return PointerTarget::ExpandToggle(t.table.name.clone());
                }
            }
            return PointerTarget::Table(t.table.name.clone());
        }
        PointerTarget::Background
    }

    // Pointer input

    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64, button: PointerButton) -> PointerTarget {
        let target = self.hit_test(screen_x, screen_y);
        self.pointer_down_on(&target, screen_x, screen_y, button);
        target
    }

    /// Dispatch a pointer-down whose target the host already resolved.
    pub fn pointer_down_on(&mut self, target: &PointerTarget, screen_x: f64, screen_y: f64, button: PointerButton) {
        let screen = (screen_x, screen_y);
        match target {
            PointerTarget::ExpandToggle(name) => {
                if button == PointerButton::Primary {
                    self.toggle_expanded(name);
                }
            }
            PointerTarget::Table(name) => {
                if button != PointerButton::Primary {
                    return;
                }
                let layout = self.grid_layout();
                if let Some(grid) = layout.get(name) {
                    let b = self.display_box(name, grid);
                    self.controller
                        .begin_drag(name, screen, (grid.x, grid.y), (b.x, b.y), &self.view);
                }
            }
            PointerTarget::Background => self.controller.begin_pan(screen, button, &self.view),
        }
    }

    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) -> bool {
        self.controller
            .pointer_move((screen_x, screen_y), &mut self.view, &mut self.offsets)
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    pub fn wheel(&mut self, screen_x: f64, screen_y: f64, delta_y: f64) {
        self.controller.wheel((screen_x, screen_y), delta_y, &mut self.view);
    }

    // Commands

    fn viewport_center(&self) -> (f64, f64) {
        self.viewport.map(|(w, h)| (w / 2.0, h / 2.0)).unwrap_or((0.0, 0.0))
    }

    pub fn zoom_in(&mut self) {
        let (x, y) = self.viewport_center();
        self.view.zoom_at(x, y, -1.0);
    }

    pub fn zoom_out(&mut self) {
        let (x, y) = self.viewport_center();
        self.view.zoom_at(x, y, 1.0);
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset();
    }

    /// Clears drag offsets only; expansion and view are untouched.
    pub fn reset_layout(&mut self) {
        self.offsets.reset_all();
    }

    pub fn zoom_percent(&self) -> u32 {
        self.view.zoom_percent()
    }

    /// Fit all tables, plus the configured margin, into the current
    /// viewport. An empty schema is a no-op.
    pub fn fit_to_view(&mut self) -> Result<(), TransformError> {
        let (width, height) = self.viewport.unwrap_or((0.0, 0.0));
        let padding = self.view.config().fit_padding;
        match self.content_bounds() {
            Some(bounds) => self.view.fit_to_content(width, height, bounds.padded(padding)),
            None => Ok(()),
        }
    }

    // Fit scheduling

    /// Resize notification from the host. Returns true if a pending fit
    /// was applied.
    pub fn on_viewport_resize(&mut self, width: f64, height: f64) -> bool {
        self.viewport = Some((width, height));
        if !(self.fit.is_pending() && self.fit.is_subscribed()) {
            return false;
        }
        match self.fit_to_view() {
            Ok(()) => {
                self.fit.complete();
                true
            }
            Err(_) => false,
        }
    }

    /// Fallback timer hook; also the first call right after mount.
    pub fn on_fit_timer(&mut self) -> FitStep {
        if !self.fit.is_pending() {
            return FitStep::Done;
        }
        match self.fit_to_view() {
            Ok(()) => {
                self.fit.complete();
                FitStep::Done
            }
            Err(e) => {
                log::debug!("fit deferred: {}", e);
                self.fit.retry()
            }
        }
    }

    pub fn fit_pending(&self) -> bool {
        self.fit.is_pending()
    }

    /// The view is going away: drop gestures and viewport subscription.
    pub fn unmount(&mut self) {
        self.controller.cancel();
        self.fit.teardown();
    }
}
