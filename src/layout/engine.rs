//! Layout engine configuration and grid computation.

use crate::schema::{Relationship, Table};
use crate::visibility::ColumnView;

use super::analysis::order_by_in_degree;
use super::placement::place_tables;
use super::types::GridLayout;

/// Box geometry and routing constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    pub table_width: f64,
    pub header_height: f64,
    pub row_height: f64,
    /// Height of the "+N more" / "Hide" toggle row.
    pub button_height: f64,
    pub padding: f64,
    pub margin: f64,
    pub column_gap: f64,
    pub row_gap: f64,
    /// Lateral spacing between parallel edges in one corridor.
    pub stagger_step: f64,
    /// Distance of the detour column from the outer box edge.
    pub route_clearance: f64,
    /// Shortest horizontal stub leaving or entering a box.
    pub min_stub: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            table_width: 220.0,
            header_height: 32.0,
            row_height: 24.0,
            button_height: 24.0,
            padding: 8.0,
            margin: 20.0,
            column_gap: 80.0,
            row_gap: 40.0,
            stagger_step: 8.0,
            route_clearance: 40.0,
            min_stub: 12.0,
        }
    }
}

/// Rows a table box needs: displayed columns plus an optional toggle row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRows {
    pub columns: usize,
    pub toggle: bool,
}

impl From<&ColumnView<'_>> for BoxRows {
    fn from(view: &ColumnView<'_>) -> Self {
        Self {
            columns: view.displayed.len(),
            toggle: view.collapsible,
        }
    }
}

impl LayoutEngine {
    pub fn box_height(&self, rows: BoxRows) -> f64 {
        let button = if rows.toggle { self.button_height } else { 0.0 };
        self.header_height + rows.columns as f64 * self.row_height + button + self.padding
    }

    /// Compute grid positions. Total recomputation; cheap enough to run on
    /// every expand/collapse.
    pub fn layout<F>(&self, tables: &[Table], relationships: &[Relationship], rows_of: F) -> GridLayout
    where
        F: Fn(&Table) -> BoxRows,
    {
        let ordered = order_by_in_degree(tables, relationships);
        let layout = place_tables(&ordered, |t| self.box_height(rows_of(t)), self);
        log::debug!("grid layout: {} tables in {} columns", layout.len(), layout.cols);
        layout
    }
}
