//! Vertical anchor points where edges meet a table box.

use crate::visibility::ColumnView;

use super::engine::LayoutEngine;
use super::types::TableBox;

/// Y of the edge endpoint for `column` on `table`: the centre of its row if
/// displayed, otherwise the header midpoint (column hidden behind the toggle).
pub fn endpoint_y(table: &TableBox, view: &ColumnView<'_>, column: &str, engine: &LayoutEngine) -> f64 {
    match view.row_of(column) {
        Some(row) => {
            table.top() + engine.header_height + row as f64 * engine.row_height + engine.row_height / 2.0
        }
        None => table.top() + engine.header_height / 2.0,
    }
}
