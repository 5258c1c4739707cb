//! Table placement: one-pass shelf packing into a square-ish grid.

use crate::schema::Table;
use std::collections::HashMap;

use super::engine::LayoutEngine;
use super::types::{GridLayout, GridPosition};

/// Tables per row: `ceil(sqrt(n))`.
pub fn grid_columns(table_count: usize) -> usize {
    (table_count as f64).sqrt().ceil() as usize
}

/// Place ordered tables row by row. A new row starts below the tallest
/// box of the previous one.
pub fn place_tables<F>(ordered: &[&Table], height_of: F, engine: &LayoutEngine) -> GridLayout
where
    F: Fn(&Table) -> f64,
{
    if ordered.is_empty() {
        return GridLayout::default();
    }

    let cols = grid_columns(ordered.len());
    let mut positions: HashMap<String, GridPosition> = HashMap::with_capacity(ordered.len());
    let mut y = engine.margin;
    let mut row = 0;
    let mut max_height_in_row: f64 = 0.0;

    for (i, table) in ordered.iter().enumerate() {
        let col = i % cols;
        if col == 0 && i > 0 {
            y += max_height_in_row + engine.row_gap;
            max_height_in_row = 0.0;
            row += 1;
        }

        let height = height_of(table);
        positions.insert(
            table.name.clone(),
            GridPosition {
                x: engine.margin + col as f64 * (engine.table_width + engine.column_gap),
                y,
                height,
                row,
                col,
            },
        );
        max_height_in_row = max_height_in_row.max(height);
    }

    GridLayout {
        order: ordered.iter().map(|t| t.name.clone()).collect(),
        positions,
        cols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(2), 2);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(10), 4);
        assert_eq!(grid_columns(16), 4);
    }
}
