//! Which columns a table box shows when collapsed or expanded.

use crate::schema::{Column, Table};

/// Collapsed tables show at least this many rows when the table has them.
pub const MIN_VISIBLE_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a> {
    /// Key columns first, then the rest, each group in ordinal order.
    pub displayed: Vec<&'a Column>,
    /// Columns not shown in the current state.
    pub hidden_count: usize,
    /// Whether the collapsed view hides anything, i.e. the table carries a
    /// "+N more" / "Hide" toggle in either state.
    pub collapsible: bool,
    /// Columns the collapsed view hides; the "+N more" label.
    pub collapsed_hidden: usize,
}

impl ColumnView<'_> {
    pub fn row_of(&self, column: &str) -> Option<usize> {
        self.displayed.iter().position(|c| c.name == column)
    }
}

pub fn resolve(table: &Table, expanded: bool) -> ColumnView<'_> {
    let (keys, others): (Vec<&Column>, Vec<&Column>) =
        table.columns.iter().partition(|c| c.constraint.is_key());

    let collapsed_len = if keys.len() >= MIN_VISIBLE_COLUMNS {
        keys.len()
    } else {
        keys.len() + others.len().min(MIN_VISIBLE_COLUMNS - keys.len())
    };

    let displayed_len = if expanded {
        table.columns.len()
    } else {
        collapsed_len
    };

    let mut displayed = keys;
    let fill = displayed_len - displayed.len();
    displayed.extend(others.into_iter().take(fill));

    ColumnView {
        hidden_count: table.columns.len() - displayed.len(),
        collapsible: table.columns.len() > collapsed_len,
        collapsed_hidden: table.columns.len() - collapsed_len,
        displayed,
    }
}
