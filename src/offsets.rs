//! Per-table user drag displacement from the grid slot.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragOffset {
    pub dx: f64,
    pub dy: f64,
}

impl DragOffset {
    pub const ZERO: DragOffset = DragOffset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Offsets are relative to the grid position, so a table keeps its manual
/// displacement when a relayout moves its slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragOffsetStore {
    offsets: HashMap<String, DragOffset>,
}

impl DragOffsetStore {
    pub fn get(&self, table: &str) -> DragOffset {
        self.offsets.get(table).copied().unwrap_or(DragOffset::ZERO)
    }

    pub fn set(&mut self, table: &str, offset: DragOffset) {
        self.offsets.insert(table.to_string(), offset);
    }

    pub fn reset_all(&mut self) {
        self.offsets.clear();
    }

    /// Drop offsets for tables `keep` rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.offsets.retain(|name, _| keep(name));
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
