use std::collections::HashSet;

/// Tables the user has expanded; absence means collapsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn is_expanded(&self, table: &str) -> bool {
        self.expanded.contains(table)
    }

    /// Flip a table's state; returns the new state.
    pub fn toggle(&mut self, table: &str) -> bool {
        if self.expanded.remove(table) {
            false
        } else {
            self.expanded.insert(table.to_string());
            true
        }
    }

    pub fn expand(&mut self, table: &str) {
        self.expanded.insert(table.to_string());
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.expanded.retain(|name| keep(name));
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
