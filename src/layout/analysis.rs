//! Relationship analysis for table ordering.

use crate::schema::{Relationship, Table};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Count incoming foreign-key references per table.
pub fn count_in_degree(relationships: &[Relationship]) -> HashMap<&str, usize> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    for rel in relationships {
        *in_degree.entry(rel.target_table.as_str()).or_insert(0) += 1;
    }
    in_degree
}

/// Stable-sort tables by descending in-degree; ties keep input order.
/// Heavily referenced tables land first, toward the top-left.
pub fn order_by_in_degree<'a>(tables: &'a [Table], relationships: &[Relationship]) -> Vec<&'a Table> {
    let in_degree = count_in_degree(relationships);
    let mut ordered: Vec<&Table> = tables.iter().collect();
    ordered.sort_by_key(|t| Reverse(in_degree.get(t.name.as_str()).copied().unwrap_or(0)));
    ordered
}
