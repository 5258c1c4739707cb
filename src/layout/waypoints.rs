//! Edge routing for all relationships in one pass.

use crate::schema::Relationship;
use crate::visibility::ColumnView;
use std::collections::HashMap;

use super::anchors::endpoint_y;
use super::engine::LayoutEngine;
use super::lanes::stagger_offset;
use super::routing::route_between;
use super::types::{RoutedEdge, TableBox};

/// Endpoint geometry of one table: its display box and visible columns.
pub struct Endpoint<'v, 'a> {
    pub table_box: TableBox,
    pub view: &'v ColumnView<'a>,
}

/// Route a single relationship. `index`/`total` place it among the edges
/// routed in the same pass for staggering.
pub fn route_edge(
    relationship_index: usize,
    rel: &Relationship,
    from: &Endpoint<'_, '_>,
    to: &Endpoint<'_, '_>,
    index: usize,
    total: usize,
    engine: &LayoutEngine,
) -> RoutedEdge {
    let from_y = endpoint_y(&from.table_box, from.view, &rel.source_column, engine);
    let to_y = endpoint_y(&to.table_box, to.view, &rel.target_column, engine);
    let stagger = stagger_offset(index, total, engine.stagger_step);

    let (kind, waypoints) = route_between(&from.table_box, &to.table_box, from_y, to_y, stagger, engine);
    let origin = waypoints[0];

    RoutedEdge {
        relationship_index,
        from: rel.source_table.clone(),
        to: rel.target_table.clone(),
        kind,
        waypoints,
        origin,
    }
}

/// Route every relationship whose endpoints are both present in `endpoints`.
/// Unresolvable relationships are skipped and do not take a stagger slot.
pub fn route_edges(
    relationships: &[Relationship],
    endpoints: &HashMap<&str, Endpoint<'_, '_>>,
    engine: &LayoutEngine,
) -> Vec<RoutedEdge> {
    let resolved: Vec<(usize, &Relationship, &Endpoint, &Endpoint)> = relationships
        .iter()
        .enumerate()
        .filter_map(|(idx, rel)| {
            let from = endpoints.get(rel.source_table.as_str())?;
            let to = endpoints.get(rel.target_table.as_str())?;
            Some((idx, rel, from, to))
        })
        .collect();

    let total = resolved.len();
    resolved
        .into_iter()
        .enumerate()
        .map(|(index, (idx, rel, from, to))| route_edge(idx, rel, from, to, index, total, engine))
        .collect()
}
