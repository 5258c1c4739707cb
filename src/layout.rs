//! Grid layout and edge routing for ER diagrams.
//!
//! All geometry here is in world space (before pan/zoom). Every function is
//! a pure function of its inputs and is recomputed in full on each change.

mod analysis;
mod anchors;
mod corridor;
mod engine;
mod lanes;
mod placement;
mod routing;
mod types;
mod waypoints;

pub use analysis::{count_in_degree, order_by_in_degree};
pub use anchors::endpoint_y;
pub use engine::{BoxRows, LayoutEngine};
pub use lanes::stagger_offset;
pub use placement::grid_columns;
pub use routing::{classify, route_between};
pub use types::{Bounds, GridLayout, GridPosition, RouteKind, RoutedEdge, TableBox};
pub use waypoints::{route_edge, route_edges, Endpoint};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::{rel, table};
    use crate::schema::ConstraintKind::{ForeignKey, PrimaryKey};
    use crate::schema::Table;
    use crate::visibility::{resolve, ColumnView};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn collapsed_rows(t: &Table) -> BoxRows {
        BoxRows::from(&resolve(t, false))
    }

    fn boxes_of(layout: &GridLayout, engine: &LayoutEngine) -> HashMap<String, TableBox> {
        layout
            .positions
            .iter()
            .map(|(name, p)| {
                (
                    name.clone(),
                    TableBox { x: p.x, y: p.y, width: engine.table_width, height: p.height },
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_schema() {
        let engine = LayoutEngine::default();
        let layout = engine.layout(&[], &[], collapsed_rows);
        assert!(layout.is_empty());
        assert!(route_edges(&[], &HashMap::new(), &engine).is_empty());
    }

    #[test]
    fn test_two_table_scenario() {
        let engine = LayoutEngine::default();
        let a = table("A", &[("id", PrimaryKey)], 0);
        let b = table("B", &[("id", PrimaryKey), ("a_id", ForeignKey)], 2);
        let tables = vec![b, a];
        let rels = vec![rel("B", "a_id", "A", "id")];

        let layout = engine.layout(&tables, &rels, collapsed_rows);
        assert_eq!(layout.cols, 2);
        assert_eq!(layout.order, vec!["A", "B"]);
        let pa = layout.get("A").unwrap();
        let pb = layout.get("B").unwrap();
        assert_eq!((pa.row, pa.col, pa.x, pa.y), (0, 0, 20.0, 20.0));
        assert_eq!((pb.row, pb.col, pb.x, pb.y), (0, 1, 320.0, 20.0));

        let view_b = resolve(&tables[0], false);
        let names: Vec<&str> = view_b.displayed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "a_id", "c0"]);
        assert_eq!(view_b.hidden_count, 1);

        let view_a = resolve(&tables[1], false);
        let boxes = boxes_of(&layout, &engine);
        let mut endpoints: HashMap<&str, Endpoint> = HashMap::new();
        endpoints.insert("A", Endpoint { table_box: boxes["A"], view: &view_a });
        endpoints.insert("B", Endpoint { table_box: boxes["B"], view: &view_b });

        let edges = route_edges(&rels, &endpoints, &engine);
        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.kind, RouteKind::Leftward);
        let elbow = edge.elbow_x();
        assert!(elbow > boxes["A"].right() && elbow < boxes["B"].left());
        // Source anchor is B.a_id (row 1), target anchor A.id (row 0).
        assert_eq!(edge.waypoints[0], (320.0, 20.0 + 32.0 + 24.0 + 12.0));
        assert_eq!(edge.waypoints[3], (240.0, 20.0 + 32.0 + 12.0));
        assert_eq!(edge.origin, edge.waypoints[0]);
    }

    #[test]
    fn test_ten_tables_row_transitions() {
        let engine = LayoutEngine::default();
        let tables: Vec<Table> = (0..10).map(|i| table(&format!("t{}", i), &[], i % 5)).collect();
        let layout = engine.layout(&tables, &[], collapsed_rows);

        assert_eq!(layout.cols, 4);
        let rows: Vec<usize> = layout.order.iter().map(|n| layout.get(n).unwrap().row).collect();
        assert_eq!(rows, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);

        let row_height = |row: usize| {
            layout
                .positions
                .values()
                .filter(|p| p.row == row)
                .map(|p| p.height)
                .fold(0.0, f64::max)
        };
        assert_eq!(row_height(0), 112.0);
        assert_eq!(row_height(1), 136.0);

        assert_eq!(layout.get("t0").unwrap().y, 20.0);
        assert_eq!(layout.get("t4").unwrap().y, 20.0 + 112.0 + 40.0);
        assert_eq!(layout.get("t8").unwrap().y, 172.0 + 136.0 + 40.0);
        assert_eq!(layout.get("t3").unwrap().x, 20.0 + 3.0 * 300.0);
    }

    #[test]
    fn test_expansion_shifts_later_rows() {
        let engine = LayoutEngine::default();
        let tables: Vec<Table> = (0..4).map(|i| table(&format!("t{}", i), &[("id", PrimaryKey)], 6)).collect();
        let collapsed = engine.layout(&tables, &[], collapsed_rows);
        let expanded = engine.layout(&tables, &[], |t| {
            BoxRows::from(&resolve(t, t.name == "t0"))
        });

        assert_eq!(collapsed.get("t1").unwrap().y, expanded.get("t1").unwrap().y);
        assert!(expanded.get("t2").unwrap().y > collapsed.get("t2").unwrap().y);
        // 7 rows + toggle row.
        assert_eq!(expanded.get("t0").unwrap().height, 32.0 + 7.0 * 24.0 + 24.0 + 8.0);
    }

    #[test]
    fn test_rightward_edge_never_crosses_source() {
        let engine = LayoutEngine::default();
        let a = table("A", &[("id", PrimaryKey), ("b_id", ForeignKey)], 1);
        let b = table("B", &[("id", PrimaryKey)], 1);
        let va = resolve(&a, false);
        let vb = resolve(&b, false);
        let from = Endpoint { table_box: TableBox { x: 0.0, y: 0.0, width: 220.0, height: 100.0 }, view: &va };
        let to = Endpoint { table_box: TableBox { x: 400.0, y: 300.0, width: 220.0, height: 100.0 }, view: &vb };

        for (index, total) in [(0, 1), (0, 40), (39, 40)] {
            let edge = route_edge(0, &rel("A", "b_id", "B", "id"), &from, &to, index, total, &engine);
            let p = &edge.waypoints;
            assert!(p[1].0 > p[0].0, "first segment points right");
            assert!(p[3].0 > p[2].0, "last segment points right into target");
            assert!(p[0].0 >= from.table_box.right());
        }
    }

    #[test]
    fn test_self_reference_detours() {
        let engine = LayoutEngine::default();
        let t = table("emp", &[("id", PrimaryKey), ("manager_id", ForeignKey)], 0);
        let view: ColumnView = resolve(&t, false);
        let mut endpoints: HashMap<&str, Endpoint> = HashMap::new();
        endpoints.insert("emp", Endpoint { table_box: TableBox { x: 20.0, y: 20.0, width: 220.0, height: 88.0 }, view: &view });

        let edges = route_edges(&[rel("emp", "manager_id", "emp", "id")], &endpoints, &engine);
        assert_eq!(edges[0].kind, RouteKind::AroundRight);
        assert!(edges[0].elbow_x() > 240.0);
    }

    #[test]
    fn test_stagger_spreads_parallel_edges() {
        let engine = LayoutEngine::default();
        let a = table("A", &[("id", PrimaryKey), ("x", ForeignKey), ("y", ForeignKey)], 0);
        let b = table("B", &[("id", PrimaryKey)], 0);
        let va = resolve(&a, false);
        let vb = resolve(&b, false);
        let mut endpoints: HashMap<&str, Endpoint> = HashMap::new();
        endpoints.insert("A", Endpoint { table_box: TableBox { x: 20.0, y: 20.0, width: 220.0, height: 112.0 }, view: &va });
        endpoints.insert("B", Endpoint { table_box: TableBox { x: 320.0, y: 20.0, width: 220.0, height: 64.0 }, view: &vb });

        let rels = vec![
            rel("A", "x", "B", "id"),
            rel("A", "y", "Missing", "id"),
            rel("A", "y", "B", "id"),
        ];
        let edges = route_edges(&rels, &endpoints, &engine);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].relationship_index, 0);
        assert_eq!(edges[1].relationship_index, 2);
        assert_eq!(edges[0].elbow_x(), 276.0);
        assert_eq!(edges[1].elbow_x(), 284.0);
    }

    #[test]
    fn test_content_bounds() {
        let boxes = [
            TableBox { x: 20.0, y: 20.0, width: 220.0, height: 40.0 },
            TableBox { x: 320.0, y: 100.0, width: 220.0, height: 60.0 },
        ];
        let b = Bounds::of(boxes.iter()).unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (20.0, 20.0, 540.0, 160.0));
        assert_eq!(b.padded(20.0).width(), 560.0);
        assert!(Bounds::of(std::iter::empty()).is_none());
    }

    proptest! {
        #[test]
        fn prop_layout_is_deterministic(
            plain in proptest::collection::vec(0usize..7, 0..20),
            links in proptest::collection::vec((0usize..20, 0usize..20), 0..15),
        ) {
            let tables: Vec<Table> = plain
                .iter()
                .enumerate()
                .map(|(i, &p)| table(&format!("t{}", i), &[("id", PrimaryKey)], p))
                .collect();
            let n = tables.len().max(1);
            let rels: Vec<_> = links
                .iter()
                .map(|&(s, t)| rel(&format!("t{}", s % n), "id", &format!("t{}", t % n), "id"))
                .collect();
            let engine = LayoutEngine::default();

            let first = engine.layout(&tables, &rels, collapsed_rows);
            let second = engine.layout(&tables, &rels, collapsed_rows);
            prop_assert_eq!(first, second);
        }
    }
}
