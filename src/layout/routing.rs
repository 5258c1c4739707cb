//! Three-segment orthogonal path construction.

use super::corridor::{detour_x, Corridor};
use super::engine::LayoutEngine;
use super::types::{RouteKind, TableBox};

/// Classify the horizontal relation between source and target boxes.
pub fn classify(from: &TableBox, to: &TableBox) -> RouteKind {
    if from.right() < to.left() {
        RouteKind::Rightward
    } else if from.left() > to.right() {
        RouteKind::Leftward
    } else {
        RouteKind::AroundRight
    }
}

/// Horizontal, vertical, horizontal path between two anchor rows.
#[inline]
fn three_segments(start_x: f64, from_y: f64, elbow_x: f64, end_x: f64, to_y: f64) -> Vec<(f64, f64)> {
    vec![
        (start_x, from_y),
        (elbow_x, from_y),
        (elbow_x, to_y),
        (end_x, to_y),
    ]
}

/// Route between two boxes. `from_y`/`to_y` are the anchor rows.
pub fn route_between(
    from: &TableBox,
    to: &TableBox,
    from_y: f64,
    to_y: f64,
    stagger: f64,
    engine: &LayoutEngine,
) -> (RouteKind, Vec<(f64, f64)>) {
    let kind = classify(from, to);
    let waypoints = match kind {
        RouteKind::Rightward => {
            let (start_x, end_x) = (from.right(), to.left());
            let elbow = Corridor::between(start_x, end_x).elbow_x(stagger, engine.min_stub);
            three_segments(start_x, from_y, elbow, end_x, to_y)
        }
        RouteKind::Leftward => {
            let (start_x, end_x) = (from.left(), to.right());
            let elbow = Corridor::between(start_x, end_x).elbow_x(stagger, engine.min_stub);
            three_segments(start_x, from_y, elbow, end_x, to_y)
        }
        RouteKind::AroundRight => {
            let outer = from.right().max(to.right());
            let elbow = detour_x(outer, engine.route_clearance, stagger, engine.min_stub);
            three_segments(from.right(), from_y, elbow, to.right(), to_y)
        }
    };
    (kind, waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f64, y: f64) -> TableBox {
        TableBox { x, y, width: 220.0, height: 100.0 }
    }

    #[test]
    fn test_rightward_route() {
        let engine = LayoutEngine::default();
        let (kind, path) = route_between(&boxed(20.0, 20.0), &boxed(320.0, 20.0), 50.0, 80.0, 0.0, &engine);

        assert_eq!(kind, RouteKind::Rightward);
        assert_eq!(path, vec![(240.0, 50.0), (280.0, 50.0), (280.0, 80.0), (320.0, 80.0)]);
    }

    #[test]
    fn test_leftward_route() {
        let engine = LayoutEngine::default();
        let (kind, path) = route_between(&boxed(320.0, 20.0), &boxed(20.0, 20.0), 50.0, 80.0, 0.0, &engine);

        assert_eq!(kind, RouteKind::Leftward);
        assert_eq!(path[0], (320.0, 50.0));
        assert_eq!(path[1].0, 280.0);
        assert_eq!(path[3], (240.0, 80.0));
    }

    #[test]
    fn test_stacked_boxes_detour_right() {
        let engine = LayoutEngine::default();
        let (kind, path) = route_between(&boxed(20.0, 200.0), &boxed(60.0, 20.0), 230.0, 50.0, 0.0, &engine);

        assert_eq!(kind, RouteKind::AroundRight);
        // Outer right edge is 280; detour sits `route_clearance` beyond it.
        assert_eq!(path, vec![(240.0, 230.0), (320.0, 230.0), (320.0, 50.0), (280.0, 50.0)]);
    }

    #[test]
    fn test_touching_boxes_count_as_overlap() {
        assert_eq!(classify(&boxed(0.0, 0.0), &boxed(220.0, 0.0)), RouteKind::AroundRight);
    }
}
