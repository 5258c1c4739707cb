//! Data structures for layout computation.

use std::collections::HashMap;

/// Deterministic auto-layout slot for one table, ignoring user dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub row: usize,
    pub col: usize,
}

/// Result of the grid layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    /// Table names in placement order (descending in-degree).
    pub order: Vec<String>,
    pub positions: HashMap<String, GridPosition>,
    /// Tables per row.
    pub cols: usize,
}

impl GridLayout {
    pub fn get(&self, name: &str) -> Option<&GridPosition> {
        self.positions.get(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A table's box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TableBox {
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

/// Axis-aligned bounding box of rendered content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of<'a>(boxes: impl IntoIterator<Item = &'a TableBox>) -> Option<Self> {
        boxes.into_iter().fold(None, |acc, b| {
            Some(match acc {
                None => Bounds {
                    min_x: b.left(),
                    min_y: b.top(),
                    max_x: b.right(),
                    max_y: b.bottom(),
                },
                Some(acc) => Bounds {
                    min_x: acc.min_x.min(b.left()),
                    min_y: acc.min_y.min(b.top()),
                    max_x: acc.max_x.max(b.right()),
                    max_y: acc.max_y.max(b.bottom()),
                },
            })
        })
    }

    pub fn padded(self, pad: f64) -> Self {
        Bounds {
            min_x: self.min_x - pad,
            min_y: self.min_y - pad,
            max_x: self.max_x + pad,
            max_y: self.max_y + pad,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Which side-pairing an edge was routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Source entirely left of target: right edge to left edge.
    Rightward,
    /// Source entirely right of target: left edge to right edge.
    Leftward,
    /// Horizontally overlapping boxes: detour around the right side.
    AroundRight,
}

/// A routed relationship edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    /// Index into `SchemaModel::relationships`.
    pub relationship_index: usize,
    pub from: String,
    pub to: String,
    pub kind: RouteKind,
    /// Orthogonal polyline: start, two elbows, end.
    pub waypoints: Vec<(f64, f64)>,
    /// Where the origin marker is drawn.
    pub origin: (f64, f64),
}

impl RoutedEdge {
    pub fn elbow_x(&self) -> f64 {
        self.waypoints[1].0
    }
}
