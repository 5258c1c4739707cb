//! Corridors the vertical edge segment may occupy.

/// The open horizontal span between two facing box edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corridor {
    pub left: f64,
    pub right: f64,
}

impl Corridor {
    pub fn between(a: f64, b: f64) -> Self {
        Self {
            left: a.min(b),
            right: a.max(b),
        }
    }

    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Staggered elbow X, kept at least `min_stub` inside both walls.
    /// Corridors too narrow for that collapse to their centre.
    pub fn elbow_x(&self, stagger: f64, min_stub: f64) -> f64 {
        let lo = self.left + min_stub;
        let hi = self.right - min_stub;
        if lo >= hi {
            return self.center();
        }
        (self.center() + stagger).clamp(lo, hi)
    }
}

/// Elbow X for a detour around the right of both boxes; never closer than
/// `min_stub` to the outer edge.
pub fn detour_x(outer_right: f64, clearance: f64, stagger: f64, min_stub: f64) -> f64 {
    (outer_right + clearance + stagger).max(outer_right + min_stub)
}
