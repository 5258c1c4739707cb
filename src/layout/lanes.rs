//! Lane (stagger) offsets spreading parallel edges.

/// Centred lateral offset for edge `index` of `total` routed in one pass.
#[inline]
pub fn stagger_offset(index: usize, total: usize, step: f64) -> f64 {
    if total <= 1 {
        0.0
    } else {
        (index as f64 - (total - 1) as f64 / 2.0) * step
    }
}
