//! Numeric helpers for color matching and transform clamping.

/// Returns true when `a` and `b` differ by at most `tolerance`.
#[inline]
pub(crate) fn channel_close(a: u8, b: u8, tolerance: u8) -> bool {
    a.abs_diff(b) <= tolerance
}

/// Clamps `value` into `[lo, hi]`, collapsing to the midpoint when the range is inverted.
pub(crate) fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return (lo + hi) * 0.5;
    }
    value.clamp(lo, hi)
}

/// Returns `width / height` as a float, or 0 for a degenerate height.
pub(crate) fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        return 0.0;
    }
    width as f32 / height as f32
}
