//! # Wide-Mode Sun Tracking
//!
//! In the wide viewing mode the camera cannot simply stay glued to the sun:
//! the sun climbs and descends across the playback window, and centering it
//! every frame would pin it motionless in mid-frame. Instead the view
//! center is offset from the sun by an amount that varies smoothly with
//! playback time, so the sun enters low, crosses the frame through the
//! eclipse, and exits on the far side without any jump at the slider
//! extremes.
//!
//! The offset curve is the quadratic Lagrange interpolation through three
//! anchor points: the start-of-range offset at `t = -1`, zero at the
//! eclipse instant (`t = 0`), and the end-of-range offset at `t = 1`. See
//! <https://en.wikipedia.org/wiki/Lagrange_polynomial>.

use crate::fov::{AxisRange, DisplayFov, TrackingRatios};
use crate::AltAz;

/// Interpolated tracking offset at normalized playback time `t ∈ [-1, 1]`.
///
/// `t = -1` is the start of the playback range, `0` the eclipse instant,
/// `1` the end. Returns exactly `range.start` / `0` / `range.end` at the
/// anchors.
pub fn tracking_offset(t: f64, range: &AxisRange) -> f64 {
    // Lagrange basis for the outer anchors; the middle term vanishes
    // because its y-value is 0.
    let l0 = t * (t - 1.0) / 2.0;
    let l2 = t * (t + 1.0) / 2.0;

    range.start * l0 + range.end * l2
}

/// View center for the wide mode at normalized playback time `t`.
///
/// Offsets the sun's current position by the interpolated tracking ratio
/// scaled to the display field of view, per axis.
pub fn wide_view_center(
    sun: &AltAz,
    t: f64,
    ratios: &TrackingRatios,
    fov: &DisplayFov,
) -> AltAz {
    AltAz {
        az: sun.az + tracking_offset(t, &ratios.x) * fov.x,
        alt: sun.alt + tracking_offset(t, &ratios.y) * fov.y,
    }
}
