//! # Field-of-View Planning
//!
//! Decides how much sky the viewport shows. Two separate fields of view
//! come out of a planning pass:
//!
//! - the **display** field of view, which scales every projected
//!   coordinate: derived from a desired vertical extent and the viewport's
//!   aspect ratio, clipped against a hard horizontal maximum;
//! - the **tracking reference** field of view, usually wider: sized so the
//!   sun positions at both ends of the playback range fit in frame with a
//!   margin, and used only to compute the normalized tracking offsets that
//!   drive wide-mode panning.
//!
//! The two were a single record with mode-dependent unused fields in the
//! original program; they are distinct types here.
//!
//! Axis reconciliation uses the aspect conversion in [`aspect_convert`]:
//! the fields of view of the two axes are not in pixel proportion, because
//! the projection is sine-based: equal chord rates per pixel mean
//! `sin(x/2) / sin(y/2) == width / height`.

use serde::{Deserialize, Serialize};

use crate::angles;
use crate::AltAz;

/// Fraction of the tracking field of view the sun's path is allowed to fill
/// in the horizontal axis; the remainder is margin.
pub const TARGET_FOV_FILL: f64 = 0.9;

/// Acting viewport size in pixels, or any consistent unit; only the ratio
/// matters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Width-over-height aspect ratio.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Per-mode constraints on the display field of view, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FovLimits {
    /// Vertical extent to use unless the aspect ratio forces clipping
    pub y_desired: f64,
    /// Hard ceiling on the horizontal extent
    pub x_max: f64,
}

/// The field of view actually used to project bodies onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayFov {
    pub x: f64,
    pub y: f64,
}

/// The wider reference field of view used only for tracking-offset
/// computation in wide mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingFov {
    pub x: f64,
    pub y: f64,
}

/// Signed offsets of the playback-range sun positions, in view-width units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}

/// Normalized tracking offsets for both axes, roughly in `[-0.5, 0.5]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackingRatios {
    pub x: AxisRange,
    pub y: AxisRange,
}

/// Complete output of one planning pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FovPlan {
    pub display: DisplayFov,
    pub tracking: TrackingFov,
    pub ratios: TrackingRatios,
}

/// Convert a field-of-view angle on one axis to the other axis.
///
/// `ratio` is other-axis-pixels over this-axis-pixels. Saturates at π when
/// the requested angle cannot be reached (the `asin` argument is clamped
/// to 1), so the result is always a valid angle and never NaN.
pub fn aspect_convert(angle: f64, ratio: f64) -> f64 {
    let inner = f64::min(1.0, (angle / 2.0).sin() / ratio);
    2.0 * inner.asin()
}

/// Offset of `angle` within a field of view centered at `center`, in view
/// widths: -0.5 at the left/bottom edge, 0 at center, +0.5 at the
/// right/top edge.
pub fn offset_ratio(angle: f64, center: f64, fov: f64) -> f64 {
    let diff = angles::signed_difference(angle, center);
    let sign = if diff > 0.0 { 1.0 } else { -1.0 };
    sign * diff.abs().sin() / (2.0 * (fov / 2.0).sin())
}

/// Plan display and tracking fields of view for the given viewport, mode
/// limits, eclipse position and playback-range sun positions.
pub fn plan(
    viewport: &Viewport,
    limits: &FovLimits,
    eclipse_pos: &AltAz,
    sun_begin: &AltAz,
    sun_end: &AltAz,
) -> FovPlan {
    let ratio = viewport.aspect_ratio();
    let desired_x = aspect_convert(limits.y_desired, 1.0 / ratio);

    // Aspect ratio would push the horizontal extent past the maximum:
    // clamp x and derive y from it instead of using the desired y.
    let display = if desired_x > limits.x_max {
        DisplayFov {
            x: limits.x_max,
            y: aspect_convert(limits.x_max, ratio),
        }
    } else {
        DisplayFov {
            x: desired_x,
            y: limits.y_desired,
        }
    };

    // Horizontal reference extent: fit the wider of the two half-paths,
    // with fill margin
    let d1 = angles::absolute_difference(sun_begin.az, eclipse_pos.az);
    let d2 = angles::absolute_difference(sun_end.az, eclipse_pos.az);
    let mut x_ref = 2.0 * d1.max(d2) / TARGET_FOV_FILL;

    // Vertical reference extent: just enough to keep the sun in view
    let d1 = angles::absolute_difference(sun_begin.alt, eclipse_pos.alt);
    let d2 = angles::absolute_difference(sun_end.alt, eclipse_pos.alt);
    let y_ref_needed = 2.0 * d1.max(d2);

    // If the horizontal choice would let the sun leave the frame
    // vertically, widen it until the derived vertical extent suffices
    if aspect_convert(x_ref, ratio) < y_ref_needed {
        x_ref = aspect_convert(y_ref_needed, 1.0 / ratio);
    }
    if x_ref > limits.x_max {
        x_ref = limits.x_max;
    }

    let tracking = TrackingFov {
        x: x_ref,
        y: aspect_convert(x_ref, ratio),
    };

    let ratios = TrackingRatios {
        x: AxisRange {
            start: offset_ratio(eclipse_pos.az, sun_begin.az, tracking.x),
            end: offset_ratio(eclipse_pos.az, sun_end.az, tracking.x),
        },
        y: AxisRange {
            start: offset_ratio(eclipse_pos.alt, sun_begin.alt, tracking.y),
            end: offset_ratio(eclipse_pos.alt, sun_end.alt, tracking.y),
        },
    };

    FovPlan {
        display,
        tracking,
        ratios,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const DEG: f64 = PI / 180.0;

    fn wide_limits() -> FovLimits {
        FovLimits {
            y_desired: 8.0 * DEG,
            x_max: 160.0 * DEG,
        }
    }

    #[test]
    fn aspect_convert_round_trips() {
        // aspectConvert(aspectConvert(θ, r), 1/r) == θ below saturation
        for &theta in &[2.0 * DEG, 8.0 * DEG, 40.0 * DEG, 100.0 * DEG] {
            for &ratio in &[0.5, 0.75, 1.0, 1.5, 2.0] {
                let there = aspect_convert(theta, ratio);
                if there >= PI - 1e-9 {
                    continue; // saturated, not invertible
                }
                let back = aspect_convert(there, 1.0 / ratio);
                assert!(
                    (back - theta).abs() < 1e-9,
                    "θ = {theta}, ratio = {ratio}, back = {back}"
                );
            }
        }
    }

    #[test]
    fn aspect_convert_saturates_at_pi() {
        // Requesting more sky than a half-turn clamps instead of NaN
        let out = aspect_convert(170.0 * DEG, 0.1);
        assert!((out - PI).abs() < 1e-12);
        assert!(!out.is_nan());
    }

    #[test]
    fn unit_ratio_is_identity() {
        for &theta in &[1.0 * DEG, 20.0 * DEG, 90.0 * DEG] {
            assert!((aspect_convert(theta, 1.0) - theta).abs() < 1e-12);
        }
    }

    #[test]
    fn offset_ratio_edges_and_center() {
        let fov = 40.0 * DEG;
        let center = 1.0;
        assert!(offset_ratio(center, center, fov).abs() < 1e-12);
        assert!((offset_ratio(center + fov / 2.0, center, fov) - 0.5).abs() < 1e-12);
        assert!((offset_ratio(center - fov / 2.0, center, fov) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn display_fov_uses_desired_y_for_normal_aspect() {
        let viewport = Viewport {
            width: 1200.0,
            height: 800.0,
        };
        let eclipse = AltAz::new(40.0 * DEG, 180.0 * DEG);
        let begin = AltAz::new(30.0 * DEG, 160.0 * DEG);
        let end = AltAz::new(45.0 * DEG, 200.0 * DEG);
        let plan = plan(&viewport, &wide_limits(), &eclipse, &begin, &end);

        assert!((plan.display.y - 8.0 * DEG).abs() < 1e-12);
        assert!((plan.display.x - aspect_convert(8.0 * DEG, 800.0 / 1200.0)).abs() < 1e-12);
        assert!(plan.display.x <= wide_limits().x_max);
    }

    #[test]
    fn display_fov_clamps_x_for_extreme_aspect() {
        // Very wide viewport with a large desired y forces the clamp branch
        let viewport = Viewport {
            width: 4000.0,
            height: 100.0,
        };
        let limits = FovLimits {
            y_desired: 60.0 * DEG,
            x_max: 160.0 * DEG,
        };
        let eclipse = AltAz::new(40.0 * DEG, 180.0 * DEG);
        let begin = AltAz::new(30.0 * DEG, 160.0 * DEG);
        let end = AltAz::new(45.0 * DEG, 200.0 * DEG);
        let plan = plan(&viewport, &limits, &eclipse, &begin, &end);

        assert!((plan.display.x - limits.x_max).abs() < 1e-12);
        assert!(
            (plan.display.y - aspect_convert(limits.x_max, viewport.aspect_ratio())).abs()
                < 1e-12
        );
    }

    #[test]
    fn tracking_fov_keeps_both_bounds_in_frame() {
        let viewport = Viewport {
            width: 1200.0,
            height: 800.0,
        };
        let eclipse = AltAz::new(40.0 * DEG, 180.0 * DEG);
        let begin = AltAz::new(28.0 * DEG, 158.0 * DEG);
        let end = AltAz::new(44.0 * DEG, 203.0 * DEG);
        let plan = plan(&viewport, &wide_limits(), &eclipse, &begin, &end);

        // Both slider-bound sun offsets are within half a view width of the
        // eclipse center, in both axes
        for r in [
            plan.ratios.x.start,
            plan.ratios.x.end,
            plan.ratios.y.start,
            plan.ratios.y.end,
        ] {
            assert!(r.abs() <= 0.5 + 1e-9, "ratio {r} out of frame");
        }
    }

    #[test]
    fn tracking_ratio_signs_mirror_sun_travel() {
        let viewport = Viewport {
            width: 1200.0,
            height: 800.0,
        };
        // Sun travels west-to-east through the eclipse azimuth
        let eclipse = AltAz::new(40.0 * DEG, 180.0 * DEG);
        let begin = AltAz::new(30.0 * DEG, 160.0 * DEG);
        let end = AltAz::new(45.0 * DEG, 200.0 * DEG);
        let plan = plan(&viewport, &wide_limits(), &eclipse, &begin, &end);

        // Eclipse center is ahead of the begin azimuth and behind the end
        assert!(plan.ratios.x.start > 0.0);
        assert!(plan.ratios.x.end < 0.0);
    }
}
