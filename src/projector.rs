//! # Sky-to-Viewport Projection
//!
//! Maps an angle in the observer's sky onto a normalized viewport
//! coordinate, given a view center and a field of view for that axis. The
//! projection is sine-based rather than linear: a body moving at constant
//! angular speed crosses the middle of the frame faster than the edges,
//! matching how the sky appears through a window.
//!
//! A point more than 90° from the view center is behind the viewer. A bare
//! `-0.5` sentinel would be ambiguous here (it also means "exactly at the
//! left edge"), so the result is an explicit [`Projection::OffView`]
//! variant. `OffView` still collapses to `-0.5` via [`Projection::ratio`]
//! for renderers that want the natural clipping behavior.

use serde::Serialize;

use crate::angles;

/// Result of projecting one axis of a sky position into the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Projection {
    /// Normalized viewport coordinate: 0.0 at the left/bottom edge, 0.5 at
    /// center, 1.0 at the right/top edge. May fall outside `[0, 1]` for
    /// points in front of the viewer but outside the field of view.
    InView(f64),
    /// The point is more than 90° from the view center (behind the viewer).
    OffView,
}

impl Projection {
    /// Collapse to a plain ratio, mapping `OffView` to `-0.5` (at or past
    /// the left/bottom edge) so naive rendering naturally clips it.
    pub fn ratio(self) -> f64 {
        match self {
            Projection::InView(r) => r,
            Projection::OffView => -0.5,
        }
    }

    pub fn is_off_view(self) -> bool {
        matches!(self, Projection::OffView)
    }
}

/// Project an angle onto one viewport axis.
///
/// `center` is the sky angle mapped to the middle of the frame and `fov`
/// the angular width of the frame on this axis.
pub fn project_offset(angle: f64, center: f64, fov: f64) -> Projection {
    if angles::absolute_difference(angle, center) > std::f64::consts::FRAC_PI_2 {
        return Projection::OffView;
    }

    let dist_from_center = (angle - center).sin();
    let half_fov_width = (fov / 2.0).sin();

    Projection::InView(0.5 + 0.5 * dist_from_center / half_fov_width)
}

/// Project a body's angular radius into a viewport-height ratio.
///
/// Uses the same sine scaling as [`project_offset`] so a disk drawn at the
/// projected position with this radius lines up with its projected limbs:
/// the radius is the projected span from the body's altitude `x` to
/// `x + radius`, measured from the view center.
pub fn project_angular_radius(radius: f64, body_alt: f64, center: f64, fov_y: f64) -> f64 {
    let x = angles::absolute_difference(body_alt, center);
    ((x + radius).sin() - x.sin()) / (2.0 * (fov_y / 2.0).sin())
}
