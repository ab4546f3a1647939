//! # Eclipse Simulator Core Library
//!
//! This library is the celestial-geometry and projection engine behind an
//! interactive solar eclipse simulation. Given an observer location it
//! computes topocentric sun/moon positions across a bounded time window
//! around the August 21, 2017 total solar eclipse, locates the instant of
//! maximal eclipse, computes the fraction of the solar disk covered by the
//! moon, and projects angular sky positions into normalized viewport
//! coordinates that a rendering layer can draw directly.
//!
//! ## Pipeline
//!
//! 1. **Location change**: the [`locator`] searches for the instant of
//!    minimum sun/moon angular separation, producing an
//!    [`locator::EclipseEvent`]. Sun positions at the playback-range
//!    extremes are sampled alongside it.
//! 2. **Resize / zoom toggle**: the [`fov`] planner recomputes the display
//!    field of view from the viewport aspect ratio, and a wider tracking
//!    reference field of view that keeps the sun's whole path in frame.
//! 3. **Every frame**: the [`projector`] maps the current sun/moon alt/az
//!    into viewport ratios, the [`coverage`] module computes the eclipse
//!    percentage, and (in wide mode) the [`tracking`] interpolator pans the
//!    view center smoothly along the sun's path.
//!
//! All of this state is owned by a [`session::Session`], which replaces
//! derived values atomically so a frame can never observe a half-updated
//! mix of old and new geometry.
//!
//! ## Units
//!
//! Angles are radians everywhere inside the library. Degrees appear only at
//! two boundaries: geographic coordinates ([`GeoCoordinate`]) and the
//! configuration file. Time is an absolute [`chrono::DateTime`] instant,
//! never wall-clock-relative, so eclipse computations are reproducible.

use serde::{Deserialize, Serialize};

pub mod angles;
pub mod config;
pub mod coverage;
pub mod ephemeris;
pub mod fov;
pub mod locator;
pub mod projector;
pub mod renderer;
pub mod session;
pub mod tracking;

/// A direction in the observer's local horizontal sky, in radians.
///
/// Altitude is the angle above the horizon; azimuth is measured from north,
/// increasing eastward. Values are not stored normalized: any circular
/// comparison must go through [`angles::normalize`] (the helpers in
/// [`angles`] do this themselves).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AltAz {
    /// Altitude above the horizon (radians)
    pub alt: f64,
    /// Azimuth from north, eastward (radians)
    pub az: f64,
}

impl AltAz {
    pub fn new(alt: f64, az: f64) -> Self {
        AltAz { alt, az }
    }
}

/// Observer location on Earth's surface, in degrees.
///
/// This is the one place the library speaks degrees: geographic coordinates
/// arrive from configuration or a map layer in the conventional unit and
/// are converted to radians at the ephemeris boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lng: f64,
}

/// Position and apparent size of one celestial body at a single instant.
///
/// Snapshots are transient: produced by the ephemeris for one instant,
/// consumed within a single render step, never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    /// Topocentric altitude/azimuth
    pub pos: AltAz,
    /// Angular radius of the body's disk (radians)
    pub angular_radius: f64,
}

/// Sun and moon positions for one instant and observer location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkySnapshot {
    pub sun: BodySnapshot,
    pub moon: BodySnapshot,
}
