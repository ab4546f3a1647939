//! # Simulation Session
//!
//! Ties the pipeline together: owns the observer location, viewport, zoom
//! mode and playback offset, and produces [`Frame`] values for rendering.
//!
//! Derived state (eclipse event, slider-bound sun positions, field-of-view
//! plan) is recomputed from scratch and swapped in as one value whenever
//! the location changes; a viewport resize or zoom toggle replaces only the
//! field-of-view plan. Frames are computed purely from the session's
//! current inputs, so asking for the same offset twice yields the same
//! frame.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::Serialize;

use crate::coverage;
use crate::ephemeris::{Ephemeris, GeometryInputError, SUN_APPARENT_RADIUS};
use crate::fov::{self, FovLimits, FovPlan, Viewport};
use crate::locator::{self, EclipseEvent};
use crate::projector::{self, Projection};
use crate::tracking;
use crate::{angles, AltAz, GeoCoordinate, SkySnapshot};

/// Number of slider steps across the playback window.
pub const SLIDER_NSTEPS: f64 = 720.0;

/// Minutes of simulated time per slider step.
pub const SLIDER_STEP_MIN: f64 = 0.25;

/// Half the playback window in milliseconds (±90 minutes around the
/// eclipse instant).
pub const HALF_RANGE_MS: f64 = SLIDER_NSTEPS * SLIDER_STEP_MIN / 2.0 * 60_000.0;

/// How much sky the viewport shows in each mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomMode {
    #[default]
    Wide,
    Zoomed,
}

impl ZoomMode {
    pub fn limits(&self) -> FovLimits {
        let deg = std::f64::consts::PI / 180.0;
        match self {
            ZoomMode::Wide => FovLimits {
                y_desired: 8.0 * deg,
                x_max: 160.0 * deg,
            },
            ZoomMode::Zoomed => FovLimits {
                y_desired: 5.0 * deg,
                x_max: 160.0 * deg,
            },
        }
    }
}

/// Sun positions at the two ends of the playback window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderBoundPositions {
    pub begin: AltAz,
    pub end: AltAz,
}

/// Everything recomputed when the observer moves. Replaced whole.
#[derive(Clone, Copy, Debug, PartialEq)]
struct DerivedState {
    event: EclipseEvent,
    bounds: SliderBoundPositions,
    plan: FovPlan,
}

/// A body placed on the viewport: normalized coordinates plus projected
/// radius in view-height units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectedBody {
    pub x: Projection,
    pub y: Projection,
    pub r: f64,
}

/// One renderable instant of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub sun: ProjectedBody,
    pub moon: ProjectedBody,
    /// Fraction of the solar disk covered, `[0, 1]`
    pub coverage: f64,
}

/// One observer's simulation state over the playback window.
pub struct Session<E: Ephemeris> {
    ephemeris: E,
    location: GeoCoordinate,
    viewport: Viewport,
    zoom: ZoomMode,
    /// Playback offset from the eclipse instant, milliseconds
    offset_ms: f64,
    derived: DerivedState,
}

impl<E: Ephemeris> Session<E> {
    /// Build a session for `location`, searching forward from `seed` for
    /// the eclipse instant.
    pub fn new(
        ephemeris: E,
        location: GeoCoordinate,
        viewport: Viewport,
        zoom: ZoomMode,
        seed: DateTime<Utc>,
    ) -> Result<Self, GeometryInputError> {
        let derived = derive(&ephemeris, location, &viewport, zoom, seed)?;
        Ok(Session {
            ephemeris,
            location,
            viewport,
            zoom,
            offset_ms: 0.0,
            derived,
        })
    }

    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    pub fn eclipse_event(&self) -> EclipseEvent {
        self.derived.event
    }

    pub fn slider_bounds(&self) -> SliderBoundPositions {
        self.derived.bounds
    }

    pub fn offset_ms(&self) -> f64 {
        self.offset_ms
    }

    pub fn display_fov(&self) -> crate::fov::DisplayFov {
        self.derived.plan.display
    }

    /// The full field-of-view plan, for consumers that track the reference
    /// field of view or the tracking ratios themselves.
    pub fn fov_plan(&self) -> FovPlan {
        self.derived.plan
    }

    /// The instant currently shown, `eclipse + offset`.
    pub fn current_instant(&self) -> DateTime<Utc> {
        self.derived.event.instant + Duration::milliseconds(self.offset_ms as i64)
    }

    /// Normalized playback time in `[-1, 1]`.
    pub fn time_ratio(&self) -> f64 {
        self.offset_ms / HALF_RANGE_MS
    }

    /// Move the observer. All derived state is rebuilt and replaced as a
    /// single value; the playback offset is kept.
    pub fn set_location(
        &mut self,
        location: GeoCoordinate,
        seed: DateTime<Utc>,
    ) -> Result<(), GeometryInputError> {
        self.derived = derive(&self.ephemeris, location, &self.viewport, self.zoom, seed)?;
        self.location = location;
        Ok(())
    }

    /// Resize the viewport, replacing only the field-of-view plan.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.replan();
    }

    /// Toggle between wide and zoomed, replacing only the field-of-view
    /// plan.
    pub fn set_zoom(&mut self, zoom: ZoomMode) {
        self.zoom = zoom;
        self.replan();
    }

    /// Jump to a playback offset in minutes from the eclipse instant,
    /// clamped to the window.
    pub fn set_offset_mins(&mut self, mins: f64) {
        self.offset_ms = (mins * 60_000.0).clamp(-HALF_RANGE_MS, HALF_RANGE_MS);
    }

    /// Advance playback by `elapsed_wall_ms` of real time at `speed`
    /// simulated-per-wall, clamping at the end of the window.
    pub fn advance(&mut self, speed: f64, elapsed_wall_ms: f64) {
        self.offset_ms =
            (self.offset_ms + speed * elapsed_wall_ms).clamp(-HALF_RANGE_MS, HALF_RANGE_MS);
    }

    /// Compute the frame for the current playback offset.
    pub fn frame(&self) -> Result<Frame, GeometryInputError> {
        let snapshot = self.ephemeris.position(self.current_instant(), self.location)?;
        Ok(self.project(&snapshot))
    }

    fn replan(&mut self) {
        self.derived.plan = fov::plan(
            &self.viewport,
            &self.zoom.limits(),
            &self.derived.event.sun_pos,
            &self.derived.bounds.begin,
            &self.derived.bounds.end,
        );
    }

    fn project(&self, snapshot: &SkySnapshot) -> Frame {
        let plan = &self.derived.plan;
        let center = match self.zoom {
            ZoomMode::Zoomed => snapshot.sun.pos,
            ZoomMode::Wide => tracking::wide_view_center(
                &snapshot.sun.pos,
                self.time_ratio(),
                &plan.ratios,
                &plan.display,
            ),
        };

        let body = |pos: &AltAz, radius: f64| ProjectedBody {
            x: projector::project_offset(pos.az, center.az, plan.display.x),
            y: projector::project_offset(pos.alt, center.alt, plan.display.y),
            r: projector::project_angular_radius(radius, pos.alt, center.alt, plan.display.y),
        };

        let sep = angles::separation(&snapshot.sun.pos, &snapshot.moon.pos);
        Frame {
            // The sun draws with its larger apparent radius; coverage math
            // below uses the true disk
            sun: body(&snapshot.sun.pos, SUN_APPARENT_RADIUS),
            moon: body(&snapshot.moon.pos, snapshot.moon.angular_radius),
            coverage: coverage::percent_eclipse(
                snapshot.sun.angular_radius,
                snapshot.moon.angular_radius,
                sep,
            ),
        }
    }
}

fn derive<E: Ephemeris>(
    ephemeris: &E,
    location: GeoCoordinate,
    viewport: &Viewport,
    zoom: ZoomMode,
    seed: DateTime<Utc>,
) -> Result<DerivedState, GeometryInputError> {
    let event = locator::locate(ephemeris, location, seed)?;
    let half = Duration::milliseconds(HALF_RANGE_MS as i64);
    let begin = ephemeris.position(event.instant - half, location)?.sun.pos;
    let end = ephemeris.position(event.instant + half, location)?.sun.pos;
    let bounds = SliderBoundPositions { begin, end };
    let plan = fov::plan(viewport, &zoom.limits(), &event.sun_pos, &begin, &end);
    debug!(
        "derived state for ({:.4}, {:.4}): eclipse {}, display fov {:.2}° × {:.2}°",
        location.lat,
        location.lng,
        event.instant,
        plan.display.x.to_degrees(),
        plan.display.y.to_degrees()
    );
    Ok(DerivedState {
        event,
        bounds,
        plan,
    })
}
