//! # Eclipse Locator
//!
//! Finds the instant of minimum sun–moon separation for the observer.
//!
//! The search is a coarse-to-fine walk: starting from a seed instant it
//! advances in fixed steps as long as the separation keeps shrinking, backs
//! off two steps once it grows, halves the step, and repeats until the step
//! drops below one second. Separation near a deep minimum is close to a
//! V shape in time, so this converges quickly and never needs derivatives.
//!
//! The seed must be on the near side of the minimum (separation already
//! decreasing); the default seed of 16:00 UTC on eclipse day satisfies
//! this anywhere in North America for the 2017-08-21 event.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use crate::angles;
use crate::ephemeris::{Ephemeris, GeometryInputError};
use crate::{AltAz, GeoCoordinate};

/// Initial search step, 5 minutes.
const INITIAL_STEP_MS: i64 = 300_000;

/// Stop refining once the step is under a second.
const MIN_STEP_MS: i64 = 1_000;

/// Upper bound on forward steps at one step size. Generous; a real minimum
/// within a day of the seed is found in far fewer.
const MAX_ADVANCES: u32 = 2_000;

/// Moment of maximum eclipse for an observer, with the sun's position at
/// that moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EclipseEvent {
    pub instant: DateTime<Utc>,
    pub sun_pos: AltAz,
}

/// Search forward from `seed` for the instant of minimum sun–moon
/// separation at `coordinate`.
pub fn locate<E: Ephemeris>(
    ephemeris: &E,
    coordinate: GeoCoordinate,
    seed: DateTime<Utc>,
) -> Result<EclipseEvent, GeometryInputError> {
    let mut instant = seed;
    let mut separation = separation_at(ephemeris, coordinate, instant)?;
    let mut step_ms = INITIAL_STEP_MS;

    while step_ms >= MIN_STEP_MS {
        let step = Duration::milliseconds(step_ms);
        let mut advances = 0;
        loop {
            let next = instant + step;
            let next_sep = separation_at(ephemeris, coordinate, next)?;
            if next_sep >= separation {
                break;
            }
            instant = next;
            separation = next_sep;
            advances += 1;
            if advances >= MAX_ADVANCES {
                break;
            }
        }
        step_ms /= 2;
        if step_ms >= MIN_STEP_MS {
            // Back off past the minimum so the finer pass approaches it
            // from the same side
            instant -= step + step;
            separation = separation_at(ephemeris, coordinate, instant)?;
        }
        debug!(
            "eclipse search: step {} ms, at {} separation {:.6} rad",
            step_ms, instant, separation
        );
    }

    let snapshot = ephemeris.position(instant, coordinate)?;
    info!(
        "maximum eclipse at {} (separation {:.6} rad, sun alt {:.2}°)",
        instant,
        separation,
        snapshot.sun.pos.alt.to_degrees()
    );
    Ok(EclipseEvent {
        instant,
        sun_pos: snapshot.sun.pos,
    })
}

fn separation_at<E: Ephemeris>(
    ephemeris: &E,
    coordinate: GeoCoordinate,
    instant: DateTime<Utc>,
) -> Result<f64, GeometryInputError> {
    let snapshot = ephemeris.position(instant, coordinate)?;
    Ok(angles::separation(&snapshot.sun.pos, &snapshot.moon.pos))
}
