//! # Circular Angle Arithmetic
//!
//! Helpers for comparing angles on a circular domain. Sun and moon azimuths
//! can sit on either side of the 0/2π seam (an eclipse low in the northern
//! sky, say), so naive subtraction is never safe. Everything here
//! normalizes first and reasons in shortest-arc terms.
//!
//! All functions are pure and accept any finite input, including negative
//! angles and multiples of 2π.

use std::f64::consts::{PI, TAU};

use crate::AltAz;

/// Normalize an angle to `[0, 2π)`.
pub fn normalize(angle: f64) -> f64 {
    angle - TAU * (angle / TAU).floor()
}

/// Shortest-arc distance between two angles, in `[0, π]`.
pub fn absolute_difference(a: f64, b: f64) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    let diff = if a > b { a - b } else { b - a };

    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

/// Whether `a` is "ahead of" `b` on the circle.
///
/// True iff `a` is reached within half a turn moving counter-clockwise from
/// `b`, i.e. `b < a <= b + π` after normalization. This gives a consistent
/// ordering for angles within a half-circle window of each other; it is
/// deliberately asymmetric (`is_greater(a, b) != is_greater(b, a)` unless
/// the angles are exactly opposite or equal).
pub fn is_greater(a: f64, b: f64) -> bool {
    let rel = normalize(normalize(a) - normalize(b));
    rel > 0.0 && rel <= PI
}

/// Signed shortest-arc difference `a - b`, in `(-π, π]`.
///
/// Positive when `a` is ahead of `b` per [`is_greater`].
pub fn signed_difference(a: f64, b: f64) -> f64 {
    let diff = absolute_difference(a, b);
    if is_greater(a, b) {
        diff
    } else {
        -diff
    }
}

/// Angular separation between two sky positions, in `[0, π]`.
///
/// Spherical law of cosines; the `acos` argument is clamped to tolerate
/// floating-point overshoot when the positions coincide.
pub fn separation(a: &AltAz, b: &AltAz) -> f64 {
    let cos_sep =
        a.alt.sin() * b.alt.sin() + a.alt.cos() * b.alt.cos() * (a.az - b.az).cos();
    cos_sep.clamp(-1.0, 1.0).acos()
}
