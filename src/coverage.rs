//! # Eclipse Coverage Calculation
//!
//! Computes the fraction of the solar disk covered by the moon from the two
//! angular radii and the angular separation of the disk centers. The
//! visible sliver of sun during a partial eclipse is a *lune*, the
//! crescent between two overlapping circles, and its area has a closed
//! form (see <http://mathworld.wolfram.com/Lune.html>).
//!
//! Degenerate geometry is handled as data, never as an error:
//! - disks apart (`sep >= sun_r + moon_r`) → coverage 0
//! - moon disk fully containing the sun → coverage 1
//! - sun disk fully containing the moon (annular-style geometry, including
//!   concentric disks with `moon_r < sun_r`) → the analytic area ratio
//!   `(moon_r / sun_r)²`
//! - `acos` arguments are clamped to `[-1, 1]` so floating-point overshoot
//!   near tangency cannot produce NaN

use std::f64::consts::PI;

/// Fraction of the sun's disk covered by the moon, in `[0, 1]`.
///
/// `sun_r` and `moon_r` are the disk angular radii and `sep` the angular
/// separation of the disk centers, all in radians. The result may overshoot
/// the unit interval by a few ulps near the boundaries; callers that need a
/// hard guarantee should clamp.
pub fn percent_eclipse(sun_r: f64, moon_r: f64, sep: f64) -> f64 {
    // Disks not touching
    if sep >= sun_r + moon_r {
        return 0.0;
    }

    // One disk fully inside the other. The lune formula divides by sep, so
    // the contained case (which includes sep == 0) is resolved analytically
    // instead: a covering moon hides everything, a smaller moon hides
    // exactly its own disk area.
    if sep <= (moon_r - sun_r).abs() {
        return if moon_r >= sun_r {
            1.0
        } else {
            (moon_r / sun_r).powi(2)
        };
    }

    let delta = match lune_delta(sun_r, moon_r, sep) {
        // Heron term went negative: numerically degenerate overlap, treat
        // as a total eclipse
        None => return 1.0,
        Some(delta) => delta,
    };

    let lune = lune_area(sun_r, moon_r, sep, delta);

    1.0 - lune / (PI * sun_r * sun_r)
}

/// Heron-style triangle term of the lune construction.
///
/// Returns `None` when the product under the square root is negative,
/// which only happens for degenerate (effectively total) overlap.
fn lune_delta(sun_r: f64, moon_r: f64, sep: f64) -> Option<f64> {
    let inner = (sun_r + moon_r + sep)
        * (-sun_r + moon_r + sep)
        * (sun_r - moon_r + sep)
        * (sun_r + moon_r - sep);

    if inner < 0.0 {
        None
    } else {
        Some(0.25 * inner.sqrt())
    }
}

/// Area of the visible lune of the sun's disk. Assumes partial overlap.
fn lune_area(sun_r: f64, moon_r: f64, sep: f64, delta: f64) -> f64 {
    let sun_r2 = sun_r * sun_r;
    let moon_r2 = moon_r * moon_r;
    let sep2 = sep * sep;

    let sun_term = ((moon_r2 - sun_r2 - sep2) / (2.0 * sun_r * sep)).clamp(-1.0, 1.0);
    let moon_term = ((moon_r2 - sun_r2 + sep2) / (2.0 * moon_r * sep)).clamp(-1.0, 1.0);

    2.0 * delta + sun_r2 * sun_term.acos() - moon_r2 * moon_term.acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Typical angular radii for the 2017 eclipse, in radians
    const SUN_R: f64 = 0.25 * PI / 180.0;
    const MOON_R: f64 = 0.27 * PI / 180.0;

    #[test]
    fn disks_exactly_tangent_give_zero() {
        assert_eq!(percent_eclipse(SUN_R, MOON_R, SUN_R + MOON_R), 0.0);
        assert_eq!(percent_eclipse(SUN_R, MOON_R, SUN_R + MOON_R + 0.01), 0.0);
    }

    #[test]
    fn concentric_equal_disks_give_total() {
        assert_eq!(percent_eclipse(SUN_R, SUN_R, 0.0), 1.0);
    }

    #[test]
    fn covering_moon_gives_total() {
        // Moon larger than sun and closer than the radius difference
        assert_eq!(percent_eclipse(SUN_R, MOON_R, 0.0), 1.0);
        assert_eq!(percent_eclipse(SUN_R, MOON_R, (MOON_R - SUN_R) / 2.0), 1.0);
    }

    #[test]
    fn concentric_smaller_moon_is_annular_not_total() {
        // sep = 0 with moon_r < sun_r covers exactly the moon's disk area
        let small = 0.8 * SUN_R;
        let covered = percent_eclipse(SUN_R, small, 0.0);
        assert!((covered - 0.64).abs() < 1e-12, "covered = {covered}");
    }

    #[test]
    fn half_overlap_is_strictly_partial() {
        let covered = percent_eclipse(SUN_R, MOON_R, SUN_R);
        assert!(covered > 0.0 && covered < 1.0, "covered = {covered}");
    }

    #[test]
    fn equal_disks_separated_by_one_radius_cover_known_fraction() {
        // Two unit-ratio circles offset by r: lens area has the closed form
        // 2r²·(π/3 - √3/4), so coverage = 2/3 - √3/(2π) ≈ 0.391
        let covered = percent_eclipse(SUN_R, SUN_R, SUN_R);
        let expected = 2.0 / 3.0 - 3.0_f64.sqrt() / (2.0 * PI);
        assert!((covered - expected).abs() < 1e-9, "covered = {covered}");
    }

    #[test]
    fn coverage_is_monotonic_in_separation() {
        let mut prev = f64::INFINITY;
        let max_sep = SUN_R + MOON_R + 0.001;
        let steps = 500;
        for i in 0..=steps {
            let sep = max_sep * f64::from(i) / f64::from(steps);
            let covered = percent_eclipse(SUN_R, MOON_R, sep);
            assert!(
                covered <= prev + 1e-12,
                "coverage increased at sep {sep}: {covered} > {prev}"
            );
            prev = covered;
        }
    }

    #[test]
    fn coverage_stays_in_unit_interval() {
        for i in 0..400 {
            let sep = f64::from(i) * (SUN_R + MOON_R) / 380.0;
            let covered = percent_eclipse(SUN_R, MOON_R, sep);
            assert!((-1e-9..=1.0 + 1e-9).contains(&covered), "sep {sep}: {covered}");
        }
    }
}
