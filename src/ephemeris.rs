//! # Ephemeris
//!
//! Topocentric sun and moon positions for an observer on the ground.
//!
//! The [`Ephemeris`] trait is the seam between celestial mechanics and the
//! rest of the simulator: everything downstream (eclipse search, coverage,
//! projection) consumes [`SkySnapshot`] values and never touches orbital
//! theory directly, which also makes the search and session logic testable
//! against synthetic skies.
//!
//! [`MeeusEphemeris`] is the real implementation, built on the `astro`
//! crate (Meeus, *Astronomical Algorithms*: VSOP87 solar longitude, ELP
//! lunar theory). On top of the crate's geocentric ecliptic positions it
//! applies, in order:
//!
//! 1. nutation in longitude, plus annual aberration for the sun;
//! 2. ecliptic → equatorial conversion with the true obliquity;
//! 3. apparent sidereal time → local hour angle;
//! 4. rigorous topocentric parallax (Meeus ch. 40), which matters a great
//!    deal for the moon, up to a degree of displacement;
//! 5. equatorial → horizontal (altitude/azimuth) conversion.
//!
//! Azimuth is measured from north through east. All angles are radians.

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

use astro::coords::{asc_frm_ecl, dec_frm_ecl};

use crate::angles;
use crate::{AltAz, BodySnapshot, GeoCoordinate, SkySnapshot};

/// Mean lunar radius in kilometers.
pub const MOON_RADIUS_KM: f64 = 1737.0;

/// Equatorial radius of the earth in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6378.14;

/// Solar disk radius used for eclipse-coverage geometry, in radians.
///
/// A calibrated constant rather than a distance-derived value; the sun's
/// true angular radius varies by under 2% over the year and a fixed disk
/// keeps coverage reproducible.
pub const SUN_ANGULAR_RADIUS: f64 = 0.25 * std::f64::consts::PI / 180.0;

/// Larger radius for drawing the sun's glare, in radians. Display only,
/// never used in coverage math.
pub const SUN_APPARENT_RADIUS: f64 = 0.34 * std::f64::consts::PI / 180.0;

/// Annual aberration constant, radians.
const ABERRATION: f64 = 20.4898 / 3600.0 * std::f64::consts::PI / 180.0;

/// Flattening factor for the geocentric latitude of an observer at sea
/// level (Meeus ch. 11).
const GEOCENTRIC_FLATTENING: f64 = 0.996_647_19;

/// Equatorial horizontal parallax of the sun at 1 AU, radians (8.794″).
const SUN_PARALLAX_1AU: f64 = 8.794 / 3600.0 * std::f64::consts::PI / 180.0;

/// Rejected input to an ephemeris query.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryInputError {
    #[error("latitude {0} is not a finite value in [-90, 90]")]
    BadLatitude(f64),
    #[error("longitude {0} is not a finite value in [-180, 180]")]
    BadLongitude(f64),
}

/// Source of sun and moon positions for a ground observer.
pub trait Ephemeris {
    /// Topocentric positions and angular radii of both bodies at `instant`
    /// as seen from `coordinate` (degrees, east-positive longitude).
    fn position(
        &self,
        instant: DateTime<Utc>,
        coordinate: GeoCoordinate,
    ) -> Result<SkySnapshot, GeometryInputError>;
}

/// Meeus-algorithm ephemeris backed by the `astro` crate. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeeusEphemeris;

impl Ephemeris for MeeusEphemeris {
    fn position(
        &self,
        instant: DateTime<Utc>,
        coordinate: GeoCoordinate,
    ) -> Result<SkySnapshot, GeometryInputError> {
        let observer = Observer::from_coordinate(coordinate)?;

        let jd = julian_day(instant);
        let delta_t = astro::time::delta_t(instant.year().into(), instant.month() as u8);
        let jed = astro::time::julian_ephemeris_day(jd, delta_t);

        let (nut_long, nut_oblq) = astro::nutation::nutation(jed);
        let true_oblq = astro::ecliptic::mn_oblq_IAU(jed) + nut_oblq;

        // Apparent sidereal time at Greenwich
        let sidereal = astro::time::mn_sidr(jd) + nut_long * true_oblq.cos();

        let (sun_ecl, sun_dist_au) = astro::sun::geocent_ecl_pos(jed);
        let sun_long = sun_ecl.long + nut_long - ABERRATION / sun_dist_au;
        let sun_asc = asc_frm_ecl(sun_long, sun_ecl.lat, true_oblq);
        let sun_dec = dec_frm_ecl(sun_long, sun_ecl.lat, true_oblq);
        let sun_parallax = SUN_PARALLAX_1AU / sun_dist_au;
        let sun_pos = observer.horizontal(sidereal, sun_asc, sun_dec, sun_parallax);

        let (moon_ecl, moon_dist_km) = astro::lunar::geocent_ecl_pos(jed);
        let moon_long = moon_ecl.long + nut_long;
        let moon_asc = asc_frm_ecl(moon_long, moon_ecl.lat, true_oblq);
        let moon_dec = dec_frm_ecl(moon_long, moon_ecl.lat, true_oblq);
        let moon_parallax = (EARTH_RADIUS_KM / moon_dist_km).asin();
        let moon_pos = observer.horizontal(sidereal, moon_asc, moon_dec, moon_parallax);

        // Surface-observer distance approximated as geocentric minus one
        // earth radius
        let moon_radius = (MOON_RADIUS_KM / (moon_dist_km - EARTH_RADIUS_KM)).atan();

        Ok(SkySnapshot {
            sun: BodySnapshot {
                pos: sun_pos,
                angular_radius: SUN_ANGULAR_RADIUS,
            },
            moon: BodySnapshot {
                pos: moon_pos,
                angular_radius: moon_radius,
            },
        })
    }
}

/// Observer geometry precomputed from a validated geographic coordinate.
struct Observer {
    /// Geodetic latitude, radians
    lat: f64,
    /// East-positive longitude, radians
    lng: f64,
    /// ρ sin φ′ for the parallax reduction
    rho_sin: f64,
    /// ρ cos φ′
    rho_cos: f64,
}

impl Observer {
    fn from_coordinate(coordinate: GeoCoordinate) -> Result<Self, GeometryInputError> {
        if !coordinate.lat.is_finite() || coordinate.lat.abs() > 90.0 {
            return Err(GeometryInputError::BadLatitude(coordinate.lat));
        }
        if !coordinate.lng.is_finite() || coordinate.lng.abs() > 180.0 {
            return Err(GeometryInputError::BadLongitude(coordinate.lng));
        }
        let lat = coordinate.lat.to_radians();
        // Sea-level observer; elevation terms omitted
        let u = (GEOCENTRIC_FLATTENING * lat.tan()).atan();
        Ok(Observer {
            lat,
            lng: coordinate.lng.to_radians(),
            rho_sin: GEOCENTRIC_FLATTENING * u.sin(),
            rho_cos: u.cos(),
        })
    }

    /// Apparent equatorial position → topocentric altitude/azimuth.
    ///
    /// `parallax` is the body's equatorial horizontal parallax.
    fn horizontal(&self, sidereal: f64, asc: f64, dec: f64, parallax: f64) -> AltAz {
        let hour_angle = angles::normalize(sidereal + self.lng - asc);
        let sin_par = parallax.sin();

        // Meeus ch. 40: shift from the geocenter to the observer
        let a = dec.cos() * hour_angle.sin();
        let b = dec.cos() * hour_angle.cos() - self.rho_cos * sin_par;
        let c = dec.sin() - self.rho_sin * sin_par;
        let q = (a * a + b * b + c * c).sqrt();
        let topo_ha = a.atan2(b);
        let topo_dec = (c / q).asin();

        let alt = (self.lat.sin() * topo_dec.sin()
            + self.lat.cos() * topo_dec.cos() * topo_ha.cos())
        .asin();
        // Azimuth from south, then rotated to north-through-east
        let az_south = topo_ha
            .sin()
            .atan2(topo_ha.cos() * self.lat.sin() - topo_dec.tan() * self.lat.cos());
        let az = angles::normalize(az_south + std::f64::consts::PI);

        AltAz::new(alt, az)
    }
}

/// Julian day for a UTC instant.
fn julian_day(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DEG: f64 = std::f64::consts::PI / 180.0;

    fn corvallis() -> GeoCoordinate {
        GeoCoordinate {
            lat: 44.567_353,
            lng: -123.278_622,
        }
    }

    fn eclipse_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 8, 21, 17, 0, 0).unwrap()
    }

    #[test]
    fn julian_day_epoch_values() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(j2000) - 2_451_545.0).abs() < 1e-9);
        let unix = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!((julian_day(unix) - 2_440_587.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_coordinates() {
        let eph = MeeusEphemeris;
        let t = eclipse_morning();
        assert!(matches!(
            eph.position(t, GeoCoordinate { lat: 95.0, lng: 0.0 }),
            Err(GeometryInputError::BadLatitude(_))
        ));
        assert!(matches!(
            eph.position(
                t,
                GeoCoordinate {
                    lat: 0.0,
                    lng: f64::NAN
                }
            ),
            Err(GeometryInputError::BadLongitude(_))
        ));
    }

    #[test]
    fn ecliptic_to_equatorial_degenerates_on_the_equator() {
        // Zero obliquity collapses the two frames: asc = long, dec = lat
        let long = 1.234;
        assert!((asc_frm_ecl(long, 0.0, 0.0) - long).abs() < 1e-12);
        assert!(dec_frm_ecl(long, 0.0, 0.0).abs() < 1e-12);
        // With real obliquity a mid-ecliptic longitude picks up declination
        let oblq = 23.44_f64.to_radians();
        assert!(dec_frm_ecl(1.0, 0.0, oblq) > 0.0);
    }

    #[test]
    fn sun_is_up_in_the_southeast_on_eclipse_morning() {
        let eph = MeeusEphemeris;
        let snap = eph.position(eclipse_morning(), corvallis()).unwrap();
        // Mid-morning local time: sun well above the horizon, east of south
        assert!(snap.sun.pos.alt > 30.0 * DEG && snap.sun.pos.alt < 60.0 * DEG);
        assert!(snap.sun.pos.az > 90.0 * DEG && snap.sun.pos.az < 180.0 * DEG);
    }

    #[test]
    fn moon_radius_is_physically_plausible() {
        let eph = MeeusEphemeris;
        let snap = eph.position(eclipse_morning(), corvallis()).unwrap();
        // Topocentric lunar radius stays within ~0.24° to ~0.30°
        assert!(snap.moon.angular_radius > 0.0040 && snap.moon.angular_radius < 0.0055);
    }

    #[test]
    fn moon_is_near_the_sun_on_eclipse_day() {
        let eph = MeeusEphemeris;
        let snap = eph.position(eclipse_morning(), corvallis()).unwrap();
        let sep = angles::separation(&snap.sun.pos, &snap.moon.pos);
        // Within a few degrees shortly before maximum eclipse
        assert!(sep < 3.0 * DEG, "separation {} rad", sep);
    }

    #[test]
    fn sun_moves_west_over_an_hour() {
        let eph = MeeusEphemeris;
        let early = eph.position(eclipse_morning(), corvallis()).unwrap();
        let late = eph
            .position(
                Utc.with_ymd_and_hms(2017, 8, 21, 18, 0, 0).unwrap(),
                corvallis(),
            )
            .unwrap();
        assert!(crate::angles::is_greater(late.sun.pos.az, early.sun.pos.az));
    }
}
