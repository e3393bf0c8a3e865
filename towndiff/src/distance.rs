//! Great-circle distance between two points.
//!
//! Uses the spherical law of cosines. The central angle (in degrees) is turned
//! into nautical miles at 60 per degree, scaled to statute miles with the
//! Earth-radius-calibrated factor 1.1515, then to kilometers.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::town::Town;

/// Unit label attached to every [`DiffResult`].
pub const UNITS: &str = "kilometers";

/// Nautical miles per degree of arc.
pub const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Statute miles per nautical mile, calibrated to the Earth radius.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1515;

/// Kilometers per statute mile.
pub const KM_PER_MILE: f64 = 1.609344;

/// Distance between two towns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Non-negative distance.
    pub distance: f64,
    /// Unit of `distance`, always [`UNITS`].
    pub units: String,
}

impl DiffResult {
    /// Wrap a distance in kilometers.
    pub fn kilometers(distance: f64) -> Self {
        Self {
            distance,
            units: UNITS.to_string(),
        }
    }

    /// Distance from `home` to `dest`.
    pub fn between(home: &Town, dest: &Town) -> Self {
        Self::kilometers(great_circle_km(home.lat, home.lon, dest.lat, dest.lon))
    }
}

/// Great-circle distance in kilometers between two coordinates.
///
/// Total over real inputs: no range validation is performed and the cosine of
/// the central angle is clamped to `[-1, 1]`, so identical points yield `0.0`
/// instead of NaN.
///
/// # Examples
///
/// ```
/// use towndiff::great_circle_km;
///
/// let km = great_circle_km(43.580719, 7.12087, 48.856613, 2.352222);
/// assert!((km - 691.5725).abs() < 1e-3);
/// assert_eq!(great_circle_km(10.0, 20.0, 10.0, 20.0), 0.0);
/// ```
pub fn great_circle_km(home_lat: f64, home_lon: f64, dest_lat: f64, dest_lon: f64) -> f64 {
    let rad_home_lat = PI * home_lat / 180.0;
    let rad_dest_lat = PI * dest_lat / 180.0;
    let rad_theta_lon = PI * (home_lon - dest_lon) / 180.0;

    let cos_central = rad_home_lat.sin() * rad_dest_lat.sin()
        + rad_home_lat.cos() * rad_dest_lat.cos() * rad_theta_lon.cos();
    // Rounding can push the sum just past ±1 for coincident or antipodal points
    let cos_central = cos_central.clamp(-1.0, 1.0);

    let central_angle_deg = cos_central.acos() * 180.0 / PI;
    let miles = central_angle_deg * NAUTICAL_MILES_PER_DEGREE * STATUTE_MILES_PER_NAUTICAL_MILE;
    miles * KM_PER_MILE
}
