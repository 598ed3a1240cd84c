use std::fmt::{Display, Formatter};

use approx::AbsDiffEq;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::great_circle::{spherical_azimuth, spherical_between, spherical_distance};
use crate::point::{GeoPoint, NewGeoPoint};

/// Maximum difference in degrees at which two [`LatLonPoint`]s are considered equal.
pub const EQUIVALENT_TOLERANCE: f64 = 0.00001;

/// Pins the latitude to the `[-90, 90]` range. Values outside of the range are clamped, not wrapped.
///
/// `NaN` is returned unchanged.
pub fn normalize_latitude<N: Float>(lat: N) -> N {
    let Some(pole) = N::from(90.0) else {
        return lat;
    };

    if lat > pole {
        pole
    } else if lat < -pole {
        -pole
    } else {
        lat
    }
}

/// Wraps the longitude into the `[-180, 180]` range.
///
/// Values already in the range (including both `-180` and `180`) are returned unchanged. Anything else is shifted
/// by a multiple of 360 degrees, so `180.00001` becomes `-179.99999` and `-180.00001` becomes `179.99999`.
pub fn wrap_longitude<N: Float>(lon: N) -> N {
    let (Some(half), Some(full)) = (N::from(180.0), N::from(360.0)) else {
        return lon;
    };

    if lon < -half || half < lon {
        let shifted = (lon + half) % full;
        if shifted < N::zero() {
            half + shifted
        } else {
            -half + shifted
        }
    } else {
        lon
    }
}

/// Geographic coordinate in degrees, always stored normalized.
///
/// Latitude is clamped to `[-90, 90]` and longitude is wrapped to `[-180, 180]` (see [`normalize_latitude`] and
/// [`wrap_longitude`]). The radian form of both coordinates is cached and is recomputed by every setter.
///
/// Two points are equal if both of their coordinates differ by no more than [`EQUIVALENT_TOLERANCE`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawLatLon", into = "RawLatLon")]
pub struct LatLonPoint {
    lat: f64,
    lon: f64,
    lat_rad: f64,
    lon_rad: f64,
}

#[derive(Serialize, Deserialize)]
struct RawLatLon {
    lat: f64,
    lon: f64,
}

impl From<RawLatLon> for LatLonPoint {
    fn from(value: RawLatLon) -> Self {
        Self::new(value.lat, value.lon)
    }
}

impl From<LatLonPoint> for RawLatLon {
    fn from(value: LatLonPoint) -> Self {
        Self {
            lat: value.lat,
            lon: value.lon,
        }
    }
}

impl LatLonPoint {
    /// Creates a new point from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        let mut point = Self {
            lat: 0.0,
            lon: 0.0,
            lat_rad: 0.0,
            lon_rad: 0.0,
        };
        point.set_lat_lon(lat, lon);
        point
    }

    /// Creates a new point from latitude and longitude in radians.
    pub fn from_radians(lat_rad: f64, lon_rad: f64) -> Self {
        Self::new(lat_rad.to_degrees(), lon_rad.to_degrees())
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat_rad
    }

    /// Longitude in radians.
    pub fn lon_rad(&self) -> f64 {
        self.lon_rad
    }

    /// Sets the latitude in degrees.
    pub fn set_lat(&mut self, lat: f64) {
        self.lat = normalize_latitude(lat);
        self.lat_rad = self.lat.to_radians();
    }

    /// Sets the longitude in degrees.
    pub fn set_lon(&mut self, lon: f64) {
        self.lon = wrap_longitude(lon);
        self.lon_rad = self.lon.to_radians();
    }

    /// Sets both coordinates in degrees.
    pub fn set_lat_lon(&mut self, lat: f64, lon: f64) {
        self.set_lat(lat);
        self.set_lon(lon);
    }

    /// Sets both coordinates in radians.
    pub fn set_lat_lon_rad(&mut self, lat_rad: f64, lon_rad: f64) {
        self.set_lat_lon(lat_rad.to_degrees(), lon_rad.to_degrees());
    }

    /// Great circle distance to the other point in radians.
    pub fn distance(&self, other: &LatLonPoint) -> f64 {
        spherical_distance(self.lat_rad, self.lon_rad, other.lat_rad, other.lon_rad)
    }

    /// Initial azimuth of the great circle to the other point in radians, `(-PI, PI]`.
    pub fn azimuth(&self, other: &LatLonPoint) -> f64 {
        spherical_azimuth(self.lat_rad, self.lon_rad, other.lat_rad, other.lon_rad)
    }

    /// Returns the point at the given distance (in radians) from this one in the direction of `azimuth` (radians).
    pub fn point_at(&self, distance: f64, azimuth: f64) -> LatLonPoint {
        let (lat, lon) = spherical_between(self.lat_rad, self.lon_rad, distance, azimuth);
        LatLonPoint::from_radians(lat, lon)
    }
}

impl Default for LatLonPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl PartialEq for LatLonPoint {
    fn eq(&self, other: &Self) -> bool {
        (self.lat - other.lat).abs() <= EQUIVALENT_TOLERANCE
            && (self.lon - other.lon).abs() <= EQUIVALENT_TOLERANCE
    }
}

impl AbsDiffEq for LatLonPoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        EQUIVALENT_TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl Display for LatLonPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LatLonPoint[lat={},lon={}]", self.lat, self.lon)
    }
}

impl GeoPoint for LatLonPoint {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }

    fn lat_rad(&self) -> f64 {
        self.lat_rad
    }

    fn lon_rad(&self) -> f64 {
        self.lon_rad
    }
}

impl NewGeoPoint<f64> for LatLonPoint {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self::new(lat, lon)
    }
}
