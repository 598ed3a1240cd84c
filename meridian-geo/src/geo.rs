use std::fmt::{Display, Formatter};

use approx::AbsDiffEq;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::lat_lon::LatLonPoint;

/// Point on the unit sphere, represented by its direction vector.
///
/// Geometry on `Geo`s is done in 3d cartesian form, so there are no special cases at the poles or at the dateline.
/// The `x` axis points to `(0, 0)`, `y` to `(0, 90)` and `z` to the north pole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    v: Vector3<f64>,
}

impl Geo {
    /// Creates a point from latitude and longitude in degrees.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::from_radians(lat.to_radians(), lon.to_radians())
    }

    /// Creates a point from latitude and longitude in radians.
    pub fn from_radians(lat: f64, lon: f64) -> Self {
        let cos_lat = lat.cos();
        Self {
            v: Vector3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin()),
        }
    }

    /// Creates a point from a vector. The vector is normalized, zero vector is kept as is.
    pub fn from_vector(v: Vector3<f64>) -> Self {
        let norm = v.norm();
        if norm > 0.0 {
            Self { v: v / norm }
        } else {
            Self { v }
        }
    }

    /// Direction vector of the point.
    pub fn vector(&self) -> &Vector3<f64> {
        &self.v
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat_rad().to_degrees()
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon_rad().to_degrees()
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.v.z.atan2((self.v.x * self.v.x + self.v.y * self.v.y).sqrt())
    }

    /// Longitude in radians.
    pub fn lon_rad(&self) -> f64 {
        self.v.y.atan2(self.v.x)
    }

    /// Dot product of the direction vectors.
    pub fn dot(&self, other: &Geo) -> f64 {
        self.v.dot(&other.v)
    }

    /// Normalized cross product, i.e. the pole of the great circle through both points.
    pub fn cross_normalize(&self, other: &Geo) -> Geo {
        Geo::from_vector(self.v.cross(&other.v))
    }

    /// Antipodal point.
    pub fn antipode(&self) -> Geo {
        Geo { v: -self.v }
    }

    /// Great circle distance in radians.
    ///
    /// Computed with `atan2` of the cross and dot products, which is accurate both for very close and for nearly
    /// antipodal points. Identical points have distance of exactly `0`.
    pub fn distance(&self, other: &Geo) -> f64 {
        self.v.cross(&other.v).norm().atan2(self.v.dot(&other.v))
    }

    /// Initial azimuth of the great circle to the other point in radians, `(-PI, PI]`.
    pub fn azimuth(&self, other: &Geo) -> f64 {
        let north = Vector3::z();
        let east = north.cross(&self.v);
        let north_tangent = self.v.cross(&east);
        let direction = self.v.cross(&other.v).cross(&self.v);

        let azimuth = direction.dot(&east).atan2(direction.dot(&north_tangent));
        if azimuth <= -std::f64::consts::PI {
            azimuth + 2.0 * std::f64::consts::PI
        } else {
            azimuth
        }
    }

    /// Converts the point into a normalized [`LatLonPoint`].
    pub fn to_lat_lon(&self) -> LatLonPoint {
        LatLonPoint::from_radians(self.lat_rad(), self.lon_rad())
    }
}

impl From<LatLonPoint> for Geo {
    fn from(value: LatLonPoint) -> Self {
        Geo::from_radians(value.lat_rad(), value.lon_rad())
    }
}

impl From<&LatLonPoint> for Geo {
    fn from(value: &LatLonPoint) -> Self {
        Geo::from_radians(value.lat_rad(), value.lon_rad())
    }
}

impl AbsDiffEq for Geo {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        1e-12
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.v.abs_diff_eq(&other.v, epsilon)
    }
}

impl Display for Geo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Geo[{},{}]", self.lat(), self.lon())
    }
}
