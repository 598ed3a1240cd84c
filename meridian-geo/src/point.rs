use num_traits::{Float, FloatConst};

use crate::great_circle::{spherical_azimuth, spherical_distance};

/// Point on the surface of a celestial body, given by its latitude and longitude in degrees.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float + FloatConst;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }

    /// Great circle distance to the other point in radians.
    fn distance(&self, other: &impl GeoPoint<Num = Self::Num>) -> Self::Num {
        spherical_distance(self.lat_rad(), self.lon_rad(), other.lat_rad(), other.lon_rad())
    }

    /// Initial azimuth of the great circle to the other point in radians, `(-PI, PI]`.
    fn azimuth(&self, other: &impl GeoPoint<Num = Self::Num>) -> Self::Num {
        spherical_azimuth(self.lat_rad(), self.lon_rad(), other.lat_rad(), other.lon_rad())
    }
}

/// Geo point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}
