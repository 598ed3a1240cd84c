//! Geodesy primitives: normalized geographic coordinates, great circle math on a sphere, UTM conversion and
//! region/boundary crossing geometry on the unit sphere.
//!
//! All functions are pure and can be called from any thread.

pub mod crossing;
/// Reference ellipsoids.
pub mod ellipsoid;
pub mod error;
/// Points as unit vectors.
pub mod geo;
pub mod great_circle;
/// Normalized latitude/longitude points.
pub mod lat_lon;
/// Length units.
pub mod length;
/// Geographic point trait.
pub mod point;
/// Coordinate conversions.
pub mod projection;
pub mod region;
pub mod utm;

pub use crossing::{get_crossings, BoundaryCrossing, Collector};
pub use ellipsoid::Ellipsoid;
pub use error::GeoError;
pub use geo::Geo;
pub use lat_lon::{normalize_latitude, wrap_longitude, LatLonPoint};
pub use length::Length;
pub use point::{GeoPoint, NewGeoPoint};
pub use projection::{InvertedProjection, Projection};
pub use region::{is_point_in_polygon, segment_near_polygon, GeoPath, GeoRegion, GeoSegment};
pub use utm::{ll_to_utm, utm_to_ll, UtmPoint, UtmProjection};
