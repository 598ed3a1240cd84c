//! Conversion between geographic coordinates and Universal Transverse Mercator grid coordinates.
//!
//! The forward and inverse series follow the closed form formulas of USGS Bulletin 1532 (Snyder, "Map
//! Projections: A Working Manual"), so no iterative solving is involved.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ellipsoid::Ellipsoid;
use crate::error::GeoError;
use crate::lat_lon::LatLonPoint;
use crate::projection::Projection;

/// Scale factor along the central meridian.
pub const K0: f64 = 0.9996;
/// Easting of the central meridian of every zone.
pub const FALSE_EASTING: f64 = 500_000.0;
/// Northing of the equator for points in the southern hemisphere.
pub const FALSE_NORTHING: f64 = 10_000_000.0;
/// Letter used for latitudes outside of the UTM bands.
pub const OUT_OF_RANGE_LETTER: char = 'Z';

const BAND_LETTERS: &str = "CDEFGHJKLMNPQRSTUVWX";

/// Point in UTM grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmPoint {
    /// Northing in meters. Southern hemisphere values include [`FALSE_NORTHING`].
    pub northing: f64,
    /// Easting in meters, including [`FALSE_EASTING`].
    pub easting: f64,
    /// Zone number, `1..=60`.
    pub zone_number: u8,
    /// Latitude band letter, or [`OUT_OF_RANGE_LETTER`].
    pub zone_letter: char,
}

impl UtmPoint {
    /// Creates a new point.
    pub fn new(northing: f64, easting: f64, zone_number: u8, zone_letter: char) -> Self {
        Self {
            northing,
            easting,
            zone_number,
            zone_letter,
        }
    }

    /// Converts a geographic point into UTM coordinates. Same as [`ll_to_utm`].
    pub fn from_lat_lon(point: &LatLonPoint, ellipsoid: &Ellipsoid) -> Self {
        ll_to_utm(point, ellipsoid)
    }

    /// Converts the point back to geographic coordinates. Same as [`utm_to_ll`].
    pub fn to_lat_lon(&self, ellipsoid: &Ellipsoid) -> Option<LatLonPoint> {
        utm_to_ll(self, ellipsoid)
    }

    /// Returns true if the zone letter designates the northern hemisphere.
    pub fn is_northern(&self) -> bool {
        self.zone_letter >= 'N'
    }

    /// Zone designation, e.g. `"32V"`.
    pub fn zone(&self) -> String {
        format!("{}{}", self.zone_number, self.zone_letter)
    }

    /// Parses a zone designation like `"32V"` into the zone number and the band letter.
    ///
    /// The letter is case insensitive and must be one of the UTM band letters.
    pub fn parse_zone(zone: &str) -> Result<(u8, char), GeoError> {
        let invalid = || GeoError::InvalidZoneString(zone.to_string());

        let trimmed = zone.trim();
        let letter = trimmed
            .chars()
            .last()
            .ok_or_else(invalid)?
            .to_ascii_uppercase();
        if !BAND_LETTERS.contains(letter) {
            return Err(invalid());
        }

        let number: i32 = trimmed[..trimmed.len() - 1]
            .parse()
            .map_err(|_| invalid())?;

        Ok((check_zone(number)?, letter))
    }
}

impl Display for UtmPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {:.3}mE {:.3}mN",
            self.zone_number, self.zone_letter, self.easting, self.northing
        )
    }
}

/// Validates the zone number.
pub fn check_zone(zone_number: i32) -> Result<u8, GeoError> {
    if (1..=60).contains(&zone_number) {
        Ok(zone_number as u8)
    } else {
        Err(GeoError::InvalidZone(zone_number))
    }
}

/// Zone number for the given coordinates, including the special zones of southern Norway and Svalbard.
pub fn zone_number(lat: f64, lon: f64) -> u8 {
    let lon = (lon + 180.0) - ((lon + 180.0) / 360.0).trunc() * 360.0 - 180.0;
    let mut zone = ((lon + 180.0) / 6.0) as i32 + 1;

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        zone = 32;
    }

    if (72.0..84.0).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            zone = 31;
        } else if (9.0..21.0).contains(&lon) {
            zone = 33;
        } else if (21.0..33.0).contains(&lon) {
            zone = 35;
        } else if (33.0..42.0).contains(&lon) {
            zone = 37;
        }
    }

    zone.clamp(1, 60) as u8
}

/// Latitude band letter.
///
/// Bands are 8 degrees high starting from -80, with the `X` band extended to 84. Latitudes south of -80 are
/// reported as the southernmost band `C`, latitudes north of 84 (and `NaN`) as [`OUT_OF_RANGE_LETTER`].
pub fn letter_designator(lat: f64) -> char {
    match lat {
        l if (72.0..=84.0).contains(&l) => 'X',
        l if (64.0..72.0).contains(&l) => 'W',
        l if (56.0..64.0).contains(&l) => 'V',
        l if (48.0..56.0).contains(&l) => 'U',
        l if (40.0..48.0).contains(&l) => 'T',
        l if (32.0..40.0).contains(&l) => 'S',
        l if (24.0..32.0).contains(&l) => 'R',
        l if (16.0..24.0).contains(&l) => 'Q',
        l if (8.0..16.0).contains(&l) => 'P',
        l if (0.0..8.0).contains(&l) => 'N',
        l if (-8.0..0.0).contains(&l) => 'M',
        l if (-16.0..-8.0).contains(&l) => 'L',
        l if (-24.0..-16.0).contains(&l) => 'K',
        l if (-32.0..-24.0).contains(&l) => 'J',
        l if (-40.0..-32.0).contains(&l) => 'H',
        l if (-48.0..-40.0).contains(&l) => 'G',
        l if (-56.0..-48.0).contains(&l) => 'F',
        l if (-64.0..-56.0).contains(&l) => 'E',
        l if (-72.0..-64.0).contains(&l) => 'D',
        l if l < -72.0 => 'C',
        _ => OUT_OF_RANGE_LETTER,
    }
}

/// Converts a geographic point into UTM coordinates in the zone the point belongs to.
pub fn ll_to_utm(point: &LatLonPoint, ellipsoid: &Ellipsoid) -> UtmPoint {
    let zone = zone_number(point.lat(), point.lon());
    forward(point, ellipsoid, zone)
}

/// Converts a geographic point into UTM coordinates of the given zone.
///
/// Returns `None` if the zone number is not in `1..=60`.
pub fn ll_to_utm_in_zone(point: &LatLonPoint, ellipsoid: &Ellipsoid, zone_number: i32) -> Option<UtmPoint> {
    let zone = check_zone(zone_number).ok()?;
    Some(forward(point, ellipsoid, zone))
}

/// Converts UTM coordinates back to a geographic point. The hemisphere is taken from the zone letter.
///
/// Returns `None` if the zone number is not valid.
pub fn utm_to_ll(point: &UtmPoint, ellipsoid: &Ellipsoid) -> Option<LatLonPoint> {
    utm_to_ll_hemisphere(
        point.northing,
        point.easting,
        point.zone_number as i32,
        point.is_northern(),
        ellipsoid,
    )
}

/// Converts UTM coordinates back to a geographic point with an explicit hemisphere flag.
///
/// Returns `None` if the zone number is not in `1..=60`.
pub fn utm_to_ll_hemisphere(
    northing: f64,
    easting: f64,
    zone_number: i32,
    is_northern: bool,
    ellipsoid: &Ellipsoid,
) -> Option<LatLonPoint> {
    let zone = check_zone(zone_number).ok()?;
    Some(inverse(northing, easting, zone, is_northern, ellipsoid))
}

/// Converts UTM coordinates with a zone designation like `"32V"` back to a geographic point.
///
/// Returns `None` if the zone string cannot be parsed.
pub fn utm_to_ll_from_zone_str(
    northing: f64,
    easting: f64,
    zone: &str,
    ellipsoid: &Ellipsoid,
) -> Option<LatLonPoint> {
    match UtmPoint::parse_zone(zone) {
        Ok((number, letter)) => utm_to_ll(&UtmPoint::new(northing, easting, number, letter), ellipsoid),
        Err(err) => {
            log::debug!("Cannot convert UTM coordinates: {err}");
            None
        }
    }
}

fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

fn forward(point: &LatLonPoint, ellipsoid: &Ellipsoid, zone: u8) -> UtmPoint {
    let a = ellipsoid.radius();
    let ecc_sq = ellipsoid.ecc_sq();
    let ecc_prime_sq = ecc_sq / (1.0 - ecc_sq);

    let lat = point.lat();
    let lat_rad = point.lat_rad();
    let lon_rad = point.lon_rad();
    let origin_rad = central_meridian(zone).to_radians();

    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let tan_lat = lat_rad.tan();

    let n = a / (1.0 - ecc_sq * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ecc_prime_sq * cos_lat * cos_lat;
    let aa = cos_lat * (lon_rad - origin_rad);
    let m = meridional_arc(a, ecc_sq, lat_rad);

    let easting = K0
        * n
        * (aa
            + (1.0 - t + c) * aa.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ecc_prime_sq) * aa.powi(5) / 120.0)
        + FALSE_EASTING;

    let mut northing = K0
        * (m + n
            * tan_lat
            * (aa * aa / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * aa.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ecc_prime_sq) * aa.powi(6) / 720.0));

    if lat < 0.0 {
        northing += FALSE_NORTHING;
    }

    UtmPoint {
        northing,
        easting,
        zone_number: zone,
        zone_letter: letter_designator(lat),
    }
}

fn meridional_arc(a: f64, e2: f64, phi: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

fn inverse(northing: f64, easting: f64, zone: u8, is_northern: bool, ellipsoid: &Ellipsoid) -> LatLonPoint {
    let a = ellipsoid.radius();
    let e2 = ellipsoid.ecc_sq();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ecc_prime_sq = e2 / (1.0 - e2);
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let x = easting - FALSE_EASTING;
    let y = if is_northern {
        northing
    } else {
        northing - FALSE_NORTHING
    };

    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1 * sin_phi1).sqrt();
    let t1 = tan_phi1 * tan_phi1;
    let c1 = ecc_prime_sq * cos_phi1 * cos_phi1;
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1 * sin_phi1).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ecc_prime_sq) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ecc_prime_sq - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ecc_prime_sq + 24.0 * t1 * t1) * d.powi(5)
            / 120.0)
        / cos_phi1;

    LatLonPoint::new(lat.to_degrees(), central_meridian(zone) + lon.to_degrees())
}

/// UTM projection for a fixed zone and hemisphere.
#[derive(Debug, Clone, Copy)]
pub struct UtmProjection {
    zone_number: u8,
    is_northern: bool,
    ellipsoid: Ellipsoid,
}

impl UtmProjection {
    /// Creates a projection for the zone. Returns `None` if the zone number is not valid.
    pub fn new(zone_number: i32, is_northern: bool, ellipsoid: Ellipsoid) -> Option<Self> {
        Some(Self {
            zone_number: check_zone(zone_number).ok()?,
            is_northern,
            ellipsoid,
        })
    }

    /// Zone number of the projection.
    pub fn zone_number(&self) -> u8 {
        self.zone_number
    }
}

impl Projection for UtmProjection {
    type InPoint = LatLonPoint;
    type OutPoint = UtmPoint;

    fn project(&self, input: &LatLonPoint) -> Option<UtmPoint> {
        let mut projected = forward(input, &self.ellipsoid, self.zone_number);
        if self.is_northern && input.lat() < 0.0 {
            projected.northing -= FALSE_NORTHING;
        } else if !self.is_northern && input.lat() >= 0.0 {
            projected.northing += FALSE_NORTHING;
        }

        if projected.northing.is_finite() && projected.easting.is_finite() {
            Some(projected)
        } else {
            None
        }
    }

    fn unproject(&self, input: &UtmPoint) -> Option<LatLonPoint> {
        Some(inverse(
            input.northing,
            input.easting,
            self.zone_number,
            self.is_northern,
            &self.ellipsoid,
        ))
    }
}
