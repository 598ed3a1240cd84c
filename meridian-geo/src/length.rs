use serde::{Deserialize, Serialize};

/// Mean radius of the Earth in meters, used to convert between central angles and physical distances.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Unit of length.
///
/// Great circle distances in this crate are central angles on a unit sphere. `Length` converts them into physical
/// units assuming a spherical Earth of radius [`EARTH_RADIUS_METERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Length {
    /// Meters.
    Meter,
    /// Kilometers.
    Kilometer,
    /// International feet.
    Feet,
    /// Statute miles.
    Mile,
    /// Nautical miles.
    NauticalMile,
    /// Degrees of a great circle arc.
    Degree,
    /// Radians of a great circle arc.
    Radian,
}

impl Length {
    /// All supported units.
    pub const ALL: [Length; 7] = [
        Length::Meter,
        Length::Kilometer,
        Length::Feet,
        Length::Mile,
        Length::NauticalMile,
        Length::Degree,
        Length::Radian,
    ];

    /// Short abbreviation of the unit.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Length::Meter => "m",
            Length::Kilometer => "km",
            Length::Feet => "ft",
            Length::Mile => "mi",
            Length::NauticalMile => "nm",
            Length::Degree => "deg",
            Length::Radian => "rad",
        }
    }

    /// Finds a unit by its abbreviation.
    pub fn from_abbreviation(abbr: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.abbreviation().eq_ignore_ascii_case(abbr))
    }

    /// Number of these units in one radian of a great circle arc.
    pub fn units_per_radian(&self) -> f64 {
        match self {
            Length::Meter => EARTH_RADIUS_METERS,
            Length::Kilometer => EARTH_RADIUS_METERS / 1000.0,
            Length::Feet => EARTH_RADIUS_METERS / 0.3048,
            Length::Mile => EARTH_RADIUS_METERS / 1609.344,
            Length::NauticalMile => EARTH_RADIUS_METERS / 1852.0,
            Length::Degree => 180.0 / std::f64::consts::PI,
            Length::Radian => 1.0,
        }
    }

    /// Converts a distance in these units to radians.
    pub fn to_radians(&self, value: f64) -> f64 {
        value / self.units_per_radian()
    }

    /// Converts a distance in radians to these units.
    pub fn from_radians(&self, radians: f64) -> f64 {
        radians * self.units_per_radian()
    }

    /// Converts a value in these units to the `target` units.
    pub fn convert(&self, value: f64, target: Length) -> f64 {
        target.from_radians(self.to_radians(value))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn conversions() {
        assert_abs_diff_eq!(Length::Kilometer.convert(1.0, Length::Meter), 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(Length::NauticalMile.convert(1.0, Length::Meter), 1852.0, epsilon = 1e-9);
        assert_abs_diff_eq!(Length::Degree.to_radians(180.0), std::f64::consts::PI, epsilon = 1e-12);
        assert_abs_diff_eq!(Length::Radian.from_radians(0.25), 0.25);
    }

    #[test]
    fn abbreviations() {
        for unit in Length::ALL {
            assert_eq!(Length::from_abbreviation(unit.abbreviation()), Some(unit));
        }
        assert_eq!(Length::from_abbreviation("KM"), Some(Length::Kilometer));
        assert_eq!(Length::from_abbreviation("furlong"), None);
    }
}
