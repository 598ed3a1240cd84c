use serde::Serialize;

/// Reference ellipsoid used as the model of the Earth surface by projections.
///
/// Only the equatorial radius and the eccentricity squared are stored, since those are the only
/// parameters the transverse mercator series expansion needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipsoid {
    name: &'static str,
    radius: f64,
    ecc_sq: f64,
}

impl Ellipsoid {
    /// Airy 1830.
    pub const AIRY: Self = Self::new("Airy", 6_377_563.0, 0.00667054);
    /// Australian National.
    pub const AUSTRALIAN_NATIONAL: Self = Self::new("Australian National", 6_378_160.0, 0.006694542);
    /// Bessel 1841.
    pub const BESSEL_1841: Self = Self::new("Bessel 1841", 6_377_397.0, 0.006674372);
    /// Clarke 1866, used by NAD27.
    pub const CLARKE_1866: Self = Self::new("Clarke 1866", 6_378_206.0, 0.006768658);
    /// Clarke 1880.
    pub const CLARKE_1880: Self = Self::new("Clarke 1880", 6_378_249.0, 0.006803511);
    /// Everest 1830.
    pub const EVEREST: Self = Self::new("Everest", 6_377_276.0, 0.006637847);
    /// GRS 1980, used by NAD83.
    pub const GRS_1980: Self = Self::new("GRS 1980", 6_378_137.0, 0.00669438);
    /// International 1924.
    pub const INTERNATIONAL: Self = Self::new("International", 6_378_388.0, 0.00672267);
    /// WGS 72.
    pub const WGS_72: Self = Self::new("WGS 72", 6_378_135.0, 0.006694318);
    /// WGS 84.
    pub const WGS_84: Self = Self::new("WGS 84", 6_378_137.0, 0.00669438);

    /// All predefined ellipsoids.
    pub const ALL: [Self; 10] = [
        Self::AIRY,
        Self::AUSTRALIAN_NATIONAL,
        Self::BESSEL_1841,
        Self::CLARKE_1866,
        Self::CLARKE_1880,
        Self::EVEREST,
        Self::GRS_1980,
        Self::INTERNATIONAL,
        Self::WGS_72,
        Self::WGS_84,
    ];

    /// Creates a custom ellipsoid. `radius` is the equatorial radius in meters.
    pub const fn new(name: &'static str, radius: f64, ecc_sq: f64) -> Self {
        Self {
            name,
            radius,
            ecc_sq,
        }
    }

    /// Human readable name of the ellipsoid.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Equatorial radius in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Eccentricity squared.
    pub fn ecc_sq(&self) -> f64 {
        self.ecc_sq
    }

    /// Looks up a predefined ellipsoid by name, ignoring case.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS_84
    }
}
