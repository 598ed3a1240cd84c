//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// UTM zone number outside of `1..=60`.
    #[error("invalid UTM zone number: {0}")]
    InvalidZone(i32),
    /// UTM zone designation that cannot be parsed, e.g. `"3X9"` or `""`.
    #[error("invalid UTM zone string: {0:?}")]
    InvalidZoneString(String),
}
