//! Reader settings.

use serde::{Deserialize, Serialize};

use crate::version::LinkVersion;

/// Default limit for the length of a header tag in bytes.
pub const DEFAULT_MAX_HEADER_LEN: usize = 64;
/// Default limit for the number of elements in a length-prefixed array or string.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 24;

/// Settings of a Link reader.
///
/// ```
/// use meridian_link::{LinkOptions, LinkVersion};
///
/// let options = LinkOptions {
///     expected_version: LinkVersion::new(0, 6),
///     ..Default::default()
/// };
/// assert_eq!(options.max_header_len, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Version the decoder expects from the peer. See [`LinkVersion::check_compatible`].
    pub expected_version: LinkVersion,
    /// Maximum number of bytes scanned while looking for the end of a header tag.
    pub max_header_len: usize,
    /// Maximum number of elements in a length-prefixed array. Longer arrays are rejected as malformed, so a corrupted
    /// length cannot make the decoder allocate unbounded memory.
    pub max_array_len: usize,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            expected_version: LinkVersion::CURRENT,
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}
