//! Error type of the crate.

use thiserror::Error;

use crate::version::LinkVersion;

/// Error returned by the Link codec.
///
/// [`LinkError::Io`] means the underlying stream failed (including a stream that ended in the middle of a record).
/// All other variants mean that the bytes were read fine, but their content does not make a valid message.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Reading from or writing to the stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Graphic type byte with no known primitive.
    #[error("unknown graphic type: {0}")]
    UnknownGraphicType(u8),

    /// Render type byte other than lat/lon, xy or offset.
    #[error("unknown render type: {0}")]
    UnknownRenderType(u8),

    /// Header tag that is not valid at this position of the stream.
    #[error("unexpected header: {0}")]
    UnknownHeader(String),

    /// Raster color model byte with no known model.
    #[error("unknown raster color model: {0}")]
    UnknownColorModel(u8),

    /// Peer speaks a different major version of the protocol.
    #[error("incompatible protocol version {actual} (expected {expected})")]
    IncompatibleVersion {
        /// Version this side was configured with.
        expected: LinkVersion,
        /// Version received from the peer.
        actual: LinkVersion,
    },

    /// Field values that violate the record layout, e.g. a negative length.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// Write to the frozen shared empty properties set.
    #[error("shared empty properties set cannot be modified")]
    FrozenProperties,
}

impl LinkError {
    /// Returns true if the error was caused by the stream rather than by its content.
    pub fn is_io(&self) -> bool {
        matches!(self, LinkError::Io(_))
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        LinkError::Malformed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn io_and_content_errors_are_distinct() {
        let io: LinkError = std::io::Error::from(ErrorKind::UnexpectedEof).into();
        assert!(io.is_io());
        assert!(!LinkError::UnknownGraphicType(42).is_io());
        assert!(!LinkError::malformed("negative length").is_io());
    }
}
