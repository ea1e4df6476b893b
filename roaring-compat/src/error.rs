//! Top-level error type for the roaring-compat library
//!

use crate::wire;

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fewer than four bytes were available for the version cookie.
    #[error("cannot read version cookie")]
    CookieRead(#[source] wire::Error),
    /// The cookie matches no known wire-format revision.
    #[error("unrecognized bitmap version cookie: {0}")]
    UnrecognizedCookie(u32),
    /// A legacy container directory ended before all of its entries could
    /// be read.
    #[error("truncated legacy bitmap container directory")]
    TruncatedDirectory(#[source] wire::Error),
    /// A legacy container count too large for a well-formed bitmap, whose
    /// container keys are 16-bit.
    #[error("legacy container count out of range: {0}")]
    ContainerCountOutOfRange(u32),
    /// The payload bytes of a legacy bitmap did not match the size derived
    /// from its container directory. Truncated or tampered input; accepting
    /// it would misalign the reconstructed offsets against stale payload
    /// bytes.
    #[error("corrupt legacy bitmap: payload size mismatch (expected {expected} bytes, found {actual})")]
    PayloadSizeMismatch {
        /// Payload size derived from the container directory.
        expected: usize,
        /// Payload bytes actually present in the input.
        actual: usize,
    },
    /// The requested byte range lies outside the input buffer.
    #[error("deserialization range out of bounds: buffer length {len}, offset {offset}, length {length}")]
    RangeOutOfBounds {
        /// Length of the input buffer.
        len: usize,
        /// Requested start position.
        offset: usize,
        /// Requested number of bytes.
        length: usize,
    },
    /// The bitmap library rejected bytes this library handed it.
    #[error("bitmap codec failure: {0}")]
    Codec(#[source] std::io::Error),
    /// The text form of a bitmap is not valid base64.
    #[error("invalid base64 bitmap text: {0}")]
    Base64(#[from] base64::DecodeError),
}
