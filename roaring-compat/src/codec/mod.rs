//! Serializer capability contract and the bitmap codec built on it.
//!
//! Hosts that persist heterogeneous values register one codec per value
//! type and talk to all of them through the [`BytesSerializer`] contract:
//! encode, decode (whole buffer or subrange), null/empty handling, and two
//! declared format properties the host uses when deciding how encoded
//! values may be compared. This crate ships exactly one implementation,
//! [`RoaringBitmapSerializer`].

mod bitmap;

pub use bitmap::RoaringBitmapSerializer;

use std::any::TypeId;

use crate::error::Error;

/// Capability contract for value-to-bytes codecs.
pub trait BytesSerializer {
    /// The value type this codec handles.
    type Value;

    /// Whether this codec handles exactly the given runtime type.
    fn can_handle(&self, type_id: TypeId) -> bool;

    /// Serializes a value into its byte representation.
    fn serialize(&self, value: &Self::Value) -> Result<Vec<u8>, Error>;

    /// Byte representation of an absent value. Total; never fails.
    fn serialize_null(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Deserializes a value from its byte representation.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Value, Error>;

    /// Deserializes from the subrange `[offset, offset + length)` of
    /// `bytes`, so values embedded in a larger buffer need no caller-side
    /// copy.
    ///
    /// Fails with [`Error::RangeOutOfBounds`] when the subrange is not
    /// contained in the buffer.
    fn deserialize_range(
        &self,
        bytes: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<Self::Value, Error> {
        let selection = offset
            .checked_add(length)
            .and_then(|end| bytes.get(offset..end))
            .ok_or(Error::RangeOutOfBounds {
                len: bytes.len(),
                offset,
                length,
            })?;
        self.deserialize(selection)
    }

    /// The value corresponding to an empty byte representation.
    fn deserialize_empty(&self) -> Result<Self::Value, Error>;

    /// Whether byte-lexicographic order of serialized forms matches the
    /// natural order of the values. Hosts may only compare encoded values
    /// directly when this holds.
    fn preserves_object_ordering(&self) -> bool;

    /// Whether a value always serializes to one canonical byte form.
    fn is_consistent(&self) -> bool;
}
