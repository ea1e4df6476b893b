//! The roaring bitmap implementation of the serializer contract.

use std::any::TypeId;

use roaring::RoaringBitmap;

use crate::error::Error;
use crate::format::upconvert;

use super::BytesSerializer;

/// Codec for [`RoaringBitmap`] values.
///
/// Stateless and zero-sized: instances are freely copied and shared, and any
/// two compare equal. Encoding always produces the current wire format;
/// decoding accepts every known revision by upconverting before handing the
/// bytes to the bitmap library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoaringBitmapSerializer;

impl BytesSerializer for RoaringBitmapSerializer {
    type Value = RoaringBitmap;

    fn can_handle(&self, type_id: TypeId) -> bool {
        type_id == TypeId::of::<RoaringBitmap>()
    }

    fn serialize(&self, bitmap: &RoaringBitmap) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::with_capacity(bitmap.serialized_size());
        bitmap.serialize_into(&mut bytes).map_err(Error::Codec)?;
        Ok(bytes)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<RoaringBitmap, Error> {
        let current = upconvert(bytes)?;
        RoaringBitmap::deserialize_from(current.as_slice()).map_err(Error::Codec)
    }

    fn deserialize_empty(&self) -> Result<RoaringBitmap, Error> {
        Ok(RoaringBitmap::new())
    }

    fn preserves_object_ordering(&self) -> bool {
        // A value inserted into a sparse container can serialize to fewer
        // bytes than a smaller value sitting in a dense container, so
        // byte-lexicographic comparison of encodings is meaningless.
        false
    }

    fn is_consistent(&self) -> bool {
        false
    }
}
