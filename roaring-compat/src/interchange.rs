//! Helpers for moving bitmaps through text columns and counting unions.
//!
//! Storage systems that only take printable column values carry serialized
//! bitmaps as padded standard-alphabet base64. These helpers compose the
//! codec with that encoding and with the bitmap library's union operation;
//! every failure propagates as [`Error`] for the caller to handle.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use roaring::RoaringBitmap;

use crate::codec::{BytesSerializer, RoaringBitmapSerializer};
use crate::error::Error;

/// Unions every bitmap into the first and returns its cardinality.
///
/// Returns 0 for an empty slice. The first element accumulates the union in
/// place and must be treated as consumed by the caller.
pub fn union_cardinality(bitmaps: &mut [RoaringBitmap]) -> u64 {
    let Some((first, rest)) = bitmaps.split_first_mut() else {
        return 0;
    };
    for bitmap in rest {
        *first |= &*bitmap;
    }
    first.len()
}

/// Serializes a bitmap to padded standard-alphabet base64.
///
/// Run optimization is applied first: it may shrink the serialized form and
/// never changes the member set, but it does rewrite the bitmap's containers
/// in place.
pub fn to_base64(bitmap: &mut RoaringBitmap) -> Result<String, Error> {
    bitmap.optimize();
    let bytes = RoaringBitmapSerializer.serialize(bitmap)?;
    Ok(BASE64.encode(bytes))
}

/// Decodes a bitmap from base64 text, upconverting obsolete wire formats
/// along the way.
pub fn from_base64(text: &str) -> Result<RoaringBitmap, Error> {
    let bytes = BASE64.decode(text)?;
    RoaringBitmapSerializer.deserialize(&bytes)
}

/// Unions two base64-encoded bitmaps and re-encodes the result.
///
/// `existing` is typically the previously stored column value; `None`
/// starts from an empty bitmap.
pub fn union_base64(existing: Option<&str>, incoming: &str) -> Result<String, Error> {
    let mut union = match existing {
        Some(text) => from_base64(text)?,
        None => RoaringBitmap::new(),
    };
    union |= from_base64(incoming)?;
    to_base64(&mut union)
}

/// Collects raw ids into a bitmap and serializes it to base64.
pub fn ids_to_base64<I>(ids: I) -> Result<String, Error>
where
    I: IntoIterator<Item = u32>,
{
    let mut bitmap = ids.into_iter().collect::<RoaringBitmap>();
    to_base64(&mut bitmap)
}
