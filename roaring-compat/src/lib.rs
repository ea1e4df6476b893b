#![deny(missing_docs)]

//! # Roaring bitmap wire-format compatibility
//!
//! Serialized roaring bitmaps open with a four-byte cookie naming their
//! wire-format revision, and the revisions are not mutually readable: the
//! obsolete layout omits the per-container payload offsets the current
//! decoder requires. This library detects the revision of a byte buffer and,
//! when it is obsolete, losslessly rewrites it into the current layout by
//! reconstructing the missing offsets from container metadata alone.
//!
//! On top of the upconverter sit a serializer capability contract, its
//! roaring bitmap implementation, and helpers for passing bitmaps through
//! base64 text columns.
//!
//! ```
//! use roaring::RoaringBitmap;
//! use roaring_compat::{BytesSerializer, RoaringBitmapSerializer};
//!
//! let mut bitmap = RoaringBitmap::new();
//! bitmap.insert(7);
//! bitmap.insert(1 << 20);
//!
//! let bytes = RoaringBitmapSerializer.serialize(&bitmap)?;
//! let decoded = RoaringBitmapSerializer.deserialize(&bytes)?;
//! assert_eq!(bitmap, decoded);
//! # Ok::<(), roaring_compat::Error>(())
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod interchange;
pub mod wire;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use codec::BytesSerializer;
pub use codec::RoaringBitmapSerializer;
pub use error::Error;
pub use format::upconvert;
