//! # Fixed-endianness wire primitives
//!
//! Every multi-byte integer in a serialized roaring bitmap is little-endian,
//! regardless of the host platform. All format code reads through this
//! module so the wire byte order is fixed in exactly one place instead of
//! being re-asserted (or forgotten) at every field.
//!
//! Reads go through a cursor-extension trait so callers can walk a container
//! directory sequentially without tracking positions by hand. Writes need no
//! trait: output buffers are plain `Vec<u8>` and `to_le_bytes` already names
//! the byte order at the call site.

use std::io::Cursor;

/// Errors that can occur while reading wire integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The buffer ended before the requested integer could be read.
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        /// Width in bytes of the integer being read.
        needed: usize,
        /// Bytes remaining at the read position.
        available: usize,
    },

    /// The cursor position does not fit in addressable memory.
    #[error("cursor position outside addressable memory")]
    PositionOverflow,
}

/// Reading little-endian integers from a byte source.
pub trait ReadWire {
    /// Reads a little-endian `u16`, advancing past it on success.
    fn read_u16_le(&mut self) -> Result<u16, Error>;

    /// Reads a little-endian `u32`, advancing past it on success.
    fn read_u32_le(&mut self) -> Result<u32, Error>;
}

impl ReadWire for Cursor<&[u8]> {
    fn read_u16_le(&mut self) -> Result<u16, Error> {
        take::<2>(self).map(u16::from_le_bytes)
    }

    fn read_u32_le(&mut self) -> Result<u32, Error> {
        take::<4>(self).map(u32::from_le_bytes)
    }
}

/// Reads the next `N` bytes from the cursor.
///
/// The cursor advances only on success; a failed read leaves its position
/// unchanged so the caller can report where the input ran out.
fn take<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N], Error> {
    // Safely convert the u64 position to usize, preventing truncation on
    // 32-bit platforms.
    let start: usize = cursor
        .position()
        .try_into()
        .map_err(|_| Error::PositionOverflow)?;

    let buffer = cursor.get_ref();
    let available = buffer.len().saturating_sub(start);
    if available < N {
        return Err(Error::UnexpectedEof {
            needed: N,
            available,
        });
    }

    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&buffer[start..start + N]);
    cursor.set_position((start + N) as u64);
    Ok(bytes)
}
