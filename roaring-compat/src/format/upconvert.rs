//! Upconversion of obsolete serialized bitmaps into the current layout.
//!
//! The legacy layout and the current one differ in exactly one structural
//! way: the current container directory carries a 32-bit payload offset per
//! container and the legacy directory does not. Those offsets are fully
//! determined by the directory itself: each container starts where the
//! previous one ends, and a container's payload size follows from its
//! cardinality. The rewrite needs no access to payload contents at all.
//!
//! The rewrite is strict about what it accepts:
//!
//! * the container count is bounded by the 16-bit key space before anything
//!   is allocated from it;
//! * the payload region must match the directory-derived size to the byte,
//!   catching truncated or tampered inputs that would otherwise decode into
//!   garbage (or worse, into a plausible-looking wrong bitmap).

use std::io::Cursor;

use crate::error::Error;
use crate::wire::ReadWire;

use super::{
    container_byte_len, LEGACY_SERIAL_COOKIE, MAX_CONTAINERS, SERIAL_COOKIE,
    SERIAL_COOKIE_NO_RUNS,
};

/// Size in bytes of the stream header: cookie plus container count.
const STREAM_HEADER_BYTES: usize = 8;

/// Bytes per directory entry shared by both layouts: 16-bit key plus 16-bit
/// cardinality code.
const DIRECTORY_ENTRY_BYTES: usize = 4;

/// Bytes per reconstructed payload-offset entry.
const OFFSET_ENTRY_BYTES: usize = 4;

/// Rewrites a serialized bitmap into the current wire format.
///
/// Buffers already in a current format (cookie [`SERIAL_COOKIE_NO_RUNS`], or
/// [`SERIAL_COOKIE`] in the low 16 bits) are returned as a fresh
/// byte-for-byte copy. Buffers under [`LEGACY_SERIAL_COOKIE`] are rewritten
/// with reconstructed payload offsets. The returned buffer never aliases the
/// input.
///
/// ## Errors
/// * [`Error::CookieRead`] - fewer than four input bytes
/// * [`Error::UnrecognizedCookie`] - the cookie names no known revision
/// * [`Error::TruncatedDirectory`] - a legacy directory ends mid-entry
/// * [`Error::ContainerCountOutOfRange`] - a legacy count above 2^16
/// * [`Error::PayloadSizeMismatch`] - legacy payload bytes disagree with the
///   directory
pub fn upconvert(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut cursor = Cursor::new(bytes);
    let cookie = cursor.read_u32_le().map_err(Error::CookieRead)?;

    if cookie == LEGACY_SERIAL_COOKIE {
        tracing::debug!(
            input_len = bytes.len(),
            "rewriting legacy serialized bitmap into the current layout"
        );
        upconvert_legacy(&mut cursor)
    } else if cookie == SERIAL_COOKIE_NO_RUNS || (cookie & 0xFFFF) == SERIAL_COOKIE {
        // Already current. The run-container variant passes through
        // uninterpreted; only the cookie is inspected.
        Ok(bytes.to_vec())
    } else {
        Err(Error::UnrecognizedCookie(cookie))
    }
}

/// Rewrites a legacy stream, with the cursor positioned just past the cookie.
fn upconvert_legacy(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>, Error> {
    let container_count = cursor.read_u32_le().map_err(Error::TruncatedDirectory)?;
    if container_count > MAX_CONTAINERS {
        return Err(Error::ContainerCountOutOfRange(container_count));
    }
    let count = container_count as usize;

    let payload_start =
        STREAM_HEADER_BYTES + count * (DIRECTORY_ENTRY_BYTES + OFFSET_ENTRY_BYTES);

    let mut out = Vec::with_capacity(payload_start);
    out.extend_from_slice(&SERIAL_COOKIE_NO_RUNS.to_le_bytes());
    out.extend_from_slice(&container_count.to_le_bytes());

    // First directory pass: keys and cardinality codes are copied through
    // unchanged. Only the cardinalities need decoding, to drive the offset
    // arithmetic below.
    let mut cardinalities = Vec::with_capacity(count);
    for _ in 0..count {
        let key = cursor.read_u16_le().map_err(Error::TruncatedDirectory)?;
        let cardinality_code = cursor.read_u16_le().map_err(Error::TruncatedDirectory)?;
        out.extend_from_slice(&key.to_le_bytes());
        out.extend_from_slice(&cardinality_code.to_le_bytes());

        // The wire stores cardinality - 1, so 0xFFFF decodes to 65536.
        cardinalities.push(u32::from(cardinality_code) + 1);
    }

    // Second pass: emit the offset entries the legacy layout omits. Each
    // container starts where the previous one ends. With the container count
    // bounded by MAX_CONTAINERS the running cursor tops out below 2^30, so
    // the u32 arithmetic cannot overflow.
    let mut payload_cursor = payload_start as u32;
    for &cardinality in &cardinalities {
        out.extend_from_slice(&payload_cursor.to_le_bytes());
        payload_cursor += container_byte_len(cardinality);
    }
    let expected = payload_cursor as usize - payload_start;

    // Everything after the directory is container payload, copied verbatim.
    // Its length must match the directory-derived size to the byte; a
    // mismatch means the input is truncated or tampered with.
    let payload = &cursor.get_ref()[cursor.position() as usize..];
    if payload.len() != expected {
        return Err(Error::PayloadSizeMismatch {
            expected,
            actual: payload.len(),
        });
    }
    out.extend_from_slice(payload);

    Ok(out)
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    /// Strategy for legacy directory entries: strictly ascending keys with
    /// arbitrary cardinalities across the array/bit-vector boundary.
    fn directory_entries() -> impl Strategy<Value = Vec<(u16, u32)>> {
        prop::collection::btree_set(any::<u16>(), 0..24).prop_flat_map(|keys| {
            let keys: Vec<u16> = keys.into_iter().collect();
            let len = keys.len();
            prop::collection::vec(1u32..=65536, len)
                .prop_map(move |cards| keys.iter().copied().zip(cards).collect())
        })
    }

    fn legacy_stream(entries: &[(u16, u32)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LEGACY_SERIAL_COOKIE.to_le_bytes());
        bytes.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for &(key, cardinality) in entries {
            bytes.extend_from_slice(&key.to_le_bytes());
            bytes.extend_from_slice(&((cardinality - 1) as u16).to_le_bytes());
        }
        for &(_, cardinality) in entries {
            bytes.resize(bytes.len() + container_byte_len(cardinality) as usize, 0);
        }
        bytes
    }

    proptest! {
        /// Structural invariants of every successful rewrite: the current
        /// cookie, an unchanged count, offsets that start at the payload
        /// region and advance by exactly each container's payload size, and
        /// a total length grown by the 4 bytes per inserted offset entry.
        #[test]
        fn test_rewrite_structure(entries in directory_entries()) {
            let input = legacy_stream(&entries);
            let converted = upconvert(&input).unwrap();

            prop_assert_eq!(converted.len(), input.len() + entries.len() * 4);
            prop_assert_eq!(
                u32::from_le_bytes(converted[0..4].try_into().unwrap()),
                SERIAL_COOKIE_NO_RUNS
            );
            prop_assert_eq!(
                u32::from_le_bytes(converted[4..8].try_into().unwrap()),
                entries.len() as u32
            );

            let offsets_at = 8 + entries.len() * 4;
            let mut expected_offset = (offsets_at + entries.len() * 4) as u32;
            for (i, &(_, cardinality)) in entries.iter().enumerate() {
                let at = offsets_at + i * 4;
                let offset = u32::from_le_bytes(converted[at..at + 4].try_into().unwrap());
                prop_assert_eq!(offset, expected_offset);
                expected_offset += container_byte_len(cardinality);
            }
            prop_assert_eq!(converted.len() as u32, expected_offset);
        }

        /// A second pass over already-converted bytes changes nothing.
        #[test]
        fn test_idempotence(entries in directory_entries()) {
            let converted = upconvert(&legacy_stream(&entries)).unwrap();
            prop_assert_eq!(upconvert(&converted).unwrap(), converted);
        }

        /// Any truncation of the payload region is caught; none slips
        /// through as a silent misalignment.
        #[test]
        fn test_payload_truncation_detected(
            entries in directory_entries(),
            cut in 1usize..64,
        ) {
            prop_assume!(!entries.is_empty());
            let mut bytes = legacy_stream(&entries);
            let directory_len = 8 + entries.len() * 4;
            prop_assume!(bytes.len() - directory_len >= cut);
            bytes.truncate(bytes.len() - cut);

            prop_assert!(
                matches!(upconvert(&bytes), Err(Error::PayloadSizeMismatch { .. })),
                "expected PayloadSizeMismatch"
            );
        }
    }
}
