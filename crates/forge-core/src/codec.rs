//! Storage-order codec for time-ordered identifiers.
//!
//! A UUIDv7 carries its 48-bit millisecond timestamp in bytes 0-5 (big-endian)
//! followed by ten bytes of version, variant and random bits. Some B-tree
//! indexed stores compare 16-byte identifiers starting from the *end*
//! (bytes 10-15, then 8-9, then 6-7), which scatters freshly generated v7 ids
//! across the index. The storage layout moves the random block to the front
//! and the timestamp block to the back so the index sees them in insertion
//! order:
//!
//! ```text
//! time-ordered:  [T0 T1 T2 T3 T4 T5 | R0 R1 R2 R3 R4 R5 R6 R7 R8 R9]
//! storage:       [R0 R1 R2 R3 R4 R5 R6 R7 R8 R9 | T0 T1 T2 T3 T4 T5]
//! ```
//!
//! The transform is a pure byte permutation, total over all 128-bit inputs,
//! and [`from_storage_order`] is its exact inverse. The nil identifier maps to
//! itself in both directions.

use crate::id::{Id, IdKind};
use uuid::Uuid;

/// Length of the leading timestamp block in the time-ordered layout.
pub const TIMESTAMP_LEN: usize = 6;

/// Length of the random/version block in the time-ordered layout.
pub const RANDOM_LEN: usize = 16 - TIMESTAMP_LEN;

/// Permute big-endian time-ordered bytes into storage order.
#[inline]
pub fn to_storage_bytes(bytes: [u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..RANDOM_LEN].copy_from_slice(&bytes[TIMESTAMP_LEN..]);
    out[RANDOM_LEN..].copy_from_slice(&bytes[..TIMESTAMP_LEN]);
    out
}

/// Inverse of [`to_storage_bytes`].
#[inline]
pub fn from_storage_bytes(stored: [u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..TIMESTAMP_LEN].copy_from_slice(&stored[RANDOM_LEN..]);
    out[TIMESTAMP_LEN..].copy_from_slice(&stored[..RANDOM_LEN]);
    out
}

/// Re-encode a time-ordered identifier into the storage-sequential layout.
pub fn to_storage_order(id: Uuid) -> Uuid {
    if id.is_nil() {
        return id;
    }
    Uuid::from_bytes(to_storage_bytes(*id.as_bytes()))
}

/// Restore a storage-sequential identifier to its time-ordered layout.
pub fn from_storage_order(stored: Uuid) -> Uuid {
    if stored.is_nil() {
        return stored;
    }
    Uuid::from_bytes(from_storage_bytes(*stored.as_bytes()))
}

/// Encode any typed identifier for its identity column.
pub fn encode_id<K: IdKind>(id: Id<K>) -> Uuid {
    to_storage_order(id.into_uuid())
}

/// Decode an identity column value back into a typed identifier.
pub fn decode_id<K: IdKind>(stored: Uuid) -> Id<K> {
    Id::from_uuid(from_storage_order(stored))
}

/// A value that is written to storage through the identifier codec.
///
/// Implemented once, generically, for every [`Id`] kind.
pub trait StorageKey: Sized {
    /// The 16 bytes written to the identity column.
    fn storage_bytes(&self) -> [u8; 16];

    /// Rebuild the value from identity column bytes.
    fn from_storage_bytes(stored: [u8; 16]) -> Self;
}

impl<K: IdKind> StorageKey for Id<K> {
    fn storage_bytes(&self) -> [u8; 16] {
        *encode_id(*self).as_bytes()
    }

    fn from_storage_bytes(stored: [u8; 16]) -> Self {
        decode_id(Uuid::from_bytes(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ItemId, PlanId};

    fn sample() -> Uuid {
        Uuid::from_bytes([
            0x01, 0x8f, 0x3a, 0x4b, 0x5c, 0x6d, // timestamp
            0x70, 0x01, 0x80, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
        ])
    }

    #[test]
    fn timestamp_moves_to_the_back() {
        let stored = to_storage_order(sample());
        assert_eq!(
            stored.as_bytes(),
            &[
                0x70, 0x01, 0x80, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x01, 0x8f, 0x3a,
                0x4b, 0x5c, 0x6d,
            ]
        );
    }

    #[test]
    fn inverse_restores_original() {
        let id = sample();
        assert_eq!(from_storage_order(to_storage_order(id)), id);
        assert_eq!(to_storage_order(from_storage_order(id)), id);
    }

    #[test]
    fn nil_is_fixed_point() {
        assert_eq!(to_storage_order(Uuid::nil()), Uuid::nil());
        assert_eq!(from_storage_order(Uuid::nil()), Uuid::nil());
    }

    #[test]
    fn max_value_round_trips() {
        assert_eq!(from_storage_order(to_storage_order(Uuid::max())), Uuid::max());
    }

    #[test]
    fn typed_ids_round_trip() {
        let id = ItemId::new();
        let stored = encode_id(id);
        assert_ne!(stored, id.into_uuid());
        assert_eq!(decode_id::<crate::id::ItemKind>(stored), id);
    }

    #[test]
    fn storage_key_bytes_round_trip() {
        let id = PlanId::new();
        let bytes = id.storage_bytes();
        assert_eq!(&bytes[RANDOM_LEN..], &id.as_uuid().as_bytes()[..TIMESTAMP_LEN]);
        assert_eq!(PlanId::from_storage_bytes(bytes), id);
    }

    #[test]
    fn empty_id_stays_empty() {
        assert!(PlanId::from_storage_bytes(PlanId::EMPTY.storage_bytes()).is_empty());
    }
}
