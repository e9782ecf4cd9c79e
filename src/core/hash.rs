//! Protocol Hash Primitive
//!
//! Two-input, domain-separated hash used for both letter commitments and
//! dictionary tree nodes. The circuit treats commitments and tree nodes as
//! the same two-input sponge, so both go through [`hash_two`].
//!
//! Callers treat this module as a black box: swapping in a circuit-native
//! algebraic hash only touches this file.

use sha2::{Digest, Sha256};

/// Field element as 32 big-endian bytes.
pub type Field = [u8; 32];

/// Domain separator for the two-input protocol hash.
const HASH2_DOMAIN: &[u8] = b"WORD_DUEL_HASH2_V1";

/// Domain separator for the empty (padding) leaf value.
const EMPTY_LEAF_DOMAIN: &[u8] = b"WORD_DUEL_EMPTY_LEAF_V1";

/// Hash two field elements into one.
///
/// Deterministic and order-sensitive: `hash_two(a, b) != hash_two(b, a)`
/// except with negligible probability.
pub fn hash_two(left: &Field, right: &Field) -> Field {
    let mut hasher = Sha256::new();
    hasher.update(HASH2_DOMAIN);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Padding value for unoccupied dictionary leaf slots (level 0).
///
/// Higher-level zero values are derived by hashing this up the tree.
pub fn empty_leaf() -> Field {
    let mut hasher = Sha256::new();
    hasher.update(EMPTY_LEAF_DOMAIN);
    hasher.finalize().into()
}

/// Embed a small integer into a field element (big-endian, low 8 bytes).
pub fn field_from_u64(value: u64) -> Field {
    let mut field = [0u8; 32];
    field[24..].copy_from_slice(&value.to_be_bytes());
    field
}

/// Recover a small integer from a field element produced by [`field_from_u64`].
///
/// Ignores the high 24 bytes; callers only use this for values known to fit.
pub fn field_to_u64(field: &Field) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&field[24..]);
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_two_determinism() {
        let a = field_from_u64(1);
        let b = field_from_u64(2);

        assert_eq!(hash_two(&a, &b), hash_two(&a, &b));
    }

    #[test]
    fn test_hash_two_order_matters() {
        let a = field_from_u64(1);
        let b = field_from_u64(2);

        assert_ne!(hash_two(&a, &b), hash_two(&b, &a));
    }

    #[test]
    fn test_empty_leaf_is_not_a_pair_hash() {
        let zero = [0u8; 32];
        assert_ne!(empty_leaf(), hash_two(&zero, &zero));
    }

    #[test]
    fn test_field_u64_round_trip() {
        for value in [0u64, 1, 97, 256, u32::MAX as u64, u64::MAX] {
            assert_eq!(field_to_u64(&field_from_u64(value)), value);
        }
    }

    #[test]
    fn test_field_from_u64_big_endian() {
        let field = field_from_u64(0x0102);
        assert_eq!(field[30], 0x01);
        assert_eq!(field[31], 0x02);
        assert!(field[..24].iter().all(|b| *b == 0));
    }
}
