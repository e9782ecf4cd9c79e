//! Word Codec
//!
//! Maps five-letter words to field elements: one element per letter for
//! commitments and circuit inputs, and a single element identifying the
//! whole word for dictionary leaves.
//!
//! All functions are pure. Input is case-insensitive; everything downstream
//! works on lowercase ASCII codes.

use thiserror::Error;

use super::hash::{field_from_u64, Field};

/// Number of letters in every legal word.
pub const WORD_LENGTH: usize = 5;

/// Word validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Word is not exactly [`WORD_LENGTH`] characters.
    #[error("word must be exactly {WORD_LENGTH} letters, got {0}")]
    InvalidWordLength(usize),

    /// Word contains a character outside `a-z` / `A-Z`.
    #[error("word contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Convert a word to its five lowercase ASCII letter codes, in order.
pub fn word_to_letter_codes(word: &str) -> Result<[u8; WORD_LENGTH], CodecError> {
    let mut codes = [0u8; WORD_LENGTH];
    let mut count = 0;

    for ch in word.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(CodecError::InvalidCharacter(ch));
        }
        if count == WORD_LENGTH {
            return Err(CodecError::InvalidWordLength(word.chars().count()));
        }
        codes[count] = ch.to_ascii_lowercase() as u8;
        count += 1;
    }

    if count != WORD_LENGTH {
        return Err(CodecError::InvalidWordLength(count));
    }

    Ok(codes)
}

/// Convert a word to the single field element used as its dictionary leaf.
///
/// Big-endian base-256 accumulation of the letter codes. Injective over
/// fixed-length words, so distinct words never collide.
pub fn word_to_field(word: &str) -> Result<Field, CodecError> {
    let codes = word_to_letter_codes(word)?;

    let mut acc: u64 = 0;
    for code in codes {
        acc = acc * 256 + code as u64;
    }

    Ok(field_from_u64(acc))
}

/// Embed a single letter code into a field element (for circuit inputs).
pub fn letter_field(code: u8) -> Field {
    field_from_u64(code as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::field_to_u64;

    #[test]
    fn test_letter_codes() {
        let codes = word_to_letter_codes("apple").unwrap();
        assert_eq!(codes, [b'a', b'p', b'p', b'l', b'e']);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            word_to_letter_codes("Apple").unwrap(),
            word_to_letter_codes("aPPLe").unwrap()
        );
        assert_eq!(
            word_to_field("PEACH").unwrap(),
            word_to_field("peach").unwrap()
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(
            word_to_letter_codes("cat"),
            Err(CodecError::InvalidWordLength(3))
        );
        assert_eq!(
            word_to_letter_codes("planet"),
            Err(CodecError::InvalidWordLength(6))
        );
        assert_eq!(
            word_to_letter_codes(""),
            Err(CodecError::InvalidWordLength(0))
        );
    }

    #[test]
    fn test_invalid_character_rejected() {
        assert_eq!(
            word_to_letter_codes("app1e"),
            Err(CodecError::InvalidCharacter('1'))
        );
        assert_eq!(
            word_to_letter_codes("ap-le"),
            Err(CodecError::InvalidCharacter('-'))
        );
        // Non-ASCII letters are rejected too
        assert!(matches!(
            word_to_letter_codes("applé"),
            Err(CodecError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_word_field_encoding() {
        // "apple" = (((a*256 + p)*256 + p)*256 + l)*256 + e
        let expected = ((((b'a' as u64 * 256 + b'p' as u64) * 256 + b'p' as u64) * 256
            + b'l' as u64)
            * 256)
            + b'e' as u64;
        assert_eq!(field_to_u64(&word_to_field("apple").unwrap()), expected);
    }

    #[test]
    fn test_word_field_injective() {
        // Near-collisions in letter multisets must still map to distinct fields
        let words = ["apple", "appel", "pelap", "peach", "cheap"];
        for (i, a) in words.iter().enumerate() {
            for b in &words[i + 1..] {
                assert_ne!(
                    word_to_field(a).unwrap(),
                    word_to_field(b).unwrap(),
                    "{a} and {b} collided"
                );
            }
        }
    }
}
