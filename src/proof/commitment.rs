//! Per-Letter Commitment Scheme
//!
//! A player commits to their secret word at join time by publishing five
//! positional letter commitments. Position `i` commits specifically to the
//! letter at position `i`, not to the multiset of letters.
//!
//! One salt is shared across all five positions of a secret. This is a
//! protocol parameter, not an implementation shortcut: the circuit takes
//! the salt as a single private input bound 1:1 to one secret, and the
//! commitments are already positional, so per-letter salts would change
//! nothing for hiding while breaking circuit compatibility.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::hash::{hash_two, Field};
use crate::core::words::{letter_field, word_to_letter_codes, CodecError, WORD_LENGTH};

/// Blinding salt for one secret word.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(pub Field);

impl Salt {
    /// Sample a fresh random salt.
    pub fn random() -> Self {
        use rand::RngCore;

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// The all-zero salt. Deterministic; for tests and fixtures only.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak salt bytes through logs
        write!(f, "Salt(..)")
    }
}

/// Commitment to a single letter at a fixed position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LetterCommitment(pub Field);

/// The five positional letter commitments a player publishes at join time.
///
/// Immutable for the lifetime of the match once published.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordCommitment(pub [LetterCommitment; WORD_LENGTH]);

impl WordCommitment {
    /// Raw commitment hashes, in position order (circuit public inputs).
    pub fn hashes(&self) -> [Field; WORD_LENGTH] {
        let mut hashes = [[0u8; 32]; WORD_LENGTH];
        for (out, commitment) in hashes.iter_mut().zip(&self.0) {
            *out = commitment.0;
        }
        hashes
    }
}

/// Commit to one letter: `H(salt, letter)`.
pub fn commit_letter(code: u8, salt: &Salt) -> LetterCommitment {
    LetterCommitment(hash_two(&salt.0, &letter_field(code)))
}

/// Commit to a word positionally, reusing the secret's single salt.
pub fn commit_word(codes: &[u8; WORD_LENGTH], salt: &Salt) -> WordCommitment {
    let mut commitments = [LetterCommitment([0u8; 32]); WORD_LENGTH];
    for (out, code) in commitments.iter_mut().zip(codes) {
        *out = commit_letter(*code, salt);
    }
    WordCommitment(commitments)
}

/// A player's secret word plus its blinding salt.
///
/// Held only by its owner, never transmitted. Serialization exists so the
/// owning client can stash it locally between turns; it must never leave
/// the owner's control in cleartext.
#[derive(Clone, Serialize, Deserialize)]
pub struct Secret {
    word: String,
    letter_codes: [u8; WORD_LENGTH],
    salt: Salt,
}

impl Secret {
    /// Create a secret with a freshly sampled salt.
    pub fn new(word: &str) -> Result<Self, CodecError> {
        Self::with_salt(word, Salt::random())
    }

    /// Create a secret with a caller-supplied salt (deterministic fixtures).
    pub fn with_salt(word: &str, salt: Salt) -> Result<Self, CodecError> {
        let letter_codes = word_to_letter_codes(word)?;
        Ok(Self {
            word: word.to_ascii_lowercase(),
            letter_codes,
            salt,
        })
    }

    /// The secret word (lowercase).
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Letter codes of the secret word, in order.
    pub fn letter_codes(&self) -> &[u8; WORD_LENGTH] {
        &self.letter_codes
    }

    /// The secret's salt.
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The commitment this secret publishes at join time.
    pub fn commitment(&self) -> WordCommitment {
        commit_word(&self.letter_codes, &self.salt)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Word and salt stay out of debug output
        write!(f, "Secret(<redacted>)")
    }
}
