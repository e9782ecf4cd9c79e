//! Guess Evaluator
//!
//! Classifies each guess letter against the secret word: correct position,
//! present elsewhere, or absent. Run locally by the secret holder; the
//! result only enters the match once the proof bridge has vouched for it.
//!
//! Duplicate-letter rule: this is the single-pass classification the
//! proving circuit implements, NOT canonical Wordle's two-pass "consume
//! exact matches first" accounting. A letter whose every occurrence in the
//! secret is already matched exactly elsewhere still scores `Present`.
//! The rule is pinned by tests below; changing it means changing the
//! circuit and bumping the protocol version.

use serde::{Deserialize, Serialize};

use crate::core::words::WORD_LENGTH;

/// Per-letter classification trit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum LetterScore {
    /// Letter does not occur in the secret (gray).
    #[default]
    Absent = 0,
    /// Letter occurs in the secret at another position (yellow).
    Present = 1,
    /// Letter matches the secret at this position (green).
    Correct = 2,
}

impl LetterScore {
    /// Numeric trit value (0/1/2), as the circuit sees it.
    pub fn as_trit(self) -> u8 {
        self as u8
    }

    /// Parse a trit back into a score.
    pub fn from_trit(trit: u8) -> Option<Self> {
        match trit {
            0 => Some(Self::Absent),
            1 => Some(Self::Present),
            2 => Some(Self::Correct),
            _ => None,
        }
    }
}

/// Full classification of one guess, position by position.
pub type WordScore = [LetterScore; WORD_LENGTH];

/// Classify a guess against a secret.
///
/// Position `i` is `Correct` on an exact match, else `Present` if the
/// guessed letter occurs anywhere else in the secret, else `Absent`.
/// Pure function, no side effects.
pub fn evaluate(guess: &[u8; WORD_LENGTH], secret: &[u8; WORD_LENGTH]) -> WordScore {
    let mut score = [LetterScore::Absent; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if guess[i] == secret[i] {
            score[i] = LetterScore::Correct;
        } else if secret.iter().enumerate().any(|(j, s)| j != i && *s == guess[i]) {
            score[i] = LetterScore::Present;
        }
    }

    score
}

/// True if every position scored `Correct` (winning guess).
pub fn is_winning(score: &WordScore) -> bool {
    score.iter().all(|s| *s == LetterScore::Correct)
}

/// Raw trit sequence for circuit inputs and events.
pub fn to_trits(score: &WordScore) -> [u8; WORD_LENGTH] {
    let mut trits = [0u8; WORD_LENGTH];
    for (out, s) in trits.iter_mut().zip(score) {
        *out = s.as_trit();
    }
    trits
}

/// Parse a trit sequence received from a counterpart.
///
/// Returns `None` if any value is outside 0..=2.
pub fn from_trits(trits: &[u8; WORD_LENGTH]) -> Option<WordScore> {
    let mut score = [LetterScore::Absent; WORD_LENGTH];
    for (out, trit) in score.iter_mut().zip(trits) {
        *out = LetterScore::from_trit(*trit)?;
    }
    Some(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::words::word_to_letter_codes;

    fn eval(guess: &str, secret: &str) -> [u8; WORD_LENGTH] {
        let g = word_to_letter_codes(guess).unwrap();
        let s = word_to_letter_codes(secret).unwrap();
        to_trits(&evaluate(&g, &s))
    }

    #[test]
    fn test_exact_match_all_correct() {
        assert_eq!(eval("apple", "apple"), [2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_disjoint_all_absent() {
        assert_eq!(eval("zzzzz", "apple"), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_mixed_classification() {
        // p: present, e: present, a: present, c: absent, h: absent
        assert_eq!(eval("peach", "apple"), [1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_duplicate_letters_single_pass_rule() {
        // Secret "apple": guess positions 1 and 2 match the two 'p's
        // exactly. Canonical Wordle would gray out the leading 'p' because
        // both secret 'p's are consumed; the single-pass circuit rule keeps
        // it Present. Pinned deliberately.
        assert_eq!(eval("pppzz", "apple"), [1, 2, 2, 0, 0]);
    }

    #[test]
    fn test_duplicate_guess_letters_all_present() {
        // Every 'a' in the guess sees the one 'a' in the secret; the
        // single-pass rule does not consume it.
        assert_eq!(eval("aazzz", "apple"), [2, 1, 0, 0, 0]);
    }

    #[test]
    fn test_evaluation_is_asymmetric() {
        assert_ne!(eval("apple", "peach"), eval("peach", "apple"));
    }

    #[test]
    fn test_winning_detection() {
        let g = word_to_letter_codes("apple").unwrap();
        assert!(is_winning(&evaluate(&g, &g)));

        let s = word_to_letter_codes("peach").unwrap();
        assert!(!is_winning(&evaluate(&g, &s)));
    }

    #[test]
    fn test_trit_round_trip() {
        let g = word_to_letter_codes("peach").unwrap();
        let s = word_to_letter_codes("apple").unwrap();
        let score = evaluate(&g, &s);

        assert_eq!(from_trits(&to_trits(&score)), Some(score));
        assert_eq!(from_trits(&[0, 1, 2, 3, 0]), None);
    }
}
