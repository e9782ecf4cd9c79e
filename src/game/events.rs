//! Match Events
//!
//! Emitted by the state machine on every accepted transition and appended
//! to the move ledger. Each event carries the acting player directly, so
//! consumers never have to re-derive the actor from attempt parity or any
//! other heuristic.

use serde::{Deserialize, Serialize};

use crate::core::words::WORD_LENGTH;
use crate::game::state::PlayerId;

/// One accepted state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player joined and published their word commitment.
    PlayerJoined {
        /// The joining player.
        player: PlayerId,
    },

    /// Both players joined; the match moved to its first guessing turn.
    MatchStarted {
        /// Player who guesses first (the first joiner).
        first_to_play: PlayerId,
    },

    /// A guess was admitted (dictionary membership verified), pending
    /// classification by the opposing secret holder.
    GuessSubmitted {
        /// The guessing player.
        player: PlayerId,
        /// The guessed word (lowercase).
        word: String,
        /// 1-based guess ordinal across the match.
        attempt: u32,
    },

    /// The pending guess was classified and the proof accepted.
    GuessVerified {
        /// The secret holder who verified.
        verifier: PlayerId,
        /// The player whose guess was classified.
        guesser: PlayerId,
        /// The guessed word (lowercase).
        word: String,
        /// Per-position trits (0 absent, 1 present, 2 correct).
        classification: [u8; WORD_LENGTH],
    },

    /// A verified all-correct guess ended the match.
    MatchWon {
        /// The winning guesser.
        winner: PlayerId,
        /// Total guesses the match took.
        guesses: u32,
    },
}

impl GameEvent {
    /// The player who acted to produce this event.
    pub fn player(&self) -> PlayerId {
        match self {
            Self::PlayerJoined { player } => *player,
            Self::MatchStarted { first_to_play } => *first_to_play,
            Self::GuessSubmitted { player, .. } => *player,
            Self::GuessVerified { verifier, .. } => *verifier,
            Self::MatchWon { winner, .. } => *winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_actor() {
        let p1 = PlayerId::new([1; 16]);
        let p2 = PlayerId::new([2; 16]);

        let event = GameEvent::GuessVerified {
            verifier: p2,
            guesser: p1,
            word: "peach".to_string(),
            classification: [2, 2, 2, 2, 2],
        };

        // The verifier is the actor; the guesser is payload.
        assert_eq!(event.player(), p2);
    }

    #[test]
    fn test_event_serialization_round_trip() {
        let event = GameEvent::GuessSubmitted {
            player: PlayerId::new([7; 16]),
            word: "crane".to_string(),
            attempt: 3,
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
