//! # Word Duel Server
//!
//! Two-player hidden-word guessing duel with hash-committed secrets,
//! Merkle-proved dictionary membership and externally proved guess
//! classification.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WORD DUEL SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── hash.rs     - Field elements and the two-input hash     │
//! │  └── words.rs    - Word codec (letter codes, field packing)  │
//! │                                                              │
//! │  proof/          - Commitments and proofs                    │
//! │  ├── merkle.rs   - Dictionary membership index + proofs      │
//! │  ├── commitment.rs - Positional per-letter commitments       │
//! │  └── bridge.rs   - Prover/verifier oracle contract + mock    │
//! │                                                              │
//! │  game/           - Match logic (deterministic)               │
//! │  ├── evaluate.rs - Per-letter guess classification           │
//! │  ├── state.rs    - Turn-based match state machine            │
//! │  └── events.rs   - Transitions as an auditable event stream  │
//! │                                                              │
//! │  ledger/         - Append-only move log                      │
//! │  session/        - Concurrent match registry (async)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Trust Model
//!
//! Neither player ever reveals their secret word. A secret exists in the
//! protocol only as five salted per-letter hash commitments; guesses carry
//! a Merkle proof of dictionary membership, and every classification must
//! be vouched for by the proof oracle against the verifier's published
//! commitments before it enters the match. The `core/` and `game/` modules
//! are deterministic: BTreeMap over HashMap, no system time, no ambient
//! randomness.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod ledger;
pub mod proof;
pub mod session;

// Re-export commonly used types
pub use crate::core::hash::Field;
pub use crate::core::words::{word_to_field, word_to_letter_codes, CodecError, WORD_LENGTH};
pub use game::evaluate::{evaluate, LetterScore, WordScore};
pub use game::events::GameEvent;
pub use game::state::{GameError, MatchPhase, MatchState, PlayerId};
pub use ledger::{MatchId, MemoryLedger, MoveLedger, MoveRecord};
pub use proof::bridge::{
    CircuitInputs, MockProofOracle, PrivateInputs, ProofArtifact, ProofOracle,
};
pub use proof::commitment::{Salt, Secret, WordCommitment};
pub use proof::merkle::{DictionaryTree, MembershipProof};
pub use session::{MatchRegistry, SessionConfig, SessionError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default dictionary tree depth (capacity 16384 words).
pub const DEFAULT_TREE_DEPTH: u8 = 14;
