//! Game Logic
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GAME LAYER                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  evaluate.rs - per-letter guess classification              │
//! │  state.rs    - turn-based match state machine               │
//! │  events.rs   - transitions as an auditable event stream     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod evaluate;
pub mod events;
pub mod state;

// Re-export key types
pub use evaluate::{evaluate, from_trits, is_winning, to_trits, LetterScore, WordScore};
pub use events::GameEvent;
pub use state::{GameError, GuessRecord, MatchPhase, MatchState, PlayerId};
