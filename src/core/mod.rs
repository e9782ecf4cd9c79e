//! Deterministic protocol primitives.
//!
//! - `hash`: two-input domain-separated hash, field element type
//! - `words`: five-letter word codec

pub mod hash;
pub mod words;
