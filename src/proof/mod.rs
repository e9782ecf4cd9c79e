//! Membership and Commitment Proofs
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF LAYER                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  merkle.rs     - dictionary membership index + proofs       │
//! │  commitment.rs - positional per-letter commitments          │
//! │  bridge.rs     - prover/verifier oracle contract + mock     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod commitment;
pub mod merkle;

// Re-export key types
pub use bridge::{
    CircuitInputs, MockProofOracle, OracleError, PrivateInputs, ProofArtifact, ProofOracle,
    CIRCUIT_VERSION,
};
pub use commitment::{commit_letter, commit_word, LetterCommitment, Salt, Secret, WordCommitment};
pub use merkle::{DictionaryTree, MembershipProof, MerkleError};
