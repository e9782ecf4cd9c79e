//! Proof Bridge
//!
//! Contract boundary to the external zero-knowledge prover/verifier. The
//! match state machine hands the oracle a fixed, versioned public-input
//! record and receives a boolean acceptance; it never inspects proof
//! internals.
//!
//! [`MockProofOracle`] is a deterministic, transparent stand-in for tests
//! and the demo binary. It provides **no zero-knowledge**: anyone can
//! recompute its artifacts from the public inputs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::hash::{field_to_u64, Field};
use crate::core::words::{letter_field, WORD_LENGTH};
use crate::game::evaluate::{evaluate, to_trits, WordScore};
use crate::proof::commitment::{commit_word, Salt, Secret, WordCommitment};

/// Version of the public-input layout. Bumped together with the circuit.
pub const CIRCUIT_VERSION: u8 = 1;

/// Domain separator for mock proof artifacts.
const MOCK_PROOF_DOMAIN: &[u8] = b"WORD_DUEL_MOCK_PROOF_V1";

/// Fixed public-input record consumed by the circuit.
///
/// Positionally fixed and versioned so both sides shape inputs
/// identically; there is no dynamic field discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInputs {
    /// Public-input layout version.
    pub version: u8,
    /// The verifier's five published letter commitments.
    pub commitments: [Field; WORD_LENGTH],
    /// The guessed word, one field element per letter.
    pub guess_letters: [Field; WORD_LENGTH],
    /// The claimed classification, one trit per position.
    pub classification: [u8; WORD_LENGTH],
}

impl CircuitInputs {
    /// Shape the public inputs for one verification.
    pub fn new(
        commitment: &WordCommitment,
        guess_codes: &[u8; WORD_LENGTH],
        classification: &WordScore,
    ) -> Self {
        let mut guess_letters = [[0u8; 32]; WORD_LENGTH];
        for (out, code) in guess_letters.iter_mut().zip(guess_codes) {
            *out = letter_field(*code);
        }

        Self {
            version: CIRCUIT_VERSION,
            commitments: commitment.hashes(),
            guess_letters,
            classification: to_trits(classification),
        }
    }

    /// Canonical byte layout: version, then commitments, guess letters and
    /// trits in position order. Stable across releases of this version.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + WORD_LENGTH * (32 + 32 + 1));
        bytes.push(self.version);
        for commitment in &self.commitments {
            bytes.extend_from_slice(commitment);
        }
        for letter in &self.guess_letters {
            bytes.extend_from_slice(letter);
        }
        bytes.extend_from_slice(&self.classification);
        bytes
    }

    /// Recover the guessed letter codes from the field-encoded letters.
    fn guess_codes(&self) -> [u8; WORD_LENGTH] {
        let mut codes = [0u8; WORD_LENGTH];
        for (out, letter) in codes.iter_mut().zip(&self.guess_letters) {
            *out = field_to_u64(letter) as u8;
        }
        codes
    }
}

/// Private witness supplied only on the prover side.
#[derive(Clone)]
pub struct PrivateInputs {
    /// The secret's blinding salt.
    pub salt: Salt,
    /// The secret word's letter codes, in order.
    pub secret_codes: [u8; WORD_LENGTH],
}

impl From<&Secret> for PrivateInputs {
    fn from(secret: &Secret) -> Self {
        Self {
            salt: *secret.salt(),
            secret_codes: *secret.letter_codes(),
        }
    }
}

/// Opaque proof bytes produced by the prover, checked by the verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Raw artifact bytes. The core never interprets these.
    pub bytes: Vec<u8>,
}

/// Oracle failures (availability, not rejection).
///
/// A rejected proof is `Ok(false)` from `verify`, not an error; errors
/// mean the oracle itself could not run and the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Proof generation failed.
    #[error("proof generation failed: {0}")]
    ProveFailed(String),

    /// Proof verification could not run.
    #[error("proof verification failed: {0}")]
    VerifyFailed(String),
}

/// External prover/verifier consumed by the match state machine.
///
/// Implementations may take seconds per call; the session layer runs them
/// off the async executor under a timeout. Implementations must be safe to
/// call from multiple matches concurrently.
pub trait ProofOracle: Send + Sync {
    /// Produce an artifact attesting that `public.classification` is the
    /// true evaluation of the guess against the committed secret.
    fn prove(
        &self,
        private: &PrivateInputs,
        public: &CircuitInputs,
    ) -> Result<ProofArtifact, OracleError>;

    /// Check an artifact against the public inputs.
    fn verify(&self, artifact: &ProofArtifact, public: &CircuitInputs) -> Result<bool, OracleError>;
}

/// Deterministic transparent oracle for tests and demos.
///
/// `prove` refuses to sign an inconsistent witness (wrong commitments or a
/// classification that does not match a real evaluation), then emits
/// `SHA256(domain || canonical_public_inputs)`. `verify` recomputes the
/// digest. Transparent by construction; never use where privacy matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProofOracle;

impl MockProofOracle {
    /// Create a mock oracle.
    pub fn new() -> Self {
        Self
    }

    fn digest(public: &CircuitInputs) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(MOCK_PROOF_DOMAIN);
        hasher.update(public.canonical_bytes());
        hasher.finalize().to_vec()
    }
}

impl ProofOracle for MockProofOracle {
    fn prove(
        &self,
        private: &PrivateInputs,
        public: &CircuitInputs,
    ) -> Result<ProofArtifact, OracleError> {
        if public.version != CIRCUIT_VERSION {
            return Err(OracleError::ProveFailed(format!(
                "unsupported public input version {}",
                public.version
            )));
        }

        // A real circuit rejects unsatisfied witnesses; the mock mirrors
        // that by checking the two constraints the circuit enforces.
        let commitments = commit_word(&private.secret_codes, &private.salt).hashes();
        if commitments != public.commitments {
            return Err(OracleError::ProveFailed(
                "witness salt/word do not reproduce the public commitments".to_string(),
            ));
        }

        let expected = to_trits(&evaluate(&public.guess_codes(), &private.secret_codes));
        if expected != public.classification {
            return Err(OracleError::ProveFailed(
                "claimed classification does not match the evaluation".to_string(),
            ));
        }

        Ok(ProofArtifact {
            bytes: Self::digest(public),
        })
    }

    fn verify(&self, artifact: &ProofArtifact, public: &CircuitInputs) -> Result<bool, OracleError> {
        if public.version != CIRCUIT_VERSION {
            return Err(OracleError::VerifyFailed(format!(
                "unsupported public input version {}",
                public.version
            )));
        }
        // A wrong-length artifact is a rejected forgery, not an oracle
        // availability failure; errors are reserved for the latter.
        if artifact.bytes.len() != 32 {
            return Ok(false);
        }

        Ok(artifact.bytes == Self::digest(public))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::words::word_to_letter_codes;

    fn setup() -> (Secret, [u8; WORD_LENGTH], WordScore, CircuitInputs) {
        let secret = Secret::with_salt("apple", Salt::zero()).unwrap();
        let guess = word_to_letter_codes("peach").unwrap();
        let score = evaluate(&guess, secret.letter_codes());
        let inputs = CircuitInputs::new(&secret.commitment(), &guess, &score);
        (secret, guess, score, inputs)
    }

    #[test]
    fn test_prove_verify_round_trip() {
        let (secret, _, _, inputs) = setup();
        let oracle = MockProofOracle::new();

        let artifact = oracle.prove(&PrivateInputs::from(&secret), &inputs).unwrap();
        assert!(oracle.verify(&artifact, &inputs).unwrap());
    }

    #[test]
    fn test_prove_rejects_wrong_salt() {
        let (secret, _, _, inputs) = setup();
        let oracle = MockProofOracle::new();

        let bad_witness = PrivateInputs {
            salt: Salt([9u8; 32]),
            secret_codes: *secret.letter_codes(),
        };
        assert!(matches!(
            oracle.prove(&bad_witness, &inputs),
            Err(OracleError::ProveFailed(_))
        ));
    }

    #[test]
    fn test_prove_rejects_false_classification() {
        let (secret, guess, _, _) = setup();
        let oracle = MockProofOracle::new();

        // Claim a win that did not happen
        let lie = [crate::game::evaluate::LetterScore::Correct; WORD_LENGTH];
        let inputs = CircuitInputs::new(&secret.commitment(), &guess, &lie);

        assert!(matches!(
            oracle.prove(&PrivateInputs::from(&secret), &inputs),
            Err(OracleError::ProveFailed(_))
        ));
    }

    #[test]
    fn test_verify_rejects_artifact_for_other_inputs() {
        let (secret, guess, _, inputs) = setup();
        let oracle = MockProofOracle::new();
        let artifact = oracle.prove(&PrivateInputs::from(&secret), &inputs).unwrap();

        // Same artifact, different claimed classification
        let other_score = evaluate(&guess, &word_to_letter_codes("wrong").unwrap());
        let other = CircuitInputs::new(&secret.commitment(), &guess, &other_score);

        assert!(!oracle.verify(&artifact, &other).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_artifact() {
        let (_, _, _, inputs) = setup();
        let oracle = MockProofOracle::new();

        // Rejection, not an availability error: the caller must treat a
        // truncated or padded artifact exactly like any other forgery.
        assert_eq!(
            oracle.verify(&ProofArtifact { bytes: vec![1, 2, 3] }, &inputs),
            Ok(false)
        );
        assert_eq!(
            oracle.verify(&ProofArtifact { bytes: vec![0; 64] }, &inputs),
            Ok(false)
        );
    }

    #[test]
    fn test_canonical_bytes_stable_layout() {
        let (_, _, _, inputs) = setup();
        let bytes = inputs.canonical_bytes();

        assert_eq!(bytes.len(), 1 + WORD_LENGTH * 65);
        assert_eq!(bytes[0], CIRCUIT_VERSION);
        assert_eq!(inputs.canonical_bytes(), bytes);
    }

    #[test]
    fn test_version_mismatch_is_an_error() {
        let (secret, _, _, mut inputs) = setup();
        let oracle = MockProofOracle::new();
        inputs.version = 99;

        assert!(oracle.prove(&PrivateInputs::from(&secret), &inputs).is_err());
        assert!(oracle
            .verify(&ProofArtifact { bytes: vec![0; 32] }, &inputs)
            .is_err());
    }
}
