//! Match State Machine
//!
//! Turn-based protocol for one two-player match: join with commitments,
//! alternate guess/verify cycles, detect the win. Every operation is a
//! single atomic transition; a rejected operation leaves the state exactly
//! as it was.
//!
//! Core invariants, enforced by construction:
//! - `guesser_attempts - verifier_attempts` is always 0 or 1
//! - at most one guess is unverified at any time
//! - the winner is set at most once, by a verified all-correct guess,
//!   and the match is terminal afterwards

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::hash::Field;
use crate::core::words::{word_to_field, word_to_letter_codes, CodecError, WORD_LENGTH};
use crate::game::evaluate::{is_winning, to_trits, WordScore};
use crate::game::events::GameEvent;
use crate::proof::bridge::{CircuitInputs, OracleError, ProofArtifact, ProofOracle};
use crate::proof::commitment::WordCommitment;
use crate::proof::merkle::MembershipProof;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().into_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// =============================================================================
// GUESS RECORD
// =============================================================================

/// One submitted guess and, once verified, its classification.
///
/// Created unverified; mutated exactly once when the verification proof is
/// accepted, never again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    /// The guessing player.
    pub player: PlayerId,
    /// The guessed word (lowercase).
    pub word: String,
    /// Letter codes of the guess, in order.
    pub letter_codes: [u8; WORD_LENGTH],
    /// 1-based ordinal of this guess across the match.
    pub submitted_at: u32,
    /// Verified classification, absent while pending.
    pub classification: Option<WordScore>,
    /// Whether the verification proof has been accepted.
    pub verified: bool,
}

// =============================================================================
// MATCH PHASE
// =============================================================================

/// Current phase of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for both players to join with commitments.
    #[default]
    AwaitingPlayers,
    /// Waiting for the turn player to guess.
    AwaitingGuess,
    /// A guess is pending classification by the opposing secret holder.
    AwaitingVerification,
    /// Match ended; winner is set and immutable.
    Finished,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Rejected transitions and validation failures.
///
/// Input-validation and protocol-sequencing errors are safe to retry once
/// preconditions are met; `MembershipRejected` and `ProofRejected` are
/// terminal for the move that produced them; `Oracle` means the prover
/// backend was unavailable and the whole verify step may be retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Two players have already joined.
    #[error("game already has two players")]
    GameAlreadyFull,

    /// This player has already joined.
    #[error("player has already joined this match")]
    PlayerAlreadyJoined,

    /// The submitted commitment duplicates the other player's.
    #[error("word commitment duplicates the other player's")]
    DuplicateCommitment,

    /// Both players must join before play starts.
    #[error("match has not started")]
    NotStarted,

    /// The match is over; no further moves are accepted.
    #[error("match is finished")]
    MatchFinished,

    /// Some other player holds the guessing turn.
    #[error("not this player's turn to guess")]
    NotYourTurn,

    /// The previous guess has not been verified yet.
    #[error("previous guess is still awaiting verification")]
    PendingVerificationExists,

    /// There is no guess awaiting verification.
    #[error("no guess is awaiting verification")]
    NoVerificationPending,

    /// The pending guess must be verified by the other player.
    #[error("not this player's turn to verify")]
    NotYourTurnToVerify,

    /// The dictionary membership proof did not check out.
    #[error("membership proof rejected: {0}")]
    MembershipRejected(&'static str),

    /// The oracle rejected the classification proof.
    #[error("classification proof rejected")]
    ProofRejected,

    /// The guessed word failed codec validation.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The proof oracle was unavailable.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Complete state of one match.
///
/// Fields are private; consumers read through the query accessors and the
/// event stream, never by re-deriving state from counters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    /// Match identifier.
    match_id: [u8; 16],

    /// Root of the dictionary every guess must prove membership in.
    dictionary_root: Field,

    /// Players in join order (at most 2).
    players: Vec<PlayerId>,

    /// Published word commitments, one per joined player.
    commitments: BTreeMap<PlayerId, WordCommitment>,

    /// All guesses, in submission order.
    guesses: Vec<GuessRecord>,

    /// Guesses submitted so far (shared counter across both players).
    guesser_attempts: u32,

    /// Verifications completed so far.
    verifier_attempts: u32,

    /// Player holding the guessing turn, when in `AwaitingGuess`.
    turn_to_play: Option<PlayerId>,

    /// Player obliged to verify, when in `AwaitingVerification`.
    turn_to_verify: Option<PlayerId>,

    /// Winner, set once by a verified all-correct guess.
    winner: Option<PlayerId>,

    /// Current phase.
    phase: MatchPhase,

    /// Events generated by accepted transitions, drained by the caller.
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl MatchState {
    /// Create a fresh match bound to a dictionary root.
    pub fn new(match_id: [u8; 16], dictionary_root: Field) -> Self {
        Self {
            match_id,
            dictionary_root,
            players: Vec::new(),
            commitments: BTreeMap::new(),
            guesses: Vec::new(),
            guesser_attempts: 0,
            verifier_attempts: 0,
            turn_to_play: None,
            turn_to_verify: None,
            winner: None,
            phase: MatchPhase::AwaitingPlayers,
            pending_events: Vec::new(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Join the match, publishing a word commitment.
    ///
    /// The second join starts play with the first joiner to guess.
    pub fn join(&mut self, player: PlayerId, commitment: WordCommitment) -> Result<(), GameError> {
        if self.phase != MatchPhase::AwaitingPlayers {
            return Err(GameError::GameAlreadyFull);
        }
        if self.players.contains(&player) {
            return Err(GameError::PlayerAlreadyJoined);
        }
        if self.commitments.values().any(|c| *c == commitment) {
            return Err(GameError::DuplicateCommitment);
        }

        self.players.push(player);
        self.commitments.insert(player, commitment);
        self.push_event(GameEvent::PlayerJoined { player });

        if self.players.len() == 2 {
            let first = self.players[0];
            self.turn_to_play = Some(first);
            self.phase = MatchPhase::AwaitingGuess;
            self.push_event(GameEvent::MatchStarted { first_to_play: first });
        }

        Ok(())
    }

    /// Submit a guess with its dictionary membership proof.
    ///
    /// Admitted only when it is `player`'s turn, no guess is pending, the
    /// word passes the codec, and the proof binds this exact word to the
    /// match's dictionary root. The guess enters unverified; the opponent
    /// must classify it next.
    pub fn submit_guess(
        &mut self,
        player: PlayerId,
        word: &str,
        proof: &MembershipProof,
    ) -> Result<(), GameError> {
        match self.phase {
            MatchPhase::Finished => return Err(GameError::MatchFinished),
            MatchPhase::AwaitingPlayers => return Err(GameError::NotStarted),
            MatchPhase::AwaitingVerification => return Err(GameError::PendingVerificationExists),
            MatchPhase::AwaitingGuess => {}
        }
        if self.turn_to_play != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        debug_assert_eq!(self.guesser_attempts, self.verifier_attempts);

        let letter_codes = word_to_letter_codes(word)?;
        let leaf = word_to_field(word)?;

        if proof.leaf != leaf {
            return Err(GameError::MembershipRejected(
                "proof leaf does not encode the guessed word",
            ));
        }
        if proof.root != self.dictionary_root {
            return Err(GameError::MembershipRejected(
                "proof root does not match the match dictionary",
            ));
        }
        if !proof.verify(&self.dictionary_root) {
            return Err(GameError::MembershipRejected(
                "inclusion path does not reproduce the root",
            ));
        }

        self.guesser_attempts += 1;
        let word = word.to_ascii_lowercase();
        self.guesses.push(GuessRecord {
            player,
            word: word.clone(),
            letter_codes,
            submitted_at: self.guesser_attempts,
            classification: None,
            verified: false,
        });

        self.turn_to_verify = Some(self.opponent_of(&player));
        self.phase = MatchPhase::AwaitingVerification;
        self.push_event(GameEvent::GuessSubmitted {
            player,
            word,
            attempt: self.guesser_attempts,
        });

        Ok(())
    }

    /// Verify the pending guess: check the oracle proof, then apply.
    ///
    /// The guess is checked against the VERIFIER's own published
    /// commitments; a player only ever verifies guesses aimed at their own
    /// secret. `Ok(false)` from the oracle surfaces as
    /// [`GameError::ProofRejected`] with the pending guess untouched.
    pub fn submit_verification(
        &mut self,
        verifier: PlayerId,
        artifact: &ProofArtifact,
        classification: WordScore,
        oracle: &dyn ProofOracle,
    ) -> Result<(), GameError> {
        let inputs = self.pending_verification(&verifier, &classification)?;

        if !oracle.verify(artifact, &inputs)? {
            return Err(GameError::ProofRejected);
        }

        self.apply_verification(verifier, classification)
    }

    /// Precondition checks plus the public inputs for the pending guess.
    ///
    /// Read-only. The session layer uses this to run the oracle off the
    /// executor, then commits with [`MatchState::apply_verification`]
    /// under the same lock. Crate-internal: outside callers go through
    /// [`MatchState::submit_verification`], which cannot skip the oracle.
    pub(crate) fn pending_verification(
        &self,
        verifier: &PlayerId,
        classification: &WordScore,
    ) -> Result<CircuitInputs, GameError> {
        match self.phase {
            MatchPhase::Finished => return Err(GameError::MatchFinished),
            MatchPhase::AwaitingPlayers | MatchPhase::AwaitingGuess => {
                return Err(GameError::NoVerificationPending)
            }
            MatchPhase::AwaitingVerification => {}
        }
        if self.turn_to_verify != Some(*verifier) {
            return Err(GameError::NotYourTurnToVerify);
        }

        let record = self
            .guesses
            .last()
            .filter(|r| !r.verified)
            .ok_or(GameError::NoVerificationPending)?;
        let commitment = self
            .commitments
            .get(verifier)
            .ok_or(GameError::NoVerificationPending)?;

        Ok(CircuitInputs::new(
            commitment,
            &record.letter_codes,
            classification,
        ))
    }

    /// Commit an oracle-accepted classification onto the pending guess.
    ///
    /// Marks the record verified, advances the counters, and hands the
    /// next guessing turn to the verifier (guessers alternate round by
    /// round). An all-correct classification finishes the match instead.
    /// Crate-internal: callers must have an oracle acceptance in hand, so
    /// a classification can never enter the match unvouched.
    pub(crate) fn apply_verification(
        &mut self,
        verifier: PlayerId,
        classification: WordScore,
    ) -> Result<(), GameError> {
        // Re-run the preconditions so this is safe to call directly.
        self.pending_verification(&verifier, &classification)?;

        let index = self.guesses.len() - 1;
        let (guesser, word) = {
            let record = &mut self.guesses[index];
            record.classification = Some(classification);
            record.verified = true;
            (record.player, record.word.clone())
        };

        self.verifier_attempts += 1;
        self.turn_to_verify = None;
        self.push_event(GameEvent::GuessVerified {
            verifier,
            guesser,
            word,
            classification: to_trits(&classification),
        });

        if is_winning(&classification) {
            self.winner = Some(guesser);
            self.turn_to_play = None;
            self.phase = MatchPhase::Finished;
            self.push_event(GameEvent::MatchWon {
                winner: guesser,
                guesses: self.guesser_attempts,
            });
        } else {
            self.turn_to_play = Some(verifier);
            self.phase = MatchPhase::AwaitingGuess;
        }

        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Match identifier.
    pub fn match_id(&self) -> [u8; 16] {
        self.match_id
    }

    /// Dictionary root guesses are checked against.
    pub fn dictionary_root(&self) -> Field {
        self.dictionary_root
    }

    /// Players in join order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// A player's published commitment, if they joined.
    pub fn commitment_of(&self, player: &PlayerId) -> Option<&WordCommitment> {
        self.commitments.get(player)
    }

    /// All guesses in submission order.
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    /// Most recent guess, verified or pending.
    pub fn last_guess(&self) -> Option<&GuessRecord> {
        self.guesses.last()
    }

    /// Guesses submitted so far.
    pub fn guesser_attempts(&self) -> u32 {
        self.guesser_attempts
    }

    /// Verifications completed so far.
    pub fn verifier_attempts(&self) -> u32 {
        self.verifier_attempts
    }

    /// Whose turn it is to guess, if anyone's.
    pub fn turn_to_play(&self) -> Option<PlayerId> {
        self.turn_to_play
    }

    /// Who must verify the pending guess, if any.
    pub fn turn_to_verify(&self) -> Option<PlayerId> {
        self.turn_to_verify
    }

    /// The winner, once the match is finished by a win.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Whether the match is over.
    pub fn is_finished(&self) -> bool {
        self.phase == MatchPhase::Finished
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Put taken-but-unrecorded events back at the front of the buffer.
    ///
    /// Used when persisting a drained batch fails partway: the remainder
    /// must precede anything a later transition emits, so the recorded
    /// stream never skips or reorders a move.
    pub(crate) fn requeue_events(&mut self, mut events: Vec<GameEvent>) {
        events.append(&mut self.pending_events);
        self.pending_events = events;
    }

    /// The other player. Only called once both players have joined.
    fn opponent_of(&self, player: &PlayerId) -> PlayerId {
        if self.players[0] == *player {
            self.players[1]
        } else {
            self.players[0]
        }
    }

    fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
