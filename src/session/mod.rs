//! Match Session Management
//!
//! Manages the lifecycle of concurrent matches from creation to completion.
//! Serializes moves per match behind an async write lock, runs the proof
//! oracle off the executor under a timeout, and appends every accepted
//! transition to the move ledger.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::hash::Field;
use crate::game::evaluate::WordScore;
use crate::game::state::{GameError, MatchState, PlayerId};
use crate::ledger::{LedgerError, MatchId, MoveLedger, MoveRecord};
use crate::proof::bridge::{ProofArtifact, ProofOracle};
use crate::proof::commitment::WordCommitment;
use crate::proof::merkle::MembershipProof;

/// Configuration for the match registry.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on one oracle verification call.
    pub verify_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            verify_timeout: Duration::from_secs(30),
        }
    }
}

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No match registered under this id.
    #[error("match not found")]
    MatchNotFound,

    /// The oracle did not answer within the configured timeout.
    ///
    /// The pending guess is untouched; the caller may retry.
    #[error("proof verification timed out after {0:?}")]
    VerificationTimeout(Duration),

    /// The state machine rejected the move.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The ledger rejected the append.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The oracle task panicked or was cancelled.
    #[error("oracle task failed: {0}")]
    OracleTask(String),
}

/// Registry of all active matches.
///
/// Each match sits behind its own `RwLock`, so moves in different matches
/// never contend. The oracle and ledger are shared across matches and must
/// be safe for concurrent use.
pub struct MatchRegistry {
    config: SessionConfig,
    matches: RwLock<BTreeMap<MatchId, Arc<RwLock<MatchState>>>>,
    oracle: Arc<dyn ProofOracle>,
    ledger: Arc<dyn MoveLedger>,
}

impl MatchRegistry {
    /// Create a registry over a shared oracle and ledger.
    pub fn new(
        config: SessionConfig,
        oracle: Arc<dyn ProofOracle>,
        ledger: Arc<dyn MoveLedger>,
    ) -> Self {
        Self {
            config,
            matches: RwLock::new(BTreeMap::new()),
            oracle,
            ledger,
        }
    }

    /// Create a new match bound to a dictionary root.
    pub async fn create_match(&self, dictionary_root: Field) -> MatchId {
        let id = uuid::Uuid::new_v4().into_bytes();
        let state = MatchState::new(id, dictionary_root);

        let mut matches = self.matches.write().await;
        matches.insert(id, Arc::new(RwLock::new(state)));

        info!(
            match_id = %hex::encode(id),
            root = %hex::encode(dictionary_root),
            "match created"
        );
        id
    }

    /// Get a match by id.
    pub async fn get_match(&self, id: &MatchId) -> Option<Arc<RwLock<MatchState>>> {
        let matches = self.matches.read().await;
        matches.get(id).cloned()
    }

    /// Remove a match.
    pub async fn remove_match(&self, id: &MatchId) {
        let mut matches = self.matches.write().await;
        matches.remove(id);
    }

    /// Get active match count.
    pub async fn match_count(&self) -> usize {
        let matches = self.matches.read().await;
        matches.len()
    }

    /// Drop finished matches from the registry. The ledger keeps their logs.
    ///
    /// Never awaits a match lock while holding the registry lock: handles
    /// are snapshotted first, and a match busy with a verification (its
    /// write lock can be held for up to `verify_timeout`) is simply
    /// skipped until the next pass. Operations on other matches proceed
    /// unhindered throughout.
    pub async fn cleanup(&self) {
        let handles: Vec<(MatchId, Arc<RwLock<MatchState>>)> = {
            let matches = self.matches.read().await;
            matches
                .iter()
                .map(|(id, state)| (*id, Arc::clone(state)))
                .collect()
        };

        let mut to_remove = Vec::new();
        for (id, state) in handles {
            if let Ok(state) = state.try_read() {
                if state.is_finished() {
                    to_remove.push(id);
                }
            }
        }

        if to_remove.is_empty() {
            return;
        }

        let mut matches = self.matches.write().await;
        for id in to_remove {
            matches.remove(&id);
            debug!(match_id = %hex::encode(id), "finished match removed");
        }
    }

    /// Join a match, publishing a word commitment.
    pub async fn join(
        &self,
        match_id: MatchId,
        player: PlayerId,
        commitment: WordCommitment,
    ) -> Result<(), SessionError> {
        let handle = self
            .get_match(&match_id)
            .await
            .ok_or(SessionError::MatchNotFound)?;
        let mut state = handle.write().await;

        state.join(player, commitment)?;
        info!(
            match_id = %hex::encode(match_id),
            player = %hex::encode(player.0),
            "player joined"
        );
        self.record_events(&mut state)?;
        Ok(())
    }

    /// Submit a guess with its dictionary membership proof.
    pub async fn submit_guess(
        &self,
        match_id: MatchId,
        player: PlayerId,
        word: &str,
        proof: &MembershipProof,
    ) -> Result<(), SessionError> {
        let handle = self
            .get_match(&match_id)
            .await
            .ok_or(SessionError::MatchNotFound)?;
        let mut state = handle.write().await;

        state.submit_guess(player, word, proof)?;
        info!(
            match_id = %hex::encode(match_id),
            player = %hex::encode(player.0),
            attempt = state.guesser_attempts(),
            "guess admitted"
        );
        self.record_events(&mut state)?;
        Ok(())
    }

    /// Verify the pending guess against the verifier's commitments.
    ///
    /// The oracle call runs on the blocking pool under the configured
    /// timeout, with this match's write lock held so no competing move can
    /// slip in between the check and the apply. A timeout or rejection
    /// leaves the pending guess in place.
    pub async fn submit_verification(
        &self,
        match_id: MatchId,
        verifier: PlayerId,
        artifact: ProofArtifact,
        classification: WordScore,
    ) -> Result<(), SessionError> {
        let handle = self
            .get_match(&match_id)
            .await
            .ok_or(SessionError::MatchNotFound)?;
        let mut state = handle.write().await;

        let inputs = state.pending_verification(&verifier, &classification)?;

        let oracle = Arc::clone(&self.oracle);
        let verify = tokio::task::spawn_blocking(move || oracle.verify(&artifact, &inputs));
        let accepted = match tokio::time::timeout(self.config.verify_timeout, verify).await {
            Err(_) => {
                warn!(
                    match_id = %hex::encode(match_id),
                    timeout = ?self.config.verify_timeout,
                    "oracle verification timed out"
                );
                return Err(SessionError::VerificationTimeout(self.config.verify_timeout));
            }
            Ok(Err(join_err)) => return Err(SessionError::OracleTask(join_err.to_string())),
            Ok(Ok(result)) => result.map_err(GameError::from)?,
        };

        if !accepted {
            warn!(
                match_id = %hex::encode(match_id),
                verifier = %hex::encode(verifier.0),
                "classification proof rejected"
            );
            return Err(SessionError::Game(GameError::ProofRejected));
        }

        state.apply_verification(verifier, classification)?;
        info!(
            match_id = %hex::encode(match_id),
            verifier = %hex::encode(verifier.0),
            finished = state.is_finished(),
            "guess verified"
        );
        self.record_events(&mut state)?;
        Ok(())
    }

    /// Read a match's full ledger log.
    pub fn ledger_log(&self, match_id: MatchId) -> Vec<MoveRecord> {
        self.ledger.read(match_id)
    }

    /// Drain the state's pending events into the ledger.
    ///
    /// Runs under the match write lock, so this registry is the only
    /// writer and the expected sequence is always current. If an append
    /// fails partway, the unrecorded tail is put back on the state's
    /// buffer and retried on the next transition, so the ledger never
    /// silently falls behind the state it replays.
    fn record_events(&self, state: &mut MatchState) -> Result<(), SessionError> {
        let match_id = state.match_id();
        let mut seq = self.ledger.head(match_id);
        let mut events = state.take_events().into_iter();

        while let Some(event) = events.next() {
            if let Err(err) = self.ledger.append_if(match_id, seq, event.clone()) {
                let mut unrecorded = vec![event];
                unrecorded.extend(events);
                state.requeue_events(unrecorded);
                return Err(err.into());
            }
            seq += 1;
        }
        Ok(())
    }
}
