//! Move Ledger
//!
//! Append-only record of everything that happened in a match. Each accepted
//! transition lands here as a timestamped, sequence-numbered record, so a
//! finished match can be replayed or audited move by move.
//!
//! Appends use optimistic concurrency: the writer states the sequence
//! number it expects to write, and a mismatch is rejected without touching
//! the log. With the session layer's per-match write lock there is a single
//! writer per match and conflicts do not occur in practice; the check
//! guards alternative deployments where that does not hold.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::events::GameEvent;

/// Match identifier (UUID as bytes).
pub type MatchId = [u8; 16];

/// One appended move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Zero-based position in the match's log.
    pub seq: u64,
    /// The match this record belongs to.
    pub match_id: MatchId,
    /// When the record was appended.
    pub at: DateTime<Utc>,
    /// The accepted transition.
    pub event: GameEvent,
}

/// Ledger failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The log advanced past the sequence number the writer expected.
    #[error("ledger version conflict: expected seq {expected}, log is at {actual}")]
    VersionConflict {
        /// Sequence number the writer expected to append at.
        expected: u64,
        /// Next sequence number the log will actually accept.
        actual: u64,
    },
}

/// Append-only per-match event log.
pub trait MoveLedger: Send + Sync {
    /// Append `event` at sequence `expected_seq`, or fail without writing.
    fn append_if(
        &self,
        match_id: MatchId,
        expected_seq: u64,
        event: GameEvent,
    ) -> Result<MoveRecord, LedgerError>;

    /// Read a match's full log in append order.
    fn read(&self, match_id: MatchId) -> Vec<MoveRecord>;

    /// Next sequence number the log will accept for a match.
    fn head(&self, match_id: MatchId) -> u64;
}

/// In-memory ledger. Per-process only; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    logs: RwLock<BTreeMap<MatchId, Vec<MoveRecord>>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MoveLedger for MemoryLedger {
    fn append_if(
        &self,
        match_id: MatchId,
        expected_seq: u64,
        event: GameEvent,
    ) -> Result<MoveRecord, LedgerError> {
        let mut logs = self.logs.write().expect("ledger lock poisoned");
        let log = logs.entry(match_id).or_default();

        let actual = log.len() as u64;
        if expected_seq != actual {
            return Err(LedgerError::VersionConflict {
                expected: expected_seq,
                actual,
            });
        }

        let record = MoveRecord {
            seq: actual,
            match_id,
            at: Utc::now(),
            event,
        };
        log.push(record.clone());
        Ok(record)
    }

    fn read(&self, match_id: MatchId) -> Vec<MoveRecord> {
        self.logs
            .read()
            .expect("ledger lock poisoned")
            .get(&match_id)
            .cloned()
            .unwrap_or_default()
    }

    fn head(&self, match_id: MatchId) -> u64 {
        self.logs
            .read()
            .expect("ledger lock poisoned")
            .get(&match_id)
            .map(|log| log.len() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::PlayerId;

    fn joined(player: u8) -> GameEvent {
        GameEvent::PlayerJoined {
            player: PlayerId::new([player; 16]),
        }
    }

    #[test]
    fn test_append_and_read_in_order() {
        let ledger = MemoryLedger::new();
        let id = [1u8; 16];

        ledger.append_if(id, 0, joined(1)).unwrap();
        ledger.append_if(id, 1, joined(2)).unwrap();

        let log = ledger.read(id);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].seq, 0);
        assert_eq!(log[1].seq, 1);
        assert_eq!(log[0].event, joined(1));
        assert_eq!(ledger.head(id), 2);
    }

    #[test]
    fn test_stale_append_rejected() {
        let ledger = MemoryLedger::new();
        let id = [1u8; 16];
        ledger.append_if(id, 0, joined(1)).unwrap();

        // Writer raced behind; nothing is written
        let err = ledger.append_if(id, 0, joined(2)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::VersionConflict {
                expected: 0,
                actual: 1
            }
        );
        assert_eq!(ledger.read(id).len(), 1);

        // So is writing into the future
        assert!(ledger.append_if(id, 5, joined(2)).is_err());
    }

    #[test]
    fn test_matches_are_isolated() {
        let ledger = MemoryLedger::new();
        ledger.append_if([1u8; 16], 0, joined(1)).unwrap();

        assert!(ledger.read([2u8; 16]).is_empty());
        assert_eq!(ledger.head([2u8; 16]), 0);
        ledger.append_if([2u8; 16], 0, joined(9)).unwrap();
        assert_eq!(ledger.read([1u8; 16]).len(), 1);
    }

    #[test]
    fn test_records_carry_timestamps() {
        let ledger = MemoryLedger::new();
        let before = Utc::now();
        let record = ledger.append_if([1u8; 16], 0, joined(1)).unwrap();
        assert!(record.at >= before && record.at <= Utc::now());
    }
}
