//! In-memory implementation of `AuditWriter`.
//!
//! `InMemoryAuditWriter` keeps one hash chain for every transition the
//! engine makes, drafts and workflows alike, in the order the writes
//! arrive. The chain lives behind a `Mutex`, so the draft service and the
//! workflow engine can share one writer across threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::debug;

use draftgate_contracts::{
    audit::TransitionRecord,
    error::{EngineError, EngineResult},
};
use draftgate_core::traits::AuditWriter;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    /// All events written so far, in append order.
    pub(crate) events: Vec<AuditEvent>,

    /// The next sequence number to assign.
    pub(crate) sequence: u64,

    /// `this_hash` of the last event, or `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// An append-only audit writer backed by a SHA-256 hash chain.
pub struct InMemoryAuditWriter {
    trail_id: String,
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryAuditWriter {
    pub fn new(trail_id: impl Into<String>) -> Self {
        let state = InMemoryState {
            events: Vec::new(),
            sequence: 0,
            last_hash: AuditEvent::GENESIS_HASH.to_string(),
        };
        Self {
            trail_id: trail_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn trail_id(&self) -> &str {
        &self.trail_id
    }

    // Readers still get the events after a writer panicked; the chain check
    // tells them whether to trust them.
    fn read(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Export every event written so far.
    pub fn export_log(&self) -> AuditLog {
        let state = self.read();
        AuditLog {
            trail_id: self.trail_id.clone(),
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash: state
                .events
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        }
    }

    /// Transition records of one draft or workflow, oldest first.
    pub fn records_for(&self, subject_id: &str) -> Vec<TransitionRecord> {
        self.read()
            .events
            .iter()
            .filter(|e| e.record.subject_id == subject_id)
            .map(|e| e.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verify that the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().events)
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditWriter {
    /// Append one transition record to the chain.
    ///
    /// Fails with `AuditWriteFailed` if the chain lock is poisoned; the
    /// caller's transition is then not committed.
    fn write(&self, record: &TransitionRecord) -> EngineResult<()> {
        let mut state = self.state.lock().map_err(|e| EngineError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_event(&self.trail_id, sequence, record, &prev_hash)?;

        debug!(
            trail_id = %self.trail_id,
            sequence,
            subject_id = %record.subject_id,
            to_status = %record.to_status,
            "transition audited"
        );

        state.events.push(AuditEvent {
            sequence,
            trail_id: self.trail_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        Ok(())
    }
}
