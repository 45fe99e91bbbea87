//! # draftgate-audit
//!
//! Append-only, SHA-256 hash-chained trail of every draft and workflow
//! transition.
//!
//! ## Overview
//!
//! Each `TransitionRecord` the engine produces is wrapped in an `AuditEvent`
//! that links to the previous event via its SHA-256 hash. Changing any
//! stored event breaks the chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftgate_audit::InMemoryAuditWriter;
//!
//! let audit = Arc::new(InMemoryAuditWriter::new("procurement"));
//! // Share `audit` between DraftService and WorkflowEngine.
//! assert!(audit.verify_integrity());
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::Utc;
    use serde_json::json;

    use draftgate_contracts::audit::{AuditSubject, TransitionRecord};
    use draftgate_core::traits::AuditWriter;

    use super::{verify_chain, AuditEvent, InMemoryAuditWriter};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_record(subject_id: &str, to_status: &str) -> TransitionRecord {
        TransitionRecord {
            subject: AuditSubject::Draft,
            subject_id: subject_id.to_string(),
            step_index: None,
            action_type: "rfq_draft".to_string(),
            from_status: Some("drafted".to_string()),
            to_status: to_status.to_string(),
            actor: "rev-1".to_string(),
            detail: json!({ "entity_id": "rfq-1" }),
            timestamp: Utc::now(),
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_hash_chain_integrity() {
        let writer = InMemoryAuditWriter::new("trail-integrity");
        writer.write(&make_record("d-1", "drafted")).unwrap();
        writer.write(&make_record("d-1", "approved")).unwrap();
        writer.write(&make_record("d-2", "rejected")).unwrap();

        assert!(writer.verify_integrity(), "chain must be valid after sequential writes");
        assert_eq!(writer.len(), 3);
    }

    /// Mutating any stored record breaks the chain.
    #[test]
    fn test_tamper_detection() {
        let writer = InMemoryAuditWriter::new("trail-tamper");
        writer.write(&make_record("d-1", "drafted")).unwrap();
        writer.write(&make_record("d-1", "approved")).unwrap();

        {
            let mut state = writer.state.lock().unwrap();
            state.events[0].record.actor = "mallory".to_string();
        }

        assert!(!writer.verify_integrity(), "chain must detect a rewritten actor");
    }

    /// Dropping an event from the middle of an export is detected.
    #[test]
    fn test_removed_event_is_detected() {
        let writer = InMemoryAuditWriter::new("trail-gap");
        for status in ["drafted", "approved", "expired"] {
            writer.write(&make_record("d-1", status)).unwrap();
        }

        let mut events = writer.export_log().events;
        events.remove(1);
        assert!(!verify_chain(&events));
    }

    #[test]
    fn test_genesis_and_terminal_hash() {
        let writer = InMemoryAuditWriter::new("trail-genesis");
        let empty = writer.export_log();
        assert!(empty.terminal_hash.is_empty());
        assert!(writer.is_empty());

        writer.write(&make_record("d-1", "drafted")).unwrap();
        writer.write(&make_record("d-1", "approved")).unwrap();

        let log = writer.export_log();
        assert_eq!(log.trail_id, "trail-genesis");
        assert_eq!(log.events[0].prev_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(log.events[1].prev_hash, log.events[0].this_hash);
        assert_eq!(log.terminal_hash, log.events[1].this_hash);
        assert!(verify_chain(&log.events));
    }

    #[test]
    fn test_records_for_subject() {
        let writer = InMemoryAuditWriter::new("trail-subject");
        writer.write(&make_record("d-1", "drafted")).unwrap();
        writer.write(&make_record("d-2", "drafted")).unwrap();
        writer.write(&make_record("d-1", "approved")).unwrap();

        let history = writer.records_for("d-1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].to_status, "approved");
        assert!(writer.records_for("d-9").is_empty());
    }

    /// Writes from many threads still form one valid chain.
    #[test]
    fn test_concurrent_writes_keep_chain_valid() {
        let writer = Arc::new(InMemoryAuditWriter::new("trail-threads"));

        thread::scope(|scope| {
            for t in 0..4 {
                let writer = Arc::clone(&writer);
                scope.spawn(move || {
                    for i in 0..25 {
                        writer
                            .write(&make_record(&format!("d-{t}-{i}"), "drafted"))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(writer.len(), 100);
        assert!(writer.verify_integrity());
    }

    #[test]
    fn test_verify_empty() {
        assert!(InMemoryAuditWriter::new("trail-empty").verify_integrity());
        assert!(verify_chain(&[]));
    }
}
