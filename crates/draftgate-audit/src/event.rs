//! Audit event and log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use draftgate_contracts::audit::TransitionRecord;

/// A single entry in the hash chain.
///
/// Modifying any field, including those of the embedded `record`,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The trail this event belongs to.
    pub trail_id: String,

    pub record: TransitionRecord,

    /// Hash of the previous event, or `GENESIS_HASH` for the first one.
    pub prev_hash: String,

    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A point-in-time export of a whole trail.
///
/// `terminal_hash` is the `this_hash` of the last event and commits to the
/// entire log; it is empty when the trail is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub trail_id: String,
    pub events: Vec<AuditEvent>,
    pub exported_at: DateTime<Utc>,
    pub terminal_hash: String,
}
