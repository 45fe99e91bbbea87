//! Transition records written to the audit trail.
//!
//! Every successful state change of a draft or workflow produces exactly one
//! `TransitionRecord`. The audit writer appends it; records are never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of entity a transition touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSubject {
    Draft,
    Workflow,
}

/// An immutable record of one state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub subject: AuditSubject,
    /// Draft or workflow id.
    pub subject_id: String,
    /// Step index for workflow step resolutions.
    pub step_index: Option<usize>,
    /// Action type of the draft or step involved.
    pub action_type: String,
    /// Status before the transition (`None` on creation).
    pub from_status: Option<String>,
    pub to_status: String,
    /// User id of the actor, or "system" for system transitions.
    pub actor: String,
    /// Free-form detail: rejection reason, entity reference, completion output.
    pub detail: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Actor name recorded for transitions no user initiated.
pub const SYSTEM_ACTOR: &str = "system";
