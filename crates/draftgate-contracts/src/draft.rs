//! Action draft records and lifecycle types.
//!
//! An `ActionDraft` is an AI proposal awaiting a human decision. It moves
//! `drafted → approved | rejected | expired` exactly once; all three targets
//! are terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an action draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DraftId(pub uuid::Uuid);

impl DraftId {
    /// Create a new, unique draft ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The kinds of single-shot action the planner can draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftActionType {
    RfqDraft,
    SupplierMessage,
    MaintenanceChecklist,
    #[serde(rename = "inventory_whatif")]
    InventoryWhatIf,
}

impl DraftActionType {
    pub const ALL: [DraftActionType; 4] = [
        DraftActionType::RfqDraft,
        DraftActionType::SupplierMessage,
        DraftActionType::MaintenanceChecklist,
        DraftActionType::InventoryWhatIf,
    ];

    /// Wire name, also used as the action key by the capability gate.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftActionType::RfqDraft => "rfq_draft",
            DraftActionType::SupplierMessage => "supplier_message",
            DraftActionType::MaintenanceChecklist => "maintenance_checklist",
            DraftActionType::InventoryWhatIf => "inventory_whatif",
        }
    }
}

impl fmt::Display for DraftActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an action draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Drafted,
    Approved,
    Rejected,
    Expired,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Drafted => "drafted",
            DraftStatus::Approved => "approved",
            DraftStatus::Rejected => "rejected",
            DraftStatus::Expired => "expired",
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DraftStatus::Drafted)
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source document the planner cited while drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub doc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Citation {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            chunk_id: None,
            doc_version: None,
            snippet: None,
        }
    }
}

/// The record an approval materialized.
///
/// Kept as one value so `entity_type` and `entity_id` are always set together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: String,
}

/// An AI-proposed action awaiting approval.
///
/// `payload` holds the raw JSON as the planner produced it. The typed view is
/// derived on each read by the normalizer and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDraft {
    pub id: DraftId,
    pub action_type: DraftActionType,
    pub status: DraftStatus,
    pub payload: serde_json::Value,
    pub summary: Option<String>,
    /// Planner confidence in [0.0, 1.0].
    pub confidence: Option<f64>,
    pub warnings: Vec<String>,
    pub needs_human_review: bool,
    pub citations: Vec<Citation>,
    /// Set only when `status` is `Approved`.
    pub entity: Option<EntityRef>,
    /// Write-once; set only when `status` is `Rejected`.
    pub rejection_reason: Option<String>,
    /// User who approved or rejected the draft.
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActionDraft {
    /// Build a fresh draft in `Drafted` state from creation input.
    ///
    /// Out-of-range or non-finite confidence values are dropped.
    pub fn from_new(new: NewDraft, now: DateTime<Utc>) -> Self {
        let confidence = new
            .confidence
            .filter(|c| c.is_finite() && (0.0..=1.0).contains(c));
        let summary = new
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            id: DraftId::new(),
            action_type: new.action_type,
            status: DraftStatus::Drafted,
            payload: new.payload,
            summary,
            confidence,
            warnings: new.warnings,
            needs_human_review: new.needs_human_review,
            citations: new.citations,
            entity: None,
            rejection_reason: None,
            resolved_by: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.entity.as_ref().map(|e| e.entity_type.as_str())
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity.as_ref().map(|e| e.entity_id.as_str())
    }
}

/// Input to `DraftService::create`.
#[derive(Debug, Clone)]
pub struct NewDraft {
    pub action_type: DraftActionType,
    pub payload: serde_json::Value,
    pub summary: Option<String>,
    pub confidence: Option<f64>,
    pub warnings: Vec<String>,
    pub citations: Vec<Citation>,
    pub needs_human_review: bool,
}

impl NewDraft {
    /// A draft with only its action type and raw payload.
    pub fn new(action_type: DraftActionType, payload: serde_json::Value) -> Self {
        Self {
            action_type,
            payload,
            summary: None,
            confidence: None,
            warnings: Vec::new(),
            citations: Vec::new(),
            needs_human_review: false,
        }
    }
}

/// What the caller asks the planner to draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub action_type: DraftActionType,
    /// Free-text instructions for the planner.
    pub query: String,
    /// Structured inputs (e.g. selected line items, asset ids).
    #[serde(default)]
    pub inputs: serde_json::Value,
    /// Retrieval filters forwarded verbatim.
    #[serde(default)]
    pub filters: serde_json::Value,
}

impl PlanRequest {
    pub fn new(action_type: DraftActionType, query: impl Into<String>) -> Self {
        Self {
            action_type,
            query: query.into(),
            inputs: serde_json::Value::Null,
            filters: serde_json::Value::Null,
        }
    }

    pub fn with_inputs(mut self, inputs: serde_json::Value) -> Self {
        self.inputs = inputs;
        self
    }
}

/// A resolved link to a cited document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub doc_id: String,
    pub url: String,
}

/// Result of resolving a draft's citations to downloadable sources.
///
/// Lookup failures never fail the call; they are reported in `warnings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationSources {
    pub links: Vec<SourceLink>,
    pub warnings: Vec<String>,
}
