//! # draftgate-normalize
//!
//! Normalization of AI-generated JSON into typed payload records.
//!
//! Normalization never fails. Each field is coerced on its own:
//!
//! - strings are trimmed, and empty strings count as absent;
//! - numbers must be finite, and numeric strings must parse completely;
//! - list elements are validated one by one and bad ones are dropped;
//! - nested records that end up with no valid field are pruned from their
//!   parent instead of appearing as empty containers.
//!
//! The [`intake`] module handles the planner's reply envelope, using the
//! `jsonschema` crate for the structural check.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use draftgate_normalize::{normalize_step, normalize_draft};
//!
//! let view = normalize_step(&StepActionType::CompareQuotes, &raw_json);
//! ```

pub mod actions;
pub mod citations;
pub mod coerce;
pub mod intake;
pub mod purchase_order;
pub mod quotes;

use serde_json::{Map, Value};

use draftgate_contracts::{
    draft::DraftActionType,
    payload::{DraftPayload, StepDraft},
    workflow::StepActionType,
};

pub use citations::normalize_citations;
pub use intake::intake_reply;
pub use purchase_order::normalize_po_draft;
pub use quotes::normalize_quote_comparison;

/// Normalize the raw payload of an action draft.
///
/// Non-object input yields the empty payload of the requested shape.
pub fn normalize_draft(action_type: DraftActionType, raw: &Value) -> DraftPayload {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    match action_type {
        DraftActionType::RfqDraft => DraftPayload::RfqDraft(actions::normalize_rfq(obj)),
        DraftActionType::SupplierMessage => {
            DraftPayload::SupplierMessage(actions::normalize_supplier_message(obj))
        }
        DraftActionType::MaintenanceChecklist => {
            DraftPayload::MaintenanceChecklist(actions::normalize_maintenance_checklist(obj))
        }
        DraftActionType::InventoryWhatIf => {
            DraftPayload::InventoryWhatIf(actions::normalize_inventory_whatif(obj))
        }
    }
}

/// Normalize the raw draft of a workflow step.
///
/// Step kinds without a dedicated shape pass through unchanged.
pub fn normalize_step(action_type: &StepActionType, raw: &Value) -> StepDraft {
    match action_type {
        StepActionType::CompareQuotes => StepDraft::CompareQuotes(normalize_quote_comparison(raw)),
        StepActionType::PoDraft => StepDraft::PoDraft(normalize_po_draft(raw)),
        StepActionType::Other(_) => StepDraft::Other(raw.clone()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
