//! Planner reply intake.
//!
//! The planner is an untrusted, occasionally flaky collaborator. Its reply is
//! expected to look like `{"draft": {...}}`. Intake runs in two phases:
//!
//! 1. **Presence**: a reply without a `draft` object is unusable and becomes
//!    `UpstreamUnavailable`.
//! 2. **Structure**: the envelope is checked against `reply_schema()` with the
//!    `jsonschema` crate. Violations are not fatal: each one is recorded as a
//!    draft warning and the affected fields are normalized field by field.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use draftgate_contracts::{
    draft::{DraftActionType, NewDraft},
    error::{EngineError, EngineResult},
};

use crate::citations::normalize_citations;
use crate::coerce::{field, flag_at, number_at, text_at, text_list};

/// Prefix on warnings produced by the structural check.
pub const REPLY_WARNING_PREFIX: &str = "planner reply";

fn reply_schema() -> Value {
    json!({
        "type": "object",
        "required": ["draft"],
        "properties": {
            "draft": {
                "type": "object",
                "properties": {
                    "payload": { "type": "object" },
                    "summary": { "type": "string" },
                    "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
                    "warnings": { "type": "array", "items": { "type": "string" } },
                    "citations": {
                        "type": "array",
                        "items": { "type": "object", "required": ["doc_id"] }
                    },
                    "needs_human_review": { "type": "boolean" }
                }
            }
        }
    })
}

/// Collect structural deviations of `reply` from the expected envelope.
fn structural_warnings(reply: &Value) -> Vec<String> {
    let schema = reply_schema();
    match jsonschema::validator_for(&schema) {
        Ok(validator) => validator
            .iter_errors(reply)
            .map(|error| {
                let message = format!("{REPLY_WARNING_PREFIX}: {} at {}", error, error.instance_path);
                debug!(%message, "planner reply deviates from expected envelope");
                message
            })
            .collect(),
        Err(e) => {
            // The schema is a constant; this only fires if it is edited badly.
            warn!(error = %e, "planner reply schema failed to compile");
            Vec::new()
        }
    }
}

/// Turn a raw planner reply into creation input for `action_type`.
///
/// The payload is taken from `draft.payload`; a draft without one is read as
/// a flat payload. The payload itself is stored raw and normalized on read.
pub fn intake_reply(action_type: DraftActionType, reply: &Value) -> EngineResult<NewDraft> {
    let draft: &Map<String, Value> = reply
        .get("draft")
        .and_then(Value::as_object)
        .ok_or_else(|| EngineError::upstream("planner reply carried no draft"))?;

    let mut warnings = text_list(field(draft, &["warnings"]));
    warnings.extend(structural_warnings(reply));

    let payload = match field(draft, &["payload"]) {
        Some(p) if p.is_object() => p.clone(),
        _ => Value::Object(draft.clone()),
    };

    Ok(NewDraft {
        action_type,
        payload,
        summary: text_at(draft, &["summary"]),
        confidence: number_at(draft, &["confidence"]),
        warnings,
        citations: normalize_citations(field(draft, &["citations"])),
        needs_human_review: flag_at(draft, &["needs_human_review", "needsHumanReview"])
            .unwrap_or(false),
    })
}
