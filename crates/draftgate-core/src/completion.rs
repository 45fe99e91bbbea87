//! Completion outputs for resolved workflow steps.
//!
//! Every resolved step carries a `CompletionOutput`. Approvals produce a
//! shape specific to the step kind; rejections all share one shape. The
//! builder is pure and runs before the workflow is mutated, so a decision it
//! refuses leaves the step pending.

use serde::Serialize;
use serde_json::{json, Value};

use draftgate_contracts::{
    error::{EngineError, EngineResult},
    payload::QuoteRanking,
    workflow::{CompletionOutput, ReviewDecision, StepActionType},
};
use draftgate_normalize::{normalize_po_draft, normalize_quote_comparison};

/// Reason recorded in every rejection output.
pub const REJECTION_REASON: &str = "rejected_by_reviewer";

#[derive(Serialize)]
struct QuoteSelection<'a> {
    action_type: &'static str,
    /// The supplier the reviewer settled on.
    recommendation: &'a str,
    ai_recommendation: Option<&'a str>,
    is_override: bool,
    rankings: &'a [QuoteRanking],
    summary: &'a [String],
}

/// Build the output for resolving a step of `action_type` with `decision`.
///
/// # Errors
///
/// `Validation` when an approval cannot be completed from the step's draft:
/// no supplier could be selected, the selection is not among the ranked
/// suppliers, or a purchase-order draft has no content.
pub fn completion_output(
    action_type: &StepActionType,
    draft: &Value,
    decision: &ReviewDecision,
) -> EngineResult<CompletionOutput> {
    if !decision.approval {
        return Ok(CompletionOutput {
            summary: format!("{} rejected by reviewer", action_type),
            payload: json!({
                "action_type": action_type.as_str(),
                "reason": REJECTION_REASON,
            }),
        });
    }

    match action_type {
        StepActionType::CompareQuotes => quote_selection(draft, decision),
        StepActionType::PoDraft => purchase_order(draft),
        StepActionType::Other(name) => {
            if draft.is_null() {
                return Err(EngineError::validation(format!(
                    "step '{}' has no draft to approve",
                    name
                )));
            }
            Ok(CompletionOutput {
                summary: format!("{} approved by reviewer", name),
                payload: draft.clone(),
            })
        }
    }
}

fn quote_selection(draft: &Value, decision: &ReviewDecision) -> EngineResult<CompletionOutput> {
    let comparison = normalize_quote_comparison(draft);
    let ai_recommendation = comparison.recommendation.as_deref();

    let selected = decision
        .selected_supplier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(ai_recommendation)
        .ok_or_else(|| {
            EngineError::validation(
                "no supplier selected and the comparison carries no recommendation",
            )
        })?;

    if !comparison.rankings.is_empty() && comparison.ranking_for(selected).is_none() {
        return Err(EngineError::validation(format!(
            "supplier '{}' is not among the ranked suppliers",
            selected
        )));
    }

    let is_override = ai_recommendation != Some(selected);
    let summary = match (is_override, ai_recommendation) {
        (false, _) => format!("Accepted AI recommendation {}", selected),
        (true, Some(ai)) => format!("Selected supplier {} over AI recommendation {}", selected, ai),
        (true, None) => format!("Selected supplier {}", selected),
    };

    let payload = serde_json::to_value(QuoteSelection {
        action_type: "compare_quotes",
        recommendation: selected,
        ai_recommendation,
        is_override,
        rankings: &comparison.rankings,
        summary: &comparison.summary,
    })
    .map_err(|e| EngineError::validation(format!("quote selection is not serializable: {}", e)))?;

    Ok(CompletionOutput { summary, payload })
}

fn purchase_order(draft: &Value) -> EngineResult<CompletionOutput> {
    let po = normalize_po_draft(draft);
    if po.is_empty() {
        return Err(EngineError::validation(
            "purchase-order draft has no content to approve",
        ));
    }

    let summary = match &po.po_number {
        Some(number) => format!("Purchase order {} approved ({} line items)", number, po.line_items.len()),
        None => format!("Purchase order draft approved ({} line items)", po.line_items.len()),
    };
    let payload = serde_json::to_value(&po)
        .map_err(|e| EngineError::validation(format!("purchase order is not serializable: {}", e)))?;

    Ok(CompletionOutput { summary, payload })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use draftgate_contracts::{
        error::EngineError,
        workflow::{ReviewDecision, StepActionType},
    };

    use super::{completion_output, REJECTION_REASON};

    fn comparison() -> serde_json::Value {
        json!({
            "recommendation": "S1",
            "summary": ["S1 is cheapest", "S2 ships faster"],
            "rankings": [
                { "supplier_id": "S1", "score": 0.92, "price": 1180.0 },
                { "supplier_id": "S2", "score": 0.81, "price": 1240.0 }
            ]
        })
    }

    #[test]
    fn test_accepting_the_recommendation() {
        let out = completion_output(&StepActionType::CompareQuotes, &comparison(), &ReviewDecision::approve(0))
            .unwrap();
        assert_eq!(out.summary, "Accepted AI recommendation S1");
        assert_eq!(out.payload["recommendation"], json!("S1"));
        assert_eq!(out.payload["ai_recommendation"], json!("S1"));
        assert_eq!(out.payload["is_override"], json!(false));
        assert_eq!(out.payload["rankings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_overriding_the_recommendation() {
        let decision = ReviewDecision::approve(0).with_supplier(" S2 ");
        let out = completion_output(&StepActionType::CompareQuotes, &comparison(), &decision).unwrap();
        assert_eq!(out.summary, "Selected supplier S2 over AI recommendation S1");
        assert_eq!(out.payload["recommendation"], json!("S2"));
        assert_eq!(out.payload["is_override"], json!(true));
    }

    #[test]
    fn test_selection_must_be_ranked() {
        let decision = ReviewDecision::approve(0).with_supplier("S9");
        assert!(matches!(
            completion_output(&StepActionType::CompareQuotes, &comparison(), &decision),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_no_selection_and_no_recommendation() {
        let draft = json!({ "rankings": [{ "supplier_id": "S1" }] });
        assert!(matches!(
            completion_output(&StepActionType::CompareQuotes, &draft, &ReviewDecision::approve(0)),
            Err(EngineError::Validation { .. })
        ));

        // An explicit selection works without a recommendation.
        let decision = ReviewDecision::approve(0).with_supplier("S1");
        let out = completion_output(&StepActionType::CompareQuotes, &draft, &decision).unwrap();
        assert_eq!(out.summary, "Selected supplier S1");
        assert_eq!(out.payload["ai_recommendation"], json!(null));
    }

    #[test]
    fn test_po_draft_output_is_the_normalized_draft() {
        let draft = json!({
            "po_number": "PO-7",
            "supplier": { "supplier_id": "S1", "name": "Acme Bearings" },
            "line_items": [{ "item_code": "BRG-6204", "quantity": "40", "unit_price": 3.15 }, {}]
        });
        let out = completion_output(&StepActionType::PoDraft, &draft, &ReviewDecision::approve(1)).unwrap();
        assert_eq!(out.summary, "Purchase order PO-7 approved (1 line items)");
        assert_eq!(out.payload["currency"], json!("USD"));
        assert_eq!(out.payload["line_items"][0]["quantity"], json!(40.0));
    }

    #[test]
    fn test_empty_po_draft_cannot_be_approved() {
        for draft in [json!({}), json!(null), json!({ "currency": "EUR" })] {
            assert!(matches!(
                completion_output(&StepActionType::PoDraft, &draft, &ReviewDecision::approve(1)),
                Err(EngineError::Validation { .. })
            ));
        }
    }

    #[test]
    fn test_rejection_shape_is_shared() {
        for action_type in [
            StepActionType::CompareQuotes,
            StepActionType::PoDraft,
            StepActionType::from("notify_supplier"),
        ] {
            // Rejection never inspects the draft.
            let out = completion_output(&action_type, &json!(null), &ReviewDecision::reject(0)).unwrap();
            assert_eq!(out.summary, format!("{} rejected by reviewer", action_type.as_str()));
            assert_eq!(out.payload["reason"], json!(REJECTION_REASON));
            assert_eq!(out.payload["action_type"], json!(action_type.as_str()));
        }
    }

    #[test]
    fn test_other_steps_pass_the_draft_through() {
        let kind = StepActionType::from("notify_supplier");
        let draft = json!({ "channel": "email" });
        let out = completion_output(&kind, &draft, &ReviewDecision::approve(2)).unwrap();
        assert_eq!(out.payload, draft);
        assert_eq!(out.summary, "notify_supplier approved by reviewer");
    }
}
