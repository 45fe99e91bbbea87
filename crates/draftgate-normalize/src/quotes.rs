//! Quote-comparison normalizer.
//!
//! A ranking is only kept when a supplier identifier can be resolved for it;
//! one malformed ranking never discards its siblings.

use serde_json::{Map, Value};

use draftgate_contracts::payload::{QuoteComparisonDraft, QuoteRanking};

use crate::coerce::{field, identifier_at, list_of, number_at, text_at, text_list};

/// Keys tried, in order, to resolve a ranking's supplier.
const SUPPLIER_ID_KEYS: &[&str] = &["supplier_id", "supplierId", "id"];

fn ranking(value: &Value) -> Option<QuoteRanking> {
    let obj = value.as_object()?;
    let supplier_id = identifier_at(obj, SUPPLIER_ID_KEYS).or_else(|| {
        // Some planners nest the supplier: {"supplier": {"id": "S1", "name": ..}}.
        field(obj, &["supplier"])
            .and_then(Value::as_object)
            .and_then(|s| identifier_at(s, SUPPLIER_ID_KEYS))
    })?;

    let nested_name = field(obj, &["supplier"])
        .and_then(Value::as_object)
        .and_then(|s| text_at(s, &["name"]));

    Some(QuoteRanking {
        supplier_id,
        supplier_name: text_at(obj, &["supplier_name", "supplierName", "name"]).or(nested_name),
        score: number_at(obj, &["score"]),
        normalized_score: number_at(obj, &["normalized_score", "normalizedScore"]),
        price: number_at(obj, &["price", "total_price", "totalPrice"]),
        lead_time_days: number_at(obj, &["lead_time_days", "leadTimeDays"]),
        quality_rating: number_at(obj, &["quality_rating", "qualityRating"]),
        risk_score: number_at(obj, &["risk_score", "riskScore"]),
        notes: text_at(obj, &["notes", "rationale"]),
    })
}

pub fn normalize_quote_comparison_object(obj: &Map<String, Value>) -> QuoteComparisonDraft {
    QuoteComparisonDraft {
        recommendation: identifier_at(
            obj,
            &["recommendation", "recommended_supplier_id", "recommendedSupplierId"],
        ),
        summary: text_list(field(obj, &["summary"])),
        rankings: list_of(field(obj, &["rankings", "ranking", "quotes"]), ranking),
    }
}

/// Normalize a raw `compare_quotes` draft.
pub fn normalize_quote_comparison(raw: &Value) -> QuoteComparisonDraft {
    raw.as_object()
        .map(normalize_quote_comparison_object)
        .unwrap_or_default()
}
