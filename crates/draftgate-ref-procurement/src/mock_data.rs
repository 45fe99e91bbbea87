//! Simulated procurement data for the reference runtime.
//!
//! All data in this module is hardcoded and fictional. No external systems are
//! contacted. The planner replies are untidy (camelCase keys,
//! numbers as strings, blank entries) the way real model output is.

use serde_json::{json, Value};

use draftgate_contracts::draft::DraftActionType;

// ── Planner replies (mock) ────────────────────────────────────────────────────

/// The reply the mock planner gives for `action_type`.
pub fn planner_reply(action_type: DraftActionType) -> Value {
    match action_type {
        DraftActionType::RfqDraft => json!({
            "draft": {
                "payload": {
                    "title": "  Deep-groove ball bearings, line 3 retrofit ",
                    "category": "MRO / bearings",
                    "dueDate": "2026-11-30",
                    "currency": "USD",
                    "lineItems": [
                        { "item_code": "BRG-6204-2RS", "description": "Ball bearing 20x47x14", "quantity": "240", "uom": "ea" },
                        { "item_code": "BRG-6306-ZZ", "quantity": 60, "uom": "ea", "target_price": "4.80" },
                        { "description": "   ", "quantity": "n/a" }
                    ],
                    "supplier_ids": ["S1", "S2", 3, ""],
                    "evaluation_criteria": ["unit price", "lead time", "", "quality rating"]
                },
                "summary": "RFQ for 300 bearings for the line 3 retrofit",
                "confidence": 0.86,
                "warnings": ["historical price for BRG-6306-ZZ is older than 12 months"],
                "citations": [
                    { "doc_id": "catalog-bearings-2026", "chunk_id": "p14", "snippet": "6204-2RS sealed, 20x47x14" },
                    { "doc_id": "scorecard-q3-2026" },
                    { "snippet": "citation without a document" }
                ],
                "needs_human_review": true
            }
        }),
        DraftActionType::SupplierMessage => json!({
            "draft": {
                "payload": {
                    "supplier": { "supplierId": "S2", "name": "Bravo Industrial", "email": "orders@bravo.example" },
                    "subject": "Confirming lead time for PO-2026-0418",
                    "message": "Hello Bravo team,\n\nplease confirm the 21-day lead time quoted for PO-2026-0418.",
                    "channel": "email",
                    "rfqId": "RFQ-2026-0112"
                },
                "summary": "Lead time confirmation for Bravo Industrial",
                "confidence": "0.74"
            }
        }),
        DraftActionType::MaintenanceChecklist => json!({
            "draft": {
                "payload": {
                    "assetId": 3011,
                    "asset_name": "Conveyor drive C-3",
                    "frequency": "quarterly",
                    "items": [
                        "Lock out and tag out the drive",
                        { "task": "Inspect belt tension", "estimated_minutes": "15", "tools": ["tension gauge", ""] },
                        { "task": "Grease drive bearings", "estimated_minutes": 10.5, "safety_notes": "Wear gloves" },
                        { "task": "" }
                    ]
                },
                "summary": "Quarterly conveyor drive checklist",
                "citations": [{ "doc_id": "manual-conveyor-c3" }]
            }
        }),
        DraftActionType::InventoryWhatIf => json!({
            "draft": {
                "payload": {
                    "sku": "BRG-6204-2RS",
                    "scenario": "Supplier S1 lead time slips from 14 to 35 days",
                    "currentOnHand": "410",
                    "projected_demand": 95,
                    "lead_time_days": "35",
                    "reorder_point": "NaN",
                    "projections": [
                        { "period": "2026-W44", "projected_stock": 315, "stockout_risk": 0.02 },
                        { "period": "2026-W45", "projected_stock": "220", "stockout_risk": "0.08" },
                        { "period": "2026-W46", "projected_stock": 125, "stockout_risk": 0.31 }
                    ],
                    "recommendations": "Raise reorder point to 520 units"
                },
                "confidence": 0.69,
                "needs_human_review": "true"
            }
        }),
    }
}

// ── Quote comparison (mock) ───────────────────────────────────────────────────

/// AI comparison of three supplier quotes for the bearings RFQ.
///
/// Recommends S1 on price; S2 is faster and better rated.
pub fn quote_comparison() -> Value {
    json!({
        "recommendation": "S1",
        "summary": [
            "Acme Bearings (S1) is 6% cheaper than the next quote",
            "Bravo Industrial (S2) ships in 9 days instead of 21",
            "Corvid Supply (S3) quote is missing a lead time"
        ],
        "rankings": [
            { "supplier_id": "S1", "supplier_name": "Acme Bearings", "score": 0.88, "price": "1148.00", "lead_time_days": 21, "quality_rating": 4.1 },
            { "supplierId": "S2", "supplier_name": "Bravo Industrial", "score": 0.84, "price": 1221.6, "lead_time_days": "9", "quality_rating": 4.7 },
            { "supplier": { "id": "S3", "name": "Corvid Supply" }, "score": "0.61", "price": 1190 },
            { "supplier_id": null, "score": 0.2 }
        ]
    })
}

/// A purchase-order draft for `supplier_id` covering the bearings RFQ.
pub fn po_draft(supplier_id: &str, supplier_name: &str) -> Value {
    json!({
        "poNumber": "PO-2026-0418",
        "supplierId": supplier_id,
        "supplierName": supplier_name,
        "line_items": [
            { "line_number": 1, "item_code": "BRG-6204-2RS", "quantity": 240, "unit_price": "3.95", "subtotal": 948.0 },
            { "line_number": "2", "item_code": "BRG-6306-ZZ", "quantity": "60", "unit_price": 4.55, "subtotal": 273.0 },
            { "line_number": "third", "quantity": "n/a" }
        ],
        "delivery_schedule": [
            { "milestone": "First half", "date": "2026-11-12", "quantity": 150 },
            { "milestone": "Balance", "deliveryDate": "2026-11-26", "quantity": "150" }
        ],
        "terms": ["Net 45", "DAP plant 2", ""],
        "totalValue": "1221.00"
    })
}

// ── Document catalog (mock) ───────────────────────────────────────────────────

/// Download URL of a document in the mock catalog.
///
/// `scorecard-q3-2026` is listed but archived, so it has no URL.
pub fn document_url(doc_id: &str) -> Option<String> {
    match doc_id {
        "catalog-bearings-2026" | "manual-conveyor-c3" | "contract-bravo-2025" => {
            Some(format!("https://docs.procurement.example/{}.pdf", doc_id))
        }
        _ => None,
    }
}
