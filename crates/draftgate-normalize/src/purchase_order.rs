//! Purchase-order draft normalizer.

use serde_json::{Map, Value};

use draftgate_contracts::payload::{
    DeliveryMilestone, PoDraftPayload, PoLineItem, DEFAULT_PO_CURRENCY,
};

use crate::actions::{flat_supplier, supplier_ref};
use crate::coerce::{
    field, identifier_at, list_of, nested, number_at, text_at, text_list, whole_at,
};

fn line_item(value: &Value) -> Option<PoLineItem> {
    nested(
        Some(value),
        |obj| PoLineItem {
            line_number: whole_at(obj, &["line_number", "lineNumber", "line"]),
            item_code: identifier_at(obj, &["item_code", "itemCode", "sku"]),
            description: text_at(obj, &["description", "name"]),
            quantity: number_at(obj, &["quantity", "qty"]),
            uom: text_at(obj, &["uom", "unit"]),
            unit_price: number_at(obj, &["unit_price", "unitPrice", "price"]),
            currency: text_at(obj, &["currency"]),
            subtotal: number_at(obj, &["subtotal", "line_total", "lineTotal"]),
            delivery_date: text_at(obj, &["delivery_date", "deliveryDate"]),
        },
        PoLineItem::is_empty,
    )
}

fn milestone(value: &Value) -> Option<DeliveryMilestone> {
    nested(
        Some(value),
        |obj| DeliveryMilestone {
            milestone: text_at(obj, &["milestone", "name"]),
            date: text_at(obj, &["date", "delivery_date", "deliveryDate"]),
            quantity: number_at(obj, &["quantity", "qty"]),
            notes: text_at(obj, &["notes"]),
        },
        DeliveryMilestone::is_empty,
    )
}

pub fn normalize_po_draft_object(obj: &Map<String, Value>) -> PoDraftPayload {
    // Nested "supplier" wins; the flat supplier_id/supplier_name form is the fallback.
    let supplier = supplier_ref(field(obj, &["supplier"])).or_else(|| flat_supplier(obj));

    PoDraftPayload {
        po_number: identifier_at(obj, &["po_number", "poNumber"]),
        supplier,
        currency: text_at(obj, &["currency"]).unwrap_or_else(|| DEFAULT_PO_CURRENCY.to_string()),
        line_items: list_of(field(obj, &["line_items", "lineItems", "items"]), line_item),
        delivery_schedule: list_of(
            field(obj, &["delivery_schedule", "deliverySchedule"]),
            milestone,
        ),
        terms_and_conditions: text_list(field(
            obj,
            &["terms_and_conditions", "termsAndConditions", "terms"],
        )),
        total_value: number_at(obj, &["total_value", "totalValue", "total"]),
    }
}

/// Normalize a raw `po_draft` draft.
pub fn normalize_po_draft(raw: &Value) -> PoDraftPayload {
    raw.as_object()
        .map(normalize_po_draft_object)
        .unwrap_or_default()
}
