//! Normalizers for the four single-shot action draft shapes.

use serde_json::{Map, Value};

use draftgate_contracts::payload::{
    ChecklistItem, InventoryWhatIfPayload, MaintenanceChecklistPayload, RfqDraftPayload,
    RfqLineItem, StockProjection, SupplierMessagePayload, SupplierRef,
};

use crate::coerce::{
    field, identifier, identifier_at, list_of, nested, number_at, text, text_at, text_list, whole_at,
};

/// Normalize a supplier reference object.
///
/// A bare string or number is read as the supplier id.
pub(crate) fn supplier_ref(value: Option<&Value>) -> Option<SupplierRef> {
    if let Some(v) = value.filter(|v| v.is_string() || v.is_number()) {
        return identifier(v).map(|supplier_id| SupplierRef {
            supplier_id: Some(supplier_id),
            ..SupplierRef::default()
        });
    }
    nested(
        value,
        |obj| SupplierRef {
            supplier_id: identifier_at(obj, &["supplier_id", "supplierId", "id"]),
            name: text_at(obj, &["name", "supplier_name", "supplierName"]),
            contact: text_at(obj, &["contact", "email", "contact_email"]),
        },
        SupplierRef::is_empty,
    )
}

/// Supplier fields written directly on the parent object.
pub(crate) fn flat_supplier(obj: &Map<String, Value>) -> Option<SupplierRef> {
    let flat = SupplierRef {
        supplier_id: identifier_at(obj, &["supplier_id", "supplierId"]),
        name: text_at(obj, &["supplier_name", "supplierName"]),
        contact: text_at(obj, &["supplier_contact", "supplierContact"]),
    };
    if flat.is_empty() {
        None
    } else {
        Some(flat)
    }
}

// ── RFQ ───────────────────────────────────────────────────────────────────────

fn rfq_line_item(value: &Value) -> Option<RfqLineItem> {
    nested(
        Some(value),
        |obj| RfqLineItem {
            item_code: identifier_at(obj, &["item_code", "itemCode", "sku"]),
            description: text_at(obj, &["description", "name"]),
            quantity: number_at(obj, &["quantity", "qty"]),
            uom: text_at(obj, &["uom", "unit"]),
            target_price: number_at(obj, &["target_price", "targetPrice"]),
        },
        RfqLineItem::is_empty,
    )
}

pub fn normalize_rfq(obj: &Map<String, Value>) -> RfqDraftPayload {
    RfqDraftPayload {
        title: text_at(obj, &["title"]),
        description: text_at(obj, &["description"]),
        category: text_at(obj, &["category"]),
        due_date: text_at(obj, &["due_date", "dueDate"]),
        currency: text_at(obj, &["currency"]),
        line_items: list_of(field(obj, &["line_items", "lineItems", "items"]), rfq_line_item),
        supplier_ids: list_of(field(obj, &["supplier_ids", "supplierIds", "suppliers"]), |v| {
            // Supplier lists come as ids or as supplier objects.
            identifier(v).or_else(|| supplier_ref(Some(v)).and_then(|s| s.supplier_id))
        }),
        evaluation_criteria: text_list(field(obj, &["evaluation_criteria", "evaluationCriteria"])),
    }
}

// ── Supplier message ──────────────────────────────────────────────────────────

pub fn normalize_supplier_message(obj: &Map<String, Value>) -> SupplierMessagePayload {
    SupplierMessagePayload {
        supplier: supplier_ref(field(obj, &["supplier"])).or_else(|| flat_supplier(obj)),
        subject: text_at(obj, &["subject", "title"]),
        body: text_at(obj, &["body", "message", "content"]),
        channel: text_at(obj, &["channel"]),
        related_rfq_id: identifier_at(obj, &["related_rfq_id", "relatedRfqId", "rfq_id"]),
    }
}

// ── Maintenance checklist ─────────────────────────────────────────────────────

fn checklist_item(value: &Value) -> Option<ChecklistItem> {
    if let Some(task) = text(value) {
        return Some(ChecklistItem {
            task: Some(task),
            ..ChecklistItem::default()
        });
    }
    nested(
        Some(value),
        |obj| ChecklistItem {
            task: text_at(obj, &["task", "step", "title"]),
            description: text_at(obj, &["description", "details"]),
            estimated_minutes: whole_at(obj, &["estimated_minutes", "estimatedMinutes"]),
            required_tools: text_list(field(obj, &["required_tools", "requiredTools", "tools"])),
            safety_notes: text_at(obj, &["safety_notes", "safetyNotes"]),
        },
        ChecklistItem::is_empty,
    )
}

pub fn normalize_maintenance_checklist(obj: &Map<String, Value>) -> MaintenanceChecklistPayload {
    MaintenanceChecklistPayload {
        asset_id: identifier_at(obj, &["asset_id", "assetId"]),
        asset_name: text_at(obj, &["asset_name", "assetName"]),
        title: text_at(obj, &["title"]),
        frequency: text_at(obj, &["frequency", "interval"]),
        items: list_of(field(obj, &["items", "checklist", "tasks"]), checklist_item),
    }
}

// ── Inventory what-if ─────────────────────────────────────────────────────────

fn stock_projection(value: &Value) -> Option<StockProjection> {
    nested(
        Some(value),
        |obj| StockProjection {
            period: identifier_at(obj, &["period", "week", "date"]),
            projected_stock: number_at(obj, &["projected_stock", "projectedStock"]),
            stockout_risk: number_at(obj, &["stockout_risk", "stockoutRisk"]),
        },
        StockProjection::is_empty,
    )
}

pub fn normalize_inventory_whatif(obj: &Map<String, Value>) -> InventoryWhatIfPayload {
    InventoryWhatIfPayload {
        item_code: identifier_at(obj, &["item_code", "itemCode", "sku"]),
        scenario: text_at(obj, &["scenario"]),
        current_on_hand: number_at(obj, &["current_on_hand", "currentOnHand", "on_hand"]),
        projected_demand: number_at(obj, &["projected_demand", "projectedDemand"]),
        lead_time_days: number_at(obj, &["lead_time_days", "leadTimeDays"]),
        reorder_point: number_at(obj, &["reorder_point", "reorderPoint"]),
        safety_stock: number_at(obj, &["safety_stock", "safetyStock"]),
        projections: list_of(field(obj, &["projections"]), stock_projection),
        recommendations: text_list(field(obj, &["recommendations"])),
    }
}
