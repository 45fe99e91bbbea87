//! Normalized payload records.
//!
//! These are the typed views the normalizer derives from raw AI JSON. They
//! are recomputed on every read and never persisted, so they do
//! not implement `Deserialize`: the only way to obtain one is through
//! `draftgate-normalize`.
//!
//! Serialization skips absent options and empty sequences, so a record that
//! normalized to nothing serializes as `{}` and a pruned child never shows up
//! as an empty container.

use serde::Serialize;

// ── Shared pieces ─────────────────────────────────────────────────────────────

/// A supplier reference as it appears in AI drafts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl SupplierRef {
    pub fn is_empty(&self) -> bool {
        self.supplier_id.is_none() && self.name.is_none() && self.contact.is_none()
    }
}

// ── RFQ draft ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RfqLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
}

impl RfqLineItem {
    pub fn is_empty(&self) -> bool {
        self.item_code.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.uom.is_none()
            && self.target_price.is_none()
    }
}

/// Normalized payload of an `rfq_draft` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RfqDraftPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<RfqLineItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supplier_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evaluation_criteria: Vec<String>,
}

impl RfqDraftPayload {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.currency.is_none()
            && self.line_items.is_empty()
            && self.supplier_ids.is_empty()
            && self.evaluation_criteria.is_empty()
    }
}

// ── Supplier message ──────────────────────────────────────────────────────────

/// Normalized payload of a `supplier_message` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierMessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_rfq_id: Option<String>,
}

impl SupplierMessagePayload {
    pub fn is_empty(&self) -> bool {
        self.supplier.is_none()
            && self.subject.is_none()
            && self.body.is_none()
            && self.channel.is_none()
            && self.related_rfq_id.is_none()
    }
}

// ── Maintenance checklist ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChecklistItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_notes: Option<String>,
}

impl ChecklistItem {
    pub fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.description.is_none()
            && self.estimated_minutes.is_none()
            && self.required_tools.is_empty()
            && self.safety_notes.is_none()
    }
}

/// Normalized payload of a `maintenance_checklist` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaintenanceChecklistPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ChecklistItem>,
}

impl MaintenanceChecklistPayload {
    pub fn is_empty(&self) -> bool {
        self.asset_id.is_none()
            && self.asset_name.is_none()
            && self.title.is_none()
            && self.frequency.is_none()
            && self.items.is_empty()
    }
}

// ── Inventory what-if ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockProjection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stockout_risk: Option<f64>,
}

impl StockProjection {
    pub fn is_empty(&self) -> bool {
        self.period.is_none() && self.projected_stock.is_none() && self.stockout_risk.is_none()
    }
}

/// Normalized payload of an `inventory_whatif` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryWhatIfPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_on_hand: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_demand: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_point: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_stock: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projections: Vec<StockProjection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl InventoryWhatIfPayload {
    pub fn is_empty(&self) -> bool {
        self.item_code.is_none()
            && self.scenario.is_none()
            && self.current_on_hand.is_none()
            && self.projected_demand.is_none()
            && self.lead_time_days.is_none()
            && self.reorder_point.is_none()
            && self.safety_stock.is_none()
            && self.projections.is_empty()
            && self.recommendations.is_empty()
    }
}

// ── Quote comparison ──────────────────────────────────────────────────────────

/// One supplier's position in an AI quote comparison.
///
/// `supplier_id` is always non-empty; rankings without one never get built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRanking {
    pub supplier_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Normalized view of a `compare_quotes` step draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteComparisonDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub summary: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rankings: Vec<QuoteRanking>,
}

impl QuoteComparisonDraft {
    pub fn is_empty(&self) -> bool {
        self.recommendation.is_none() && self.summary.is_empty() && self.rankings.is_empty()
    }

    /// Return the ranking for `supplier_id`, if the comparison has one.
    pub fn ranking_for(&self, supplier_id: &str) -> Option<&QuoteRanking> {
        self.rankings.iter().find(|r| r.supplier_id == supplier_id)
    }
}

// ── Purchase-order draft ──────────────────────────────────────────────────────

/// Currency assumed when a purchase-order draft does not name one.
pub const DEFAULT_PO_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
}

impl PoLineItem {
    pub fn is_empty(&self) -> bool {
        self.line_number.is_none()
            && self.item_code.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.uom.is_none()
            && self.unit_price.is_none()
            && self.currency.is_none()
            && self.subtotal.is_none()
            && self.delivery_date.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeliveryMilestone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryMilestone {
    pub fn is_empty(&self) -> bool {
        self.milestone.is_none() && self.date.is_none() && self.quantity.is_none() && self.notes.is_none()
    }
}

/// Normalized view of a `po_draft` step draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoDraftPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
    pub currency: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<PoLineItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delivery_schedule: Vec<DeliveryMilestone>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terms_and_conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
}

impl Default for PoDraftPayload {
    fn default() -> Self {
        Self {
            po_number: None,
            supplier: None,
            currency: DEFAULT_PO_CURRENCY.to_string(),
            line_items: Vec::new(),
            delivery_schedule: Vec::new(),
            terms_and_conditions: Vec::new(),
            total_value: None,
        }
    }
}

impl PoDraftPayload {
    /// True when nothing but the defaulted currency is present.
    pub fn is_empty(&self) -> bool {
        self.po_number.is_none()
            && self.supplier.is_none()
            && self.line_items.is_empty()
            && self.delivery_schedule.is_empty()
            && self.terms_and_conditions.is_empty()
            && self.total_value.is_none()
    }
}

// ── Closed unions ─────────────────────────────────────────────────────────────

/// The normalized payload of an `ActionDraft`, tagged by its action type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action_type", content = "payload", rename_all = "snake_case")]
pub enum DraftPayload {
    RfqDraft(RfqDraftPayload),
    SupplierMessage(SupplierMessagePayload),
    MaintenanceChecklist(MaintenanceChecklistPayload),
    #[serde(rename = "inventory_whatif")]
    InventoryWhatIf(InventoryWhatIfPayload),
}

impl DraftPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            DraftPayload::RfqDraft(p) => p.is_empty(),
            DraftPayload::SupplierMessage(p) => p.is_empty(),
            DraftPayload::MaintenanceChecklist(p) => p.is_empty(),
            DraftPayload::InventoryWhatIf(p) => p.is_empty(),
        }
    }
}

/// The normalized view of a workflow step draft.
///
/// Step kinds the engine has no dedicated shape for keep their raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action_type", content = "draft", rename_all = "snake_case")]
pub enum StepDraft {
    CompareQuotes(QuoteComparisonDraft),
    PoDraft(PoDraftPayload),
    Other(serde_json::Value),
}
