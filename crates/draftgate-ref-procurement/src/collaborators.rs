//! Mock collaborators for the procurement runtime.
//!
//! In a production deployment these would call the procurement system of
//! record, the AI planning service and the document store. Here they work on
//! in-memory state and the fixtures in [`crate::mock_data`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, info};

use draftgate_contracts::{
    draft::{ActionDraft, Citation, DraftId, EntityRef, PlanRequest},
    error::{EngineError, EngineResult},
    payload::DraftPayload,
};
use draftgate_core::traits::{Materializer, Planner, SourceResolver};

use crate::mock_data::{document_url, planner_reply};

// ── Materializer ──────────────────────────────────────────────────────────────

/// An entity created by [`ProcurementMaterializer`].
#[derive(Debug, Clone)]
pub struct CreatedEntity {
    pub entity: EntityRef,
    pub draft_id: DraftId,
    /// The normalized payload the entity was created from.
    pub payload: Value,
}

#[derive(Default)]
struct MaterializerState {
    created: Vec<CreatedEntity>,
    /// Entity already created per draft id.
    by_draft: HashMap<DraftId, EntityRef>,
    counters: HashMap<&'static str, u32>,
    fail_next: bool,
}

/// Creates procurement records for approved drafts.
///
/// Keyed on the draft id: materializing the same draft twice returns the
/// entity created the first time.
#[derive(Clone, Default)]
pub struct ProcurementMaterializer {
    state: Arc<Mutex<MaterializerState>>,
}

impl ProcurementMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `materialize` call fail as if the system of record were down.
    pub fn fail_next(&self) {
        self.lock().fail_next = true;
    }

    /// Every entity created so far, in creation order.
    pub fn created(&self) -> Vec<CreatedEntity> {
        self.lock().created.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MaterializerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Entity type and id prefix for each payload kind.
fn entity_kind(payload: &DraftPayload) -> (&'static str, &'static str) {
    match payload {
        DraftPayload::RfqDraft(_) => ("rfq", "RFQ"),
        DraftPayload::SupplierMessage(_) => ("supplier_message", "MSG"),
        DraftPayload::MaintenanceChecklist(_) => ("maintenance_checklist", "CHK"),
        DraftPayload::InventoryWhatIf(_) => ("inventory_scenario", "SCN"),
    }
}

impl Materializer for ProcurementMaterializer {
    fn materialize(&self, draft: &ActionDraft, payload: &DraftPayload) -> EngineResult<EntityRef> {
        let mut state = self.lock();

        if std::mem::take(&mut state.fail_next) {
            return Err(EngineError::upstream("procurement system of record is unavailable"));
        }
        if let Some(existing) = state.by_draft.get(&draft.id) {
            debug!(draft_id = %draft.id, entity_id = %existing.entity_id, "entity already exists");
            return Ok(existing.clone());
        }
        if payload.is_empty() {
            return Err(EngineError::validation(format!(
                "draft '{}' has nothing to create a {} from",
                draft.id, draft.action_type
            )));
        }

        let (entity_type, prefix) = entity_kind(payload);
        let counter = state.counters.entry(entity_type).or_insert(0);
        *counter += 1;
        let entity = EntityRef {
            entity_type: entity_type.to_string(),
            entity_id: format!("{}-{:04}", prefix, counter),
        };

        let snapshot = serde_json::to_value(payload).map_err(|e| {
            EngineError::validation(format!("payload could not be serialized: {}", e))
        })?;
        state.by_draft.insert(draft.id.clone(), entity.clone());
        state.created.push(CreatedEntity {
            entity: entity.clone(),
            draft_id: draft.id.clone(),
            payload: snapshot,
        });

        info!(
            draft_id = %draft.id,
            entity_type = %entity.entity_type,
            entity_id = %entity.entity_id,
            "procurement entity created"
        );
        Ok(entity)
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// A canned AI planner.
///
/// Queries mentioning "timeout" fail as an unavailable upstream would;
/// queries mentioning "garbled" get a reply without a draft.
#[derive(Debug, Clone, Default)]
pub struct MockPlanner;

impl Planner for MockPlanner {
    fn plan(&self, request: &PlanRequest) -> EngineResult<Value> {
        let query = request.query.to_lowercase();
        if query.contains("timeout") {
            return Err(EngineError::upstream("planner timed out after 30s"));
        }
        if query.contains("garbled") {
            return Ok(serde_json::json!({ "text": "I could not produce a draft." }));
        }
        debug!(action_type = %request.action_type, "mock planner replying");
        Ok(planner_reply(request.action_type))
    }
}

// ── Source resolver ───────────────────────────────────────────────────────────

/// Resolves citations against the mock document catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogSourceResolver;

impl SourceResolver for CatalogSourceResolver {
    fn resolve(&self, citation: &Citation) -> EngineResult<String> {
        document_url(&citation.doc_id).ok_or_else(|| EngineError::NotFound {
            entity: "document",
            id: citation.doc_id.clone(),
        })
    }
}
