//! In-crate test doubles for the engine's collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use draftgate_contracts::{
    actor::Actor,
    audit::TransitionRecord,
    draft::{ActionDraft, Citation, DraftActionType, DraftId, EntityRef, PlanRequest},
    error::{EngineError, EngineResult},
    payload::DraftPayload,
    workflow::{WorkflowId, WorkflowRecord},
};

use crate::traits::{
    AuditWriter, CapabilityGate, DraftRepository, Materializer, Mutation, Planner, SourceResolver,
    WorkflowRepository,
};

/// An actor the [`RoleGate`] allows everywhere.
pub fn reviewer() -> Actor {
    Actor::new("rev-1")
        .with_role("buyer_admin")
        .with_feature("ai.actions")
}

// ── Repositories ─────────────────────────────────────────────────────────────

/// One lock for the whole map; updates run while it is held.
#[derive(Default)]
pub struct MemoryDrafts {
    rows: Mutex<HashMap<DraftId, ActionDraft>>,
}

impl DraftRepository for MemoryDrafts {
    fn insert(&self, draft: ActionDraft) -> EngineResult<()> {
        self.rows.lock().unwrap().insert(draft.id.clone(), draft);
        Ok(())
    }

    fn get(&self, id: &DraftId) -> EngineResult<ActionDraft> {
        self.rows
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound { entity: "draft", id: id.to_string() })
    }

    fn update(&self, id: &DraftId, mutation: Mutation<'_, ActionDraft>) -> EngineResult<ActionDraft> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound { entity: "draft", id: id.to_string() })?;
        let mut working = row.clone();
        mutation(&mut working)?;
        *row = working.clone();
        Ok(working)
    }

    fn list(&self) -> EngineResult<Vec<ActionDraft>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryWorkflows {
    rows: Mutex<HashMap<WorkflowId, WorkflowRecord>>,
}

impl WorkflowRepository for MemoryWorkflows {
    fn insert(&self, record: WorkflowRecord) -> EngineResult<()> {
        self.rows.lock().unwrap().insert(record.workflow_id.clone(), record);
        Ok(())
    }

    fn get(&self, id: &WorkflowId) -> EngineResult<WorkflowRecord> {
        self.rows
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound { entity: "workflow", id: id.to_string() })
    }

    fn update(
        &self,
        id: &WorkflowId,
        mutation: Mutation<'_, WorkflowRecord>,
    ) -> EngineResult<WorkflowRecord> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound { entity: "workflow", id: id.to_string() })?;
        let mut working = row.clone();
        mutation(&mut working)?;
        *row = working.clone();
        Ok(working)
    }

    fn list(&self) -> EngineResult<Vec<WorkflowRecord>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }
}

// ── Gate ─────────────────────────────────────────────────────────────────────

/// Allows `buyer_admin` actors that carry the `ai.actions` feature.
pub struct RoleGate;

impl CapabilityGate for RoleGate {
    fn denial_reason(&self, actor: &Actor, action_type: &str) -> Option<String> {
        if let Some(reason) = self.entitlement_denial(actor) {
            return Some(reason);
        }
        match actor.role.as_deref() {
            Some("buyer_admin") => None,
            _ => Some(format!("'{}' may not resolve {}", actor.user_id, action_type)),
        }
    }

    fn entitlement_denial(&self, actor: &Actor) -> Option<String> {
        if actor.is_entitled("ai.actions") {
            None
        } else {
            Some("ai.actions is not enabled".to_string())
        }
    }
}

// ── Materializer ─────────────────────────────────────────────────────────────

/// Counts calls; can be told to fail the next one.
#[derive(Default)]
pub struct MockMaterializer {
    calls: Mutex<u32>,
    fail_next: Mutex<bool>,
}

impl MockMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

impl Materializer for MockMaterializer {
    fn materialize(&self, draft: &ActionDraft, _payload: &DraftPayload) -> EngineResult<EntityRef> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(EngineError::upstream("entity service timed out"));
        }
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;

        let entity_type = match draft.action_type {
            DraftActionType::RfqDraft => "rfq",
            DraftActionType::SupplierMessage => "supplier_message",
            DraftActionType::MaintenanceChecklist => "maintenance_checklist",
            DraftActionType::InventoryWhatIf => "inventory_scenario",
        };
        Ok(EntityRef {
            entity_type: entity_type.to_string(),
            entity_id: format!("{}-{}", entity_type, calls),
        })
    }
}

// ── Planner / sources ────────────────────────────────────────────────────────

pub struct MockPlanner {
    reply: Value,
}

impl MockPlanner {
    pub fn replying(reply: Value) -> Self {
        Self { reply }
    }
}

impl Planner for MockPlanner {
    fn plan(&self, _request: &PlanRequest) -> EngineResult<Value> {
        Ok(self.reply.clone())
    }
}

pub struct MockSources {
    known: HashSet<String>,
}

impl MockSources {
    pub fn knowing(doc_ids: &[&str]) -> Self {
        Self { known: doc_ids.iter().map(|d| d.to_string()).collect() }
    }
}

impl SourceResolver for MockSources {
    fn resolve(&self, citation: &Citation) -> EngineResult<String> {
        if self.known.contains(&citation.doc_id) {
            Ok(format!("https://docs.example.test/{}", citation.doc_id))
        } else {
            Err(EngineError::NotFound { entity: "document", id: citation.doc_id.clone() })
        }
    }
}

// ── Audit ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingAudit {
    records: Arc<Mutex<Vec<TransitionRecord>>>,
    failing: Mutex<bool>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

impl AuditWriter for RecordingAudit {
    fn write(&self, record: &TransitionRecord) -> EngineResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(EngineError::AuditWriteFailed { reason: "disk full".to_string() });
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
