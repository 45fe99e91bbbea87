//! Wiring for the procurement reference runtime.
//!
//! `ProcurementRuntime` assembles the real engine components (in-memory
//! store, hash-chained audit trail, TOML-configured gate) around the mock
//! collaborators, and keeps inspectable handles to all of them.

use std::sync::Arc;

use draftgate_audit::InMemoryAuditWriter;
use draftgate_contracts::{actor::Actor, error::EngineResult};
use draftgate_core::{DraftService, WorkflowEngine};
use draftgate_policy::EngineConfig;
use draftgate_store::{InMemoryDraftRepository, InMemoryWorkflowRepository};

use crate::collaborators::{CatalogSourceResolver, MockPlanner, ProcurementMaterializer};

/// Engine configuration shipped with the procurement runtime.
pub const PROCUREMENT_CONFIG: &str = include_str!("../policies/procurement.toml");

/// Parse the bundled procurement configuration.
pub fn procurement_config() -> EngineResult<EngineConfig> {
    EngineConfig::from_toml_str(PROCUREMENT_CONFIG)
}

/// A fully wired engine for one scenario run.
pub struct ProcurementRuntime {
    pub drafts: DraftService,
    pub workflows: WorkflowEngine,
    pub audit: Arc<InMemoryAuditWriter>,
    pub materializer: ProcurementMaterializer,
    pub draft_store: Arc<InMemoryDraftRepository>,
    pub workflow_store: Arc<InMemoryWorkflowRepository>,
}

impl ProcurementRuntime {
    /// Wire a fresh runtime; the audit trail is named `trail_id`.
    pub fn new(config: &EngineConfig, trail_id: &str) -> Self {
        let audit = Arc::new(InMemoryAuditWriter::new(trail_id));
        let gate = Arc::new(config.build_gate());
        let materializer = ProcurementMaterializer::new();
        let draft_store = Arc::new(InMemoryDraftRepository::new());
        let workflow_store = Arc::new(InMemoryWorkflowRepository::new());

        let drafts = DraftService::new(
            draft_store.clone(),
            gate.clone(),
            Arc::new(materializer.clone()),
            audit.clone(),
        )
        .with_planner(Arc::new(MockPlanner))
        .with_sources(Arc::new(CatalogSourceResolver))
        .with_settings(config.drafts.clone());

        let workflows = WorkflowEngine::new(workflow_store.clone(), gate, audit.clone())
            .with_settings(config.workflows.clone());

        Self {
            drafts,
            workflows,
            audit,
            materializer,
            draft_store,
            workflow_store,
        }
    }

    /// Print the audit chain summary every scenario ends with.
    pub fn print_audit_summary(&self) {
        println!(
            "  Audit chain integrity:  {} ({} event(s) in chain)",
            if self.audit.verify_integrity() { "VERIFIED" } else { "FAILED" },
            self.audit.len()
        );
    }
}

// ── Reference actors ──────────────────────────────────────────────────────────

/// A buyer admin judged by the role tier.
pub fn buyer_admin() -> Actor {
    Actor::new("dana.buyer")
        .with_role("buyer_admin")
        .with_feature("ai.actions")
}

/// A buyer with explicit permissions for quotes and orders.
pub fn scoped_buyer() -> Actor {
    Actor::new("lee.sourcing")
        .with_role("buyer")
        .with_feature("ai.actions")
        .with_permissions(["ai.workflows.approve", "rfqs.write", "orders.write"])
}

/// A buyer who may compare quotes but not place orders.
pub fn quotes_only_buyer() -> Actor {
    Actor::new("sam.quotes")
        .with_role("buyer_admin")
        .with_feature("ai.actions")
        .with_permissions(["ai.workflows.approve", "rfqs.write"])
}

/// A warehouse viewer outside the allow-listed roles.
pub fn viewer() -> Actor {
    Actor::new("kim.warehouse")
        .with_role("viewer")
        .with_feature("ai.actions")
}

/// An owner whose company has not enabled AI actions.
pub fn unentitled_owner() -> Actor {
    Actor::new("ari.owner").with_role("owner").with_admin(true)
}
