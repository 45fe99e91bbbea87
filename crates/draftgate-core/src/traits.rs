//! Core trait definitions for the draft and workflow engine.
//!
//! These traits are the engine's boundary with everything it does not own:
//!
//! - `DraftRepository` / `WorkflowRepository`: the persistence boundary
//! - `CapabilityGate`: trusted authorization check
//! - `Materializer`: creates the real entity behind an approved draft
//! - `Planner`: the untrusted upstream AI service
//! - `SourceResolver`: resolves citations to downloadable documents
//! - `AuditWriter`: append-only record of every transition
//!
//! The services in this crate hold no mutable state of their own. Every
//! mutation goes through a repository `update`, which is the per-entity
//! serialization point.

use serde_json::Value;

use draftgate_contracts::{
    actor::Actor,
    audit::TransitionRecord,
    draft::{ActionDraft, Citation, DraftId, EntityRef, PlanRequest},
    error::EngineResult,
    payload::DraftPayload,
    workflow::{WorkflowId, WorkflowRecord},
};

/// A transactional mutation applied to one stored record.
///
/// The closure works on a copy; the store commits it only when the closure
/// returns `Ok`.
pub type Mutation<'a, T> = &'a mut dyn FnMut(&mut T) -> EngineResult<()>;

/// Persistence boundary for action drafts.
pub trait DraftRepository: Send + Sync {
    /// Store a new draft. Fails if the id is already present.
    fn insert(&self, draft: ActionDraft) -> EngineResult<()>;

    /// Return a snapshot of the draft, or `NotFound`.
    fn get(&self, id: &DraftId) -> EngineResult<ActionDraft>;

    /// Apply `mutation` to the draft under a per-draft lock.
    ///
    /// Concurrent updates of the same draft run one after another; the
    /// second sees the first one's committed state. If `mutation` returns an
    /// error nothing is written and the error is returned unchanged.
    fn update(&self, id: &DraftId, mutation: Mutation<'_, ActionDraft>) -> EngineResult<ActionDraft>;

    /// Snapshot of every stored draft, in no particular order.
    fn list(&self) -> EngineResult<Vec<ActionDraft>>;
}

/// Persistence boundary for workflows and their steps.
pub trait WorkflowRepository: Send + Sync {
    fn insert(&self, record: WorkflowRecord) -> EngineResult<()>;

    fn get(&self, id: &WorkflowId) -> EngineResult<WorkflowRecord>;

    /// Same contract as [`DraftRepository::update`], per workflow.
    fn update(
        &self,
        id: &WorkflowId,
        mutation: Mutation<'_, WorkflowRecord>,
    ) -> EngineResult<WorkflowRecord>;

    fn list(&self) -> EngineResult<Vec<WorkflowRecord>>;
}

/// The authorization check in front of every resolution.
///
/// Implementations must be deterministic and free of I/O; the engine calls
/// them while holding an entity lock.
pub trait CapabilityGate: Send + Sync {
    /// Explain why `actor` may not resolve work of `action_type`, or `None`
    /// when the actor is allowed.
    fn denial_reason(&self, actor: &Actor, action_type: &str) -> Option<String>;

    /// Explain why `actor` may not use AI drafting at all, or `None`.
    fn entitlement_denial(&self, actor: &Actor) -> Option<String>;

    /// Return true if `actor` may resolve work of `action_type`.
    fn can_resolve(&self, actor: &Actor, action_type: &str) -> bool {
        self.denial_reason(actor, action_type).is_none()
    }

    /// Return true if `actor` may ask the planner for new drafts.
    fn can_plan(&self, actor: &Actor) -> bool {
        self.entitlement_denial(actor).is_none()
    }
}

/// Creates the domain entity behind an approved draft.
///
/// Called at most once per successful approval, while the draft is locked.
/// The draft id is a stable idempotency key for implementations that talk to
/// remote systems.
pub trait Materializer: Send + Sync {
    fn materialize(&self, draft: &ActionDraft, payload: &DraftPayload) -> EngineResult<EntityRef>;
}

/// The upstream AI generation service.
///
/// Replies are untrusted and run through intake and normalization.
pub trait Planner: Send + Sync {
    fn plan(&self, request: &PlanRequest) -> EngineResult<Value>;
}

/// Resolves a citation to a downloadable URL.
pub trait SourceResolver: Send + Sync {
    fn resolve(&self, citation: &Citation) -> EngineResult<String>;
}

/// Append-only sink for transition records.
///
/// A failed write aborts the transition that produced the record.
pub trait AuditWriter: Send + Sync {
    fn write(&self, record: &TransitionRecord) -> EngineResult<()>;
}
