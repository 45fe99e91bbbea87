//! The draft service: lifecycle of single-shot AI action drafts.
//!
//! A draft moves through exactly one transition:
//!
//!   drafted → approved | rejected | expired
//!
//! Every transition runs inside a repository `update`, so the status check,
//! the gate, the materializer call, and the audit write all see the same
//! locked snapshot. A failure at any point leaves the draft untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use draftgate_contracts::{
    actor::Actor,
    audit::{AuditSubject, TransitionRecord, SYSTEM_ACTOR},
    draft::{
        ActionDraft, CitationSources, DraftId, DraftStatus, NewDraft, PlanRequest, SourceLink,
    },
    error::{EngineError, EngineResult},
    payload::DraftPayload,
};
use draftgate_normalize::{intake_reply, normalize_draft};

use crate::settings::DraftSettings;
use crate::traits::{
    AuditWriter, CapabilityGate, DraftRepository, Materializer, Planner, SourceResolver,
};

/// Owns the draft lifecycle.
///
/// The service is stateless apart from its collaborators; share one instance
/// between threads.
pub struct DraftService {
    repo: Arc<dyn DraftRepository>,
    gate: Arc<dyn CapabilityGate>,
    materializer: Arc<dyn Materializer>,
    audit: Arc<dyn AuditWriter>,
    planner: Option<Arc<dyn Planner>>,
    sources: Option<Arc<dyn SourceResolver>>,
    settings: DraftSettings,
}

impl DraftService {
    pub fn new(
        repo: Arc<dyn DraftRepository>,
        gate: Arc<dyn CapabilityGate>,
        materializer: Arc<dyn Materializer>,
        audit: Arc<dyn AuditWriter>,
    ) -> Self {
        Self {
            repo,
            gate,
            materializer,
            audit,
            planner: None,
            sources: None,
            settings: DraftSettings::default(),
        }
    }

    pub fn with_planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = Some(planner);
        self
    }

    pub fn with_sources(mut self, sources: Arc<dyn SourceResolver>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn with_settings(mut self, settings: DraftSettings) -> Self {
        self.settings = settings;
        self
    }

    // ── Creation ─────────────────────────────────────────────────────────────

    /// Store a new draft in `drafted` state.
    ///
    /// Used by trusted callers that already hold normalized creation input.
    pub fn create(&self, new: NewDraft) -> EngineResult<ActionDraft> {
        self.insert_new(new, SYSTEM_ACTOR)
    }

    /// Ask the planner for a draft and store it.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor is not entitled to AI drafting
    /// - `UpstreamUnavailable` if no planner is configured, the planner
    ///   fails, or its reply carries no draft
    pub fn plan(&self, actor: &Actor, request: &PlanRequest) -> EngineResult<ActionDraft> {
        if let Some(reason) = self.gate.entitlement_denial(actor) {
            warn!(user = %actor.user_id, reason = %reason, "plan request denied");
            return Err(EngineError::forbidden(reason));
        }

        let planner = self
            .planner
            .as_ref()
            .ok_or_else(|| EngineError::upstream("no planner is configured"))?;

        debug!(
            user = %actor.user_id,
            action_type = %request.action_type,
            "requesting draft from planner"
        );
        let reply = planner.plan(request).map_err(as_upstream)?;
        let new = intake_reply(request.action_type, &reply)?;

        if !new.warnings.is_empty() {
            debug!(
                action_type = %request.action_type,
                warnings = new.warnings.len(),
                "planner reply accepted with warnings"
            );
        }
        self.insert_new(new, &actor.user_id)
    }

    fn insert_new(&self, new: NewDraft, actor: &str) -> EngineResult<ActionDraft> {
        let draft = ActionDraft::from_new(new, Utc::now());
        // Audited before it becomes visible: a failed write stores nothing.
        self.audit.write(&record(&draft, None, actor, Value::Null))?;
        self.repo.insert(draft.clone())?;

        info!(
            draft_id = %draft.id,
            action_type = %draft.action_type,
            "draft created"
        );
        Ok(draft)
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn get(&self, draft_id: &DraftId) -> EngineResult<ActionDraft> {
        self.repo.get(draft_id)
    }

    /// The normalized payload of a draft.
    ///
    /// Normalization runs on every read, so the raw stored payload is never
    /// exposed.
    pub fn payload(&self, draft_id: &DraftId) -> EngineResult<DraftPayload> {
        let draft = self.repo.get(draft_id)?;
        Ok(normalize_draft(draft.action_type, &draft.payload))
    }

    /// Drafts whose status is in `statuses`, newest first.
    ///
    /// An empty filter matches every status.
    pub fn list(&self, statuses: &[DraftStatus]) -> EngineResult<Vec<ActionDraft>> {
        let mut drafts = self.repo.list()?;
        drafts.retain(|d| statuses.is_empty() || statuses.contains(&d.status));
        drafts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        Ok(drafts)
    }

    /// Resolve the draft's citations to downloadable sources.
    ///
    /// Lookup failures never fail the call; each becomes a warning.
    pub fn citation_sources(&self, draft_id: &DraftId) -> EngineResult<CitationSources> {
        let draft = self.repo.get(draft_id)?;
        let mut sources = CitationSources::default();

        for citation in &draft.citations {
            let resolved = match &self.sources {
                Some(resolver) => resolver.resolve(citation),
                None => Err(EngineError::upstream("source lookup is not configured")),
            };
            match resolved {
                Ok(url) => sources.links.push(SourceLink {
                    doc_id: citation.doc_id.clone(),
                    url,
                }),
                Err(e) => {
                    debug!(draft_id = %draft_id, doc_id = %citation.doc_id, error = %e, "citation source unavailable");
                    sources
                        .warnings
                        .push(format!("source for document '{}' is unavailable: {}", citation.doc_id, e));
                }
            }
        }
        Ok(sources)
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Approve a draft and materialize its entity.
    ///
    /// # Pipeline
    ///
    /// 1. Status must be `drafted`, else `InvalidState`
    /// 2. Gate check for the draft's action type, else `Forbidden`
    /// 3. Materializer creates the entity; a failure is `UpstreamUnavailable`
    ///    and the draft stays `drafted`
    /// 4. Status, entity reference, and resolver are stamped
    /// 5. The transition is audited
    ///
    /// Steps 1 through 5 run under the draft's lock. Of two concurrent
    /// approvals exactly one reaches step 3; the other sees `approved` and
    /// fails at step 1.
    pub fn approve(&self, draft_id: &DraftId, actor: &Actor) -> EngineResult<ActionDraft> {
        debug!(draft_id = %draft_id, user = %actor.user_id, "approve requested");

        let approved = self.repo.update(draft_id, &mut |draft: &mut ActionDraft| -> EngineResult<()> {
            ensure_drafted(draft, "approve")?;

            if let Some(reason) = self.gate.denial_reason(actor, draft.action_type.as_str()) {
                warn!(
                    draft_id = %draft.id,
                    user = %actor.user_id,
                    reason = %reason,
                    "approval denied by gate"
                );
                return Err(EngineError::forbidden(reason));
            }

            let payload = normalize_draft(draft.action_type, &draft.payload);
            let entity = self.materializer.materialize(draft, &payload).map_err(|e| {
                warn!(draft_id = %draft.id, error = %e, "materialization failed");
                as_upstream(e)
            })?;

            let now = Utc::now();
            draft.status = DraftStatus::Approved;
            draft.entity = Some(entity);
            draft.resolved_by = Some(actor.user_id.clone());
            draft.resolved_at = Some(now);
            draft.updated_at = now;

            let detail = json!({
                "entity_type": draft.entity_type(),
                "entity_id": draft.entity_id(),
            });
            self.audit
                .write(&record(draft, Some(DraftStatus::Drafted), &actor.user_id, detail))
        })?;

        info!(
            draft_id = %approved.id,
            entity_type = approved.entity_type().unwrap_or_default(),
            entity_id = approved.entity_id().unwrap_or_default(),
            "draft approved"
        );
        Ok(approved)
    }

    /// Reject a draft with a reviewer's reason.
    ///
    /// The reason is checked before anything else: a blank reason is a
    /// `Validation` error and the draft is not looked at.
    pub fn reject(&self, draft_id: &DraftId, actor: &Actor, reason: &str) -> EngineResult<ActionDraft> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::validation("a rejection reason is required"));
        }

        let rejected = self.repo.update(draft_id, &mut |draft: &mut ActionDraft| -> EngineResult<()> {
            ensure_drafted(draft, "reject")?;

            if let Some(denial) = self.gate.denial_reason(actor, draft.action_type.as_str()) {
                warn!(draft_id = %draft.id, user = %actor.user_id, reason = %denial, "rejection denied by gate");
                return Err(EngineError::forbidden(denial));
            }

            let now = Utc::now();
            draft.status = DraftStatus::Rejected;
            draft.rejection_reason = Some(reason.to_string());
            draft.resolved_by = Some(actor.user_id.clone());
            draft.resolved_at = Some(now);
            draft.updated_at = now;

            self.audit.write(&record(
                draft,
                Some(DraftStatus::Drafted),
                &actor.user_id,
                json!({ "reason": reason }),
            ))
        })?;

        info!(draft_id = %rejected.id, "draft rejected");
        Ok(rejected)
    }

    /// Expire a draft. System-initiated; no gate check.
    pub fn expire(&self, draft_id: &DraftId) -> EngineResult<ActionDraft> {
        let expired = self.repo.update(draft_id, &mut |draft: &mut ActionDraft| -> EngineResult<()> {
            ensure_drafted(draft, "expire")?;

            let now = Utc::now();
            draft.status = DraftStatus::Expired;
            draft.resolved_at = Some(now);
            draft.updated_at = now;

            self.audit
                .write(&record(draft, Some(DraftStatus::Drafted), SYSTEM_ACTOR, Value::Null))
        })?;

        info!(draft_id = %expired.id, "draft expired");
        Ok(expired)
    }

    /// Expire every `drafted` draft older than the configured retention.
    ///
    /// Does nothing when no retention is configured. Drafts resolved by
    /// someone else while the sweep runs are skipped.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> EngineResult<Vec<ActionDraft>> {
        let Some(retention) = self.settings.retention() else {
            debug!("draft retention not configured, skipping expiry sweep");
            return Ok(Vec::new());
        };
        let cutoff = now - retention;

        let stale: Vec<DraftId> = self
            .repo
            .list()?
            .into_iter()
            .filter(|d| d.status == DraftStatus::Drafted && d.created_at <= cutoff)
            .map(|d| d.id)
            .collect();

        let mut expired = Vec::with_capacity(stale.len());
        for id in stale {
            match self.expire(&id) {
                Ok(draft) => expired.push(draft),
                Err(EngineError::InvalidState { status, .. }) => {
                    debug!(draft_id = %id, status = %status, "draft resolved during sweep, skipped");
                }
                Err(e) => return Err(e),
            }
        }

        info!(expired = expired.len(), "expiry sweep finished");
        Ok(expired)
    }
}

fn ensure_drafted(draft: &ActionDraft, action: &'static str) -> EngineResult<()> {
    if draft.status == DraftStatus::Drafted {
        Ok(())
    } else {
        Err(EngineError::InvalidState {
            entity: "draft",
            id: draft.id.to_string(),
            status: draft.status.to_string(),
            action,
        })
    }
}

/// Collaborator failures surface as `UpstreamUnavailable` whatever their kind.
fn as_upstream(error: EngineError) -> EngineError {
    match error {
        e @ EngineError::UpstreamUnavailable { .. } => e,
        other => EngineError::upstream(other.to_string()),
    }
}

fn record(draft: &ActionDraft, from: Option<DraftStatus>, actor: &str, detail: Value) -> TransitionRecord {
    TransitionRecord {
        subject: AuditSubject::Draft,
        subject_id: draft.id.to_string(),
        step_index: None,
        action_type: draft.action_type.as_str().to_string(),
        from_status: from.map(|s| s.as_str().to_string()),
        to_status: draft.status.as_str().to_string(),
        actor: actor.to_string(),
        detail,
        timestamp: draft.updated_at,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use serde_json::json;

    use draftgate_contracts::{
        actor::Actor,
        audit::SYSTEM_ACTOR,
        draft::{Citation, DraftActionType, DraftStatus, NewDraft, PlanRequest},
        error::EngineError,
        payload::DraftPayload,
    };

    use crate::settings::DraftSettings;
    use crate::testing::{
        reviewer, MemoryDrafts, MockMaterializer, MockPlanner, MockSources, RecordingAudit, RoleGate,
    };

    use super::DraftService;

    struct Harness {
        service: DraftService,
        materializer: Arc<MockMaterializer>,
        audit: Arc<RecordingAudit>,
    }

    fn harness() -> Harness {
        let materializer = Arc::new(MockMaterializer::new());
        let audit = Arc::new(RecordingAudit::new());
        let service = DraftService::new(
            Arc::new(MemoryDrafts::default()),
            Arc::new(RoleGate),
            materializer.clone(),
            audit.clone(),
        );
        Harness { service, materializer, audit }
    }

    fn rfq() -> NewDraft {
        NewDraft::new(DraftActionType::RfqDraft, json!({ "title": "Bearings", "line_items": [] }))
    }

    // ── Approve ──────────────────────────────────────────────────────────────

    #[test]
    fn test_approve_materializes_and_stamps() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();

        let approved = h.service.approve(&draft.id, &reviewer()).unwrap();

        assert_eq!(approved.status, DraftStatus::Approved);
        assert_eq!(approved.entity_type(), Some("rfq"));
        assert!(approved.entity_id().is_some());
        assert_eq!(approved.resolved_by.as_deref(), Some("rev-1"));
        assert!(approved.resolved_at.is_some());
        assert_eq!(h.materializer.calls(), 1);

        let records = h.audit.records();
        assert_eq!(records.len(), 2, "creation and approval are audited");
        assert_eq!(records[1].from_status.as_deref(), Some("drafted"));
        assert_eq!(records[1].to_status, "approved");
        assert_eq!(records[1].detail["entity_type"], json!("rfq"));
    }

    #[test]
    fn test_second_approve_is_invalid_state() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();
        h.service.approve(&draft.id, &reviewer()).unwrap();

        let err = h.service.approve(&draft.id, &reviewer()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { action: "approve", .. }));
        assert_eq!(h.materializer.calls(), 1, "entity must be created once");
    }

    #[test]
    fn test_denied_approve_leaves_draft_untouched() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();

        let outsider = Actor::new("u-9").with_feature("ai.actions");
        let err = h.service.approve(&draft.id, &outsider).unwrap_err();

        assert!(matches!(err, EngineError::Forbidden { .. }));
        assert_eq!(h.service.get(&draft.id).unwrap().status, DraftStatus::Drafted);
        assert_eq!(h.materializer.calls(), 0);
        assert_eq!(h.audit.records().len(), 1);
    }

    #[test]
    fn test_materializer_failure_is_upstream_and_rolls_back() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();
        h.materializer.fail_next();

        let err = h.service.approve(&draft.id, &reviewer()).unwrap_err();
        assert!(matches!(err, EngineError::UpstreamUnavailable { .. }));

        let stored = h.service.get(&draft.id).unwrap();
        assert_eq!(stored.status, DraftStatus::Drafted);
        assert!(stored.entity.is_none());
        assert!(stored.resolved_by.is_none());

        // A retry after the outage succeeds.
        let approved = h.service.approve(&draft.id, &reviewer()).unwrap();
        assert_eq!(approved.status, DraftStatus::Approved);
    }

    #[test]
    fn test_audit_failure_aborts_transition() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();
        h.audit.fail_writes(true);

        let err = h.service.approve(&draft.id, &reviewer()).unwrap_err();
        assert!(matches!(err, EngineError::AuditWriteFailed { .. }));
        assert_eq!(h.service.get(&draft.id).unwrap().status, DraftStatus::Drafted);
    }

    #[test]
    fn test_audit_failure_stores_no_draft() {
        let h = harness();
        h.audit.fail_writes(true);

        let err = h.service.create(rfq()).unwrap_err();
        assert!(matches!(err, EngineError::AuditWriteFailed { .. }));
        assert!(h.service.list(&[]).unwrap().is_empty());
        assert!(h.audit.records().is_empty());
    }

    #[test]
    fn test_unknown_draft_is_not_found() {
        let h = harness();
        let missing = draftgate_contracts::draft::DraftId::new();
        assert!(matches!(
            h.service.approve(&missing, &reviewer()),
            Err(EngineError::NotFound { entity: "draft", .. })
        ));
    }

    // ── Reject ───────────────────────────────────────────────────────────────

    #[test]
    fn test_reject_requires_reason() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();

        for blank in ["", "   ", "\n\t"] {
            let err = h.service.reject(&draft.id, &reviewer(), blank).unwrap_err();
            assert!(matches!(err, EngineError::Validation { .. }));
        }
        assert_eq!(h.service.get(&draft.id).unwrap().status, DraftStatus::Drafted);

        let rejected = h.service.reject(&draft.id, &reviewer(), "  wrong supplier list ").unwrap();
        assert_eq!(rejected.status, DraftStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("wrong supplier list"));
        assert!(rejected.entity.is_none());
        assert_eq!(h.materializer.calls(), 0);
    }

    #[test]
    fn test_terminal_drafts_refuse_every_transition() {
        let h = harness();
        let draft = h.service.create(rfq()).unwrap();
        h.service.reject(&draft.id, &reviewer(), "duplicate").unwrap();

        assert!(matches!(
            h.service.approve(&draft.id, &reviewer()),
            Err(EngineError::InvalidState { .. })
        ));
        assert!(matches!(
            h.service.reject(&draft.id, &reviewer(), "again"),
            Err(EngineError::InvalidState { .. })
        ));
        assert!(matches!(h.service.expire(&draft.id), Err(EngineError::InvalidState { .. })));
    }

    // ── Expiry ───────────────────────────────────────────────────────────────

    #[test]
    fn test_expire_stale_uses_retention() {
        let h = harness();
        let service = h.service.with_settings(DraftSettings { retention_hours: Some(24) });

        let old = service.create(rfq()).unwrap();
        let resolved = service.create(rfq()).unwrap();
        service.reject(&resolved.id, &reviewer(), "not needed").unwrap();

        // Nothing is stale yet.
        assert!(service.expire_stale(Utc::now()).unwrap().is_empty());

        let later = Utc::now() + Duration::hours(25);
        let expired = service.expire_stale(later).unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, old.id);
        assert_eq!(expired[0].status, DraftStatus::Expired);

        let last = h.audit.records().pop().unwrap();
        assert_eq!(last.actor, SYSTEM_ACTOR);
        assert_eq!(last.to_status, "expired");
    }

    #[test]
    fn test_expire_stale_without_retention_is_noop() {
        let h = harness();
        h.service.create(rfq()).unwrap();
        let far_future = Utc::now() + Duration::days(3650);
        assert!(h.service.expire_stale(far_future).unwrap().is_empty());
    }

    // ── Planning ─────────────────────────────────────────────────────────────

    #[test]
    fn test_plan_stores_normalizable_draft() {
        let h = harness();
        let planner = Arc::new(MockPlanner::replying(json!({
            "draft": {
                "payload": { "subject": " Delivery delay ", "supplier": "S1" },
                "summary": "Ask S1 about the delay",
                "confidence": 1.7,
                "citations": [{ "doc_id": "contract-12" }, { "snippet": "orphan" }]
            }
        })));
        let service = h.service.with_planner(planner);

        let request = PlanRequest::new(DraftActionType::SupplierMessage, "chase supplier S1");
        let draft = service.plan(&reviewer(), &request).unwrap();

        assert_eq!(draft.status, DraftStatus::Drafted);
        assert_eq!(draft.confidence, None, "out-of-range confidence is dropped");
        assert_eq!(draft.citations.len(), 1);

        match service.payload(&draft.id).unwrap() {
            DraftPayload::SupplierMessage(msg) => {
                assert_eq!(msg.subject.as_deref(), Some("Delivery delay"));
                assert_eq!(msg.supplier.unwrap().supplier_id.as_deref(), Some("S1"));
            }
            other => panic!("expected SupplierMessage, got {:?}", other),
        }
        assert_eq!(h.audit.records()[0].actor, "rev-1");
    }

    #[test]
    fn test_plan_requires_entitlement_and_planner() {
        let h = harness();
        let request = PlanRequest::new(DraftActionType::RfqDraft, "bearings");

        let unentitled = Actor::new("u-2").with_role("buyer_admin");
        assert!(matches!(h.service.plan(&unentitled, &request), Err(EngineError::Forbidden { .. })));

        assert!(matches!(
            h.service.plan(&reviewer(), &request),
            Err(EngineError::UpstreamUnavailable { .. })
        ));
    }

    #[test]
    fn test_plan_without_draft_stores_nothing() {
        let h = harness();
        let service = h.service.with_planner(Arc::new(MockPlanner::replying(json!({ "error": "busy" }))));
        let request = PlanRequest::new(DraftActionType::RfqDraft, "bearings");

        assert!(matches!(
            service.plan(&reviewer(), &request),
            Err(EngineError::UpstreamUnavailable { .. })
        ));
        assert!(service.list(&[]).unwrap().is_empty());
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    #[test]
    fn test_list_filters_by_status() {
        let h = harness();
        let a = h.service.create(rfq()).unwrap();
        let b = h.service.create(rfq()).unwrap();
        h.service.approve(&a.id, &reviewer()).unwrap();

        let drafted = h.service.list(&[DraftStatus::Drafted]).unwrap();
        assert_eq!(drafted.len(), 1);
        assert_eq!(drafted[0].id, b.id);
        assert_eq!(h.service.list(&[]).unwrap().len(), 2);
    }

    #[test]
    fn test_citation_sources_turn_failures_into_warnings() {
        let h = harness();
        let service = h.service.with_sources(Arc::new(MockSources::knowing(&["catalog-7"])));

        let mut new = rfq();
        new.citations = vec![Citation::new("catalog-7"), Citation::new("missing-doc")];
        let draft = service.create(new).unwrap();

        let sources = service.citation_sources(&draft.id).unwrap();
        assert_eq!(sources.links.len(), 1);
        assert_eq!(sources.links[0].doc_id, "catalog-7");
        assert_eq!(sources.warnings.len(), 1);
        assert!(sources.warnings[0].contains("missing-doc"));
    }

    #[test]
    fn test_citation_sources_without_resolver() {
        let h = harness();
        let mut new = rfq();
        new.citations = vec![Citation::new("catalog-7")];
        let draft = h.service.create(new).unwrap();

        let sources = h.service.citation_sources(&draft.id).unwrap();
        assert!(sources.links.is_empty());
        assert_eq!(sources.warnings.len(), 1);
    }

    #[test]
    fn test_service_is_shareable_across_threads() {
        fn shareable<T: Send + Sync>() {}
        shareable::<DraftService>();
    }
}
