//! The workflow engine: ordered, human-approved multi-step workflows.
//!
//! A workflow advances one step at a time:
//!
//!   pending → in_progress → completed
//!          ↘ rejected | aborted | failed
//!
//! `resolve_step` is the only way a step changes. It runs, in order and under
//! the workflow's lock:
//!
//!   Order check → Gate → Completion output → Mutation → Audit
//!
//! Nothing is written unless every stage before the mutation passes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use draftgate_contracts::{
    actor::Actor,
    audit::{AuditSubject, TransitionRecord, SYSTEM_ACTOR},
    error::{EngineError, EngineResult},
    page::CursorPage,
    workflow::{
        NewWorkflow, ReviewDecision, StepApprovalStatus, Workflow, WorkflowId, WorkflowRecord,
        WorkflowStatus, WorkflowStep, WorkflowStepDetail, WorkflowStepSummary,
    },
};

use crate::completion::completion_output;
use crate::cursor::{paginate, Cursor, CursorKey};
use crate::settings::WorkflowSettings;
use crate::traits::{AuditWriter, CapabilityGate, WorkflowRepository};

/// Gate action key checked when a user aborts a workflow.
pub const ABORT_ACTION: &str = "workflow_abort";

pub struct WorkflowEngine {
    repo: Arc<dyn WorkflowRepository>,
    gate: Arc<dyn CapabilityGate>,
    audit: Arc<dyn AuditWriter>,
    settings: WorkflowSettings,
}

impl WorkflowEngine {
    pub fn new(
        repo: Arc<dyn WorkflowRepository>,
        gate: Arc<dyn CapabilityGate>,
        audit: Arc<dyn AuditWriter>,
    ) -> Self {
        Self {
            repo,
            gate,
            audit,
            settings: WorkflowSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a new workflow with its steps in order.
    pub fn create(&self, new: NewWorkflow) -> EngineResult<Workflow> {
        let workflow_type = new.workflow_type.trim();
        if workflow_type.is_empty() {
            return Err(EngineError::validation("workflow_type must not be blank"));
        }
        if new.steps.is_empty() {
            return Err(EngineError::validation("a workflow needs at least one step"));
        }

        let now = Utc::now();
        let steps = new
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| WorkflowStep {
                index,
                action_type: step.action_type,
                name: step.name,
                approval_status: StepApprovalStatus::Pending,
                draft: step.draft,
                notes: None,
                output: None,
                resolved_by: None,
                resolved_at: None,
                updated_at: now,
            })
            .collect();

        let record = WorkflowRecord {
            workflow_id: WorkflowId::new(),
            workflow_type: workflow_type.to_string(),
            status: WorkflowStatus::Pending,
            current_step_index: Some(0),
            steps,
            status_reason: None,
            created_at: now,
            updated_at: now,
        };

        self.audit.write(&transition(&record, None, None, SYSTEM_ACTOR, Value::Null))?;
        self.repo.insert(record.clone())?;

        info!(
            workflow_id = %record.workflow_id,
            workflow_type = %record.workflow_type,
            steps = record.steps.len(),
            "workflow created"
        );
        Ok(record.view())
    }

    pub fn get(&self, workflow_id: &WorkflowId) -> EngineResult<Workflow> {
        Ok(self.repo.get(workflow_id)?.view())
    }

    /// The step awaiting a decision, or `None` once the workflow is terminal.
    pub fn get_next_step(&self, workflow_id: &WorkflowId) -> EngineResult<Option<WorkflowStepDetail>> {
        let record = self.repo.get(workflow_id)?;
        Ok(record.current_step().map(WorkflowStep::detail))
    }

    /// One page of workflows whose status is in `statuses`.
    ///
    /// An empty filter matches every status. `page_size` defaults to the
    /// configured default and is clamped to the configured maximum.
    pub fn list_workflows(
        &self,
        statuses: &[WorkflowStatus],
        cursor: Option<&str>,
        page_size: Option<usize>,
    ) -> EngineResult<CursorPage<Workflow>> {
        let requested = page_size.unwrap_or(self.settings.default_page_size);
        if requested == 0 {
            return Err(EngineError::validation("page_size must be at least 1"));
        }
        let page_size = requested.min(self.settings.max_page_size.max(1));
        let cursor = cursor.map(Cursor::decode).transpose()?;

        let mut records = self.repo.list()?;
        records.retain(|r| statuses.is_empty() || statuses.contains(&r.status));
        records.sort_by_cached_key(listing_key);

        debug!(
            matching = records.len(),
            page_size,
            "listing workflows"
        );
        Ok(paginate(records, cursor.as_ref(), page_size, listing_key).map(|r| r.view()))
    }

    /// Approve or reject the current step.
    ///
    /// # Errors
    ///
    /// - `Conflict` if `decision.step_index` is not the pending step
    /// - `Forbidden` if the gate denies the actor for the step's action type
    /// - `Validation` if an approval cannot produce a completion output
    /// - `AuditWriteFailed` if the resolution cannot be recorded
    ///
    /// On any error the workflow is unchanged.
    pub fn resolve_step(
        &self,
        workflow_id: &WorkflowId,
        actor: &Actor,
        decision: &ReviewDecision,
    ) -> EngineResult<WorkflowStepSummary> {
        let index = decision.step_index;
        debug!(
            workflow_id = %workflow_id,
            step = index,
            approval = decision.approval,
            user = %actor.user_id,
            "resolving workflow step"
        );

        let record = self.repo.update(workflow_id, &mut |record: &mut WorkflowRecord| -> EngineResult<()> {
            // ── Order check ──────────────────────────────────────────────────
            let step = match record.current_step() {
                Some(step) if step.index == index => step,
                Some(step) => {
                    return Err(EngineError::conflict(format!(
                        "step {} of workflow '{}' is not pending; step {} is",
                        index, record.workflow_id, step.index
                    )));
                }
                None => {
                    return Err(EngineError::conflict(format!(
                        "workflow '{}' is {} and has no pending step",
                        record.workflow_id, record.status
                    )));
                }
            };

            // ── Gate ─────────────────────────────────────────────────────────
            if let Some(reason) = self.gate.denial_reason(actor, step.action_type.as_str()) {
                warn!(
                    workflow_id = %record.workflow_id,
                    step = index,
                    user = %actor.user_id,
                    reason = %reason,
                    "step resolution denied by gate"
                );
                return Err(EngineError::forbidden(reason));
            }

            // ── Completion output ────────────────────────────────────────────
            let output = completion_output(&step.action_type, &step.draft, decision)?;

            // ── Mutation ─────────────────────────────────────────────────────
            let now = Utc::now();
            let from = record.status;
            let step = &mut record.steps[index];
            step.approval_status = if decision.approval {
                StepApprovalStatus::Approved
            } else {
                StepApprovalStatus::Rejected
            };
            step.notes = decision
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from);
            step.output = Some(output);
            step.resolved_by = Some(actor.user_id.clone());
            step.resolved_at = Some(now);
            step.updated_at = now;

            if decision.approval {
                match record.first_pending_index() {
                    Some(next) => {
                        record.status = WorkflowStatus::InProgress;
                        record.current_step_index = Some(next);
                    }
                    None => {
                        record.status = WorkflowStatus::Completed;
                        record.current_step_index = None;
                    }
                }
            } else {
                record.status = WorkflowStatus::Rejected;
                record.current_step_index = None;
            }
            record.updated_at = now;

            // ── Audit ────────────────────────────────────────────────────────
            let step = &record.steps[index];
            let detail = json!({
                "approval_status": step.approval_status,
                "output": step.output,
                "notes": step.notes,
            });
            self.audit
                .write(&transition(record, Some(from), Some(index), &actor.user_id, detail))
        })?;

        let step = record
            .steps
            .get(index)
            .ok_or_else(|| EngineError::conflict(format!("step {} does not exist", index)))?;
        info!(
            workflow_id = %record.workflow_id,
            step = index,
            approval_status = %step.approval_status,
            workflow_status = %record.status,
            "workflow step resolved"
        );
        Ok(step.summary())
    }

    /// Stop a workflow on a user's request.
    pub fn abort(&self, workflow_id: &WorkflowId, actor: &Actor, reason: &str) -> EngineResult<Workflow> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::validation("an abort reason is required"));
        }

        let record = self.repo.update(workflow_id, &mut |record: &mut WorkflowRecord| -> EngineResult<()> {
            ensure_open(record, "abort")?;
            if let Some(denial) = self.gate.denial_reason(actor, ABORT_ACTION) {
                warn!(workflow_id = %record.workflow_id, user = %actor.user_id, reason = %denial, "abort denied by gate");
                return Err(EngineError::forbidden(denial));
            }
            self.close(record, WorkflowStatus::Aborted, reason, &actor.user_id, Utc::now())
        })?;

        info!(workflow_id = %record.workflow_id, "workflow aborted");
        Ok(record.view())
    }

    /// Mark a workflow failed after a downstream error. System-initiated.
    pub fn fail(&self, workflow_id: &WorkflowId, reason: &str) -> EngineResult<Workflow> {
        let reason = reason.trim();
        let record = self.repo.update(workflow_id, &mut |record: &mut WorkflowRecord| -> EngineResult<()> {
            ensure_open(record, "fail")?;
            self.close(record, WorkflowStatus::Failed, reason, SYSTEM_ACTOR, Utc::now())
        })?;

        warn!(workflow_id = %record.workflow_id, reason = %reason, "workflow failed");
        Ok(record.view())
    }

    fn close(
        &self,
        record: &mut WorkflowRecord,
        status: WorkflowStatus,
        reason: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let from = record.status;
        record.status = status;
        record.current_step_index = None;
        record.status_reason = Some(reason.to_string()).filter(|r| !r.is_empty());
        record.updated_at = now;
        self.audit
            .write(&transition(record, Some(from), None, actor, json!({ "reason": reason })))
    }
}

fn listing_key(record: &WorkflowRecord) -> CursorKey {
    CursorKey::new(record.updated_at, record.workflow_id.to_string())
}

fn ensure_open(record: &WorkflowRecord, action: &'static str) -> EngineResult<()> {
    if record.status.is_terminal() {
        Err(EngineError::InvalidState {
            entity: "workflow",
            id: record.workflow_id.to_string(),
            status: record.status.to_string(),
            action,
        })
    } else {
        Ok(())
    }
}

fn transition(
    record: &WorkflowRecord,
    from: Option<WorkflowStatus>,
    step_index: Option<usize>,
    actor: &str,
    detail: Value,
) -> TransitionRecord {
    let action_type = step_index
        .and_then(|i| record.steps.get(i))
        .map(|s| s.action_type.as_str().to_string())
        .unwrap_or_else(|| record.workflow_type.clone());
    TransitionRecord {
        subject: AuditSubject::Workflow,
        subject_id: record.workflow_id.to_string(),
        step_index,
        action_type,
        from_status: from.map(|s| s.as_str().to_string()),
        to_status: record.status.as_str().to_string(),
        actor: actor.to_string(),
        detail,
        timestamp: record.updated_at,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
