//! Workflow and workflow-step types.
//!
//! A workflow is an ordered list of steps, each needing its own approval.
//! Steps are stored inside their workflow record, so a step can never belong
//! to two workflows.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkflowId(pub uuid::Uuid);

impl WorkflowId {
    /// Create a new, unique workflow ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Rejected,
    Aborted,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Rejected => "rejected",
            WorkflowStatus::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkflowStatus::Pending | WorkflowStatus::InProgress)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a workflow step does once approved.
///
/// Only `compare_quotes` and `po_draft` have dedicated draft shapes; anything
/// else is carried through as its raw name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepActionType {
    CompareQuotes,
    PoDraft,
    Other(String),
}

impl StepActionType {
    pub fn as_str(&self) -> &str {
        match self {
            StepActionType::CompareQuotes => "compare_quotes",
            StepActionType::PoDraft => "po_draft",
            StepActionType::Other(name) => name.as_str(),
        }
    }
}

impl From<String> for StepActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "compare_quotes" => StepActionType::CompareQuotes,
            "po_draft" => StepActionType::PoDraft,
            _ => StepActionType::Other(value),
        }
    }
}

impl From<&str> for StepActionType {
    fn from(value: &str) -> Self {
        StepActionType::from(value.to_string())
    }
}

impl From<StepActionType> for String {
    fn from(value: StepActionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StepActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval status of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for StepApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepApprovalStatus::Pending => "pending",
            StepApprovalStatus::Approved => "approved",
            StepApprovalStatus::Rejected => "rejected",
        })
    }
}

/// The outcome recorded on a resolved step.
///
/// For quote comparisons the payload always names the supplier the reviewer
/// selected, so an accepted recommendation and a manual override stay
/// distinguishable in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutput {
    pub summary: String,
    pub payload: serde_json::Value,
}

/// The full stored form of a step, owned by its workflow record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub index: usize,
    pub action_type: StepActionType,
    pub name: String,
    pub approval_status: StepApprovalStatus,
    /// Raw planner JSON; normalized on demand.
    pub draft: serde_json::Value,
    pub notes: Option<String>,
    pub output: Option<CompletionOutput>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowStep {
    pub fn summary(&self) -> WorkflowStepSummary {
        WorkflowStepSummary {
            index: self.index,
            action_type: self.action_type.clone(),
            approval_status: self.approval_status,
            name: self.name.clone(),
        }
    }

    pub fn detail(&self) -> WorkflowStepDetail {
        WorkflowStepDetail {
            step_index: self.index,
            action_type: self.action_type.clone(),
            name: self.name.clone(),
            draft: self.draft.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight step view embedded in `Workflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStepSummary {
    pub index: usize,
    pub action_type: StepActionType,
    pub approval_status: StepApprovalStatus,
    pub name: String,
}

/// The step currently awaiting resolution, with its raw draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStepDetail {
    pub step_index: usize,
    pub action_type: StepActionType,
    pub name: String,
    pub draft: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// The stored form of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub workflow_id: WorkflowId,
    pub workflow_type: String,
    pub status: WorkflowStatus,
    /// Index of the first pending step; `None` once the workflow is terminal.
    pub current_step_index: Option<usize>,
    pub steps: Vec<WorkflowStep>,
    /// Why the workflow was aborted or failed.
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowRecord {
    /// The public listing view of this record.
    pub fn view(&self) -> Workflow {
        Workflow {
            workflow_id: self.workflow_id.clone(),
            workflow_type: self.workflow_type.clone(),
            status: self.status,
            current_step_index: self.current_step_index,
            steps: self.steps.iter().map(WorkflowStep::summary).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The step at `current_step_index`, if any.
    pub fn current_step(&self) -> Option<&WorkflowStep> {
        self.current_step_index.and_then(|i| self.steps.get(i))
    }

    /// Index of the first step still pending.
    pub fn first_pending_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.approval_status == StepApprovalStatus::Pending)
    }
}

/// Public view of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub workflow_id: WorkflowId,
    pub workflow_type: String,
    pub status: WorkflowStatus,
    pub current_step_index: Option<usize>,
    pub steps: Vec<WorkflowStepSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a single step of `WorkflowEngine::create`.
#[derive(Debug, Clone)]
pub struct NewStep {
    pub action_type: StepActionType,
    pub name: String,
    pub draft: serde_json::Value,
}

impl NewStep {
    pub fn new(
        action_type: impl Into<StepActionType>,
        name: impl Into<String>,
        draft: serde_json::Value,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            name: name.into(),
            draft,
        }
    }
}

/// Input to `WorkflowEngine::create`.
#[derive(Debug, Clone)]
pub struct NewWorkflow {
    pub workflow_type: String,
    pub steps: Vec<NewStep>,
}

/// A reviewer's decision on the current step.
#[derive(Debug, Clone, Default)]
pub struct ReviewDecision {
    pub step_index: usize,
    pub approval: bool,
    /// Supplier picked by the reviewer on a quote comparison; may differ from
    /// the AI recommendation.
    pub selected_supplier: Option<String>,
    pub notes: Option<String>,
}

impl ReviewDecision {
    pub fn approve(step_index: usize) -> Self {
        Self {
            step_index,
            approval: true,
            ..Self::default()
        }
    }

    pub fn reject(step_index: usize) -> Self {
        Self {
            step_index,
            approval: false,
            ..Self::default()
        }
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.selected_supplier = Some(supplier_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
