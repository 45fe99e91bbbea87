//! In-memory implementations of the repository traits.

use tracing::trace;

use draftgate_contracts::{
    draft::{ActionDraft, DraftId},
    error::EngineResult,
    workflow::{WorkflowId, WorkflowRecord},
};
use draftgate_core::traits::{DraftRepository, Mutation, WorkflowRepository};

use crate::table::Table;

/// Drafts held in process memory.
pub struct InMemoryDraftRepository {
    table: Table<DraftId, ActionDraft>,
}

impl InMemoryDraftRepository {
    pub fn new() -> Self {
        Self { table: Table::new("draft") }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDraftRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftRepository for InMemoryDraftRepository {
    fn insert(&self, draft: ActionDraft) -> EngineResult<()> {
        trace!(draft_id = %draft.id, "inserting draft");
        self.table.insert(draft.id.clone(), draft)
    }

    fn get(&self, id: &DraftId) -> EngineResult<ActionDraft> {
        self.table.get(id)
    }

    fn update(&self, id: &DraftId, mutation: Mutation<'_, ActionDraft>) -> EngineResult<ActionDraft> {
        self.table.update(id, mutation)
    }

    fn list(&self) -> EngineResult<Vec<ActionDraft>> {
        Ok(self.table.snapshot())
    }
}

/// Workflows held in process memory.
pub struct InMemoryWorkflowRepository {
    table: Table<WorkflowId, WorkflowRecord>,
}

impl InMemoryWorkflowRepository {
    pub fn new() -> Self {
        Self { table: Table::new("workflow") }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryWorkflowRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowRepository for InMemoryWorkflowRepository {
    fn insert(&self, record: WorkflowRecord) -> EngineResult<()> {
        trace!(workflow_id = %record.workflow_id, "inserting workflow");
        self.table.insert(record.workflow_id.clone(), record)
    }

    fn get(&self, id: &WorkflowId) -> EngineResult<WorkflowRecord> {
        self.table.get(id)
    }

    fn update(
        &self,
        id: &WorkflowId,
        mutation: Mutation<'_, WorkflowRecord>,
    ) -> EngineResult<WorkflowRecord> {
        self.table.update(id, mutation)
    }

    fn list(&self) -> EngineResult<Vec<WorkflowRecord>> {
        Ok(self.table.snapshot())
    }
}
