//! Scenario 2: Quote Comparison to Purchase Order
//!
//! A two-step award workflow. The AI compares three supplier quotes and
//! recommends S1; the reviewer overrides it in favour of S2. The purchase
//! order drafted for S2 then needs a second approval from someone allowed to
//! place orders.
//!
//! Walk-through for the demo run:
//!   1. Workflow created: compare_quotes → po_draft, status pending
//!   2. Resolving step 1 first is a conflict; steps resolve strictly in order
//!   3. Reviewer picks S2 over the AI recommendation; the output records both
//!   4. A quotes-only buyer cannot approve the PO step (orders.write scope)
//!   5. A buyer with order rights approves the PO; the workflow completes
//!   6. Workflow listing is paged with opaque cursors, forward and back

use serde_json::json;

use draftgate_contracts::{
    error::{EngineError, EngineResult},
    workflow::{
        NewStep, NewWorkflow, ReviewDecision, StepActionType, WorkflowId, WorkflowStatus,
    },
};
use draftgate_core::traits::WorkflowRepository;
use draftgate_policy::EngineConfig;

use crate::mock_data::{po_draft, quote_comparison};
use crate::runtime::{quotes_only_buyer, scoped_buyer, ProcurementRuntime};

/// Workflow type used for supplier awards.
pub const AWARD_WORKFLOW: &str = "rfq_award";

/// The award workflow for the bearings RFQ, with the PO drafted for `supplier`.
pub fn award_workflow(supplier_id: &str, supplier_name: &str) -> NewWorkflow {
    NewWorkflow {
        workflow_type: AWARD_WORKFLOW.to_string(),
        steps: vec![
            NewStep::new(StepActionType::CompareQuotes, "Compare supplier quotes", quote_comparison()),
            NewStep::new(
                StepActionType::PoDraft,
                "Approve purchase order",
                po_draft(supplier_id, supplier_name),
            ),
        ],
    }
}

/// Print the completion output stored on step `index`.
fn print_step_output(runtime: &ProcurementRuntime, workflow_id: &WorkflowId, index: usize) -> EngineResult<()> {
    let record = runtime.workflow_store.get(workflow_id)?;
    if let Some(output) = record.steps.get(index).and_then(|s| s.output.as_ref()) {
        println!("  Step {} output:          {}", index, output.summary);
    }
    Ok(())
}

/// Run Scenario 2: Quote Comparison to Purchase Order.
pub fn run_scenario(config: &EngineConfig) -> EngineResult<()> {
    println!("=== Scenario 2: Quote Comparison to Purchase Order ===");
    println!();

    let runtime = ProcurementRuntime::new(config, "quote-to-po");
    let sourcing = quotes_only_buyer();
    let purchasing = scoped_buyer();

    // ── Create ────────────────────────────────────────────────────────────────

    let workflow = runtime.workflows.create(award_workflow("S2", "Bravo Industrial"))?;
    let id = workflow.workflow_id.clone();
    println!("  Workflow:               {} ({})", id, workflow.workflow_type);
    println!("  Status:                 {}", workflow.status);
    for step in &workflow.steps {
        println!("    [{}] {} ({}) {}", step.index, step.name, step.action_type, step.approval_status);
    }
    if let Some(next) = runtime.workflows.get_next_step(&id)? {
        println!("  Next step:              {} ({})", next.step_index, next.action_type);
    }
    println!();

    // ── Out of order ──────────────────────────────────────────────────────────

    match runtime.workflows.resolve_step(&id, &purchasing, &ReviewDecision::approve(1)) {
        Err(EngineError::Conflict { reason }) => {
            println!("  Resolve step 1 first:   CONFLICT ({}) (expected)", reason);
        }
        Err(e) => println!("  Resolve step 1 first:   unexpected error: {}", e),
        Ok(_) => println!("  Resolve step 1 first:   unexpectedly succeeded"),
    }

    // ── Override the AI recommendation ────────────────────────────────────────

    let decision = ReviewDecision::approve(0)
        .with_supplier("S2")
        .with_notes("  Bravo ships in 9 days; line 3 restart cannot wait 21.  ");
    let step = runtime.workflows.resolve_step(&id, &sourcing, &decision)?;
    println!("  Step 0 by {}:   {}", sourcing.user_id, step.approval_status);
    print_step_output(&runtime, &id, 0)?;
    println!("  Workflow status:        {}", runtime.workflows.get(&id)?.status);
    println!();

    // ── Scoped approval of the PO ─────────────────────────────────────────────

    match runtime.workflows.resolve_step(&id, &sourcing, &ReviewDecision::approve(1)) {
        Err(EngineError::Forbidden { reason }) => {
            println!("  Step 1 by {}:   FORBIDDEN ({}) (expected)", sourcing.user_id, reason);
        }
        Err(e) => println!("  Step 1 by {}:   unexpected error: {}", sourcing.user_id, e),
        Ok(_) => println!("  Step 1 by {}:   unexpectedly succeeded", sourcing.user_id),
    }

    let step = runtime.workflows.resolve_step(&id, &purchasing, &ReviewDecision::approve(1))?;
    println!("  Step 1 by {}: {}", purchasing.user_id, step.approval_status);
    print_step_output(&runtime, &id, 1)?;
    let finished = runtime.workflows.get(&id)?;
    println!(
        "  Workflow status:        {} (next step: {})",
        finished.status,
        if runtime.workflows.get_next_step(&id)?.is_some() { "pending" } else { "none" }
    );
    println!();

    // ── Listing ───────────────────────────────────────────────────────────────

    for (supplier, name) in [("S1", "Acme Bearings"), ("S3", "Corvid Supply"), ("S1", "Acme Bearings")] {
        runtime.workflows.create(award_workflow(supplier, name))?;
    }
    let declined = runtime.workflows.create(award_workflow("S3", "Corvid Supply"))?;
    runtime.workflows.resolve_step(
        &declined.workflow_id,
        &sourcing,
        &ReviewDecision::reject(0).with_notes("Quotes expired"),
    )?;

    let mut cursor: Option<String> = None;
    let mut page_number = 1;
    loop {
        let page = runtime.workflows.list_workflows(&[], cursor.as_deref(), Some(2))?;
        let statuses: Vec<String> = page.items.iter().map(|w| w.status.to_string()).collect();
        println!("  Page {}:                 [{}]", page_number, statuses.join(", "));
        if !page.has_next {
            if let Some(prev) = page.prev_cursor.as_deref() {
                let back = runtime.workflows.list_workflows(&[], Some(prev), Some(2))?;
                println!("  Back one page:          {} workflow(s)", back.items.len());
            }
            break;
        }
        cursor = page.next_cursor;
        page_number += 1;
    }

    let open = runtime
        .workflows
        .list_workflows(&[WorkflowStatus::Pending, WorkflowStatus::InProgress], None, None)?;
    let rejected = runtime.workflows.list_workflows(&[WorkflowStatus::Rejected], None, None)?;
    println!("  Open workflows:         {}", open.items.len());
    println!("  Rejected workflows:     {}", rejected.items.len());
    println!("  Invalid cursor:         {}", match runtime.workflows.list_workflows(&[], Some("not-a-cursor"), None) {
        Err(EngineError::Validation { .. }) => "rejected (expected)",
        _ => "unexpectedly accepted",
    });
    println!();

    runtime.print_audit_summary();
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
