//! Scenario 1: RFQ Draft Approval
//!
//! A buyer asks the planner for an RFQ draft. The reply is untidy: camelCase
//! keys, quantities as strings, a blank line item and a citation without a
//! document. The engine stores it as a draft, the buyer reviews the
//! normalized view and approves it exactly once.
//!
//! Walk-through for the demo run:
//!   1. Planner drafts an RFQ; intake records structural warnings
//!   2. Normalized payload drops the blank line item and bad supplier ids
//!   3. Citations resolve to download links; an archived document is a warning
//!   4. Approval materializes RFQ-0001; a second approval is refused
//!   5. A supplier message fails to materialize once, stays drafted, and
//!      succeeds on retry
//!   6. Planner outages surface as upstream errors without storing a draft

use draftgate_contracts::{
    draft::{DraftActionType, DraftStatus, PlanRequest},
    error::{EngineError, EngineResult},
    payload::DraftPayload,
};
use draftgate_policy::EngineConfig;

use crate::runtime::{buyer_admin, ProcurementRuntime};

/// Run Scenario 1: RFQ Draft Approval.
pub fn run_scenario(config: &EngineConfig) -> EngineResult<()> {
    println!("=== Scenario 1: RFQ Draft Approval ===");
    println!();

    let runtime = ProcurementRuntime::new(config, "rfq-approval");
    let buyer = buyer_admin();

    // ── Plan ──────────────────────────────────────────────────────────────────

    let request = PlanRequest::new(
        DraftActionType::RfqDraft,
        "Draft an RFQ for the line 3 bearing retrofit",
    );
    let draft = runtime.drafts.plan(&buyer, &request)?;

    println!("  Planner request:        rfq_draft by {}", buyer.user_id);
    println!("  Draft id:               {}", draft.id);
    println!("  Status:                 {}", draft.status);
    println!(
        "  Confidence:             {}",
        draft.confidence.map(|c| format!("{:.2}", c)).unwrap_or_else(|| "n/a".to_string())
    );
    println!("  Citations kept:         {}", draft.citations.len());
    println!("  Warnings:               {}", draft.warnings.len());
    for warning in &draft.warnings {
        println!("    - {}", warning);
    }
    println!();

    // ── Normalized view ───────────────────────────────────────────────────────

    if let DraftPayload::RfqDraft(rfq) = runtime.drafts.payload(&draft.id)? {
        println!("  Title:                  {}", rfq.title.as_deref().unwrap_or("?"));
        println!("  Due date:               {}", rfq.due_date.as_deref().unwrap_or("?"));
        println!("  Line items:             {} (blank line dropped)", rfq.line_items.len());
        for item in &rfq.line_items {
            println!(
                "    - {} x {}",
                item.item_code.as_deref().unwrap_or("?"),
                item.quantity.unwrap_or_default()
            );
        }
        println!("  Invited suppliers:      {}", rfq.supplier_ids.join(", "));
    }
    println!();

    // ── Sources ───────────────────────────────────────────────────────────────

    let sources = runtime.drafts.citation_sources(&draft.id)?;
    for link in &sources.links {
        println!("  Source:                 {} -> {}", link.doc_id, link.url);
    }
    for warning in &sources.warnings {
        println!("  Source warning:         {}", warning);
    }
    println!();

    // ── Approve once ──────────────────────────────────────────────────────────

    let approved = runtime.drafts.approve(&draft.id, &buyer)?;
    println!(
        "  Approved:               {} {} (by {})",
        approved.entity_type().unwrap_or("?"),
        approved.entity_id().unwrap_or("?"),
        approved.resolved_by.as_deref().unwrap_or("?")
    );

    match runtime.drafts.approve(&draft.id, &buyer) {
        Err(EngineError::InvalidState { status, .. }) => {
            println!("  Second approval:        refused (draft is {}) (expected)", status);
        }
        Err(e) => println!("  Second approval:        unexpected error: {}", e),
        Ok(_) => println!("  Second approval:        unexpectedly succeeded"),
    }
    println!("  Entities created:       {}", runtime.materializer.created().len());
    println!();

    // ── Materializer outage and retry ─────────────────────────────────────────

    let message = runtime.drafts.plan(
        &buyer,
        &PlanRequest::new(DraftActionType::SupplierMessage, "Ask Bravo to confirm lead time"),
    )?;
    runtime.materializer.fail_next();
    match runtime.drafts.approve(&message.id, &buyer) {
        Err(EngineError::UpstreamUnavailable { reason }) => {
            let status = runtime.drafts.get(&message.id)?.status;
            println!("  Supplier message:       materializer down ({}), draft stays {}", reason, status);
        }
        Err(e) => println!("  Supplier message:       unexpected error: {}", e),
        Ok(_) => println!("  Supplier message:       unexpectedly succeeded"),
    }
    let retried = runtime.drafts.approve(&message.id, &buyer)?;
    println!(
        "  Retry:                  {} {}",
        retried.entity_type().unwrap_or("?"),
        retried.entity_id().unwrap_or("?")
    );
    println!();

    // ── Planner outages ───────────────────────────────────────────────────────

    for query in ["simulate a timeout", "return something garbled"] {
        let request = PlanRequest::new(DraftActionType::InventoryWhatIf, query);
        match runtime.drafts.plan(&buyer, &request) {
            Err(EngineError::UpstreamUnavailable { reason }) => {
                println!("  Planner '{}': unavailable ({})", query, reason);
            }
            Err(e) => println!("  Planner '{}': unexpected error: {}", query, e),
            Ok(_) => println!("  Planner '{}': unexpectedly produced a draft", query),
        }
    }
    let open = runtime.drafts.list(&[DraftStatus::Drafted])?;
    println!("  Drafts still open:      {}", open.len());
    println!();

    runtime.print_audit_summary();
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
