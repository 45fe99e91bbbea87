//! Scenario 4: Draft Expiry Sweep
//!
//! Drafts nobody decides on do not linger. The procurement configuration
//! sets `drafts.retention_hours = 72`; a sweep run three days later expires
//! every draft still open and leaves resolved drafts alone.
//!
//! Walk-through for the demo run:
//!   1. One draft of every action type is planned; the RFQ is approved
//!   2. A sweep "now" expires nothing; the drafts are fresh
//!   3. A sweep 73 hours later expires the three open drafts
//!   4. Expired drafts can no longer be approved
//!   5. Without a retention setting the sweep does nothing

use chrono::{Duration, Utc};

use draftgate_contracts::{
    draft::{DraftActionType, DraftStatus, PlanRequest},
    error::{EngineError, EngineResult},
};
use draftgate_policy::EngineConfig;

use crate::runtime::{buyer_admin, ProcurementRuntime};

/// How long after planning the sweep in this scenario runs.
pub const SWEEP_DELAY_HOURS: i64 = 73;

/// Run Scenario 4: Draft Expiry Sweep.
pub fn run_scenario(config: &EngineConfig) -> EngineResult<()> {
    println!("=== Scenario 4: Draft Expiry Sweep ===");
    println!();

    let runtime = ProcurementRuntime::new(config, "draft-expiry");
    let buyer = buyer_admin();

    println!(
        "  Retention:              {}",
        config
            .drafts
            .retention_hours
            .map(|h| format!("{} hour(s)", h))
            .unwrap_or_else(|| "not configured".to_string())
    );

    // ── Plan one draft per action type ───────────────────────────────────────

    let mut drafts = Vec::new();
    for action_type in DraftActionType::ALL {
        let draft = runtime
            .drafts
            .plan(&buyer, &PlanRequest::new(action_type, "weekly planning run"))?;
        println!("  Planned:                {} {}", action_type, draft.id);
        drafts.push(draft);
    }
    if let Some(rfq) = drafts.first() {
        let approved = runtime.drafts.approve(&rfq.id, &buyer)?;
        println!(
            "  Approved:               {} -> {}",
            approved.action_type,
            approved.entity_id().unwrap_or("?")
        );
    }
    println!();

    // ── Sweeps ────────────────────────────────────────────────────────────────

    let now = Utc::now();
    let early = runtime.drafts.expire_stale(now)?;
    println!("  Sweep now:              {} draft(s) expired", early.len());

    let later = now + Duration::hours(SWEEP_DELAY_HOURS);
    let expired = runtime.drafts.expire_stale(later)?;
    println!("  Sweep +{}h:             {} draft(s) expired", SWEEP_DELAY_HOURS, expired.len());
    for draft in &expired {
        println!("    - {} {}", draft.action_type, draft.status);
    }

    if let Some(stale) = expired.first() {
        match runtime.drafts.approve(&stale.id, &buyer) {
            Err(EngineError::InvalidState { status, .. }) => {
                println!("  Approve expired draft:  refused (draft is {}) (expected)", status);
            }
            Err(e) => println!("  Approve expired draft:  unexpected error: {}", e),
            Ok(_) => println!("  Approve expired draft:  unexpectedly succeeded"),
        }
    }

    for status in [DraftStatus::Drafted, DraftStatus::Approved, DraftStatus::Expired] {
        println!("  {:<24}{}", format!("{}:", status), runtime.drafts.list(&[status])?.len());
    }
    println!();

    // ── No retention ──────────────────────────────────────────────────────────

    let unconfigured = EngineConfig {
        drafts: Default::default(),
        ..config.clone()
    };
    let plain = ProcurementRuntime::new(&unconfigured, "draft-expiry-unconfigured");
    plain
        .drafts
        .plan(&buyer, &PlanRequest::new(DraftActionType::SupplierMessage, "follow up"))?;
    let none = plain.drafts.expire_stale(later)?;
    println!("  Without retention:      {} draft(s) expired", none.len());
    println!();

    runtime.print_audit_summary();
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use draftgate_contracts::{
        draft::{DraftActionType, DraftStatus, PlanRequest},
        error::EngineError,
    };
    use draftgate_policy::EngineConfig;

    use crate::runtime::{buyer_admin, procurement_config, ProcurementRuntime};

    #[test]
    fn test_scenario_runs() {
        assert!(super::run_scenario(&procurement_config().unwrap()).is_ok());
    }

    #[test]
    fn test_sweep_expires_only_open_stale_drafts() {
        let runtime = ProcurementRuntime::new(&procurement_config().unwrap(), "test");
        let buyer = buyer_admin();
        let ids: Vec<_> = DraftActionType::ALL
            .into_iter()
            .map(|t| runtime.drafts.plan(&buyer, &PlanRequest::new(t, "sweep")).unwrap().id)
            .collect();
        runtime.drafts.approve(&ids[0], &buyer).unwrap();

        assert!(runtime.drafts.expire_stale(Utc::now()).unwrap().is_empty());

        let expired = runtime.drafts.expire_stale(Utc::now() + Duration::hours(73)).unwrap();
        assert_eq!(expired.len(), 3);
        assert!(expired.iter().all(|d| d.status == DraftStatus::Expired));
        assert_eq!(runtime.drafts.get(&ids[0]).unwrap().status, DraftStatus::Approved);

        // Expired is terminal.
        assert!(matches!(
            runtime.drafts.approve(&ids[1], &buyer),
            Err(EngineError::InvalidState { .. })
        ));
        assert!(matches!(
            runtime.drafts.expire(&ids[1]),
            Err(EngineError::InvalidState { .. })
        ));

        // A second sweep finds nothing left.
        assert!(runtime
            .drafts
            .expire_stale(Utc::now() + Duration::hours(100))
            .unwrap()
            .is_empty());

        let expiry = runtime.audit.records_for(&ids[1].to_string());
        assert_eq!(expiry.last().unwrap().actor, "system");
        assert!(runtime.audit.verify_integrity());
    }

    #[test]
    fn test_sweep_is_noop_without_retention() {
        let runtime = ProcurementRuntime::new(&EngineConfig::default(), "test");
        let draft = runtime
            .drafts
            .plan(&buyer_admin(), &PlanRequest::new(DraftActionType::RfqDraft, "sweep"))
            .unwrap();

        let expired = runtime.drafts.expire_stale(Utc::now() + Duration::days(365)).unwrap();
        assert!(expired.is_empty());
        assert_eq!(runtime.drafts.get(&draft.id).unwrap().status, DraftStatus::Drafted);
    }
}
