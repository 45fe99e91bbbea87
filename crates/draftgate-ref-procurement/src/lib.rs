//! # draftgate-ref-procurement
//!
//! Procurement reference runtime for the draftgate engine.
//!
//! Demonstrates four procurement scenarios using mock data:
//!
//! 1. **RFQ Draft Approval**: an untidy planner reply becomes a draft, is
//!    normalized on read and materialized exactly once.
//! 2. **Quote Comparison to Purchase Order**: a two-step workflow where the
//!    reviewer overrides the AI's supplier recommendation.
//! 3. **Capability Gate**: entitlement, permission scopes and the role
//!    allow-list, across draft and workflow operations.
//! 4. **Draft Expiry Sweep**: configured retention expires undecided drafts.
//!
//! All data is hardcoded and fictional. No external systems are contacted.

pub mod collaborators;
pub mod mock_data;
pub mod runtime;
pub mod scenarios;

pub use runtime::{procurement_config, ProcurementRuntime, PROCUREMENT_CONFIG};
