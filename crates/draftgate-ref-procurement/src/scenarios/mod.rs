//! Procurement reference runtime demo scenarios.
//!
//! Each scenario wires a fresh [`ProcurementRuntime`](crate::runtime::ProcurementRuntime)
//! from the given configuration, drives it with mock procurement data and
//! prints every decision the engine makes.

pub mod draft_expiry;
pub mod permission_gate;
pub mod quote_to_po;
pub mod rfq_approval;
