//! # draftgate-core
//!
//! The engine that turns untrusted AI drafts into approved business actions.
//!
//! This crate provides:
//! - The collaborator traits (`DraftRepository`, `WorkflowRepository`,
//!   `CapabilityGate`, `Materializer`, `Planner`, `SourceResolver`, `AuditWriter`)
//! - `DraftService`, which owns the single-shot draft lifecycle
//! - `WorkflowEngine`, which resolves multi-step workflows in order
//! - Opaque cursor pagination for workflow listings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use draftgate_core::{DraftService, WorkflowEngine, traits::{CapabilityGate, Materializer}};
//! ```

pub mod completion;
pub mod cursor;
pub mod drafts;
pub mod settings;
pub mod traits;
pub mod workflows;

#[cfg(test)]
mod testing;

pub use drafts::DraftService;
pub use settings::{DraftSettings, WorkflowSettings};
pub use workflows::WorkflowEngine;
