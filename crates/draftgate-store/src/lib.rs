//! # draftgate-store
//!
//! In-memory repositories for drafts and workflows.
//!
//! Both repositories lock per entity: the `update` of one draft never waits
//! on another draft, while two updates of the same draft run strictly one
//! after the other. That is what lets the engine guarantee at-most-once
//! approval and in-order step resolution under concurrency.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftgate_store::{InMemoryDraftRepository, InMemoryWorkflowRepository};
//!
//! let drafts = Arc::new(InMemoryDraftRepository::new());
//! let workflows = Arc::new(InMemoryWorkflowRepository::new());
//! ```

pub mod memory;
mod table;

pub use memory::{InMemoryDraftRepository, InMemoryWorkflowRepository};

// ── Tests ─────────────────────────────────────────────────────────────────────
