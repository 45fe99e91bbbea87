//! # draftgate-contracts
//!
//! Shared types for the AI action-draft and workflow-step engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions, small constructors, and error types.

pub mod actor;
pub mod audit;
pub mod draft;
pub mod error;
pub mod page;
pub mod payload;
pub mod workflow;
