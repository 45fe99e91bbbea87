//! # draftgate-policy
//!
//! The TOML-configured capability gate and engine configuration.
//!
//! ## Overview
//!
//! This crate provides [`ScopedCapabilityGate`], which implements the
//! [`CapabilityGate`](draftgate_core::traits::CapabilityGate) trait, and
//! [`EngineConfig`], the TOML document that configures the gate, draft
//! expiry and workflow paging.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use draftgate_policy::EngineConfig;
//!
//! let config = EngineConfig::from_file(Path::new("policies/procurement.toml"))?;
//! let gate = config.build_gate();
//! ```
//!
//! ## Gate tiers
//!
//! An actor carrying any explicit permission is judged by permissions alone.
//! Actors without permissions fall back to the role allow-list and the admin
//! flag.

pub mod config;
pub mod gate;

pub use config::EngineConfig;
pub use gate::{GateConfig, ScopedCapabilityGate};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use draftgate_contracts::{actor::Actor, error::EngineError};
    use draftgate_core::traits::CapabilityGate;

    use crate::EngineConfig;

    // ── 1. defaults ───────────────────────────────────────────────────────────

    /// An empty document yields the default configuration.
    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.gate.required_feature, "ai.actions");
        assert_eq!(config.drafts.retention_hours, None);
        assert_eq!(config.workflows.default_page_size, 20);
        assert_eq!(config.workflows.max_page_size, 100);
    }

    // ── 2. full document ──────────────────────────────────────────────────────

    #[test]
    fn test_full_document() {
        let toml = r#"
            [gate]
            required_feature = "procurement.ai"
            approve_permission = "ai.approve"
            fallback_roles = ["owner"]

            [gate.action_scopes]
            compare_quotes = "quotes.write"
            send_supplier_email = "messages.send"

            [drafts]
            retention_hours = 72

            [workflows]
            default_page_size = 10
            max_page_size = 50
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.drafts.retention_hours, Some(72));
        assert_eq!(config.workflows.max_page_size, 50);
        assert_eq!(config.gate.action_scopes.len(), 2);
        // Replacing the scope table drops the default po_draft scope.
        assert!(!config.gate.action_scopes.contains_key("po_draft"));

        let gate = config.build_gate();
        let buyer = Actor::new("u-1")
            .with_feature("procurement.ai")
            .with_permissions(["ai.approve", "messages.send"]);
        assert!(gate.can_resolve(&buyer, "send_supplier_email"));
        assert!(gate.can_resolve(&buyer, "po_draft"));
        assert!(!gate.can_resolve(&buyer, "compare_quotes"));

        let finance = Actor::new("u-2").with_feature("procurement.ai").with_role("finance");
        assert!(!gate.can_resolve(&finance, "po_draft"), "finance was removed from the role list");
    }

    // ── 3. rejected documents ─────────────────────────────────────────────────

    #[test]
    fn test_malformed_toml_is_config_error() {
        for bad in [
            "[gate",
            "[workflows]\nmax_page_size = \"many\"",
            "[unknown_section]\nkey = 1",
        ] {
            match EngineConfig::from_toml_str(bad) {
                Err(EngineError::ConfigError { reason }) => {
                    assert!(reason.contains("failed to parse"), "unexpected reason: {reason}");
                }
                other => panic!("expected ConfigError for {bad:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_out_of_range_values_are_config_errors() {
        for bad in [
            "[workflows]\nmax_page_size = 0",
            "[workflows]\ndefault_page_size = 0",
            "[workflows]\ndefault_page_size = 500\nmax_page_size = 100",
            "[drafts]\nretention_hours = 0",
            "[gate]\napprove_permission = \" \"",
        ] {
            assert!(
                matches!(EngineConfig::from_toml_str(bad), Err(EngineError::ConfigError { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let missing = std::path::Path::new("/nonexistent/draftgate/engine.toml");
        match EngineConfig::from_file(missing) {
            Err(EngineError::ConfigError { reason }) => assert!(reason.contains("failed to read")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
