//! Engine configuration loaded from TOML.
//!
//! Every section and key has a default, so an empty document is a valid
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use draftgate_contracts::error::{EngineError, EngineResult};
use draftgate_core::settings::{DraftSettings, WorkflowSettings};

use crate::gate::{GateConfig, ScopedCapabilityGate};

/// The top-level structure deserialized from an engine TOML file.
///
/// Example:
/// ```toml
/// [gate]
/// required_feature = "ai.actions"
///
/// [drafts]
/// retention_hours = 72
///
/// [workflows]
/// default_page_size = 20
/// max_page_size = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub gate: GateConfig,
    pub drafts: DraftSettings,
    pub workflows: WorkflowSettings,
}

impl EngineConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `EngineError::ConfigError` if the TOML is malformed, does not
    /// match `EngineConfig`, or holds out-of-range values.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| EngineError::ConfigError {
            reason: format!("failed to parse engine TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            retention_hours = ?config.drafts.retention_hours,
            max_page_size = config.workflows.max_page_size,
            "engine configuration loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as engine configuration.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> EngineResult<()> {
        let pages = &self.workflows;
        if pages.max_page_size == 0 {
            return Err(EngineError::ConfigError {
                reason: "workflows.max_page_size must be at least 1".to_string(),
            });
        }
        if pages.default_page_size == 0 || pages.default_page_size > pages.max_page_size {
            return Err(EngineError::ConfigError {
                reason: format!(
                    "workflows.default_page_size must be between 1 and {}",
                    pages.max_page_size
                ),
            });
        }
        if self.drafts.retention_hours == Some(0) {
            return Err(EngineError::ConfigError {
                reason: "drafts.retention_hours must be at least 1 when set".to_string(),
            });
        }
        if self.gate.approve_permission.trim().is_empty() {
            return Err(EngineError::ConfigError {
                reason: "gate.approve_permission must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Build the capability gate described by the `[gate]` section.
    pub fn build_gate(&self) -> ScopedCapabilityGate {
        ScopedCapabilityGate::new(self.gate.clone())
    }
}
