//! Engine settings supplied by the host's configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default page size for workflow listings.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound applied to requested page sizes.
pub const MAX_PAGE_SIZE: usize = 100;

/// Settings for the draft service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    /// Age in hours after which a still-`drafted` draft expires.
    /// `None` disables the expiry sweep.
    pub retention_hours: Option<u32>,
}

impl DraftSettings {
    pub fn retention(&self) -> Option<Duration> {
        self.retention_hours.map(|h| Duration::hours(i64::from(h)))
    }
}

/// Settings for the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}
