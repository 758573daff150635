//! Alert records handed to notifiers by the host.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label or annotation set of an alert
pub type LabelSet = BTreeMap<String, String>;

/// Whether an alert is still active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single alert as produced by the host alerting engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Identifying labels
    #[serde(default)]
    pub labels: LabelSet,
    /// Informational annotations (summary, description, ...)
    #[serde(default)]
    pub annotations: LabelSet,
    pub starts_at: Timestamp,
    /// Set once the alert is known to end; may lie in the future
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
    #[serde(default, rename = "generatorURL")]
    pub generator_url: String,
}

impl Alert {
    /// Creates a firing alert starting now with the given labels
    pub fn new(labels: LabelSet) -> Self {
        Self {
            labels,
            annotations: LabelSet::new(),
            starts_at: Timestamp::now(),
            ends_at: None,
            generator_url: String::new(),
        }
    }

    /// Status of the alert at `now`
    pub fn status_at(&self, now: Timestamp) -> AlertStatus {
        match self.ends_at {
            Some(ends_at) if ends_at <= now => AlertStatus::Resolved,
            _ => AlertStatus::Firing,
        }
    }

    pub fn status(&self) -> AlertStatus {
        self.status_at(Timestamp::now())
    }

    /// Value of the `alertname` label, empty if absent
    pub fn name(&self) -> &str {
        self.labels.get("alertname").map(String::as_str).unwrap_or_default()
    }
}
