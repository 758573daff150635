use crate::models::{Alert, AlertStatus, LabelSet};
use jiff::Timestamp;
use serde::Serialize;

/// Data made available to templates for one alert batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    pub receiver: String,
    pub status: AlertStatus,
    pub group_key: String,
    pub alerts: Vec<Alert>,
    pub group_labels: LabelSet,
    pub common_labels: LabelSet,
    pub common_annotations: LabelSet,
    /// Instant alert statuses are evaluated at
    #[serde(skip)]
    pub evaluated_at: Timestamp,
}

impl TemplateData {
    /// Builds template data for a batch, evaluated at the current time
    pub fn from_alerts(receiver: &str, group_key: &str, alerts: &[Alert]) -> Self {
        Self::from_alerts_at(receiver, group_key, alerts, Timestamp::now())
    }

    pub fn from_alerts_at(
        receiver: &str,
        group_key: &str,
        alerts: &[Alert],
        now: Timestamp,
    ) -> Self {
        let status = if alerts
            .iter()
            .any(|a| a.status_at(now) == AlertStatus::Firing)
        {
            AlertStatus::Firing
        } else {
            AlertStatus::Resolved
        };

        Self {
            receiver: receiver.to_string(),
            status,
            group_key: group_key.to_string(),
            alerts: alerts.to_vec(),
            group_labels: LabelSet::new(),
            common_labels: common_pairs(alerts.iter().map(|a| &a.labels)),
            common_annotations: common_pairs(alerts.iter().map(|a| &a.annotations)),
            evaluated_at: now,
        }
    }

    /// Sets the labels the host grouped this batch by
    pub fn with_group_labels(mut self, group_labels: LabelSet) -> Self {
        self.group_labels = group_labels;
        self
    }

    /// Number of alerts with the given status at `evaluated_at`
    pub fn count(&self, status: AlertStatus) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.status_at(self.evaluated_at) == status)
            .count()
    }
}

/// Key/value pairs present with the same value in every set
fn common_pairs<'a>(mut sets: impl Iterator<Item = &'a LabelSet>) -> LabelSet {
    let Some(first) = sets.next() else {
        return LabelSet::new();
    };

    let mut common = first.clone();
    for set in sets {
        common.retain(|k, v| set.get(k) == Some(v));
    }
    common
}
