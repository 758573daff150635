//! `{{ Name }}` placeholder substitution.

use super::{TemplateData, TemplateError, TemplateRenderer};
use crate::models::AlertStatus;
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Renderer that replaces `{{ Field }}` and `{{ Map.key }}` placeholders.
///
/// Supported fields: `Receiver`, `Status`, `GroupKey`, `AlertsCount`,
/// `FiringCount`, `ResolvedCount`, and keyed lookups into `CommonLabels`,
/// `CommonAnnotations` and `GroupLabels`. Text outside placeholders is copied
/// through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }

    fn lookup(&self, path: &str, data: &TemplateData) -> Result<String, TemplateError> {
        if let Some((map, key)) = path.split_once('.') {
            let (name, values) = match map {
                "CommonLabels" => ("CommonLabels", &data.common_labels),
                "CommonAnnotations" => ("CommonAnnotations", &data.common_annotations),
                "GroupLabels" => ("GroupLabels", &data.group_labels),
                _ => return Err(TemplateError::UnknownField(path.to_string())),
            };
            return values
                .get(key)
                .cloned()
                .ok_or_else(|| TemplateError::MissingKey {
                    map: name,
                    key: key.to_string(),
                });
        }

        match path {
            "Receiver" => Ok(data.receiver.clone()),
            "Status" => Ok(data.status.to_string()),
            "GroupKey" => Ok(data.group_key.clone()),
            "AlertsCount" => Ok(data.alerts.len().to_string()),
            "FiringCount" => Ok(data.count(AlertStatus::Firing).to_string()),
            "ResolvedCount" => Ok(data.count(AlertStatus::Resolved).to_string()),
            _ => Err(TemplateError::UnknownField(path.to_string())),
        }
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, template: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else { continue };
            let literal = &template[last..whole.start()];
            if let Some(pos) = literal.find("{{") {
                return Err(TemplateError::Unclosed(last + pos));
            }
            out.push_str(literal);
            out.push_str(&self.lookup(&caps[1], data)?);
            last = whole.end();
        }

        let rest = &template[last..];
        if let Some(pos) = rest.find("{{") {
            return Err(TemplateError::Unclosed(last + pos));
        }
        out.push_str(rest);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, LabelSet};

    fn data() -> TemplateData {
        let mut labels = LabelSet::new();
        labels.insert("alertname".to_string(), "DiskFull".to_string());
        labels.insert("severity".to_string(), "critical".to_string());
        let mut alert = Alert::new(labels);
        alert
            .annotations
            .insert("summary".to_string(), "disk /var is full".to_string());

        let mut group = LabelSet::new();
        group.insert("alertname".to_string(), "DiskFull".to_string());

        TemplateData::from_alerts("oncall", "{}:{alertname=\"DiskFull\"}", &[alert])
            .with_group_labels(group)
    }

    #[test]
    fn test_plain_text_passes_through() {
        let out = PlaceholderRenderer.render("13800000000", &data()).unwrap();
        assert_eq!(out, "13800000000");
    }

    #[test]
    fn test_renders_fields_and_maps() {
        let out = PlaceholderRenderer
            .render(
                "[{{ Status }}] {{CommonLabels.alertname}} ({{ CommonLabels.severity }}): {{ CommonAnnotations.summary }} x{{ AlertsCount }}",
                &data(),
            )
            .unwrap();
        assert_eq!(out, "[firing] DiskFull (critical): disk /var is full x1");
    }

    #[test]
    fn test_group_labels_and_receiver() {
        let out = PlaceholderRenderer
            .render("{{ Receiver }}/{{ GroupLabels.alertname }}", &data())
            .unwrap();
        assert_eq!(out, "oncall/DiskFull");
    }

    #[test]
    fn test_unknown_field_is_error() {
        let err = PlaceholderRenderer.render("{{ Nope }}", &data()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownField("Nope".to_string()));
    }

    #[test]
    fn test_missing_key_is_error() {
        let err = PlaceholderRenderer
            .render("{{ CommonLabels.team }}", &data())
            .unwrap_err();
        assert!(matches!(err, TemplateError::MissingKey { map: "CommonLabels", .. }));
    }

    #[test]
    fn test_unclosed_action_is_error() {
        let err = PlaceholderRenderer
            .render("alert {{ Status }} {{ Receiver", &data())
            .unwrap_err();
        assert_eq!(err, TemplateError::Unclosed(19));
    }
}
