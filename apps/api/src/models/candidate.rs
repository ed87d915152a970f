use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const FULL_NAME: &str = "full_name";
pub const EMAIL: &str = "email";
pub const PHONE_NUMBER: &str = "phone_number";
pub const YEARS_OF_EXPERIENCE: &str = "years_of_experience";
pub const DESIRED_POSITIONS: &str = "desired_positions";
pub const CURRENT_LOCATION: &str = "current_location";
pub const TECH_STACK: &str = "tech_stack";
pub const JOB_ROLE: &str = "job_role";

/// Placeholder shown for any field the applicant has not provided.
pub const NOT_PROVIDED: &str = "N/A";

/// A single candidate field value. Null values are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Renders the value for the transcript. Lists are comma-joined.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Text(s) if s.trim().is_empty() => NOT_PROVIDED.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) if items.is_empty() => NOT_PROVIDED.to_string(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

/// The applicant profile, keyed by normalized field name.
///
/// Built either in one shot from structured extraction or one manual answer
/// at a time. Later writes to the same key overwrite; nothing is ever cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, FieldValue::Text(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Display form of a field, `N/A` when absent.
    pub fn display(&self, key: &str) -> String {
        self.get(key)
            .map(FieldValue::display)
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    /// Copies every field of `other` over this record.
    pub fn overlay(&mut self, other: CandidateRecord) {
        self.fields.extend(other.fields);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Skill tags in order. Manual answers arrive as one comma-separated line.
    pub fn tech_stack(&self) -> Vec<String> {
        match self.get(TECH_STACK) {
            Some(FieldValue::List(items)) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Some(FieldValue::Text(text)) => split_tags(text),
            _ => Vec::new(),
        }
    }

    /// The role the quiz is tailored to: the selected role, else the first
    /// desired position, else a generic label.
    pub fn target_role(&self) -> String {
        if let Some(role) = self.text(JOB_ROLE).filter(|r| !r.trim().is_empty()) {
            return role.to_string();
        }
        let first_position = match self.get(DESIRED_POSITIONS) {
            Some(FieldValue::List(items)) => items.first().cloned(),
            Some(FieldValue::Text(text)) => split_tags(text).into_iter().next(),
            _ => None,
        };
        first_position.unwrap_or_else(|| "general software role".to_string())
    }

    pub fn has_role(&self) -> bool {
        self.text(JOB_ROLE).is_some_and(|r| !r.trim().is_empty())
    }
}

/// Splits a comma-separated line into trimmed, non-empty tags.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Turns a display label into a record key: lowercase, spaces to underscores.
pub fn normalize_field_key(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field_key() {
        assert_eq!(normalize_field_key("Full Name"), "full_name");
        assert_eq!(normalize_field_key("Email"), "email");
        assert_eq!(normalize_field_key("Years of Experience"), "years_of_experience");
        assert_eq!(normalize_field_key("Desired Position(s)"), "desired_position(s)");
    }

    #[test]
    fn test_tech_stack_from_list_value() {
        let mut record = CandidateRecord::new();
        record.set(
            TECH_STACK,
            FieldValue::List(vec!["Python".into(), " ".into(), "Go".into()]),
        );
        assert_eq!(record.tech_stack(), vec!["Python", "Go"]);
    }

    #[test]
    fn test_tech_stack_from_manual_text() {
        let mut record = CandidateRecord::new();
        record.set_text(TECH_STACK, "Rust,  Tokio , ,SQL");
        assert_eq!(record.tech_stack(), vec!["Rust", "Tokio", "SQL"]);
    }

    #[test]
    fn test_tech_stack_missing_is_empty() {
        assert!(CandidateRecord::new().tech_stack().is_empty());
    }

    #[test]
    fn test_display_missing_and_empty_values() {
        let mut record = CandidateRecord::new();
        record.set(TECH_STACK, FieldValue::List(vec![]));
        assert_eq!(record.display(FULL_NAME), NOT_PROVIDED);
        assert_eq!(record.display(TECH_STACK), NOT_PROVIDED);
    }

    #[test]
    fn test_display_list_joins_with_comma() {
        let mut record = CandidateRecord::new();
        record.set(TECH_STACK, FieldValue::List(vec!["Python".into(), "Go".into()]));
        record.set(YEARS_OF_EXPERIENCE, FieldValue::Integer(4));
        assert_eq!(record.display(TECH_STACK), "Python, Go");
        assert_eq!(record.display(YEARS_OF_EXPERIENCE), "4");
    }

    #[test]
    fn test_overlay_overwrites_and_keeps_others() {
        let mut record = CandidateRecord::new();
        record.set_text(FULL_NAME, "Jon Doe");
        record.set_text(EMAIL, "jon@x.com");

        let mut manual = CandidateRecord::new();
        manual.set_text(FULL_NAME, "John Doe");
        record.overlay(manual);

        assert_eq!(record.text(FULL_NAME), Some("John Doe"));
        assert_eq!(record.text(EMAIL), Some("jon@x.com"));
    }

    #[test]
    fn test_target_role_precedence() {
        let mut record = CandidateRecord::new();
        assert_eq!(record.target_role(), "general software role");

        record.set_text(DESIRED_POSITIONS, "Backend Engineer, SRE");
        assert_eq!(record.target_role(), "Backend Engineer");

        record.set_text(JOB_ROLE, "DevOps Engineer");
        assert_eq!(record.target_role(), "DevOps Engineer");
        assert!(record.has_role());
    }

    #[test]
    fn test_record_serializes_as_flat_map() {
        let mut record = CandidateRecord::new();
        record.set_text(FULL_NAME, "Jane");
        record.set(YEARS_OF_EXPERIENCE, FieldValue::Integer(3));
        record.set(TECH_STACK, FieldValue::List(vec!["Go".into()]));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"full_name": "Jane", "years_of_experience": 3, "tech_stack": ["Go"]})
        );
    }
}
