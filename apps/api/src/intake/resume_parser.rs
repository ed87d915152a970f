//! Resume field extraction: asks the model for a fixed-schema profile and
//! decodes it into a `CandidateRecord`.
//!
//! One attempt only. Any model or decode failure is returned as `IntakeError`
//! and the conversation falls back to manual entry.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::intake::prompts::{RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM};
use crate::intake::IntakeError;
use crate::llm_client::prompts::fill;
use crate::llm_client::structured::decode_object;
use crate::llm_client::{complete_within, CompletionModel};
use crate::models::candidate::{
    split_tags, CandidateRecord, FieldValue, CURRENT_LOCATION, DESIRED_POSITIONS, EMAIL,
    FULL_NAME, PHONE_NUMBER, TECH_STACK, YEARS_OF_EXPERIENCE,
};

/// The exact key set the model is asked for. Missing keys decode as null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResumeFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "lenient_years")]
    pub years_of_experience: Option<i64>,
    #[serde(deserialize_with = "lenient_list")]
    pub desired_positions: Option<Vec<String>>,
    pub current_location: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub tech_stack: Option<Vec<String>>,
}

impl ResumeFields {
    /// Converts to a record, dropping null and blank values.
    pub fn into_record(self) -> CandidateRecord {
        let mut record = CandidateRecord::new();
        let texts = [
            (FULL_NAME, self.full_name),
            (EMAIL, self.email),
            (PHONE_NUMBER, self.phone_number),
            (CURRENT_LOCATION, self.current_location),
        ];
        for (key, value) in texts {
            if let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                record.set_text(key, value);
            }
        }
        if let Some(years) = self.years_of_experience {
            record.set(YEARS_OF_EXPERIENCE, FieldValue::Integer(years));
        }
        for (key, value) in [
            (DESIRED_POSITIONS, self.desired_positions),
            (TECH_STACK, self.tech_stack),
        ] {
            if let Some(items) = value {
                record.set(key, FieldValue::List(items));
            }
        }
        record
    }
}

/// Sends resume text to the model and decodes the structured profile.
pub async fn extract_resume_fields(
    resume_text: &str,
    model: &dyn CompletionModel,
    timeout: Duration,
) -> Result<ResumeFields, IntakeError> {
    let prompt = fill(RESUME_PARSE_PROMPT, &[("resume_text", resume_text)]);
    let raw = complete_within(model, &prompt, RESUME_PARSE_SYSTEM, timeout).await?;
    Ok(decode_object::<ResumeFields>(&raw)?)
}

/// Integer, float (truncated) or numeric string; anything else is null.
fn lenient_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    })
}

/// Array of strings, or one comma-separated string; anything else is null.
fn lenient_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Some(Value::String(s)) => Some(split_tags(&s)),
        _ => None,
    })
}
