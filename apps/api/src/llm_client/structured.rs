//! Best-effort structured decode of free-form model text.
//!
//! Models wrap JSON in prose or code fences despite instructions. We strip
//! fences, take the span from the first `{` to the last `}` and decode that.
//! Failures are returned as `DecodeError`; nothing here panics.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no JSON object found in model output")]
    NoObject,

    #[error("malformed JSON object: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes the single JSON object embedded in `text` into `T`.
pub fn decode_object<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let span = locate_object(strip_json_fences(text)).ok_or(DecodeError::NoObject)?;
    Ok(serde_json::from_str(span)?)
}

/// Returns the slice from the first `{` to the last `}` inclusive.
fn locate_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
