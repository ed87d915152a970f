// Applicant intake: turning an uploaded resume into a candidate record.
// All LLM calls go through llm_client.

pub mod prompts;
pub mod resume_parser;
pub mod text_extractor;

use bytes::Bytes;
use thiserror::Error;

use crate::llm_client::structured::DecodeError;
use crate::llm_client::LlmError;

/// A resume as received from the applicant: declared name plus raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Bytes,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("no text could be extracted from '{0}'")]
    Unreadable(String),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model reply was not a usable profile: {0}")]
    Decode(#[from] DecodeError),
}
