// Technical screening: quiz generation and per-answer evaluation.
// All LLM calls go through llm_client.

pub mod answer_evaluator;
pub mod prompts;
pub mod question_generator;

use thiserror::Error;

use crate::llm_client::structured::DecodeError;
use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("no tech stack to build questions from")]
    EmptyTechStack,

    #[error("model returned no usable questions")]
    NoQuestions,

    #[error("model returned an empty verdict")]
    EmptyVerdict,

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model reply was not a usable question set: {0}")]
    Decode(#[from] DecodeError),
}
