//! Question generation: a short quiz tailored to the applicant's skills and role.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::llm_client::prompts::fill;
use crate::llm_client::structured::decode_object;
use crate::llm_client::{complete_within, CompletionModel};
use crate::screening::prompts::{QUESTION_PROMPT, QUESTION_SYSTEM};
use crate::screening::ScreeningError;

/// Upper bound on quiz length; extra questions from the model are dropped.
pub const MAX_QUESTIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct QuestionSet {
    questions: Vec<String>,
}

/// Requests 3–5 single-sentence questions. Never called with an empty stack.
pub async fn generate_questions(
    tech_stack: &[String],
    role: &str,
    model: &dyn CompletionModel,
    timeout: Duration,
) -> Result<Vec<String>, ScreeningError> {
    if tech_stack.is_empty() {
        return Err(ScreeningError::EmptyTechStack);
    }

    let stack = tech_stack.join(", ");
    let prompt = fill(QUESTION_PROMPT, &[("role", role), ("tech_stack", stack.as_str())]);
    let raw = complete_within(model, &prompt, QUESTION_SYSTEM, timeout).await?;
    let set: QuestionSet = decode_object(&raw)?;

    let questions: Vec<String> = set
        .questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(MAX_QUESTIONS)
        .collect();

    if questions.is_empty() {
        return Err(ScreeningError::NoQuestions);
    }
    debug!("Generated {} questions for role '{role}'", questions.len());
    Ok(questions)
}
