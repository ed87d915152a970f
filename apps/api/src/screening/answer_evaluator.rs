//! Answer evaluation: one-sentence verdict on a free-text answer.
//!
//! The verdict is expected to open with "Correct.", "Partially correct." or
//! "Incorrect." but is shown verbatim; the prefix is only classified for logs.

use std::time::Duration;

use crate::llm_client::prompts::fill;
use crate::llm_client::{complete_within, CompletionModel};
use crate::screening::prompts::{EVALUATION_PROMPT, EVALUATION_SYSTEM};
use crate::screening::ScreeningError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    PartiallyCorrect,
    Incorrect,
    Unlabelled,
}

impl Verdict {
    pub fn classify(feedback: &str) -> Self {
        let feedback = feedback.trim_start();
        if feedback.starts_with("Correct.") {
            Verdict::Correct
        } else if feedback.starts_with("Partially correct.") {
            Verdict::PartiallyCorrect
        } else if feedback.starts_with("Incorrect.") {
            Verdict::Incorrect
        } else {
            Verdict::Unlabelled
        }
    }
}

/// Returns the model's critique of `answer` as raw text.
pub async fn evaluate_answer(
    question: &str,
    answer: &str,
    model: &dyn CompletionModel,
    timeout: Duration,
) -> Result<String, ScreeningError> {
    let prompt = fill(EVALUATION_PROMPT, &[("question", question), ("answer", answer)]);
    let feedback = complete_within(model, &prompt, EVALUATION_SYSTEM, timeout).await?;
    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Err(ScreeningError::EmptyVerdict);
    }
    Ok(feedback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(Verdict::classify("Correct. Nice."), Verdict::Correct);
        assert_eq!(
            Verdict::classify("Partially correct. Missing X."),
            Verdict::PartiallyCorrect
        );
        assert_eq!(Verdict::classify(" Incorrect. It is Y."), Verdict::Incorrect);
        assert_eq!(Verdict::classify("Great answer!"), Verdict::Unlabelled);
    }

    #[tokio::test]
    async fn test_feedback_returned_verbatim() {
        let model = ScriptedModel::new().reply("Great answer, though it lacks detail.");
        let feedback = evaluate_answer("What is a trait?", "An interface", &model, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(feedback, "Great answer, though it lacks detail.");
    }

    #[tokio::test]
    async fn test_prompt_quotes_question_and_answer() {
        let model = ScriptedModel::new().reply("Correct. Yes.");
        evaluate_answer("What is a trait?", "Shared behaviour", &model, TIMEOUT)
            .await
            .unwrap();
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("\"What is a trait?\""));
        assert!(prompt.contains("\"Shared behaviour\""));
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_as_error() {
        let model = ScriptedModel::new().fail(500);
        let err = evaluate_answer("Q?", "A", &model, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ScreeningError::Llm(_)));
    }
}
