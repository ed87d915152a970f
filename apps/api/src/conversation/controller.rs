//! Interviewer: drives the pure state machine against real components.
//!
//! Flow per user action: transition → run each emitted effect (text
//! extraction, resume parsing, question generation, answer evaluation) →
//! feed the outcome back as an event → repeat until no effects remain.
//! Component failures become `None` outcomes; the machine picks the fallback.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::conversation::machine::{transition, Effect, Event, TransitionError};
use crate::conversation::session::{Session, SessionOptions};
use crate::intake::resume_parser::extract_resume_fields;
use crate::intake::text_extractor::extract_text;
use crate::intake::{IntakeError, UploadedFile};
use crate::llm_client::CompletionModel;
use crate::models::candidate::CandidateRecord;
use crate::screening::answer_evaluator::{evaluate_answer, Verdict};
use crate::screening::question_generator::generate_questions;

pub struct Interviewer {
    model: Arc<dyn CompletionModel>,
    call_timeout: Duration,
}

impl Interviewer {
    pub fn new(model: Arc<dyn CompletionModel>, call_timeout: Duration) -> Self {
        Self {
            model,
            call_timeout,
        }
    }

    /// Creates a session and emits the greeting.
    pub async fn open(&self, options: SessionOptions) -> Result<Session, TransitionError> {
        let session = Session::new(options);
        info!("Starting screening session {}", session.id);
        self.dispatch(&session, Event::Begin).await
    }

    /// Applies one event and every follow-up its effects produce.
    /// The input session is never modified; on error it remains current.
    pub async fn dispatch(&self, session: &Session, event: Event) -> Result<Session, TransitionError> {
        let step = transition(session, event)?;
        let mut current = step.session;
        let mut pending: VecDeque<Effect> = step.effects.into();
        debug!(
            "Session {}: {} -> {}",
            current.id,
            session.stage.name(),
            current.stage.name()
        );

        while let Some(effect) = pending.pop_front() {
            let Some(outcome) = self.perform(effect, &current).await else {
                continue;
            };
            let from = current.stage.name();
            let step = transition(&current, outcome)?;
            current = step.session;
            pending.extend(step.effects);
            debug!("Session {}: {} -> {}", current.id, from, current.stage.name());
        }

        Ok(current)
    }

    async fn perform(&self, effect: Effect, session: &Session) -> Option<Event> {
        match effect {
            Effect::ExtractResume(file) => {
                let record = self
                    .parse_resume(file)
                    .await
                    .map_err(|e| warn!("Resume intake failed: {e}"))
                    .ok();
                Some(Event::ResumeParsed(record))
            }
            Effect::GenerateQuestions { tech_stack, role } => {
                let questions =
                    generate_questions(&tech_stack, &role, self.model.as_ref(), self.call_timeout)
                        .await
                        .map_err(|e| warn!("Question generation failed: {e}"))
                        .ok();
                Some(Event::QuestionsReady(questions))
            }
            Effect::EvaluateAnswer { question, answer } => {
                let feedback =
                    evaluate_answer(&question, &answer, self.model.as_ref(), self.call_timeout)
                        .await
                        .map_err(|e| warn!("Answer evaluation failed: {e}"))
                        .ok();
                if let Some(feedback) = &feedback {
                    debug!("Answer verdict: {:?}", Verdict::classify(feedback));
                }
                Some(Event::AnswerEvaluated(feedback))
            }
            Effect::SessionComplete => {
                info!(
                    "Screening session {} concluded ({} messages)",
                    session.id,
                    session.transcript.len()
                );
                None
            }
        }
    }

    /// Text extraction runs on the blocking pool; a panic in the PDF decoder
    /// is contained there and counts as an unreadable file.
    async fn parse_resume(&self, file: UploadedFile) -> Result<CandidateRecord, IntakeError> {
        let name = file.name.clone();
        let text = tokio::task::spawn_blocking(move || extract_text(&file))
            .await
            .ok()
            .flatten()
            .ok_or(IntakeError::Unreadable(name))?;
        let fields = extract_resume_fields(&text, self.model.as_ref(), self.call_timeout).await?;
        Ok(fields.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::messages;
    use crate::conversation::session::Stage;
    use crate::intake::text_extractor::fixtures::{docx_with_paragraphs, pdf_with_pages};
    use crate::llm_client::testing::{ScriptedModel, StalledModel};
    use crate::models::candidate::{EMAIL, FULL_NAME};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn interviewer(model: Arc<ScriptedModel>) -> Interviewer {
        Interviewer::new(model, TIMEOUT)
    }

    fn no_roles() -> SessionOptions {
        SessionOptions {
            role_selection: false,
            ..SessionOptions::default()
        }
    }

    fn txt(content: &'static str) -> UploadedFile {
        UploadedFile {
            name: "cv.txt".into(),
            content: content.into(),
        }
    }

    const JOHN_JSON: &str = r#"{"full_name":"John Doe","email":"john@x.com","phone_number":null,"years_of_experience":null,"desired_positions":null,"current_location":null,"tech_stack":["Python","Go"]}"#;

    #[tokio::test]
    async fn test_open_greets() {
        let model = Arc::new(ScriptedModel::new());
        let session = interviewer(model.clone()).open(no_roles()).await.unwrap();
        assert_eq!(session.stage, Stage::AwaitingResumeDecision);
        assert_eq!(session.transcript.count_text(messages::GREETING), 1);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_txt_upload_is_parsed_and_verified() {
        let model = Arc::new(ScriptedModel::new().reply(JOHN_JSON));
        let interviewer = interviewer(model.clone());
        let session = interviewer.open(no_roles()).await.unwrap();
        let session = interviewer.dispatch(&session, Event::ChooseUpload).await.unwrap();
        let session = interviewer
            .dispatch(&session, Event::ResumeUploaded(txt("John Doe, john@x.com, Python, Go")))
            .await
            .unwrap();

        assert_eq!(session.stage, Stage::AwaitingVerification);
        assert!(model.prompts()[0].contains("John Doe, john@x.com, Python, Go"));
        let msg = &session.transcript.last().unwrap().text;
        assert!(msg.contains("**Name:** John Doe"));
        assert!(msg.contains("**Tech Stack:** Python, Go"));
    }

    #[tokio::test]
    async fn test_docx_upload_is_parsed() {
        let model = Arc::new(ScriptedModel::new().reply(JOHN_JSON));
        let interviewer = interviewer(model.clone());
        let session = interviewer.open(no_roles()).await.unwrap();
        let session = interviewer.dispatch(&session, Event::ChooseUpload).await.unwrap();
        let file = UploadedFile {
            name: "cv.docx".into(),
            content: docx_with_paragraphs(&["John Doe", "Python, Go"]).into(),
        };
        let session = interviewer
            .dispatch(&session, Event::ResumeUploaded(file))
            .await
            .unwrap();

        assert_eq!(session.stage, Stage::AwaitingVerification);
        assert!(model.prompts()[0].contains("John Doe\nPython, Go"));
    }

    #[tokio::test]
    async fn test_pdf_upload_is_parsed() {
        let model = Arc::new(ScriptedModel::new().reply(JOHN_JSON));
        let interviewer = interviewer(model.clone());
        let session = interviewer.open(no_roles()).await.unwrap();
        let session = interviewer.dispatch(&session, Event::ChooseUpload).await.unwrap();
        let file = UploadedFile {
            name: "cv.pdf".into(),
            content: pdf_with_pages(&["John Doe", "Python Go"]).into(),
        };
        let session = interviewer
            .dispatch(&session, Event::ResumeUploaded(file))
            .await
            .unwrap();

        assert_eq!(session.stage, Stage::AwaitingVerification);
        let prompt = &model.prompts()[0];
        assert!(prompt.find("John").unwrap() < prompt.find("Python").unwrap());
        assert_eq!(session.candidate.text(FULL_NAME), Some("John Doe"));
    }

    #[tokio::test]
    async fn test_unreadable_upload_skips_model_and_offers_retry() {
        let model = Arc::new(ScriptedModel::new());
        let interviewer = interviewer(model.clone());
        let session = interviewer.open(no_roles()).await.unwrap();
        let session = interviewer.dispatch(&session, Event::ChooseUpload).await.unwrap();
        let file = UploadedFile {
            name: "cv.pdf".into(),
            content: "not a pdf".into(),
        };
        let session = interviewer
            .dispatch(&session, Event::ResumeUploaded(file))
            .await
            .unwrap();

        assert_eq!(session.stage, Stage::AwaitingUpload);
        assert_eq!(session.transcript.last().unwrap().text, messages::UPLOAD_FAILED);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_model_reply_offers_retry() {
        let model = Arc::new(ScriptedModel::new().reply("Sorry, I can't do that."));
        let interviewer = interviewer(model);
        let session = interviewer.open(no_roles()).await.unwrap();
        let session = interviewer.dispatch(&session, Event::ChooseUpload).await.unwrap();
        let session = interviewer
            .dispatch(&session, Event::ResumeUploaded(txt("resume")))
            .await
            .unwrap();
        assert_eq!(session.stage, Stage::AwaitingUpload);
        assert!(session.candidate.is_empty());
    }

    #[tokio::test]
    async fn test_full_quiz_with_scripted_model() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply(JOHN_JSON)
                .reply(r#"{"questions": ["What is a goroutine?", "What is a channel?"]}"#)
                .reply("Correct. Goroutines are lightweight threads.")
                .fail(500),
        );
        let interviewer = interviewer(model.clone());
        let mut session = interviewer.open(no_roles()).await.unwrap();
        for event in [
            Event::ChooseUpload,
            Event::ResumeUploaded(txt("John Doe, john@x.com, Python, Go")),
            Event::ConfirmDetails,
        ] {
            session = interviewer.dispatch(&session, event).await.unwrap();
        }
        assert_eq!(session.stage.quiz().unwrap().index(), 0);
        assert!(model.prompts()[1].contains("\"Python, Go\""));

        session = interviewer
            .dispatch(&session, Event::SubmitText("lightweight threads".into()))
            .await
            .unwrap();
        assert_eq!(session.stage.quiz().unwrap().index(), 1);
        assert_eq!(
            session
                .transcript
                .count_text("Correct. Goroutines are lightweight threads."),
            1
        );

        // evaluator failure still finishes the quiz
        session = interviewer
            .dispatch(&session, Event::SubmitText("a pipe".into()))
            .await
            .unwrap();
        assert!(session.stage.is_concluded());
        let quiz = session.stage.quiz().unwrap();
        assert_eq!(quiz.index(), quiz.len());
        assert_eq!(session.transcript.count_text(messages::EVALUATION_FAILED), 1);
        assert_eq!(session.transcript.count_text(messages::CLOSING), 1);
        assert_eq!(model.calls(), 4);

        let err = interviewer
            .dispatch(&session, Event::SubmitText("more".into()))
            .await
            .unwrap_err();
        assert_eq!(err, TransitionError::Concluded);
    }

    #[tokio::test]
    async fn test_generation_failure_concludes_with_apology() {
        let model = Arc::new(ScriptedModel::new().reply(JOHN_JSON).reply("no json here"));
        let interviewer = interviewer(model);
        let mut session = interviewer.open(no_roles()).await.unwrap();
        for event in [
            Event::ChooseUpload,
            Event::ResumeUploaded(txt("John")),
            Event::ConfirmDetails,
        ] {
            session = interviewer.dispatch(&session, event).await.unwrap();
        }
        assert!(session.stage.is_concluded());
        assert_eq!(session.transcript.count_text(messages::GENERATION_FAILED), 1);
        assert_eq!(session.transcript.count_text(messages::CLOSING), 1);
    }

    #[tokio::test]
    async fn test_manual_path_without_stack_never_calls_model() {
        let model = Arc::new(ScriptedModel::new());
        let interviewer = interviewer(model.clone());
        let options = SessionOptions {
            manual_fields: vec!["Full Name".into(), "Email".into()],
            role_selection: false,
            ..SessionOptions::default()
        };
        let mut session = interviewer.open(options).await.unwrap();
        for event in [
            Event::ChooseManual,
            Event::SubmitText("Jane".into()),
            Event::SubmitText("jane@x.com".into()),
        ] {
            session = interviewer.dispatch(&session, event).await.unwrap();
        }
        assert_eq!(session.candidate.text(FULL_NAME), Some("Jane"));
        assert_eq!(session.candidate.text(EMAIL), Some("jane@x.com"));
        assert!(session.stage.is_concluded());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_model_times_out_into_fallback() {
        let interviewer = Interviewer::new(Arc::new(StalledModel), Duration::from_secs(30));
        let session = interviewer.open(no_roles()).await.unwrap();
        let session = interviewer.dispatch(&session, Event::ChooseUpload).await.unwrap();
        let session = interviewer
            .dispatch(&session, Event::ResumeUploaded(txt("John")))
            .await
            .unwrap();
        assert_eq!(session.stage, Stage::AwaitingUpload);
        assert_eq!(session.transcript.last().unwrap().text, messages::UPLOAD_FAILED);
    }
}
