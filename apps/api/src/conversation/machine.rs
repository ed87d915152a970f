//! The conversation state machine.
//!
//! `transition` is pure: it takes the current session and one event, and
//! returns the next session plus the side effects the caller must run.
//! Component results come back in as events (`ResumeParsed`, `QuestionsReady`,
//! `AnswerEvaluated`), so the whole flow is testable without a model or a host.

use thiserror::Error;

use crate::conversation::messages;
use crate::conversation::session::{Quiz, Session, Stage};
use crate::intake::UploadedFile;
use crate::models::candidate::{normalize_field_key, CandidateRecord, JOB_ROLE};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin,
    ChooseUpload,
    ChooseManual,
    ResumeUploaded(UploadedFile),
    /// `None` when the upload could not be turned into a profile.
    ResumeParsed(Option<CandidateRecord>),
    ConfirmDetails,
    RejectDetails,
    /// A manual field answer or a quiz answer, depending on the stage.
    SubmitText(String),
    SelectRole(String),
    QuestionsReady(Option<Vec<String>>),
    AnswerEvaluated(Option<String>),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Begin => "begin",
            Event::ChooseUpload => "choose_upload",
            Event::ChooseManual => "choose_manual",
            Event::ResumeUploaded(_) => "resume_uploaded",
            Event::ResumeParsed(_) => "resume_parsed",
            Event::ConfirmDetails => "confirm_details",
            Event::RejectDetails => "reject_details",
            Event::SubmitText(_) => "submit_text",
            Event::SelectRole(_) => "select_role",
            Event::QuestionsReady(_) => "questions_ready",
            Event::AnswerEvaluated(_) => "answer_evaluated",
        }
    }
}

/// Work the runtime performs on the machine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ExtractResume(UploadedFile),
    GenerateQuestions { tech_stack: Vec<String>, role: String },
    EvaluateAnswer { question: String, answer: String },
    SessionComplete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub session: Session,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("'{event}' is not accepted in stage {stage}")]
    Unexpected {
        stage: &'static str,
        event: &'static str,
    },

    #[error("the screening session has concluded")]
    Concluded,

    #[error("reply cannot be empty")]
    EmptyText,

    #[error("'{0}' is not one of the available roles")]
    UnknownRole(String),
}

/// Applies one event. On error the input session is left as it was.
pub fn transition(session: &Session, event: Event) -> Result<Step, TransitionError> {
    if session.stage.is_concluded() {
        return Err(TransitionError::Concluded);
    }
    let event = match event {
        Event::SubmitText(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyText);
            }
            Event::SubmitText(text.to_string())
        }
        other => other,
    };

    let mut next = session.clone();
    let mut effects = Vec::new();

    match (session.stage.clone(), event) {
        (Stage::Greeting, Event::Begin) => {
            next.transcript.assistant(messages::GREETING);
            next.stage = Stage::AwaitingResumeDecision;
        }

        (Stage::AwaitingResumeDecision, Event::ChooseUpload) => {
            next.transcript.applicant(messages::CHOSE_UPLOAD);
            next.transcript.assistant(messages::UPLOAD_PROMPT);
            next.stage = Stage::AwaitingUpload;
        }

        (Stage::AwaitingResumeDecision | Stage::AwaitingUpload, Event::ChooseManual) => {
            next.transcript.applicant(messages::CHOSE_MANUAL);
            next.transcript.assistant(messages::MANUAL_INTRO);
            begin_manual(&mut next, &mut effects);
        }

        (Stage::AwaitingUpload, Event::ResumeUploaded(file)) => {
            next.transcript.applicant(messages::uploaded(&file.name));
            effects.push(Effect::ExtractResume(file));
        }

        (Stage::AwaitingUpload, Event::ResumeParsed(Some(record))) => {
            next.candidate.overlay(record);
            next.transcript
                .assistant(messages::verification(&next.candidate));
            next.stage = Stage::AwaitingVerification;
        }

        (Stage::AwaitingUpload, Event::ResumeParsed(None)) => {
            next.transcript.assistant(messages::UPLOAD_FAILED);
        }

        (Stage::AwaitingVerification, Event::ConfirmDetails) => {
            next.transcript.applicant(messages::CONFIRMED);
            after_profile(&mut next, &mut effects);
        }

        (Stage::AwaitingVerification, Event::RejectDetails) => {
            next.transcript.applicant(messages::REJECTED);
            next.transcript.assistant(messages::REJECT_REPLY);
            begin_manual(&mut next, &mut effects);
        }

        (Stage::ManualGathering { field_index }, Event::SubmitText(answer)) => {
            let label = next
                .options
                .manual_fields
                .get(field_index)
                .cloned()
                .unwrap_or_default();
            next.transcript.applicant(answer.clone());
            next.candidate.set_text(normalize_field_key(&label), answer);
            ask_field_or_finish(&mut next, field_index + 1, &mut effects);
        }

        (Stage::AwaitingRoleSelection, Event::SelectRole(role)) => {
            let role = next
                .options
                .roles
                .iter()
                .find(|r| r.eq_ignore_ascii_case(role.trim()))
                .cloned()
                .ok_or(TransitionError::UnknownRole(role))?;
            next.transcript.applicant(messages::role_selected(&role));
            next.candidate.set_text(JOB_ROLE, role);
            enter_generation(&mut next, &mut effects);
        }

        (Stage::GeneratingQuestions, Event::QuestionsReady(questions)) => {
            match questions.and_then(Quiz::new) {
                Some(quiz) => {
                    next.transcript.assistant(messages::question(&quiz));
                    next.stage = Stage::AskingQuestions(quiz);
                }
                None => {
                    next.transcript.assistant(messages::GENERATION_FAILED);
                    conclude(&mut next, None, &mut effects);
                }
            }
        }

        (Stage::AskingQuestions(mut quiz), Event::SubmitText(answer))
            if quiz.pending_answer().is_none() =>
        {
            let question = quiz.current().unwrap_or_default().to_string();
            next.transcript.applicant(answer.clone());
            quiz.hold_answer(answer.clone());
            next.stage = Stage::AskingQuestions(quiz);
            effects.push(Effect::EvaluateAnswer { question, answer });
        }

        (Stage::AskingQuestions(mut quiz), Event::AnswerEvaluated(feedback))
            if quiz.pending_answer().is_some() =>
        {
            let feedback = feedback.unwrap_or_else(|| messages::EVALUATION_FAILED.to_string());
            next.transcript.assistant(feedback);
            quiz.advance();
            if quiz.is_complete() {
                next.transcript.assistant(messages::QUIZ_COMPLETE);
                conclude(&mut next, Some(quiz), &mut effects);
            } else {
                next.transcript.assistant(messages::question(&quiz));
                next.stage = Stage::AskingQuestions(quiz);
            }
        }

        (stage, event) => {
            return Err(TransitionError::Unexpected {
                stage: stage.name(),
                event: event.name(),
            })
        }
    }

    Ok(Step {
        session: next,
        effects,
    })
}

/// Starts (or restarts) manual entry at the first field. Existing fields stay.
fn begin_manual(next: &mut Session, effects: &mut Vec<Effect>) {
    ask_field_or_finish(next, 0, effects);
}

fn ask_field_or_finish(next: &mut Session, field_index: usize, effects: &mut Vec<Effect>) {
    match next.options.manual_fields.get(field_index) {
        Some(label) => {
            next.transcript
                .assistant(messages::ask_field(field_index, label));
            next.stage = Stage::ManualGathering { field_index };
        }
        None => after_profile(next, effects),
    }
}

/// Profile is settled: pick a role if needed, otherwise go straight to the quiz.
fn after_profile(next: &mut Session, effects: &mut Vec<Effect>) {
    if next.options.role_selection && !next.candidate.has_role() {
        next.transcript.assistant(messages::ROLE_PROMPT);
        next.stage = Stage::AwaitingRoleSelection;
    } else {
        enter_generation(next, effects);
    }
}

fn enter_generation(next: &mut Session, effects: &mut Vec<Effect>) {
    let tech_stack = next.candidate.tech_stack();
    if tech_stack.is_empty() {
        next.transcript.assistant(messages::NO_TECH_STACK);
        conclude(next, None, effects);
        return;
    }
    next.transcript.assistant(messages::PREPARING_QUESTIONS);
    next.stage = Stage::GeneratingQuestions;
    effects.push(Effect::GenerateQuestions {
        tech_stack,
        role: next.candidate.target_role(),
    });
}

/// Enters the terminal stage. The closing message goes out at most once.
fn conclude(next: &mut Session, quiz: Option<Quiz>, effects: &mut Vec<Effect>) {
    next.stage = Stage::Concluded { quiz };
    if !next.closing_sent {
        next.transcript.assistant(messages::CLOSING);
        next.closing_sent = true;
        effects.push(Effect::SessionComplete);
    }
}
