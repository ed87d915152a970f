//! Session state: one transcript, one candidate record, one stage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::candidate::CandidateRecord;
use crate::models::transcript::Transcript;

/// Manual-entry prompts, asked in order. Labels normalize to record keys.
pub const DEFAULT_MANUAL_FIELDS: &[&str] = &[
    "Full Name",
    "Email",
    "Phone Number",
    "Years of Experience",
    "Desired Positions",
    "Current Location",
    "Tech Stack",
];

/// Closed list of roles an applicant can pick from.
pub const JOB_ROLES: &[&str] = &[
    "AI/ML Intern",
    "Data Scientist",
    "Software Engineer (Backend)",
    "Software Engineer (Frontend)",
    "DevOps Engineer",
    "Full-Stack Developer",
];

/// Per-deployment shape of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOptions {
    pub manual_fields: Vec<String>,
    /// When false, the role step is skipped and the quiz uses the implicit role.
    pub role_selection: bool,
    pub roles: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            manual_fields: DEFAULT_MANUAL_FIELDS.iter().map(|s| s.to_string()).collect(),
            role_selection: true,
            roles: JOB_ROLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Quiz progress. `index` counts evaluated answers and never exceeds the
/// number of questions; `index == len` means the quiz is over.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    questions: Vec<String>,
    index: usize,
    pending_answer: Option<String>,
}

impl Quiz {
    /// `None` for an empty question list: a quiz that asks nothing is never built.
    pub fn new(questions: Vec<String>) -> Option<Self> {
        (!questions.is_empty()).then_some(Self {
            questions,
            index: 0,
            pending_answer: None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.index == self.questions.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.questions.get(self.index).map(String::as_str)
    }

    pub fn pending_answer(&self) -> Option<&str> {
        self.pending_answer.as_deref()
    }

    pub(super) fn hold_answer(&mut self, answer: String) {
        self.pending_answer = Some(answer);
    }

    /// Records the pending answer as evaluated and moves to the next question.
    pub(super) fn advance(&mut self) {
        self.pending_answer = None;
        self.index = (self.index + 1).min(self.questions.len());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Greeting,
    AwaitingResumeDecision,
    AwaitingUpload,
    AwaitingVerification,
    ManualGathering { field_index: usize },
    AwaitingRoleSelection,
    GeneratingQuestions,
    AskingQuestions(Quiz),
    /// Terminal. Keeps the finished quiz when one ran.
    Concluded { quiz: Option<Quiz> },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Greeting => "GREETING",
            Stage::AwaitingResumeDecision => "AWAITING_RESUME_DECISION",
            Stage::AwaitingUpload => "AWAITING_UPLOAD",
            Stage::AwaitingVerification => "AWAITING_VERIFICATION_RESPONSE",
            Stage::ManualGathering { .. } => "MANUAL_GATHERING",
            Stage::AwaitingRoleSelection => "AWAITING_ROLE_SELECTION",
            Stage::GeneratingQuestions => "GENERATING_QUESTIONS",
            Stage::AskingQuestions(_) => "ASKING_QUESTIONS",
            Stage::Concluded { .. } => "CONCLUDED",
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match self {
            Stage::AskingQuestions(quiz) => Some(quiz),
            Stage::Concluded { quiz } => quiz.as_ref(),
            _ => None,
        }
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self, Stage::Concluded { .. })
    }
}

/// Everything one applicant's conversation holds. Lives in memory only and
/// is replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stage: Stage,
    pub transcript: Transcript,
    pub candidate: CandidateRecord,
    pub options: SessionOptions,
    pub(super) closing_sent: bool,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            stage: Stage::Greeting,
            transcript: Transcript::new(),
            candidate: CandidateRecord::new(),
            options,
            closing_sent: false,
        }
    }
}
