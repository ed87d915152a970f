//! Axum route handlers for the Session API.
//!
//! Every handler holds the session lock for its whole run, model calls
//! included, so exactly one transition is ever in flight.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::conversation::machine::Event;
use crate::conversation::session::{Session, Stage};
use crate::errors::AppError;
use crate::intake::UploadedFile;
use crate::models::candidate::CandidateRecord;
use crate::models::transcript::Transcript;
use crate::state::AppState;

/// Multipart field that carries the resume.
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// One discrete user action, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionRequest {
    ChooseUpload,
    ChooseManual,
    ConfirmDetails,
    RejectDetails,
    SubmitText { text: String },
    SelectRole { role: String },
}

impl From<ActionRequest> for Event {
    fn from(action: ActionRequest) -> Self {
        match action {
            ActionRequest::ChooseUpload => Event::ChooseUpload,
            ActionRequest::ChooseManual => Event::ChooseManual,
            ActionRequest::ConfirmDetails => Event::ConfirmDetails,
            ActionRequest::RejectDetails => Event::RejectDetails,
            ActionRequest::SubmitText { text } => Event::SubmitText(text),
            ActionRequest::SelectRole { role } => Event::SelectRole(role),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizProgress {
    pub answered: usize,
    pub total: usize,
}

/// What a client needs to render the conversation. Questions not yet asked
/// stay hidden.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stage: &'static str,
    pub transcript: Transcript,
    pub candidate: CandidateRecord,
    pub quiz: Option<QuizProgress>,
    /// Only populated while a role choice is expected.
    pub roles: Vec<String>,
    pub concluded: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let roles = match session.stage {
            Stage::AwaitingRoleSelection => session.options.roles.clone(),
            _ => Vec::new(),
        };
        Self {
            session_id: session.id,
            started_at: session.started_at,
            stage: session.stage.name(),
            transcript: session.transcript.clone(),
            candidate: session.candidate.clone(),
            quiz: session.stage.quiz().map(|q| QuizProgress {
                answered: q.index(),
                total: q.len(),
            }),
            roles,
            concluded: session.stage.is_concluded(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
    pub role_selection: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::from(&*session))
}

/// POST /api/v1/session/actions
///
/// Applies one button press, text reply or role choice.
pub async fn handle_action(
    State(state): State<AppState>,
    Json(action): Json<ActionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    let next = state.interviewer.dispatch(&session, action.into()).await?;
    *session = next;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/session/resume
///
/// Multipart upload; the `file` field carries the resume (PDF, DOCX or text).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        upload = Some(UploadedFile { name, content });
    }

    let file = upload.ok_or_else(|| {
        AppError::Validation(format!("Multipart field '{UPLOAD_FIELD}' is required"))
    })?;
    if file.content.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    info!("Received resume upload '{}' ({} bytes)", file.name, file.content.len());

    let mut session = state.session.lock().await;
    let next = state
        .interviewer
        .dispatch(&session, Event::ResumeUploaded(file))
        .await?;
    *session = next;
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/v1/session
///
/// Discards the current session and greets a fresh one.
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    info!("Discarding session {}", session.id);
    *session = state.interviewer.open(state.session_options.clone()).await?;
    Ok(Json(SessionView::from(&*session)))
}

/// GET /api/v1/roles
pub async fn handle_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.session_options.roles.clone(),
        role_selection: state.session_options.role_selection,
    })
}
