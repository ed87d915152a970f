use std::sync::Arc;

use tokio::sync::Mutex;

use crate::conversation::controller::Interviewer;
use crate::conversation::machine::TransitionError;
use crate::conversation::session::{Session, SessionOptions};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub interviewer: Arc<Interviewer>,
    /// The one live session. Held locked for the duration of each action.
    pub session: Arc<Mutex<Session>>,
    /// Used again whenever the session is reset.
    pub session_options: SessionOptions,
}

impl AppState {
    /// Builds state with a freshly greeted session.
    pub async fn new(
        interviewer: Interviewer,
        session_options: SessionOptions,
    ) -> Result<Self, TransitionError> {
        let session = interviewer.open(session_options.clone()).await?;
        Ok(Self {
            interviewer: Arc::new(interviewer),
            session: Arc::new(Mutex::new(session)),
            session_options,
        })
    }
}
