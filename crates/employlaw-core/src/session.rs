//! Query session controller.
//!
//! A [`Session`] is the single record behind the form. [`QuerySession`] owns
//! it and is the only writer. The visible [`SessionState`] is derived from the
//! record's fields, so there is no second source of truth to keep in sync.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──submit──▶ Submitting ──success──▶ Ready ──reset──▶ Idle
//!                      │
//!                      └──failure──▶ Failed ──submit──▶ Submitting
//! ```

use tracing::{debug, error, info};

use crate::generate::Generator;
use crate::prompt::GenerateRequest;

/// The only failure text ever shown to the user.
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching the response.";

/// Observable form state. Read-only outside this module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    query: String,
    response: String,
    loading: bool,
    error: String,
    show_options: bool,
}

impl Session {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Report markdown, empty until a request succeeds.
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Last error message, empty when there is none.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Whether share/export/reset/quit should be offered.
    pub fn show_options(&self) -> bool {
        self.show_options
    }

    pub fn state(&self) -> SessionState {
        if self.loading {
            SessionState::Submitting
        } else if !self.response.is_empty() {
            SessionState::Ready
        } else if !self.error.is_empty() {
            SessionState::Failed
        } else {
            SessionState::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Awaiting input.
    Idle,
    /// A request is in flight; submission is disabled.
    Submitting,
    /// Report available with post-response actions.
    Ready,
    /// Last request failed; the error is shown under the input.
    Failed,
}

/// Where input focus belongs for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    QueryInput,
    Actions,
    None,
}

/// Owner of the [`Session`] and handler of every user action that mutates it.
#[derive(Debug, Default)]
pub struct QuerySession {
    session: Session,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn focus(&self) -> Focus {
        match self.state() {
            SessionState::Idle | SessionState::Failed => Focus::QueryInput,
            SessionState::Ready => Focus::Actions,
            SessionState::Submitting => Focus::None,
        }
    }

    /// Replace the query text, as typing into the input does.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.session.query = query.into();
    }

    /// Start a submission of the current query.
    ///
    /// Returns the request to issue, or `None` when the submission is
    /// ignored: a request is already in flight, or the query is blank.
    pub fn begin_submit(&mut self) -> Option<GenerateRequest> {
        if self.session.loading {
            debug!("submit ignored: request already in flight");
            return None;
        }
        if self.session.query.trim().is_empty() {
            debug!("submit ignored: empty query");
            return None;
        }

        self.session.loading = true;
        self.session.error.clear();
        self.session.response.clear();
        self.session.show_options = false;

        info!(query_len = self.session.query.len(), "submitting query");
        Some(GenerateRequest::for_query(&self.session.query))
    }

    /// Apply the outcome of the outstanding request.
    ///
    /// A present, non-empty result moves to [`SessionState::Ready`]. An
    /// empty or absent result, or an error, moves to
    /// [`SessionState::Failed`] with [`FETCH_ERROR_MESSAGE`]; the error
    /// detail only goes to the log. Settling with nothing in flight is a
    /// no-op.
    pub fn settle(&mut self, outcome: anyhow::Result<Option<String>>) -> SessionState {
        if !self.session.loading {
            debug!("settle ignored: no request in flight");
            return self.state();
        }

        match outcome {
            Ok(Some(text)) if !text.is_empty() => {
                info!(response_len = text.len(), "response received");
                self.session.response = text;
                self.session.show_options = true;
            }
            Ok(_) => {
                error!("generation backend returned an empty result");
                self.session.error = FETCH_ERROR_MESSAGE.to_string();
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "generation request failed");
                self.session.error = FETCH_ERROR_MESSAGE.to_string();
            }
        }
        self.session.loading = false;
        self.state()
    }

    /// Submit the current query to `generator` and wait for it to settle.
    ///
    /// Issues exactly one request when the submission is accepted, none
    /// otherwise. There is no timeout: a call that never settles keeps the
    /// session in [`SessionState::Submitting`].
    pub async fn submit(&mut self, generator: &dyn Generator) -> SessionState {
        let Some(request) = self.begin_submit() else {
            return self.state();
        };
        let outcome = generator.generate(&request).await;
        self.settle(outcome)
    }

    /// "Ask Another Question": back to an empty form with focus on the input.
    ///
    /// Only accepted from [`SessionState::Ready`]; returns whether it applied.
    pub fn reset(&mut self) -> bool {
        if self.state() != SessionState::Ready {
            debug!(state = ?self.state(), "reset ignored");
            return false;
        }
        self.session.query.clear();
        self.session.response.clear();
        self.session.show_options = false;
        true
    }
}
