//! Wires the query session to the generation backend, the exporter, and the
//! share target.

use std::fmt;
use std::path::PathBuf;

use anyhow::bail;
use employlaw_ai::EventClient;
use employlaw_core::{Action, Generator, QuerySession, Session, SessionState};
use employlaw_export::{CommandShare, ShareOutcome, ShareTarget, Unsupported};
use tracing::{info, warn};

use crate::cli::Cli;

/// Whether the prompt loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One-line feedback from a side-effect action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Exported(PathBuf),
    ExportFailed(String),
    Shared,
    ShareUnsupported,
    ShareFailed(String),
}

impl Notice {
    /// Blocking notices wait for acknowledgement before the menu returns.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::ShareUnsupported)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exported(path) => write!(f, "Report saved to {}", path.display()),
            Self::ExportFailed(err) => write!(f, "Export failed: {err}"),
            Self::Shared => f.write_str("Report shared."),
            Self::ShareUnsupported => f.write_str("Sharing is not supported on this system."),
            Self::ShareFailed(err) => write!(f, "Sharing failed: {err}"),
        }
    }
}

pub struct App {
    session: QuerySession,
    generator: Box<dyn Generator>,
    share_target: Box<dyn ShareTarget>,
    output_dir: PathBuf,
}

impl App {
    pub fn new(
        generator: Box<dyn Generator>,
        share_target: Box<dyn ShareTarget>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            session: QuerySession::new(),
            generator,
            share_target,
            output_dir,
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let mut client = EventClient::new(cli.endpoint.clone());
        if let Some(key) = &cli.api_key {
            client = client.with_api_key(key.clone());
        }

        let share_target: Box<dyn ShareTarget> = match cli
            .share_command
            .as_deref()
            .and_then(CommandShare::from_command_line)
        {
            Some(cmd) => Box::new(cmd),
            None => Box::new(Unsupported),
        };

        Self::new(Box::new(client), share_target, cli.output_dir.clone())
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Enter `query` and submit it, waiting for the backend to settle.
    pub async fn ask(&mut self, query: String) -> SessionState {
        self.session.set_query(query);
        self.session.submit(self.generator.as_ref()).await
    }

    /// Submit `query` and return the report, or the reason there is none.
    ///
    /// A blank query is never sent, so it is reported here rather than left
    /// as an `Idle` session with no message.
    pub async fn ask_for_report(&mut self, query: String) -> anyhow::Result<&str> {
        match self.ask(query).await {
            SessionState::Ready => Ok(self.session().response()),
            SessionState::Idle => bail!("query is empty"),
            SessionState::Failed => bail!("{}", self.session().error()),
            SessionState::Submitting => bail!("request did not settle"),
        }
    }

    /// Export the current report. `None` when there is nothing to export.
    pub fn export(&self) -> Option<Notice> {
        match employlaw_export::export_report(self.session().response(), &self.output_dir) {
            Ok(Some(path)) => Some(Notice::Exported(path)),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "export failed");
                Some(Notice::ExportFailed(err.to_string()))
            }
        }
    }

    pub fn share(&self) -> Notice {
        match employlaw_export::share_report(self.share_target.as_ref(), self.session().response())
        {
            Ok(ShareOutcome::Shared) => Notice::Shared,
            Ok(ShareOutcome::Unsupported) => Notice::ShareUnsupported,
            Err(err) => {
                warn!(error = %err, "share failed");
                Notice::ShareFailed(err.to_string())
            }
        }
    }

    /// Run one post-response action.
    pub fn apply(&mut self, action: Action) -> (Flow, Option<Notice>) {
        match action {
            Action::Share => (Flow::Continue, Some(self.share())),
            Action::Export => (Flow::Continue, self.export()),
            Action::AskAnother => {
                self.session.reset();
                (Flow::Continue, None)
            }
            Action::Quit => {
                info!("quit requested");
                (Flow::Quit, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use employlaw_core::{FETCH_ERROR_MESSAGE, GenerateRequest};

    struct Canned(Option<&'static str>);

    #[async_trait]
    impl Generator for Canned {
        async fn generate(&self, _request: &GenerateRequest) -> anyhow::Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    fn app(reply: Option<&'static str>, dir: &std::path::Path) -> App {
        App::new(
            Box::new(Canned(reply)),
            Box::new(Unsupported),
            dir.to_path_buf(),
        )
    }

    #[tokio::test]
    async fn ask_then_export_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(Some("Line1\nLine2"), dir.path());

        assert_eq!(app.ask("q".into()).await, SessionState::Ready);
        let (flow, notice) = app.apply(Action::Export);

        assert_eq!(flow, Flow::Continue);
        let expected = dir.path().join("UK_Employment_Law_Advice.docx");
        assert_eq!(notice, Some(Notice::Exported(expected.clone())));
        assert!(expected.exists());
        assert_eq!(app.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn export_without_report_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(None, dir.path());
        assert_eq!(app.export(), None);
    }

    #[tokio::test]
    async fn share_without_capability_leaves_session_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(Some("report"), dir.path());
        app.ask("q".into()).await;
        let before = app.session().clone();

        let (flow, notice) = app.apply(Action::Share);

        assert_eq!(flow, Flow::Continue);
        let notice = notice.unwrap();
        assert_eq!(notice, Notice::ShareUnsupported);
        assert!(notice.is_blocking());
        assert_eq!(notice.to_string(), "Sharing is not supported on this system.");
        assert_eq!(app.session(), &before);
    }

    #[tokio::test]
    async fn ask_another_resets_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(Some("report"), dir.path());
        app.ask("q".into()).await;

        assert_eq!(app.apply(Action::AskAnother), (Flow::Continue, None));
        assert_eq!(app.state(), SessionState::Idle);
        assert_eq!(app.session(), &Session::default());
    }

    #[tokio::test]
    async fn quit_ends_loop_without_touching_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(Some("report"), dir.path());
        app.ask("q".into()).await;

        assert_eq!(app.apply(Action::Quit), (Flow::Quit, None));
        assert_eq!(app.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn empty_reply_fails_with_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(None, dir.path());

        assert_eq!(app.ask("test".into()).await, SessionState::Failed);
        assert_eq!(app.session().error(), FETCH_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn blank_one_shot_query_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(Some("report"), dir.path());

        let err = app.ask_for_report("   ".into()).await.unwrap_err();

        assert_eq!(err.to_string(), "query is empty");
        assert_eq!(app.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn one_shot_failure_carries_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(None, dir.path());

        let err = app.ask_for_report("test".into()).await.unwrap_err();
        assert_eq!(err.to_string(), FETCH_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn one_shot_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(Some("Yes, under the Employment Rights Act 1996..."), dir.path());

        let report = app.ask_for_report("Am I entitled to redundancy pay?".into()).await;
        assert_eq!(report.unwrap(), "Yes, under the Employment Rights Act 1996...");
    }

    #[test]
    fn from_cli_builds_without_share_command() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["employlaw", "--output-dir", "/tmp/reports"]).unwrap();
        let app = App::from_cli(&cli);
        assert_eq!(app.output_dir, PathBuf::from("/tmp/reports"));
        assert!(!app.share_target.is_available());
        assert_eq!(app.state(), SessionState::Idle);
    }
}
