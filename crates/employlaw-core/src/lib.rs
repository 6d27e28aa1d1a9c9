//! Query session core: the form state machine, the prompt template, and the
//! request types shared between the generation client and the CLI.

pub mod action;
pub mod generate;
pub mod prompt;
pub mod session;

pub use action::{Action, UnknownAction};
pub use generate::Generator;
pub use prompt::{GenerateParams, GenerateRequest, ResponseType, build_prompt};
pub use session::{FETCH_ERROR_MESSAGE, Focus, QuerySession, Session, SessionState};

/// Heading of the app and title attached to shared reports.
pub const REPORT_TITLE: &str = "UK Employment Law Advice";
