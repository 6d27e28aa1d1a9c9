//! Post-response actions offered once a report is on screen.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action: {0:?}")]
pub struct UnknownAction(pub String);

/// The four actions shown under a rendered report, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Share,
    Export,
    AskAnother,
    Quit,
}

impl Action {
    pub const ALL: [Action; 4] = [Self::Share, Self::Export, Self::AskAnother, Self::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Share => "Share Report",
            Self::Export => "Export to MS Word",
            Self::AskAnother => "Ask Another Question",
            Self::Quit => "Quit App",
        }
    }

    /// Menu number (1-based) shown next to the label.
    pub fn number(&self) -> usize {
        match self {
            Self::Share => 1,
            Self::Export => 2,
            Self::AskAnother => 3,
            Self::Quit => 4,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the menu number, a one-letter shortcut, or a keyword.
impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "s" | "share" => Ok(Self::Share),
            "2" | "e" | "w" | "export" | "word" => Ok(Self::Export),
            "3" | "a" | "n" | "ask" | "new" | "another" => Ok(Self::AskAnother),
            "4" | "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}
