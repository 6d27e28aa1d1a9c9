//! Platform share targets.
//!
//! The host may or may not offer a share capability, so every target is
//! probed with [`ShareTarget::is_available`] before use.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use employlaw_core::REPORT_TITLE;
use tracing::info;

use crate::error::ShareError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
}

impl ShareRequest {
    /// Request for sharing a report under the fixed app title.
    pub fn report(text: &str) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            text: text.to_string(),
        }
    }
}

pub trait ShareTarget {
    fn is_available(&self) -> bool;

    fn share(&self, request: &ShareRequest) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// No share capability; the caller shows the unsupported notice.
    Unsupported,
}

/// Share `report` through `target` if it is available.
pub fn share_report(target: &dyn ShareTarget, report: &str) -> Result<ShareOutcome, ShareError> {
    if !target.is_available() {
        info!("share target unavailable");
        return Ok(ShareOutcome::Unsupported);
    }
    target.share(&ShareRequest::report(report))?;
    Ok(ShareOutcome::Shared)
}

/// A host with no share capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

impl ShareTarget for Unsupported {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _request: &ShareRequest) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}

/// Hands the report to an external program.
///
/// The program receives the title, a blank line, and the text on stdin; the
/// title is also exported as `SHARE_TITLE`.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandShare {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a command line like `"mail -s report someone@example.com"`.
    ///
    /// Splits on whitespace only; quoting is not supported.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).with_args(parts))
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl ShareTarget for CommandShare {
    /// Available when the program is an executable on `PATH`, or at the
    /// given path.
    fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("SHARE_TITLE", &request.title)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| ShareError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let payload = format!("{}\n\n{}\n", request.title, request.text);
            // A program that exits without reading stdin is judged by its status.
            match stdin.write_all(payload.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(ShareError::Spawn {
                        program: self.program_name(),
                        source: e,
                    });
                }
                _ => {}
            }
        }

        let status = child.wait().map_err(|source| ShareError::Spawn {
            program: self.program_name(),
            source,
        })?;
        if !status.success() {
            return Err(ShareError::Failed {
                program: self.program_name(),
                status: status.to_string(),
            });
        }

        info!(program = %self.program_name(), "report shared");
        Ok(())
    }
}
