use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to pack document: {0}")]
    Pack(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("sharing is not supported on this system")]
    Unsupported,

    #[error("share command {program} could not be run: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("share command {program} exited with {status}")]
    Failed { program: String, status: String },
}
