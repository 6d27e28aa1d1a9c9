//! Report outputs: Word document export and platform share.

mod error;
pub use error::{ExportError, ShareError};

pub mod docx;
pub use docx::{EXPORT_FILE_NAME, build_document, export_report, write_document};

pub mod share;
pub use share::{CommandShare, ShareOutcome, ShareRequest, ShareTarget, Unsupported, share_report};
