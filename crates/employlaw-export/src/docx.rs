//! Word export: the report as a single paragraph of hard-broken lines.

use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use docx_rs::{BreakType, Docx, Paragraph, Run};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::ExportError;

pub const EXPORT_FILE_NAME: &str = "UK_Employment_Law_Advice.docx";

/// Build the document for a report.
///
/// Each line becomes one run preceded by a text-wrapping break, so line
/// breaks in the report survive literally instead of being reflowed.
pub fn build_document(report: &str) -> Docx {
    let paragraph = report
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .fold(Paragraph::new(), |p, line| {
            p.add_run(Run::new().add_break(BreakType::TextWrapping).add_text(line))
        });
    Docx::new().add_paragraph(paragraph)
}

/// Serialise the report document into `writer`.
pub fn write_document<W: Write + Seek>(report: &str, writer: W) -> Result<(), ExportError> {
    build_document(report)
        .build()
        .pack(writer)
        .map_err(|e| ExportError::Pack(Box::new(e)))
}

/// Write the report to `dir/UK_Employment_Law_Advice.docx`.
///
/// Returns `Ok(None)` without touching the filesystem when the report is
/// empty. The document is written to a temporary file in `dir` and renamed
/// over any existing file of the same name, so a failed export leaves the
/// previous document intact.
pub fn export_report(report: &str, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    if report.is_empty() {
        debug!("export skipped: no report");
        return Ok(None);
    }

    let path = dir.join(EXPORT_FILE_NAME);
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_document(report, &mut writer)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.persist(&path).map_err(|e| io_err(e.error))?;

    info!(
        path = %path.display(),
        lines = report.split('\n').count(),
        "exported report"
    );
    Ok(Some(path))
}
