use crate::error::Result;
use crate::processor::ChangeRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit-log line format. Both serve the same records; they differ in
/// audience: `Navigation` is for jumping to lines in an editor, `Stats`
/// carries phrase metrics for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFormat {
    /// `<file>:<line>\t<line text>`
    Navigation,
    /// `<file>:<line>:<col>: Repeated phrase starts here. Phrase length: <chars>, Repeated count: <k>`
    Stats,
}

/// A file or line the batch had to pass over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipEntry {
    pub file: PathBuf,
    /// 1-based line number for per-line skips; `None` for whole-file skips.
    pub line_number: Option<u32>,
    pub reason: String,
}

impl SkipEntry {
    #[must_use]
    pub fn file(file: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            file,
            line_number: None,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn line(file: PathBuf, line_number: u32, reason: impl Into<String>) -> Self {
        Self {
            file,
            line_number: Some(line_number),
            reason: reason.into(),
        }
    }
}

/// Counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Directories matching the target name.
    pub dirs_found: usize,

    /// Files discovered under those directories.
    pub files_found: usize,

    /// Files actually processed in this invocation (resume skips count
    /// toward `files_found` only).
    pub files_processed: usize,

    /// Files with at least one detected or collapsed line, across the whole
    /// batch including any portion processed before a resume.
    pub files_changed: usize,

    /// Total detected/collapsed repeat runs across the whole batch.
    pub lines_flagged: usize,

    /// Files passed over for I/O or encoding problems, whole batch.
    pub files_skipped: usize,
}

impl Summary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Write the audit log: one line per change record in the requested format,
/// then any skip entries as `#`-prefixed trailer lines.
pub fn write_audit_log(
    path: &Path,
    format: AuditFormat,
    records: &[ChangeRecord],
    skipped: &[SkipEntry],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = Vec::new();

    for record in records {
        match format {
            AuditFormat::Navigation => {
                writeln!(
                    out,
                    "{}:{}\t{}",
                    record.file.display(),
                    record.line_number,
                    record.text
                )?;
            }
            AuditFormat::Stats => {
                writeln!(
                    out,
                    "{}:{}:{}: Repeated phrase starts here. Phrase length: {}, Repeated count: {}",
                    record.file.display(),
                    record.line_number,
                    record.column,
                    record.phrase_chars,
                    record.count
                )?;
            }
        }
    }

    for skip in skipped {
        match skip.line_number {
            Some(line) => writeln!(
                out,
                "# skipped {}:{}: {}",
                skip.file.display(),
                line,
                skip.reason
            )?,
            None => writeln!(out, "# skipped {}: {}", skip.file.display(), skip.reason)?,
        }
    }

    fs::write(path, out)?;
    Ok(())
}
