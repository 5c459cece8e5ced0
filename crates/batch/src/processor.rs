use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stutter_core::{collapse_line, find_first_repeat, tokenize, CollapseConfig};

/// How the processor treats a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Locate stutters and record them; never rewrite anything.
    Report,
    /// Collapse stutters and produce an edited sibling file.
    Collapse,
}

/// One audit-trail entry: a detected or collapsed repeat run in one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub file: PathBuf,
    /// 1-based line number.
    pub line_number: u32,
    /// 1-based character column of the run's first occurrence.
    pub column: usize,
    /// Character length of the canonical phrase text.
    pub phrase_chars: usize,
    /// Number of consecutive occurrences found.
    pub count: usize,
    /// Line text: after the edit in collapse mode, as found in report mode.
    pub text: String,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Whether any line was collapsed (always false in report mode).
    pub changed: bool,
    /// Full edited file text, present only when `changed` in collapse mode.
    pub edited_text: Option<String>,
    pub changes: Vec<ChangeRecord>,
    /// 1-based numbers of lines skipped for exceeding the token cap.
    pub skipped_lines: Vec<u32>,
    /// 1-based numbers of lines where collapsing stopped early because a
    /// detected run could not be located in the line text.
    pub stalled_lines: Vec<u32>,
}

/// Process one file: read it fully, run detection over every line
/// independently, and reassemble in original order.
///
/// Lines are split preserving their terminators so untouched content
/// round-trips byte for byte. Errors (unreadable file, non-UTF-8 content)
/// propagate to the caller, which treats them as skippable.
pub fn process_file(path: &Path, config: &CollapseConfig, mode: Mode) -> Result<FileOutcome> {
    let content = fs::read_to_string(path)?;

    let mut changed = false;
    let mut changes = Vec::new();
    let mut skipped_lines = Vec::new();
    let mut stalled_lines = Vec::new();
    let mut edited = String::with_capacity(content.len());

    for (idx, raw) in split_keep_terminator(&content).enumerate() {
        let line_number = (idx + 1) as u32;
        let (body, terminator) = split_terminator(raw);

        match mode {
            Mode::Report => {
                let tokens = tokenize(body);
                if tokens.len() > config.max_line_tokens {
                    skipped_lines.push(line_number);
                } else if let Some(run) = find_first_repeat(&tokens, config.min_dups) {
                    let phrase: Vec<&str> = tokens[run.start..run.start + run.phrase_len]
                        .iter()
                        .map(|t| t.text)
                        .collect();
                    let phrase = phrase.join(" ");
                    let start = body.find(&phrase).unwrap_or(tokens[run.start].start);
                    changes.push(ChangeRecord {
                        file: path.to_path_buf(),
                        line_number,
                        column: body[..start].chars().count() + 1,
                        phrase_chars: phrase.chars().count(),
                        count: run.count,
                        text: body.trim_end().to_string(),
                    });
                }
            }
            Mode::Collapse => {
                let outcome = collapse_line(body, config);
                if outcome.skipped {
                    skipped_lines.push(line_number);
                }
                if outcome.stalled {
                    stalled_lines.push(line_number);
                }
                for edit in &outcome.edits {
                    changes.push(ChangeRecord {
                        file: path.to_path_buf(),
                        line_number,
                        column: edit.column,
                        phrase_chars: edit.phrase.chars().count(),
                        count: edit.run.count,
                        text: edit.text_after.trim_end().to_string(),
                    });
                }
                if outcome.changed() {
                    changed = true;
                }
                edited.push_str(&outcome.text);
                edited.push_str(terminator);
            }
        }
    }

    Ok(FileOutcome {
        changed,
        edited_text: (changed && mode == Mode::Collapse).then_some(edited),
        changes,
        skipped_lines,
        stalled_lines,
    })
}

/// Path of the edited sibling for `path`: `<stem>_edit<ext>`, next to the
/// original. The original is never overwritten.
#[must_use]
pub fn edit_sibling_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("edited");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_edit.{ext}"),
        None => format!("{stem}_edit"),
    };
    path.with_file_name(name)
}

/// Write the edited text to the `_edit` sibling atomically (temp file, then
/// rename) so an interrupted run never leaves a half-written sibling.
pub fn write_edit_sibling(path: &Path, edited_text: &str) -> Result<PathBuf> {
    let out = edit_sibling_path(path);
    let tmp = out.with_extension("tmp");
    fs::write(&tmp, edited_text)?;
    fs::rename(&tmp, &out)?;
    Ok(out)
}

/// Split into lines keeping each line's terminator attached, so that the
/// concatenation of all pieces is the original text.
fn split_keep_terminator(content: &str) -> impl Iterator<Item = &str> {
    content.split_inclusive('\n')
}

/// Separate a line's body from its terminator (`\n` or `\r\n`).
fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}
