use serde::{Deserialize, Serialize};

/// A run of consecutive, stride-aligned occurrences of one phrase.
///
/// All indices are token indices into the line's token sequence. The phrase
/// is `tokens[start..start + phrase_len]`; it occurs `count` times back to
/// back, ending just before token `end = start + phrase_len * count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatRun {
    pub start: usize,
    pub phrase_len: usize,
    pub count: usize,
    pub end: usize,
}

/// One collapse applied to a line, recorded for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    /// The run that was collapsed, in token indices of the line as it was
    /// before this edit.
    pub run: RepeatRun,

    /// Canonical phrase text (tokens joined by one space).
    pub phrase: String,

    /// 1-based character column of the run's first occurrence.
    pub column: usize,

    /// Line text after this edit was applied.
    pub text_after: String,
}

/// Result of collapsing one line to fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// Final line text; equal to the input when nothing qualified.
    pub text: String,

    /// Edits in application order; empty when the line was clean.
    pub edits: Vec<LineEdit>,

    /// True when the line exceeded the token cap and was not scanned.
    pub skipped: bool,

    /// True when collapsing stopped early because a detected run could not
    /// be located in the line text. The line may still carry qualifying
    /// repeats; callers should surface this rather than treat the line as
    /// clean.
    pub stalled: bool,
}

impl LineOutcome {
    pub(crate) fn skipped(text: &str) -> Self {
        Self {
            text: text.to_string(),
            edits: Vec::new(),
            skipped: true,
            stalled: false,
        }
    }

    /// Whether any collapse was applied.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.edits.is_empty()
    }
}
