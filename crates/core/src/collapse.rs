use crate::config::CollapseConfig;
use crate::detector::find_dominant_repeat;
use crate::tokenizer::tokenize;
use crate::types::{LineEdit, LineOutcome};

/// Byte span of a repeat run located in the raw line text.
struct RunSpan {
    /// Start of the first occurrence.
    start: usize,
    /// End of the first occurrence (everything before this is kept).
    keep_end: usize,
    /// End of the last occurrence (everything from here on is kept).
    run_end: usize,
}

/// Collapse every qualifying repeat run in `line`, iterating until no run
/// with `min_dups` or more occurrences remains.
///
/// Each pass takes the dominant run, keeps its first occurrence verbatim and
/// deletes the rest, then re-tokenizes and scans again. Text outside the
/// deleted spans is preserved byte for byte, including irregular whitespace.
///
/// The run is located in the raw text, not the token array: the token model
/// joins phrases with single spaces, and a line can drift from that model
/// once it has been edited. When the raw text does not realize the detected
/// run, collapsing stops for this line and whatever has been collapsed so
/// far is returned with `stalled` set, so callers can report the line
/// instead of silently treating it as clean. That guard is what bounds the
/// loop; it must stay.
///
/// A line with more than `max_line_tokens` tokens is not scanned at all and
/// comes back unchanged with `skipped` set.
#[must_use]
pub fn collapse_line(line: &str, config: &CollapseConfig) -> LineOutcome {
    if tokenize(line).len() > config.max_line_tokens {
        log::debug!(
            "line exceeds token cap ({} max), skipping detection",
            config.max_line_tokens
        );
        return LineOutcome::skipped(line);
    }

    let mut text = line.to_string();
    let mut edits = Vec::new();
    let mut stalled = false;

    loop {
        let tokens = tokenize(&text);
        let Some(run) = find_dominant_repeat(&tokens, config.min_dups) else {
            break;
        };

        let phrase_tokens: Vec<&str> = tokens[run.start..run.start + run.phrase_len]
            .iter()
            .map(|t| t.text)
            .collect();
        let phrase = phrase_tokens.join(" ");

        let Some(span) = locate_run(&text, &phrase, &phrase_tokens, run.count) else {
            log::debug!("could not locate run for phrase {phrase:?} in line text, stopping");
            stalled = true;
            break;
        };

        let column = text[..span.start].chars().count() + 1;
        let collapsed = format!("{}{}", &text[..span.keep_end], &text[span.run_end..]);

        edits.push(LineEdit {
            run,
            phrase,
            column,
            text_after: collapsed.clone(),
        });
        text = collapsed;
    }

    LineOutcome {
        text,
        edits,
        skipped: false,
        stalled,
    }
}

/// Locate a repeat run in the raw line: the first textual occurrence of the
/// canonical (single-space joined) phrase, followed by `count - 1` further
/// occurrences matched token by token across whatever whitespace separates
/// them. Returns `None` when the text does not realize the run.
fn locate_run(text: &str, phrase: &str, phrase_tokens: &[&str], count: usize) -> Option<RunSpan> {
    let start = text.find(phrase)?;
    let keep_end = start + phrase.len();

    let mut pos = keep_end;
    for _ in 1..count {
        pos = match_occurrence(text, pos, phrase_tokens)?;
    }

    Some(RunSpan {
        start,
        keep_end,
        run_end: pos,
    })
}

/// Match one phrase occurrence starting at `pos`: each token preceded by at
/// least one whitespace character, and the final token ending on a token
/// boundary. Returns the byte offset just past the occurrence.
fn match_occurrence(text: &str, mut pos: usize, phrase_tokens: &[&str]) -> Option<usize> {
    for token in phrase_tokens {
        let rest = &text[pos..];
        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() {
            return None;
        }
        pos += rest.len() - trimmed.len();

        if !text[pos..].starts_with(token) {
            return None;
        }
        pos += token.len();
    }

    match text[pos..].chars().next() {
        Some(c) if !c.is_whitespace() => None,
        _ => Some(pos),
    }
}
