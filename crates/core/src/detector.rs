use crate::tokenizer::Token;
use crate::types::RepeatRun;

/// Count consecutive stride-aligned occurrences of `tokens[i..i + len]`,
/// including the initial one. Stops at the first non-match or where a full
/// stride no longer fits.
fn run_length(tokens: &[Token<'_>], i: usize, len: usize) -> usize {
    let phrase = &tokens[i..i + len];
    let mut count = 1;
    let mut j = i + len;
    while j + len <= tokens.len() {
        let matches = tokens[j..j + len]
            .iter()
            .zip(phrase)
            .all(|(a, b)| a.text == b.text);
        if !matches {
            break;
        }
        count += 1;
        j += len;
    }
    count
}

/// Character length of the phrase's canonical text (tokens joined by one
/// space). Used for dominance tie-breaking, so it must count characters the
/// way a column count would, not bytes.
fn phrase_char_len(tokens: &[Token<'_>], run: &RepeatRun) -> usize {
    let phrase = &tokens[run.start..run.start + run.phrase_len];
    let chars: usize = phrase.iter().map(|t| t.text.chars().count()).sum();
    chars + run.phrase_len.saturating_sub(1)
}

fn scan<F>(tokens: &[Token<'_>], min_dups: usize, mut visit: F)
where
    F: FnMut(RepeatRun) -> bool,
{
    let n = tokens.len();
    for len in 1..=n / 2 {
        for i in 0..n - len {
            let count = run_length(tokens, i, len);
            if count >= min_dups {
                let run = RepeatRun {
                    start: i,
                    phrase_len: len,
                    count,
                    end: i + len * count,
                };
                if !visit(run) {
                    return;
                }
            }
        }
    }
}

/// Find the first qualifying repeat run in scan order: shortest phrase
/// length first, then earliest start. This is the reporting policy; it
/// answers "does this line stutter" cheaply without ranking candidates.
#[must_use]
pub fn find_first_repeat(tokens: &[Token<'_>], min_dups: usize) -> Option<RepeatRun> {
    let mut found = None;
    scan(tokens, min_dups, |run| {
        found = Some(run);
        false
    });
    found
}

/// Find the dominant qualifying repeat run. Preference order:
/// higher repeat count, then longer phrase character length (canonical
/// single-space text), then later end position in the line. This is the
/// collapse policy; taking the dominant run first keeps the fixpoint
/// iteration short on badly stuttered lines.
#[must_use]
pub fn find_dominant_repeat(tokens: &[Token<'_>], min_dups: usize) -> Option<RepeatRun> {
    let mut best: Option<(usize, usize, usize, RepeatRun)> = None;
    scan(tokens, min_dups, |run| {
        let key = (run.count, phrase_char_len(tokens, &run), run.end);
        let better = match &best {
            None => true,
            Some((count, chars, end, _)) => key > (*count, *chars, *end),
        };
        if better {
            best = Some((key.0, key.1, key.2, run));
        }
        true
    });
    best.map(|(_, _, _, run)| run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_repeat_on_clean_line() {
        let tokens = tokenize("x y x z x y");
        assert_eq!(find_first_repeat(&tokens, 3), None);
        assert_eq!(find_dominant_repeat(&tokens, 3), None);
    }

    #[test]
    fn single_word_run() {
        let tokens = tokenize("a a a a");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        assert_eq!(
            run,
            RepeatRun {
                start: 0,
                phrase_len: 1,
                count: 4,
                end: 4
            }
        );
    }

    #[test]
    fn three_word_phrase_run() {
        let tokens = tokenize("the cat sat the cat sat the cat sat on the mat");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        assert_eq!(
            run,
            RepeatRun {
                start: 0,
                phrase_len: 3,
                count: 3,
                end: 9
            }
        );
    }

    #[test]
    fn below_threshold_is_ignored() {
        let tokens = tokenize("go go stop");
        assert_eq!(find_dominant_repeat(&tokens, 3), None);
        assert!(find_dominant_repeat(&tokens, 2).is_some());
    }

    #[test]
    fn first_policy_prefers_shortest_phrase() {
        // "a b a b a b" stutters at L=1? no; L=2 from i=0 with count 3.
        // But "c c c a b a b a b" has an L=1 run that scan order hits first.
        let tokens = tokenize("c c c a b a b a b");
        let run = find_first_repeat(&tokens, 3).unwrap();
        assert_eq!(run.phrase_len, 1);
        assert_eq!(run.start, 0);
    }

    #[test]
    fn dominant_prefers_higher_count() {
        // L=1 "c" repeats 4 times; L=2 "a b" repeats 3 times.
        let tokens = tokenize("c c c c a b a b a b");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        assert_eq!((run.phrase_len, run.count), (1, 4));
    }

    #[test]
    fn dominant_ties_on_count_prefer_longer_phrase_text() {
        // Both runs have count 3; "xy" (2 chars) vs "a b" (3 chars joined).
        let tokens = tokenize("xy xy xy a b a b a b");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        assert_eq!((run.start, run.phrase_len), (3, 2));
    }

    #[test]
    fn dominant_ties_on_length_prefer_later_end() {
        // Two single-char runs of count 3, equal phrase text length.
        let tokens = tokenize("a a a m b b b");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        assert_eq!(run.start, 4);
        assert_eq!(run.end, 7);
    }

    #[test]
    fn run_stops_at_first_mismatch() {
        let tokens = tokenize("a a a b a");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        assert_eq!(run.count, 3);
        assert_eq!(run.end, 3);
    }

    #[test]
    fn phrase_char_length_counts_chars_not_bytes() {
        // "rɨbo" is 4 chars but 5 bytes; it must outrank a 4-char ASCII
        // phrase only on genuine character length, and tie otherwise.
        let tokens = tokenize("rɨbo rɨbo rɨbo abcd abcd abcd");
        let run = find_dominant_repeat(&tokens, 3).unwrap();
        // Equal char length: later end wins.
        assert_eq!(run.start, 3);
    }
}
