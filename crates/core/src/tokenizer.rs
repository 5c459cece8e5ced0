/// A whitespace-delimited token with its byte span in the source line.
///
/// Tokens borrow from the line they were produced from; offsets are byte
/// offsets usable for slicing the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split a line into whitespace-delimited tokens.
///
/// Splits on runs of Unicode whitespace and discards the whitespace itself.
/// Never yields an empty token; an empty or all-whitespace line yields an
/// empty vec. No punctuation stripping or case folding is applied.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    text: &line[s..idx],
                    start: s,
                    end: idx,
                });
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            text: &line[s..],
            start: s,
            end: line.len(),
        });
    }

    tokens
}
