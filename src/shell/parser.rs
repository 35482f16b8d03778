//! Command-line tokenizer.
//!
//! Deliberately simpler than a shell grammar: no pipes, redirects,
//! variables or globbing. A token is either a bare run of non-whitespace
//! characters, or a span wrapped in matching single or double quotes (the
//! quotes are stripped, embedded whitespace is kept). Quotes do not nest
//! and no escape sequences are interpreted; a quote character in the
//! middle of a bare token is plain text.
//!
//! An unterminated quote is not an error: the scanner consumes to end of
//! input and the remainder becomes the final token.

/// Split an input line into argv-style tokens.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                } else {
                    buf.push(ch);
                }
            }
            None => {
                if ch.is_whitespace() {
                    if in_token {
                        tokens.push(std::mem::take(&mut buf));
                        in_token = false;
                    }
                } else if (ch == '\'' || ch == '"') && !in_token {
                    quote = Some(ch);
                    in_token = true;
                } else {
                    buf.push(ch);
                    in_token = true;
                }
            }
        }
    }

    if in_token {
        tokens.push(buf);
    }

    tokens
}
