//! Ghost-text autocompletion.
//!
//! Given the in-progress input line, propose a single inline suffix for
//! either the command name (while the first word is being typed) or the
//! last path-like token (afterwards). The suggestion is drawn from the
//! sorted command names or the sorted names of the cached current
//! directory listing; an exact match yields no suggestion.

/// Byte offset and text of the last (possibly unterminated-quoted) token.
///
/// Token boundary by quote-depth parity: if the line contains an odd
/// number of `'` or `"`, the token starts just after the last such quote;
/// otherwise just after the last space.
fn last_token(input: &str) -> (usize, &str) {
    let singles = input.matches('\'').count();
    let doubles = input.matches('"').count();

    let start = if singles % 2 == 1 {
        input.rfind('\'').map(|i| i + 1).unwrap_or(0)
    } else if doubles % 2 == 1 {
        input.rfind('"').map(|i| i + 1).unwrap_or(0)
    } else {
        input.rfind(' ').map(|i| i + 1).unwrap_or(0)
    };

    (start, &input[start..])
}

fn suffix_of<'a>(candidates: &[&'a str], partial: &str) -> Option<&'a str> {
    candidates
        .iter()
        .find(|name| name.starts_with(partial) && name.len() > partial.len())
        .map(|name| &name[partial.len()..])
}

/// Suffix to display as ghost text after the current input; empty when
/// there is nothing to suggest.
///
/// `commands` and `entries` must be sorted so the first prefix match is
/// the suggestion.
pub fn ghost_text(input: &str, commands: &[&str], entries: &[&str]) -> String {
    if input.is_empty() {
        return String::new();
    }

    // Still typing the command name.
    if !input.contains(' ') {
        return suffix_of(commands, input).unwrap_or("").to_string();
    }

    if input.ends_with(' ') {
        // A fresh argument: suggest the first entry outright.
        return entries.first().copied().unwrap_or("").to_string();
    }

    let (_, token) = last_token(input);
    suffix_of(entries, token).unwrap_or("").to_string()
}

/// Splice an accepted suggestion onto the input line.
///
/// If the combined token contains whitespace and was not already quoted,
/// it is wrapped in double quotes.
pub fn apply_suggestion(input: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return input.to_string();
    }

    let (start, token) = last_token(input);
    let already_quoted = start > 0
        && matches!(input.as_bytes()[start - 1], b'\'' | b'"');

    let combined = format!("{}{}", token, suffix);
    if !already_quoted && combined.chars().any(char::is_whitespace) {
        format!("{}\"{}\"", &input[..start], combined)
    } else {
        format!("{}{}", &input[..start], combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmds() -> Vec<&'static str> {
        crate::shell::registry::CommandId::completion_names()
    }

    #[test]
    fn test_command_name_completion() {
        assert_eq!(ghost_text("he", &cmds(), &[]), "lp");
        assert_eq!(ghost_text("dow", &cmds(), &[]), "nload");
    }

    #[test]
    fn test_command_exact_match_yields_nothing() {
        assert_eq!(ghost_text("help", &cmds(), &[]), "");
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(ghost_text("", &cmds(), &["alpha"]), "");
    }

    #[test]
    fn test_path_completion_from_listing() {
        let entries = ["alpha.txt", "beta", "budget 2024.xlsx"];
        assert_eq!(ghost_text("rm al", &cmds(), &entries), "pha.txt");
        assert_eq!(ghost_text("rm be", &cmds(), &entries), "ta");
    }

    #[test]
    fn test_path_exact_match_yields_nothing() {
        let entries = ["beta"];
        assert_eq!(ghost_text("rm beta", &cmds(), &entries), "");
    }

    #[test]
    fn test_empty_token_suggests_first_entry() {
        let entries = ["alpha.txt", "beta"];
        assert_eq!(ghost_text("rm ", &cmds(), &entries), "alpha.txt");
    }

    #[test]
    fn test_quoted_token_with_space() {
        let entries = ["budget 2024.xlsx"];
        // Odd double-quote count: the token starts after the quote and
        // includes the embedded space.
        assert_eq!(ghost_text("rm \"budget 20", &cmds(), &entries), "24.xlsx");
    }

    #[test]
    fn test_apply_plain_suffix() {
        assert_eq!(apply_suggestion("rm al", "pha.txt"), "rm alpha.txt");
    }

    #[test]
    fn test_apply_wraps_whitespace_in_quotes() {
        assert_eq!(
            apply_suggestion("rm budget", " 2024.xlsx"),
            "rm \"budget 2024.xlsx\""
        );
    }

    #[test]
    fn test_apply_inside_open_quote_does_not_rewrap() {
        assert_eq!(
            apply_suggestion("rm \"budget 20", "24.xlsx"),
            "rm \"budget 2024.xlsx"
        );
    }

    #[test]
    fn test_apply_empty_suffix_is_identity() {
        assert_eq!(apply_suggestion("rm beta", ""), "rm beta");
    }
}
