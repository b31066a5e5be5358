use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// clang colors its dumps when stdout is a terminal; the escapes survive a
/// pipe into a file and would otherwise corrupt depth computation.
fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern is valid")
    })
}

/// Strip ANSI escape sequences from a raw dump line.
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    ansi_pattern().replace_all(line, "")
}
