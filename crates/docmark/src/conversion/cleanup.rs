//! Removal of boilerplate from generated Markdown

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal strings removed or rewritten (case-insensitive), applied in order
const LITERAL_RULES: &[(&str, &str)] = &[
    ("RESTRICTED, NON-SENSITIVE", ""),
    ("RESTRICTED NON-SENSITIVE", ""),
    ("RESTRICTED,NON-SENSITIVE", ""),
    ("RESTRICTED - NON-SENSITIVE", ""),
    ("RESTRICTED-NON-SENSITIVE", ""),
];

/// Regex rules applied after the literal ones (case-insensitive)
const PATTERN_RULES: &[(&str, &str)] = &[
    (r"Page \d+ of \d+", ""),
    (r"Copyright.*\d{4}", ""),
];

/// Header markers demoted so they do not render as headings
const REWRITE_RULES: &[(&str, &str)] = &[("# File:", "File:"), ("# Path:", "Path:")];

fn literal(rule: &(&str, &'static str)) -> (String, &'static str) {
    (format!("(?i){}", regex::escape(rule.0)), rule.1)
}

static CONTENT_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    LITERAL_RULES
        .iter()
        .map(literal)
        .chain(
            PATTERN_RULES
                .iter()
                .map(|(find, replace)| (format!("(?i){}", find), *replace)),
        )
        .chain(REWRITE_RULES.iter().map(literal))
        .map(|(pattern, replace)| (Regex::new(&pattern).expect("Invalid cleanup rule"), replace))
        .collect()
});

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));
static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("Invalid regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").expect("Invalid regex"));

/// Strip classification banners, page counters and copyright lines, then
/// normalize whitespace
pub fn clean_markdown_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let mut cleaned = content.to_string();
    for (re, replacement) in CONTENT_RULES.iter() {
        cleaned = re.replace_all(&cleaned, *replacement).into_owned();
    }

    let cleaned = EXCESS_NEWLINES.replace_all(&cleaned, "\n\n");
    let cleaned = INLINE_WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = BLANK_LINES.replace_all(&cleaned, "");

    cleaned.trim().to_string()
}
