use regex::Regex;
use std::sync::OnceLock;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"(?-u:\b)[a-z]+(?-u:\b)").expect("word pattern is valid"))
}

/// Lowercases `text` and yields its purely alphabetic words longer than `min_len` characters.
pub fn words_longer_than(text: &str, min_len: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| w.len() > min_len)
        .map(str::to_owned)
        .collect()
}

/// First `max_chars` characters of `s`, with `...` appended only when something was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
