//! Text normalization helpers shared by the resolver and the builders.

use std::sync::LazyLock;

use regex::Regex;
use strsim::normalized_levenshtein;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Connectives kept lowercase by [`title_case`] unless they open the text.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on",
    "or", "the", "to", "via", "with", // English
    "dan", "di", "ke", "dari", "yang", "untuk", "pada", "dalam", "atau", // Indonesian
];

/// Clean up a user query before it is sent to the works index.
///
/// Newlines become spaces, colons are removed, whitespace runs collapse to a
/// single space and the result is trimmed.
pub fn normalize_query(text: &str) -> String {
    let without_colons = text.replace(':', "");
    WHITESPACE_RUN
        .replace_all(&without_colons, " ")
        .trim()
        .to_string()
}

/// Symmetric similarity score in `[0, 100]`.
///
/// Both sides are whitespace-normalized and lowercased before comparing, so the
/// score only reflects the characters a reader would notice.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = WHITESPACE_RUN.replace_all(a.trim(), " ").to_lowercase();
    let b = WHITESPACE_RUN.replace_all(b.trim(), " ").to_lowercase();
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    normalized_levenshtein(&a, &b) * 100.0
}

/// Title-case a name or title.
pub fn title_case(text: &str) -> String {
    WHITESPACE_RUN
        .split(text.trim())
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| title_case_word(word, i == 0))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str, first: bool) -> String {
    let lower = word.to_lowercase();
    if !first && SMALL_WORDS.contains(&lower.as_str()) {
        return lower;
    }

    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    let has_upper = letters.iter().any(|c| c.is_uppercase());
    let has_lower = letters.iter().any(|c| c.is_lowercase());

    // McGraw, iPhone, J. Widg.
    if has_upper && has_lower {
        return capitalize_first(word);
    }
    // IEEE, ACM, USA
    if has_upper && letters.len() <= 4 {
        return word.to_string();
    }

    capitalize_first(&lower)
}

fn capitalize_first(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for c in word.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Reduce every given name to its initial: `"John Ronald"` becomes `"J. R."`.
pub fn initials(given_names: &str) -> String {
    given_names
        .split_whitespace()
        .filter_map(|name| name.chars().find(|c| c.is_alphanumeric()))
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect::<Vec<_>>()
        .join(" ")
}
