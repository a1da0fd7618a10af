//! Author names and the comma-separated author list codec.

use serde::{Deserialize, Serialize};

use crate::models::locale::Labels;
use crate::utils::initials;

/// Maximum number of authors rendered before the list is cut with "et al."
pub const MAX_DISPLAY_AUTHORS: usize = 10;

/// A single author name, split the way the works index reports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub family: String,

    #[serde(default)]
    pub given: String,
}

impl Author {
    pub fn new(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            given: given.into(),
        }
    }

    /// `"Family I."` as used in reference lists
    pub fn display_name(&self) -> String {
        format!("{} {}", self.family, initials(&self.given))
            .trim()
            .to_string()
    }
}

/// Author list as stored on a reference.
///
/// Lists typed by a person stay [`AuthorsField::Raw`] until they are needed in
/// structured form; lists from the works index arrive [`AuthorsField::Parsed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorsField {
    Raw(String),
    Parsed(Vec<Author>),
}

impl Default for AuthorsField {
    fn default() -> Self {
        AuthorsField::Parsed(Vec::new())
    }
}

impl AuthorsField {
    /// Structured view of the list. Parsed lists are returned unchanged.
    pub fn make_authors(&self) -> Vec<Author> {
        match self {
            AuthorsField::Raw(text) => parse_authors(text),
            AuthorsField::Parsed(authors) => authors.clone(),
        }
    }

    /// Comma-separated view of the list. Raw lists are returned unchanged.
    pub fn unmake_authors(&self) -> String {
        match self {
            AuthorsField::Raw(text) => text.clone(),
            AuthorsField::Parsed(authors) => serialize_authors(authors),
        }
    }

    /// Convert to the structured representation in place of the raw one.
    pub fn into_parsed(self) -> Self {
        match self {
            AuthorsField::Raw(text) => AuthorsField::Parsed(parse_authors(&text)),
            parsed => parsed,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AuthorsField::Raw(text) => text.trim().is_empty(),
            AuthorsField::Parsed(authors) => authors.is_empty(),
        }
    }
}

/// Parse `"John Smith, Ada B. Lovelace"` into structured names.
///
/// The last whitespace-separated token of each entry is the family name; the
/// remaining tokens form the given name. Blank entries are skipped.
pub fn parse_authors(input: &str) -> Vec<Author> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut tokens: Vec<&str> = entry.split_whitespace().collect();
            let family = tokens.pop().unwrap_or_default();
            Author::new(family, tokens.join(" "))
        })
        .collect()
}

/// Inverse of [`parse_authors`]: `"given family"` pairs joined by `", "`.
pub fn serialize_authors(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|a| format!("{} {}", a.given, a.family).trim().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reference-list rendering: `"Smith J., Doe A."`, cut after ten names.
pub fn format_display(authors: &[Author], labels: &Labels) -> String {
    if authors.is_empty() {
        return labels.anonymous.to_string();
    }

    let mut names: Vec<String> = authors
        .iter()
        .take(MAX_DISPLAY_AUTHORS)
        .map(Author::display_name)
        .collect();

    if authors.len() > MAX_DISPLAY_AUTHORS {
        if let Some(last) = names.last_mut() {
            last.push(' ');
            last.push_str(labels.et_al);
        }
    }

    names.join(", ")
}

/// In-text rendering: `"Smith"`, `"Smith and Doe"` or `"Smith et al."`.
pub fn format_inline(authors: &[Author], labels: &Labels) -> String {
    match authors {
        [] => labels.anonymous.to_string(),
        [only] => only.family.clone(),
        [first, second] => format!("{} {} {}", first.family, labels.and, second.family),
        [first, ..] => format!("{} {}", first.family, labels.et_al),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Locale;

    fn authors(names: &[(&str, &str)]) -> Vec<Author> {
        names.iter().map(|(f, g)| Author::new(*f, *g)).collect()
    }

    #[test]
    fn test_parse_authors() {
        let parsed = parse_authors("John Ronald Tolkien, Ada Lovelace ,  Plato");
        assert_eq!(
            parsed,
            authors(&[("Tolkien", "John Ronald"), ("Lovelace", "Ada"), ("Plato", "")])
        );
        assert!(parse_authors("").is_empty());
        assert!(parse_authors(" , ").is_empty());
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let list = authors(&[("Smith", "John"), ("Doe", "Jane"), ("Lovelace", "Ada")]);
        assert_eq!(serialize_authors(&list), "John Smith, Jane Doe, Ada Lovelace");
        assert_eq!(parse_authors(&serialize_authors(&list)), list);
    }

    #[test]
    fn test_make_authors_idempotent() {
        let list = authors(&[("Smith", "John")]);
        let field = AuthorsField::Parsed(list.clone());
        assert_eq!(field.make_authors(), list);
        assert_eq!(AuthorsField::Raw("John Smith".into()).make_authors(), list);
        assert_eq!(
            AuthorsField::Raw("John Smith".into()).into_parsed(),
            AuthorsField::Parsed(list)
        );
    }

    #[test]
    fn test_unmake_authors() {
        let field = AuthorsField::Parsed(authors(&[("Smith", "John"), ("Doe", "")]));
        assert_eq!(field.unmake_authors(), "John Smith, Doe");
        assert_eq!(AuthorsField::Raw("as typed".into()).unmake_authors(), "as typed");
    }

    #[test]
    fn test_format_inline_branches() {
        let labels = Locale::En.labels();
        assert_eq!(format_inline(&[], labels), "[Anonymous]");
        assert_eq!(format_inline(&authors(&[("Smith", "J")]), labels), "Smith");
        assert_eq!(
            format_inline(&authors(&[("Smith", "J"), ("Doe", "A")]), labels),
            "Smith and Doe"
        );
        assert_eq!(
            format_inline(&authors(&[("Smith", "J"), ("Doe", "A"), ("Roe", "R")]), labels),
            "Smith et al."
        );
        assert_eq!(
            format_inline(&authors(&[("Smith", "J"), ("Doe", "A")]), Locale::Id.labels()),
            "Smith dan Doe"
        );
    }

    #[test]
    fn test_format_display() {
        let labels = Locale::En.labels();
        assert_eq!(format_display(&[], labels), "[Anonymous]");
        assert_eq!(
            format_display(&authors(&[("Tolkien", "John Ronald"), ("Plato", "")]), labels),
            "Tolkien J. R., Plato"
        );
    }

    #[test]
    fn test_format_display_truncates_after_ten() {
        let labels = Locale::En.labels();
        let ten: Vec<Author> = (0..10).map(|i| Author::new(format!("F{i}"), "Given")).collect();
        let rendered = format_display(&ten, labels);
        assert!(rendered.ends_with("F9 G."));
        assert!(!rendered.contains("et al."));

        let many: Vec<Author> = (0..12).map(|i| Author::new(format!("F{i}"), "Given")).collect();
        let rendered = format_display(&many, labels);
        assert!(rendered.ends_with("F9 G. et al."));
        assert!(!rendered.contains("F10"));
        assert_eq!(rendered.matches(", ").count(), 9);
    }
}
