//! ISBN detection in free text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sources::SourceError;

/// Digit groups that may form an ISBN-10 or ISBN-13 once separators are removed.
static ISBN_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:97[89][\s-]?)?\d{1,5}[\s-]?\d{1,7}[\s-]?\d{1,7}[\s-]?[\dX]\b")
        .expect("valid ISBN regex")
});

/// A checksum-valid ISBN, stored without separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Isbn {
    /// Digits as found in the text, separators removed (10 or 13 chars)
    pub digits: String,
}

impl Isbn {
    /// Parse a single ISBN, tolerating hyphens and spaces.
    pub fn parse(input: &str) -> Option<Self> {
        let stripped: String = input
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .collect::<String>()
            .to_uppercase();

        let valid = match stripped.len() {
            10 => check_isbn10(&stripped),
            13 => check_isbn13(&stripped),
            _ => false,
        };
        valid.then_some(Self { digits: stripped })
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.digits)
    }
}

fn check_isbn10(s: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in s.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            c => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += (10 - i as u32) * value;
    }
    sum % 11 == 0
}

fn check_isbn13(s: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in s.chars().enumerate() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { d } else { d * 3 };
    }
    (s.starts_with("978") || s.starts_with("979")) && sum % 10 == 0
}

/// Pull the first checksum-valid ISBN out of arbitrary text.
///
/// Fails with [`SourceError::NotFound`] when the text holds no valid ISBN.
pub fn extract_isbn(text: &str) -> Result<Isbn, SourceError> {
    let mut start = 0;
    while let Some(candidate) = ISBN_CANDIDATE.find_at(text, start) {
        if let Some(isbn) = Isbn::parse(candidate.as_str()) {
            return Ok(isbn);
        }
        // A leading number can swallow the first group of a real ISBN, so
        // candidates overlap: rescan from the next character.
        start = candidate.start()
            + candidate
                .as_str()
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    Err(SourceError::NotFound(format!("no ISBN in '{}'", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_isbn13() {
        let isbn = Isbn::parse("978-0-306-40615-7").unwrap();
        assert_eq!(isbn.as_str(), "9780306406157");
        assert!(Isbn::parse("9780306406158").is_none());
    }

    #[test]
    fn test_parse_isbn10() {
        assert_eq!(Isbn::parse("0306406152").unwrap().as_str(), "0306406152");
        assert_eq!(Isbn::parse("007462542x").unwrap().as_str(), "007462542X");
        assert!(Isbn::parse("0306406153").is_none());
    }

    #[test]
    fn test_extract_isbn_from_text() {
        let isbn = extract_isbn("Springer, ISBN 978-3-16-148410-0 (print)").unwrap();
        assert_eq!(isbn.as_str(), "9783161484100");

        let isbn = extract_isbn("0306406152").unwrap();
        assert_eq!(isbn.as_str(), "0306406152");
    }

    #[test]
    fn test_extract_isbn_after_leading_number() {
        let isbn = extract_isbn("Springer, 2012 978-3-16-148410-0").unwrap();
        assert_eq!(isbn.as_str(), "9783161484100");

        let isbn = extract_isbn("pp 12 0-306-40615-2").unwrap();
        assert_eq!(isbn.as_str(), "0306406152");
    }

    #[test]
    fn test_extract_isbn_not_found() {
        let err = extract_isbn("no identifiers here, 2020").unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
