//! Upstream payload models: works-index matches, ISBN records and NER entities.

use serde::{Deserialize, Serialize};

use crate::models::author::Author;
use crate::models::reference::Year;

/// Result type reported by the works index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkType {
    JournalArticle,
    BookChapter,
    ProceedingsArticle,
    Other(String),
}

impl WorkType {
    pub fn from_type(value: &str) -> Self {
        match value.trim() {
            "journal-article" => WorkType::JournalArticle,
            "book-chapter" => WorkType::BookChapter,
            "proceedings-article" => WorkType::ProceedingsArticle,
            other => WorkType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WorkType::JournalArticle => "journal-article",
            WorkType::BookChapter => "book-chapter",
            WorkType::ProceedingsArticle => "proceedings-article",
            WorkType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One page of works-index results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorksPage {
    #[serde(rename = "total-results", default)]
    pub total_results: usize,

    #[serde(default)]
    pub items: Vec<Work>,
}

impl WorksPage {
    pub fn new(items: Vec<Work>) -> Self {
        Self {
            total_results: items.len(),
            items,
        }
    }

    /// Best-ranked candidate, if the index found anything
    pub fn top(&self) -> Option<&Work> {
        if self.total_results == 0 {
            return None;
        }
        self.items.first()
    }
}

/// A single works-index match, as much of it as the builders read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Work {
    #[serde(rename = "type", default)]
    pub work_type: String,

    #[serde(default)]
    pub title: Vec<String>,

    #[serde(default)]
    pub author: Vec<WorkAuthor>,

    pub issued: Option<DateParts>,

    pub volume: Option<String>,

    pub issue: Option<String>,

    pub page: Option<String>,

    #[serde(rename = "DOI")]
    pub doi: Option<String>,

    #[serde(rename = "container-title", default)]
    pub container_title: Vec<String>,

    pub publisher: Option<String>,

    #[serde(rename = "ISBN", default)]
    pub isbn: Vec<String>,

    #[serde(default)]
    pub score: f64,
}

impl Work {
    pub fn kind(&self) -> WorkType {
        WorkType::from_type(&self.work_type)
    }

    /// First title entry, if any non-blank one exists
    pub fn first_title(&self) -> Option<&str> {
        self.title
            .first()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    pub fn first_container_title(&self) -> Option<&str> {
        self.container_title
            .first()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    pub fn first_isbn(&self) -> Option<&str> {
        self.isbn.first().map(String::as_str)
    }

    pub fn year(&self) -> Year {
        self.issued
            .as_ref()
            .and_then(DateParts::year)
            .map(Year::Known)
            .unwrap_or(Year::Unknown)
    }

    pub fn authors(&self) -> Vec<Author> {
        self.author.iter().filter_map(WorkAuthor::to_author).collect()
    }
}

/// Author entry as returned by the works index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkAuthor {
    pub family: Option<String>,
    pub given: Option<String>,
    /// Set instead of family/given for organisations
    pub name: Option<String>,
}

impl WorkAuthor {
    fn to_author(&self) -> Option<Author> {
        let family = self.family.as_deref().or(self.name.as_deref())?.trim();
        if family.is_empty() {
            return None;
        }
        Some(Author::new(family, self.given.as_deref().unwrap_or_default().trim()))
    }
}

/// `{"date-parts": [[2020, 6, 1]]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl DateParts {
    pub fn from_year(year: i32) -> Self {
        Self {
            date_parts: vec![vec![Some(year)]],
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

/// Book metadata returned by the ISBN service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub publisher: String,

    /// Free text; often mixes authors, editors and venue information
    #[serde(default)]
    pub author: String,

    /// Free text such as `"Boston, MA, USA"`
    #[serde(default)]
    pub city: String,
}

/// Named entities recovered from free text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub persons: Vec<String>,
    pub dates: Vec<String>,
    pub locations: Vec<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.dates.is_empty() && self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_decodes_crossref_item() {
        let json = r#"{
            "type": "journal-article",
            "title": ["Widget study"],
            "author": [{"given": "John", "family": "Smith"}, {"name": "Widget Consortium"}],
            "issued": {"date-parts": [[2020, 3]]},
            "volume": "12",
            "page": "1-10",
            "DOI": "10.1000/widget",
            "container-title": ["Journal of Widgets", "J. Widg."],
            "score": 10.5
        }"#;

        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.kind(), WorkType::JournalArticle);
        assert_eq!(work.first_title(), Some("Widget study"));
        assert_eq!(work.year(), Year::Known(2020));
        assert_eq!(
            work.authors(),
            vec![Author::new("Smith", "John"), Author::new("Widget Consortium", "")]
        );
        assert_eq!(work.issue, None);
        assert!(work.isbn.is_empty());
    }

    #[test]
    fn test_work_missing_date_parts() {
        let work: Work = serde_json::from_str(r#"{"issued": {"date-parts": [[null]]}}"#).unwrap();
        assert_eq!(work.year(), Year::Unknown);
        assert_eq!(Work::default().year(), Year::Unknown);
    }

    #[test]
    fn test_work_type_dispatch_names() {
        assert_eq!(WorkType::from_type("book-chapter"), WorkType::BookChapter);
        assert_eq!(
            WorkType::from_type("dataset"),
            WorkType::Other("dataset".to_string())
        );
        assert_eq!(WorkType::ProceedingsArticle.to_string(), "proceedings-article");
    }

    #[test]
    fn test_page_top_requires_results() {
        let page = WorksPage {
            total_results: 0,
            items: vec![Work::default()],
        };
        assert!(page.top().is_none());
        assert!(WorksPage::new(vec![Work::default()]).top().is_some());
    }
}
