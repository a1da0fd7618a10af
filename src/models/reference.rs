//! Typed reference records produced by the resolver.

use serde::{Deserialize, Serialize};

use crate::models::author::{format_display, format_inline, Author, AuthorsField};
use crate::models::locale::Labels;

/// The kind of record a query resolved into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Journal,
    BookChapter,
    Proceeding,
}

impl ReferenceKind {
    /// Returns the display name of the kind
    pub fn name(&self) -> &str {
        match self {
            ReferenceKind::Journal => "Journal article",
            ReferenceKind::BookChapter => "Book chapter",
            ReferenceKind::Proceeding => "Proceedings article",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Publication year, or the fact that no source reported one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Known(i32),
    #[default]
    Unknown,
}

impl Year {
    pub fn display(&self, labels: &Labels) -> String {
        match self {
            Year::Known(year) => year.to_string(),
            Year::Unknown => labels.unknown_year.to_string(),
        }
    }
}

/// Fields every reference kind carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCore {
    pub authors: AuthorsField,
    pub year: Year,
    pub title: String,
}

/// A journal article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(flatten)]
    pub core: ReferenceCore,

    /// Display name, abbreviated when the source offers an abbreviation
    pub journal: String,

    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
}

/// A chapter in an edited book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookChapter {
    #[serde(flatten)]
    pub core: ReferenceCore,

    pub pages: Option<String>,
    pub book_title: Option<String>,

    #[serde(rename = "pub")]
    pub publisher: Option<String>,

    pub editors: Vec<String>,
    pub pub_city: Option<String>,
    pub pub_country: Option<String>,
}

/// An article in conference proceedings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proceeding {
    #[serde(flatten)]
    pub core: ReferenceCore,

    pub proc_name: Option<String>,

    /// No source reports page ranges for proceedings
    pub pages: Option<String>,

    #[serde(rename = "pub")]
    pub publisher: Option<String>,

    pub pub_city: Option<String>,
    pub pub_country: Option<String>,
    pub editors: Vec<String>,
    pub con_name: Option<String>,
    pub con_date: Option<String>,
    pub con_city: Option<String>,
    pub con_country: Option<String>,
}

/// A fully built reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reference {
    Journal(Journal),
    BookChapter(BookChapter),
    Proceeding(Proceeding),
}

impl Reference {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Reference::Journal(_) => ReferenceKind::Journal,
            Reference::BookChapter(_) => ReferenceKind::BookChapter,
            Reference::Proceeding(_) => ReferenceKind::Proceeding,
        }
    }

    pub fn core(&self) -> &ReferenceCore {
        match self {
            Reference::Journal(r) => &r.core,
            Reference::BookChapter(r) => &r.core,
            Reference::Proceeding(r) => &r.core,
        }
    }

    pub fn title(&self) -> &str {
        &self.core().title
    }

    pub fn year(&self) -> Year {
        self.core().year
    }

    /// Structured author list, parsing a raw list if needed
    pub fn authors(&self) -> Vec<Author> {
        self.core().authors.make_authors()
    }

    /// Reference-list author string, e.g. `"Smith J., Doe A."`
    pub fn format_authors(&self, labels: &Labels) -> String {
        format_display(&self.authors(), labels)
    }

    /// In-text author string, e.g. `"Smith et al."`
    pub fn format_authors_inline(&self, labels: &Labels) -> String {
        format_inline(&self.authors(), labels)
    }

    pub fn as_journal(&self) -> Option<&Journal> {
        match self {
            Reference::Journal(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_book_chapter(&self) -> Option<&BookChapter> {
        match self {
            Reference::BookChapter(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_proceeding(&self) -> Option<&Proceeding> {
        match self {
            Reference::Proceeding(r) => Some(r),
            _ => None,
        }
    }
}
