//! Core data models for references, upstream payloads and localisation.

mod author;
mod locale;
mod reference;
mod work;

pub use author::{
    format_display, format_inline, parse_authors, serialize_authors, Author, AuthorsField,
    MAX_DISPLAY_AUTHORS,
};
pub use locale::{Labels, Locale};
pub use reference::{
    BookChapter, Journal, Proceeding, Reference, ReferenceCore, ReferenceKind, Year,
};
pub use work::{BookRecord, DateParts, Entities, Work, WorkAuthor, WorkType, WorksPage};
