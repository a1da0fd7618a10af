//! Builders that map a works-index match onto a typed reference.
//!
//! Book chapters and proceedings run a two-stage enrichment: ISBN metadata
//! (with a city to country lookup), then entity extraction over the book's
//! author and title text. Every enrichment failure degrades to missing fields.

use crate::models::{
    AuthorsField, BookChapter, BookRecord, Journal, Labels, Proceeding, ReferenceCore, Work,
};
use crate::resolver::EntityExtractor;
use crate::sources::SourceLookup;
use crate::utils::title_case;

/// Collaborators and labels shared by the builders of one resolution
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub lookup: &'a SourceLookup,
    pub extractor: &'a EntityExtractor,
    pub labels: &'static Labels,
}

/// Pick the display name from a container-title list.
///
/// Two or more entries are a full name plus its abbreviation: the second one
/// wins only when the first is strictly longer.
pub fn resolve_journal_name(names: &[String], labels: &Labels) -> String {
    let chosen = match names {
        [] => return labels.unknown_journal.to_string(),
        [only] => only,
        [first, second, ..] => {
            if first.chars().count() > second.chars().count() {
                second
            } else {
                first
            }
        }
    };
    title_case(chosen)
}

/// Keep only the characters a city name may contain.
pub fn filter_city(city: &str) -> String {
    city.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn build_journal(work: &Work, labels: &Labels) -> Journal {
    Journal {
        core: core_from(work, labels),
        journal: resolve_journal_name(&work.container_title, labels),
        volume: present(&work.volume),
        issue: present(&work.issue),
        pages: present(&work.page),
        doi: present(&work.doi),
    }
}

pub async fn build_book_chapter(work: &Work, ctx: &BuildContext<'_>) -> BookChapter {
    let mut chapter = BookChapter {
        core: core_from(work, ctx.labels),
        pages: present(&work.page),
        ..Default::default()
    };

    match lookup_book(work, ctx).await {
        Some(book) => {
            chapter.book_title = non_blank(&book.title).map(|t| title_case(&t));
            chapter.publisher = non_blank(&book.publisher);
            chapter.pub_city = first_city_token(&book.city);
            chapter.pub_country = lookup_country(chapter.pub_city.as_deref(), ctx).await;
            chapter.editors = ctx.extractor.extract(&entity_text(&book)).await.persons;
        }
        None => {
            chapter.book_title = work.first_container_title().map(title_case);
            chapter.publisher = present(&work.publisher);
        }
    }

    chapter
}

pub async fn build_proceeding(work: &Work, ctx: &BuildContext<'_>) -> Proceeding {
    let mut proc = Proceeding {
        core: core_from(work, ctx.labels),
        proc_name: work.first_container_title().map(title_case),
        pages: None,
        ..Default::default()
    };

    match lookup_book(work, ctx).await {
        Some(book) => {
            if proc.proc_name.is_none() {
                proc.proc_name = non_blank(&book.title).map(|t| title_case(&t));
            }
            proc.publisher = non_blank(&book.publisher);
            proc.pub_city = first_city_token(&book.city)
                .map(|c| filter_city(&c))
                .filter(|c| !c.is_empty());
            proc.pub_country = lookup_country(proc.pub_city.as_deref(), ctx).await;

            let entities = ctx.extractor.extract(&entity_text(&book)).await;
            proc.editors = entities.persons;
            proc.con_date = entities.dates.into_iter().next();
            proc.con_city = entities.locations.into_iter().next();
        }
        None => {
            proc.publisher = present(&work.publisher);
        }
    }

    proc
}

fn core_from(work: &Work, labels: &Labels) -> ReferenceCore {
    ReferenceCore {
        authors: AuthorsField::Parsed(work.authors()),
        year: work.year(),
        title: work
            .first_title()
            .map(str::to_string)
            .unwrap_or_else(|| labels.unknown_title.to_string()),
    }
}

async fn lookup_book(work: &Work, ctx: &BuildContext<'_>) -> Option<BookRecord> {
    let Some(isbn) = work.first_isbn() else {
        tracing::warn!(
            "No ISBN on '{}', skipping book enrichment",
            work.first_title().unwrap_or_default()
        );
        return None;
    };

    match ctx.lookup.search_by_isbn(isbn).await {
        Ok(book) => Some(book),
        Err(e) => {
            tracing::warn!("Book enrichment for ISBN {} failed: {}", isbn, e);
            None
        }
    }
}

async fn lookup_country(city: Option<&str>, ctx: &BuildContext<'_>) -> Option<String> {
    let country = ctx.lookup.search_city(city?).await;
    non_blank(&country)
}

/// Editors and venue details hide in either the author or the title field.
fn entity_text(book: &BookRecord) -> String {
    format!("{} {}", book.author, book.title).trim().to_string()
}

fn first_city_token(city: &str) -> Option<String> {
    city.split(',').next().and_then(non_blank)
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_blank)
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
