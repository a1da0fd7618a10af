//! Citation formatting for resolved references.
//!
//! Entries use an author-year layout with the fixed text taken from the
//! locale's [`Labels`].

use crate::models::{BookChapter, Journal, Labels, Locale, Proceeding, Reference};

/// Format the in-text citation, e.g. `"(Smith et al. 2020)"`
pub fn format_inline_citation(reference: &Reference, locale: Locale) -> String {
    let labels = locale.labels();
    format!(
        "({} {})",
        reference.format_authors_inline(labels),
        reference.year().display(labels)
    )
}

/// Format the full reference-list entry for a reference
pub fn format_citation(reference: &Reference, locale: Locale) -> String {
    let labels = locale.labels();
    let mut parts = vec![
        sentence(&reference.format_authors(labels)),
        sentence(&reference.year().display(labels)),
        sentence(reference.title()),
    ];

    match reference {
        Reference::Journal(journal) => parts.extend(journal_tail(journal, labels)),
        Reference::BookChapter(chapter) => parts.extend(chapter_tail(chapter, labels)),
        Reference::Proceeding(proc) => parts.extend(proceeding_tail(proc, labels)),
    }

    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

fn journal_tail(journal: &Journal, labels: &Labels) -> Vec<String> {
    let volume = non_empty(&journal.volume).unwrap_or(labels.unknown_volume);
    let issue = non_empty(&journal.issue)
        .map(|i| format!("({})", i))
        .unwrap_or_default();
    let pages = non_empty(&journal.pages).unwrap_or(labels.unknown_pages);

    let mut tail = vec![sentence(&format!(
        "{} {}{}: {}",
        journal.journal, volume, issue, pages
    ))];
    if let Some(doi) = non_empty(&journal.doi) {
        tail.push(format!("doi:{}", doi));
    }
    tail
}

fn chapter_tail(chapter: &BookChapter, labels: &Labels) -> Vec<String> {
    let container = container_part(
        &chapter.editors,
        chapter.book_title.as_deref().unwrap_or(labels.unknown_title),
        labels,
    );
    let pages = non_empty(&chapter.pages).unwrap_or(labels.unknown_pages);

    vec![
        sentence(&format!("{} {}", labels.in_, container)),
        publisher_part(&chapter.pub_city, &chapter.publisher),
        sentence(&format!("{} {}", labels.pages_prefix, pages)),
    ]
}

fn proceeding_tail(proc: &Proceeding, labels: &Labels) -> Vec<String> {
    let mut venue = vec![proc
        .proc_name
        .as_deref()
        .unwrap_or(labels.unknown_title)
        .to_string()];
    venue.extend(
        [&proc.con_date, &proc.con_city]
            .into_iter()
            .filter_map(non_empty)
            .map(str::to_string),
    );
    let container = container_part(&proc.editors, &venue.join("; "), labels);

    vec![
        sentence(&format!("{} {}", labels.in_, container)),
        publisher_part(&proc.pub_city, &proc.publisher),
    ]
}

/// `"Doe J, Roe R, editors. Title"` or just the title when there are no editors
fn container_part(editors: &[String], title: &str, labels: &Labels) -> String {
    if editors.is_empty() {
        return title.to_string();
    }
    let label = if editors.len() == 1 {
        labels.editor
    } else {
        labels.editors
    };
    format!("{}, {}. {}", editors.join(", "), label, title)
}

/// `"City: Publisher."`, `"Publisher."` or nothing
fn publisher_part(city: &Option<String>, publisher: &Option<String>) -> String {
    match (non_empty(city), non_empty(publisher)) {
        (Some(city), Some(publisher)) => sentence(&format!("{}: {}", city, publisher)),
        (None, Some(publisher)) => sentence(publisher),
        (Some(city), None) => sentence(city),
        (None, None) => String::new(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn sentence(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() || text.ends_with(['.', '?', '!']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}
