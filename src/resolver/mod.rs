//! Resolve a free-text citation query into a typed reference.
//!
//! Resolution is a sequential chain: works search, disambiguation gate,
//! dispatch on the result type, then the kind-specific builder with its
//! optional enrichment lookups. Only failures of the works search surface
//! to the caller.

mod builders;
mod entities;

pub use builders::{
    build_book_chapter, build_journal, build_proceeding, filter_city, resolve_journal_name,
    BuildContext,
};
pub use entities::EntityExtractor;

use std::sync::Arc;

use crate::config::{Config, MatchingConfig};
use crate::models::{Locale, Reference, WorkType};
use crate::sources::{CoreNlpRecognizer, SourceError, SourceLookup};
use crate::utils::{normalize_query, similarity, HttpClient};

/// Why a query produced no reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    EmptyQuery,
    NoResults,
    /// The top match failed the score or similarity threshold
    LowConfidence,
    UnsupportedType,
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            NoMatchReason::EmptyQuery => "empty query",
            NoMatchReason::NoResults => "no results",
            NoMatchReason::LowConfidence => "low-confidence match",
            NoMatchReason::UnsupportedType => "unsupported result type",
        };
        f.write_str(reason)
    }
}

/// Errors that abort a resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The works search could not be completed
    #[error("Works search failed: {0}")]
    Upstream(#[source] SourceError),

    /// The works search answered with something undecodable
    #[error("Failed to parse works search response: {0}")]
    Parse(String),

    #[error("No match: {0}")]
    NoMatch(NoMatchReason),
}

impl ResolveError {
    /// User-facing message in the given locale
    pub fn localized_message(&self, locale: Locale) -> &'static str {
        let labels = locale.labels();
        match self {
            ResolveError::Upstream(_) => labels.upstream_failed,
            ResolveError::Parse(_) => labels.parse_failed,
            ResolveError::NoMatch(_) => labels.no_results,
        }
    }
}

impl From<SourceError> for ResolveError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Parse(msg) => ResolveError::Parse(msg),
            SourceError::NotFound(_) => ResolveError::NoMatch(NoMatchReason::NoResults),
            other => ResolveError::Upstream(other),
        }
    }
}

/// Whether a match clears the disambiguation gate
pub fn passes_gate(matching: &MatchingConfig, score: f64, similarity: f64) -> bool {
    score >= matching.min_score && similarity >= matching.min_similarity
}

/// Orchestrates lookups and builders for one query at a time.
///
/// Holds only shared, immutable collaborators; a single resolver can serve
/// concurrent resolutions.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    lookup: SourceLookup,
    extractor: EntityExtractor,
    matching: MatchingConfig,
    locale: Locale,
}

impl ReferenceResolver {
    pub fn new(lookup: SourceLookup, extractor: EntityExtractor) -> Self {
        Self {
            lookup,
            extractor,
            matching: MatchingConfig::default(),
            locale: Locale::default(),
        }
    }

    /// Build a resolver talking to the configured HTTP services
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = Arc::new(HttpClient::from_config(&config.http)?);
        let recognizer =
            CoreNlpRecognizer::with_base_url(Arc::clone(&client), &config.endpoints.ner_url);

        Ok(Self::new(
            SourceLookup::from_config(config, client),
            EntityExtractor::new(Arc::new(recognizer)),
        )
        .with_matching(config.matching.clone())
        .with_locale(config.output.locale))
    }

    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Locale used for sentinels in built records
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn matching(&self) -> &MatchingConfig {
        &self.matching
    }

    pub fn passes_gate(&self, score: f64, similarity: f64) -> bool {
        passes_gate(&self.matching, score, similarity)
    }

    /// Resolve `raw_query` into a reference record
    pub async fn resolve(&self, raw_query: &str) -> Result<Reference, ResolveError> {
        let query = normalize_query(raw_query);
        if query.is_empty() {
            return Err(ResolveError::NoMatch(NoMatchReason::EmptyQuery));
        }

        let page = self.lookup.search_works(&query).await?;
        let work = page
            .top()
            .ok_or(ResolveError::NoMatch(NoMatchReason::NoResults))?;

        let matched_title = work.first_title().unwrap_or_default();
        let title_similarity = similarity(&query, matched_title);
        if !self.passes_gate(work.score, title_similarity) {
            tracing::debug!(
                "Rejected '{}' for '{}' (score {:.2}, similarity {:.1})",
                matched_title,
                query,
                work.score,
                title_similarity
            );
            return Err(ResolveError::NoMatch(NoMatchReason::LowConfidence));
        }

        let ctx = BuildContext {
            lookup: &self.lookup,
            extractor: &self.extractor,
            labels: self.locale.labels(),
        };

        let reference = match work.kind() {
            WorkType::JournalArticle => Reference::Journal(build_journal(work, ctx.labels)),
            WorkType::BookChapter => Reference::BookChapter(build_book_chapter(work, &ctx).await),
            WorkType::ProceedingsArticle => {
                Reference::Proceeding(build_proceeding(work, &ctx).await)
            }
            WorkType::Other(kind) => {
                tracing::debug!("Unsupported result type '{}' for '{}'", kind, query);
                return Err(ResolveError::NoMatch(NoMatchReason::UnsupportedType));
            }
        };

        tracing::info!(
            "Matched '{}' as {} (score {:.2}, similarity {:.1})",
            matched_title,
            reference.kind(),
            work.score,
            title_similarity
        );
        Ok(reference)
    }
}

/// Resolve a query with `resolver`
pub async fn resolve_citation(
    resolver: &ReferenceResolver,
    query: &str,
) -> Result<Reference, ResolveError> {
    resolver.resolve(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReferenceKind, WorksPage};
    use crate::sources::mock::{
        make_work, MockBookService, MockCityLookup, MockRecognizer, MockWorksIndex,
    };

    fn resolver_with(works: Arc<MockWorksIndex>) -> ReferenceResolver {
        ReferenceResolver::new(
            SourceLookup::new(
                works,
                Arc::new(MockBookService::new()),
                Arc::new(MockCityLookup::new()),
            ),
            EntityExtractor::new(Arc::new(MockRecognizer::new())),
        )
    }

    fn page_of(work_type: &str, title: &str, score: f64) -> Arc<MockWorksIndex> {
        Arc::new(MockWorksIndex::with_page(WorksPage::new(vec![make_work(
            work_type, title, score,
        )])))
    }

    #[test]
    fn test_gate_thresholds() {
        let matching = MatchingConfig::default();
        assert!(!passes_gate(&matching, 1.9, 100.0));
        assert!(!passes_gate(&matching, 5.0, 79.0));
        assert!(passes_gate(&matching, 2.0, 80.0));

        let strict = MatchingConfig {
            min_score: 5.0,
            min_similarity: 90.0,
        };
        assert!(!passes_gate(&strict, 4.0, 100.0));
    }

    #[tokio::test]
    async fn test_resolve_journal() {
        let works = page_of("journal-article", "Widget study", 10.0);
        let resolver = resolver_with(works.clone());

        let reference = resolver.resolve("  Widget:\n study ").await.unwrap();

        assert_eq!(reference.kind(), ReferenceKind::Journal);
        assert_eq!(reference.title(), "Widget study");
        assert_eq!(works.queries(), vec!["Widget study"]);
    }

    #[tokio::test]
    async fn test_resolve_dispatches_by_type() {
        let resolver = resolver_with(page_of("book-chapter", "Gears", 4.0));
        let reference = resolver.resolve("gears").await.unwrap();
        assert_eq!(reference.kind(), ReferenceKind::BookChapter);

        let resolver = resolver_with(page_of("proceedings-article", "Gears", 4.0));
        let reference = resolver.resolve("gears").await.unwrap();
        assert_eq!(reference.kind(), ReferenceKind::Proceeding);

        let resolver = resolver_with(page_of("dataset", "Gears", 4.0));
        assert!(matches!(
            resolver.resolve("gears").await,
            Err(ResolveError::NoMatch(NoMatchReason::UnsupportedType))
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejections() {
        let works = Arc::new(MockWorksIndex::new());
        let resolver = resolver_with(works.clone());

        assert!(matches!(
            resolver.resolve(" : \n ").await,
            Err(ResolveError::NoMatch(NoMatchReason::EmptyQuery))
        ));
        assert!(works.queries().is_empty());

        assert!(matches!(
            resolver.resolve("widget study").await,
            Err(ResolveError::NoMatch(NoMatchReason::NoResults))
        ));

        let resolver = resolver_with(page_of("journal-article", "Widget study", 1.9));
        assert!(matches!(
            resolver.resolve("widget study").await,
            Err(ResolveError::NoMatch(NoMatchReason::LowConfidence))
        ));

        let resolver = resolver_with(page_of("journal-article", "Something else entirely", 50.0));
        assert!(matches!(
            resolver.resolve("widget study").await,
            Err(ResolveError::NoMatch(NoMatchReason::LowConfidence))
        ));
    }

    #[tokio::test]
    async fn test_resolve_upstream_errors() {
        let resolver = resolver_with(Arc::new(MockWorksIndex::with_error(SourceError::Network(
            "connection refused".into(),
        ))));
        let err = resolver.resolve("widget study").await.unwrap_err();
        assert!(matches!(err, ResolveError::Upstream(SourceError::Network(_))));
        assert_eq!(err.localized_message(Locale::Id), "Gagal menghubungi server");

        let resolver = resolver_with(Arc::new(MockWorksIndex::with_error(SourceError::Parse(
            "bad json".into(),
        ))));
        let err = resolver.resolve("widget study").await.unwrap_err();
        assert!(matches!(err, ResolveError::Parse(_)));
        assert_eq!(err.localized_message(Locale::En), "Failed to parse data");
    }

    #[test]
    fn test_localized_no_match() {
        let err = ResolveError::NoMatch(NoMatchReason::LowConfidence);
        assert_eq!(err.localized_message(Locale::Id), "Tidak ditemukan hasil");
        assert_eq!(err.localized_message(Locale::En), "No results found");
        assert_eq!(err.to_string(), "No match: low-confidence match");
    }

    #[tokio::test]
    async fn test_resolver_uses_locale_for_sentinels() {
        let mut work = make_work("journal-article", "Widget study", 10.0);
        work.container_title.clear();
        let works = Arc::new(MockWorksIndex::with_page(WorksPage::new(vec![work])));
        let resolver = resolver_with(works).with_locale(Locale::Id);

        let reference = resolver.resolve("widget study").await.unwrap();
        assert_eq!(
            reference.as_journal().unwrap().journal,
            "[Jurnal tidak diketahui]"
        );
    }
}
