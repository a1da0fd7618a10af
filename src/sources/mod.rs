//! Upstream metadata services behind trait-based adapters.
//!
//! Each external collaborator is a trait with an HTTP implementation and an
//! in-crate double in [`mock`]:
//!
//! - [`WorksIndex`] - scholarly works search (CrossRef)
//! - [`BookMetadataService`] - ISBN metadata (xISBN)
//! - [`CityLookup`] - city to country lookup (Geobytes)
//! - [`EntityRecognizer`] - named-entity recognition (Stanford CoreNLP)
//!
//! Adapters only translate requests and responses; they hold no resolution
//! logic. [`SourceLookup`] bundles the three bibliographic collaborators so the
//! resolver can take them as one injected dependency.

mod corenlp;
mod crossref;
mod geobytes;
mod xisbn;

pub mod mock;

pub use corenlp::{CoreNlpRecognizer, CORENLP_API_BASE};
pub use crossref::{CrossRefWorks, CROSSREF_API_BASE};
pub use geobytes::{GeobytesCityLookup, GEOBYTES_API_BASE};
pub use xisbn::{XisbnBookService, XISBN_API_BASE};

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{BookRecord, Entities, WorksPage};
use crate::utils::HttpClient;

/// Searches a scholarly works index for the best match of a free-text query.
#[async_trait]
pub trait WorksIndex: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this index
    fn name(&self) -> &str;

    /// Return the top-ranked match (at most one item) for `query`
    async fn search_works(&self, query: &str) -> Result<WorksPage, SourceError>;
}

/// Translates an ISBN into book metadata.
#[async_trait]
pub trait BookMetadataService: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Look up book metadata. `isbn` may be any text containing an ISBN.
    async fn search_by_isbn(&self, isbn: &str) -> Result<BookRecord, SourceError>;
}

/// Resolves a city name fragment to the country it belongs to.
#[async_trait]
pub trait CityLookup: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Country for `fragment`, or an empty string when nothing matches or the
    /// service fails.
    async fn search_city(&self, fragment: &str) -> String;
}

/// Extracts person, date and location mentions from free text.
#[async_trait]
pub trait EntityRecognizer: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn recognize(&self, text: &str) -> Result<Entities, SourceError>;
}

/// Errors that can occur when interacting with an upstream service
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded, with the advertised retry-after seconds
    #[error("Rate limit exceeded")]
    RateLimit(Option<u64>),

    /// Lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success response from the service
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// The bibliographic collaborators a resolution consults
#[derive(Debug, Clone)]
pub struct SourceLookup {
    works: Arc<dyn WorksIndex>,
    books: Arc<dyn BookMetadataService>,
    cities: Arc<dyn CityLookup>,
}

impl SourceLookup {
    pub fn new(
        works: Arc<dyn WorksIndex>,
        books: Arc<dyn BookMetadataService>,
        cities: Arc<dyn CityLookup>,
    ) -> Self {
        Self {
            works,
            books,
            cities,
        }
    }

    /// Build the HTTP adapters against the configured endpoints
    pub fn from_config(config: &Config, client: Arc<HttpClient>) -> Self {
        let endpoints = &config.endpoints;
        Self {
            works: Arc::new(CrossRefWorks::with_base_url(
                Arc::clone(&client),
                &endpoints.works_url,
            )),
            books: Arc::new(XisbnBookService::with_base_url(
                Arc::clone(&client),
                &endpoints.isbn_url,
            )),
            cities: Arc::new(GeobytesCityLookup::with_base_url(client, &endpoints.geo_url)),
        }
    }

    pub async fn search_works(&self, query: &str) -> Result<WorksPage, SourceError> {
        self.works.search_works(query).await
    }

    pub async fn search_by_isbn(&self, isbn: &str) -> Result<BookRecord, SourceError> {
        self.books.search_by_isbn(isbn).await
    }

    pub async fn search_city(&self, fragment: &str) -> String {
        self.cities.search_city(fragment).await
    }
}
