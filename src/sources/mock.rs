//! Mock collaborators for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{BookRecord, DateParts, Entities, Work, WorkAuthor, WorksPage};
use crate::sources::{BookMetadataService, CityLookup, EntityRecognizer, SourceError, WorksIndex};

/// A works index that returns a predefined page and records the queries it saw.
#[derive(Debug, Default)]
pub struct MockWorksIndex {
    response: Mutex<Option<Result<WorksPage, SourceError>>>,
    queries: Mutex<Vec<String>>,
}

impl MockWorksIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index answering every query with `page`
    pub fn with_page(page: WorksPage) -> Self {
        let mock = Self::new();
        mock.set_response(Ok(page));
        mock
    }

    /// Index failing every query with `error`
    pub fn with_error(error: SourceError) -> Self {
        let mock = Self::new();
        mock.set_response(Err(error));
        mock
    }

    pub fn set_response(&self, response: Result<WorksPage, SourceError>) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(response);
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorksIndex for MockWorksIndex {
    fn name(&self) -> &str {
        "Mock Works Index"
    }

    async fn search_works(&self, query: &str) -> Result<WorksPage, SourceError> {
        self.queries.lock().unwrap().push(query.to_string());
        let guard = self.response.lock().unwrap();
        match &*guard {
            Some(response) => response.clone(),
            None => Ok(WorksPage::default()),
        }
    }
}

/// An ISBN service that returns a predefined record.
///
/// Without a configured response every lookup fails with `NotFound`.
#[derive(Debug, Default)]
pub struct MockBookService {
    response: Mutex<Option<Result<BookRecord, SourceError>>>,
    requests: Mutex<Vec<String>>,
}

impl MockBookService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: BookRecord) -> Self {
        let mock = Self::new();
        *mock.response.lock().unwrap() = Some(Ok(record));
        mock
    }

    pub fn with_error(error: SourceError) -> Self {
        let mock = Self::new();
        *mock.response.lock().unwrap() = Some(Err(error));
        mock
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookMetadataService for MockBookService {
    fn name(&self) -> &str {
        "Mock Book Service"
    }

    async fn search_by_isbn(&self, isbn: &str) -> Result<BookRecord, SourceError> {
        self.requests.lock().unwrap().push(isbn.to_string());
        let guard = self.response.lock().unwrap();
        match &*guard {
            Some(response) => response.clone(),
            None => Err(SourceError::NotFound(format!("ISBN {}", isbn))),
        }
    }
}

/// A city lookup backed by a fixed city to country table.
#[derive(Debug, Default)]
pub struct MockCityLookup {
    countries: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockCityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, city: &str, country: &str) -> Self {
        self.countries.insert(city.to_string(), country.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CityLookup for MockCityLookup {
    fn name(&self) -> &str {
        "Mock City Lookup"
    }

    async fn search_city(&self, fragment: &str) -> String {
        self.requests.lock().unwrap().push(fragment.to_string());
        self.countries.get(fragment).cloned().unwrap_or_default()
    }
}

/// An entity recognizer returning predefined entities (empty by default).
#[derive(Debug, Default)]
pub struct MockRecognizer {
    response: Mutex<Option<Result<Entities, SourceError>>>,
    texts: Mutex<Vec<String>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: Entities) -> Self {
        let mock = Self::new();
        *mock.response.lock().unwrap() = Some(Ok(entities));
        mock
    }

    pub fn with_error(error: SourceError) -> Self {
        let mock = Self::new();
        *mock.response.lock().unwrap() = Some(Err(error));
        mock
    }

    /// Texts submitted for recognition, in order
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityRecognizer for MockRecognizer {
    fn name(&self) -> &str {
        "Mock Recognizer"
    }

    async fn recognize(&self, text: &str) -> Result<Entities, SourceError> {
        self.texts.lock().unwrap().push(text.to_string());
        let guard = self.response.lock().unwrap();
        match &*guard {
            Some(response) => response.clone(),
            None => Ok(Entities::default()),
        }
    }
}

/// Helper function to create a mock works-index match for testing.
pub fn make_work(work_type: &str, title: &str, score: f64) -> Work {
    Work {
        work_type: work_type.to_string(),
        title: vec![title.to_string()],
        author: vec![WorkAuthor {
            family: Some("Smith".to_string()),
            given: Some("John".to_string()),
            name: None,
        }],
        issued: Some(DateParts::from_year(2020)),
        score,
        ..Default::default()
    }
}
