//! xISBN book metadata adapter.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::BookRecord;
use crate::sources::{BookMetadataService, SourceError};
use crate::utils::{extract_isbn, HttpClient};

pub const XISBN_API_BASE: &str = "http://xisbn.worldcat.org/webservices/xid";

/// WorldCat xISBN metadata service
#[derive(Debug, Clone)]
pub struct XisbnBookService {
    client: Arc<HttpClient>,
    base_url: String,
}

impl XisbnBookService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_base_url(client, XISBN_API_BASE)
    }

    pub fn with_base_url(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BookMetadataService for XisbnBookService {
    fn name(&self) -> &str {
        "xISBN"
    }

    async fn search_by_isbn(&self, isbn: &str) -> Result<BookRecord, SourceError> {
        let isbn = extract_isbn(isbn)?;
        let url = format!(
            "{}/isbn/{}?method=getMetadata&format=json&fl=*",
            self.base_url,
            urlencoding::encode(isbn.as_str())
        );

        let response: XisbnResponse = self.client.get_json(&url).await?;
        if response.stat != "ok" {
            return Err(SourceError::NotFound(format!(
                "ISBN {} (stat: {})",
                isbn, response.stat
            )));
        }

        response
            .list
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(format!("ISBN {} (empty list)", isbn)))
    }
}

// ===== xISBN API Types =====

#[derive(Debug, Deserialize)]
struct XisbnResponse {
    #[serde(default)]
    stat: String,

    #[serde(default)]
    list: Vec<BookRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn service(server: &Server) -> XisbnBookService {
        XisbnBookService::with_base_url(Arc::new(HttpClient::new().unwrap()), &server.url())
    }

    #[tokio::test]
    async fn test_search_by_isbn_returns_first_record() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/isbn/9780306406157")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "getMetadata".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"stat": "ok", "list": [{
                    "isbn": ["9780306406157"],
                    "title": "advances in widget engineering",
                    "publisher": "Springer",
                    "author": "edited by Jane Doe",
                    "city": "Boston, MA, USA"
                }]}"#,
            )
            .create_async()
            .await;

        let record = service(&server)
            .search_by_isbn("ISBN 978-0-306-40615-7")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.publisher, "Springer");
        assert_eq!(record.city, "Boston, MA, USA");
        assert_eq!(record.author, "edited by Jane Doe");
    }

    #[tokio::test]
    async fn test_search_by_isbn_stat_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/isbn/0306406152")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"stat": "invalidId"}"#)
            .create_async()
            .await;

        let err = service(&server)
            .search_by_isbn("0306406152")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_by_isbn_without_isbn_skips_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = service(&server).search_by_isbn("n/a").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
        mock.assert_async().await;
    }
}
