//! CrossRef works index adapter.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::WorksPage;
use crate::sources::{SourceError, WorksIndex};
use crate::utils::HttpClient;

pub const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef works index
///
/// Uses the CrossRef REST API `works` endpoint, asking for a single row.
#[derive(Debug, Clone)]
pub struct CrossRefWorks {
    client: Arc<HttpClient>,
    base_url: String,
}

impl CrossRefWorks {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_base_url(client, CROSSREF_API_BASE)
    }

    pub fn with_base_url(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WorksIndex for CrossRefWorks {
    fn name(&self) -> &str {
        "CrossRef"
    }

    async fn search_works(&self, query: &str) -> Result<WorksPage, SourceError> {
        let url = format!(
            "{}/works?rows=1&query={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let envelope: CrossRefEnvelope = self.client.get_json(&url).await?;
        tracing::debug!(
            "CrossRef reported {} results for '{}'",
            envelope.message.total_results,
            query
        );
        Ok(envelope.message)
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CrossRefEnvelope {
    message: WorksPage,
}
