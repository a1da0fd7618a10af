//! Geobytes city lookup adapter.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::sources::{CityLookup, SourceError};
use crate::utils::HttpClient;

pub const GEOBYTES_API_BASE: &str = "http://gd.geobytes.com";

/// Two-step Geobytes lookup: autocomplete the fragment, then fetch the
/// details of the first candidate.
#[derive(Debug, Clone)]
pub struct GeobytesCityLookup {
    client: Arc<HttpClient>,
    base_url: String,
}

impl GeobytesCityLookup {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_base_url(client, GEOBYTES_API_BASE)
    }

    pub fn with_base_url(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn lookup(&self, fragment: &str) -> Result<String, SourceError> {
        let url = format!(
            "{}/AutoCompleteCity?q={}",
            self.base_url,
            urlencoding::encode(fragment)
        );
        let candidates: Vec<String> = self.client.get_json(&url).await?;
        let city = candidates
            .into_iter()
            .next()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SourceError::NotFound(format!("city '{}'", fragment)))?;

        let url = format!(
            "{}/GetCityDetails?fqcn={}",
            self.base_url,
            urlencoding::encode(&city)
        );
        let details: CityDetails = self.client.get_json(&url).await?;
        Ok(details.geobytesinternet)
    }
}

#[async_trait]
impl CityLookup for GeobytesCityLookup {
    fn name(&self) -> &str {
        "Geobytes"
    }

    async fn search_city(&self, fragment: &str) -> String {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return String::new();
        }

        match self.lookup(fragment).await {
            Ok(country) => country,
            Err(e) => {
                tracing::warn!("City lookup for '{}' failed: {}", fragment, e);
                String::new()
            }
        }
    }
}

// ===== Geobytes API Types =====

#[derive(Debug, Deserialize)]
struct CityDetails {
    #[serde(default)]
    geobytesinternet: String,
}
