//! Stanford CoreNLP named-entity recognition adapter.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::Entities;
use crate::sources::{EntityRecognizer, SourceError};
use crate::utils::HttpClient;

pub const CORENLP_API_BASE: &str = "http://localhost:9000";

const PROPERTIES: &str = r#"{"annotators":"tokenize,ssplit,ner","outputFormat":"json"}"#;

/// CoreNLP server running the `ner` annotator
#[derive(Debug, Clone)]
pub struct CoreNlpRecognizer {
    client: Arc<HttpClient>,
    base_url: String,
}

impl CoreNlpRecognizer {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_base_url(client, CORENLP_API_BASE)
    }

    pub fn with_base_url(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EntityRecognizer for CoreNlpRecognizer {
    fn name(&self) -> &str {
        "CoreNLP"
    }

    async fn recognize(&self, text: &str) -> Result<Entities, SourceError> {
        if text.trim().is_empty() {
            return Ok(Entities::default());
        }

        let url = format!(
            "{}/?properties={}",
            self.base_url,
            urlencoding::encode(PROPERTIES)
        );
        let document: NerDocument = self.client.post_text_json(&url, text).await?;
        Ok(document.into_entities())
    }
}

// ===== CoreNLP API Types =====

#[derive(Debug, Deserialize)]
struct NerDocument {
    #[serde(default)]
    sentences: Vec<NerSentence>,
}

#[derive(Debug, Deserialize)]
struct NerSentence {
    #[serde(default)]
    entitymentions: Vec<EntityMention>,
}

#[derive(Debug, Deserialize)]
struct EntityMention {
    text: String,
    ner: String,
}

impl NerDocument {
    fn into_entities(self) -> Entities {
        let mut entities = Entities::default();
        for mention in self.sentences.into_iter().flat_map(|s| s.entitymentions) {
            let text = mention.text.trim().to_string();
            if text.is_empty() {
                continue;
            }
            match mention.ner.as_str() {
                "PERSON" => entities.persons.push(text),
                "DATE" => entities.dates.push(text),
                "LOCATION" | "CITY" | "STATE_OR_PROVINCE" | "COUNTRY" => {
                    entities.locations.push(text)
                }
                _ => {}
            }
        }
        entities
    }
}
