//! Named-entity extraction used by the enrichment pass.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::Entities;
use crate::sources::EntityRecognizer;

/// Wraps an [`EntityRecognizer`] so that extraction never fails.
///
/// Recognizer errors are logged and reported as "no entities".
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Persons, dates and locations mentioned in `text`, each de-duplicated
    /// in order of first appearance.
    pub async fn extract(&self, text: &str) -> Entities {
        let text = text.trim();
        if text.is_empty() {
            return Entities::default();
        }

        match self.recognizer.recognize(text).await {
            Ok(entities) => Entities {
                persons: dedup_in_order(entities.persons),
                dates: dedup_in_order(entities.dates),
                locations: dedup_in_order(entities.locations),
            },
            Err(e) => {
                tracing::warn!(
                    "Entity extraction with {} failed: {}",
                    self.recognizer.name(),
                    e
                );
                Entities::default()
            }
        }
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::MockRecognizer;
    use crate::sources::SourceError;

    #[tokio::test]
    async fn test_extract_dedups_persons() {
        let recognizer = Arc::new(MockRecognizer::with_entities(Entities {
            persons: vec!["Jane Doe".into(), "Bo Chan".into(), "JANE DOE".into()],
            dates: vec!["2019".into()],
            locations: vec![],
        }));
        let extractor = EntityExtractor::new(recognizer.clone());

        let entities = extractor.extract("  edited by Jane Doe and Bo Chan ").await;
        assert_eq!(entities.persons, vec!["Jane Doe", "Bo Chan"]);
        assert_eq!(entities.dates, vec!["2019"]);
        assert_eq!(recognizer.texts(), vec!["edited by Jane Doe and Bo Chan"]);
    }

    #[tokio::test]
    async fn test_extract_recovers_from_failure() {
        let recognizer = Arc::new(MockRecognizer::with_error(SourceError::Network(
            "connection refused".into(),
        )));
        let extractor = EntityExtractor::new(recognizer);

        assert!(extractor.extract("Jane Doe").await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_blank_text_skips_recognizer() {
        let recognizer = Arc::new(MockRecognizer::new());
        let extractor = EntityExtractor::new(recognizer.clone());

        assert!(extractor.extract("   ").await.is_empty());
        assert!(recognizer.texts().is_empty());
    }
}
