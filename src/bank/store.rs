use std::fmt::Debug;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Category, QuestionBank};
use crate::error::BankError;
use crate::topics::normalize_key;

/// One stored pool: `{category, topic?, content: [..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

impl QuestionDocument {
    pub fn new<I, S>(category: Category, topic: Option<&str>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            topic: topic.map(str::to_string),
            content: content.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopicFilter {
    Any,
    /// Stored topic equals the key after normalization
    Normalized(String),
    CaseInsensitive(String),
}

impl TopicFilter {
    fn matches(&self, topic: Option<&str>) -> bool {
        match (self, topic) {
            (TopicFilter::Any, _) => true,
            (_, None) => false,
            (TopicFilter::Normalized(key), Some(t)) => normalize_key(t) == *key,
            (TopicFilter::CaseInsensitive(key), Some(t)) => t.to_lowercase() == key.to_lowercase(),
        }
    }
}

/// Exact-match query on `category`, plus a topic condition.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFilter {
    pub category: Category,
    pub topic: TopicFilter,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &QuestionDocument) -> bool {
        doc.category == self.category && self.topic.matches(doc.topic.as_deref())
    }
}

/// Document collection holding question pools.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// All documents matching `filter`, in insertion order.
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<QuestionDocument>, BankError>;

    async fn find_one(&self, filter: &DocumentFilter) -> Result<Option<QuestionDocument>, BankError> {
        Ok(self.find(filter).await?.into_iter().next())
    }
}

/// Process-local [`DocumentStore`], seeded from the same JSON used for uploads.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    docs: Arc<RwLock<Vec<QuestionDocument>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: Vec<QuestionDocument>) -> Self {
        Self { docs: Arc::new(RwLock::new(docs)) }
    }

    /// Flatten `{category: {topic: [..]} | [..]}` into documents. Unknown categories are skipped.
    pub fn from_seed(seed: &Value) -> Self {
        let mut docs = Vec::new();
        if let Some(obj) = seed.as_object() {
            for (key, section) in obj {
                let Ok(category) = key.parse::<Category>() else {
                    warn!(key = %key, "Skipping unknown category in seed data");
                    continue;
                };
                match section {
                    Value::Object(topics) => {
                        for (topic, prompts) in topics {
                            docs.push(QuestionDocument::new(category, Some(topic.as_str()), as_strings(prompts)));
                        }
                    }
                    Value::Array(_) => docs.push(QuestionDocument::new(category, None, as_strings(section))),
                    _ => warn!(key = %key, "Skipping malformed seed section"),
                }
            }
        }
        Self::with_documents(docs)
    }

    /// Load seed JSON from disk. A missing or malformed file yields an empty store.
    pub async fn load_seed(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Seed file not found, using an empty store");
                return Ok(Self::default());
            }
            Err(source) => return Err(BankError::Io { path: path.to_path_buf(), source }),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(seed) => {
                let store = Self::from_seed(&seed);
                info!(path = %path.display(), documents = store.len(), "Seeded document store");
                Ok(store)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Seed file is not valid JSON, using an empty store");
                Ok(Self::default())
            }
        }
    }

    pub fn insert_many(&self, docs: Vec<QuestionDocument>) -> Result<usize, BankError> {
        let mut guard = self.docs.write().map_err(|e| BankError::Store(e.to_string()))?;
        let inserted = docs.len();
        guard.extend(docs);
        Ok(inserted)
    }

    pub fn delete_all(&self) -> Result<usize, BankError> {
        let mut guard = self.docs.write().map_err(|e| BankError::Store(e.to_string()))?;
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn as_strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<QuestionDocument>, BankError> {
        let guard = self.docs.read().map_err(|e| BankError::Store(e.to_string()))?;
        Ok(guard.iter().filter(|d| filter.matches(d)).cloned().collect())
    }
}

/// [`QuestionBank`] over a [`DocumentStore`].
///
/// Survey and random lookups compare normalized topics; role-play scenarios are
/// matched case-insensitively. A topic lookup reads the first matching
/// document only. Without a topic, every document of the category is merged.
#[derive(Debug, Clone)]
pub struct StoreBank<S> {
    store: S,
}

impl<S: DocumentStore> StoreBank<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn filter(category: Category, topic: Option<&str>) -> DocumentFilter {
        let topic = match (category, topic) {
            (_, None) => TopicFilter::Any,
            (Category::RolePlay, Some(t)) => TopicFilter::CaseInsensitive(t.to_string()),
            (_, Some(t)) => TopicFilter::Normalized(normalize_key(t)),
        };
        DocumentFilter { category, topic }
    }
}

#[async_trait]
impl<S> QuestionBank for StoreBank<S>
where
    S: DocumentStore + Clone + 'static,
{
    async fn fetch(&self, category: Category, topic: Option<&str>) -> Result<Vec<String>, BankError> {
        let filter = Self::filter(category, topic);
        let items = match topic {
            Some(_) => self
                .store
                .find_one(&filter)
                .await?
                .map(|doc| doc.content)
                .unwrap_or_default(),
            None => self
                .store
                .find(&filter)
                .await?
                .into_iter()
                .flat_map(|doc| doc.content)
                .collect(),
        };
        debug!(%category, topic = ?topic, count = items.len(), "Store bank lookup");
        Ok(items)
    }

    fn clone_box(&self) -> Box<dyn QuestionBank> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryStore {
        InMemoryStore::from_seed(&json!({
            "survey": {
                "International Travel": ["Describe a trip abroad.", "What did you pack?"],
                "yoga": ["When did you start yoga?"]
            },
            "role_play": {
                "Item Purchase": ["Call a shop about an item."],
                "Cancelling Appointment": ["Cancel your appointment."]
            },
            "unknown": {"x": ["ignored"]}
        }))
    }

    #[test]
    fn seed_flattens_into_documents() {
        let store = seeded();
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn survey_matches_normalized_topic() {
        let bank = StoreBank::new(seeded());
        let pool = bank.fetch(Category::Survey, Some("international travel")).await.unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[tokio::test]
    async fn role_play_is_case_insensitive_and_category_wide() {
        let bank = StoreBank::new(seeded());
        let pool = bank.fetch(Category::RolePlay, Some("ITEM PURCHASE")).await.unwrap();
        assert_eq!(pool, vec!["Call a shop about an item."]);

        let all = bank.fetch(Category::RolePlay, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn insert_and_delete() {
        let store = InMemoryStore::new();
        store
            .insert_many(vec![QuestionDocument::new(
                Category::RandomQuestion,
                Some("weather"),
                ["What is the weather like?"],
            )])
            .unwrap();
        let bank = StoreBank::new(store.clone());
        assert_eq!(bank.fetch(Category::RandomQuestion, Some("Weather")).await.unwrap().len(), 1);

        assert_eq!(store.delete_all().unwrap(), 1);
        assert!(bank.fetch(Category::RandomQuestion, Some("weather")).await.unwrap().is_empty());
    }

    #[test]
    fn documents_deserialize_without_topic() {
        let doc: QuestionDocument =
            serde_json::from_value(json!({"category": "random_question", "content": ["a"]})).unwrap();
        assert_eq!(doc.topic, None);
        assert_eq!(doc.category, Category::RandomQuestion);
    }
}
