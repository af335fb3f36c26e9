use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Category, QuestionBank};
use crate::error::BankError;
use crate::topics::normalize_key;

#[derive(Debug, Clone, PartialEq)]
enum Section {
    /// Category-wide list, topic is ignored on lookup
    List(Vec<String>),
    Topics(Vec<(String, Vec<String>)>),
}

/// Question bank backed by a JSON document.
///
/// Two layouts are accepted: `{"survey": {topic: [..]}, "role_play": ..., "random_question": ...}`
/// where each category maps to either topics or a plain list, and a flat
/// `{topic: [..]}` object which is read as the survey section.
#[derive(Debug, Clone, Default)]
pub struct JsonFileBank {
    sections: Arc<HashMap<Category, Section>>,
}

impl JsonFileBank {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!("Question bank is not a JSON object, using an empty bank");
            return Self::default();
        };

        let categorized = obj.keys().any(|k| k.parse::<Category>().is_ok());
        let mut sections = HashMap::new();
        if categorized {
            for (key, section) in obj {
                match key.parse::<Category>() {
                    Ok(category) => {
                        if let Some(section) = parse_section(section) {
                            sections.insert(category, section);
                        }
                    }
                    Err(_) => debug!(key = %key, "Ignoring unknown question bank section"),
                }
            }
        } else if let Some(section) = parse_section(value) {
            sections.insert(Category::Survey, section);
        }

        Self { sections: Arc::new(sections) }
    }

    /// Parse a bank from raw JSON text. Malformed input yields an empty bank.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!(error = %e, "Question bank is not valid JSON, using an empty bank");
                Self::default()
            }
        }
    }

    /// Read the bank from disk. A missing or malformed file yields an empty bank.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => {
                let bank = Self::from_json_str(&raw);
                debug!(path = %path.display(), sections = bank.sections.len(), "Loaded question bank file");
                Ok(bank)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Question bank file not found, using an empty bank");
                Ok(Self::default())
            }
            Err(source) => Err(BankError::Io { path: path.to_path_buf(), source }),
        }
    }

    fn lookup(&self, category: Category, topic: Option<&str>) -> Vec<String> {
        match (self.sections.get(&category), topic) {
            (None, _) => Vec::new(),
            (Some(Section::List(items)), _) => items.clone(),
            (Some(Section::Topics(topics)), None) => {
                topics.iter().flat_map(|(_, items)| items.iter().cloned()).collect()
            }
            (Some(Section::Topics(topics)), Some(topic)) => {
                let normalized = normalize_key(topic);
                topics
                    .iter()
                    .find(|(key, _)| key == topic)
                    .or_else(|| topics.iter().find(|(key, _)| normalize_key(key) == normalized))
                    .map(|(_, items)| items.clone())
                    .unwrap_or_default()
            }
        }
    }
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn parse_section(value: &Value) -> Option<Section> {
    match value {
        Value::Array(_) => Some(Section::List(strings(value))),
        Value::Object(topics) => Some(Section::Topics(
            topics
                .iter()
                .filter(|(_, v)| v.is_array())
                .map(|(k, v)| (k.clone(), strings(v)))
                .collect(),
        )),
        _ => None,
    }
}

#[async_trait]
impl QuestionBank for JsonFileBank {
    async fn fetch(&self, category: Category, topic: Option<&str>) -> Result<Vec<String>, BankError> {
        let items = self.lookup(category, topic);
        debug!(%category, topic = ?topic, count = items.len(), "File bank lookup");
        Ok(items)
    }

    fn clone_box(&self) -> Box<dyn QuestionBank> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORIZED: &str = r#"{
        "survey": {
            "travel": ["Where did you go?", "Who did you travel with?"],
            "Yoga": ["Why do you like yoga?"]
        },
        "role_play": ["Call the store and ask about a product."],
        "random_question": {
            "weather": ["How is the weather today?"],
            "recycling": ["How do people recycle in your country?"]
        }
    }"#;

    #[tokio::test]
    async fn categorized_layout() {
        let bank = JsonFileBank::from_json_str(CATEGORIZED);
        let travel = bank.fetch(Category::Survey, Some("travel")).await.unwrap();
        assert_eq!(travel.len(), 2);

        let yoga = bank.fetch(Category::Survey, Some("  yoga ")).await.unwrap();
        assert_eq!(yoga, vec!["Why do you like yoga?"]);

        let role_play = bank.fetch(Category::RolePlay, Some("Item Purchase")).await.unwrap();
        assert_eq!(role_play, vec!["Call the store and ask about a product."]);

        let all_random = bank.fetch(Category::RandomQuestion, None).await.unwrap();
        assert_eq!(all_random.len(), 2);
    }

    #[tokio::test]
    async fn flat_layout_is_survey() {
        let bank = JsonFileBank::from_json_str(r#"{"movies": ["What movie did you see last?", 3]}"#);
        let movies = bank.fetch(Category::Survey, Some("movies")).await.unwrap();
        assert_eq!(movies, vec!["What movie did you see last?"]);
        assert!(bank.fetch(Category::RolePlay, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_topic_is_empty() {
        let bank = JsonFileBank::from_json_str(CATEGORIZED);
        assert!(bank.fetch(Category::Survey, Some("golf")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_empty() {
        let bank = JsonFileBank::from_json_str("{\"survey\": ");
        assert!(bank.fetch(Category::Survey, None).await.unwrap().is_empty());
    }
}
