//! Survey answer to topic resolution, plus the built-in topic catalog.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::BankError;

/// Trim, lowercase and collapse inner whitespace.
pub fn normalize_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Static survey-answer to topic table.
#[derive(Debug, Clone, Default)]
pub struct TopicMap {
    exact: HashMap<String, String>,
    normalized: HashMap<String, String>,
}

impl TopicMap {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::default();
        for (k, v) in entries {
            map.insert(k.into(), v.into());
        }
        map
    }

    fn insert(&mut self, answer: String, topic: String) {
        // Earliest insertion wins when two labels normalize to the same key.
        // JSON objects are visited in key order, not file order.
        self.normalized
            .entry(normalize_key(&answer))
            .or_insert_with(|| topic.clone());
        self.exact.insert(answer, topic);
    }

    /// Parse a JSON object of `answer -> topic`. Malformed input yields an empty map.
    pub fn from_json_str(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Topic map is not valid JSON, using an empty map");
                return Self::default();
            }
        };
        let Some(obj) = value.as_object() else {
            warn!("Topic map is not a JSON object, using an empty map");
            return Self::default();
        };

        Self::new(obj.iter().map(|(k, v)| {
            let topic = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), topic)
        }))
    }

    /// Load the map from disk. A missing or malformed file yields an empty map.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => {
                let map = Self::from_json_str(&raw);
                debug!(path = %path.display(), entries = map.len(), "Loaded topic map");
                Ok(map)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Topic map file not found, using an empty map");
                Ok(Self::default())
            }
            Err(source) => Err(BankError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Look up a single answer: exact match first, then the normalized form.
    pub fn lookup(&self, answer: &str) -> Option<&str> {
        self.exact
            .get(answer)
            .or_else(|| self.normalized.get(&normalize_key(answer)))
            .map(String::as_str)
    }

    /// Resolve answers to distinct topics in first-seen order, dropping unmapped answers.
    pub fn resolve(&self, answers: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut topics = Vec::new();
        for answer in answers {
            match self.lookup(answer) {
                Some(topic) => {
                    if seen.insert(topic.to_string()) {
                        topics.push(topic.to_string());
                    }
                }
                None => debug!(answer = %answer, "Dropping unmapped survey answer"),
            }
        }
        topics
    }
}

const DEFAULT_SURVEY_TOPICS: &[&str] = &[
    "have work experience", "living alone in a house/apartment", "living with friends in a house/apartment",
    "living with family in a house/apartment", "dormitory", "military barracks", "student",
    "museum", "watching sports", "TV", "watching cooking programs", "driving", "club", "park",
    "Improving living space", "texting friends", "watching reality shows", "spa/massage shop",
    "camping", "performance", "bar/pub", "billiard", "test preparation", "news", "shopping",
    "beach", "volunteering", "chess", "cafe", "SNS", "movies", "game", "concert", "health",
    "searching job", "reading books to children", "music", "musical instruments", "dancing",
    "writing", "drawing", "cooking", "pets", "reading", "investing", "travel magazine", "singing",
    "basketball", "baseball/softball", "soccer", "american football", "hockey", "cricket",
    "golf", "volleyball", "tennis", "badminton", "table tennis", "swimming", "bicycling",
    "skiing/snowboarding", "ice skating", "jogging", "walking", "yoga", "hiking/trekking",
    "fishing", "taekwondo", "taking fitness classes", "do not exercise",
    "domestic business trip", "overseas business trip", "staycation", "domestic travel",
    "international travel", "newspaper", "taking photos",
];

const DEFAULT_ROLE_PLAY_TOPICS: &[&str] =
    &["Getting Ready for Traveling", "Cancelling Appointment", "Item Purchase"];

const DEFAULT_RANDOM_TOPICS: &[&str] = &["technology", "industry", "recycling", "weather"];

/// Topics the assembler draws from when the survey does not supply enough.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCatalog {
    pub survey: Vec<String>,
    pub role_play: Vec<String>,
    pub random_question: Vec<String>,
}

impl Default for TopicCatalog {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            survey: owned(DEFAULT_SURVEY_TOPICS),
            role_play: owned(DEFAULT_ROLE_PLAY_TOPICS),
            random_question: owned(DEFAULT_RANDOM_TOPICS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_then_normalized_lookup() {
        let map = TopicMap::new([("International Travel", "travel"), ("요가", "yoga")]);
        assert_eq!(map.lookup("International Travel"), Some("travel"));
        assert_eq!(map.lookup("  international   TRAVEL "), Some("travel"));
        assert_eq!(map.lookup("요가"), Some("yoga"));
        assert_eq!(map.lookup("golf"), None);
    }

    #[test]
    fn resolve_drops_unmapped_and_dedups() {
        let map = TopicMap::new([
            ("dormitory", "housing"),
            ("living alone", "housing"),
            ("yoga", "yoga"),
        ]);
        let topics = map.resolve(&answers(&["yoga", "unknown_xyz", "dormitory", "living alone"]));
        assert_eq!(topics, vec!["yoga".to_string(), "housing".to_string()]);
        assert!(map.resolve(&answers(&["unknown_xyz"])).is_empty());
    }

    #[test]
    fn colliding_json_labels_resolve_by_key_order() {
        let map = TopicMap::from_json_str(r#"{"Yoga ": "later", " yoga": "earlier"}"#);
        assert_eq!(map.lookup("YOGA"), Some("earlier"));
        assert_eq!(map.lookup("Yoga "), Some("later"));
    }

    #[test]
    fn malformed_json_is_empty() {
        assert!(TopicMap::from_json_str("{not json").is_empty());
        assert!(TopicMap::from_json_str("[1, 2]").is_empty());
    }

    #[test]
    fn non_string_values_are_stringified() {
        let map = TopicMap::from_json_str(r#"{"a": "x", "b": 7}"#);
        assert_eq!(map.lookup("b"), Some("7"));
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_key("  Hiking /  Trekking "), "hiking / trekking");
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let map = TopicMap::load("/definitely/not/here/topic_map.json").await.unwrap();
        assert!(map.is_empty());
    }
}
