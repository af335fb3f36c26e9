//! Question pools keyed by category and topic.
//!
//! A [`QuestionBank`] hides where questions come from. Two sources ship with the
//! crate, a JSON file ([`JsonFileBank`]) and a document store ([`StoreBank`]);
//! [`open_bank`] picks one from [`ExamConfig`].

use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ExamConfig;
use crate::error::BankError;
use crate::sampling::dedup;

pub mod file;
pub mod mock;
pub mod store;

pub use file::JsonFileBank;
pub use mock::MockBank;
pub use store::{DocumentStore, InMemoryStore, QuestionDocument, StoreBank};

/// Closed set of question categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Survey,
    RolePlay,
    RandomQuestion,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Survey, Category::RolePlay, Category::RandomQuestion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Survey => "survey",
            Category::RolePlay => "role_play",
            Category::RandomQuestion => "random_question",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown category: '{}'. Supported: survey, role_play, random_question", s))
    }
}

/// Source of candidate questions.
///
/// Implementors provide `fetch`, returning whatever the backing data holds for
/// `(category, topic)` or for the whole category when `topic` is `None`. An
/// empty result is not an error. Callers normally go through `fetch_pool`,
/// which deduplicates.
#[async_trait]
pub trait QuestionBank: Send + Sync + Debug {
    async fn fetch(&self, category: Category, topic: Option<&str>) -> Result<Vec<String>, BankError>;

    /// Clone this bank into a boxed trait object
    fn clone_box(&self) -> Box<dyn QuestionBank>;

    /// Deduplicated pool, first occurrence wins.
    async fn fetch_pool(&self, category: Category, topic: Option<&str>) -> Result<Vec<String>, BankError> {
        let raw = self.fetch(category, topic).await?;
        Ok(dedup(&raw))
    }
}

impl Clone for Box<dyn QuestionBank> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl QuestionBank for Box<dyn QuestionBank> {
    async fn fetch(&self, category: Category, topic: Option<&str>) -> Result<Vec<String>, BankError> {
        self.as_ref().fetch(category, topic).await
    }

    fn clone_box(&self) -> Box<dyn QuestionBank> {
        self.as_ref().clone_box()
    }
}

/// Which bank implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BankSource {
    #[default]
    File,
    Store,
}

impl FromStr for BankSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "store" | "db" | "database" => Ok(Self::Store),
            _ => Err(format!("Unknown bank source: '{}'. Supported: file, store", s)),
        }
    }
}

impl fmt::Display for BankSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankSource::File => write!(f, "file"),
            BankSource::Store => write!(f, "store"),
        }
    }
}

/// Open the bank selected by `config`.
pub async fn open_bank(config: &ExamConfig) -> Result<Box<dyn QuestionBank>, BankError> {
    info!(source = %config.bank_source, path = %config.bank_path.display(), "Opening question bank");
    let bank: Box<dyn QuestionBank> = match config.bank_source {
        BankSource::File => Box::new(JsonFileBank::load(&config.bank_path).await?),
        BankSource::Store => {
            let store = InMemoryStore::load_seed(&config.bank_path).await?;
            Box::new(StoreBank::new(store))
        }
    };
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip_through_serde() {
        let json = serde_json::to_string(&Category::RandomQuestion).unwrap();
        assert_eq!(json, "\"random_question\"");
        assert_eq!("role_play".parse::<Category>().unwrap(), Category::RolePlay);
        assert!("roleplay".parse::<Category>().is_err());
    }

    #[test]
    fn bank_source_aliases() {
        assert_eq!("JSON".parse::<BankSource>().unwrap(), BankSource::File);
        assert_eq!("database".parse::<BankSource>().unwrap(), BankSource::Store);
    }

    #[tokio::test]
    async fn fetch_pool_dedups_preserving_order() {
        let bank = MockBank::new().with_pool(
            Category::Survey,
            Some("travel"),
            ["b", "a", "b", "c", "a"],
        );
        let pool = bank.fetch_pool(Category::Survey, Some("travel")).await.unwrap();
        assert_eq!(pool, vec!["b", "a", "c"]);
    }
}
