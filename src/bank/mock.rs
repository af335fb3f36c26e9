use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{Category, QuestionBank};
use crate::error::BankError;

/// Scripted bank for tests: exact `(category, topic)` lookups, a fetch counter,
/// and an optional forced failure.
#[derive(Debug, Clone, Default)]
pub struct MockBank {
    pools: HashMap<(Category, Option<String>), Vec<String>>,
    fetches: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl MockBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bank whose every fetch fails with `BankError::Store(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::default() }
    }

    pub fn with_pool<I, S>(mut self, category: Category, topic: Option<&str>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pools.insert(
            (category, topic.map(str::to_string)),
            items.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionBank for MockBank {
    async fn fetch(&self, category: Category, topic: Option<&str>) -> Result<Vec<String>, BankError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(BankError::Store(message.clone()));
        }
        Ok(self
            .pools
            .get(&(category, topic.map(str::to_string)))
            .cloned()
            .unwrap_or_default())
    }

    fn clone_box(&self) -> Box<dyn QuestionBank> {
        Box::new(self.clone())
    }
}
