//! Optional language-model expansion of question pools.
//!
//! Given a non-empty pool, the expander asks a model for a few more questions in
//! the same style. Failures never reach the caller; the pool is simply left as is.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::bank::Category;
use crate::clients::LowLevelClient;
use crate::json_utils::extract_first;

/// Reply shape requested from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Generated Questions", description = "New OPIc-style exam questions")]
pub struct GeneratedQuestions {
    /// Open-ended questions, one sentence or short paragraph each
    #[schemars(description = "New questions similar in style and difficulty to the samples")]
    pub questions: Vec<String>,
}

/// Questions requested per expanded pool.
const GENERATED_PER_POOL: usize = 3;

#[derive(Debug, Clone)]
pub struct QuestionExpander<C> {
    client: C,
}

impl<C: LowLevelClient> QuestionExpander<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn boxed(self) -> QuestionExpander<Box<dyn LowLevelClient>>
    where
        C: 'static,
    {
        QuestionExpander { client: Box::new(self.client) }
    }

    pub fn prompt(&self, category: Category, topic: &str, samples: &[String]) -> String {
        let context = samples.iter().map(|q| format!("- {q}")).collect::<Vec<_>>().join("\n");
        let schema = serde_json::to_string_pretty(&schema_for!(GeneratedQuestions))
            .unwrap_or_else(|_| "{\"questions\": [\"...\"]}".to_string());
        format!(
            "You are an OPIc question generator.\n\n\
             Here are some sample questions about the topic '{topic}' in category '{category}':\n\
             {context}\n\n\
             Now, generate {count} new OPIc-style questions that are similar in style and difficulty. \
             Make sure they are open-ended and not duplicates of the examples.\n\n\
             Respond with a JSON object matching this schema:\n{schema}",
            count = GENERATED_PER_POOL,
        )
    }

    /// New questions for `pool`, excluding anything already in it. Empty pools are not expanded.
    #[instrument(skip(self, pool), fields(pool_len = pool.len()))]
    pub async fn expand(&self, category: Category, topic: &str, pool: &[String]) -> Vec<String> {
        if pool.is_empty() {
            return Vec::new();
        }

        let raw = match self.client.ask_raw(self.prompt(category, topic, pool)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, %category, topic, "Question expansion failed, keeping bank questions only");
                return Vec::new();
            }
        };

        let candidates = match extract_first::<GeneratedQuestions>(&raw) {
            Some(parsed) => parsed.questions,
            None => parse_lines(&raw),
        };
        let generated: Vec<String> = candidates
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty() && !pool.contains(q))
            .take(GENERATED_PER_POOL)
            .collect();
        debug!(generated = generated.len(), "Expanded question pool");
        generated
    }
}

/// Plain-text replies: one question per line, list markers stripped.
fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| strip_list_marker(line.trim()).trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('{') && !line.starts_with('}'))
        .collect()
}

/// Drop a leading `1.` / `2)` / `-` / `*` marker. Text that merely starts with a
/// number is left alone.
fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(['-', '*']) {
        if rest.starts_with(char::is_whitespace) {
            return rest;
        }
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(after) = rest.strip_prefix(['.', ')']) {
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                return after;
            }
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{MockClient, MockResponse};

    fn pool() -> Vec<String> {
        vec!["Where do you like to travel?".to_string(), "Who do you travel with?".to_string()]
    }

    #[tokio::test]
    async fn parses_json_reply_and_skips_known_questions() {
        let (client, handle) = MockClient::with_responses(vec![MockResponse::Success(
            r#"Here: {"questions": ["Where do you like to travel?", "What was your best trip?", " "]}"#.to_string(),
        )]);
        let expander = QuestionExpander::new(client);
        let extra = expander.expand(Category::Survey, "travel", &pool()).await;
        assert_eq!(extra, vec!["What was your best trip?"]);
        assert!(handle.prompts()[0].contains("- Who do you travel with?"));
    }

    #[tokio::test]
    async fn falls_back_to_line_parsing() {
        let (client, _handle) = MockClient::with_responses(vec![MockResponse::Success(
            "1. Describe your last trip.\n2. What do you pack?\n- How do you plan a trip?\n4. Extra one".to_string(),
        )]);
        let extra = QuestionExpander::new(client).expand(Category::Survey, "travel", &pool()).await;
        assert_eq!(
            extra,
            vec!["Describe your last trip.", "What do you pack?", "How do you plan a trip?"]
        );
    }

    #[test]
    fn list_markers_are_stripped_but_leading_numbers_kept() {
        let lines = parse_lines("1. First?\n2) Second?\n* Third?\n5 things you pack for a trip?\n-5 degrees: how do you stay warm?");
        assert_eq!(
            lines,
            vec![
                "First?",
                "Second?",
                "Third?",
                "5 things you pack for a trip?",
                "-5 degrees: how do you stay warm?",
            ]
        );
    }

    #[tokio::test]
    async fn errors_and_empty_pools_yield_nothing() {
        let (client, handle) = MockClient::with_responses(vec![MockResponse::Error("boom".into())]);
        let expander = QuestionExpander::new(client);
        assert!(expander.expand(Category::Survey, "travel", &[]).await.is_empty());
        assert_eq!(handle.call_count(), 0);
        assert!(expander.expand(Category::Survey, "travel", &pool()).await.is_empty());
        assert_eq!(handle.call_count(), 1);
    }
}
