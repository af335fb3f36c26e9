//! Fixed-template exam assembly.
//!
//! An exam is built front to back in one pass: the self-introduction, three
//! survey topics with three questions each, a role-play scenario, and random
//! questions up to the template total. Short pools are padded with fallback
//! templates, repeating them once every distinct one has been placed.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::bank::{Category, QuestionBank};
use crate::clients::LowLevelClient;
use crate::error::ExamError;
use crate::expander::QuestionExpander;
use crate::fallback::{capacity, fallback};
use crate::sampling::{dedup, sample};
use crate::topics::{normalize_key, TopicCatalog, TopicMap};

pub const SELF_INTRODUCTION: &str = "Tell me about yourself.";

/// Topic used when neither the survey nor the catalog supplies one.
const GENERIC_TOPIC: &str = "everyday life";
const GENERIC_SCENARIO: &str = "an everyday situation";
const GENERIC_THEME: &str = "current events";

/// Shape of an exam. The random section takes whatever slots remain after the
/// intro, survey and role-play sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamTemplate {
    pub total: usize,
    pub survey_topics: usize,
    pub per_topic: usize,
    pub role_play: usize,
}

impl Default for ExamTemplate {
    fn default() -> Self {
        Self { total: 15, survey_topics: 3, per_topic: 3, role_play: 3 }
    }
}

/// An assembled exam. Positions are 1-based, matching how questions are presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Exam(Vec<String>);

impl Exam {
    pub fn questions(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        position.checked_sub(1).and_then(|i| self.0.get(i)).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Exam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, q) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "Q{}. {}", i + 1, q)?;
        }
        Ok(())
    }
}

/// Builds exams from survey answers, a topic map and a question bank.
#[derive(Debug, Clone)]
pub struct ExamAssembler {
    topic_map: TopicMap,
    bank: Box<dyn QuestionBank>,
    catalog: TopicCatalog,
    template: ExamTemplate,
    expander: Option<QuestionExpander<Box<dyn LowLevelClient>>>,
}

impl ExamAssembler {
    pub fn new<B: QuestionBank + 'static>(topic_map: TopicMap, bank: B, catalog: TopicCatalog) -> Self {
        Self {
            topic_map,
            bank: Box::new(bank),
            catalog,
            template: ExamTemplate::default(),
            expander: None,
        }
    }

    pub fn with_template(mut self, template: ExamTemplate) -> Self {
        self.template = template;
        self
    }

    /// Grow every non-empty pool with model-generated questions before sampling.
    pub fn with_expander<C: LowLevelClient + 'static>(mut self, expander: QuestionExpander<C>) -> Self {
        self.expander = Some(expander.boxed());
        self
    }

    /// Assemble an exam. The same seed and inputs always produce the same exam;
    /// `None` draws a fresh seed from the OS.
    #[instrument(skip(self, answers), fields(answer_count = answers.len()))]
    pub async fn assemble(&self, answers: &[String], seed: Option<u64>) -> Result<Exam, ExamError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.assemble_with_rng(answers, &mut rng).await
    }

    pub async fn assemble_with_rng<R: Rng + Send>(
        &self,
        answers: &[String],
        rng: &mut R,
    ) -> Result<Exam, ExamError> {
        let template = self.template;
        info!(total = template.total, "Assembling exam");
        let mut exam = vec![SELF_INTRODUCTION.to_string()];

        let topics = self.select_topics(answers, rng);
        debug!(?topics, "Selected survey topics");
        for topic in &topics {
            let questions = self
                .fill_section(Category::Survey, &[Some(topic.as_str())], topic, template.per_topic, &exam, rng)
                .await?;
            exam.extend(questions);
        }

        let scenario = self.catalog.role_play.choose(rng).cloned();
        let questions = self
            .fill_section(
                Category::RolePlay,
                &[scenario.as_deref(), None],
                scenario.as_deref().unwrap_or(GENERIC_SCENARIO),
                template.role_play,
                &exam,
                rng,
            )
            .await?;
        exam.extend(questions);

        let theme = self.catalog.random_question.choose(rng).cloned();
        let remaining = template.total.saturating_sub(exam.len());
        let questions = self
            .fill_section(
                Category::RandomQuestion,
                &[theme.as_deref(), None],
                theme.as_deref().unwrap_or(GENERIC_THEME),
                remaining,
                &exam,
                rng,
            )
            .await?;
        exam.extend(questions);

        if exam.len() < template.total {
            return Err(ExamError::Integrity { expected: template.total, actual: exam.len() });
        }
        exam.truncate(template.total);
        info!(questions = exam.len(), "Exam assembled");
        Ok(Exam(exam))
    }

    /// Pick `survey_topics` topics: resolved survey topics first, then catalog
    /// topics, then repeats of whatever was chosen.
    pub fn select_topics<R: Rng + ?Sized>(&self, answers: &[String], rng: &mut R) -> Vec<String> {
        let wanted = self.template.survey_topics;
        let resolved = self.topic_map.resolve(answers);
        let mut chosen = sample(&resolved, wanted, rng);

        if chosen.len() < wanted {
            let taken: Vec<String> = chosen.iter().map(|t| normalize_key(t)).collect();
            let candidates: Vec<String> = self
                .catalog
                .survey
                .iter()
                .filter(|t| !taken.contains(&normalize_key(t)))
                .cloned()
                .collect();
            let padding = sample(&candidates, wanted - chosen.len(), rng);
            debug!(resolved = resolved.len(), padded = padding.len(), "Padding survey topics from catalog");
            chosen.extend(padding);
        }

        if chosen.is_empty() && wanted > 0 {
            chosen.push(GENERIC_TOPIC.to_string());
        }
        let distinct = chosen.len();
        for i in distinct..wanted {
            let repeat = chosen[i % distinct].clone();
            chosen.push(repeat);
        }
        chosen
    }

    /// Exactly `n` questions for one section. Each lookup is tried in turn until one
    /// yields questions not already `placed`; fallback templates cover the rest.
    /// Templates are repeated only after every distinct one is in use.
    async fn fill_section<R: Rng + Send>(
        &self,
        category: Category,
        lookups: &[Option<&str>],
        label: &str,
        n: usize,
        placed: &[String],
        rng: &mut R,
    ) -> Result<Vec<String>, ExamError> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut pool = Vec::new();
        for topic in lookups {
            pool = self.bank.fetch_pool(category, *topic).await?;
            if let Some(expander) = &self.expander {
                let extra = expander.expand(category, label, &pool).await;
                pool.extend(extra);
                pool = dedup(&pool);
            }
            pool.retain(|q| !placed.contains(q));
            if !pool.is_empty() {
                break;
            }
        }

        let mut picked = sample(&pool, n, rng);
        if picked.len() < n {
            let missing = n - picked.len();
            warn!(%category, topic = label, pool = pool.len(), missing, "Filling short pool with fallback questions");
            let templates = fallback(category, label, capacity(category));
            let fresh: Vec<String> = templates
                .iter()
                .filter(|q| !picked.contains(*q) && !placed.contains(*q))
                .take(missing)
                .cloned()
                .collect();
            picked.extend(fresh);

            let short = n - picked.len();
            if short > 0 {
                debug!(%category, topic = label, short, "Fallback templates exhausted, repeating");
                picked.extend(templates.iter().cycle().take(short).cloned());
            }
        }
        debug!(%category, topic = label, count = picked.len(), "Section filled");
        Ok(picked)
    }
}
