use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembler::{Exam, ExamAssembler};
use crate::error::{ExamError, SessionError};
use crate::survey::SurveyData;

/// A question and its answer, keyed by 1-based position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub position: usize,
    pub question: String,
    pub answer: String,
}

/// Per-user exam state: the survey it was built from, the exam, and answers so far.
#[derive(Debug, Clone, Serialize)]
pub struct ExamSession {
    survey: SurveyData,
    exam: Exam,
    answers: BTreeMap<usize, String>,
}

impl ExamSession {
    pub fn new(survey: SurveyData, exam: Exam) -> Self {
        Self { survey, exam, answers: BTreeMap::new() }
    }

    /// Assemble an exam for `survey` and open a session around it.
    pub async fn start(assembler: &ExamAssembler, survey: SurveyData, seed: Option<u64>) -> Result<Self, ExamError> {
        let exam = assembler.assemble(&survey.selected_answers(), seed).await?;
        Ok(Self::new(survey, exam))
    }

    pub fn survey(&self) -> &SurveyData {
        &self.survey
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    /// Store (or replace) the answer at `position`.
    pub fn record_answer(&mut self, position: usize, answer: impl Into<String>) -> Result<(), SessionError> {
        if position == 0 || position > self.exam.len() {
            return Err(SessionError::PositionOutOfRange { position, len: self.exam.len() });
        }
        debug!(position, "Recording answer");
        self.answers.insert(position, answer.into());
        Ok(())
    }

    pub fn answer(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(String::as_str)
    }

    pub fn answered(&self) -> usize {
        self.answers.values().filter(|a| !a.trim().is_empty()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == self.exam.len()
    }

    /// All questions with their answers, unanswered ones left empty.
    pub fn qa_pairs(&self) -> Vec<QaPair> {
        self.exam
            .iter()
            .enumerate()
            .map(|(i, question)| QaPair {
                position: i + 1,
                question: question.clone(),
                answer: self.answers.get(&(i + 1)).cloned().unwrap_or_default(),
            })
            .collect()
    }
}
