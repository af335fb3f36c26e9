use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExamError {
    #[error("Exam integrity error: expected {expected} questions, assembled {actual}")]
    Integrity { expected: usize, actual: usize },
    #[error("Question bank error: {0}")]
    Bank(#[from] BankError),
}

#[derive(Error, Debug)]
pub enum BankError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Document store error: {0}")]
    Store(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(String),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Question position {position} is out of range 1..={len}")]
    PositionOutOfRange { position: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] OpenAIError),
    #[error("Mock client error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}
