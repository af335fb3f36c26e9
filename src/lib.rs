pub mod assembler;
pub mod bank;
pub mod clients;
pub mod config;
pub mod error;
pub mod expander;
pub mod export;
pub mod fallback;
pub mod json_utils;
pub mod sampling;
pub mod session;
pub mod survey;
pub mod topics;

// Convenient re-exports
pub use assembler::{Exam, ExamAssembler, ExamTemplate, SELF_INTRODUCTION};
pub use bank::{open_bank, Category, QuestionBank};
pub use config::ExamConfig;
pub use error::ExamError;
pub use session::{ExamSession, QaPair};
pub use survey::SurveyData;
pub use topics::{TopicCatalog, TopicMap};
