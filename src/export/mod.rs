use async_trait::async_trait;
use std::fmt::Debug;

use crate::session::ExamSession;

/// Destination for finished or in-progress exam sessions.
#[async_trait]
pub trait ExamSink: Send + Sync + Debug {
    async fn save(&self, session: &ExamSession) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub mod file;
pub use file::{render_markdown, FileSink};
