use super::ExamSink;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::session::ExamSession;

/// Writes each session as `exam_<timestamp>.md` under `base_path`.
#[derive(Debug, Clone)]
pub struct FileSink {
    base_path: PathBuf,
}

impl FileSink {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Write `session` and return the path of the new file.
    pub async fn write(&self, session: &ExamSession) -> std::io::Result<PathBuf> {
        let timestamp = Utc::now();
        let filename = format!("exam_{}.md", timestamp.format("%Y%m%d_%H%M%S_%3f"));
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path).await?;

        let content = render_markdown(session, timestamp);
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        info!(path = %file_path.display(), "Saved exam");
        Ok(file_path)
    }
}

#[async_trait]
impl ExamSink for FileSink {
    async fn save(&self, session: &ExamSession) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write(session).await?;
        Ok(())
    }
}

pub fn render_markdown(session: &ExamSession, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# OPIc Mock Exam\n");
    let _ = writeln!(out, "Generated: {}\n", generated_at.to_rfc3339());
    let _ = writeln!(out, "Profile: {}\n", session.survey().profile_summary());
    for pair in session.qa_pairs() {
        let _ = writeln!(out, "## Q{}\n\n{}\n", pair.position, pair.question);
        if !pair.answer.trim().is_empty() {
            let _ = writeln!(out, "**Answer:** {}\n", pair.answer.trim());
        }
    }
    out
}
