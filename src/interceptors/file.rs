use super::Interceptor;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Process-wide, so names stay unique across instances sharing a directory.
static SEQ: AtomicUsize = AtomicUsize::new(0);

/// Writes each exchange to `<base_path>/quiz_<timestamp>_<pid>_<seq>.md`.
/// Existing files are never overwritten.
#[derive(Debug)]
pub struct FileInterceptor {
    base_path: PathBuf,
}

impl FileInterceptor {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Interceptor for FileInterceptor {
    async fn save(&self, prompt: &str, response: &str) -> anyhow::Result<()> {
        let timestamp = Utc::now();
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let filename = format!(
            "quiz_{}_{}_{:04}.md",
            timestamp.format("%Y%m%d_%H%M%S_%3f"),
            std::process::id(),
            seq
        );
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path)
            .await
            .with_context(|| format!("creating transcript directory {}", self.base_path.display()))?;

        let content = format!(
            "# Prompt\n\n{}\n\n# Response\n\n{}\n",
            prompt,
            response
        );

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .with_context(|| format!("creating transcript file {}", file_path.display()))?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        debug!(target: "quizify::interceptor", path = %file_path.display(), "Saved transcript");
        Ok(())
    }
}
