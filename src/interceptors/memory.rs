use super::Interceptor;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub prompt: String,
    pub response: String,
}

/// Keeps transcripts in memory; handy for tests and embedding callers.
#[derive(Debug, Default)]
pub struct MemoryInterceptor {
    transcripts: Mutex<Vec<Transcript>>,
}

impl MemoryInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcripts(&self) -> Vec<Transcript> {
        self.transcripts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Interceptor for MemoryInterceptor {
    async fn save(&self, prompt: &str, response: &str) -> anyhow::Result<()> {
        let mut transcripts = self
            .transcripts
            .lock()
            .map_err(|_| anyhow::anyhow!("transcript store poisoned"))?;
        transcripts.push(Transcript { prompt: prompt.to_string(), response: response.to_string() });
        Ok(())
    }
}
