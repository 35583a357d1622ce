use async_trait::async_trait;
use std::fmt::Debug;

/// Receives every prompt/raw-response pair a generator exchanges with the model.
/// Failures are logged by the caller and never abort a generation.
#[async_trait]
pub trait Interceptor: Send + Sync + Debug {
    async fn save(&self, prompt: &str, response: &str) -> anyhow::Result<()>;
}

pub mod file;
pub mod memory;
pub use file::FileInterceptor;
pub use memory::{MemoryInterceptor, Transcript};
