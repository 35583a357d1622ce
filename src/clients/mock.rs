use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::core::LowLevelClient;
use crate::error::{AIError, ConfigError, GeminiError};

/// A scripted outcome for one `ask_raw` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The model answered with this text.
    Text(String),
    /// The service replied with a non-success status.
    Status(u16, String),
    /// The envelope carried no candidate text.
    Empty,
    /// The request never completed.
    NetworkFailure(String),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    fn into_result(self) -> Result<String, AIError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Status(status, body) => Err(AIError::Gemini(GeminiError::Status { status, body })),
            Self::Empty => Err(AIError::Gemini(GeminiError::EmptyResponse)),
            Self::NetworkFailure(message) => Err(AIError::Gemini(GeminiError::Http(message))),
        }
    }
}

/// Shared control surface for a `MockClient`: queue responses, inspect calls.
#[derive(Debug)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    configured: AtomicBool,
}

impl Default for MockHandle {
    fn default() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            configured: AtomicBool::new(true),
        }
    }
}

impl MockHandle {
    pub fn push(&self, response: MockResponse) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockResponse::text(text));
    }

    /// Number of `ask_raw` calls that reached the mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Simulate a missing credential: preflight fails while this is false.
    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }
}

/// Mock client for testing that replays scripted responses in order.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        for response in responses {
            handle.push(response);
        }
        (client, handle)
    }

    /// A mock whose preflight reports a missing credential.
    pub fn unconfigured() -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        handle.set_configured(false);
        (client, handle)
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.handle.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.handle.prompts.lock() {
            prompts.push(prompt);
        }
        let next = self.handle.responses.lock().ok().and_then(|mut q| q.pop_front());
        debug!(target: "quizify::mock", scripted = next.is_some(), "Mock client called");
        match next {
            Some(response) => response.into_result(),
            None => Err(AIError::Mock("no scripted response left".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }

    fn preflight(&self) -> Result<(), ConfigError> {
        if self.handle.configured.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ConfigError::MissingCredential { key_name: "MOCK_API_KEY" })
        }
    }
}
