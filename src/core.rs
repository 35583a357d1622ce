//! Quiz generation: wraps a low-level model client with prompt construction
//! and tolerant response normalization.
//!
//! Quick start:
//! - `generate_quiz(client, content, quiz_type)` for a one-off generation
//! - `QuizGenerator` when you want a reusable, configured generator
//!   (validation policy, transcript interceptor)

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Validation;
use crate::error::{AIError, ConfigError, GenerationError};
use crate::interceptors::Interceptor;
use crate::normalize::normalize_with;
use crate::prompt::build_prompt;
use crate::quiz::{Quiz, QuizRequest, QuizType};

/// Low-level model client abstraction.
///
/// Implementors provide `ask_raw`, which sends a prompt and returns the raw
/// model text. Everything quiz-specific happens in `QuizGenerator`.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// Send one prompt and return the model's text. No retries.
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;

    /// Check that the client is configured well enough to attempt a call.
    /// Runs before any prompt is built or sent.
    fn preflight(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }

    fn preflight(&self) -> Result<(), ConfigError> {
        self.as_ref().preflight()
    }
}

/// Composes prompt building, a single remote call, and normalization.
#[derive(Clone, Debug)]
pub struct QuizGenerator<C: LowLevelClient> {
    client: C,
    validation: Validation,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<C: LowLevelClient> QuizGenerator<C> {
    pub fn new(client: C) -> Self {
        info!(target: "quizify::generator", "Creating new QuizGenerator");
        Self { client, validation: Validation::default(), interceptor: None }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Record every prompt/raw-response pair with the given interceptor.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Generate a quiz for a validated request.
    #[instrument(target = "quizify::generator", skip(self, request), fields(content_len = request.content().len(), quiz_type = %request.quiz_type()))]
    pub async fn generate(&self, request: &QuizRequest) -> Result<Quiz, GenerationError> {
        let result = self.generate_inner(request).await;
        match &result {
            Ok(quiz) => info!(target: "quizify::generator", questions = quiz.len(), "Quiz generated"),
            Err(e) => error!(target: "quizify::generator", reason = e.reason(), error = %e, "Quiz generation failed"),
        }
        result
    }

    /// Validate `content` and generate a quiz from it.
    pub async fn generate_from(&self, content: &str, quiz_type: QuizType) -> Result<Quiz, GenerationError> {
        // Configuration problems take precedence over content problems.
        let request = self
            .client
            .preflight()
            .map_err(GenerationError::from)
            .and_then(|_| QuizRequest::new(content, quiz_type));
        match request {
            Ok(request) => self.generate(&request).await,
            Err(e) => {
                error!(target: "quizify::generator", reason = e.reason(), error = %e, "Quiz request rejected");
                Err(e)
            }
        }
    }

    async fn generate_inner(&self, request: &QuizRequest) -> Result<Quiz, GenerationError> {
        self.client.preflight()?;

        let prompt = build_prompt(request.content(), request.quiz_type());
        debug!(target: "quizify::generator", prompt_len = prompt.len(), "Built prompt");

        let raw = self.client.ask_raw(prompt.clone()).await?;
        debug!(target: "quizify::generator", response_len = raw.len(), "Received raw response");

        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(&prompt, &raw).await {
                warn!(target: "quizify::generator", error = %e, "Interceptor failed to save transcript");
            }
        }

        Ok(normalize_with(&raw, request.quiz_type(), self.validation)?)
    }
}

/// One-shot generation with default settings.
pub async fn generate_quiz<C: LowLevelClient>(
    client: C,
    content: &str,
    quiz_type: QuizType,
) -> Result<Quiz, GenerationError> {
    QuizGenerator::new(client).generate_from(content, quiz_type).await
}
