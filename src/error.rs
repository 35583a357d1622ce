use thiserror::Error;

use crate::quiz::McqIssue;

/// Message shown to end users for every generation failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate quiz. Please try again later.";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Content is empty")]
    EmptyContent,
    #[error("Transport error (status {}): {message}", display_status(.status))]
    Transport { status: Option<u16>, message: String },
    #[error("No content returned from the model")]
    EmptyResponse,
    #[error("Failed to parse model response: {0}")]
    Parse(#[from] ParseError),
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl GenerationError {
    /// Short diagnostic tag for logs and tests.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::EmptyContent => "empty_content",
            Self::Transport { .. } => "transport",
            Self::EmptyResponse => "empty_response",
            Self::Parse(_) => "parse",
        }
    }

    /// The message to surface to users, regardless of cause.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<AIError> for GenerationError {
    fn from(err: AIError) -> Self {
        match err {
            AIError::Gemini(GeminiError::Http(message)) => Self::Transport { status: None, message },
            AIError::Gemini(GeminiError::Status { status, body }) => {
                Self::Transport { status: Some(status), message: body }
            }
            AIError::Gemini(GeminiError::RateLimit) => Self::Transport {
                status: Some(429),
                message: "rate limit exceeded".to_string(),
            },
            AIError::Gemini(GeminiError::Authentication) => Self::Transport {
                status: Some(401),
                message: "authentication failed".to_string(),
            },
            AIError::Gemini(GeminiError::MissingKey { key_name }) => {
                Self::Config(ConfigError::MissingCredential { key_name })
            }
            AIError::Gemini(GeminiError::Envelope(message)) => Self::Transport { status: None, message },
            AIError::Gemini(GeminiError::EmptyResponse) => Self::EmptyResponse,
            AIError::Mock(message) => Self::Transport { status: None, message },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing credential: set {key_name} in the environment or .env file")]
    MissingCredential { key_name: &'static str },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON: {source}. Raw response: {raw}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
    #[error("Quiz data not found. Raw response: {raw}")]
    MissingQuestions { raw: String },
    #[error("Malformed question at index {index}: {detail}")]
    MalformedElement { index: usize, detail: String },
    #[error("Invalid question at index {index}: {issue}")]
    InvalidQuestion { index: usize, issue: McqIssue },
}

impl ParseError {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } => "invalid_json",
            Self::MissingQuestions { .. } => "missing_questions",
            Self::MalformedElement { .. } => "malformed_element",
            Self::InvalidQuestion { .. } => "invalid_question",
        }
    }
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Gemini API error: {0}")]
    Gemini(#[from] GeminiError),
    #[error("Mock client error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
    #[error("No API key configured ({key_name})")]
    MissingKey { key_name: &'static str },
    #[error("No content returned from Gemini")]
    EmptyResponse,
    #[error("Unreadable response envelope: {0}")]
    Envelope(String),
}
