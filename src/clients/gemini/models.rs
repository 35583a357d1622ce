#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeminiModel {
    #[default]
    Flash15,     // "gemini-1.5-flash"
    Pro15,       // "gemini-1.5-pro"
    Flash20,     // "gemini-2.0-flash"
    Override(String),
}

impl GeminiModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Flash15 => "gemini-1.5-flash",
            Self::Pro15 => "gemini-1.5-pro",
            Self::Flash20 => "gemini-2.0-flash",
            Self::Override(s) => s.as_str(),
        }
    }
}

impl From<&str> for GeminiModel {
    fn from(id: &str) -> Self {
        match id {
            "gemini-1.5-flash" => Self::Flash15,
            "gemini-1.5-pro" => Self::Pro15,
            "gemini-2.0-flash" => Self::Flash20,
            other => Self::Override(other.to_string()),
        }
    }
}
