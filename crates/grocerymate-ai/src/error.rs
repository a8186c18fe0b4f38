use grocerymate_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("No LLM API key found. Set GEMINI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    NotConfigured,

    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("No response from {0}")]
    EmptyResponse(&'static str),

    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Generated recipe is invalid: {}", format_errors(.0))]
    InvalidRecipe(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AiError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Rate limiting and server-side failures are retried; other client
    /// errors (bad key, bad request) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::EmptyResponse(_) | Self::InvalidJson(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::NotConfigured | Self::InvalidRecipe(_) => false,
        }
    }

    /// The model answered but its output was unusable.
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, Self::InvalidJson(_) | Self::InvalidRecipe(_))
    }
}
