//! Failure taxonomy for ContactOut enrichment calls.

use serde_json::{json, Value};
use thiserror::Error;

/// Every way an enrichment call can fail.
///
/// The `Display` text is the human-readable message handed back to the agent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrichmentError {
    #[error("ContactOut API token not configured. Please set CONTACTOUT_API_TOKEN environment variable.")]
    MissingCredential,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Out of credits or no access to endpoint. Please check your ContactOut subscription.")]
    OutOfCredits,

    #[error("Rate limit reached. Retry after {retry_after} seconds.")]
    RateLimited { retry_after: String },

    #[error("HTTP error: {status_code}")]
    Http { status_code: u16 },

    /// Email lookup answered 2xx without a profile.
    #[error("No LinkedIn profile found for email: {email}")]
    NotFound {
        email: String,
        status_code: Value,
        details: Value,
    },

    /// Profile-URL lookup answered 2xx without a profile.
    #[error("API returned status code {code}")]
    UpstreamStatus { code: String, details: Value },

    #[error("Failed to call ContactOut API: {message}")]
    Transport { message: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl EnrichmentError {
    pub fn invalid_url() -> Self {
        Self::InvalidInput(
            "Invalid LinkedIn URL. Please provide a regular LinkedIn profile URL (not Sales Navigator, Talent, or Recruiter URLs)."
                .to_string(),
        )
    }

    pub fn invalid_email() -> Self {
        Self::InvalidInput("Invalid email format provided.".to_string())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidInput(_) => "invalid_input",
            Self::OutOfCredits => "out_of_credits",
            Self::RateLimited { .. } => "rate_limited",
            Self::Http { .. } => "http_error",
            Self::NotFound { .. } => "not_found",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::Transport { .. } => "transport_error",
            Self::Unexpected { .. } => "unexpected_error",
        }
    }

    /// Error mapping returned to the agent in place of a profile.
    ///
    /// Not-found email lookups carry the provider's `status_code`; URL lookups
    /// carry the raw body under `details`.
    pub fn to_tool_value(&self) -> Value {
        let mut value = json!({ "error": self.to_string() });
        match self {
            Self::NotFound { status_code, .. } => {
                value["status_code"] = status_code.clone();
            }
            Self::UpstreamStatus { details, .. } => {
                value["details"] = details.clone();
            }
            _ => {}
        }
        value
    }
}

impl From<EnrichmentError> for lr_core::Error {
    fn from(err: EnrichmentError) -> Self {
        let message = err.to_string();
        match err {
            EnrichmentError::MissingCredential => lr_core::Error::auth(message),
            EnrichmentError::InvalidInput(_) => lr_core::Error::invalid_request(message),
            EnrichmentError::OutOfCredits => lr_core::Error::api(403, message),
            EnrichmentError::RateLimited { .. } => lr_core::Error::rate_limit(message),
            EnrichmentError::Http { status_code } => lr_core::Error::api(status_code, message),
            EnrichmentError::NotFound { .. } | EnrichmentError::UpstreamStatus { .. } => {
                lr_core::Error::not_found(message)
            }
            EnrichmentError::Transport { .. } => lr_core::Error::network(message),
            EnrichmentError::Unexpected { .. } => lr_core::Error::Unknown(message),
        }
    }
}
