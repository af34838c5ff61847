//! Error types for the generation pipeline.

use crate::llm_client::LlmError;
use thiserror::Error;

/// Message used when the provider fails without anything worth showing
pub const GENERIC_SERVER_ERROR: &str = "Server error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{0} is required")]
    MissingRequiredField(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Server misconfig: {0}")]
    ProviderMisconfigured(String),

    #[error("{0}")]
    ProviderCallFailed(String),

    #[error("Provider output missing required field: {0}")]
    OutputShapeViolation(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Request timed out")]
    RequestTimeout,
}

impl GenerationError {
    /// HTTP-style status for the caller
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationError::MissingRequiredField(_) | GenerationError::InvalidRequest(_) => 400,
            GenerationError::RequestTimeout => 408,
            GenerationError::PayloadTooLarge => 413,
            GenerationError::ProviderMisconfigured(_)
            | GenerationError::ProviderCallFailed(_)
            | GenerationError::OutputShapeViolation(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Wrap a provider message, falling back to the generic text when blank
    pub fn provider_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            GenerationError::ProviderCallFailed(GENERIC_SERVER_ERROR.to_string())
        } else {
            GenerationError::ProviderCallFailed(message)
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        GenerationError::provider_failed(err.to_string())
    }
}
