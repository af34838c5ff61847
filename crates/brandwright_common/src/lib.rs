//! Brandwright Common - request normalization, prompt building and the
//! generative-text client shared by the daemon and its tests.

pub mod config;
pub mod error;
pub mod insights;
pub mod llm_client;
pub mod normalize;
pub mod prompts;
pub mod response;
pub mod types;

pub use config::Config;
pub use error::GenerationError;
pub use llm_client::{
    FakeTextGenerator, GeminiClient, GenerationRequest, LlmError, ResponseFormat, TextGenerator,
};
pub use normalize::{normalize, normalize_keywords, normalize_with_defaults};
pub use prompts::{build_prompt, BuiltPrompt, PromptMode};
pub use types::*;
