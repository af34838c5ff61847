//! Provider output parsing.
//!
//! Models asked for JSON still wrap it in a Markdown fence now and then, so the
//! fence is stripped before parsing.

use crate::error::GenerationError;
use crate::prompts::{BuiltPrompt, PromptMode};
use crate::types::GeneratedContent;
use serde::de::DeserializeOwned;

/// Remove a surrounding ```/```json fence if present
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    match body.find('\n') {
        Some(idx) => body[idx + 1..].trim(),
        None => body.trim(),
    }
}

/// Parse a JSON object out of provider text
pub fn parse_json_object(text: &str) -> Result<serde_json::Map<String, serde_json::Value>, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        GenerationError::provider_failed(format!("Provider returned invalid JSON: {}", e))
    })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(GenerationError::OutputShapeViolation(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Turn raw provider text into `GeneratedContent` for the prompt that produced it.
///
/// Text is returned as the provider sent it; whitespace only matters for
/// deciding whether a field is blank.
pub fn parse_generated_content(
    prompt: &BuiltPrompt,
    wants_simulation: bool,
    text: &str,
) -> Result<GeneratedContent, GenerationError> {
    match prompt.mode {
        PromptMode::Simple => {
            if is_blank(text) {
                return Err(GenerationError::OutputShapeViolation("content".to_string()));
            }
            Ok(GeneratedContent {
                content: text.to_string(),
                prompt_simulation: None,
            })
        }
        PromptMode::Extended => {
            let map = parse_json_object(text)?;

            let content = map
                .get("content")
                .and_then(|v| v.as_str())
                .filter(|s| !is_blank(s))
                .ok_or_else(|| GenerationError::OutputShapeViolation("content".to_string()))?;

            let prompt_simulation = if wants_simulation {
                map.get("promptSimulation")
                    .and_then(|v| v.as_str())
                    .filter(|s| !is_blank(s))
                    .map(str::to_string)
            } else {
                None
            };

            Ok(GeneratedContent {
                content: content.to_string(),
                prompt_simulation,
            })
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Deserialize provider JSON into a typed record, reporting the missing field
pub fn parse_record<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let map = parse_json_object(text)?;
    serde_json::from_value(serde_json::Value::Object(map))
        .map_err(|e| GenerationError::OutputShapeViolation(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
