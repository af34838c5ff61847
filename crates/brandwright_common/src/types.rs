//! Request and response records for brand content generation.
//!
//! `RawBrandContentRequest` is what arrives on the wire: every field optional,
//! text fields lenient about their JSON type. `BrandContentRequest` is the
//! canonical record produced by `normalize`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Enumerations
// ============================================================================

/// Voice the copy is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrandTone {
    Witty,
    Professional,
    #[default]
    Friendly,
}

impl BrandTone {
    pub const ALL: [BrandTone; 3] = [BrandTone::Witty, BrandTone::Professional, BrandTone::Friendly];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrandTone::Witty => "Witty",
            BrandTone::Professional => "Professional",
            BrandTone::Friendly => "Friendly",
        }
    }

    /// Exact, case-sensitive match against the permitted literals
    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.as_str() == value)
    }
}

/// Kind of marketing copy to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    #[serde(rename = "Instagram Caption")]
    InstagramCaption,
    #[serde(rename = "Blog Post")]
    BlogPost,
    #[serde(rename = "Ad Copy")]
    AdCopy,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::InstagramCaption,
        ContentType::BlogPost,
        ContentType::AdCopy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::InstagramCaption => "Instagram Caption",
            ContentType::BlogPost => "Blog Post",
            ContentType::AdCopy => "Ad Copy",
        }
    }

    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// Length preference, mapped to a word range by the prompt builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ContentLength {
    pub const ALL: [ContentLength; 3] = [ContentLength::Short, ContentLength::Medium, ContentLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLength::Short => "Short",
            ContentLength::Medium => "Medium",
            ContentLength::Long => "Long",
        }
    }

    pub fn from_literal(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|len| len.as_str() == value)
    }

    /// Target word range, en dash separated
    pub fn word_range(&self) -> &'static str {
        match self {
            ContentLength::Short => "50–80",
            ContentLength::Medium => "120–180",
            ContentLength::Long => "250–350",
        }
    }
}

macro_rules! impl_display_literal {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_literal!(BrandTone, ContentType, ContentLength);

// ============================================================================
// Raw Request (wire shape)
// ============================================================================

/// Submission exactly as the client sent it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBrandContentRequest {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub brand_tone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content_length: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub campaign_goal: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(
        default,
        rename = "enableGenAIStructure",
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_genai_structure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulate_prompt: Option<bool>,
}

impl RawBrandContentRequest {
    /// Whether the submission carries either feature flag
    pub fn has_feature_flags(&self) -> bool {
        self.enable_genai_structure.is_some() || self.simulate_prompt.is_some()
    }
}

/// Accept any JSON scalar as text; null, arrays and objects count as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    })
}

// ============================================================================
// Canonical Request
// ============================================================================

/// Optional behaviors of the extended prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(rename = "enableGenAIStructure")]
    pub enable_genai_structure: bool,
    pub simulate_prompt: bool,
}

/// Normalized submission. Only `normalize` constructs these from client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandContentRequest {
    pub brand_name: String,
    pub brand_tone: BrandTone,
    pub content_type: ContentType,
    pub content_length: ContentLength,
    pub campaign_goal: Option<String>,
    pub keywords: Option<String>,
    /// Present only for the extended flow
    pub features: Option<FeatureFlags>,
}

impl BrandContentRequest {
    pub fn is_extended(&self) -> bool {
        self.features.is_some()
    }

    pub fn wants_prompt_simulation(&self) -> bool {
        self.features.map(|f| f.simulate_prompt).unwrap_or(false)
    }
}

impl From<&BrandContentRequest> for RawBrandContentRequest {
    fn from(req: &BrandContentRequest) -> Self {
        Self {
            brand_name: Some(req.brand_name.clone()),
            brand_tone: Some(req.brand_tone.as_str().to_string()),
            content_type: Some(req.content_type.as_str().to_string()),
            content_length: Some(req.content_length.as_str().to_string()),
            campaign_goal: req.campaign_goal.clone(),
            keywords: req.keywords.clone(),
            enable_genai_structure: req.features.map(|f| f.enable_genai_structure),
            simulate_prompt: req.features.map(|f| f.simulate_prompt),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Successful generation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_simulation: Option<String>,
}

/// Error envelope returned to HTTP callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
