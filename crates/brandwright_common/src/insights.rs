//! Auxiliary analysis flows: trending-query discovery, visibility review and
//! citation optimization.
//!
//! Every field of every insight request is required; validation is
//! trim-then-require, like `brandName` in the main flow.

use crate::error::GenerationError;
use crate::llm_client::ResponseFormat;
use crate::prompts::{BuiltPrompt, PromptMode};
use serde::{Deserialize, Serialize};

/// Number of queries the trending-query prompt asks for
pub const TRENDING_QUERY_COUNT: usize = 5;

// ============================================================================
// Requests and Outputs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQueriesRequest {
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQueries {
    pub trending_queries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityReviewRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilitySuggestions {
    pub suggestions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationReviewRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub primary_keyword: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationSuggestions {
    pub suggested_internal_links: Vec<String>,
    pub suggested_external_links: Vec<String>,
    pub citation_opportunities: String,
    pub optimized_content_snippet: String,
}

fn require<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, GenerationError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(GenerationError::MissingRequiredField(field))
}

fn json_prompt(text: String) -> BuiltPrompt {
    BuiltPrompt {
        text,
        mode: PromptMode::Extended,
        response_format: ResponseFormat::Json,
    }
}

// ============================================================================
// Prompt Builders
// ============================================================================

pub fn build_trending_queries_prompt(
    req: &TrendingQueriesRequest,
) -> Result<BuiltPrompt, GenerationError> {
    let industry = require(&req.industry, "industry")?;

    Ok(json_prompt(format!(
        "You are an expert in identifying trending search queries.\n\
         Given the following industry, identify the top {} trending search queries that are relevant to the industry.\n\
         Industry: {}\n\
         Respond with a JSON object with a 'trendingQueries' field holding the queries as a list of strings.",
        TRENDING_QUERY_COUNT, industry
    )))
}

pub fn build_visibility_prompt(req: &VisibilityReviewRequest) -> Result<BuiltPrompt, GenerationError> {
    let content = require(&req.content, "content")?;
    let keywords = require(&req.keywords, "keywords")?;
    let brand_name = require(&req.brand_name, "brandName")?;

    Ok(json_prompt(format!(
        r#"You are an AI-powered marketing content optimization tool. Your goal is to analyze the provided content and suggest improvements to enhance its visibility in AI search results on platforms like ChatGPT, Perplexity, and Gemini.

Here's the content to analyze:
Content: {content}

Keywords: {keywords}

Brand Name: {brand_name}

Provide actionable suggestions to make the content more visible in AI-powered search results. Focus on:
* Improving keyword integration
* Optimizing for relevant trending queries
* Enhancing citation opportunities both internally and externally
* Ensuring the content is well-structured and easily digestible by AI algorithms
* Making sure the brand is mentioned naturally and appropriately in context.
* Making sure that the content includes questions which are answered comprehensively.
* Suggest how to rewrite/restructure the content so it becomes more visible in AI search results.

Respond with a JSON object with a single 'suggestions' string field."#
    )))
}

pub fn build_citation_prompt(req: &CitationReviewRequest) -> Result<BuiltPrompt, GenerationError> {
    let content = require(&req.content, "content")?;
    let primary_keyword = require(&req.primary_keyword, "primaryKeyword")?;
    let industry = require(&req.industry, "industry")?;

    Ok(json_prompt(format!(
        r#"You are an SEO specialist helping to optimize content for AI search visibility.

The content is about: {primary_keyword} in the {industry} industry.

Analyze the following content and suggest improvements for internal and external links to enhance its authority and visibility in AI search results.

Content:
{content}

Specifically, suggest:
- A list of relevant internal links that could be added to the content.
- A list of authoritative external links that could be added to the content.
- Instructions on how to find and generate suitable citation opportunities in the content.
- A snippet of the optimized content, showcasing the suggested citation improvements.

Ensure your suggestions are practical and relevant to the content and industry.

Respond with a JSON object with the fields 'suggestedInternalLinks' (list of strings), 'suggestedExternalLinks' (list of strings), 'citationOpportunities' (string) and 'optimizedContentSnippet' (string)."#
    )))
}
