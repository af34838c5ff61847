//! Prompt rendering for brand content generation.
//!
//! Output is a pure function of the normalized request: no timestamps, no
//! randomness. Sections whose driving field is absent are left out entirely.

use crate::llm_client::ResponseFormat;
use crate::types::{BrandContentRequest, FeatureFlags};
use serde::Serialize;

/// Which template a request renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    /// One-paragraph brief, plain-text answer
    Simple,
    /// Structured template with optional GenAI/simulation blocks, JSON answer
    Extended,
}

/// A rendered prompt plus what the provider is expected to return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub text: String,
    pub mode: PromptMode,
    pub response_format: ResponseFormat,
}

/// Render the instruction text for a normalized request
pub fn build_prompt(req: &BrandContentRequest) -> BuiltPrompt {
    match req.features {
        None => BuiltPrompt {
            text: build_simple_prompt(req),
            mode: PromptMode::Simple,
            response_format: ResponseFormat::Text,
        },
        Some(flags) => BuiltPrompt {
            text: build_extended_prompt(req, flags),
            mode: PromptMode::Extended,
            response_format: ResponseFormat::Json,
        },
    }
}

fn build_simple_prompt(req: &BrandContentRequest) -> String {
    let mut parts = vec![
        "You are a marketing copywriter.".to_string(),
        format!(
            "Write a {} for the brand \"{}\" in a {} voice.",
            req.content_type,
            req.brand_name,
            req.brand_tone.as_str().to_lowercase()
        ),
    ];

    if let Some(goal) = &req.campaign_goal {
        parts.push(format!("Campaign objective: {}.", goal));
    }
    if let Some(keywords) = &req.keywords {
        parts.push(format!(
            "Incorporate these keywords/hashtags where natural: {}.",
            keywords
        ));
    }

    parts.push(format!("Length ~{} words.", req.content_length.word_range()));
    parts.push("Output plain text only (no markdown).".to_string());

    parts.join(" ")
}

const EXTENDED_INTRO: &str = "You are an expert marketing copywriter. Generate content based on the following specifications.";

const EXTENDED_OUTPUT_DIRECTIVE: &str = "Your final output should be a JSON object with 'content' and an optional 'promptSimulation' field.";

fn build_extended_prompt(req: &BrandContentRequest, flags: FeatureFlags) -> String {
    let mut blocks: Vec<String> = Vec::new();

    blocks.push(EXTENDED_INTRO.to_string());
    blocks.push(format!(
        "Brand Name: {}\nBrand Tone: {}\nContent Type: {}\nLength: {}",
        req.brand_name, req.brand_tone, req.content_type, req.content_length
    ));

    let mut context = Vec::new();
    if let Some(goal) = &req.campaign_goal {
        context.push(format!("Campaign Objective: {}", goal));
    }
    if let Some(keywords) = &req.keywords {
        context.push(format!("Keywords/Hashtags: {}", keywords));
    }
    if !context.is_empty() {
        blocks.push(context.join("\n"));
    }

    blocks.push("---".to_string());

    let mut instructions = vec![
        format!(
            "Generate the requested '{}'. It should be '{}' in length and have a '{}' tone.",
            req.content_type, req.content_length, req.brand_tone
        ),
        "Incorporate any listed keywords or hashtags naturally.".to_string(),
        "Keep the content engaging and aligned with the campaign objective, if one is given."
            .to_string(),
    ];
    if flags.enable_genai_structure {
        instructions.push(genai_optimization_block(&req.brand_name));
    }
    if flags.simulate_prompt {
        instructions.push(prompt_simulation_block(&req.brand_name));
    }

    let numbered: Vec<String> = instructions
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}.  {}", i + 1, text))
        .collect();
    blocks.push(format!("Instructions:\n{}", numbered.join("\n")));

    blocks.push(EXTENDED_OUTPUT_DIRECTIVE.to_string());

    blocks.join("\n\n")
}

fn genai_optimization_block(brand_name: &str) -> String {
    format!(
        "**GenAI Optimization**: Structure the content to be easily understandable and citable by \
         Generative AI models. Use clear headings, bullet points, and answer potential user \
         questions directly. Make sure to mention the brand '{}' in a natural way that an AI \
         would pick up when answering a relevant user query.",
        brand_name
    )
}

fn prompt_simulation_block(brand_name: &str) -> String {
    format!(
        "**Prompt Simulation**: After generating the content, create a separate section that \
         simulates how a large language model (like ChatGPT or Gemini) might use this content to \
         answer a user's query. Frame it like this:\n\
         \n    User Query: \"What's a good brand for [a relevant topic from the content]?\"\n\
         \n    AI Response: \"...[a plausible AI response that seamlessly integrates a mention of \
         '{}' and its generated content]...\"",
        brand_name
    )
}
