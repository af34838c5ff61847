//! Submission pipeline: credential check, normalize, build prompt, call the
//! provider, validate the output shape.
//!
//! Each call either fully succeeds or fully fails. Nothing is retried.

use brandwright_common::config::API_KEY_ENV_VARS;
use brandwright_common::insights::{
    build_citation_prompt, build_trending_queries_prompt, build_visibility_prompt,
    CitationReviewRequest, CitationSuggestions, TrendingQueries, TrendingQueriesRequest,
    VisibilityReviewRequest, VisibilitySuggestions,
};
use brandwright_common::response::{parse_generated_content, parse_record};
use brandwright_common::{
    build_prompt, normalize_with_defaults, BuiltPrompt, FeatureFlags, GeneratedContent,
    GenerationError, GenerationRequest, RawBrandContentRequest, TextGenerator,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct ContentService {
    /// None when no provider credential was found at startup
    generator: Option<Arc<dyn TextGenerator>>,
    feature_defaults: FeatureFlags,
}

impl ContentService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, feature_defaults: FeatureFlags) -> Self {
        Self {
            generator,
            feature_defaults,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    /// The provider, or `ProviderMisconfigured` when no credential is set
    pub fn require_generator(&self) -> Result<&dyn TextGenerator, GenerationError> {
        self.generator.as_deref().ok_or_else(|| {
            GenerationError::ProviderMisconfigured(format!("{} not set", API_KEY_ENV_VARS.join("/")))
        })
    }

    /// Generate brand content for a raw submission.
    ///
    /// A missing credential is reported ahead of any validation failure.
    pub async fn generate(
        &self,
        raw: &RawBrandContentRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        let normalized = normalize_with_defaults(raw, self.feature_defaults);
        let generator = self.require_generator()?;
        let req = normalized?;

        let prompt = build_prompt(&req);
        debug!("Built {:?} prompt ({} chars)", prompt.mode, prompt.text.len());

        let start = Instant::now();
        let text = self.call(generator, &prompt).await?;
        let content = parse_generated_content(&prompt, req.wants_prompt_simulation(), &text)?;

        info!(
            "Generated {} for {} ({:?}, {} chars, simulation: {}) in {}ms",
            req.content_type,
            req.brand_name,
            prompt.mode,
            content.content.len(),
            content.prompt_simulation.is_some(),
            start.elapsed().as_millis()
        );
        Ok(content)
    }

    pub async fn trending_queries(
        &self,
        req: &TrendingQueriesRequest,
    ) -> Result<TrendingQueries, GenerationError> {
        let generator = self.require_generator()?;
        let prompt = build_trending_queries_prompt(req)?;
        let text = self.call(generator, &prompt).await?;
        parse_record(&text)
    }

    pub async fn review_visibility(
        &self,
        req: &VisibilityReviewRequest,
    ) -> Result<VisibilitySuggestions, GenerationError> {
        let generator = self.require_generator()?;
        let prompt = build_visibility_prompt(req)?;
        let text = self.call(generator, &prompt).await?;
        parse_record(&text)
    }

    pub async fn review_citations(
        &self,
        req: &CitationReviewRequest,
    ) -> Result<CitationSuggestions, GenerationError> {
        let generator = self.require_generator()?;
        let prompt = build_citation_prompt(req)?;
        let text = self.call(generator, &prompt).await?;
        parse_record(&text)
    }

    async fn call(
        &self,
        generator: &dyn TextGenerator,
        prompt: &BuiltPrompt,
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest::new(prompt.text.clone(), prompt.response_format);
        generator.generate(&request).await.map_err(|e| {
            warn!("Provider call to {} failed: {}", generator.model(), e);
            GenerationError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandwright_common::{FakeTextGenerator, LlmError, ResponseFormat};

    fn raw(name: &str) -> RawBrandContentRequest {
        RawBrandContentRequest {
            brand_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn service_with(fake: Arc<FakeTextGenerator>) -> ContentService {
        ContentService::new(Some(fake), FeatureFlags::default())
    }

    #[tokio::test]
    async fn test_missing_credential_wins_over_validation() {
        let service = ContentService::new(None, FeatureFlags::default());

        let err = service.generate(&raw("")).await.unwrap_err();
        assert!(matches!(err, GenerationError::ProviderMisconfigured(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(
            err.to_string(),
            "Server misconfig: GOOGLE_API_KEY/GEMINI_API_KEY not set"
        );

        let err = service.generate(&raw("Acme")).await.unwrap_err();
        assert!(matches!(err, GenerationError::ProviderMisconfigured(_)));
    }

    #[tokio::test]
    async fn test_missing_brand_name_skips_provider() {
        let fake = Arc::new(FakeTextGenerator::always_text("unused"));
        let service = service_with(fake.clone());

        let err = service.generate(&raw("  ")).await.unwrap_err();
        assert_eq!(err, GenerationError::MissingRequiredField("brandName"));
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_simple_generation_sends_exact_prompt() {
        let fake = Arc::new(FakeTextGenerator::always_text("Stride beyond limits.\n"));
        let service = service_with(fake.clone());

        let out = service.generate(&raw("AeroStride")).await.unwrap();
        assert_eq!(out.content, "Stride beyond limits.\n");
        assert_eq!(out.prompt_simulation, None);

        let sent = fake.last_request().unwrap();
        assert_eq!(sent.response_format, ResponseFormat::Text);
        assert!(sent.prompt.contains("Write a Instagram Caption for the brand \"AeroStride\""));
        assert!(sent.prompt.contains("~120–180 words"));
    }

    #[tokio::test]
    async fn test_extended_generation_with_simulation() {
        let fake = Arc::new(FakeTextGenerator::always_json(serde_json::json!({
            "content": "## Why AeroStride",
            "promptSimulation": "User Query: ..."
        })));
        let service = service_with(fake.clone());

        let mut input = raw("AeroStride");
        input.simulate_prompt = Some(true);

        let out = service.generate(&input).await.unwrap();
        assert_eq!(out.content, "## Why AeroStride");
        assert_eq!(out.prompt_simulation.as_deref(), Some("User Query: ..."));
        assert_eq!(fake.last_request().unwrap().response_format, ResponseFormat::Json);
    }

    #[tokio::test]
    async fn test_feature_defaults_applied() {
        let fake = Arc::new(FakeTextGenerator::always_json(serde_json::json!({"content": "ok"})));
        let defaults = FeatureFlags {
            enable_genai_structure: true,
            simulate_prompt: false,
        };
        let service = ContentService::new(Some(fake.clone()), defaults);

        let mut input = raw("Acme");
        input.simulate_prompt = Some(false);
        service.generate(&input).await.unwrap();

        assert!(fake.last_request().unwrap().prompt.contains("**GenAI Optimization**"));
    }

    #[tokio::test]
    async fn test_provider_failure_passes_message() {
        let fake = Arc::new(FakeTextGenerator::always_error(LlmError::HttpError(
            "HTTP 429 Too Many Requests from Gemini".into(),
        )));
        let service = service_with(fake);

        let err = service.generate(&raw("Acme")).await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::ProviderCallFailed("HTTP error: HTTP 429 Too Many Requests from Gemini".into())
        );
    }

    #[tokio::test]
    async fn test_extended_missing_content_is_shape_violation() {
        let fake = Arc::new(FakeTextGenerator::always_json(serde_json::json!({"text": "wrong"})));
        let service = service_with(fake);

        let mut input = raw("Acme");
        input.enable_genai_structure = Some(true);

        let err = service.generate(&input).await.unwrap_err();
        assert_eq!(err, GenerationError::OutputShapeViolation("content".into()));
    }

    #[tokio::test]
    async fn test_trending_queries() {
        let fake = Arc::new(FakeTextGenerator::always_json(serde_json::json!({
            "trendingQueries": ["best marathon shoes", "carbon plate trainers"]
        })));
        let service = service_with(fake);

        let out = service
            .trending_queries(&TrendingQueriesRequest {
                industry: Some("running".into()),
            })
            .await
            .unwrap();
        assert_eq!(out.trending_queries.len(), 2);
    }

    #[tokio::test]
    async fn test_visibility_missing_field_in_output() {
        let fake = Arc::new(FakeTextGenerator::always_json(serde_json::json!({})));
        let service = service_with(fake);

        let err = service
            .review_visibility(&VisibilityReviewRequest {
                content: Some("text".into()),
                keywords: Some("kw".into()),
                brand_name: Some("Acme".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::OutputShapeViolation(_)));
    }
}
