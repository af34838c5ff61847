//! Request normalization.
//!
//! Turns a raw submission into a `BrandContentRequest`. Enumerated fields are
//! coerced to their defaults when they don't match a permitted literal
//! exactly; `brandName` is the only field that can reject a request.

use crate::error::GenerationError;
use crate::types::{
    BrandContentRequest, BrandTone, ContentLength, ContentType, FeatureFlags,
    RawBrandContentRequest,
};

/// Normalize with both feature flags defaulting to false
pub fn normalize(raw: &RawBrandContentRequest) -> Result<BrandContentRequest, GenerationError> {
    normalize_with_defaults(raw, FeatureFlags::default())
}

/// Normalize, filling a missing feature flag from `defaults`.
///
/// The request is in extended mode only when the raw input carries at least
/// one of the flags.
pub fn normalize_with_defaults(
    raw: &RawBrandContentRequest,
    defaults: FeatureFlags,
) -> Result<BrandContentRequest, GenerationError> {
    let brand_name = raw.brand_name.as_deref().unwrap_or("").trim();
    if brand_name.is_empty() {
        return Err(GenerationError::MissingRequiredField("brandName"));
    }

    let brand_tone = raw
        .brand_tone
        .as_deref()
        .and_then(BrandTone::from_literal)
        .unwrap_or_default();
    let content_type = raw
        .content_type
        .as_deref()
        .and_then(ContentType::from_literal)
        .unwrap_or_default();
    let content_length = raw
        .content_length
        .as_deref()
        .and_then(ContentLength::from_literal)
        .unwrap_or_default();

    let features = raw.has_feature_flags().then(|| FeatureFlags {
        enable_genai_structure: raw
            .enable_genai_structure
            .unwrap_or(defaults.enable_genai_structure),
        simulate_prompt: raw.simulate_prompt.unwrap_or(defaults.simulate_prompt),
    });

    Ok(BrandContentRequest {
        brand_name: brand_name.to_string(),
        brand_tone,
        content_type,
        content_length,
        campaign_goal: optional_text(raw.campaign_goal.as_deref()),
        keywords: raw.keywords.as_deref().and_then(normalize_keywords),
        features,
    })
}

/// Split on commas, trim, drop empty items, rejoin with ", ".
/// Returns `None` when nothing survives.
pub fn normalize_keywords(text: &str) -> Option<String> {
    let joined = text
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    (!joined.is_empty()).then_some(joined)
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawBrandContentRequest {
        RawBrandContentRequest {
            brand_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_brand_name_trimmed() {
        let req = normalize(&raw("  AeroStride \t")).unwrap();
        assert_eq!(req.brand_name, "AeroStride");
    }

    #[test]
    fn test_brand_name_required() {
        for name in ["", "   ", "\n\t"] {
            assert_eq!(
                normalize(&raw(name)),
                Err(GenerationError::MissingRequiredField("brandName"))
            );
        }
        assert_eq!(
            normalize(&RawBrandContentRequest::default()),
            Err(GenerationError::MissingRequiredField("brandName"))
        );
    }

    #[test]
    fn test_missing_enums_use_defaults() {
        let req = normalize(&raw("Acme")).unwrap();
        assert_eq!(req.brand_tone, BrandTone::Friendly);
        assert_eq!(req.content_type, ContentType::InstagramCaption);
        assert_eq!(req.content_length, ContentLength::Medium);
        assert_eq!(req.campaign_goal, None);
        assert_eq!(req.keywords, None);
        assert_eq!(req.features, None);
    }

    #[test]
    fn test_invalid_enums_coerced() {
        let mut input = raw("Acme");
        input.brand_tone = Some("Sarcastic".into());
        input.content_type = Some("Tweet".into());
        input.content_length = Some("long".into());

        let req = normalize(&input).unwrap();
        assert_eq!(req.brand_tone, BrandTone::Friendly);
        assert_eq!(req.content_type, ContentType::InstagramCaption);
        assert_eq!(req.content_length, ContentLength::Medium);
    }

    #[test]
    fn test_valid_enums_pass_through() {
        let mut input = raw("Acme");
        input.brand_tone = Some("Professional".into());
        input.content_type = Some("Blog Post".into());
        input.content_length = Some("Long".into());

        let req = normalize(&input).unwrap();
        assert_eq!(req.brand_tone, BrandTone::Professional);
        assert_eq!(req.content_type, ContentType::BlogPost);
        assert_eq!(req.content_length, ContentLength::Long);
    }

    #[test]
    fn test_keywords_normalized() {
        assert_eq!(
            normalize_keywords("running, ,marathon ,, fitness").as_deref(),
            Some("running, marathon, fitness")
        );
        assert_eq!(normalize_keywords("a, ,b,,c ").as_deref(), Some("a, b, c"));
        assert_eq!(normalize_keywords(""), None);
        assert_eq!(normalize_keywords(","), None);
        assert_eq!(normalize_keywords(" , ,  "), None);
    }

    #[test]
    fn test_blank_campaign_goal_is_absent() {
        let mut input = raw("Acme");
        input.campaign_goal = Some("   ".into());
        assert_eq!(normalize(&input).unwrap().campaign_goal, None);

        input.campaign_goal = Some("  Launch spring line ".into());
        assert_eq!(
            normalize(&input).unwrap().campaign_goal.as_deref(),
            Some("Launch spring line")
        );
    }

    #[test]
    fn test_single_flag_selects_extended_mode() {
        let mut input = raw("Acme");
        input.simulate_prompt = Some(true);

        let req = normalize(&input).unwrap();
        assert_eq!(
            req.features,
            Some(FeatureFlags {
                enable_genai_structure: false,
                simulate_prompt: true,
            })
        );
    }

    #[test]
    fn test_caller_defaults_fill_missing_flag() {
        let mut input = raw("Acme");
        input.enable_genai_structure = Some(false);
        let defaults = FeatureFlags {
            enable_genai_structure: true,
            simulate_prompt: true,
        };

        let req = normalize_with_defaults(&input, defaults).unwrap();
        let flags = req.features.unwrap();
        assert!(!flags.enable_genai_structure, "explicit value wins");
        assert!(flags.simulate_prompt, "missing flag takes the default");
    }

    #[test]
    fn test_defaults_do_not_force_extended_mode() {
        let defaults = FeatureFlags {
            enable_genai_structure: true,
            simulate_prompt: true,
        };
        let req = normalize_with_defaults(&raw("Acme"), defaults).unwrap();
        assert!(!req.is_extended());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = RawBrandContentRequest {
            brand_name: Some("  AeroStride ".into()),
            brand_tone: Some("nope".into()),
            content_type: Some("Ad Copy".into()),
            content_length: Some("Short".into()),
            campaign_goal: Some(" ".into()),
            keywords: Some("running, ,marathon".into()),
            enable_genai_structure: Some(true),
            simulate_prompt: None,
        };

        let once = normalize(&input).unwrap();
        let twice = normalize(&RawBrandContentRequest::from(&once)).unwrap();
        assert_eq!(once, twice);
    }
}
