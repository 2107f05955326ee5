// crates/orchestrator/src/kinds.rs
//! The kind-specific layer of the generic generation module.
//!
//! Everything that differs between the 18 kinds at invoke time is here:
//! which signal fields are required, which extra arguments go into the
//! start request, and which external provider must be configured first.
//! The lifecycle itself (start → poll → saved list) never branches on kind.

use studio_types::{ContentKind, Signal, StartGenerationRequest};

use crate::config::StudioConfig;
use crate::error::GenerateError;

/// Probe the kind's external-provider precondition.
///
/// Runs before any network call; an unmet probe is a configuration error,
/// not a generation failure.
pub fn check_precondition(kind: ContentKind, config: &StudioConfig) -> Result<(), GenerateError> {
    match kind {
        ContentKind::AudioOverview if config.tts_provider.is_none() => {
            Err(GenerateError::Configuration {
                provider: "text-to-speech provider",
            })
        }
        ContentKind::VideoOverview if config.render_provider.is_none() => {
            Err(GenerateError::Configuration {
                provider: "video render provider",
            })
        }
        _ => Ok(()),
    }
}

/// Extract the kind's required fields from the signal and assemble the
/// start request. Fails locally (no network call) when a required field is
/// missing.
pub fn build_request(
    kind: ContentKind,
    signal: &Signal,
    config: &StudioConfig,
) -> Result<StartGenerationRequest, GenerateError> {
    let source_id = signal
        .primary_source_id()
        .ok_or(GenerateError::MissingField { field: "sources" })?
        .to_string();
    if signal.direction.trim().is_empty() {
        return Err(GenerateError::MissingField { field: "direction" });
    }

    let mut kind_args = serde_json::Map::new();
    match kind {
        ContentKind::AudioOverview => {
            if let Some(provider) = &config.tts_provider {
                kind_args.insert("tts_provider".into(), provider.as_str().into());
            }
        }
        ContentKind::VideoOverview => {
            if let Some(provider) = &config.render_provider {
                kind_args.insert("render_provider".into(), provider.as_str().into());
            }
        }
        ContentKind::BlogPost => {
            if let Some(keyword) = &signal.target_keyword {
                kind_args.insert("target_keyword".into(), keyword.as_str().into());
            }
            if let Some(blog_type) = &signal.blog_type {
                kind_args.insert("blog_type".into(), blog_type.as_str().into());
            }
        }
        // Two-stage kinds tell the service which export artifact to build.
        ContentKind::Presentation => {
            kind_args.insert("export_format".into(), "pptx".into());
        }
        ContentKind::Website => {
            kind_args.insert("export_format".into(), "static_bundle".into());
        }
        // The remaining kinds need nothing beyond source and direction.
        ContentKind::Quiz
        | ContentKind::FlashCards
        | ContentKind::MindMap
        | ContentKind::Wireframe
        | ContentKind::AdCreative
        | ContentKind::SocialPost
        | ContentKind::EmailCampaign
        | ContentKind::Component
        | ContentKind::FlowDiagram
        | ContentKind::Prd
        | ContentKind::MarketingStrategy
        | ContentKind::Infographic
        | ContentKind::BusinessReport => {}
    }

    Ok(StartGenerationRequest {
        source_id,
        direction: signal.direction.clone(),
        kind_args,
    })
}
