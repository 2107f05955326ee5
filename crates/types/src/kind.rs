// crates/types/src/kind.rs
//! The closed enumeration of generatable content kinds.
//!
//! Every per-kind constant the pipeline needs (API path, polling ceiling,
//! terminal shape, saved-list filter) lives here as a method on the enum so
//! a new kind is one variant plus a handful of `match` arms — nothing to
//! forget in a far-away table.

use serde::{Deserialize, Serialize};

/// One of the 18 content kinds the studio can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    AudioOverview,
    Quiz,
    FlashCards,
    MindMap,
    BlogPost,
    Presentation,
    Wireframe,
    AdCreative,
    SocialPost,
    EmailCampaign,
    Website,
    Component,
    VideoOverview,
    FlowDiagram,
    Prd,
    MarketingStrategy,
    Infographic,
    BusinessReport,
}

impl ContentKind {
    /// All kinds, in display order.
    pub const ALL: [ContentKind; 18] = [
        ContentKind::AudioOverview,
        ContentKind::Quiz,
        ContentKind::FlashCards,
        ContentKind::MindMap,
        ContentKind::BlogPost,
        ContentKind::Presentation,
        ContentKind::Wireframe,
        ContentKind::AdCreative,
        ContentKind::SocialPost,
        ContentKind::EmailCampaign,
        ContentKind::Website,
        ContentKind::Component,
        ContentKind::VideoOverview,
        ContentKind::FlowDiagram,
        ContentKind::Prd,
        ContentKind::MarketingStrategy,
        ContentKind::Infographic,
        ContentKind::BusinessReport,
    ];

    /// Wire tag, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::AudioOverview => "audio_overview",
            ContentKind::Quiz => "quiz",
            ContentKind::FlashCards => "flash_cards",
            ContentKind::MindMap => "mind_map",
            ContentKind::BlogPost => "blog_post",
            ContentKind::Presentation => "presentation",
            ContentKind::Wireframe => "wireframe",
            ContentKind::AdCreative => "ad_creative",
            ContentKind::SocialPost => "social_post",
            ContentKind::EmailCampaign => "email_campaign",
            ContentKind::Website => "website",
            ContentKind::Component => "component",
            ContentKind::VideoOverview => "video_overview",
            ContentKind::FlowDiagram => "flow_diagram",
            ContentKind::Prd => "prd",
            ContentKind::MarketingStrategy => "marketing_strategy",
            ContentKind::Infographic => "infographic",
            ContentKind::BusinessReport => "business_report",
        }
    }

    /// URL path segment under the generation API root.
    pub fn api_path(self) -> &'static str {
        match self {
            ContentKind::AudioOverview => "audio-overviews",
            ContentKind::Quiz => "quizzes",
            ContentKind::FlashCards => "flash-cards",
            ContentKind::MindMap => "mind-maps",
            ContentKind::BlogPost => "blog-posts",
            ContentKind::Presentation => "presentations",
            ContentKind::Wireframe => "wireframes",
            ContentKind::AdCreative => "ad-creatives",
            ContentKind::SocialPost => "social-posts",
            ContentKind::EmailCampaign => "email-campaigns",
            ContentKind::Website => "websites",
            ContentKind::Component => "components",
            ContentKind::VideoOverview => "video-overviews",
            ContentKind::FlowDiagram => "flow-diagrams",
            ContentKind::Prd => "prds",
            ContentKind::MarketingStrategy => "marketing-strategies",
            ContentKind::Infographic => "infographics",
            ContentKind::BusinessReport => "business-reports",
        }
    }

    /// Maximum status polls before the job is treated as timed out.
    ///
    /// Multi-stage kinds (slide decks, site builds, video renders) must also
    /// wait for a secondary export stage, so they get a higher ceiling.
    pub fn max_poll_attempts(self) -> u32 {
        match self {
            ContentKind::Presentation | ContentKind::Website | ContentKind::VideoOverview => 250,
            _ => 120,
        }
    }

    /// Whether the job is only terminal once `export_status` is also ready.
    pub fn is_two_stage(self) -> bool {
        matches!(self, ContentKind::Presentation | ContentKind::Website)
    }

    /// Whether this kind's saved list keeps failed jobs visible.
    ///
    /// Per-kind product behavior: document-like kinds show past failures so
    /// users can read the error; media kinds only ever show successes.
    pub fn keeps_failed_jobs(self) -> bool {
        matches!(
            self,
            ContentKind::Quiz
                | ContentKind::FlashCards
                | ContentKind::BlogPost
                | ContentKind::Presentation
                | ContentKind::Wireframe
                | ContentKind::MarketingStrategy
                | ContentKind::BusinessReport
        )
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tags_match_as_str() {
        for kind in ContentKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: ContentKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn all_lists_every_kind_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in ContentKind::ALL {
            assert!(seen.insert(kind), "{kind} listed twice");
        }
        assert_eq!(seen.len(), 18);
    }

    #[test]
    fn two_stage_kinds_have_raised_ceiling() {
        for kind in ContentKind::ALL {
            if kind.is_two_stage() {
                assert_eq!(kind.max_poll_attempts(), 250);
            }
        }
        // Video is single-status but render-bound, so it shares the high ceiling.
        assert_eq!(ContentKind::VideoOverview.max_poll_attempts(), 250);
        assert_eq!(ContentKind::Quiz.max_poll_attempts(), 120);
    }

    #[test]
    fn failed_job_visibility_split() {
        assert!(ContentKind::Quiz.keeps_failed_jobs());
        assert!(ContentKind::Presentation.keeps_failed_jobs());
        assert!(!ContentKind::AudioOverview.keeps_failed_jobs());
        assert!(!ContentKind::Infographic.keeps_failed_jobs());
    }

    #[test]
    fn api_paths_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in ContentKind::ALL {
            assert!(seen.insert(kind.api_path()), "{kind} path collides");
        }
    }
}
