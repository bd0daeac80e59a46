use std::fmt;
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CampaignKind, ContentType, InfluencerId, Money, Platform};
use super::draft::CampaignDraft;
use super::steps::StepId;
use crate::config::CampaignConfig;

const FALLBACK_TITLE: &str = "New campaign";

/// Opaque identifier returned by the campaign backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub String);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Failed,
    /// The backend accepted the campaign; the session is finished.
    Completed,
}

impl SubmissionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Ready to submit",
            Self::Submitting => "Submitting",
            Self::Failed => "Submission failed",
            Self::Completed => "Submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContent {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Payload handed to the campaign-creation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub title: String,
    pub description: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub budget: Money,
    pub deadline: DateTime<Utc>,
    pub requirements: Vec<String>,
    #[serde(rename = "type")]
    pub kind: CampaignKind,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer_id: Option<InfluencerId>,
    pub content: RequestContent,
}

/// Deadline policy applied when composing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    pub deadline_days: i64,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        CampaignConfig::default().into()
    }
}

impl From<CampaignConfig> for SubmissionPolicy {
    fn from(config: CampaignConfig) -> Self {
        Self {
            deadline_days: config.deadline_days,
        }
    }
}

impl SubmissionPolicy {
    pub fn compose(
        &self,
        draft: &CampaignDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<CampaignRequest, SubmitError> {
        let platform = draft
            .platform()
            .ok_or(SubmitError::Incomplete(MissingField::Platform))?;
        let content_type = draft
            .content_type()
            .ok_or(SubmitError::Incomplete(MissingField::ContentType))?;
        let budget = draft
            .budget()
            .ok_or(SubmitError::Incomplete(MissingField::Budget))?;
        if draft.categories().is_empty() {
            return Err(SubmitError::Incomplete(MissingField::Categories));
        }

        let influencer = match draft.campaign_kind() {
            CampaignKind::SingleInfluencer => draft.selected_influencer(),
            CampaignKind::OpenPool => None,
        };
        let title = match influencer {
            Some(influencer) if !influencer.display_name.trim().is_empty() => {
                format!("Campaign with {}", influencer.display_name.trim())
            }
            _ => FALLBACK_TITLE.to_string(),
        };

        let deadline = Duration::try_days(self.deadline_days)
            .filter(|_| self.deadline_days > 0)
            .and_then(|window| submitted_at.checked_add_signed(window))
            .ok_or(SubmitError::DeadlineOutOfRange {
                days: self.deadline_days,
            })?;

        let content = draft.content();

        Ok(CampaignRequest {
            title,
            description: content.caption.clone(),
            platform,
            content_type,
            budget,
            deadline,
            requirements: Vec::new(),
            kind: draft.campaign_kind(),
            categories: draft
                .categories()
                .iter()
                .map(|category| category.0.clone())
                .collect(),
            influencer_id: influencer.map(|influencer| influencer.id.clone()),
            content: RequestContent {
                caption: content.caption.clone(),
                hashtags: content.hashtags.clone(),
                mentions: content.mentions.clone(),
                image_url: content.image_url.clone(),
            },
        })
    }
}

/// Outbound hook to whatever creates campaigns (HTTP backend, fake in tests).
pub trait CampaignGateway: Send + Sync {
    fn create_campaign(
        &self,
        request: CampaignRequest,
    ) -> impl Future<Output = Result<CampaignId, GatewayError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("campaign rejected: {0}")]
    Rejected(String),
    #[error("campaign service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Categories,
    Platform,
    ContentType,
    Budget,
}

impl MissingField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Platform => "platform",
            Self::ContentType => "content type",
            Self::Budget => "budget",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("campaign was already submitted")]
    AlreadySubmitted,
    #[error("submit is only available on the review step (currently on {})", .0.title())]
    NotOnReview(StepId),
    #[error("draft is missing {}", .0.label())]
    Incomplete(MissingField),
    #[error("campaign deadline of {days} days cannot be scheduled")]
    DeadlineOutOfRange { days: i64 },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
