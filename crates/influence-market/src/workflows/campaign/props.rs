use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{
    CampaignContent, CategoryId, ContentType, InfluencerSummary, Money, PaymentMethodRef, Platform,
};
use super::draft::{CampaignDraft, DraftUpdate};
use super::steps::StepId;
use super::submission::SubmissionState;

/// Data each step renders from, one variant per step id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepProps {
    Categories {
        selected_categories: BTreeSet<CategoryId>,
    },
    Platform {
        platform: Option<Platform>,
        content_type: Option<ContentType>,
        valid_content_types: Vec<ContentType>,
    },
    Influencer {
        platform: Option<Platform>,
        content_type: Option<ContentType>,
        selected_influencer: Option<InfluencerSummary>,
        budget: Option<Money>,
    },
    Payment {
        payment_method: Option<PaymentMethodRef>,
        budget: Option<Money>,
    },
    Content {
        content: CampaignContent,
    },
    Review {
        draft: CampaignDraft,
        submission_state: SubmissionState,
        last_error: Option<String>,
    },
}

impl StepProps {
    pub fn step(&self) -> StepId {
        match self {
            StepProps::Categories { .. } => StepId::Categories,
            StepProps::Platform { .. } => StepId::Platform,
            StepProps::Influencer { .. } => StepId::Influencer,
            StepProps::Payment { .. } => StepId::Payment,
            StepProps::Content { .. } => StepId::Content,
            StepProps::Review { .. } => StepId::Review,
        }
    }

    pub(crate) fn derive(
        step: StepId,
        draft: &CampaignDraft,
        submission_state: SubmissionState,
        last_error: Option<&str>,
    ) -> Self {
        match step {
            StepId::Categories => StepProps::Categories {
                selected_categories: draft.categories().clone(),
            },
            StepId::Platform => StepProps::Platform {
                platform: draft.platform(),
                content_type: draft.content_type(),
                valid_content_types: draft.valid_content_types(),
            },
            StepId::Influencer => StepProps::Influencer {
                platform: draft.platform(),
                content_type: draft.content_type(),
                selected_influencer: draft.selected_influencer().cloned(),
                budget: draft.budget(),
            },
            StepId::Payment => StepProps::Payment {
                payment_method: draft.payment_method().cloned(),
                budget: draft.budget(),
            },
            StepId::Content => StepProps::Content {
                content: draft.content().clone(),
            },
            StepId::Review => StepProps::Review {
                draft: draft.clone(),
                submission_state,
                last_error: last_error.map(str::to_owned),
            },
        }
    }
}

/// Events a step component emits back to the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    SelectCategories { categories: BTreeSet<CategoryId> },
    SelectPlatform { platform: Platform },
    SelectContentType { content_type: ContentType },
    SelectInfluencer { influencer: InfluencerSummary },
    SelectPaymentMethod { payment_method: PaymentMethodRef },
    UpdateContent { content: CampaignContent },
}

impl StepAction {
    /// The step whose component emits this action.
    pub fn step(&self) -> StepId {
        match self {
            StepAction::SelectCategories { .. } => StepId::Categories,
            StepAction::SelectPlatform { .. } | StepAction::SelectContentType { .. } => {
                StepId::Platform
            }
            StepAction::SelectInfluencer { .. } => StepId::Influencer,
            StepAction::SelectPaymentMethod { .. } => StepId::Payment,
            StepAction::UpdateContent { .. } => StepId::Content,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepAction::SelectCategories { .. } => "select_categories",
            StepAction::SelectPlatform { .. } => "select_platform",
            StepAction::SelectContentType { .. } => "select_content_type",
            StepAction::SelectInfluencer { .. } => "select_influencer",
            StepAction::SelectPaymentMethod { .. } => "select_payment_method",
            StepAction::UpdateContent { .. } => "update_content",
        }
    }

    /// Selection on the influencer and payment steps is also the advance trigger.
    pub fn advances(&self) -> bool {
        matches!(
            self,
            StepAction::SelectInfluencer { .. } | StepAction::SelectPaymentMethod { .. }
        )
    }

    pub(crate) fn into_update(self) -> DraftUpdate {
        let update = DraftUpdate::default();
        match self {
            StepAction::SelectCategories { categories } => DraftUpdate {
                categories: Some(categories),
                ..update
            },
            StepAction::SelectPlatform { platform } => update.platform(platform),
            StepAction::SelectContentType { content_type } => update.content_type(content_type),
            StepAction::SelectInfluencer { influencer } => update.influencer(influencer),
            StepAction::SelectPaymentMethod { payment_method } => {
                update.payment_method(payment_method)
            }
            StepAction::UpdateContent { content } => update.content(content),
        }
    }
}
