use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{
    CampaignContent, CampaignKind, CategoryId, ContentType, InfluencerSummary, Money,
    PaymentMethodRef, Platform,
};
use super::pricing::PricingEngine;

/// Cumulative campaign data gathered across wizard steps.
///
/// Fields are only writable through [`DraftUpdate`] merges so that `budget`
/// can never be set by anything but the pricing engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignDraft {
    campaign_kind: CampaignKind,
    categories: BTreeSet<CategoryId>,
    platform: Option<Platform>,
    content_type: Option<ContentType>,
    budget: Option<Money>,
    selected_influencer: Option<InfluencerSummary>,
    payment_method: Option<PaymentMethodRef>,
    content: CampaignContent,
}

impl CampaignDraft {
    pub fn campaign_kind(&self) -> CampaignKind {
        self.campaign_kind
    }

    pub fn categories(&self) -> &BTreeSet<CategoryId> {
        &self.categories
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.content_type
    }

    pub fn budget(&self) -> Option<Money> {
        self.budget
    }

    pub fn selected_influencer(&self) -> Option<&InfluencerSummary> {
        self.selected_influencer.as_ref()
    }

    pub fn payment_method(&self) -> Option<&PaymentMethodRef> {
        self.payment_method.as_ref()
    }

    pub fn content(&self) -> &CampaignContent {
        &self.content
    }

    /// Content types the current platform offers; empty until a platform is chosen.
    pub fn valid_content_types(&self) -> Vec<ContentType> {
        self.platform
            .map(Platform::content_types)
            .unwrap_or_default()
    }

    pub(crate) fn seeded(influencer: InfluencerSummary) -> Self {
        Self {
            campaign_kind: CampaignKind::SingleInfluencer,
            selected_influencer: Some(influencer),
            ..Self::default()
        }
    }

    /// Shallow-merges `update`, enforcing the platform/content-type and
    /// pricing rules. A rejected update leaves the draft untouched.
    pub(crate) fn merge(
        &mut self,
        update: DraftUpdate,
        pricing: &PricingEngine,
    ) -> Result<MergeEffects, DraftError> {
        update.validate_against(self)?;

        let DraftUpdate {
            campaign_kind,
            categories,
            platform,
            content_type,
            selected_influencer,
            payment_method,
            content,
        } = update;

        let mut effects = MergeEffects::default();
        let mut pricing_inputs_changed = false;

        if let Some(kind) = campaign_kind {
            self.campaign_kind = kind;
            if kind == CampaignKind::OpenPool && self.selected_influencer.take().is_some() {
                pricing_inputs_changed = true;
            }
        }

        if let Some(categories) = categories {
            self.categories = categories;
        }

        if let Some(platform) = platform {
            self.platform = Some(platform);
            if let Some(previous) = self.content_type {
                if !platform.offers(previous) {
                    self.content_type = None;
                    effects.cleared_content_type = Some(previous);
                    pricing_inputs_changed = true;
                }
            }
        }

        if let Some(content_type) = content_type {
            self.content_type = Some(content_type);
            pricing_inputs_changed = true;
        }

        if let Some(influencer) = selected_influencer {
            self.campaign_kind = CampaignKind::SingleInfluencer;
            self.selected_influencer = Some(influencer);
            pricing_inputs_changed = true;
        }

        if let Some(payment_method) = payment_method {
            self.payment_method = Some(payment_method);
        }

        if let Some(content) = content {
            self.content = content;
        }

        if pricing_inputs_changed {
            let previous = self.budget;
            self.budget = pricing
                .price(self.selected_influencer.as_ref(), self.content_type)
                .amount();
            effects.repriced = Some((previous, self.budget));
        }

        Ok(effects)
    }
}

/// Partial draft emitted by a step; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftUpdate {
    pub campaign_kind: Option<CampaignKind>,
    pub categories: Option<BTreeSet<CategoryId>>,
    pub platform: Option<Platform>,
    pub content_type: Option<ContentType>,
    pub selected_influencer: Option<InfluencerSummary>,
    pub payment_method: Option<PaymentMethodRef>,
    pub content: Option<CampaignContent>,
}

impl DraftUpdate {
    pub fn campaign_kind(mut self, kind: CampaignKind) -> Self {
        self.campaign_kind = Some(kind);
        self
    }

    pub fn categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.categories = Some(
            categories
                .into_iter()
                .map(|category| CategoryId(category.into()))
                .collect(),
        );
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn influencer(mut self, influencer: InfluencerSummary) -> Self {
        self.selected_influencer = Some(influencer);
        self
    }

    pub fn payment_method(mut self, payment_method: PaymentMethodRef) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    pub fn content(mut self, content: CampaignContent) -> Self {
        self.content = Some(content);
        self
    }

    fn validate_against(&self, draft: &CampaignDraft) -> Result<(), DraftError> {
        if let Some(content_type) = self.content_type {
            match self.platform.or(draft.platform) {
                None => return Err(DraftError::ContentTypeWithoutPlatform(content_type)),
                Some(platform) if !platform.offers(content_type) => {
                    return Err(DraftError::ContentTypeNotOffered {
                        content_type,
                        platform,
                    })
                }
                Some(_) => {}
            }
        }

        if self.campaign_kind == Some(CampaignKind::OpenPool) && self.selected_influencer.is_some()
        {
            return Err(DraftError::InfluencerOnOpenPool);
        }

        Ok(())
    }
}

/// What a merge changed beyond the fields it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeEffects {
    pub cleared_content_type: Option<ContentType>,
    /// Budget before and after, when pricing ran.
    pub repriced: Option<(Option<Money>, Option<Money>)>,
}

/// Updates that would break a draft invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{} is not offered on {}", .content_type.label(), .platform.label())]
    ContentTypeNotOffered {
        content_type: ContentType,
        platform: Platform,
    },
    #[error("{} needs a platform to be chosen first", .0.label())]
    ContentTypeWithoutPlatform(ContentType),
    #[error("open pool campaigns cannot target a single influencer")]
    InfluencerOnOpenPool,
}
