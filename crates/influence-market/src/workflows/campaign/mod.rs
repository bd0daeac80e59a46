//! Campaign-creation wizard: rate table, pricing, step registry, and the
//! controller that accumulates a draft and submits it once.

pub mod domain;
pub mod draft;
pub mod pricing;
pub mod props;
pub mod rates;
pub mod router;
pub mod service;
pub mod steps;
pub mod submission;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    CampaignContent, CampaignKind, CategoryId, ContentType, InfluencerId, InfluencerSummary,
    Money, PaymentMethodId, PaymentMethodRef, Platform,
};
pub use draft::{CampaignDraft, DraftError, DraftUpdate, MergeEffects};
pub use pricing::{PricingEngine, Quote};
pub use props::{StepAction, StepProps};
pub use rates::{PlatformRates, RateCard, RateTable};
pub use router::wizard_router;
pub use service::{SessionError, SessionId, SessionView, TransitionView, WizardSessionService};
pub use steps::{StepDescriptor, StepId, StepRegistry};
pub use submission::{
    CampaignGateway, CampaignId, CampaignRequest, GatewayError, MissingField, RequestContent,
    SubmissionPolicy, SubmissionState, SubmitError,
};
pub use wizard::{CampaignWizard, StepTransition, WizardError, WizardSeed};
