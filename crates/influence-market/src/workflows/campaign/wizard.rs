use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::InfluencerSummary;
use super::draft::{CampaignDraft, DraftError, DraftUpdate, MergeEffects};
use super::pricing::PricingEngine;
use super::props::{StepAction, StepProps};
use super::steps::{StepId, StepRegistry};
use super::submission::{
    CampaignGateway, CampaignId, CampaignRequest, GatewayError, SubmissionPolicy,
    SubmissionState, SubmitError,
};

pub(crate) const SUBMISSION_INTERRUPTED: &str =
    "submission interrupted before the campaign service answered";

/// Influencer carried over from a previous screen, read once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSeed {
    pub influencer: InfluencerSummary,
}

/// Result of asking the wizard to move between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepTransition {
    Moved { from: StepId, to: StepId },
    /// The current step's completion predicate does not hold yet.
    Blocked { step: StepId },
    /// Already on the first or last step.
    AtBoundary { step: StepId },
    /// The action updated the draft without moving.
    Stayed { step: StepId },
}

impl StepTransition {
    pub fn current(&self) -> StepId {
        match *self {
            StepTransition::Moved { to, .. } => to,
            StepTransition::Blocked { step }
            | StepTransition::AtBoundary { step }
            | StepTransition::Stayed { step } => step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("{action} is not available on the {} step", .step.title())]
    ActionNotOnStep { action: &'static str, step: StepId },
    #[error("the draft is locked while a submission is in flight")]
    Locked,
}

/// Controller for one campaign-creation session.
///
/// Owns the draft and the step pointer; every mutation goes through
/// [`apply_update`](Self::apply_update) or [`dispatch`](Self::dispatch).
pub struct CampaignWizard<G> {
    registry: StepRegistry,
    pricing: PricingEngine,
    policy: SubmissionPolicy,
    gateway: Arc<G>,
    current: StepId,
    draft: CampaignDraft,
    submission: SubmissionState,
    last_error: Option<String>,
}

impl<G> CampaignWizard<G>
where
    G: CampaignGateway,
{
    pub fn new(
        gateway: Arc<G>,
        pricing: PricingEngine,
        policy: SubmissionPolicy,
        seed: Option<WizardSeed>,
    ) -> Self {
        let registry = StepRegistry::standard();
        let current = registry.first();
        let draft = match seed {
            Some(seed) => CampaignDraft::seeded(seed.influencer),
            None => CampaignDraft::default(),
        };

        Self {
            registry,
            pricing,
            policy,
            gateway,
            current,
            draft,
            submission: SubmissionState::Idle,
            last_error: None,
        }
    }

    pub fn current_step(&self) -> StepId {
        self.current
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    /// Zero-based position of the current step and the number of steps.
    pub fn progress(&self) -> (usize, usize) {
        let steps = self.registry.active_steps(self.draft.campaign_kind());
        (self.registry.position(self.current), steps.len())
    }

    pub fn can_advance(&self) -> bool {
        self.current != self.registry.terminal() && self.current.is_complete(&self.draft)
    }

    pub fn advance(&mut self) -> StepTransition {
        let from = self.current;
        let Some(to) = self.registry.next(from) else {
            return StepTransition::AtBoundary { step: from };
        };

        if !from.is_complete(&self.draft) {
            debug!(step = ?from, "advance blocked by incomplete step");
            return StepTransition::Blocked { step: from };
        }

        self.current = to;
        debug!(?from, ?to, "wizard advanced");
        StepTransition::Moved { from, to }
    }

    pub fn retreat(&mut self) -> StepTransition {
        let from = self.current;
        if self.is_locked() {
            return StepTransition::Blocked { step: from };
        }
        match self.registry.previous(from) {
            Some(to) => {
                self.current = to;
                debug!(?from, ?to, "wizard retreated");
                StepTransition::Moved { from, to }
            }
            None => StepTransition::AtBoundary { step: from },
        }
    }

    /// Merges a partial draft, revalidating the content type and repricing as needed.
    pub fn apply_update(&mut self, update: DraftUpdate) -> Result<MergeEffects, WizardError> {
        if self.is_locked() {
            return Err(WizardError::Locked);
        }

        let effects = self.draft.merge(update, &self.pricing)?;

        if let Some(cleared) = effects.cleared_content_type {
            debug!(?cleared, platform = ?self.draft.platform(), "content type cleared by platform change");
        }
        if let Some((previous, budget)) = effects.repriced {
            debug!(?previous, ?budget, "draft repriced");
        }

        Ok(effects)
    }

    /// Applies an action emitted by the current step's component.
    pub fn dispatch(&mut self, action: StepAction) -> Result<StepTransition, WizardError> {
        let step = action.step();
        if step != self.current {
            return Err(WizardError::ActionNotOnStep {
                action: action.name(),
                step: self.current,
            });
        }

        let advances = action.advances();
        self.apply_update(action.into_update())?;

        if advances {
            Ok(self.advance())
        } else {
            Ok(StepTransition::Stayed { step })
        }
    }

    pub fn props_for(&self, step: StepId) -> StepProps {
        StepProps::derive(step, &self.draft, self.submission, self.last_error())
    }

    pub fn current_props(&self) -> StepProps {
        self.props_for(self.current)
    }

    /// Guards against concurrent submissions and composes the request.
    ///
    /// On success the wizard is `Submitting` until
    /// [`complete_submission`](Self::complete_submission) records the outcome.
    pub fn begin_submission(
        &mut self,
        submitted_at: DateTime<Utc>,
    ) -> Result<CampaignRequest, SubmitError> {
        match self.submission {
            SubmissionState::Submitting => return Err(SubmitError::AlreadySubmitting),
            SubmissionState::Completed => return Err(SubmitError::AlreadySubmitted),
            SubmissionState::Idle | SubmissionState::Failed => {}
        }
        if self.current != self.registry.terminal() {
            return Err(SubmitError::NotOnReview(self.current));
        }

        let request = self.policy.compose(&self.draft, submitted_at)?;
        self.submission = SubmissionState::Submitting;
        info!(
            title = %request.title,
            platform = ?request.platform,
            budget = %request.budget,
            "submitting campaign"
        );
        Ok(request)
    }

    pub fn complete_submission(
        &mut self,
        outcome: Result<CampaignId, GatewayError>,
    ) -> Result<CampaignId, SubmitError> {
        match outcome {
            Ok(campaign_id) => {
                self.submission = SubmissionState::Completed;
                self.last_error = None;
                info!(%campaign_id, "campaign created");
                Ok(campaign_id)
            }
            Err(error) => {
                self.submission = SubmissionState::Failed;
                self.last_error = Some(error.to_string());
                warn!(%error, "campaign submission failed");
                Err(SubmitError::Gateway(error))
            }
        }
    }

    /// Submits the draft once; failures keep the draft for a retry.
    pub async fn submit(&mut self) -> Result<CampaignId, SubmitError> {
        let request = self.begin_submission(Utc::now())?;
        let gateway = self.gateway();
        let pending = PendingSubmission::new(self);
        let outcome = gateway.create_campaign(request).await;
        pending.settle(outcome)
    }

    fn is_locked(&self) -> bool {
        matches!(
            self.submission,
            SubmissionState::Submitting | SubmissionState::Completed
        )
    }
}

impl<G> CampaignWizard<G> {
    /// Moves an unanswered submission to `Failed` so the draft can be retried.
    pub fn interrupt_submission(&mut self) {
        if self.submission != SubmissionState::Submitting {
            return;
        }
        self.submission = SubmissionState::Failed;
        self.last_error = Some(SUBMISSION_INTERRUPTED.to_string());
        warn!("campaign submission interrupted before the backend answered");
    }
}

/// Interrupts the submission unless an outcome was recorded.
struct PendingSubmission<'a, G> {
    wizard: &'a mut CampaignWizard<G>,
    settled: bool,
}

impl<'a, G> PendingSubmission<'a, G>
where
    G: CampaignGateway,
{
    fn new(wizard: &'a mut CampaignWizard<G>) -> Self {
        Self {
            wizard,
            settled: false,
        }
    }

    fn settle(
        mut self,
        outcome: Result<CampaignId, GatewayError>,
    ) -> Result<CampaignId, SubmitError> {
        self.settled = true;
        self.wizard.complete_submission(outcome)
    }
}

impl<G> Drop for PendingSubmission<'_, G> {
    fn drop(&mut self) {
        if !self.settled {
            self.wizard.interrupt_submission();
        }
    }
}

impl<G> std::fmt::Debug for CampaignWizard<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignWizard")
            .field("current", &self.current)
            .field("draft", &self.draft)
            .field("submission", &self.submission)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
