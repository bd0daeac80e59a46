use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::ContentType;
use super::draft::DraftUpdate;
use super::pricing::{PricingEngine, Quote};
use super::props::{StepAction, StepProps};
use super::steps::StepId;
use super::submission::{
    CampaignGateway, CampaignId, SubmissionPolicy, SubmissionState, SubmitError,
};
use super::wizard::{CampaignWizard, StepTransition, WizardError, WizardSeed};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sessions untouched for this long are dropped when new ones open.
const DEFAULT_IDLE_TTL_MINUTES: i64 = 120;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("wizard-{id:06}"))
}

/// Snapshot of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub current_step: StepId,
    pub step_title: &'static str,
    pub position: usize,
    pub total_steps: usize,
    pub can_advance: bool,
    pub submission_state: SubmissionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub props: StepProps,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionView {
    pub transition: StepTransition,
    pub session: SessionView,
}

type SharedWizard<G> = Arc<Mutex<CampaignWizard<G>>>;

struct SessionEntry<G> {
    wizard: SharedWizard<G>,
    last_seen: DateTime<Utc>,
}

/// Keeps wizard sessions, each behind its own lock.
pub struct WizardSessionService<G> {
    gateway: Arc<G>,
    pricing: PricingEngine,
    policy: SubmissionPolicy,
    idle_ttl: Duration,
    sessions: Mutex<HashMap<SessionId, SessionEntry<G>>>,
}

impl<G> WizardSessionService<G>
where
    G: CampaignGateway + 'static,
{
    pub fn new(gateway: Arc<G>, pricing: PricingEngine, policy: SubmissionPolicy) -> Self {
        Self {
            gateway,
            pricing,
            policy,
            idle_ttl: Duration::minutes(DEFAULT_IDLE_TTL_MINUTES),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    pub fn open(&self, seed: Option<WizardSeed>) -> Result<SessionView, SessionError> {
        let now = Utc::now();
        self.sweep_stale(now)?;

        let seeded = seed.is_some();
        let wizard = CampaignWizard::new(
            Arc::clone(&self.gateway),
            self.pricing,
            self.policy,
            seed,
        );
        let session_id = next_session_id();
        let view = session_view(&session_id, &wizard);

        self.sessions
            .lock()
            .map_err(|_| SessionError::Poisoned)?
            .insert(
                session_id.clone(),
                SessionEntry {
                    wizard: Arc::new(Mutex::new(wizard)),
                    last_seen: now,
                },
            );

        info!(%session_id, seeded, "wizard session opened");
        Ok(view)
    }

    pub fn view(&self, id: &SessionId) -> Result<SessionView, SessionError> {
        let session = self.session(id)?;
        let wizard = lock(&session)?;
        Ok(session_view(id, &wizard))
    }

    pub fn props(&self, id: &SessionId, step: StepId) -> Result<StepProps, SessionError> {
        let session = self.session(id)?;
        let wizard = lock(&session)?;
        Ok(wizard.props_for(step))
    }

    pub fn dispatch(
        &self,
        id: &SessionId,
        action: StepAction,
    ) -> Result<TransitionView, SessionError> {
        self.with_wizard(id, |wizard| Ok(wizard.dispatch(action)?))
    }

    pub fn apply_update(
        &self,
        id: &SessionId,
        update: DraftUpdate,
    ) -> Result<SessionView, SessionError> {
        let session = self.session(id)?;
        let mut wizard = lock(&session)?;
        wizard.apply_update(update)?;
        Ok(session_view(id, &wizard))
    }

    pub fn advance(&self, id: &SessionId) -> Result<TransitionView, SessionError> {
        self.with_wizard(id, |wizard| Ok(wizard.advance()))
    }

    pub fn retreat(&self, id: &SessionId) -> Result<TransitionView, SessionError> {
        self.with_wizard(id, |wizard| Ok(wizard.retreat()))
    }

    /// Submits a session's draft; the session lock is released during the gateway call.
    pub async fn submit(&self, id: &SessionId) -> Result<CampaignId, SessionError> {
        let session = self.session(id)?;

        let (request, gateway) = {
            let mut wizard = lock(&session)?;
            let request = wizard.begin_submission(Utc::now())?;
            (request, wizard.gateway())
        };

        let in_flight = InFlightSubmission::new(id, &session);
        let outcome = gateway.create_campaign(request).await;
        in_flight.settle();

        let campaign_id = {
            let mut wizard = lock(&session)?;
            wizard.complete_submission(outcome)?
        };

        self.remove(id)?;
        Ok(campaign_id)
    }

    /// Drops a session without submitting.
    pub fn abandon(&self, id: &SessionId) -> Result<(), SessionError> {
        self.remove(id)?
            .map(|_| info!(session_id = %id, "wizard session abandoned"))
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn quote(&self, reach: u64, content_type: ContentType) -> Quote {
        self.pricing.price_reach(reach, content_type)
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Drops sessions idle past the TTL and sessions whose lock is poisoned.
    ///
    /// A session with a submission in flight is always kept.
    pub fn sweep_stale(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        let before = sessions.len();
        let idle_ttl = self.idle_ttl;

        sessions.retain(|_, entry| match entry.wizard.try_lock() {
            Ok(wizard) => {
                wizard.submission_state() == SubmissionState::Submitting
                    || now - entry.last_seen < idle_ttl
            }
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        });

        let swept = before - sessions.len();
        if swept > 0 {
            info!(swept, remaining = sessions.len(), "stale wizard sessions dropped");
        }
        Ok(swept)
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .map(|sessions| sessions.len())
            .unwrap_or_default()
    }

    fn with_wizard<F>(&self, id: &SessionId, operation: F) -> Result<TransitionView, SessionError>
    where
        F: FnOnce(&mut CampaignWizard<G>) -> Result<StepTransition, SessionError>,
    {
        let session = self.session(id)?;
        let mut wizard = lock(&session)?;
        let transition = operation(&mut wizard)?;
        Ok(TransitionView {
            transition,
            session: session_view(id, &wizard),
        })
    }

    fn session(&self, id: &SessionId) -> Result<SharedWizard<G>, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        entry.last_seen = Utc::now();
        Ok(Arc::clone(&entry.wizard))
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SharedWizard<G>>, SessionError> {
        Ok(self
            .sessions
            .lock()
            .map_err(|_| SessionError::Poisoned)?
            .remove(id)
            .map(|entry| entry.wizard))
    }
}

/// Marks the session's submission interrupted if dropped before the gateway answers.
struct InFlightSubmission<'a, G> {
    id: &'a SessionId,
    session: &'a SharedWizard<G>,
    settled: bool,
}

impl<'a, G> InFlightSubmission<'a, G> {
    fn new(id: &'a SessionId, session: &'a SharedWizard<G>) -> Self {
        Self {
            id,
            session,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl<G> Drop for InFlightSubmission<'_, G> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(session_id = %self.id, "submission dropped before the campaign service answered");
        if let Ok(mut wizard) = self.session.lock() {
            wizard.interrupt_submission();
        }
    }
}

fn lock<G>(session: &SharedWizard<G>) -> Result<MutexGuard<'_, CampaignWizard<G>>, SessionError> {
    session.lock().map_err(|_| SessionError::Poisoned)
}

fn session_view<G>(id: &SessionId, wizard: &CampaignWizard<G>) -> SessionView
where
    G: CampaignGateway,
{
    let current = wizard.current_step();
    let (position, total_steps) = wizard.progress();
    SessionView {
        session_id: id.clone(),
        current_step: current,
        step_title: current.title(),
        position,
        total_steps,
        can_advance: wizard.can_advance(),
        submission_state: wizard.submission_state(),
        last_error: wizard.last_error().map(str::to_owned),
        props: wizard.current_props(),
    }
}

/// Error raised by the session service.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("wizard session {0} not found")]
    NotFound(SessionId),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("wizard session store is unavailable")]
    Poisoned,
}
