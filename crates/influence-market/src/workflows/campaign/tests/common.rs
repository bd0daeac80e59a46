use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Notify, Semaphore};

use crate::workflows::campaign::{
    CampaignContent, CampaignGateway, CampaignId, CampaignRequest, CampaignWizard, ContentType,
    GatewayError, InfluencerId, InfluencerSummary, PaymentMethodId, PaymentMethodRef, Platform,
    PricingEngine, StepAction, StepId, SubmissionPolicy, WizardSeed, WizardSessionService,
};

pub(super) fn influencer(name: &str, reach: u64) -> InfluencerSummary {
    InfluencerSummary {
        id: InfluencerId(format!("inf-{}", name.to_lowercase().replace(' ', "-"))),
        display_name: name.to_string(),
        reach: Some(reach),
        categories: vec!["fitness".to_string(), "travel".to_string()],
        location: Some("Lisbon, PT".to_string()),
    }
}

pub(super) fn payment_method() -> PaymentMethodRef {
    PaymentMethodRef {
        id: PaymentMethodId("pm-visa-4242".to_string()),
        brand: "Visa".to_string(),
        last4: "4242".to_string(),
    }
}

pub(super) fn content() -> CampaignContent {
    CampaignContent {
        caption: "Spring running collection launch".to_string(),
        hashtags: vec!["#run".to_string(), "#spring".to_string()],
        mentions: vec!["@stride".to_string()],
        image_url: Some("https://cdn.example.com/spring.jpg".to_string()),
    }
}

pub(super) fn select_categories(categories: &[&str]) -> StepAction {
    StepAction::SelectCategories {
        categories: categories
            .iter()
            .map(|category| crate::workflows::campaign::CategoryId::new(*category))
            .collect(),
    }
}

pub(super) fn new_wizard<G: CampaignGateway>(gateway: Arc<G>) -> CampaignWizard<G> {
    CampaignWizard::new(
        gateway,
        PricingEngine::default(),
        SubmissionPolicy::default(),
        None,
    )
}

pub(super) fn seeded_wizard<G: CampaignGateway>(
    gateway: Arc<G>,
    seed: InfluencerSummary,
) -> CampaignWizard<G> {
    CampaignWizard::new(
        gateway,
        PricingEngine::default(),
        SubmissionPolicy::default(),
        Some(WizardSeed { influencer: seed }),
    )
}

/// Drives a fresh wizard through every step with an Instagram reels campaign.
pub(super) fn walk_to_review<G: CampaignGateway>(wizard: &mut CampaignWizard<G>) {
    wizard
        .dispatch(select_categories(&["fitness", "lifestyle"]))
        .expect("categories accepted");
    wizard.advance();
    wizard
        .dispatch(StepAction::SelectPlatform {
            platform: Platform::Instagram,
        })
        .expect("platform accepted");
    wizard
        .dispatch(StepAction::SelectContentType {
            content_type: ContentType::Reels,
        })
        .expect("content type accepted");
    wizard.advance();
    wizard
        .dispatch(StepAction::SelectInfluencer {
            influencer: influencer("Ana Lima", 100_000),
        })
        .expect("influencer accepted");
    wizard
        .dispatch(StepAction::SelectPaymentMethod {
            payment_method: payment_method(),
        })
        .expect("payment accepted");
    wizard
        .dispatch(StepAction::UpdateContent { content: content() })
        .expect("content accepted");
    wizard.advance();
    assert_eq!(wizard.current_step(), StepId::Review);
}

/// Records every request and fails with queued errors first.
#[derive(Default)]
pub(super) struct RecordingGateway {
    requests: Mutex<Vec<CampaignRequest>>,
    failures: Mutex<VecDeque<GatewayError>>,
}

impl RecordingGateway {
    pub(super) fn failing_with(errors: Vec<GatewayError>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(errors.into()),
        }
    }

    pub(super) fn requests(&self) -> Vec<CampaignRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

impl CampaignGateway for RecordingGateway {
    async fn create_campaign(&self, request: CampaignRequest) -> Result<CampaignId, GatewayError> {
        let sequence = {
            let mut requests = self.requests.lock().expect("request mutex poisoned");
            requests.push(request);
            requests.len()
        };

        let failure = self
            .failures
            .lock()
            .expect("failure mutex poisoned")
            .pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(CampaignId(format!("cmp-{sequence:03}"))),
        }
    }
}

/// Holds every call open until the test releases it.
pub(super) struct GatedGateway {
    pub(super) calls: AtomicUsize,
    pub(super) entered: Notify,
    gate: Semaphore,
}

impl GatedGateway {
    pub(super) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    pub(super) fn release(&self) {
        self.gate.add_permits(1);
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CampaignGateway for GatedGateway {
    async fn create_campaign(&self, _request: CampaignRequest) -> Result<CampaignId, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| GatewayError::Unavailable("gate closed".to_string()))?;
        Ok(CampaignId("cmp-gated".to_string()))
    }
}

pub(super) fn session_service<G: CampaignGateway + 'static>(
    gateway: Arc<G>,
) -> Arc<WizardSessionService<G>> {
    Arc::new(WizardSessionService::new(
        gateway,
        PricingEngine::default(),
        SubmissionPolicy::default(),
    ))
}
