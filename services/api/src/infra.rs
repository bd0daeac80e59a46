use influence_market::workflows::campaign::{
    CampaignGateway, CampaignId, CampaignRequest, GatewayError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stands in for the campaign backend; keeps every accepted request.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCampaignGateway {
    campaigns: Arc<Mutex<Vec<(CampaignId, CampaignRequest)>>>,
    sequence: Arc<AtomicU64>,
}

impl CampaignGateway for InMemoryCampaignGateway {
    async fn create_campaign(&self, request: CampaignRequest) -> Result<CampaignId, GatewayError> {
        if request.budget.cents() == 0 {
            return Err(GatewayError::Rejected(
                "budget must be greater than zero".to_string(),
            ));
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let campaign_id = CampaignId(format!("cmp-{id:06}"));
        info!(%campaign_id, title = %request.title, "campaign stored in memory");

        let mut guard = self.campaigns.lock().expect("campaign mutex poisoned");
        guard.push((campaign_id.clone(), request));
        Ok(campaign_id)
    }
}

impl InMemoryCampaignGateway {
    pub(crate) fn campaigns(&self) -> Vec<(CampaignId, CampaignRequest)> {
        self.campaigns.lock().expect("campaign mutex poisoned").clone()
    }
}
