use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCampaignGateway};
use crate::routes::with_wizard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use influence_market::config::AppConfig;
use influence_market::error::AppError;
use influence_market::telemetry;
use influence_market::workflows::campaign::{PricingEngine, SubmissionPolicy, WizardSessionService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(InMemoryCampaignGateway::default());
    let wizard_service = Arc::new(WizardSessionService::new(
        gateway,
        PricingEngine::default(),
        SubmissionPolicy::from(config.campaign),
    ));

    let app = with_wizard_routes(wizard_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        deadline_days = config.campaign.deadline_days,
        "campaign wizard service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
