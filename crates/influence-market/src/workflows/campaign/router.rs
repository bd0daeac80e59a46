use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ContentType;
use super::props::StepAction;
use super::service::{SessionError, SessionId, WizardSessionService};
use super::steps::StepId;
use super::submission::{CampaignGateway, SubmitError};
use super::wizard::{WizardError, WizardSeed};

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub seed: Option<WizardSeed>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub reach: u64,
    pub content_type: ContentType,
}

/// Router exposing the campaign wizard over HTTP.
pub fn wizard_router<G>(service: Arc<WizardSessionService<G>>) -> Router
where
    G: CampaignGateway + 'static,
{
    Router::new()
        .route("/api/v1/campaign-wizards", post(open_handler::<G>))
        .route(
            "/api/v1/campaign-wizards/:session_id",
            get(view_handler::<G>).delete(abandon_handler::<G>),
        )
        .route(
            "/api/v1/campaign-wizards/:session_id/steps/:step",
            get(props_handler::<G>),
        )
        .route(
            "/api/v1/campaign-wizards/:session_id/actions",
            post(action_handler::<G>),
        )
        .route(
            "/api/v1/campaign-wizards/:session_id/advance",
            post(advance_handler::<G>),
        )
        .route(
            "/api/v1/campaign-wizards/:session_id/retreat",
            post(retreat_handler::<G>),
        )
        .route(
            "/api/v1/campaign-wizards/:session_id/submit",
            post(submit_handler::<G>),
        )
        .route("/api/v1/pricing/quote", post(quote_handler::<G>))
        .with_state(service)
}

pub(crate) async fn open_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Json(request): Json<OpenSessionRequest>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.open(request.seed) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn props_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path((session_id, step)): Path<(String, StepId)>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.props(&SessionId(session_id), step) {
        Ok(props) => (StatusCode::OK, Json(props)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn action_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path(session_id): Path<String>,
    Json(action): Json<StepAction>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.dispatch(&SessionId(session_id), action) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn advance_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.advance(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn retreat_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.retreat(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.submit(&SessionId(session_id)).await {
        Ok(campaign_id) => {
            let payload = json!({ "campaign_id": campaign_id });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn abandon_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    match service.abandon(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quote_handler<G>(
    State(service): State<Arc<WizardSessionService<G>>>,
    Json(request): Json<QuoteRequest>,
) -> Response
where
    G: CampaignGateway + 'static,
{
    let quote = service.quote(request.reach, request.content_type);
    (StatusCode::OK, Json(quote)).into_response()
}

fn error_response(error: SessionError) -> Response {
    let status = match &error {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::Wizard(WizardError::Locked) => StatusCode::CONFLICT,
        SessionError::Wizard(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Submit(SubmitError::AlreadySubmitting | SubmitError::AlreadySubmitted) => {
            StatusCode::CONFLICT
        }
        SessionError::Submit(SubmitError::Gateway(_)) => StatusCode::BAD_GATEWAY,
        SessionError::Submit(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
