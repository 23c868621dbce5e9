use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationField;
use super::form::FormError;
use super::outbound::{Navigator, Notifier, SubmissionGateway, DASHBOARD_ROUTE};
use super::service::{LoanPortalService, QuoteInput};
use crate::session::SessionError;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldUpdate {
    pub(crate) field: ApplicationField,
    #[serde(default)]
    pub(crate) value: String,
}

/// Router builder exposing the session, calculator, application form, and dashboard.
pub fn portal_router<G, N, V>(service: Arc<LoanPortalService<G, N, V>>) -> Router
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    Router::new()
        .route(
            "/api/v1/session",
            get(session_handler::<G, N, V>)
                .post(login_handler::<G, N, V>)
                .delete(logout_handler::<G, N, V>),
        )
        .route("/api/v1/loans/rates", get(rates_handler::<G, N, V>))
        .route("/api/v1/loans/quote", post(quote_handler::<G, N, V>))
        .route(
            "/api/v1/loans/application",
            get(application_handler::<G, N, V>).patch(update_field_handler::<G, N, V>),
        )
        .route(
            "/api/v1/loans/application/submit",
            post(submit_handler::<G, N, V>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<G, N, V>))
        .with_state(service)
}

pub(crate) async fn login_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.login(&request.email, &request.password).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn session_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.session().require_member() {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn logout_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.logout() {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => form_error_response(error),
    }
}

pub(crate) async fn rates_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    (StatusCode::OK, Json(service.rates())).into_response()
}

pub(crate) async fn quote_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
    Json(input): Json<QuoteInput>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    (StatusCode::OK, Json(service.quote(input))).into_response()
}

pub(crate) async fn application_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.application() {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn update_field_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
    Json(update): Json<FieldUpdate>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.update_field(update.field, update.value) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn submit_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.submit().await {
        Ok(receipt) => {
            let payload = json!({
                "application_id": receipt.application_id,
                "submitted_at": receipt.submitted_at,
                "redirect_to": DASHBOARD_ROUTE,
            });
            (StatusCode::ACCEPTED, Json(payload)).into_response()
        }
        Err(error) => form_error_response(error),
    }
}

pub(crate) async fn dashboard_handler<G, N, V>(
    State(service): State<Arc<LoanPortalService<G, N, V>>>,
) -> Response
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    match service.dashboard() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => session_error_response(error),
    }
}

fn form_error_response(error: FormError) -> Response {
    let status = match &error {
        FormError::Session(session) => return session_error_response(session.clone()),
        FormError::AlreadySubmitting => StatusCode::CONFLICT,
        FormError::Incomplete | FormError::OutOfBounds(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::Submission(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn session_error_response(error: SessionError) -> Response {
    let status = match error {
        SessionError::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::NotAuthenticated => StatusCode::UNAUTHORIZED,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
