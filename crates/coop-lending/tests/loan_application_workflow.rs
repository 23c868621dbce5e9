//! End-to-end scenarios for the member loan application, driven through the public service
//! facade and HTTP router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use coop_lending::session::SessionStore;
use coop_lending::workflows::loans::{
    monthly_payment, portal_router, rate_for, ApplicationField, FormError, FormState,
    LoanPortalService, SimulatedGateway, TracingNavigator, TracingNotifier,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

type Service = LoanPortalService<SimulatedGateway, TracingNotifier, TracingNavigator>;

fn service() -> Arc<Service> {
    Arc::new(LoanPortalService::new(
        Arc::new(SessionStore::default()),
        Arc::new(SimulatedGateway::default()),
        Arc::new(TracingNotifier),
        Arc::new(TracingNavigator),
    ))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

#[test]
fn published_scenarios_hold() {
    assert_eq!(rate_for(true), dec!(8.5));
    assert_eq!(rate_for(false), dec!(12.0));
    assert_eq!(monthly_payment(dec!(5000), dec!(12.0), 12), dec!(444.24));
    assert_eq!(monthly_payment(dec!(5000), dec!(8.5), 12), dec!(436.10));
    assert!(monthly_payment(dec!(0), dec!(8.5), 12).is_zero());
    assert!(monthly_payment(dec!(5000), dec!(8.5), 0).is_zero());
}

#[tokio::test]
async fn non_member_applies_and_is_sent_to_dashboard() {
    let service = service();
    let profile = service
        .login("noSocio@example.com", "secret")
        .await
        .expect("login succeeds");
    assert!(!profile.is_member);

    let view = service
        .update_field(ApplicationField::Amount, "5000".to_string())
        .expect("session present");
    assert!(!view.can_submit);

    service
        .update_field(ApplicationField::Term, "12".to_string())
        .expect("session present");
    let view = service
        .update_field(ApplicationField::Purpose, "personal".to_string())
        .expect("session present");
    assert!(view.can_submit);
    assert_eq!(view.quote.annual_rate, dec!(12.0));
    assert_eq!(view.quote.monthly_payment, dec!(444.24));

    let receipt = service.submit().await.expect("submission accepted");
    assert!(receipt.application_id.0.starts_with("loan-"));

    let view = service.application().expect("session present");
    assert_eq!(view.state, FormState::Idle);
    assert!(!view.can_submit);

    let dashboard = service.dashboard().expect("session present");
    assert_eq!(dashboard.membership, "non_member");
}

#[tokio::test]
async fn out_of_range_amount_is_not_submitted() {
    let service = service();
    service
        .login("ana@example.com", "secret")
        .await
        .expect("login succeeds");
    for (field, value) in [
        (ApplicationField::Amount, "75000"),
        (ApplicationField::Term, "48"),
        (ApplicationField::Purpose, "home"),
    ] {
        service
            .update_field(field, value.to_string())
            .expect("session present");
    }

    assert!(matches!(
        service.submit().await,
        Err(FormError::OutOfBounds(_))
    ));
    assert_eq!(
        service.application().expect("session present").state,
        FormState::Idle
    );
}

#[tokio::test]
async fn http_session_round_trip() {
    let service = service();

    let response = portal_router(service.clone())
        .oneshot(
            Request::post("/api/v1/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "admin@donapina.coop", "password": "secret" }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["is_admin"], true);
    assert_eq!(profile["name"], "Administrator");

    let response = portal_router(service.clone())
        .oneshot(
            Request::get("/api/v1/session")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = portal_router(service.clone())
        .oneshot(
            Request::delete("/api/v1/session")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(service.session().current().is_none());
}
