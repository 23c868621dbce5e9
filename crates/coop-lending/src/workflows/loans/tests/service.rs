use super::common::*;
use rust_decimal_macros::dec;

use crate::session::{SessionError, NON_MEMBER_EMAIL};
use crate::workflows::loans::domain::{ApplicationField, FormState};
use crate::workflows::loans::form::FormError;
use crate::workflows::loans::outbound::DASHBOARD_ROUTE;
use crate::workflows::loans::service::QuoteInput;

#[tokio::test]
async fn quote_uses_session_membership_unless_overridden() {
    let harness = harness();
    let service = &harness.service;
    let input = QuoteInput {
        amount: dec!(5000),
        term_months: 12,
        is_member: None,
    };

    assert_eq!(service.quote(input).monthly_payment, dec!(444.24));

    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    assert_eq!(service.quote(input).monthly_payment, dec!(436.10));

    let overridden = QuoteInput {
        is_member: Some(false),
        ..input
    };
    assert_eq!(service.quote(overridden).annual_rate, dec!(12.0));
}

#[tokio::test]
async fn rates_report_the_applied_tier() {
    let harness = harness();
    let service = &harness.service;

    let anonymous = service.rates();
    assert_eq!(anonymous.member_rate, dec!(8.5));
    assert_eq!(anonymous.non_member_rate, dec!(12.0));
    assert_eq!(anonymous.member_savings, dec!(3.5));
    assert!(anonymous.applied_rate.is_none());

    service
        .login(NON_MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    assert_eq!(service.rates().applied_rate, Some(dec!(12.0)));
}

#[tokio::test]
async fn failed_login_raises_an_error_notification() {
    let harness = harness();

    let result = harness.service.login("", "secret").await;

    assert_eq!(result, Err(SessionError::InvalidCredentials));
    assert_eq!(harness.notifier.errors().len(), 1);
}

#[tokio::test]
async fn application_endpoints_require_a_session() {
    let harness = harness();
    let service = &harness.service;

    assert_eq!(
        service.application().map(|view| view.state),
        Err(SessionError::NotAuthenticated)
    );
    assert!(service
        .update_field(ApplicationField::Amount, "5000".to_string())
        .is_err());
    assert_eq!(
        service.submit().await,
        Err(FormError::Session(SessionError::NotAuthenticated))
    );
    assert!(service.dashboard().is_err());
}

#[tokio::test]
async fn submit_settles_the_shared_form() {
    let harness = harness();
    let service = &harness.service;
    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    fill_application(service, "5000", "12");

    let view = service.application().expect("session present");
    assert!(view.can_submit);
    assert_eq!(view.quote.monthly_payment, dec!(436.10));

    let receipt = service.submit().await.expect("submission accepted");
    assert!(receipt.application_id.0.starts_with("loan-"));

    let view = service.application().expect("session present");
    assert_eq!(view.state, FormState::Idle);
    assert!(view.draft.amount.is_empty());
    assert_eq!(harness.notifier.successes().len(), 1);
    assert_eq!(harness.navigator.visits(), vec![DASHBOARD_ROUTE.to_string()]);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let harness = harness_with(HeldGateway::default());
    let service = harness.service.clone();
    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    fill_application(&service, "12000", "36");

    let in_flight = tokio::spawn({
        let service = service.clone();
        async move { service.submit().await }
    });

    while service.application().expect("session present").state != FormState::Submitting {
        tokio::task::yield_now().await;
    }

    assert_eq!(service.submit().await, Err(FormError::AlreadySubmitting));
    assert!(!service.application().expect("session present").can_submit);

    harness.gateway.release();
    let receipt = in_flight
        .await
        .expect("task joins")
        .expect("held submission completes");

    assert_eq!(receipt.application_id.0, "loan-held");
    assert_eq!(harness.gateway.received().len(), 1);
    assert_eq!(
        service.application().expect("session present").state,
        FormState::Idle
    );
}

#[tokio::test]
async fn gateway_failure_leaves_the_form_failed_with_draft() {
    let harness = harness_with(OfflineGateway);
    let service = &harness.service;
    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    fill_application(service, "5000", "12");

    assert!(matches!(
        service.submit().await,
        Err(FormError::Submission(_))
    ));

    let view = service.application().expect("session present");
    assert_eq!(view.state, FormState::Failed);
    assert_eq!(view.draft.amount, "5000");
    assert!(view.last_error.is_some());
    assert!(harness.navigator.visits().is_empty());
}

#[tokio::test]
async fn logout_discards_the_draft() {
    let harness = harness();
    let service = &harness.service;
    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    fill_application(service, "5000", "12");

    assert!(service.logout().expect("nothing in flight").is_some());
    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");

    let view = service.application().expect("session present");
    assert!(view.draft.amount.is_empty());
    assert!(!view.can_submit);
}

#[tokio::test]
async fn logout_is_refused_until_the_in_flight_submission_settles() {
    let harness = harness_with(HeldGateway::default());
    let service = harness.service.clone();
    service
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    fill_application(&service, "5000", "12");

    let in_flight = tokio::spawn({
        let service = service.clone();
        async move { service.submit().await }
    });

    while service.application().expect("session present").state != FormState::Submitting {
        tokio::task::yield_now().await;
    }

    assert_eq!(service.logout(), Err(FormError::AlreadySubmitting));
    assert!(service.session().current().is_some());

    fill_application(&service, "8000", "24");
    assert_eq!(service.submit().await, Err(FormError::AlreadySubmitting));
    assert_eq!(harness.gateway.received().len(), 1);

    harness.gateway.release();
    in_flight
        .await
        .expect("task joins")
        .expect("held submission completes");

    assert_eq!(harness.navigator.visits(), vec![DASHBOARD_ROUTE.to_string()]);
    assert!(service.logout().expect("submission settled").is_some());
    assert!(service.session().current().is_none());
}

#[tokio::test]
async fn dashboard_reflects_the_logged_in_member() {
    let harness = harness();
    harness
        .service
        .login(NON_MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");

    let snapshot = harness.service.dashboard().expect("session present");
    assert_eq!(snapshot.membership, "non_member");
    assert_eq!(snapshot.active_loans, 2);
}
