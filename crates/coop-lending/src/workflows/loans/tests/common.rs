use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Notify;

use crate::session::{MemberProfile, SessionStore};
use crate::workflows::loans::domain::{
    ApplicationField, ApplicationId, LoanApplication, SubmissionReceipt,
};
use crate::workflows::loans::form::LoanApplicationForm;
use crate::workflows::loans::outbound::{
    Navigator, Notifier, SimulatedGateway, SubmissionError, SubmissionGateway,
};
use crate::workflows::loans::{portal_router, LoanPortalService};

pub(super) const MEMBER_EMAIL: &str = "ana@example.com";

pub(super) fn member() -> MemberProfile {
    MemberProfile::mock_for(MEMBER_EMAIL)
}

pub(super) fn filled_form(amount: &str, term: &str, purpose: &str) -> LoanApplicationForm {
    let mut form = LoanApplicationForm::new();
    form.set_field(ApplicationField::Amount, amount);
    form.set_field(ApplicationField::Term, term);
    form.set_field(ApplicationField::Purpose, purpose);
    form
}

pub(super) async fn logged_in_session() -> SessionStore {
    let session = SessionStore::default();
    session
        .login(MEMBER_EMAIL, "secret")
        .await
        .expect("login succeeds");
    session
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub(super) fn successes(&self) -> Vec<String> {
        self.successes.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.successes
            .lock()
            .expect("notifier mutex poisoned")
            .push(message.to_string());
    }

    fn notify_error(&self, message: &str) {
        self.errors
            .lock()
            .expect("notifier mutex poisoned")
            .push(message.to_string());
    }
}

#[derive(Default)]
pub(super) struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(super) fn visits(&self) -> Vec<String> {
        self.visits.lock().expect("navigator mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        self.visits
            .lock()
            .expect("navigator mutex poisoned")
            .push(path.to_string());
    }
}

pub(super) struct OfflineGateway;

impl SubmissionGateway for OfflineGateway {
    fn dispatch(
        &self,
        _application: LoanApplication,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send {
        async { Err(SubmissionError::Unavailable("back office offline".to_string())) }
    }
}

/// Gateway that keeps every submission in flight until released.
#[derive(Default)]
pub(super) struct HeldGateway {
    release: Arc<Notify>,
    received: Arc<Mutex<Vec<LoanApplication>>>,
}

impl HeldGateway {
    pub(super) fn release(&self) {
        self.release.notify_one();
    }

    pub(super) fn received(&self) -> Vec<LoanApplication> {
        self.received.lock().expect("gateway mutex poisoned").clone()
    }
}

impl SubmissionGateway for HeldGateway {
    fn dispatch(
        &self,
        application: LoanApplication,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send {
        let release = Arc::clone(&self.release);
        let received = Arc::clone(&self.received);
        async move {
            received
                .lock()
                .expect("gateway mutex poisoned")
                .push(application);
            release.notified().await;
            Ok(SubmissionReceipt {
                application_id: ApplicationId("loan-held".to_string()),
                submitted_at: Utc::now(),
            })
        }
    }
}

pub(super) type TestService<G> = LoanPortalService<G, RecordingNotifier, RecordingNavigator>;

pub(super) struct Harness<G> {
    pub(super) service: Arc<TestService<G>>,
    pub(super) gateway: Arc<G>,
    pub(super) notifier: Arc<RecordingNotifier>,
    pub(super) navigator: Arc<RecordingNavigator>,
}

pub(super) fn harness_with<G>(gateway: G) -> Harness<G>
where
    G: SubmissionGateway + 'static,
{
    let gateway = Arc::new(gateway);
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let service = Arc::new(LoanPortalService::new(
        Arc::new(SessionStore::default()),
        gateway.clone(),
        notifier.clone(),
        navigator.clone(),
    ));
    Harness {
        service,
        gateway,
        notifier,
        navigator,
    }
}

pub(super) fn harness() -> Harness<SimulatedGateway> {
    harness_with(SimulatedGateway::default())
}

pub(super) fn router_for<G>(harness: &Harness<G>) -> axum::Router
where
    G: SubmissionGateway + 'static,
{
    portal_router(harness.service.clone())
}

pub(super) fn fill_application<G>(service: &TestService<G>, amount: &str, term: &str)
where
    G: SubmissionGateway + 'static,
{
    service
        .update_field(ApplicationField::Amount, amount.to_string())
        .expect("amount accepted");
    service
        .update_field(ApplicationField::Term, term.to_string())
        .expect("term accepted");
    service
        .update_field(ApplicationField::Purpose, "education".to_string())
        .expect("purpose accepted");
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
