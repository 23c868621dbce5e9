use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{ApplicationId, LoanApplication, SubmissionReceipt};

/// Route the member lands on after a successful submission.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Async boundary between the form and whatever processes applications.
pub trait SubmissionGateway: Send + Sync {
    fn dispatch(
        &self,
        application: LoanApplication,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}

/// Failure reported by a submission gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("application rejected: {0}")]
    Rejected(String),
    #[error("submission channel unavailable: {0}")]
    Unavailable(String),
}

/// User-visible notifications (toasts in the browser portal). Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

/// Client-side navigation requested by the form.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("loan-{id:06}"))
}

/// Stand-in for the loan back office: waits, then accepts every application.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl SubmissionGateway for SimulatedGateway {
    fn dispatch(
        &self,
        application: LoanApplication,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            let receipt = SubmissionReceipt {
                application_id: next_application_id(),
                submitted_at: Utc::now(),
            };
            info!(
                application_id = %receipt.application_id,
                applicant = %application.applicant_email,
                amount = %application.amount,
                term_months = application.term_months,
                "loan application accepted"
            );
            Ok(receipt)
        }
    }
}

/// Notifier that writes notifications to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        info!(notification = "success", "{message}");
    }

    fn notify_error(&self, message: &str) {
        warn!(notification = "error", "{message}");
    }
}

/// Navigator that records redirects in the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate_to(&self, path: &str) {
        info!(path, "navigation requested");
    }
}
