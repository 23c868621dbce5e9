use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{ApplicationField, FormState, LoanApplicationDraft, SubmissionReceipt};
use super::form::{FormError, LoanApplicationForm};
use super::outbound::{Navigator, Notifier, SubmissionError, SubmissionGateway};
use super::pricing::{quote, LoanQuote, LoanQuoteRequest, RATE_POLICY};
use crate::session::{MemberProfile, SessionError, SessionStore};
use crate::workflows::dashboard::DashboardSnapshot;

/// Service composing the session, the application form, and its outbound collaborators.
pub struct LoanPortalService<G, N, V> {
    session: Arc<SessionStore>,
    form: Arc<Mutex<LoanApplicationForm>>,
    gateway: Arc<G>,
    notifier: Arc<N>,
    navigator: Arc<V>,
}

impl<G, N, V> LoanPortalService<G, N, V>
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
    V: Navigator + 'static,
{
    pub fn new(
        session: Arc<SessionStore>,
        gateway: Arc<G>,
        notifier: Arc<N>,
        navigator: Arc<V>,
    ) -> Self {
        Self {
            session,
            form: Arc::new(Mutex::new(LoanApplicationForm::new())),
            gateway,
            notifier,
            navigator,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<MemberProfile, SessionError> {
        let result = self.session.login(email, password).await;
        if let Err(error) = &result {
            self.notifier
                .notify_error(&format!("Sign-in failed. Check your credentials: {error}"));
        }
        result
    }

    /// End the session and discard any half-filled application. Refused while a submission
    /// is in flight so the next member cannot start a second one.
    pub fn logout(&self) -> Result<Option<MemberProfile>, FormError> {
        let mut form = self.lock_form();
        form.reset().map_err(|error| {
            warn!(%error, "logout refused while an application is being submitted");
            error
        })?;
        Ok(self.session.logout())
    }

    pub fn rates(&self) -> RateSheet {
        RateSheet {
            member_rate: RATE_POLICY.member,
            non_member_rate: RATE_POLICY.non_member,
            member_savings: RATE_POLICY.member_savings(),
            applied_rate: self
                .session
                .is_member()
                .map(|is_member| RATE_POLICY.rate_for(is_member)),
        }
    }

    /// Stateless calculator. Membership falls back to the session, then to non-member pricing.
    pub fn quote(&self, input: QuoteInput) -> LoanQuote {
        let is_member = input
            .is_member
            .or_else(|| self.session.is_member())
            .unwrap_or(false);

        quote(LoanQuoteRequest {
            principal: input.amount,
            term_months: input.term_months,
            is_member,
        })
    }

    pub fn application(&self) -> Result<ApplicationView, SessionError> {
        let member = self.session.require_member()?;
        Ok(ApplicationView::capture(&self.lock_form(), &member))
    }

    pub fn update_field(
        &self,
        field: ApplicationField,
        value: String,
    ) -> Result<ApplicationView, SessionError> {
        let member = self.session.require_member()?;
        let mut form = self.lock_form();
        form.set_field(field, value);
        Ok(ApplicationView::capture(&form, &member))
    }

    /// Submit the current draft. The gateway call runs on its own task so that an abandoned
    /// request still settles the form.
    pub async fn submit(&self) -> Result<SubmissionReceipt, FormError> {
        let member = self.session.require_member()?;
        let application = self.lock_form().begin_submission(&member).map_err(|error| {
            warn!(%error, member = %member.email, "loan application not submitted");
            error
        })?;

        info!(
            member = %member.email,
            amount = %application.amount,
            term_months = application.term_months,
            monthly_payment = %application.quote.monthly_payment,
            "dispatching loan application"
        );

        let gateway = Arc::clone(&self.gateway);
        let form = Arc::clone(&self.form);
        let notifier = Arc::clone(&self.notifier);
        let navigator = Arc::clone(&self.navigator);

        let task = tokio::spawn(async move {
            let outcome = gateway.dispatch(application).await;
            form.lock().expect("form mutex poisoned").complete_submission(
                outcome,
                notifier.as_ref(),
                navigator.as_ref(),
            )
        });

        match task.await {
            Ok(result) => result,
            Err(join_error) => self.lock_form().complete_submission(
                Err(SubmissionError::Unavailable(join_error.to_string())),
                self.notifier.as_ref(),
                self.navigator.as_ref(),
            ),
        }
    }

    pub fn dashboard(&self) -> Result<DashboardSnapshot, SessionError> {
        let member = self.session.require_member()?;
        Ok(DashboardSnapshot::for_member(&member))
    }

    fn lock_form(&self) -> MutexGuard<'_, LoanApplicationForm> {
        self.form.lock().expect("form mutex poisoned")
    }
}

/// Calculator input; `is_member` overrides the session when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuoteInput {
    pub amount: Decimal,
    pub term_months: i32,
    #[serde(default)]
    pub is_member: Option<bool>,
}

/// Published pricing plus the rate that applies to the current member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateSheet {
    pub member_rate: Decimal,
    pub non_member_rate: Decimal,
    pub member_savings: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_rate: Option<Decimal>,
}

/// Snapshot of the form as rendered next to the quote panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationView {
    pub draft: LoanApplicationDraft,
    pub state: FormState,
    pub can_submit: bool,
    pub quote: LoanQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ApplicationView {
    fn capture(form: &LoanApplicationForm, member: &MemberProfile) -> Self {
        Self {
            draft: form.draft().clone(),
            state: form.state(),
            can_submit: form.can_submit(),
            quote: form.quote(member.is_member),
            last_error: form.last_error().map(str::to_string),
        }
    }
}
