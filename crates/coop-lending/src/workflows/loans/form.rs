use tracing::{info, warn};

use super::domain::{
    ApplicationField, BoundsViolation, FormState, LoanApplication, LoanApplicationDraft,
    SubmissionReceipt,
};
use super::outbound::{
    Navigator, Notifier, SubmissionError, SubmissionGateway, DASHBOARD_ROUTE,
};
use super::pricing::{quote, LoanQuote, LoanQuoteRequest};
use crate::session::{MemberProfile, SessionError, SessionStore};

pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully! We will contact you soon.";

/// Errors surfaced when a submission cannot start or does not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("amount, term, and purpose are required")]
    Incomplete,
    #[error(transparent)]
    OutOfBounds(#[from] BoundsViolation),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Owns the mutable draft of a loan request and its submission state.
///
/// `idle -> submitting -> idle` on success; `submitting -> failed` keeps the draft so the
/// member can retry or edit.
#[derive(Debug, Clone, Default)]
pub struct LoanApplicationForm {
    draft: LoanApplicationDraft,
    state: FormState,
    last_error: Option<String>,
}

impl LoanApplicationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &LoanApplicationDraft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Store the raw value of one field. Editing a failed form returns it to idle.
    pub fn set_field(&mut self, field: ApplicationField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ApplicationField::Amount => self.draft.amount = value,
            ApplicationField::Term => self.draft.term = value,
            ApplicationField::Purpose => self.draft.purpose = value,
            ApplicationField::Notes => self.draft.notes = value,
        }

        if self.state == FormState::Failed {
            self.state = FormState::Idle;
            self.last_error = None;
        }
    }

    pub fn can_submit(&self) -> bool {
        self.state != FormState::Submitting && self.draft.is_complete()
    }

    /// Live quote for the current draft.
    pub fn quote(&self, is_member: bool) -> LoanQuote {
        quote(LoanQuoteRequest {
            principal: self.draft.amount_value(),
            term_months: self.draft.term_value(),
            is_member,
        })
    }

    /// Drop the draft and any failure, e.g. when the member logs out. An in-flight
    /// submission must settle first.
    pub fn reset(&mut self) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::AlreadySubmitting);
        }
        *self = Self::default();
        Ok(())
    }

    /// Validate the draft and enter `submitting`, returning the snapshot to dispatch.
    pub fn begin_submission(
        &mut self,
        member: &MemberProfile,
    ) -> Result<LoanApplication, FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::AlreadySubmitting);
        }
        if !self.draft.is_complete() {
            return Err(FormError::Incomplete);
        }
        self.draft.check_bounds()?;
        let purpose = self.draft.purpose_value()?;

        let notes = self.draft.notes.trim();
        let application = LoanApplication {
            applicant_id: member.id.clone(),
            applicant_email: member.email.clone(),
            is_member: member.is_member,
            amount: self.draft.amount_value(),
            term_months: self.draft.term_value(),
            purpose,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            quote: self.quote(member.is_member),
        };

        self.state = FormState::Submitting;
        self.last_error = None;
        Ok(application)
    }

    /// Settle an in-flight submission and raise the matching notification.
    pub fn complete_submission<N, V>(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
        notifier: &N,
        navigator: &V,
    ) -> Result<SubmissionReceipt, FormError>
    where
        N: Notifier + ?Sized,
        V: Navigator + ?Sized,
    {
        match outcome {
            Ok(receipt) => {
                self.draft = LoanApplicationDraft::default();
                self.state = FormState::Idle;
                self.last_error = None;
                info!(application_id = %receipt.application_id, "loan application submitted");
                notifier.notify_success(SUBMITTED_MESSAGE);
                navigator.navigate_to(DASHBOARD_ROUTE);
                Ok(receipt)
            }
            Err(error) => {
                self.state = FormState::Failed;
                self.last_error = Some(error.to_string());
                warn!(%error, "loan application submission failed");
                notifier.notify_error(&format!("We could not submit your application: {error}"));
                Err(FormError::Submission(error))
            }
        }
    }

    /// Submit on behalf of the logged-in member and wait for the gateway.
    pub async fn submit<G, N, V>(
        &mut self,
        session: &SessionStore,
        gateway: &G,
        notifier: &N,
        navigator: &V,
    ) -> Result<SubmissionReceipt, FormError>
    where
        G: SubmissionGateway,
        N: Notifier + ?Sized,
        V: Navigator + ?Sized,
    {
        let member = session.require_member()?;
        let application = self.begin_submission(&member)?;
        let outcome = gateway.dispatch(application).await;
        self.complete_submission(outcome, notifier, navigator)
    }
}
