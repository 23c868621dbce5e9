//! Loan pricing, application intake, and the HTTP surface of the member portal.
//!
//! Pricing is a fixed two-tier rate policy feeding a level-payment amortization formula. The
//! application form owns the member's draft and walks it through `idle`, `submitting`, and
//! `failed` while a [`SubmissionGateway`] processes the request.

pub mod domain;
pub mod form;
pub mod outbound;
pub mod pricing;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationField, ApplicationId, BoundsViolation, FormState, LoanApplication,
    LoanApplicationDraft, LoanPurpose, SubmissionReceipt, MAX_LOAN_AMOUNT, MIN_LOAN_AMOUNT,
    TERM_OPTIONS,
};
pub use form::{FormError, LoanApplicationForm};
pub use outbound::{
    Navigator, Notifier, SimulatedGateway, SubmissionError, SubmissionGateway, TracingNavigator,
    TracingNotifier, DASHBOARD_ROUTE,
};
pub use pricing::{
    monthly_payment, quote, rate_for, LoanQuote, LoanQuoteRequest, RatePolicy, RATE_POLICY,
};
pub use router::portal_router;
pub use service::{ApplicationView, LoanPortalService, QuoteInput, RateSheet};
