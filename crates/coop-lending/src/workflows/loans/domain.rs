use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::pricing::LoanQuote;

/// Smallest amount the cooperative lends.
pub const MIN_LOAN_AMOUNT: Decimal = dec!(500);
/// Largest amount the cooperative lends.
pub const MAX_LOAN_AMOUNT: Decimal = dec!(50000);
/// Repayment terms offered on the application form, in months.
pub const TERM_OPTIONS: [i32; 6] = [6, 12, 18, 24, 36, 48];

/// Identifier wrapper for submitted loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    Personal,
    Business,
    Education,
    Home,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 4] = [
        LoanPurpose::Personal,
        LoanPurpose::Business,
        LoanPurpose::Education,
        LoanPurpose::Home,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LoanPurpose::Personal => "personal",
            LoanPurpose::Business => "business",
            LoanPurpose::Education => "education",
            LoanPurpose::Home => "home",
        }
    }
}

impl FromStr for LoanPurpose {
    type Err = BoundsViolation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        LoanPurpose::ALL
            .into_iter()
            .find(|purpose| purpose.label() == normalized)
            .ok_or_else(|| BoundsViolation::UnknownPurpose {
                value: value.to_string(),
            })
    }
}

/// Editable fields of the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationField {
    Amount,
    Term,
    Purpose,
    #[serde(alias = "observations")]
    Notes,
}

impl FromStr for ApplicationField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "amount" => Ok(ApplicationField::Amount),
            "term" => Ok(ApplicationField::Term),
            "purpose" => Ok(ApplicationField::Purpose),
            "notes" | "observations" => Ok(ApplicationField::Notes),
            _ => Err(UnknownField(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application field '{0}'")]
pub struct UnknownField(pub String);

/// Raw form input exactly as typed; numeric fields are parsed on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplicationDraft {
    pub amount: String,
    pub term: String,
    pub purpose: String,
    pub notes: String,
}

impl LoanApplicationDraft {
    /// Requested amount, or zero when blank or not a number.
    pub fn amount_value(&self) -> Decimal {
        self.amount.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
    }

    /// Requested term in months, or zero when not chosen.
    pub fn term_value(&self) -> i32 {
        self.term.trim().parse::<i32>().unwrap_or(0)
    }

    pub fn purpose_value(&self) -> Result<LoanPurpose, BoundsViolation> {
        self.purpose.parse()
    }

    /// Amount, term, and purpose all present and non-zero.
    pub fn is_complete(&self) -> bool {
        self.amount_value() > Decimal::ZERO
            && self.term_value() > 0
            && !self.purpose.trim().is_empty()
    }

    /// Check the limits the cooperative lends within.
    pub fn check_bounds(&self) -> Result<(), BoundsViolation> {
        let amount = self.amount_value();
        if amount < MIN_LOAN_AMOUNT {
            return Err(BoundsViolation::AmountBelowMinimum { amount });
        }
        if amount > MAX_LOAN_AMOUNT {
            return Err(BoundsViolation::AmountAboveMaximum { amount });
        }

        let months = self.term_value();
        if !TERM_OPTIONS.contains(&months) {
            return Err(BoundsViolation::UnsupportedTerm { months });
        }

        self.purpose_value().map(|_| ())
    }
}

/// Draft values that fall outside what the cooperative offers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsViolation {
    #[error("amount {amount} is below the minimum of {min}", min = MIN_LOAN_AMOUNT)]
    AmountBelowMinimum { amount: Decimal },
    #[error("amount {amount} exceeds the maximum of {max}", max = MAX_LOAN_AMOUNT)]
    AmountAboveMaximum { amount: Decimal },
    #[error("term of {months} months is not offered")]
    UnsupportedTerm { months: i32 },
    #[error("unknown loan purpose '{value}'")]
    UnknownPurpose { value: String },
}

/// Validated snapshot of a draft handed to the submission gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant_id: String,
    pub applicant_email: String,
    pub is_member: bool,
    pub amount: Decimal,
    pub term_months: i32,
    pub purpose: LoanPurpose,
    pub notes: Option<String>,
    pub quote: LoanQuote,
}

/// Acknowledgement returned once an application has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
    pub submitted_at: DateTime<Utc>,
}

/// Lifecycle of the application form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Failed,
}

impl FormState {
    pub const fn label(self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Submitting => "submitting",
            FormState::Failed => "failed",
        }
    }
}
