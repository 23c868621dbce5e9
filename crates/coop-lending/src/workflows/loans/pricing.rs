use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Annual percentage charged to cooperative members.
pub const MEMBER_ANNUAL_RATE: Decimal = dec!(8.5);
/// Annual percentage charged to everyone else.
pub const NON_MEMBER_ANNUAL_RATE: Decimal = dec!(12.0);

const ZERO_PAYMENT: Decimal = dec!(0.00);
const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Fixed two-tier pricing keyed on cooperative membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatePolicy {
    pub member: Decimal,
    pub non_member: Decimal,
}

/// The pricing in force for the lifetime of the process.
pub const RATE_POLICY: RatePolicy = RatePolicy {
    member: MEMBER_ANNUAL_RATE,
    non_member: NON_MEMBER_ANNUAL_RATE,
};

impl RatePolicy {
    pub const fn rate_for(&self, is_member: bool) -> Decimal {
        if is_member {
            self.member
        } else {
            self.non_member
        }
    }

    /// Percentage points a member saves over the non-member rate.
    pub fn member_savings(&self) -> Decimal {
        self.non_member - self.member
    }
}

/// Annual rate, in percent, applied to a borrower.
pub const fn rate_for(is_member: bool) -> Decimal {
    RATE_POLICY.rate_for(is_member)
}

/// Inputs for a single recalculation of the quote panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuoteRequest {
    pub principal: Decimal,
    /// Zero or negative while the borrower has not picked a term.
    pub term_months: i32,
    pub is_member: bool,
}

/// Level-payment quote derived from a [`LoanQuoteRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub monthly_payment: Decimal,
    pub annual_rate: Decimal,
    pub total_months: i32,
    pub total_repayment: Decimal,
    pub total_interest: Decimal,
}

pub fn quote(request: LoanQuoteRequest) -> LoanQuote {
    let annual_rate = rate_for(request.is_member);
    let monthly_payment = monthly_payment(request.principal, annual_rate, request.term_months);

    if monthly_payment.is_zero() {
        return LoanQuote {
            monthly_payment,
            annual_rate,
            total_months: request.term_months,
            total_repayment: ZERO_PAYMENT,
            total_interest: ZERO_PAYMENT,
        };
    }

    let total_repayment = monthly_payment
        .checked_mul(Decimal::from(request.term_months))
        .map(to_cents)
        .unwrap_or(ZERO_PAYMENT);
    // Rounding each installment to cents can leave the total a cent under the principal.
    let total_interest = if total_repayment > request.principal {
        to_cents(total_repayment - request.principal)
    } else {
        ZERO_PAYMENT
    };

    LoanQuote {
        monthly_payment,
        annual_rate,
        total_months: request.term_months,
        total_repayment,
        total_interest,
    }
}

/// Fixed monthly installment for a fully amortizing loan, rounded to cents.
///
/// Returns `0.00` when the principal or term is not positive. A zero rate repays the
/// principal in equal parts; negative rates are treated as zero.
pub fn monthly_payment(principal: Decimal, annual_rate_percent: Decimal, term_months: i32) -> Decimal {
    if principal <= Decimal::ZERO || term_months <= 0 {
        return ZERO_PAYMENT;
    }

    let months = Decimal::from(term_months);
    let monthly_rate = annual_rate_percent.max(Decimal::ZERO) / PERCENT / MONTHS_PER_YEAR;

    if monthly_rate.is_zero() {
        return to_cents(principal / months);
    }

    u64::try_from(term_months)
        .ok()
        .and_then(|periods| amortized_installment(principal, monthly_rate, periods))
        .map(to_cents)
        .unwrap_or(ZERO_PAYMENT)
}

/// `P * r / (1 - (1 + r)^-n)`, or `None` on overflow.
///
/// Once `(1 + r)^n` leaves the decimal range the discount term is indistinguishable from
/// zero and the installment is the interest on the principal.
fn amortized_installment(principal: Decimal, monthly_rate: Decimal, periods: u64) -> Option<Decimal> {
    let interest = principal.checked_mul(monthly_rate)?;
    let Some(growth) = (Decimal::ONE + monthly_rate).checked_powu(periods) else {
        return Some(interest);
    };
    let discount = Decimal::ONE.checked_div(growth)?;
    interest.checked_div(Decimal::ONE - discount)
}

fn to_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
