//! Member dashboard backed by sample portfolio data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::session::MemberProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    PaidOff,
}

/// Loan shown in the dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLoan {
    pub id: String,
    pub amount: Decimal,
    pub balance: Decimal,
    pub next_payment: NaiveDate,
    pub status: LoanStatus,
}

/// Installment recorded against one of the member's loans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub loan_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub member_name: String,
    pub membership: &'static str,
    pub is_admin: bool,
    pub active_loans: usize,
    pub total_balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment: Option<NaiveDate>,
    pub loans: Vec<MemberLoan>,
    pub recent_payments: Vec<PaymentRecord>,
}

impl DashboardSnapshot {
    pub fn for_member(member: &MemberProfile) -> Self {
        Self::build(member, sample_loans(), sample_payments())
    }

    pub fn build(
        member: &MemberProfile,
        loans: Vec<MemberLoan>,
        recent_payments: Vec<PaymentRecord>,
    ) -> Self {
        let active = loans
            .iter()
            .filter(|loan| loan.status == LoanStatus::Active);
        let active_loans = active.clone().count();
        let total_balance = active.clone().map(|loan| loan.balance).sum();
        let next_payment = active.map(|loan| loan.next_payment).min();

        Self {
            member_name: member.name.clone(),
            membership: member.membership_label(),
            is_admin: member.is_admin,
            active_loans,
            total_balance,
            next_payment,
            loans,
            recent_payments,
        }
    }
}

fn sample_loans() -> Vec<MemberLoan> {
    [
        ("001", 5000, 3500, (2024, 1, 15)),
        ("002", 2000, 500, (2024, 1, 20)),
    ]
    .into_iter()
    .filter_map(|(id, amount, balance, (year, month, day))| {
        Some(MemberLoan {
            id: id.to_string(),
            amount: Decimal::from(amount),
            balance: Decimal::from(balance),
            next_payment: NaiveDate::from_ymd_opt(year, month, day)?,
            status: LoanStatus::Active,
        })
    })
    .collect()
}

fn sample_payments() -> Vec<PaymentRecord> {
    [
        ("1", 250, (2023, 12, 15), "001"),
        ("2", 150, (2023, 12, 10), "002"),
    ]
    .into_iter()
    .filter_map(|(id, amount, (year, month, day), loan_id)| {
        Some(PaymentRecord {
            id: id.to_string(),
            amount: Decimal::from(amount),
            date: NaiveDate::from_ymd_opt(year, month, day)?,
            loan_id: loan_id.to_string(),
        })
    })
    .collect()
}
