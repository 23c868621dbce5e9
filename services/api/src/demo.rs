use crate::infra::build_portal;
use clap::Args;
use coop_lending::config::SimulationConfig;
use coop_lending::error::AppError;
use coop_lending::workflows::dashboard::DashboardSnapshot;
use coop_lending::workflows::loans::{
    quote, ApplicationField, LoanQuote, LoanQuoteRequest, RATE_POLICY,
};
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Principal to borrow
    #[arg(long)]
    pub(crate) amount: Decimal,
    /// Repayment term in months
    #[arg(long)]
    pub(crate) term: i32,
    /// Price at the non-member rate
    #[arg(long)]
    pub(crate) non_member: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// E-mail used for the mock login. `noSocio@example.com` signs in as a non-member.
    #[arg(long, default_value = "ana@example.com")]
    pub(crate) email: String,
    /// Amount to request
    #[arg(long, default_value = "5000")]
    pub(crate) amount: String,
    /// Term in months (6, 12, 18, 24, 36, or 48)
    #[arg(long, default_value = "12")]
    pub(crate) term: String,
    /// Loan purpose (personal, business, education, home)
    #[arg(long, default_value = "personal")]
    pub(crate) purpose: String,
    /// Optional notes for the loan officer
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

pub(crate) fn run_quote(args: QuoteArgs) {
    let QuoteArgs {
        amount,
        term,
        non_member,
    } = args;

    let quote = quote(LoanQuoteRequest {
        principal: amount,
        term_months: term,
        is_member: !non_member,
    });

    println!("Loan quote");
    render_quote(amount, &quote);
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        email,
        amount,
        term,
        purpose,
        notes,
    } = args;

    let portal = build_portal(SimulationConfig::immediate());

    println!("Cooperative member portal demo");
    let profile = match portal.login(&email, "demo").await {
        Ok(profile) => profile,
        Err(error) => {
            println!("- login failed: {error}");
            return Ok(());
        }
    };
    println!(
        "- signed in as {} <{}> ({}{})",
        profile.name,
        profile.email,
        profile.membership_label(),
        if profile.is_admin { ", admin" } else { "" }
    );

    let rates = portal.rates();
    println!(
        "- rates: member {}% | non-member {}% | member advantage {} points",
        rates.member_rate, rates.non_member_rate, rates.member_savings
    );

    let fields = [
        (ApplicationField::Amount, amount),
        (ApplicationField::Term, term),
        (ApplicationField::Purpose, purpose),
        (ApplicationField::Notes, notes.unwrap_or_default()),
    ];
    let mut view = None;
    for (field, value) in fields {
        match portal.update_field(field, value) {
            Ok(updated) => view = Some(updated),
            Err(error) => {
                println!("- form unavailable: {error}");
                return Ok(());
            }
        }
    }

    if let Some(view) = view {
        println!("\nApplication summary");
        render_quote(view.draft.amount_value(), &view.quote);
        println!("- ready to submit: {}", view.can_submit);
    }

    match portal.submit().await {
        Ok(receipt) => println!(
            "- submitted as {} at {}",
            receipt.application_id,
            receipt.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        Err(error) => println!("- submission not accepted: {error}"),
    }

    match portal.dashboard() {
        Ok(snapshot) => render_dashboard(&snapshot),
        Err(error) => println!("- dashboard unavailable: {error}"),
    }

    Ok(())
}

fn render_quote(principal: Decimal, quote: &LoanQuote) {
    let tier = if quote.annual_rate == RATE_POLICY.member {
        "member"
    } else {
        "non-member"
    };
    println!("- principal: ${principal}");
    println!("- term: {} months", quote.total_months.max(0));
    println!("- rate: {}% annual ({tier})", quote.annual_rate);
    println!("- monthly payment: ${}", quote.monthly_payment);
    println!(
        "- total repaid: ${} (interest ${})",
        quote.total_repayment, quote.total_interest
    );
}

fn render_dashboard(snapshot: &DashboardSnapshot) {
    println!("\nDashboard for {}", snapshot.member_name);
    println!(
        "- {} active loans | outstanding balance ${}",
        snapshot.active_loans, snapshot.total_balance
    );
    if let Some(next) = snapshot.next_payment {
        println!("- next payment due {}", next.format("%Y-%m-%d"));
    }
    for loan in &snapshot.loans {
        println!(
            "  - loan #{}: original ${} | balance ${} | next payment {}",
            loan.id, loan.amount, loan.balance, loan.next_payment
        );
    }
    if !snapshot.recent_payments.is_empty() {
        println!("Recent payments:");
        for payment in &snapshot.recent_payments {
            println!(
                "  - ${} on {} toward loan #{}",
                payment.amount, payment.date, payment.loan_id
            );
        }
    }
}
