use chrono::Utc;

use crate::cli::open_configured_store;
use crate::error::Result;
use crate::store::update_loan;

pub fn run(id: &str) -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let loan = update_loan(store.as_ref(), id, |loan| loan.record_payment(Utc::now()))?;
    let paid = loan.paid_count();
    if paid > loan.tenure {
        log::warn!("loan {id} now has {paid} payments recorded against a tenure of {}", loan.tenure);
    }
    println!(
        "Marked installment {paid} of {} paid for {} ({})",
        loan.tenure, loan.lender, loan.loan_type
    );
    Ok(())
}
