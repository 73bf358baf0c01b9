use crate::cli::open_configured_store;
use crate::error::Result;
use crate::models::Loan;
use crate::store::load_loans;

pub fn run() -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let loans = load_loans(store.as_ref())?;
    println!("{}", format_calendar(&loans));
    Ok(())
}

/// One line per loan in stored order. The start date is shown as entered.
pub fn format_calendar(loans: &[Loan]) -> String {
    if loans.is_empty() {
        return "No loans yet.".to_string();
    }
    loans
        .iter()
        .map(|l| format!("{} \u{2022} {} \u{2022} {}", l.lender, l.loan_type, l.start_date))
        .collect::<Vec<_>>()
        .join("\n")
}
