use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::open_configured_store;
use crate::emi::{amortization_schedule, ZeroRatePolicy};
use crate::error::Result;
use crate::fmt::{money, plain_number};
use crate::models::{format_date, Loan};
use crate::store::find_loan;

pub fn run(id: &str) -> Result<()> {
    let (settings, store) = open_configured_store()?;
    let loan = find_loan(store.as_ref(), id)?;
    println!("{}", format_schedule(&loan, &settings.currency_symbol, settings.zero_rate));
    Ok(())
}

pub fn format_schedule(loan: &Loan, symbol: &str, policy: ZeroRatePolicy) -> String {
    let mut out = format!(
        "{} \u{2022} {} \u{2022} {} at {}% for {} months\n",
        loan.lender,
        loan.loan_type,
        money(loan.amount, symbol),
        plain_number(loan.rate),
        loan.tenure,
    );

    let rows = amortization_schedule(policy, loan.amount, loan.rate, loan.tenure, loan.start());
    if rows.is_empty() {
        out.push_str("No repayment schedule: the EMI for this loan is 0.");
        return out;
    }

    let paid = loan.paid_count();
    let mut table = Table::new();
    table.set_header(vec!["#", "Due", "EMI", "Interest", "Principal", "Balance", ""]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(row.month).set_alignment(CellAlignment::Right),
            Cell::new(row.due_date.map(format_date).unwrap_or_else(|| "-".to_string())),
            Cell::new(money(row.payment, symbol)).set_alignment(CellAlignment::Right),
            Cell::new(money(row.interest, symbol)).set_alignment(CellAlignment::Right),
            Cell::new(money(row.principal, symbol)).set_alignment(CellAlignment::Right),
            Cell::new(money(row.balance, symbol)).set_alignment(CellAlignment::Right),
            Cell::new(if row.month <= paid { "paid" } else { "" }),
        ]);
    }
    out.push_str(&table.to_string());

    let interest: f64 = rows.iter().map(|r| r.interest).sum();
    out.push_str(&format!(
        "\nTotal interest: {}  Total payable: {}",
        money(interest, symbol),
        money(interest + loan.amount, symbol)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn personal() -> Loan {
        let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        let mut loan = Loan::new("Personal", "Axis", 120000.0, 12.0, 12, NaiveDate::from_ymd_opt(2024, 1, 15), today);
        loan.paid_months = vec!["2024-02-15T09:00:00.000Z".to_string(); 2];
        loan
    }

    #[test]
    fn test_schedule_table() {
        let out = format_schedule(&personal(), "₹", ZeroRatePolicy::ReportZero);
        assert!(out.starts_with("Axis \u{2022} Personal \u{2022} ₹120,000 at 12% for 12 months"));
        assert!(out.contains("2024-02-15"));
        assert!(out.contains("2025-01-15"));
        assert!(out.contains("₹10,662"));
        assert!(out.contains("₹1,200"));
        assert_eq!(out.matches("paid").count(), 2);
        assert!(out.contains("Total interest: ₹7,942"));
    }

    #[test]
    fn test_zero_emi_has_no_schedule() {
        let mut loan = personal();
        loan.rate = 0.0;
        let out = format_schedule(&loan, "₹", ZeroRatePolicy::ReportZero);
        assert!(out.contains("No repayment schedule"));

        let out = format_schedule(&loan, "₹", ZeroRatePolicy::SplitPrincipal);
        assert!(out.contains("₹10,000"));
        assert!(out.contains("Total interest: ₹0"));
    }
}
