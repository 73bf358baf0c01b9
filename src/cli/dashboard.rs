use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::{open_configured_store, resolve_today};
use crate::emi::{DueBasis, ZeroRatePolicy};
use crate::error::Result;
use crate::fmt::{days_label, money, plain_number};
use crate::models::Loan;
use crate::portfolio::{highest_emi, sort_loans, totals, upcoming_dues, SortOrder};
use crate::store::load_loans;

/// Display options taken from settings.
pub struct View<'a> {
    pub symbol: &'a str,
    pub policy: ZeroRatePolicy,
    pub basis: DueBasis,
    pub sort: SortOrder,
    pub today: NaiveDate,
}

pub fn run(sort: Option<SortOrder>, today: Option<NaiveDate>) -> Result<()> {
    let (settings, store) = open_configured_store()?;
    let loans = load_loans(store.as_ref())?;
    let view = View {
        symbol: &settings.currency_symbol,
        policy: settings.zero_rate,
        basis: settings.due_basis,
        sort: sort.unwrap_or(settings.default_sort),
        today: resolve_today(today),
    };
    println!("{}", format_dashboard(loans, &view));
    Ok(())
}

/// `Mon Jul 15 2024`
fn long_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

pub fn format_dashboard(mut loans: Vec<Loan>, view: &View) -> String {
    sort_loans(&mut loans, view.sort, view.policy);
    let t = totals(&loans, view.policy);

    let mut out = String::new();
    out.push_str(&format!("{}\n", "ClearEMI".bold()));
    out.push_str(&format!("Total Outstanding  {}\n", money(t.outstanding, view.symbol)));
    out.push_str(&format!("Monthly EMI        {}\n", money(t.monthly_emi, view.symbol)));

    let dues = upcoming_dues(&loans, view.policy, view.basis, view.today);
    out.push('\n');
    if dues.is_empty() {
        out.push_str("No EMIs yet\n");
    } else {
        out.push_str(&format!("{}\n", "Next EMI Due".bold()));
        for due in &dues {
            let when = days_label(due.days_left);
            let when = if due.days_left < 0 { when.red() } else { when.normal() };
            out.push_str(&format!(
                "  {} \u{2022} {} \u{2022} {} \u{2022} {} ({})\n",
                due.loan.lender,
                due.loan.loan_type,
                money(due.emi, view.symbol),
                long_date(due.due_date),
                when,
            ));
        }
    }

    out.push('\n');
    if loans.is_empty() {
        out.push_str("No loans yet. Add one with `clearemi add`.");
        return out;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Lender", "Amount", "Rate", "Tenure", "Start", "EMI", "Paid"]);
    for loan in &loans {
        table.add_row(vec![
            Cell::new(&loan.id),
            Cell::new(&loan.loan_type),
            Cell::new(&loan.lender),
            Cell::new(money(loan.amount, view.symbol)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}%", plain_number(loan.rate))).set_alignment(CellAlignment::Right),
            Cell::new(loan.tenure).set_alignment(CellAlignment::Right),
            Cell::new(&loan.start_date),
            Cell::new(money(loan.emi(view.policy), view.symbol)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}/{}", loan.paid_count(), loan.tenure)),
        ]);
    }
    out.push_str(&format!("Loans\n{table}\n"));

    if let Some(top) = highest_emi(&loans, view.policy) {
        out.push_str(&format!("\n{}\n", "Insights".bold()));
        out.push_str(&format!("  Highest EMI: {} ({})", top.loan_type, top.lender));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(sort: SortOrder) -> View<'static> {
        View {
            symbol: "₹",
            policy: ZeroRatePolicy::ReportZero,
            basis: DueBasis::Schedule,
            sort,
            today: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        }
    }

    fn loan(id: &str, loan_type: &str, lender: &str, amount: f64, rate: f64, tenure: u32, start: &str) -> Loan {
        Loan {
            id: id.to_string(),
            loan_type: loan_type.to_string(),
            lender: lender.to_string(),
            amount,
            rate,
            tenure,
            start_date: start.to_string(),
            paid_months: Vec::new(),
        }
    }

    #[test]
    fn test_empty_dashboard() {
        colored::control::set_override(false);
        let out = format_dashboard(Vec::new(), &view(SortOrder::Added));
        assert!(out.contains("Total Outstanding  ₹0"));
        assert!(out.contains("Monthly EMI        ₹0"));
        assert!(out.contains("No EMIs yet"));
        assert!(out.contains("No loans yet"));
        assert!(!out.contains("Highest EMI"));
    }

    #[test]
    fn test_dashboard_totals_dues_and_insight() {
        colored::control::set_override(false);
        let loans = vec![
            loan("a1", "Personal", "Axis", 120000.0, 12.0, 12, "2024-01-15"),
            loan("b2", "Home", "HDFC", 500000.0, 9.0, 60, "2023-06-01"),
            loan("c3", "Gold", "Muthoot", 20000.0, 11.0, 6, "2023-01-01"),
        ];
        let out = format_dashboard(loans, &view(SortOrder::Added));
        assert!(out.contains("Total Outstanding  ₹640,000"));
        assert!(out.contains("Axis \u{2022} Personal \u{2022} ₹10,662 \u{2022} Mon Jul 15 2024 (in 25 days)"));
        assert!(out.contains("HDFC \u{2022} Home"));
        assert!(!out.contains("Muthoot \u{2022}"));
        assert!(out.contains("Highest EMI: Personal (Axis)"));
        assert!(out.contains("a1"));
    }

    #[test]
    fn test_dashboard_sorting_changes_row_order() {
        colored::control::set_override(false);
        let loans = vec![
            loan("small", "Gold", "Muthoot", 20000.0, 11.0, 6, "2024-05-01"),
            loan("big", "Personal", "Axis", 120000.0, 12.0, 12, "2024-01-15"),
        ];
        let out = format_dashboard(loans.clone(), &view(SortOrder::Emi));
        assert!(out.find("big").unwrap() < out.find("small").unwrap());
        let out = format_dashboard(loans, &view(SortOrder::Added));
        assert!(out.find("small").unwrap() < out.find("big").unwrap());
    }
}
