use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::emi::{self, DueBasis, ZeroRatePolicy};
use crate::models::Loan;

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

pub struct Totals {
    /// Sum of principals; not reduced by payments made.
    pub outstanding: f64,
    pub monthly_emi: f64,
    pub loan_count: usize,
}

pub fn totals(loans: &[Loan], policy: ZeroRatePolicy) -> Totals {
    Totals {
        outstanding: loans.iter().map(|l| l.amount).sum(),
        monthly_emi: loans.iter().map(|l| l.emi(policy)).sum(),
        loan_count: loans.len(),
    }
}

/// First loan with the strictly greatest EMI.
pub fn highest_emi(loans: &[Loan], policy: ZeroRatePolicy) -> Option<&Loan> {
    let mut iter = loans.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, l| {
        if l.emi(policy) > best.emi(policy) { l } else { best }
    }))
}

// ---------------------------------------------------------------------------
// Display ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Stored (insertion) order
    #[default]
    Added,
    /// Highest EMI first
    Emi,
    /// Earliest start date first
    Date,
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Reorder for display only. Both orderings are stable.
pub fn sort_loans(loans: &mut [Loan], order: SortOrder, policy: ZeroRatePolicy) {
    match order {
        SortOrder::Added => {}
        SortOrder::Emi => loans.sort_by(|a, b| b.emi(policy).total_cmp(&a.emi(policy))),
        SortOrder::Date => loans.sort_by_key(|l| l.start().unwrap_or_else(epoch)),
    }
}

// ---------------------------------------------------------------------------
// Upcoming dues
// ---------------------------------------------------------------------------

pub struct UpcomingDue<'a> {
    pub loan: &'a Loan,
    pub emi: f64,
    pub due_date: NaiveDate,
    pub days_left: i64,
}

/// Next installment for every loan that still has one, in the given order.
/// Loans without a valid start date are skipped.
pub fn upcoming_dues(
    loans: &[Loan],
    policy: ZeroRatePolicy,
    basis: DueBasis,
    today: NaiveDate,
) -> Vec<UpcomingDue<'_>> {
    loans
        .iter()
        .filter_map(|loan| {
            let start = loan.start()?;
            let due_date = emi::next_due(basis, start, loan.tenure, loan.paid_count(), today)?;
            Some(UpcomingDue {
                loan,
                emi: loan.emi(policy),
                due_date,
                days_left: emi::days_until(due_date, today),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(lender: &str, amount: f64, rate: f64, tenure: u32, start: &str) -> Loan {
        Loan {
            id: lender.to_lowercase(),
            loan_type: "Personal".to_string(),
            lender: lender.to_string(),
            amount,
            rate,
            tenure,
            start_date: start.to_string(),
            paid_months: Vec::new(),
        }
    }

    fn sample() -> Vec<Loan> {
        vec![
            loan("Axis", 120000.0, 12.0, 12, "2024-01-15"),
            loan("Kotak", 500000.0, 9.0, 60, ""),
            loan("HDFC", 120000.0, 12.0, 12, "2023-06-01"),
            loan("SBI", 20000.0, 0.0, 10, "garbage"),
        ]
    }

    #[test]
    fn test_totals() {
        let t = totals(&sample(), ZeroRatePolicy::ReportZero);
        assert_eq!(t.outstanding, 760000.0);
        assert_eq!(t.loan_count, 4);
        let expected = 2.0 * emi::calculate_emi(120000.0, 12.0, 12)
            + emi::calculate_emi(500000.0, 9.0, 60);
        assert_relative_eq!(t.monthly_emi, expected, epsilon = 1e-9);

        let split = totals(&sample(), ZeroRatePolicy::SplitPrincipal);
        assert_relative_eq!(split.monthly_emi, expected + 2000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_totals_empty() {
        let t = totals(&[], ZeroRatePolicy::ReportZero);
        assert_eq!(t.outstanding, 0.0);
        assert_eq!(t.monthly_emi, 0.0);
    }

    #[test]
    fn test_highest_emi_prefers_first_on_tie() {
        let loans = vec![
            loan("Axis", 120000.0, 12.0, 12, "2024-01-15"),
            loan("HDFC", 120000.0, 12.0, 12, "2023-06-01"),
        ];
        assert_eq!(highest_emi(&loans, ZeroRatePolicy::ReportZero).unwrap().lender, "Axis");

        let all = sample();
        let best = highest_emi(&all, ZeroRatePolicy::ReportZero).unwrap();
        assert_eq!(best.lender, "Axis");
        assert!(highest_emi(&[], ZeroRatePolicy::ReportZero).is_none());
    }

    #[test]
    fn test_sort_by_emi_is_stable_descending() {
        let mut loans = sample();
        sort_loans(&mut loans, SortOrder::Emi, ZeroRatePolicy::ReportZero);
        let lenders: Vec<&str> = loans.iter().map(|l| l.lender.as_str()).collect();
        assert_eq!(lenders, vec!["Axis", "HDFC", "Kotak", "SBI"]);
        let emis: Vec<f64> = loans.iter().map(|l| l.emi(ZeroRatePolicy::ReportZero)).collect();
        assert!(emis.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_by_date_puts_invalid_first() {
        let mut loans = sample();
        loans.push(loan("Old", 1.0, 1.0, 1, "1965-04-01"));
        sort_loans(&mut loans, SortOrder::Date, ZeroRatePolicy::ReportZero);
        let lenders: Vec<&str> = loans.iter().map(|l| l.lender.as_str()).collect();
        assert_eq!(lenders, vec!["Old", "Kotak", "SBI", "HDFC", "Axis"]);
    }

    #[test]
    fn test_sort_added_keeps_order() {
        let mut loans = sample();
        sort_loans(&mut loans, SortOrder::Added, ZeroRatePolicy::ReportZero);
        assert_eq!(loans, sample());
    }

    #[test]
    fn test_upcoming_dues_skips_matured_and_invalid() {
        let loans = sample();
        let dues = upcoming_dues(&loans, ZeroRatePolicy::ReportZero, DueBasis::Schedule, date(2024, 6, 20));
        assert_eq!(dues.len(), 1);
        assert_eq!(dues[0].loan.lender, "Axis");
        assert_eq!(dues[0].due_date, date(2024, 7, 15));
        assert_eq!(dues[0].days_left, 25);
    }

    #[test]
    fn test_upcoming_dues_from_payments() {
        let mut loans = sample();
        loans[2].paid_months = vec!["2023-07-01T00:00:00.000Z".to_string(); 3];
        let dues = upcoming_dues(&loans, ZeroRatePolicy::ReportZero, DueBasis::Payments, date(2024, 6, 20));
        let lenders: Vec<&str> = dues.iter().map(|d| d.loan.lender.as_str()).collect();
        assert_eq!(lenders, vec!["Axis", "HDFC"]);
        assert_eq!(dues[0].due_date, date(2024, 2, 15));
        assert_eq!(dues[1].due_date, date(2023, 10, 1));
        assert!(dues[1].days_left < 0);
    }
}
