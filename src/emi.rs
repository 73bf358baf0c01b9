//! EMI arithmetic and due-date projection.
//!
//! Everything here is pure and infallible: malformed inputs degrade to `0.0`
//! or `None` instead of raising.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// How a loan with an exact 0% rate is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRatePolicy {
    /// A zero rate short-circuits to an EMI of 0, like a missing principal or tenure.
    #[default]
    ReportZero,
    /// A zero rate spreads the principal evenly: EMI = principal / months.
    SplitPrincipal,
}

/// What the next due date is projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBasis {
    /// Calendar months elapsed since the start date, assuming on-schedule payment.
    #[default]
    Schedule,
    /// Number of installments recorded as paid.
    Payments,
}

fn is_blank(x: f64) -> bool {
    x == 0.0 || x.is_nan()
}

/// Standard amortizing monthly payment. Returns 0 when any input is zero.
///
/// ```text
/// r   = annual_rate_percent / 12 / 100
/// emi = P * r * (1 + r)^n / ((1 + r)^n - 1)
/// ```
pub fn calculate_emi(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    if is_blank(principal) || is_blank(annual_rate_percent) || months == 0 {
        return 0.0;
    }
    let r = annual_rate_percent / 12.0 / 100.0;
    let growth = (1.0 + r).powf(months as f64);
    principal * r * growth / (growth - 1.0)
}

pub fn calculate_emi_with(
    policy: ZeroRatePolicy,
    principal: f64,
    annual_rate_percent: f64,
    months: u32,
) -> f64 {
    match policy {
        ZeroRatePolicy::SplitPrincipal
            if annual_rate_percent == 0.0 && !is_blank(principal) && months > 0 =>
        {
            principal / months as f64
        }
        _ => calculate_emi(principal, annual_rate_percent, months),
    }
}

/// Whole calendar months from `start` to `today`, ignoring day of month.
/// Never negative.
pub fn months_passed(start: NaiveDate, today: NaiveDate) -> u32 {
    let months = (today.year() as i64 - start.year() as i64) * 12
        + (today.month() as i64 - start.month() as i64);
    months.clamp(0, u32::MAX as i64) as u32
}

/// Advance by whole months, keeping the day of month and letting it overflow
/// into the following month: Jan 31 + 1 month is Mar 3 (Mar 2 in leap years).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(date.day0() as u64))
}

/// Next installment date assuming payments have kept to schedule.
/// `None` once every installment has fallen due.
pub fn project_next_due_date(start: NaiveDate, tenure: u32, today: NaiveDate) -> Option<NaiveDate> {
    let passed = months_passed(start, today);
    if passed < tenure {
        add_months(start, passed + 1)
    } else {
        None
    }
}

/// Next installment date after `paid` recorded payments.
pub fn next_due_from_payments(start: NaiveDate, tenure: u32, paid: u32) -> Option<NaiveDate> {
    if paid < tenure {
        add_months(start, paid + 1)
    } else {
        None
    }
}

pub fn next_due(
    basis: DueBasis,
    start: NaiveDate,
    tenure: u32,
    paid: u32,
    today: NaiveDate,
) -> Option<NaiveDate> {
    match basis {
        DueBasis::Schedule => project_next_due_date(start, tenure, today),
        DueBasis::Payments => next_due_from_payments(start, tenure, paid),
    }
}

/// Days from `today` until `date`; negative when the date has passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationRow {
    pub month: u32,
    pub due_date: Option<NaiveDate>,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

/// Month-by-month split of each installment into interest and principal.
/// The last row retires whatever balance is left, so it always ends at 0.
/// Loans without a payable EMI produce no rows.
pub fn amortization_schedule(
    policy: ZeroRatePolicy,
    principal: f64,
    annual_rate_percent: f64,
    months: u32,
    start: Option<NaiveDate>,
) -> Vec<AmortizationRow> {
    let emi = calculate_emi_with(policy, principal, annual_rate_percent, months);
    if emi == 0.0 || !emi.is_finite() {
        return Vec::new();
    }
    let r = annual_rate_percent / 12.0 / 100.0;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = balance * r;
        let principal_part = if month == months { balance } else { emi - interest };
        balance -= principal_part;
        if month == months {
            balance = 0.0;
        }
        rows.push(AmortizationRow {
            month,
            due_date: start.and_then(|s| add_months(s, month)),
            payment: interest + principal_part,
            interest,
            principal: principal_part,
            balance,
        });
    }
    rows
}
