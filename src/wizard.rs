//! The add-loan flow as an explicit state machine: two input steps, then a
//! summary from which the loan is submitted.

use chrono::NaiveDate;

use crate::emi::ZeroRatePolicy;
use crate::fmt::{money, plain_number};
use crate::models::{format_date, parse_date, Loan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Loan type and lender.
    Details,
    /// Amount, rate, tenure and start date.
    Terms,
    Summary,
}

pub const STEP_COUNT: u8 = 3;

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Details => 1,
            Step::Terms => 2,
            Step::Summary => 3,
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Details => &[Field::LoanType, Field::Lender],
            Step::Terms => &[Field::Amount, Field::Rate, Field::Tenure, Field::StartDate],
            Step::Summary => &[],
        }
    }

    fn next(self) -> Step {
        match self {
            Step::Details => Step::Terms,
            Step::Terms | Step::Summary => Step::Summary,
        }
    }

    fn previous(self) -> Step {
        match self {
            Step::Details | Step::Terms => Step::Details,
            Step::Summary => Step::Terms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LoanType,
    Lender,
    Amount,
    Rate,
    Tenure,
    StartDate,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::LoanType => "Loan type",
            Field::Lender => "Lender",
            Field::Amount => "Amount",
            Field::Rate => "Interest rate (% per year)",
            Field::Tenure => "Tenure (months)",
            Field::StartDate => "Start date (YYYY-MM-DD, blank for today)",
        }
    }

    /// Reject input the form cannot hold. Blank is always accepted.
    pub fn validate(self, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        match self {
            Field::LoanType | Field::Lender => Ok(()),
            Field::Amount | Field::Rate => match value.parse::<f64>() {
                Ok(n) if n.is_finite() && n >= 0.0 => Ok(()),
                _ => Err(format!("{} must be a non-negative number", self.label())),
            },
            Field::Tenure => match value.parse::<u32>() {
                Ok(_) => Ok(()),
                Err(_) => Err("Tenure must be a whole number of months".to_string()),
            },
            Field::StartDate => match parse_date(value) {
                Some(_) => Ok(()),
                None => Err("Start date must look like 2024-01-15".to_string()),
            },
        }
    }
}

/// Raw field values, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanForm {
    pub loan_type: String,
    pub lender: String,
    pub amount: String,
    pub rate: String,
    pub tenure: String,
    pub start_date: String,
}

impl LoanForm {
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            loan_type: loan.loan_type.clone(),
            lender: loan.lender.clone(),
            amount: plain_number(loan.amount),
            rate: plain_number(loan.rate),
            tenure: loan.tenure.to_string(),
            start_date: loan.start_date.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LoanType => &self.loan_type,
            Field::Lender => &self.lender,
            Field::Amount => &self.amount,
            Field::Rate => &self.rate,
            Field::Tenure => &self.tenure,
            Field::StartDate => &self.start_date,
        }
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::LoanType => &mut self.loan_type,
            Field::Lender => &mut self.lender,
            Field::Amount => &mut self.amount,
            Field::Rate => &mut self.rate,
            Field::Tenure => &mut self.tenure,
            Field::StartDate => &mut self.start_date,
        };
        *slot = value.trim().to_string();
    }

    fn number(raw: &str) -> f64 {
        raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
    }

    fn amount_value(&self) -> f64 {
        Self::number(&self.amount)
    }

    fn rate_value(&self) -> f64 {
        Self::number(&self.rate)
    }

    fn tenure_value(&self) -> u32 {
        self.tenure.trim().parse().unwrap_or(0)
    }

    fn start_value(&self, today: NaiveDate) -> String {
        if self.start_date.trim().is_empty() {
            format_date(today)
        } else {
            self.start_date.trim().to_string()
        }
    }

    /// A new loan from the form. Unparseable numbers become 0.
    pub fn to_loan(&self, today: NaiveDate) -> Loan {
        let mut loan = Loan::new(
            &self.loan_type,
            &self.lender,
            self.amount_value(),
            self.rate_value(),
            self.tenure_value(),
            None,
            today,
        );
        loan.start_date = self.start_value(today);
        loan
    }

    /// Overwrite every user-entered field of `loan`. Id and payment log stay.
    pub fn apply_to(&self, loan: &mut Loan, today: NaiveDate) {
        loan.loan_type = self.loan_type.clone();
        loan.lender = self.lender.clone();
        loan.amount = self.amount_value();
        loan.rate = self.rate_value();
        loan.tenure = self.tenure_value();
        loan.start_date = self.start_value(today);
    }

    pub fn summary_lines(&self, symbol: &str, policy: ZeroRatePolicy, today: NaiveDate) -> Vec<(String, String)> {
        let emi = crate::emi::calculate_emi_with(
            policy,
            self.amount_value(),
            self.rate_value(),
            self.tenure_value(),
        );
        vec![
            ("Loan Type".to_string(), self.loan_type.clone()),
            ("Lender".to_string(), self.lender.clone()),
            ("Amount".to_string(), money(self.amount_value(), symbol)),
            ("Interest".to_string(), format!("{}%", plain_number(self.rate_value()))),
            ("Tenure".to_string(), format!("{} months", self.tenure_value())),
            ("Start Date".to_string(), self.start_value(today)),
            ("EMI".to_string(), money(emi, symbol)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddLoanWizard {
    step: Step,
    form: LoanForm,
}

impl Default for AddLoanWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl AddLoanWizard {
    pub fn new() -> Self {
        Self::with_form(LoanForm::default())
    }

    /// Start at the first step with fields prefilled, as when editing.
    pub fn with_form(form: LoanForm) -> Self {
        Self {
            step: Step::Details,
            form,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn progress(&self) -> String {
        format!("Step {} of {STEP_COUNT}", self.step.number())
    }

    pub fn form(&self) -> &LoanForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LoanForm {
        &mut self.form
    }

    /// Advance one step; stays on the summary once there.
    pub fn next(&mut self) -> Step {
        self.step = self.step.next();
        self.step
    }

    /// Go back one step; stays on the first step once there.
    pub fn previous(&mut self) -> Step {
        self.step = self.step.previous();
        self.step
    }

    /// Finish the flow. Only the summary step can submit; any other step hands
    /// the wizard back unchanged.
    pub fn submit(self) -> Result<LoanForm, AddLoanWizard> {
        if self.step == Step::Summary {
            Ok(self.form)
        } else {
            Err(self)
        }
    }
}
