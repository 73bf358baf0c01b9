pub mod add;
pub mod calendar;
pub mod clear;
pub mod dashboard;
pub mod edit;
pub mod export;
pub mod init;
pub mod pay;
pub mod remove;
pub mod schedule;
pub mod status;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::models::parse_date;
use crate::portfolio::SortOrder;
use crate::settings::{load_settings, Settings, StorageBackend};
use crate::store::{open_store, LoanStore};

pub(crate) fn parse_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a date like 2024-01-15"))
}

pub(crate) fn parse_non_negative(raw: &str) -> std::result::Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(format!("'{raw}' is not a non-negative number")),
    }
}

/// Settings plus the store they point at.
pub(crate) fn open_configured_store() -> Result<(Settings, Box<dyn LoanStore>)> {
    let settings = load_settings();
    let store = open_store(&settings)?;
    log::debug!("using {:?} store at {}", settings.storage, store.location().display());
    Ok((settings, store))
}

pub(crate) fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

#[derive(Parser)]
#[command(name = "clearemi", version, about = "Track loans, EMIs and upcoming dues.")]
pub struct Cli {
    /// Evaluate dues as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Loan fields accepted by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct LoanArgs {
    /// Loan category, e.g. Home, Car, Personal
    #[arg(long = "type")]
    pub loan_type: Option<String>,
    /// Lender name
    #[arg(long)]
    pub lender: Option<String>,
    /// Principal borrowed
    #[arg(long, value_parser = parse_non_negative)]
    pub amount: Option<f64>,
    /// Annual interest rate in percent
    #[arg(long, value_parser = parse_non_negative)]
    pub rate: Option<f64>,
    /// Number of monthly installments
    #[arg(long)]
    pub tenure: Option<u32>,
    /// First day of the loan: YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,
}

impl LoanArgs {
    pub fn is_empty(&self) -> bool {
        self.loan_type.is_none()
            && self.lender.is_none()
            && self.amount.is_none()
            && self.rate.is_none()
            && self.tenure.is_none()
            && self.start.is_none()
    }

    /// Everything a loan needs except the start date, which defaults.
    pub fn is_complete(&self) -> bool {
        self.loan_type.is_some()
            && self.lender.is_some()
            && self.amount.is_some()
            && self.rate.is_some()
            && self.tenure.is_some()
    }

    /// Copy the provided values over a form, leaving the rest untouched.
    pub fn fill(&self, form: &mut crate::wizard::LoanForm) {
        use crate::fmt::plain_number;
        use crate::wizard::Field;

        if let Some(v) = &self.loan_type {
            form.set(Field::LoanType, v);
        }
        if let Some(v) = &self.lender {
            form.set(Field::Lender, v);
        }
        if let Some(v) = self.amount {
            form.set(Field::Amount, &plain_number(v));
        }
        if let Some(v) = self.rate {
            form.set(Field::Rate, &plain_number(v));
        }
        if let Some(v) = self.tenure {
            form.set(Field::Tenure, &v.to_string());
        }
        if let Some(v) = self.start {
            form.set(Field::StartDate, &crate::models::format_date(v));
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and storage backend.
    Init {
        /// Path for ClearEMI data (default: ~/.local/share/clearemi)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Where loans are kept
        #[arg(long, value_enum)]
        storage: Option<StorageBackend>,
    },
    /// Add a loan. Without all fields given as flags, walks through the steps interactively.
    Add {
        #[command(flatten)]
        loan: LoanArgs,
    },
    /// Overwrite a loan's details. Without flags, walks through the steps prefilled.
    Edit {
        /// Loan ID (shown in the dashboard)
        id: String,
        #[command(flatten)]
        loan: LoanArgs,
    },
    /// Record one installment of a loan as paid.
    Pay {
        /// Loan ID (shown in the dashboard)
        id: String,
    },
    /// Delete a single loan.
    Remove {
        /// Loan ID (shown in the dashboard)
        id: String,
    },
    /// Delete all loans.
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Totals, upcoming EMIs, the loan list and insights.
    Dashboard {
        /// Display order (default from settings)
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,
    },
    /// Month-by-month amortization of one loan.
    Schedule {
        /// Loan ID (shown in the dashboard)
        id: String,
    },
    /// Start dates of every loan.
    Calendar,
    /// Export loans to CSV.
    Export {
        /// Output file, or - for stdout (default: <data_dir>/exports/ClearEMI_Data.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show settings and store location.
    Status,
    /// Print a shell completion script.
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_flags() {
        let cli = Cli::try_parse_from([
            "clearemi", "add", "--type", "Car", "--lender", "SBI", "--amount", "300000",
            "--rate", "9.5", "--tenure", "36", "--start", "2024-02-01",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add { loan }) => {
                assert!(loan.is_complete());
                assert_eq!(loan.amount, Some(300000.0));
                assert_eq!(loan.start, NaiveDate::from_ymd_opt(2024, 2, 1));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_rejects_negative_amount_and_bad_date() {
        assert!(Cli::try_parse_from(["clearemi", "add", "--amount", "-1"]).is_err());
        assert!(Cli::try_parse_from(["clearemi", "add", "--amount", "NaN"]).is_err());
        assert!(Cli::try_parse_from(["clearemi", "dashboard", "--today", "someday"]).is_err());
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["clearemi", "--today", "2024-06-20"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 6, 20));
    }

    #[test]
    fn test_loan_args_fill_only_given_fields() {
        let args = LoanArgs {
            lender: Some("Axis".to_string()),
            amount: Some(250000.0),
            ..LoanArgs::default()
        };
        assert!(!args.is_empty());
        assert!(!args.is_complete());
        let mut form = crate::wizard::LoanForm {
            loan_type: "Home".to_string(),
            lender: "HDFC".to_string(),
            ..Default::default()
        };
        args.fill(&mut form);
        assert_eq!(form.loan_type, "Home");
        assert_eq!(form.lender, "Axis");
        assert_eq!(form.amount, "250000");
    }
}
