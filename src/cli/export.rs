use std::io::Write;
use std::path::PathBuf;

use crate::cli::open_configured_store;
use crate::error::Result;
use crate::fmt::plain_number;
use crate::models::Loan;
use crate::settings::Settings;
use crate::store::load_loans;

pub const EXPORT_FILE: &str = "ClearEMI_Data.csv";
const HEADER: [&str; 6] = ["Type", "Lender", "Amount", "Rate", "Tenure", "StartDate"];

fn default_path(settings: &Settings) -> PathBuf {
    settings.data_path().join("exports").join(EXPORT_FILE)
}

pub fn run(output: Option<String>) -> Result<()> {
    let (settings, store) = open_configured_store()?;
    let loans = load_loans(store.as_ref())?;

    if output.as_deref() == Some("-") {
        let stdout = std::io::stdout();
        write_csv(stdout.lock(), &loans)?;
        return Ok(());
    }

    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path(&settings));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&path)?;
    write_csv(file, &loans)?;
    log::info!("exported {} loans to {}", loans.len(), path.display());
    println!("Wrote {} loans to {}", loans.len(), path.display());
    Ok(())
}

/// Header plus one row per loan in stored order.
pub fn write_csv<W: Write>(out: W, loans: &[Loan]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;
    for loan in loans {
        wtr.write_record([
            loan.loan_type.clone(),
            loan.lender.clone(),
            plain_number(loan.amount),
            plain_number(loan.rate),
            loan.tenure.to_string(),
            loan.start_date.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
