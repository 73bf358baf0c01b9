use crate::cli::open_configured_store;
use crate::error::Result;
use crate::store::remove_loan;

pub fn run(id: &str) -> Result<()> {
    let (_settings, store) = open_configured_store()?;
    let removed = remove_loan(store.as_ref(), id)?;
    log::info!("removed loan {id}");
    println!("Removed loan {}: {} ({})", removed.id, removed.lender, removed.loan_type);
    Ok(())
}
