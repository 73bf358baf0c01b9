use crate::cli::open_configured_store;
use crate::error::Result;
use crate::fmt::money;
use crate::portfolio::totals;
use crate::settings::settings_file_path;
use crate::store::load_loans;

pub fn run() -> Result<()> {
    let (settings, store) = open_configured_store()?;
    let location = store.location();

    println!("Settings:   {}", settings_file_path().display());
    println!("Data dir:   {}", settings.data_path().display());
    println!("Storage:    {:?} ({})", settings.storage, location.display());
    println!("Zero rate:  {:?}", settings.zero_rate);
    println!("Due basis:  {:?}", settings.due_basis);
    println!("Sort:       {:?}", settings.default_sort);

    if location.exists() {
        let size = std::fs::metadata(location)?.len();
        println!("Store size: {size} bytes");

        let loans = load_loans(store.as_ref())?;
        let t = totals(&loans, settings.zero_rate);
        let paid: u32 = loans.iter().map(|l| l.paid_count()).sum();

        println!();
        println!("Loans:        {}", t.loan_count);
        println!("Outstanding:  {}", money(t.outstanding, &settings.currency_symbol));
        println!("Monthly EMI:  {}", money(t.monthly_emi, &settings.currency_symbol));
        println!("Paid EMIs:    {paid}");
    } else {
        println!();
        println!("No loans stored yet. Run `clearemi init` or `clearemi add` to start.");
    }

    Ok(())
}
