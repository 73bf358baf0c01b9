use chrono::NaiveDate;

use crate::cli::add::prompt_wizard;
use crate::cli::{open_configured_store, resolve_today, LoanArgs};
use crate::error::Result;
use crate::store::{find_loan, update_loan};
use crate::wizard::{AddLoanWizard, LoanForm};

pub fn run(id: &str, args: LoanArgs, today: Option<NaiveDate>) -> Result<()> {
    let today = resolve_today(today);
    let (settings, store) = open_configured_store()?;
    let existing = find_loan(store.as_ref(), id)?;

    let mut form = LoanForm::from_loan(&existing);
    let form = if args.is_empty() {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        match prompt_wizard(
            &mut stdin.lock(),
            &mut stdout,
            AddLoanWizard::with_form(form),
            &settings.currency_symbol,
            settings.zero_rate,
            today,
        )? {
            Some(form) => form,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        args.fill(&mut form);
        form
    };

    let updated = update_loan(store.as_ref(), id, |loan| form.apply_to(loan, today))?;
    log::info!("edited loan {id}");
    println!("Updated loan {}: {} ({})", updated.id, updated.lender, updated.loan_type);
    Ok(())
}
