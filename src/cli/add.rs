use std::io::{BufRead, Write};

use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::{open_configured_store, resolve_today, LoanArgs};
use crate::emi::ZeroRatePolicy;
use crate::error::Result;
use crate::store::add_loan;
use crate::wizard::{AddLoanWizard, LoanForm, Step};

/// Typed at any prompt to go back a step.
const BACK: &str = "<";

pub fn run(args: LoanArgs, today: Option<NaiveDate>) -> Result<()> {
    let today = resolve_today(today);
    let (settings, store) = open_configured_store()?;

    let mut wizard = AddLoanWizard::new();
    args.fill(wizard.form_mut());

    let form = if args.is_complete() {
        wizard.form().clone()
    } else {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        match prompt_wizard(
            &mut stdin.lock(),
            &mut stdout,
            wizard,
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
    };

    let loan = form.to_loan(today);
    let emi = loan.emi(settings.zero_rate);
    log::info!("adding loan {} ({} / {})", loan.id, loan.lender, loan.loan_type);
    add_loan(store.as_ref(), loan.clone())?;
    println!(
        "Added loan {}: {} ({}), EMI {}",
        loan.id.bold(),
        loan.lender,
        loan.loan_type,
        crate::fmt::money(emi, &settings.currency_symbol)
    );
    Ok(())
}

/// Drive the wizard over a line-based terminal. Returns the submitted form, or
/// `None` when the user quits or input ends.
pub fn prompt_wizard<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    mut wizard: AddLoanWizard,
    symbol: &str,
    policy: ZeroRatePolicy,
    today: NaiveDate,
) -> Result<Option<LoanForm>> {
    loop {
        writeln!(out, "\n{}", wizard.progress().bold())?;

        if wizard.step() == Step::Summary {
            for (label, value) in wizard.form().summary_lines(symbol, policy, today) {
                writeln!(out, "  {:<10} {}", format!("{label}:"), value)?;
            }
            write!(out, "Save this loan? [y]es / [b]ack / [q]uit: ")?;
            out.flush()?;
            let Some(answer) = read_line(input)? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" | "" => {
                    return match wizard.submit() {
                        Ok(form) => Ok(Some(form)),
                        Err(w) => {
                            wizard = w;
                            continue;
                        }
                    };
                }
                "b" | "back" | BACK => {
                    wizard.previous();
                }
                "q" | "quit" => return Ok(None),
                _ => writeln!(out, "Please answer y, b or q.")?,
            }
            continue;
        }

        let mut went_back = false;
        for &field in wizard.step().fields() {
            loop {
                let current = wizard.form().get(field).to_string();
                if current.is_empty() {
                    write!(out, "{}: ", field.label())?;
                } else {
                    write!(out, "{} [{}]: ", field.label(), current)?;
                }
                out.flush()?;

                let Some(value) = read_line(input)? else {
                    return Ok(None);
                };
                if value == BACK {
                    went_back = true;
                    break;
                }
                if value.is_empty() {
                    break;
                }
                match field.validate(&value) {
                    Ok(()) => {
                        wizard.form_mut().set(field, &value);
                        break;
                    }
                    Err(msg) => writeln!(out, "{}", msg.red())?,
                }
            }
            if went_back {
                break;
            }
        }

        if went_back {
            wizard.previous();
        } else {
            wizard.next();
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
