mod cli;
#[cfg(feature = "sqlite")]
mod db;
mod emi;
mod error;
mod fmt;
mod models;
mod portfolio;
mod settings;
mod store;
mod wizard;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use env_logger::Env;

use cli::{Cli, Commands, LoanArgs};

/// Bare `clearemi`: start the add-loan wizard when nothing is tracked yet,
/// otherwise show the dashboard.
fn get_started(today: Option<NaiveDate>) -> error::Result<()> {
    let (_settings, backend) = cli::open_configured_store()?;
    if store::load_loans(backend.as_ref())?.is_empty() {
        cli::add::run(LoanArgs::default(), today)
    } else {
        cli::dashboard::run(None, today)
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let today = cli.today;

    let result = match cli.command {
        None => get_started(today),
        Some(Commands::Init { data_dir, storage }) => cli::init::run(data_dir, storage),
        Some(Commands::Add { loan }) => cli::add::run(loan, today),
        Some(Commands::Edit { id, loan }) => cli::edit::run(&id, loan, today),
        Some(Commands::Pay { id }) => cli::pay::run(&id),
        Some(Commands::Remove { id }) => cli::remove::run(&id),
        Some(Commands::Clear { yes }) => cli::clear::run(yes),
        Some(Commands::Dashboard { sort }) => cli::dashboard::run(sort, today),
        Some(Commands::Schedule { id }) => cli::schedule::run(&id),
        Some(Commands::Calendar) => cli::calendar::run(),
        Some(Commands::Export { output }) => cli::export::run(output),
        Some(Commands::Status) => cli::status::run(),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "clearemi", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
