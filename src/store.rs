//! Loan persistence. Every backend stores the whole ordered list at once:
//! callers load, modify in memory, and save the full list back.

use std::path::{Path, PathBuf};

use crate::error::{ClearEmiError, Result};
use crate::models::{generate_id, Loan};
use crate::settings::{Settings, StorageBackend};

pub const JSON_FILE: &str = "loans.json";
pub const DB_FILE: &str = "clearemi.db";

pub trait LoanStore {
    /// All loans in stored order. A store that was never written loads as empty.
    fn load(&self) -> Result<Vec<Loan>>;

    /// Replace the stored list with `loans`, preserving their order.
    fn save(&self, loans: &[Loan]) -> Result<()>;

    /// Remove every loan.
    fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    fn location(&self) -> &Path;
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// A single JSON array on disk, the same document the browser app keeps under
/// its `loans` key.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LoanStore for JsonStore {
    fn load(&self) -> Result<Vec<Loan>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() || content.trim() == "null" {
            return Ok(Vec::new());
        }
        let loans: Vec<Loan> = serde_json::from_str(&content)?;
        log::debug!("loaded {} loans from {}", loans.len(), self.path.display());
        Ok(loans)
    }

    fn save(&self, loans: &[Loan]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(loans)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        log::debug!("saved {} loans to {}", loans.len(), self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// Backend selection and id-keyed helpers
// ---------------------------------------------------------------------------

pub fn store_path(settings: &Settings) -> PathBuf {
    match settings.storage {
        StorageBackend::Json => settings.data_path().join(JSON_FILE),
        StorageBackend::Sqlite => settings.data_path().join(DB_FILE),
    }
}

pub fn open_store(settings: &Settings) -> Result<Box<dyn LoanStore>> {
    let path = store_path(settings);
    match settings.storage {
        StorageBackend::Json => Ok(Box::new(JsonStore::new(path))),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => Ok(Box::new(crate::db::SqliteStore::open(&path)?)),
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err(ClearEmiError::Settings(
            "this build has no SQLite support; set \"storage\": \"json\"".to_string(),
        )),
    }
}

/// Load every loan, giving an id to any record that lacks one. Newly assigned
/// ids are written back immediately so they stay stable across invocations.
pub fn load_loans(store: &dyn LoanStore) -> Result<Vec<Loan>> {
    let mut loans = store.load()?;
    let mut assigned = 0;
    for loan in loans.iter_mut().filter(|l| l.id.is_empty()) {
        loan.id = generate_id();
        assigned += 1;
    }
    if assigned > 0 {
        log::info!("assigned ids to {assigned} loans without one");
        store.save(&loans)?;
    }
    Ok(loans)
}

pub fn add_loan(store: &dyn LoanStore, loan: Loan) -> Result<()> {
    let mut loans = load_loans(store)?;
    loans.push(loan);
    store.save(&loans)
}

/// Apply `f` to the loan with `id` and save. Returns the updated loan.
pub fn update_loan<F>(store: &dyn LoanStore, id: &str, f: F) -> Result<Loan>
where
    F: FnOnce(&mut Loan),
{
    let mut loans = load_loans(store)?;
    let loan = loans
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or_else(|| ClearEmiError::UnknownLoan(id.to_string()))?;
    f(loan);
    let updated = loan.clone();
    store.save(&loans)?;
    Ok(updated)
}

pub fn remove_loan(store: &dyn LoanStore, id: &str) -> Result<Loan> {
    let mut loans = load_loans(store)?;
    let pos = loans
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| ClearEmiError::UnknownLoan(id.to_string()))?;
    let removed = loans.remove(pos);
    store.save(&loans)?;
    Ok(removed)
}

pub fn find_loan(store: &dyn LoanStore, id: &str) -> Result<Loan> {
    load_loans(store)?
        .into_iter()
        .find(|l| l.id == id)
        .ok_or_else(|| ClearEmiError::UnknownLoan(id.to_string()))
}
