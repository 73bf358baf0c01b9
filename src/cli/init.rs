use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_file_path, shellexpand_path, StorageBackend};
use crate::store::{load_loans, open_store};

pub fn run(data_dir: Option<String>, storage: Option<StorageBackend>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        // Created before the final expansion so relative paths canonicalize.
        std::fs::create_dir_all(PathBuf::from(shellexpand_path(&dir)))?;
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(storage) = storage {
        settings.storage = storage;
    }

    std::fs::create_dir_all(settings.data_path())?;
    let store = open_store(&settings)?;
    let loans = load_loans(store.as_ref())?;
    if !store.location().exists() {
        store.save(&loans)?;
    }
    save_settings(&settings)?;
    log::info!("initialized {:?} store at {}", settings.storage, store.location().display());

    println!("Initialized ClearEMI");
    println!("  Settings: {}", settings_file_path().display());
    println!("  Data dir: {}", settings.data_path().display());
    println!("  Storage:  {}", store.location().display());
    if !loans.is_empty() {
        println!("  Loans:    {}", loans.len());
    }
    println!();
    println!("Try these next:");
    println!("  clearemi add");
    println!("  clearemi dashboard");
    Ok(())
}
