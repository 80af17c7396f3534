use home_loan_core::form::FormStore;
use std::fs;
use std::path::Path;

/// Load the persisted form store. A missing file is an empty store.
pub fn read_store(path: &str) -> Result<FormStore, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if !p.exists() {
        log::debug!("no form store at {}, starting empty", p.display());
        return Ok(FormStore::default());
    }

    let contents = fs::read_to_string(p)
        .map_err(|e| format!("Failed to read '{}': {}", p.display(), e))?;
    let store: FormStore = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", p.display(), e))?;
    Ok(store)
}

/// Overwrite the store file with the given contents.
pub fn write_store(path: &str, store: &FormStore) -> Result<(), Box<dyn std::error::Error>> {
    let contents = serde_json::to_string_pretty(store)?;
    fs::write(path, contents).map_err(|e| format!("Failed to write '{}': {}", path, e))?;
    log::debug!("form store written to {path}");
    Ok(())
}
