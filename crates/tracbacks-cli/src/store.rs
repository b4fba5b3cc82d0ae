//! JSON file persistence for [`MemoryStore`].

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracbacks_core::MemoryStore;

pub fn load_store(path: &Path) -> Result<MemoryStore> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ticket store {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse ticket store {}", path.display()))
}

/// Write through a sibling temp file so a crash never leaves a torn store.
pub fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let mut body = serde_json::to_string_pretty(store).context("Failed to serialize ticket store")?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace ticket store {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracbacks_core::TicketId;

    #[test]
    fn save_then_load_preserves_tickets() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tickets.json");
        let mut store = MemoryStore::new();
        store.insert(TicketId(1), [("summary", "first")]);

        save_store(&path, &store).expect("save");
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_store(&path).expect("load"), store);
    }

    #[test]
    fn missing_store_names_the_path() {
        let dir = TempDir::new().expect("tempdir");
        let err = load_store(&dir.path().join("absent.json")).expect_err("missing");
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
