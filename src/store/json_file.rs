use std::fs;
use std::path::{Path, PathBuf};

use log::trace;
use uuid::Uuid;

use super::{DebtRecord, DebtStore, ProgressEntry, StoreDocument};
use crate::errors::{PayoffError, Result};

/// debts and progress kept in one JSON document on disk
///
/// Every call reads the file and every write rewrites it whole. A missing or
/// empty file reads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        serde_json::from_str(&content).map_err(|e| PayoffError::Storage {
            message: format!("{}: {}", self.path.display(), e),
        })
    }

    fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(document)?)?;
        trace!(
            "wrote {} debts and {} progress entries to {}",
            document.debts.len(),
            document.progress.len(),
            self.path.display()
        );
        Ok(())
    }

    fn update<T>(&self, apply: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let mut document = self.load()?;
        let value = apply(&mut document)?;
        self.save(&document)?;
        Ok(value)
    }
}

impl DebtStore for JsonFileStore {
    fn list(&self, user_id: &str) -> Result<Vec<DebtRecord>> {
        Ok(self.load()?.list(user_id))
    }

    fn get(&self, id: Uuid) -> Result<DebtRecord> {
        self.load()?.get(id)
    }

    fn put(&mut self, record: DebtRecord) -> Result<()> {
        self.update(|doc| {
            doc.put(record);
            Ok(())
        })
    }

    fn delete(&mut self, id: Uuid) -> Result<DebtRecord> {
        self.update(|doc| doc.delete(id))
    }

    fn record_progress(&mut self, entry: ProgressEntry) -> Result<()> {
        self.update(|doc| doc.record_progress(entry))
    }

    fn progress(&self, debt_id: Uuid) -> Result<Vec<ProgressEntry>> {
        Ok(self.load()?.progress(debt_id))
    }
}
