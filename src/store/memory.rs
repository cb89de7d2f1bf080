use uuid::Uuid;

use super::{DebtRecord, DebtStore, ProgressEntry, StoreDocument};
use crate::errors::Result;

/// ephemeral store for demo sessions; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: StoreDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DebtStore for MemoryStore {
    fn list(&self, user_id: &str) -> Result<Vec<DebtRecord>> {
        Ok(self.document.list(user_id))
    }

    fn get(&self, id: Uuid) -> Result<DebtRecord> {
        self.document.get(id)
    }

    fn put(&mut self, record: DebtRecord) -> Result<()> {
        self.document.put(record);
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<DebtRecord> {
        self.document.delete(id)
    }

    fn record_progress(&mut self, entry: ProgressEntry) -> Result<()> {
        self.document.record_progress(entry)
    }

    fn progress(&self, debt_id: Uuid) -> Result<Vec<ProgressEntry>> {
        Ok(self.document.progress(debt_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::errors::PayoffError;
    use crate::types::DebtType;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn record(user: &str, name: &str, minutes: i64) -> DebtRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        DebtRecord::new(
            user,
            name,
            DebtType::Personal,
            Money::from_major(1_000),
            Rate::ZERO,
            Money::from_major(25),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            at,
        )
    }

    #[test]
    fn test_list_is_per_user_and_ordered() {
        let mut store = MemoryStore::new();
        store.put(record("alice", "second", 5)).unwrap();
        store.put(record("bob", "other", 1)).unwrap();
        store.put(record("alice", "first", 0)).unwrap();

        let names: Vec<String> = store.list("alice").unwrap().into_iter().map(|d| d.debt_name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(store.list("carol").unwrap().is_empty());
    }

    #[test]
    fn test_put_replaces_by_id() {
        let mut store = MemoryStore::new();
        let mut debt = record("alice", "card", 0);
        store.put(debt.clone()).unwrap();

        debt.current_balance = Money::from_major(400);
        store.put(debt.clone()).unwrap();

        assert_eq!(store.list("alice").unwrap().len(), 1);
        assert_eq!(store.get(debt.id).unwrap().current_balance, Money::from_major(400));
    }

    #[test]
    fn test_missing_debt() {
        let mut store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id), Err(PayoffError::DebtNotFound { .. })));
        assert!(store.delete(id).is_err());
        assert!(store.progress(id).unwrap().is_empty());
    }
}
