pub mod json_file;
pub mod memory;
pub mod tracker;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use tracker::DebtTracker;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::AssessedDebt;
use crate::config::StorageConfig;
use crate::debt::DebtInput;
use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::types::{DebtType, PaymentType};

/// days until the first due date of a debt entered without one
pub const DEFAULT_DUE_DAYS: u64 = 30;

/// persisted debt row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub id: Uuid,
    pub user_id: String,
    pub debt_name: String,
    pub debt_type: DebtType,
    pub current_balance: Money,
    pub original_balance: Money,
    /// stored as an APR percentage
    #[serde(with = "crate::decimal::apr_percent")]
    pub interest_rate: Rate,
    pub minimum_payment: Money,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebtRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        debt_name: impl Into<String>,
        debt_type: DebtType,
        balance: Money,
        interest_rate: Rate,
        minimum_payment: Money,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            debt_name: debt_name.into(),
            debt_type,
            current_balance: balance,
            original_balance: balance,
            interest_rate,
            minimum_payment,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// row for a debt entered during an assessment
    pub fn from_assessed(user_id: impl Into<String>, debt: &AssessedDebt, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let due_date = debt
            .due_date
            .or_else(|| today.checked_add_days(Days::new(DEFAULT_DUE_DAYS)))
            .unwrap_or(today);

        Self::new(
            user_id,
            debt.name.trim(),
            debt.debt_type,
            debt.balance,
            debt.interest_rate,
            debt.effective_minimum(),
            due_date,
            now,
        )
    }

    pub fn to_input(&self) -> DebtInput {
        DebtInput::new(
            self.id.to_string(),
            self.debt_name.clone(),
            self.current_balance,
            self.interest_rate,
            self.minimum_payment,
        )
    }

    pub fn paid_down(&self) -> Money {
        (self.original_balance - self.current_balance).max(Money::ZERO)
    }

    pub fn is_paid_off(&self) -> bool {
        !self.current_balance.is_positive()
    }
}

/// one recorded payment against a stored debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub user_id: String,
    pub debt_id: Uuid,
    pub payment_amount: Money,
    pub payment_date: NaiveDate,
    pub payment_type: PaymentType,
    pub balance_after: Money,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// persistence port for debts and their payment history
pub trait DebtStore: Send {
    /// debts owned by a user, oldest first
    fn list(&self, user_id: &str) -> Result<Vec<DebtRecord>>;

    fn get(&self, id: Uuid) -> Result<DebtRecord>;

    /// insert or replace by id
    fn put(&mut self, record: DebtRecord) -> Result<()>;

    /// remove a debt together with its progress entries
    fn delete(&mut self, id: Uuid) -> Result<DebtRecord>;

    fn record_progress(&mut self, entry: ProgressEntry) -> Result<()>;

    /// payments against a debt, in recording order
    fn progress(&self, debt_id: Uuid) -> Result<Vec<ProgressEntry>>;
}

/// backend selected by configuration
pub fn open_store(config: &StorageConfig) -> Box<dyn DebtStore> {
    match config {
        StorageConfig::Memory => Box::new(MemoryStore::new()),
        StorageConfig::JsonFile { path } => Box::new(JsonFileStore::new(path.clone())),
    }
}

/// whole store contents; shared by the in-memory and file backends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    #[serde(default)]
    pub debts: Vec<DebtRecord>,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
}

impl StoreDocument {
    pub fn list(&self, user_id: &str) -> Vec<DebtRecord> {
        let mut debts: Vec<DebtRecord> = self.debts.iter().filter(|d| d.user_id == user_id).cloned().collect();
        debts.sort_by_key(|d| d.created_at);
        debts
    }

    pub fn get(&self, id: Uuid) -> Result<DebtRecord> {
        self.debts.iter().find(|d| d.id == id).cloned().ok_or_else(|| not_found(id))
    }

    pub fn put(&mut self, record: DebtRecord) {
        match self.debts.iter_mut().find(|d| d.id == record.id) {
            Some(existing) => *existing = record,
            None => self.debts.push(record),
        }
    }

    pub fn delete(&mut self, id: Uuid) -> Result<DebtRecord> {
        let index = self.debts.iter().position(|d| d.id == id).ok_or_else(|| not_found(id))?;
        self.progress.retain(|p| p.debt_id != id);
        Ok(self.debts.remove(index))
    }

    pub fn record_progress(&mut self, entry: ProgressEntry) -> Result<()> {
        if !self.debts.iter().any(|d| d.id == entry.debt_id) {
            return Err(not_found(entry.debt_id));
        }
        self.progress.push(entry);
        Ok(())
    }

    pub fn progress(&self, debt_id: Uuid) -> Vec<ProgressEntry> {
        self.progress.iter().filter(|p| p.debt_id == debt_id).cloned().collect()
    }
}

fn not_found(id: Uuid) -> PayoffError {
    PayoffError::DebtNotFound { id: id.to_string() }
}
