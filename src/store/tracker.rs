use hourglass_rs::SafeTimeProvider;
use log::{info, warn};
use uuid::Uuid;

use super::{DebtRecord, DebtStore, ProgressEntry};
use crate::assessment::AssessmentData;
use crate::debt::DebtInput;
use crate::decimal::Money;
use crate::errors::{PayoffError, Result};
use crate::events::{Event, EventStore};
use crate::types::PaymentType;

/// records debts and payments against a store, emitting events as it goes
pub struct DebtTracker<S: DebtStore + ?Sized> {
    store: Box<S>,
    time_provider: SafeTimeProvider,
    events: EventStore,
}

impl<S: DebtStore + ?Sized> DebtTracker<S> {
    pub fn new(store: Box<S>, time_provider: SafeTimeProvider) -> Self {
        Self {
            store,
            time_provider,
            events: EventStore::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add_debt(&mut self, record: DebtRecord) -> Result<Uuid> {
        let event = Event::DebtRecorded {
            debt_id: record.id.to_string(),
            user_id: record.user_id.clone(),
            balance: record.current_balance,
            timestamp: self.time_provider.now(),
        };
        let id = record.id;
        self.store.put(record)?;
        self.events.emit(event);
        Ok(id)
    }

    /// store every usable debt from a submitted assessment
    pub fn import_assessment(&mut self, user_id: &str, assessment: &AssessmentData) -> Result<Vec<Uuid>> {
        assessment.validate()?;
        let now = self.time_provider.now();
        assessment
            .debts
            .iter()
            .filter(|d| d.is_usable())
            .map(|d| self.add_debt(DebtRecord::from_assessed(user_id, d, now)))
            .collect()
    }

    pub fn remove_debt(&mut self, id: Uuid) -> Result<DebtRecord> {
        let removed = self.store.delete(id)?;
        self.events.emit(Event::DebtRemoved {
            debt_id: id.to_string(),
            timestamp: self.time_provider.now(),
        });
        Ok(removed)
    }

    /// apply a payment to a stored debt; the balance never goes below zero
    pub fn record_payment(
        &mut self,
        debt_id: Uuid,
        amount: Money,
        payment_type: PaymentType,
        notes: Option<String>,
    ) -> Result<ProgressEntry> {
        if !amount.is_positive() {
            return Err(PayoffError::InvalidPaymentAmount { amount });
        }

        let now = self.time_provider.now();
        let original = self.store.get(debt_id)?;
        let mut record = original.clone();
        let balance_after = (record.current_balance - amount).max(Money::ZERO);
        record.current_balance = balance_after;
        record.updated_at = now;

        let entry = ProgressEntry {
            id: Uuid::new_v4(),
            user_id: record.user_id.clone(),
            debt_id,
            payment_amount: amount,
            payment_date: now.date_naive(),
            payment_type,
            balance_after,
            notes,
            created_at: now,
        };

        // balance and progress change together or not at all
        self.store.put(record)?;
        if let Err(err) = self.store.record_progress(entry.clone()) {
            warn!("progress for {} not recorded, restoring balance: {}", debt_id, err);
            self.store.put(original)?;
            return Err(err);
        }
        info!("payment of {} on {}, balance now {}", amount, debt_id, balance_after);

        self.events.emit(Event::PaymentRecorded {
            debt_id: debt_id.to_string(),
            amount,
            payment_type,
            balance_after,
            timestamp: now,
        });
        Ok(entry)
    }

    /// a user's outstanding debts as simulation inputs
    pub fn outstanding(&self, user_id: &str) -> Result<Vec<DebtInput>> {
        Ok(self
            .store
            .list(user_id)?
            .iter()
            .filter(|d| !d.is_paid_off())
            .map(DebtRecord::to_input)
            .collect())
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
