use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{DebtId, DebtMethod, PaymentType};

/// all events that can be emitted while planning or tracking debts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // simulation events
    SimulationStarted {
        method: DebtMethod,
        debt_count: usize,
        total_balance: Money,
        extra_payment: Money,
    },
    FocusDebtChanged {
        method: DebtMethod,
        month: u32,
        debt_id: DebtId,
    },
    DebtPaidOff {
        method: DebtMethod,
        month: u32,
        debt_id: DebtId,
    },
    HybridPhaseCompleted {
        phase: u8,
        months: u32,
        debt_ids: Vec<DebtId>,
    },
    SimulationCompleted {
        method: DebtMethod,
        months: u32,
        total_interest: Money,
    },
    SimulationAborted {
        method: DebtMethod,
        months: u32,
        remaining_balance: Money,
    },

    // store events
    DebtRecorded {
        debt_id: DebtId,
        user_id: String,
        balance: Money,
        timestamp: DateTime<Utc>,
    },
    DebtRemoved {
        debt_id: DebtId,
        timestamp: DateTime<Utc>,
    },
    PaymentRecorded {
        debt_id: DebtId,
        amount: Money,
        payment_type: PaymentType,
        balance_after: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
