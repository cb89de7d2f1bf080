use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::debt::DebtInput;
use crate::decimal::{Money, Rate};
use crate::types::DebtMethod;

/// anything that can be ranked by a repayment ordering
pub trait Ranked {
    fn balance(&self) -> Money;
    fn rate(&self) -> Rate;
}

impl Ranked for DebtInput {
    fn balance(&self) -> Money {
        self.balance
    }

    fn rate(&self) -> Rate {
        self.interest_rate
    }
}

/// priority order in which debts receive extra payment
///
/// Both orderings are stable: debts that compare equal keep their input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// ascending balance
    Snowball,
    /// descending interest rate
    Avalanche,
}

impl OrderingPolicy {
    pub fn compare<T: Ranked>(&self, a: &T, b: &T) -> Ordering {
        match self {
            OrderingPolicy::Snowball => a.balance().cmp(&b.balance()),
            OrderingPolicy::Avalanche => b.rate().cmp(&a.rate()),
        }
    }

    /// stable in-place sort into priority order
    pub fn sort<T: Ranked>(&self, debts: &mut [T]) {
        debts.sort_by(|a, b| self.compare(a, b));
    }

    pub fn method(&self) -> DebtMethod {
        match self {
            OrderingPolicy::Snowball => DebtMethod::Snowball,
            OrderingPolicy::Avalanche => DebtMethod::Avalanche,
        }
    }
}
