use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::types::DebtId;

/// one interest-bearing liability fed into a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtInput {
    pub id: DebtId,
    pub name: String,
    pub balance: Money,
    /// nominal APR, written as a percentage
    #[serde(with = "crate::decimal::apr_percent")]
    pub interest_rate: Rate,
    pub minimum_payment: Money,
}

impl DebtInput {
    pub fn new(
        id: impl Into<DebtId>,
        name: impl Into<String>,
        balance: Money,
        interest_rate: Rate,
        minimum_payment: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            interest_rate,
            minimum_payment,
        }
    }

    /// reject negative amounts and rates
    pub fn validate(&self) -> Result<()> {
        if self.balance.is_negative() {
            return Err(self.invalid(format!("negative balance {}", self.balance)));
        }
        if self.interest_rate.is_negative() {
            return Err(self.invalid(format!("negative interest rate {}", self.interest_rate)));
        }
        if self.minimum_payment.is_negative() {
            return Err(self.invalid(format!("negative minimum payment {}", self.minimum_payment)));
        }
        Ok(())
    }

    /// balance is zero or below
    pub fn is_paid_off(&self) -> bool {
        !self.balance.is_positive()
    }

    /// whether the minimum payment covers the first month of interest
    pub fn amortizes(&self) -> bool {
        self.balance
            .monthly_interest(self.interest_rate)
            .map_or(false, |interest| self.minimum_payment > interest)
    }

    fn invalid(&self, reason: String) -> PayoffError {
        PayoffError::InvalidDebt {
            id: self.id.clone(),
            reason,
        }
    }
}

/// shape of a debt set as the recommendation heuristics see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtProfile {
    pub debt_count: usize,
    pub has_small_debt: bool,
    /// highest minus lowest APR, in percentage points
    pub rate_spread: Decimal,
}

impl DebtProfile {
    pub fn from_debts(debts: &[DebtInput], small_debt_threshold: Money) -> Self {
        let rates = debts.iter().map(|d| d.interest_rate);
        let spread = match (rates.clone().max(), rates.min()) {
            (Some(high), Some(low)) => high.as_percentage() - low.as_percentage(),
            _ => Decimal::ZERO,
        };

        Self {
            debt_count: debts.len(),
            has_small_debt: debts.iter().any(|d| d.balance < small_debt_threshold),
            rate_spread: spread,
        }
    }
}

/// aggregate snapshot of a debt set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummary {
    pub total_debt: Money,
    pub monthly_minimum: Money,
    pub available_extra: Money,
    /// balance-weighted APR percentage, two places
    pub average_interest_rate: Decimal,
    pub highest_interest_debt: DebtId,
    pub lowest_balance_debt: DebtId,
    /// avalanche payoff months
    pub payoff_months: u32,
    pub converged: bool,
    pub estimated_payoff_date: chrono::NaiveDate,
}

/// balance-weighted average APR as a percentage; zero when nothing is owed
pub fn weighted_average_rate(debts: &[DebtInput]) -> Decimal {
    let total: Money = debts.iter().map(|d| d.balance).sum();
    if !total.is_positive() {
        return Decimal::ZERO;
    }
    let weighted: Decimal = debts
        .iter()
        .map(|d| d.interest_rate.as_percentage() * d.balance.as_decimal())
        .sum();
    (weighted / total.as_decimal()).round_dp(2)
}

/// first debt holding the highest rate
pub fn highest_interest(debts: &[DebtInput]) -> Option<&DebtInput> {
    debts.iter().fold(None, |best: Option<&DebtInput>, d| match best {
        Some(b) if d.interest_rate <= b.interest_rate => Some(b),
        _ => Some(d),
    })
}

/// first debt holding the lowest balance
pub fn lowest_balance(debts: &[DebtInput]) -> Option<&DebtInput> {
    debts.iter().fold(None, |best: Option<&DebtInput>, d| match best {
        Some(b) if d.balance >= b.balance => Some(b),
        _ => Some(d),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn debt(id: &str, balance: i64, apr: Decimal, minimum: i64) -> DebtInput {
        DebtInput::new(id, id, Money::from_major(balance), Rate::from_apr(apr), Money::from_major(minimum))
    }

    #[test]
    fn test_json_rate_is_apr_percentage() {
        let json = r#"{"id":"card","name":"Card","balance":"5000","interestRate":"18.99","minimumPayment":"150"}"#;
        let parsed: DebtInput = serde_json::from_str(json).unwrap();
        let expected = DebtInput::new(
            "card",
            "Card",
            Money::from_major(5_000),
            Rate::from_apr(dec!(18.99)),
            Money::from_major(150),
        );
        assert_eq!(parsed, expected);
        assert_eq!(parsed.interest_rate.as_decimal(), dec!(0.1899));

        let written = serde_json::to_string(&parsed).unwrap();
        assert!(written.contains(r#""interestRate":"18.99""#), "{}", written);
    }

    #[test]
    fn test_validation() {
        assert!(debt("ok", 1_000, dec!(5), 50).validate().is_ok());
        assert!(debt("zero", 0, dec!(5), 50).validate().is_ok());
        assert!(debt("neg", -1, dec!(5), 50).validate().is_err());
        assert!(debt("rate", 1_000, dec!(-1), 50).validate().is_err());
        assert!(debt("min", 1_000, dec!(5), -50).validate().is_err());
    }

    #[test]
    fn test_profile() {
        let debts = vec![
            debt("card", 1_500, dec!(22.99), 50),
            debt("car", 12_000, dec!(6.5), 300),
            debt("student", 20_000, dec!(4.5), 200),
        ];
        let profile = DebtProfile::from_debts(&debts, Money::from_major(2_000));
        assert_eq!(profile.debt_count, 3);
        assert!(profile.has_small_debt);
        assert_eq!(profile.rate_spread, dec!(18.49));

        let empty = DebtProfile::from_debts(&[], Money::from_major(2_000));
        assert_eq!(empty.rate_spread, Decimal::ZERO);
        assert!(!empty.has_small_debt);
    }

    #[test]
    fn test_extremes_keep_first_on_ties() {
        let debts = vec![
            debt("a", 3_000, dec!(19.99), 90),
            debt("b", 1_000, dec!(19.99), 40),
            debt("c", 1_000, dec!(9.99), 40),
        ];
        assert_eq!(highest_interest(&debts).unwrap().id, "a");
        assert_eq!(lowest_balance(&debts).unwrap().id, "b");
        assert!(highest_interest(&[]).is_none());
    }

    #[test]
    fn test_weighted_average_rate() {
        let debts = vec![debt("a", 5_000, dec!(18.99), 150), debt("b", 25_000, dec!(6.5), 300)];
        // (18.99 * 5000 + 6.5 * 25000) / 30000
        assert_eq!(weighted_average_rate(&debts), dec!(8.58));
        assert_eq!(weighted_average_rate(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_amortizes() {
        assert!(debt("ok", 3_000, dec!(12), 100).amortizes());
        assert!(!debt("neg", 10_000, dec!(24), 150).amortizes());
    }
}
