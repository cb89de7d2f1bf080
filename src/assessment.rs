use chrono::NaiveDate;
use log::debug;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::DebtCalculator;
use crate::config::{PlannerConfig, RecommendationConfig};
use crate::debt::DebtInput;
use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::recommendation::{assessment_recommendation, Recommendation};
use crate::types::{DebtMethod, DebtType, StressLevel};

/// floor for a minimum payment the user left blank
pub const MINIMUM_PAYMENT_FLOOR: i64 = 25;

/// one debt as entered during an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedDebt {
    pub name: String,
    #[serde(default)]
    pub debt_type: DebtType,
    pub balance: Money,
    /// nominal APR, zero when unknown
    #[serde(default = "zero_rate", with = "crate::decimal::apr_percent")]
    pub interest_rate: Rate,
    #[serde(default)]
    pub minimum_payment: Option<Money>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

fn zero_rate() -> Rate {
    Rate::ZERO
}

impl AssessedDebt {
    pub fn new(name: impl Into<String>, debt_type: DebtType, balance: Money, interest_rate: Rate) -> Self {
        Self {
            name: name.into(),
            debt_type,
            balance,
            interest_rate,
            minimum_payment: None,
            due_date: None,
        }
    }

    pub fn with_minimum_payment(mut self, amount: Money) -> Self {
        self.minimum_payment = Some(amount);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// entered minimum, or 2% of the balance but never below 25
    pub fn effective_minimum(&self) -> Money {
        match self.minimum_payment {
            Some(amount) if amount.is_positive() => amount,
            _ => (self.balance * dec!(0.02)).max(Money::from_major(MINIMUM_PAYMENT_FLOOR)),
        }
    }

    /// named and carrying a positive balance
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty() && self.balance.is_positive()
    }
}

/// answers collected by the onboarding questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentData {
    pub stress_level: StressLevel,
    /// 1-10
    pub debt_anxiety: u8,
    /// commitment to the plan, 1-10
    pub confidence: u8,
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    pub debts: Vec<AssessedDebt>,
    #[serde(default)]
    pub goals: Vec<String>,
    /// `None` lets the planner choose
    #[serde(default)]
    pub preferred_method: Option<DebtMethod>,
}

impl AssessmentData {
    pub fn new(stress_level: StressLevel, monthly_income: Money, monthly_expenses: Money) -> Self {
        Self {
            stress_level,
            debt_anxiety: 5,
            confidence: 5,
            monthly_income,
            monthly_expenses,
            debts: Vec::new(),
            goals: Vec::new(),
            preferred_method: None,
        }
    }

    pub fn with_debt(mut self, debt: AssessedDebt) -> Self {
        self.debts.push(debt);
        self
    }

    pub fn with_preferred_method(mut self, method: DebtMethod) -> Self {
        self.preferred_method = Some(method);
        self
    }

    /// check what the questionnaire requires before submission
    pub fn validate(&self) -> Result<()> {
        if !self.monthly_income.is_positive() {
            return Err(invalid("monthly income must be positive"));
        }
        if self.monthly_expenses.is_negative() {
            return Err(invalid("monthly expenses cannot be negative"));
        }
        if self.debts.is_empty() {
            return Err(invalid("at least one debt is required"));
        }
        if let Some(debt) = self.debts.iter().find(|d| !d.is_usable()) {
            return Err(invalid(format!(
                "debt '{}' needs a name and a positive balance",
                debt.name
            )));
        }
        if self.preferred_method == Some(DebtMethod::Consolidation) {
            return Err(invalid("consolidation is not a payoff order"));
        }
        Ok(())
    }

    /// income minus expenses; negative when expenses exceed income
    pub fn available_for_debt(&self) -> Money {
        self.monthly_income - self.monthly_expenses
    }

    /// what can go toward debt beyond minimums, never negative
    pub fn extra_payment_capacity(&self) -> Money {
        self.available_for_debt().max(Money::ZERO)
    }

    pub fn has_small_debt(&self, threshold: Money) -> bool {
        self.debts.iter().any(|d| d.balance < threshold)
    }

    /// assessment-time rule table over these answers
    pub fn recommendation(&self, config: &RecommendationConfig) -> Recommendation {
        assessment_recommendation(
            self.stress_level,
            self.has_small_debt(config.assessment_small_debt),
            config,
        )
    }

    /// the preferred method, or the assessment heuristic when none was picked
    pub fn recommended_method(&self, config: &RecommendationConfig) -> DebtMethod {
        match self.preferred_method {
            Some(method) => method,
            None => self.recommendation(config).method,
        }
    }

    /// usable debts as simulation inputs, numbered in entry order
    pub fn debt_inputs(&self) -> Vec<DebtInput> {
        self.debts
            .iter()
            .filter(|d| d.is_usable())
            .enumerate()
            .map(|(i, d)| {
                DebtInput::new(
                    format!("debt-{}", i + 1),
                    d.name.trim(),
                    d.balance,
                    d.interest_rate,
                    d.effective_minimum(),
                )
            })
            .collect()
    }

    /// planner over the assessed debts with the spare income as extra payment
    pub fn calculator(&self, config: PlannerConfig) -> Result<DebtCalculator> {
        self.validate()?;
        debug!(
            "assessment: {} debts, {} available for debt",
            self.debts.len(),
            self.available_for_debt()
        );
        DebtCalculator::with_config(self.debt_inputs(), self.extra_payment_capacity(), config)
    }
}

fn invalid(reason: impl Into<String>) -> PayoffError {
    PayoffError::InvalidAssessment {
        reason: reason.into(),
    }
}
