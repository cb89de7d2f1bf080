pub mod amortization;
pub mod schedule;

pub use amortization::{annuity_payment, MonthlyStep, StepAllocation};
pub use schedule::{DebtCalculation, MonthlyPayment};
