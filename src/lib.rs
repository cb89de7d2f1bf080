pub mod assessment;
pub mod calculator;
pub mod config;
pub mod consolidation;
pub mod debt;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod payments;
pub mod recommendation;
pub mod store;
pub mod strategy;
pub mod types;

// re-export key types
pub use assessment::{AssessedDebt, AssessmentData};
pub use calculator::{
    calculate_consolidation, calculate_payoff_plan, simulate, DebtCalculator, DebtCalculatorBuilder,
    MethodComparison,
};
pub use config::{ExtraPaymentPolicy, HybridConfig, PlannerConfig, RecommendationConfig, StorageConfig};
pub use consolidation::ConsolidationCalculator;
pub use debt::{DebtInput, DebtProfile, DebtSummary};
pub use decimal::{Money, Rate};
pub use errors::{PayoffError, Result};
pub use events::{Event, EventStore};
pub use payments::{DebtCalculation, MonthlyPayment};
pub use recommendation::{
    assessment_recommendation, comparison_recommendation, recommend_for_profile, recommend_strategy,
    Heuristic, Recommendation,
};
pub use store::{open_store, DebtRecord, DebtStore, DebtTracker, JsonFileStore, MemoryStore, ProgressEntry};
pub use strategy::{HybridComposer, OrderingPolicy, StrategySimulator};
pub use types::{DebtId, DebtMethod, DebtType, PaymentType, SimulationOutcome, StressLevel};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
