/// assessment intake, persisted debts and payment tracking
use debt_payoff_rs::{
    calculate_payoff_plan, open_store, AssessedDebt, AssessmentData, DebtTracker, DebtType, Money,
    PaymentType, PlannerConfig, Rate, SafeTimeProvider, StressLevel, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== assessment and store example ===\n");

    let config = PlannerConfig::default();
    let assessment = AssessmentData::new(StressLevel::new(7)?, Money::from_major(4_800), Money::from_major(4_100))
        .with_debt(
            AssessedDebt::new("Visa", DebtType::CreditCard, Money::from_major(2_400), Rate::from_apr(dec!(24.99)))
                .with_minimum_payment(Money::from_major(75)),
        )
        .with_debt(AssessedDebt::new(
            "Student Loan",
            DebtType::StudentLoan,
            Money::from_major(18_000),
            Rate::from_apr(dec!(5.5)),
        ));

    assessment.validate()?;
    let method = assessment.recommended_method(&config.recommendation);
    println!("available for debt: ${}", assessment.available_for_debt());
    println!("recommended method: {}", method);

    // demo mode keeps everything in memory
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut tracker = DebtTracker::new(open_store(&config.storage), time);
    let ids = tracker.import_assessment("demo-user", &assessment)?;
    println!("stored {} debts", ids.len());

    let entry = tracker.record_payment(ids[0], Money::from_major(500), PaymentType::Extra, Some("tax refund".to_string()))?;
    println!("visa balance after payment: ${}", entry.balance_after);

    let debts = tracker.outstanding("demo-user")?;
    if let Some(plan) = calculate_payoff_plan(&debts, method, assessment.extra_payment_capacity(), &config)? {
        println!("\n{} plan: {} months, ${} interest", plan.method, plan.payoff_time, plan.total_interest);
    }

    for event in tracker.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
