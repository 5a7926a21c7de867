/// two installments - half up front, the rest later, with controlled time
use chrono::{Duration, TimeZone, Utc};
use payment_plan_rs::{
    InMemoryRepository, LedgerService, Money, NewClient, PaymentCandidate, PlanType, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    println!("=== two installment example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();

    let mut ledger = LedgerService::new(InMemoryRepository::new());
    let client = ledger.register_client(
        NewClient::new("Bob", "bob@example.com", PlanType::TwoInstallment, Money::from_major(1_000)),
        &time,
    )?;

    // the first installment must be exactly half
    let today = time.now().date_naive();
    match ledger.record_payment(PaymentCandidate::new(client.id, today, Money::from_major(400)), &time) {
        Ok(_) => println!("unexpected: 400 accepted"),
        Err(e) => println!("rejected: {}", e),
    }

    let first = ledger.record_payment(PaymentCandidate::new(client.id, today, Money::from_major(500)), &time)?;
    println!("first installment on {}: remaining {}", first.payment_date(), first.remaining_after());

    // a month later the client settles
    controller.advance(Duration::days(30));
    let later = time.now().date_naive();
    let second = ledger.record_payment(PaymentCandidate::new(client.id, later, Money::from_major(500)), &time)?;
    println!("second installment on {}: status {}", second.payment_date(), second.status());

    // nothing more is accepted
    if let Err(e) = ledger.record_payment(PaymentCandidate::new(client.id, later, Money::from_major(1)), &time) {
        println!("rejected: {}", e);
    }

    println!("\nevents:");
    for event in ledger.take_events() {
        println!("  {}", serde_json::to_string(&event)?);
    }

    Ok(())
}
