/// quick start - register a client and record a full payment
use payment_plan_rs::{InMemoryRepository, LedgerService, Money, NewClient, PaymentCandidate, PlanType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let mut ledger = LedgerService::new(InMemoryRepository::new());

    // a client paying everything at once
    let client = ledger.register_client(
        NewClient::new("Alice", "alice@example.com", PlanType::FullPayment, Money::from_major(1_200)),
        &payment_plan_rs::SafeTimeProvider::new(payment_plan_rs::TimeSource::System),
    )?;

    let today = chrono::Utc::now().date_naive();
    let payment = ledger.record_payment_now(PaymentCandidate::new(client.id, today, Money::from_major(1_200)))?;

    println!("payment {} -> remaining {}, status {}", payment.id(), payment.remaining_after(), payment.status());
    println!("{}", serde_json::to_string_pretty(&ledger.client_balance(client.id)?)?);

    Ok(())
}
