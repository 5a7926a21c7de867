/// reports - dashboard, calendar feed and csv export
use chrono::{TimeZone, Utc};
use payment_plan_rs::reports::calendar;
use payment_plan_rs::{
    calendar_feed, ClientForm, Dashboard, DashboardQuery, InMemoryRepository, LedgerService, PaymentForm,
    SafeTimeProvider, SpreadsheetExport, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    let mut ledger = LedgerService::new(InMemoryRepository::new());

    // forms arrive as raw strings
    let client = ledger.register_client(
        ClientForm {
            name: "Carol".to_string(),
            email: "carol@example.com".to_string(),
            phone: Some("555-0199".to_string()),
            address: None,
            plan_type: "flexible".to_string(),
            total_due: "2500.00".to_string(),
        }
        .parse()?,
        &time,
    )?;

    for (date, amount) in [("2024-02-01", "500"), ("2024-02-20", "250.50"), ("2024-03-05", "1000")] {
        let form = PaymentForm {
            client_id: client.id.to_string(),
            payment_date: date.to_string(),
            amount_paid: amount.to_string(),
        };
        ledger.record_payment(form.parse()?, &time)?;
    }

    let repo = ledger.repository();
    let page_size = ledger.config().dashboard_page_size;

    let dashboard = Dashboard::build(repo, &DashboardQuery::default(), page_size)?;
    println!("=== dashboard ===\n{}\n", dashboard.to_json_pretty()?);

    println!("=== calendar ===\n{}\n", calendar::to_json(&calendar_feed(repo)?)?);

    let export = SpreadsheetExport::build(repo)?;
    println!("=== clients.csv ===");
    export.write_clients(std::io::stdout())?;
    println!("\n=== payments.csv ===");
    export.write_payments(std::io::stdout())?;

    Ok(())
}
