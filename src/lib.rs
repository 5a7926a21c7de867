pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod forms;
pub mod model;
pub mod ordering;
pub mod reconcile;
pub mod reports;
pub mod rules;
pub mod service;
pub mod store;
pub mod types;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use engine::{order_history, validate_and_price_payment, validate_and_price_payment_with_config, PricedPayment};
pub use errors::{InputError, LedgerError, Result};
pub use events::{Event, EventStore};
pub use forms::{ClientForm, PaymentForm};
pub use model::{Client, ClientBalance, NewClient, Payment, PaymentCandidate};
pub use reconcile::{BalanceReconciler, Reconciliation};
pub use reports::{calendar_feed, CalendarEvent, Dashboard, DashboardQuery, SpreadsheetExport};
pub use rules::{PlanRuleEvaluator, RejectReason, Rejection};
pub use service::LedgerService;
pub use store::{InMemoryRepository, LedgerRepository};
pub use types::{ClientId, PaymentId, PaymentStatus, PlanType};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
