//! The two operations the persistence layer calls into.
//!
//! Both are pure: the caller loads the client and its full payment history,
//! calls in, and stores whatever comes back. Nothing here performs I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::model::{Client, Payment, PaymentCandidate};
use crate::reconcile::{BalanceReconciler, Reconciliation};
use crate::rules::PlanRuleEvaluator;
use crate::types::{PaymentId, PaymentStatus};

pub use crate::ordering::order_history;

/// ledger fields for an accepted payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedPayment {
    pub remaining_before: Money,
    pub remaining_after: Money,
    pub status: PaymentStatus,
}

impl PricedPayment {
    pub fn reconciliation(&self) -> Reconciliation {
        Reconciliation {
            remaining_after: self.remaining_after,
            status: self.status,
        }
    }
}

/// validate a proposed payment and compute the fields to store with it
///
/// Malformed candidates fail with [`crate::LedgerError::Input`] before any
/// plan rule runs; rule violations fail with [`crate::LedgerError::Rejected`].
pub fn validate_and_price_payment(
    client: &Client,
    history: &[Payment],
    candidate: &PaymentCandidate,
    exclude: Option<PaymentId>,
    today: NaiveDate,
) -> Result<PricedPayment> {
    validate_and_price_payment_with_config(&LedgerConfig::default(), client, history, candidate, exclude, today)
}

/// [`validate_and_price_payment`] with explicit plan parameters
pub fn validate_and_price_payment_with_config(
    config: &LedgerConfig,
    client: &Client,
    history: &[Payment],
    candidate: &PaymentCandidate,
    exclude: Option<PaymentId>,
    today: NaiveDate,
) -> Result<PricedPayment> {
    candidate.validate()?;

    let evaluation = PlanRuleEvaluator::new(config).evaluate(client, history, candidate, exclude, today)?;
    let reconciliation = BalanceReconciler::apply(evaluation.remaining_before, candidate.amount);

    Ok(PricedPayment {
        remaining_before: evaluation.remaining_before,
        remaining_after: reconciliation.remaining_after,
        status: reconciliation.status,
    })
}
