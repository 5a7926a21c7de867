use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::PaymentStatus;

/// derived ledger fields for an accepted payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub remaining_after: Money,
    pub status: PaymentStatus,
}

/// computes the remaining balance and status left by an accepted payment
///
/// Creation and amendment go through the same computation. Deleting a payment
/// does not come here, so sibling payments keep their stored values.
pub struct BalanceReconciler;

impl BalanceReconciler {
    pub fn apply(remaining_before: Money, amount: Money) -> Reconciliation {
        let remaining_after = remaining_before.saturating_sub(amount);
        let status = if remaining_after.is_zero() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::InProgress
        };

        Reconciliation {
            remaining_after,
            status,
        }
    }
}
