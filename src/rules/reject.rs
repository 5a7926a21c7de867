use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::{Money, Rate};

/// why a proposed payment was refused
///
/// Every variant carries the figure the user needs to correct the entry.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("amount {amount} exceeds the remaining balance {remaining}")]
    AmountExceedsRemaining {
        amount: Money,
        remaining: Money,
    },

    #[error("full payment required: amount must equal {required}")]
    FullPaymentMismatch {
        required: Money,
    },

    #[error("at most {max} installments are allowed on this plan")]
    MaxInstallmentsReached {
        max: usize,
    },

    #[error("first installment must be {share} of the total: {required}")]
    FirstInstallmentMismatch {
        required: Money,
        share: Rate,
    },

    #[error("second installment must equal the remaining balance: {required}")]
    SecondInstallmentMismatch {
        required: Money,
    },

    #[error("first payment must be at least {share} of the total: {minimum}")]
    BelowMinimumAdvance {
        minimum: Money,
        share: Rate,
    },

    #[error("payment date {date} is in the past (today is {today})")]
    PastDate {
        date: NaiveDate,
        today: NaiveDate,
    },
}

impl RejectReason {
    /// stable category code for callers that map reasons to messages
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::AmountExceedsRemaining { .. } => "amount_exceeds_remaining",
            RejectReason::FullPaymentMismatch { .. } => "full_payment_mismatch",
            RejectReason::MaxInstallmentsReached { .. } => "max_installments_reached",
            RejectReason::FirstInstallmentMismatch { .. } => "first_installment_mismatch",
            RejectReason::SecondInstallmentMismatch { .. } => "second_installment_mismatch",
            RejectReason::BelowMinimumAdvance { .. } => "below_minimum_advance",
            RejectReason::PastDate { .. } => "past_date",
        }
    }

    /// amount the plan requires, for reasons that fix one
    pub fn required_amount(&self) -> Option<Money> {
        match self {
            RejectReason::FullPaymentMismatch { required }
            | RejectReason::FirstInstallmentMismatch { required, .. }
            | RejectReason::SecondInstallmentMismatch { required } => Some(*required),
            _ => None,
        }
    }
}

/// a refused payment along with the balance owed before it
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("payment rejected: {reason}")]
pub struct Rejection {
    pub reason: RejectReason,
    pub remaining_before: Money,
}

impl Rejection {
    pub fn new(reason: RejectReason, remaining_before: Money) -> Self {
        Self {
            reason,
            remaining_before,
        }
    }
}
