pub mod plan;
pub mod reject;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::model::{Client, Payment, PaymentCandidate};
use crate::ordering::{amended_position, excluding};
use crate::types::PaymentId;

pub use plan::{check_capacity, check_plan, required_amount, InstallmentSlot, PlanContext, TWO_INSTALLMENT_MAX_PAYMENTS};
pub use reject::{RejectReason, Rejection};

/// outcome of an accepted evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// balance owed before this payment
    pub remaining_before: Money,
    /// chronological role of the payment
    pub slot: InstallmentSlot,
    /// amount the plan pins for that role, if any
    pub required: Option<Money>,
}

/// decides whether a proposed payment fits the client's plan
pub struct PlanRuleEvaluator<'a> {
    config: &'a LedgerConfig,
}

impl<'a> PlanRuleEvaluator<'a> {
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    /// evaluate a candidate against the client's history
    ///
    /// `exclude` names the payment being amended; it is left out of both the
    /// balance and the slot computation. A new payment fills the slot after
    /// the payments already on record; an amended one takes its date position
    /// in the history without it. Checks run in this order: payment date, the
    /// plan's payment count, the remaining-balance cap, then the plan's amount
    /// rules.
    pub fn evaluate(
        &self,
        client: &Client,
        history: &[Payment],
        candidate: &PaymentCandidate,
        exclude: Option<PaymentId>,
        today: NaiveDate,
    ) -> Result<Evaluation, Rejection> {
        let others = excluding(history, exclude);
        let total_paid: Money = others.iter().map(|p| p.amount_paid()).sum();
        let remaining_before = client.total_due - total_paid;

        let reject = |reason: RejectReason| Rejection::new(reason, remaining_before);

        if candidate.payment_date < today {
            return Err(reject(RejectReason::PastDate {
                date: candidate.payment_date,
                today,
            }));
        }

        check_capacity(client.plan_type, others.len()).map_err(reject)?;

        if candidate.amount > remaining_before {
            return Err(reject(RejectReason::AmountExceedsRemaining {
                amount: candidate.amount,
                remaining: remaining_before,
            }));
        }

        let position = match exclude {
            Some(id) => amended_position(&others, candidate.payment_date, id),
            None => others.len(),
        };
        let ctx = PlanContext {
            total_due: client.total_due,
            remaining_before,
            amount: candidate.amount,
            slot: position,
        };

        debug!(
            client_id = %client.id,
            plan = %client.plan_type,
            amount = %candidate.amount,
            remaining_before = %remaining_before,
            prior = others.len(),
            slot = position,
            "evaluating payment"
        );

        check_plan(client.plan_type, &ctx, self.config).map_err(reject)?;

        Ok(Evaluation {
            remaining_before,
            slot: InstallmentSlot::from_position(position),
            required: required_amount(client.plan_type, &ctx, self.config),
        })
    }
}
