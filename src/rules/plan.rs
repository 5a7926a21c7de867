use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::types::PlanType;

use super::RejectReason;

/// payments allowed on a two-installment plan
pub const TWO_INSTALLMENT_MAX_PAYMENTS: usize = 2;

/// facts about a candidate payment that the plan checks look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanContext {
    pub total_due: Money,
    pub remaining_before: Money,
    pub amount: Money,
    /// installment position the candidate takes, 0 = first
    pub slot: usize,
}

/// installment role a payment fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentSlot {
    First,
    Second,
    Later(usize),
}

impl InstallmentSlot {
    pub fn from_position(position: usize) -> Self {
        match position {
            0 => InstallmentSlot::First,
            1 => InstallmentSlot::Second,
            n => InstallmentSlot::Later(n),
        }
    }
}

/// amount the plan pins for this slot, if any
pub fn required_amount(plan: PlanType, ctx: &PlanContext, config: &LedgerConfig) -> Option<Money> {
    match (plan, InstallmentSlot::from_position(ctx.slot)) {
        (PlanType::FullPayment, _) => Some(ctx.remaining_before),
        (PlanType::TwoInstallment, InstallmentSlot::First) => {
            Some(ctx.total_due.share(config.two_installment_first_share))
        }
        (PlanType::TwoInstallment, _) => Some(ctx.remaining_before),
        (PlanType::Flexible, _) => None,
    }
}

/// payment-count limit of the plan, checked before any amount rule
pub fn check_capacity(plan: PlanType, prior_count: usize) -> Result<(), RejectReason> {
    if plan == PlanType::TwoInstallment && prior_count >= TWO_INSTALLMENT_MAX_PAYMENTS {
        return Err(RejectReason::MaxInstallmentsReached {
            max: TWO_INSTALLMENT_MAX_PAYMENTS,
        });
    }
    Ok(())
}

/// run the amount rules of one plan type
pub fn check_plan(plan: PlanType, ctx: &PlanContext, config: &LedgerConfig) -> Result<(), RejectReason> {
    match plan {
        PlanType::FullPayment => check_full_payment(ctx),
        PlanType::TwoInstallment => check_two_installment(ctx, config),
        PlanType::Flexible => check_flexible(ctx, config),
    }
}

fn check_full_payment(ctx: &PlanContext) -> Result<(), RejectReason> {
    if ctx.amount != ctx.remaining_before {
        return Err(RejectReason::FullPaymentMismatch {
            required: ctx.remaining_before,
        });
    }
    Ok(())
}

fn check_two_installment(ctx: &PlanContext, config: &LedgerConfig) -> Result<(), RejectReason> {
    match InstallmentSlot::from_position(ctx.slot) {
        InstallmentSlot::First => {
            let share = config.two_installment_first_share;
            let required = ctx.total_due.share(share);
            if ctx.amount != required {
                return Err(RejectReason::FirstInstallmentMismatch { required, share });
            }
        }
        _ => {
            if ctx.amount != ctx.remaining_before {
                return Err(RejectReason::SecondInstallmentMismatch {
                    required: ctx.remaining_before,
                });
            }
        }
    }

    Ok(())
}

fn check_flexible(ctx: &PlanContext, config: &LedgerConfig) -> Result<(), RejectReason> {
    if InstallmentSlot::from_position(ctx.slot) != InstallmentSlot::First {
        return Ok(());
    }

    let share = config.flexible_minimum_advance;
    let minimum = ctx.total_due.share(share);
    if ctx.amount < minimum {
        return Err(RejectReason::BelowMinimumAdvance { minimum, share });
    }
    Ok(())
}
