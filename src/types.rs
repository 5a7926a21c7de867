use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::InputError;

/// unique identifier for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

/// unique identifier for a payment
///
/// Ids are handed out in increasing order by the repository, so they double
/// as the tie-break between payments sharing a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// rule set governing how the total due may be split across payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    /// one payment covering the whole remaining balance
    FullPayment,
    /// 50% then the remainder
    TwoInstallment,
    /// any number of payments after a minimum first advance
    Flexible,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::FullPayment => "full_payment",
            PlanType::TwoInstallment => "two_installment",
            PlanType::Flexible => "flexible",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = InputError;

    /// accepts the canonical names plus the labels used by older form data
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full_payment" | "fullpayment" | "full" | "complet" => Ok(PlanType::FullPayment),
            "two_installment" | "twoinstallment" | "deux_fois" | "moitie" => {
                Ok(PlanType::TwoInstallment)
            }
            "flexible" => Ok(PlanType::Flexible),
            other => Err(InputError::UnknownPlanType {
                value: other.to_string(),
            }),
        }
    }
}

/// payment status, derived from the remaining balance after the payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// nothing left to pay
    Paid,
    /// balance still outstanding
    InProgress,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::InProgress => "in_progress",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
