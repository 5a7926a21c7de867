//! Client and payment records.
//!
//! These are plain values: the rule engine reads them, the repository stores
//! them, and nothing here talks to storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::InputError;
use crate::reconcile::Reconciliation;
use crate::types::{ClientId, PaymentId, PaymentStatus, PlanType};

/// a client and the plan they pay under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub plan_type: PlanType,
    pub total_due: Money,
}

impl Client {
    /// build a stored client from validated details
    pub fn from_details(id: ClientId, details: NewClient) -> Self {
        Self {
            id,
            name: details.name,
            email: details.email,
            phone: details.phone,
            address: details.address,
            plan_type: details.plan_type,
            total_due: details.total_due,
        }
    }

    /// replace every editable field, keeping the id
    pub fn apply_details(&mut self, details: NewClient) {
        self.name = details.name;
        self.email = details.email;
        self.phone = details.phone;
        self.address = details.address;
        self.plan_type = details.plan_type;
        self.total_due = details.total_due;
    }
}

/// client details before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub plan_type: PlanType,
    pub total_due: Money,
}

impl NewClient {
    pub fn new(name: impl Into<String>, email: impl Into<String>, plan_type: PlanType, total_due: Money) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            plan_type,
            total_due,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// check the record-level invariants
    pub fn validate(&self) -> Result<(), InputError> {
        if self.name.trim().is_empty() {
            return Err(InputError::MissingField { field: "name" });
        }
        if self.email.trim().is_empty() {
            return Err(InputError::MissingField { field: "email" });
        }
        if !self.total_due.is_positive() {
            return Err(InputError::InvalidTotalDue {
                value: self.total_due.to_string(),
            });
        }
        Ok(())
    }
}

/// a recorded payment
///
/// Payments are read-only once built: every field is set together through
/// [`Payment::settle`], so the stored balance always matches the amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    client_id: ClientId,
    payment_date: NaiveDate,
    amount_paid: Money,
    remaining_after: Money,
    status: PaymentStatus,
}

impl Payment {
    /// build a payment from an accepted candidate and its reconciliation
    pub fn settle(id: PaymentId, candidate: &PaymentCandidate, reconciliation: Reconciliation) -> Self {
        Self {
            id,
            client_id: candidate.client_id,
            payment_date: candidate.payment_date,
            amount_paid: candidate.amount,
            remaining_after: reconciliation.remaining_after,
            status: reconciliation.status,
        }
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    pub fn remaining_after(&self) -> Money {
        self.remaining_after
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

/// a proposed payment, for a new record or as the replacement of an existing one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCandidate {
    pub client_id: ClientId,
    pub payment_date: NaiveDate,
    pub amount: Money,
}

impl PaymentCandidate {
    pub fn new(client_id: ClientId, payment_date: NaiveDate, amount: Money) -> Self {
        Self {
            client_id,
            payment_date,
            amount,
        }
    }

    /// amounts must be strictly positive
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.amount.is_positive() {
            return Err(InputError::InvalidAmount {
                value: self.amount.to_string(),
            });
        }
        Ok(())
    }
}

/// live balance of a client, summed from its stored payments
///
/// Unlike a payment's stored `remaining_after`, this always reflects deletes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientBalance {
    pub client_id: ClientId,
    pub total_due: Money,
    pub total_paid: Money,
    pub remaining: Money,
    pub payment_count: usize,
}

impl ClientBalance {
    pub fn of(client: &Client, payments: &[Payment]) -> Self {
        let owned: Vec<&Payment> = payments.iter().filter(|p| p.client_id() == client.id).collect();
        let total_paid: Money = owned.iter().map(|p| p.amount_paid()).sum();

        Self {
            client_id: client.id,
            total_due: client.total_due,
            total_paid,
            remaining: client.total_due - total_paid,
            payment_count: owned.len(),
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.remaining.is_positive()
    }
}
