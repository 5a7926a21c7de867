//! Raw form submissions and their parsing into typed records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::InputError;
use crate::model::{NewClient, PaymentCandidate};
use crate::types::{ClientId, PlanType};

/// client form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub plan_type: String,
    pub total_due: String,
}

impl ClientForm {
    pub fn parse(&self) -> Result<NewClient, InputError> {
        let plan_type: PlanType = required(&self.plan_type, "plan_type")?.parse()?;

        let total_raw = required(&self.total_due, "total_due")?;
        let total_due = Money::from_str_exact(total_raw).map_err(|_| InputError::InvalidTotalDue {
            value: total_raw.to_string(),
        })?;

        let client = NewClient {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            address: optional(&self.address),
            plan_type,
            total_due,
        };
        client.validate()?;
        Ok(client)
    }
}

/// payment form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub client_id: String,
    pub payment_date: String,
    pub amount_paid: String,
}

impl PaymentForm {
    pub fn parse(&self) -> Result<PaymentCandidate, InputError> {
        let id_raw = required(&self.client_id, "client_id")?;
        let client_id = id_raw
            .parse::<u64>()
            .map(ClientId)
            .map_err(|_| InputError::InvalidClientId {
                value: id_raw.to_string(),
            })?;

        let payment_date = parse_date(required(&self.payment_date, "payment_date")?)?;

        let amount_raw = required(&self.amount_paid, "amount_paid")?;
        let amount = Money::from_str_exact(amount_raw).map_err(|_| InputError::InvalidAmount {
            value: amount_raw.to_string(),
        })?;

        let candidate = PaymentCandidate::new(client_id, payment_date, amount);
        candidate.validate()?;
        Ok(candidate)
    }
}

/// ISO calendar date, `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| InputError::InvalidDate {
        value: raw.to_string(),
    })
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingField { field });
    }
    Ok(trimmed)
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
