use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::model::{Client, Payment};
use crate::store::LedgerRepository;
use crate::types::ClientId;

pub const PAID_COLOR: &str = "green";
pub const IN_PROGRESS_COLOR: &str = "orange";

/// one calendar entry per stored payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: String,
    pub color: String,
}

impl CalendarEvent {
    pub fn from_payment(client: &Client, payment: &Payment) -> Self {
        let color = if payment.is_paid() { PAID_COLOR } else { IN_PROGRESS_COLOR };

        Self {
            title: format!(
                "{} paid: {}, remaining: {}",
                client.name,
                payment.amount_paid().to_display(),
                payment.remaining_after().to_display()
            ),
            start: payment.payment_date().format("%Y-%m-%d").to_string(),
            color: color.to_string(),
        }
    }
}

/// calendar entries for every payment, in payment id order
pub fn calendar_feed<R: LedgerRepository>(repository: &R) -> Result<Vec<CalendarEvent>> {
    let clients: BTreeMap<ClientId, Client> = repository
        .clients()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(repository
        .payments()?
        .iter()
        .filter_map(|p| clients.get(&p.client_id()).map(|c| CalendarEvent::from_payment(c, p)))
        .collect())
}

/// convert to json string
pub fn to_json(events: &[CalendarEvent]) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string(events)
}
