use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::rules::RejectReason;
use crate::types::{ClientId, PaymentId, PaymentStatus, PlanType};

/// all events emitted by the ledger service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // client events
    ClientRegistered {
        client_id: ClientId,
        plan_type: PlanType,
        total_due: Money,
        timestamp: DateTime<Utc>,
    },
    ClientUpdated {
        client_id: ClientId,
        plan_type: PlanType,
        total_due: Money,
        timestamp: DateTime<Utc>,
    },
    ClientRemoved {
        client_id: ClientId,
        payments_removed: usize,
        timestamp: DateTime<Utc>,
    },
    ClientSettled {
        client_id: ClientId,
        final_payment: PaymentId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        client_id: ClientId,
        payment_id: PaymentId,
        amount: Money,
        payment_date: NaiveDate,
        remaining_after: Money,
        status: PaymentStatus,
        timestamp: DateTime<Utc>,
    },
    PaymentAmended {
        client_id: ClientId,
        payment_id: PaymentId,
        old_amount: Money,
        new_amount: Money,
        remaining_after: Money,
        status: PaymentStatus,
        timestamp: DateTime<Utc>,
    },
    /// sibling payments keep their stored remaining balance and status
    PaymentDeleted {
        client_id: ClientId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentRejected {
        client_id: ClientId,
        amount: Money,
        reason: RejectReason,
        remaining_before: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
