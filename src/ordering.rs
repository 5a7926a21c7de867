//! Chronological ordering of a client's payment history.
//!
//! Installment roles of stored payments follow payment dates, never storage
//! order. Payments that share a date are ordered by id, so the result is
//! fully deterministic.

use chrono::NaiveDate;

use crate::model::Payment;
use crate::types::PaymentId;

fn sort_key(date: NaiveDate, id: PaymentId) -> (NaiveDate, PaymentId) {
    (date, id)
}

/// payments sorted by date ascending, ties broken by id ascending
pub fn order_history(history: &[Payment]) -> Vec<Payment> {
    let mut ordered: Vec<&Payment> = history.iter().collect();
    ordered.sort_by_key(|p| sort_key(p.payment_date(), p.id()));
    ordered.into_iter().cloned().collect()
}

/// history with one payment left out (the one being amended)
pub fn excluding(history: &[Payment], exclude: Option<PaymentId>) -> Vec<&Payment> {
    history
        .iter()
        .filter(|p| Some(p.id()) != exclude)
        .collect()
}

/// zero-based position an amended payment takes among `others`
///
/// `others` must already exclude the amended payment.
pub fn amended_position(others: &[&Payment], date: NaiveDate, id: PaymentId) -> usize {
    let key = sort_key(date, id);
    others
        .iter()
        .filter(|p| sort_key(p.payment_date(), p.id()) < key)
        .count()
}
