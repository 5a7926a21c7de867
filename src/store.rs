use std::collections::BTreeMap;

use crate::errors::{LedgerError, Result};
use crate::model::{Client, NewClient, Payment};
use crate::types::{ClientId, PaymentId};

/// storage capability the ledger service is given
///
/// Implementations own ids: clients and payments get increasing ids, which
/// the ordering rules rely on to break ties between same-day payments.
pub trait LedgerRepository {
    fn insert_client(&mut self, details: NewClient) -> Result<Client>;

    fn update_client(&mut self, client: Client) -> Result<()>;

    /// remove a client and every payment it owns; returns the payments removed
    fn delete_client(&mut self, id: ClientId) -> Result<usize>;

    fn load_client(&self, id: ClientId) -> Result<Client>;

    fn find_client_by_email(&self, email: &str) -> Result<Option<Client>>;

    fn clients(&self) -> Result<Vec<Client>>;

    fn load_payments_for(&self, client_id: ClientId) -> Result<Vec<Payment>>;

    fn load_payment(&self, id: PaymentId) -> Result<Payment>;

    fn allocate_payment_id(&mut self) -> Result<PaymentId>;

    /// insert or replace a payment
    fn save_payment(&mut self, payment: Payment) -> Result<()>;

    fn delete_payment(&mut self, id: PaymentId) -> Result<Payment>;

    fn payments(&self) -> Result<Vec<Payment>>;
}

/// repository held in memory, ordered by id
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    clients: BTreeMap<ClientId, Client>,
    payments: BTreeMap<PaymentId, Payment>,
    last_client_id: u64,
    last_payment_id: u64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerRepository for InMemoryRepository {
    fn insert_client(&mut self, details: NewClient) -> Result<Client> {
        self.last_client_id += 1;
        let client = Client::from_details(ClientId(self.last_client_id), details);
        self.clients.insert(client.id, client.clone());
        Ok(client)
    }

    fn update_client(&mut self, client: Client) -> Result<()> {
        match self.clients.get_mut(&client.id) {
            Some(stored) => {
                *stored = client;
                Ok(())
            }
            None => Err(LedgerError::ClientNotFound { id: client.id }),
        }
    }

    fn delete_client(&mut self, id: ClientId) -> Result<usize> {
        if self.clients.remove(&id).is_none() {
            return Err(LedgerError::ClientNotFound { id });
        }
        let before = self.payments.len();
        self.payments.retain(|_, p| p.client_id() != id);
        Ok(before - self.payments.len())
    }

    fn load_client(&self, id: ClientId) -> Result<Client> {
        self.clients
            .get(&id)
            .cloned()
            .ok_or(LedgerError::ClientNotFound { id })
    }

    fn find_client_by_email(&self, email: &str) -> Result<Option<Client>> {
        Ok(self.clients.values().find(|c| c.email == email).cloned())
    }

    fn clients(&self) -> Result<Vec<Client>> {
        Ok(self.clients.values().cloned().collect())
    }

    fn load_payments_for(&self, client_id: ClientId) -> Result<Vec<Payment>> {
        Ok(self
            .payments
            .values()
            .filter(|p| p.client_id() == client_id)
            .cloned()
            .collect())
    }

    fn load_payment(&self, id: PaymentId) -> Result<Payment> {
        self.payments
            .get(&id)
            .cloned()
            .ok_or(LedgerError::PaymentNotFound { id })
    }

    fn allocate_payment_id(&mut self) -> Result<PaymentId> {
        self.last_payment_id += 1;
        Ok(PaymentId(self.last_payment_id))
    }

    fn save_payment(&mut self, payment: Payment) -> Result<()> {
        if !self.clients.contains_key(&payment.client_id()) {
            return Err(LedgerError::ClientNotFound {
                id: payment.client_id(),
            });
        }
        self.payments.insert(payment.id(), payment);
        Ok(())
    }

    fn delete_payment(&mut self, id: PaymentId) -> Result<Payment> {
        self.payments
            .remove(&id)
            .ok_or(LedgerError::PaymentNotFound { id })
    }

    fn payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::model::PaymentCandidate;
    use crate::reconcile::BalanceReconciler;
    use crate::types::PlanType;
    use chrono::NaiveDate;

    fn details(email: &str) -> NewClient {
        NewClient::new("Barbara", email, PlanType::Flexible, Money::from_major(1_000))
    }

    fn payment(repo: &mut InMemoryRepository, client_id: ClientId, amount: i64) -> Payment {
        let id = repo.allocate_payment_id().unwrap();
        let candidate = PaymentCandidate::new(
            client_id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Money::from_major(amount),
        );
        Payment::settle(id, &candidate, BalanceReconciler::apply(Money::from_major(1_000), candidate.amount))
    }

    #[test]
    fn test_ids_increase() {
        let mut repo = InMemoryRepository::new();
        let a = repo.insert_client(details("a@example.com")).unwrap();
        let b = repo.insert_client(details("b@example.com")).unwrap();
        assert!(a.id < b.id);

        let p1 = repo.allocate_payment_id().unwrap();
        let p2 = repo.allocate_payment_id().unwrap();
        assert!(p1 < p2);
    }

    #[test]
    fn test_delete_client_cascades() {
        let mut repo = InMemoryRepository::new();
        let a = repo.insert_client(details("a@example.com")).unwrap();
        let b = repo.insert_client(details("b@example.com")).unwrap();

        for amount in [100, 200] {
            let p = payment(&mut repo, a.id, amount);
            repo.save_payment(p).unwrap();
        }
        let p = payment(&mut repo, b.id, 300);
        repo.save_payment(p).unwrap();

        assert_eq!(repo.delete_client(a.id).unwrap(), 2);
        assert!(repo.load_payments_for(a.id).unwrap().is_empty());
        assert_eq!(repo.payments().unwrap().len(), 1);
        assert!(matches!(repo.load_client(a.id), Err(LedgerError::ClientNotFound { .. })));
        assert!(matches!(repo.delete_client(a.id), Err(LedgerError::ClientNotFound { .. })));
    }

    #[test]
    fn test_save_payment_requires_client() {
        let mut repo = InMemoryRepository::new();
        let p = payment(&mut repo, ClientId(99), 10);
        assert!(matches!(repo.save_payment(p), Err(LedgerError::ClientNotFound { .. })));
    }

    #[test]
    fn test_find_by_email_and_replace_payment() {
        let mut repo = InMemoryRepository::new();
        let a = repo.insert_client(details("a@example.com")).unwrap();
        assert_eq!(repo.find_client_by_email("a@example.com").unwrap().map(|c| c.id), Some(a.id));
        assert!(repo.find_client_by_email("z@example.com").unwrap().is_none());

        let p = payment(&mut repo, a.id, 100);
        let id = p.id();
        repo.save_payment(p.clone()).unwrap();

        let candidate = PaymentCandidate::new(a.id, p.payment_date(), Money::from_major(150));
        let replacement = Payment::settle(id, &candidate, BalanceReconciler::apply(Money::from_major(1_000), candidate.amount));
        repo.save_payment(replacement).unwrap();

        assert_eq!(repo.payments().unwrap().len(), 1);
        let stored = repo.load_payment(id).unwrap();
        assert_eq!(stored.amount_paid(), Money::from_major(150));
        assert_eq!(stored.remaining_after(), Money::from_major(850));
        assert!(repo.delete_payment(id).is_ok());
        assert!(matches!(repo.delete_payment(id), Err(LedgerError::PaymentNotFound { .. })));
    }
}
