use hourglass_rs::SafeTimeProvider;
use tracing::{info, instrument, warn};

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::engine::{validate_and_price_payment_with_config, PricedPayment};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::model::{Client, ClientBalance, NewClient, Payment, PaymentCandidate};
use crate::store::LedgerRepository;
use crate::types::{ClientId, PaymentId};

/// client and payment operations over a repository
///
/// Write operations take `&mut self`, so a single service owns every
/// read-validate-write sequence against its repository.
pub struct LedgerService<R: LedgerRepository> {
    repository: R,
    config: LedgerConfig,
    events: EventStore,
}

impl<R: LedgerRepository> LedgerService<R> {
    /// create a service with the default plan parameters
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            config: LedgerConfig::default(),
            events: EventStore::new(),
        }
    }

    /// create a service with validated plan parameters
    pub fn with_config(repository: R, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            repository,
            config,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// register a new client; emails are unique
    pub fn register_client(&mut self, details: NewClient, time_provider: &SafeTimeProvider) -> Result<Client> {
        details.validate()?;

        if self.repository.find_client_by_email(&details.email)?.is_some() {
            return Err(LedgerError::DuplicateEmail { email: details.email });
        }

        let client = self.repository.insert_client(details)?;

        info!(
            client_id = %client.id,
            plan = client.plan_type.as_str(),
            total_due = %client.total_due,
            "client registered"
        );
        self.events.emit(Event::ClientRegistered {
            client_id: client.id,
            plan_type: client.plan_type,
            total_due: client.total_due,
            timestamp: time_provider.now(),
        });

        Ok(client)
    }

    /// replace a client's details
    ///
    /// Stored payments are left as they are; the new total may not fall below
    /// what the client has already paid.
    pub fn update_client(
        &mut self,
        id: ClientId,
        details: NewClient,
        time_provider: &SafeTimeProvider,
    ) -> Result<Client> {
        details.validate()?;

        let mut client = self.repository.load_client(id)?;

        if let Some(other) = self.repository.find_client_by_email(&details.email)? {
            if other.id != id {
                return Err(LedgerError::DuplicateEmail { email: details.email });
            }
        }

        let total_paid: Money = self
            .repository
            .load_payments_for(id)?
            .iter()
            .map(|p| p.amount_paid())
            .sum();
        if details.total_due < total_paid {
            return Err(LedgerError::TotalBelowPaid {
                total_due: details.total_due,
                total_paid,
            });
        }

        client.apply_details(details);
        self.repository.update_client(client.clone())?;

        info!(client_id = %client.id, total_due = %client.total_due, "client updated");
        self.events.emit(Event::ClientUpdated {
            client_id: client.id,
            plan_type: client.plan_type,
            total_due: client.total_due,
            timestamp: time_provider.now(),
        });

        Ok(client)
    }

    /// delete a client together with its payments
    pub fn remove_client(&mut self, id: ClientId, time_provider: &SafeTimeProvider) -> Result<usize> {
        let payments_removed = self.repository.delete_client(id)?;

        info!(client_id = %id, payments_removed, "client removed");
        self.events.emit(Event::ClientRemoved {
            client_id: id,
            payments_removed,
            timestamp: time_provider.now(),
        });

        Ok(payments_removed)
    }

    /// record a payment using the system clock
    pub fn record_payment_now(&mut self, candidate: PaymentCandidate) -> Result<Payment> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.record_payment(candidate, &time)
    }

    /// validate, price and store a new payment
    #[instrument(skip(self, candidate, time_provider), fields(client_id = %candidate.client_id))]
    pub fn record_payment(&mut self, candidate: PaymentCandidate, time_provider: &SafeTimeProvider) -> Result<Payment> {
        let client = self.repository.load_client(candidate.client_id)?;
        let history = self.repository.load_payments_for(client.id)?;

        let priced = self.price(&client, &history, &candidate, None, time_provider)?;

        let id = self.repository.allocate_payment_id()?;
        let payment = Payment::settle(id, &candidate, priced.reconciliation());
        self.repository.save_payment(payment.clone())?;

        info!(
            payment_id = %payment.id(),
            amount = %payment.amount_paid(),
            remaining_after = %payment.remaining_after(),
            status = payment.status().as_str(),
            "payment recorded"
        );
        self.events.emit(Event::PaymentRecorded {
            client_id: payment.client_id(),
            payment_id: payment.id(),
            amount: payment.amount_paid(),
            payment_date: payment.payment_date(),
            remaining_after: payment.remaining_after(),
            status: payment.status(),
            timestamp: time_provider.now(),
        });
        self.emit_settled(&payment, time_provider);

        Ok(payment)
    }

    /// amend a payment using the system clock
    pub fn amend_payment_now(&mut self, id: PaymentId, candidate: PaymentCandidate) -> Result<Payment> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.amend_payment(id, candidate, &time)
    }

    /// replace an existing payment, re-validated as if it were not stored
    ///
    /// The candidate may name another client; the payment then moves to that
    /// client's history. Sibling payments are not recomputed.
    #[instrument(skip(self, candidate, time_provider), fields(payment_id = %id, client_id = %candidate.client_id))]
    pub fn amend_payment(
        &mut self,
        id: PaymentId,
        candidate: PaymentCandidate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Payment> {
        let existing = self.repository.load_payment(id)?;
        let client = self.repository.load_client(candidate.client_id)?;
        let history = self.repository.load_payments_for(client.id)?;

        let priced = self.price(&client, &history, &candidate, Some(id), time_provider)?;

        let payment = Payment::settle(id, &candidate, priced.reconciliation());
        self.repository.save_payment(payment.clone())?;

        info!(
            old_amount = %existing.amount_paid(),
            new_amount = %payment.amount_paid(),
            remaining_after = %payment.remaining_after(),
            "payment amended"
        );
        self.events.emit(Event::PaymentAmended {
            client_id: payment.client_id(),
            payment_id: id,
            old_amount: existing.amount_paid(),
            new_amount: payment.amount_paid(),
            remaining_after: payment.remaining_after(),
            status: payment.status(),
            timestamp: time_provider.now(),
        });
        self.emit_settled(&payment, time_provider);

        Ok(payment)
    }

    /// delete a payment; other payments keep their stored balances
    pub fn delete_payment(&mut self, id: PaymentId, time_provider: &SafeTimeProvider) -> Result<Payment> {
        let payment = self.repository.delete_payment(id)?;

        info!(payment_id = %id, client_id = %payment.client_id(), "payment deleted");
        self.events.emit(Event::PaymentDeleted {
            client_id: payment.client_id(),
            payment_id: id,
            amount: payment.amount_paid(),
            timestamp: time_provider.now(),
        });

        Ok(payment)
    }

    /// live balance summed from stored payments
    pub fn client_balance(&self, id: ClientId) -> Result<ClientBalance> {
        let client = self.repository.load_client(id)?;
        let payments = self.repository.load_payments_for(id)?;
        Ok(ClientBalance::of(&client, &payments))
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn price(
        &mut self,
        client: &Client,
        history: &[Payment],
        candidate: &PaymentCandidate,
        exclude: Option<PaymentId>,
        time_provider: &SafeTimeProvider,
    ) -> Result<PricedPayment> {
        let now = time_provider.now();
        let result = validate_and_price_payment_with_config(
            &self.config,
            client,
            history,
            candidate,
            exclude,
            now.date_naive(),
        );

        if let Err(LedgerError::Rejected(rejection)) = &result {
            warn!(
                reason = rejection.reason.code(),
                amount = %candidate.amount,
                remaining_before = %rejection.remaining_before,
                "payment rejected: {}",
                rejection.reason
            );
            self.events.emit(Event::PaymentRejected {
                client_id: client.id,
                amount: candidate.amount,
                reason: rejection.reason.clone(),
                remaining_before: rejection.remaining_before,
                timestamp: now,
            });
        }

        result
    }

    fn emit_settled(&mut self, payment: &Payment, time_provider: &SafeTimeProvider) {
        if payment.is_paid() {
            self.events.emit(Event::ClientSettled {
                client_id: payment.client_id(),
                final_payment: payment.id(),
                timestamp: time_provider.now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InputError;
    use crate::rules::RejectReason;
    use crate::store::InMemoryRepository;
    use crate::types::{PaymentStatus, PlanType};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn setup(plan: PlanType, total: i64) -> (LedgerService<InMemoryRepository>, ClientId, SafeTimeProvider) {
        let time = clock();
        let mut service = LedgerService::new(InMemoryRepository::new());
        let client = service
            .register_client(
                NewClient::new("Grace", "grace@example.com", plan, Money::from_major(total)),
                &time,
            )
            .unwrap();
        service.take_events();
        (service, client.id, time)
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let (mut service, _, time) = setup(PlanType::Flexible, 1_000);
        let result = service.register_client(
            NewClient::new("Other", "grace@example.com", PlanType::Flexible, Money::from_major(10)),
            &time,
        );
        assert!(matches!(result, Err(LedgerError::DuplicateEmail { .. })));

        let invalid = service.register_client(
            NewClient::new("Other", "other@example.com", PlanType::Flexible, Money::ZERO),
            &time,
        );
        assert!(matches!(invalid, Err(LedgerError::Input(InputError::InvalidTotalDue { .. }))));
    }

    #[test]
    fn test_two_installment_flow() {
        let (mut service, client_id, time) = setup(PlanType::TwoInstallment, 1_000);

        let first = service
            .record_payment(PaymentCandidate::new(client_id, day(1), Money::from_major(500)), &time)
            .unwrap();
        assert_eq!(first.status(), PaymentStatus::InProgress);
        assert_eq!(first.remaining_after(), Money::from_major(500));

        let second = service
            .record_payment(PaymentCandidate::new(client_id, day(15), Money::from_major(500)), &time)
            .unwrap();
        assert!(second.is_paid());

        let third = service.record_payment(PaymentCandidate::new(client_id, day(20), Money::from_major(1)), &time);
        assert_eq!(
            third.unwrap_err().rejection().map(|r| r.reason.clone()),
            Some(RejectReason::MaxInstallmentsReached { max: 2 })
        );

        let events = service.take_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, Event::PaymentRecorded { .. })).count(),
            2
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ClientSettled { final_payment, .. } if *final_payment == second.id())));
        assert!(events.iter().any(|e| matches!(e, Event::PaymentRejected { .. })));
    }

    #[test]
    fn test_second_installment_dated_before_first_settles() {
        let (mut service, client_id, time) = setup(PlanType::TwoInstallment, 1_000);

        service
            .record_payment(PaymentCandidate::new(client_id, day(20), Money::from_major(500)), &time)
            .unwrap();
        service
            .update_client(
                client_id,
                NewClient::new("Grace", "grace@example.com", PlanType::TwoInstallment, Money::from_major(1_500)),
                &time,
            )
            .unwrap();

        // earlier date, but it is still the client's second payment
        let second = service
            .record_payment(PaymentCandidate::new(client_id, day(10), Money::from_major(1_000)), &time)
            .unwrap();
        assert!(second.is_paid());
        assert!(service.client_balance(client_id).unwrap().is_settled());
    }

    #[test]
    fn test_rejected_payment_is_not_stored() {
        let (mut service, client_id, time) = setup(PlanType::Flexible, 1_000);

        let result = service.record_payment(PaymentCandidate::new(client_id, day(1), Money::from_major(50)), &time);
        assert!(result.is_err());
        assert!(service.repository().payments().unwrap().is_empty());

        let past = service.record_payment(
            PaymentCandidate::new(client_id, day(1) - Duration::days(1), Money::from_major(500)),
            &time,
        );
        assert!(matches!(
            past.unwrap_err().rejection().map(|r| &r.reason),
            Some(RejectReason::PastDate { .. })
        ));
    }

    #[test]
    fn test_today_follows_the_clock() {
        let (mut service, client_id, time) = setup(PlanType::FullPayment, 300);
        time.test_control().unwrap().advance(Duration::days(10));

        let early = service.record_payment(PaymentCandidate::new(client_id, day(5), Money::from_major(300)), &time);
        assert!(early.is_err());

        let on_time = service
            .record_payment(PaymentCandidate::new(client_id, day(11), Money::from_major(300)), &time)
            .unwrap();
        assert!(on_time.is_paid());
    }

    #[test]
    fn test_amend_excludes_the_payment_being_edited() {
        let (mut service, client_id, time) = setup(PlanType::Flexible, 1_000);

        let first = service
            .record_payment(PaymentCandidate::new(client_id, day(1), Money::from_major(400)), &time)
            .unwrap();
        service
            .record_payment(PaymentCandidate::new(client_id, day(2), Money::from_major(300)), &time)
            .unwrap();

        // 700 paid, but the first payment's own 400 must not count against it
        let amended = service
            .amend_payment(first.id(), PaymentCandidate::new(client_id, day(1), Money::from_major(700)), &time)
            .unwrap();
        assert_eq!(amended.id(), first.id());
        assert!(amended.is_paid());
        assert_eq!(service.client_balance(client_id).unwrap().remaining, Money::ZERO);

        let too_much = service.amend_payment(
            first.id(),
            PaymentCandidate::new(client_id, day(1), Money::from_major(701)),
            &time,
        );
        assert!(matches!(
            too_much.unwrap_err().rejection().map(|r| &r.reason),
            Some(RejectReason::AmountExceedsRemaining { .. })
        ));
        assert!(service
            .events()
            .iter()
            .any(|e| matches!(e, Event::PaymentAmended { old_amount, .. } if *old_amount == Money::from_major(400))));
    }

    #[test]
    fn test_amend_unknown_payment() {
        let (mut service, client_id, time) = setup(PlanType::Flexible, 1_000);
        let result = service.amend_payment(
            PaymentId(77),
            PaymentCandidate::new(client_id, day(1), Money::from_major(100)),
            &time,
        );
        assert!(matches!(result, Err(LedgerError::PaymentNotFound { .. })));
    }

    #[test]
    fn test_delete_payment_keeps_siblings() {
        let (mut service, client_id, time) = setup(PlanType::Flexible, 1_000);

        let first = service
            .record_payment(PaymentCandidate::new(client_id, day(1), Money::from_major(200)), &time)
            .unwrap();
        let second = service
            .record_payment(PaymentCandidate::new(client_id, day(2), Money::from_major(300)), &time)
            .unwrap();

        service.delete_payment(first.id(), &time).unwrap();

        let stored = service.repository().load_payment(second.id()).unwrap();
        assert_eq!(stored.remaining_after(), Money::from_major(500));
        assert_eq!(service.client_balance(client_id).unwrap().remaining, Money::from_major(700));
    }

    #[test]
    fn test_update_client_guards() {
        let (mut service, client_id, time) = setup(PlanType::Flexible, 1_000);
        service
            .register_client(
                NewClient::new("Ken", "ken@example.com", PlanType::Flexible, Money::from_major(10)),
                &time,
            )
            .unwrap();
        service
            .record_payment(PaymentCandidate::new(client_id, day(1), Money::from_major(600)), &time)
            .unwrap();

        let taken = service.update_client(
            client_id,
            NewClient::new("Grace", "ken@example.com", PlanType::Flexible, Money::from_major(1_000)),
            &time,
        );
        assert!(matches!(taken, Err(LedgerError::DuplicateEmail { .. })));

        let below = service.update_client(
            client_id,
            NewClient::new("Grace", "grace@example.com", PlanType::Flexible, Money::from_major(500)),
            &time,
        );
        assert!(matches!(below, Err(LedgerError::TotalBelowPaid { .. })));

        let updated = service
            .update_client(
                client_id,
                NewClient::new("Grace H.", "grace@example.com", PlanType::FullPayment, Money::from_major(600)),
                &time,
            )
            .unwrap();
        assert_eq!(updated.plan_type, PlanType::FullPayment);
        assert_eq!(service.client_balance(client_id).unwrap().remaining, Money::ZERO);
    }

    #[test]
    fn test_remove_client_cascades() {
        let (mut service, client_id, time) = setup(PlanType::Flexible, 1_000);
        service
            .record_payment(PaymentCandidate::new(client_id, day(1), Money::from_major(100)), &time)
            .unwrap();

        assert_eq!(service.remove_client(client_id, &time).unwrap(), 1);
        assert!(matches!(service.client_balance(client_id), Err(LedgerError::ClientNotFound { .. })));
        assert!(service.take_events().iter().any(|e| matches!(e, Event::ClientRemoved { payments_removed: 1, .. })));
    }

    #[test]
    fn test_with_config_validates() {
        let config = LedgerConfig {
            dashboard_page_size: 0,
            ..LedgerConfig::default()
        };
        assert!(matches!(
            LedgerService::with_config(InMemoryRepository::new(), config),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
    }
}
