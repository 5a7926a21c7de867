use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::model::{Client, Payment};
use crate::store::LedgerRepository;

/// dashboard filter; `page` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub page: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            month: None,
            year: None,
            page: 1,
        }
    }
}

impl DashboardQuery {
    fn matches(&self, payment: &Payment) -> bool {
        self.month.map_or(true, |m| payment.payment_date().month() == m)
            && self.year.map_or(true, |y| payment.payment_date().year() == y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(payment: &Payment) -> Self {
        Self {
            year: payment.payment_date().year(),
            month: payment.payment_date().month(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub period: YearMonth,
    pub total: Money,
}

/// client list, a page of filtered payments and the monthly breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub clients: Vec<Client>,
    pub payments: Vec<Payment>,
    pub page: usize,
    pub total_pages: usize,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub available_months: Vec<YearMonth>,
}

impl Dashboard {
    pub fn build<R: LedgerRepository>(repository: &R, query: &DashboardQuery, page_size: usize) -> Result<Self> {
        let page_size = page_size.max(1);
        let page = query.page.max(1);
        let all = repository.payments()?;

        let mut filtered: Vec<&Payment> = all.iter().filter(|p| query.matches(p)).collect();
        filtered.sort_by(|a, b| (b.payment_date(), b.id()).cmp(&(a.payment_date(), a.id())));

        let total_pages = filtered.len().div_ceil(page_size);
        let payments = filtered
            .iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .map(|p| (*p).clone())
            .collect();

        let mut totals: BTreeMap<YearMonth, Money> = BTreeMap::new();
        for payment in &filtered {
            *totals.entry(YearMonth::of(payment)).or_insert(Money::ZERO) += payment.amount_paid();
        }
        let monthly_totals = totals
            .into_iter()
            .map(|(period, total)| MonthlyTotal { period, total })
            .collect();

        let available_months = all
            .iter()
            .map(YearMonth::of)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            clients: repository.clients()?,
            payments,
            page,
            total_pages,
            monthly_totals,
            available_months,
        })
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewClient, PaymentCandidate};
    use crate::reconcile::BalanceReconciler;
    use crate::store::InMemoryRepository;
    use crate::types::PlanType;
    use chrono::NaiveDate;

    fn seeded() -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        let client = repo
            .insert_client(NewClient::new("Barbara", "barbara@example.com", PlanType::Flexible, Money::from_major(10_000)))
            .unwrap();

        let dates = [
            (2023, 12, 20),
            (2024, 1, 5),
            (2024, 1, 25),
            (2024, 2, 1),
            (2024, 2, 14),
            (2024, 2, 28),
            (2024, 3, 3),
        ];
        let mut remaining = client.total_due;
        for (y, m, d) in dates {
            let candidate = PaymentCandidate::new(
                client.id,
                NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                Money::from_major(100),
            );
            let reconciliation = BalanceReconciler::apply(remaining, candidate.amount);
            remaining = reconciliation.remaining_after;
            let id = repo.allocate_payment_id().unwrap();
            repo.save_payment(Payment::settle(id, &candidate, reconciliation)).unwrap();
        }
        repo
    }

    #[test]
    fn test_unfiltered_pages_newest_first() {
        let repo = seeded();
        let first = Dashboard::build(&repo, &DashboardQuery::default(), 5).unwrap();

        assert_eq!(first.clients.len(), 1);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.payments.len(), 5);
        assert_eq!(first.payments[0].payment_date(), NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert!(first
            .payments
            .windows(2)
            .all(|w| w[0].payment_date() >= w[1].payment_date()));

        let second = Dashboard::build(&repo, &DashboardQuery { page: 2, ..Default::default() }, 5).unwrap();
        assert_eq!(second.payments.len(), 2);
        assert_eq!(second.payments[1].payment_date(), NaiveDate::from_ymd_opt(2023, 12, 20).unwrap());

        let beyond = Dashboard::build(&repo, &DashboardQuery { page: 9, ..Default::default() }, 5).unwrap();
        assert!(beyond.payments.is_empty());
        assert_eq!(beyond.total_pages, 2);
    }

    #[test]
    fn test_month_filter_and_totals() {
        let repo = seeded();
        let query = DashboardQuery {
            month: Some(2),
            year: Some(2024),
            page: 1,
        };
        let dashboard = Dashboard::build(&repo, &query, 5).unwrap();

        assert_eq!(dashboard.payments.len(), 3);
        assert_eq!(dashboard.total_pages, 1);
        assert_eq!(
            dashboard.monthly_totals,
            vec![MonthlyTotal {
                period: YearMonth { year: 2024, month: 2 },
                total: Money::from_major(300),
            }]
        );
        // available months ignore the filter
        assert_eq!(dashboard.available_months.len(), 4);
        assert_eq!(dashboard.available_months[0], YearMonth { year: 2023, month: 12 });
    }

    #[test]
    fn test_year_filter_orders_totals_ascending() {
        let repo = seeded();
        let query = DashboardQuery {
            year: Some(2024),
            ..Default::default()
        };
        let dashboard = Dashboard::build(&repo, &query, 5).unwrap();

        let periods: Vec<u32> = dashboard.monthly_totals.iter().map(|t| t.period.month).collect();
        assert_eq!(periods, vec![1, 2, 3]);
        assert_eq!(dashboard.monthly_totals[0].total, Money::from_major(200));
        assert!(dashboard.to_json_pretty().unwrap().contains("available_months"));
    }

    #[test]
    fn test_huge_page_number_is_an_empty_page() {
        let repo = seeded();
        let query = DashboardQuery {
            page: usize::MAX,
            ..Default::default()
        };
        let dashboard = Dashboard::build(&repo, &query, 5).unwrap();
        assert!(dashboard.payments.is_empty());
        assert_eq!(dashboard.total_pages, 2);
    }

    #[test]
    fn test_empty_repository() {
        let repo = InMemoryRepository::new();
        let dashboard = Dashboard::build(&repo, &DashboardQuery::default(), 5).unwrap();
        assert_eq!(dashboard.total_pages, 0);
        assert!(dashboard.payments.is_empty());
        assert!(dashboard.monthly_totals.is_empty());
    }
}
