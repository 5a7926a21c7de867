use std::collections::BTreeMap;
use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;

use crate::decimal::Money;
use crate::errors::Result;
use crate::model::{ClientBalance, Payment};
use crate::store::LedgerRepository;
use crate::types::ClientId;

/// row of the clients sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    #[serde(rename = "ID")]
    pub id: ClientId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Payment plan")]
    pub plan: &'static str,
    #[serde(rename = "Total due")]
    pub total_due: Money,
    #[serde(rename = "Total paid")]
    pub total_paid: Money,
    #[serde(rename = "Remaining")]
    pub remaining: Money,
}

/// row of the payments sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRow {
    #[serde(rename = "Payment ID")]
    pub payment_id: u64,
    #[serde(rename = "Client ID")]
    pub client_id: ClientId,
    #[serde(rename = "Client name")]
    pub client_name: String,
    #[serde(rename = "Payment date")]
    pub payment_date: String,
    #[serde(rename = "Amount paid")]
    pub amount_paid: Money,
    #[serde(rename = "Remaining")]
    pub remaining: Money,
    #[serde(rename = "Status")]
    pub status: &'static str,
}

/// both sheets of the export, built in one pass over the repository
///
/// Client balances are summed live from stored payments; amounts are
/// rounded to two digits.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExport {
    pub clients: Vec<ClientRow>,
    pub payments: Vec<PaymentRow>,
}

impl SpreadsheetExport {
    pub fn build<R: LedgerRepository>(repository: &R) -> Result<Self> {
        let clients = repository.clients()?;
        let mut payments = repository.payments()?;

        let mut by_client: BTreeMap<ClientId, Vec<Payment>> = BTreeMap::new();
        for payment in &payments {
            by_client.entry(payment.client_id()).or_default().push(payment.clone());
        }

        let client_rows = clients
            .iter()
            .map(|c| {
                let owned = by_client.get(&c.id).map(Vec::as_slice).unwrap_or_default();
                let balance = ClientBalance::of(c, owned);
                ClientRow {
                    id: c.id,
                    name: c.name.clone(),
                    email: c.email.clone(),
                    phone: c.phone.clone(),
                    address: c.address.clone(),
                    plan: c.plan_type.as_str(),
                    total_due: balance.total_due.to_display(),
                    total_paid: balance.total_paid.to_display(),
                    remaining: balance.remaining.to_display(),
                }
            })
            .collect();

        let names: BTreeMap<ClientId, &str> = clients.iter().map(|c| (c.id, c.name.as_str())).collect();
        payments.sort_by(|a, b| (a.client_id(), a.payment_date(), a.id()).cmp(&(b.client_id(), b.payment_date(), b.id())));

        let payment_rows = payments
            .iter()
            .map(|p| PaymentRow {
                payment_id: p.id().0,
                client_id: p.client_id(),
                client_name: names.get(&p.client_id()).copied().unwrap_or_default().to_string(),
                payment_date: p.payment_date().format("%Y-%m-%d").to_string(),
                amount_paid: p.amount_paid().to_display(),
                remaining: p.remaining_after().to_display(),
                status: p.status().as_str(),
            })
            .collect();

        Ok(Self {
            clients: client_rows,
            payments: payment_rows,
        })
    }

    /// write the clients sheet as csv
    pub fn write_clients<W: Write>(&self, w: W) -> Result<()> {
        write_rows(w, &self.clients)
    }

    /// write the payments sheet as csv
    pub fn write_payments<W: Write>(&self, w: W) -> Result<()> {
        write_rows(w, &self.payments)
    }
}

fn write_rows<W: Write, T: Serialize>(mut w: W, rows: &[T]) -> Result<()> {
    let mut wrt = WriterBuilder::new().from_writer(&mut w);
    for row in rows {
        wrt.serialize(row)?;
    }
    wrt.flush()?;
    Ok(())
}
