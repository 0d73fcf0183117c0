use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Customer, Invoice, InvoiceStatus};
use crate::store::RecordStore;
use crate::store::backend::StorageBackend;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusTotal {
    pub count: usize,
    pub amount: f64,
}

impl StatusTotal {
    fn add(&mut self, amount: f64) {
        self.count += 1;
        self.amount += amount;
    }
}

/// Dashboard figures over both stores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub customers: usize,
    pub invoices: usize,
    pub pending: StatusTotal,
    pub paid: StatusTotal,
    pub other: StatusTotal,
}

impl Summary {
    pub fn from_records(customers: &[Customer], invoices: &[Invoice]) -> Self {
        let mut summary = Summary {
            customers: customers.len(),
            invoices: invoices.len(),
            ..Default::default()
        };
        for invoice in invoices {
            let bucket = match invoice.status {
                InvoiceStatus::Pending => &mut summary.pending,
                InvoiceStatus::Paid => &mut summary.paid,
                InvoiceStatus::Other(_) => &mut summary.other,
            };
            bucket.add(invoice.amount);
        }
        summary
    }

    pub fn total_billed(&self) -> f64 {
        self.pending.amount + self.paid.amount + self.other.amount
    }
}

pub fn run<B: StorageBackend>(backend: &B) -> Result<CmdResult> {
    let customers = RecordStore::<Customer, _>::new(backend).load()?;
    let invoices = RecordStore::<Invoice, _>::new(backend).load()?;

    let mut result = CmdResult::default();
    result.note_recovery(backend, customers.recovered);
    result.note_recovery(backend, invoices.recovered);
    Ok(result.with_summary(Summary::from_records(
        &customers.records,
        &invoices.records,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seed;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn empty_stores_summarize_to_zero() {
        let backend = MemBackend::new();
        let summary = run(&backend).unwrap().summary.unwrap();
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn totals_by_status() {
        let backend = MemBackend::new();
        seed::run(&backend).unwrap();

        let summary = run(&backend).unwrap().summary.unwrap();
        assert_eq!(summary.customers, 2);
        assert_eq!(summary.invoices, 2);
        assert_eq!(summary.pending.count, 1);
        assert_eq!(summary.pending.amount, 1500.0);
        assert_eq!(summary.paid.count, 1);
        assert_eq!(summary.paid.amount, 2300.5);
        assert_eq!(summary.other.count, 0);
        assert_eq!(summary.total_billed(), 3800.5);
    }
}
