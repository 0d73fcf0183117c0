use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Customer, IntoRecord, Invoice, InvoiceStatus, NewCustomer, NewInvoice, Record};
use crate::store::RecordStore;
use crate::store::backend::StorageBackend;
use chrono::NaiveDate;

fn demo_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap_or(NaiveDate::MIN)
}

fn demo_customers() -> Vec<NewCustomer> {
    vec![
        NewCustomer {
            name: "John Doe".into(),
            email: "john@example.com".into(),
            company: Some("Tech Corp".into()),
            phone: None,
            address: None,
        },
        NewCustomer {
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            company: Some("Design Co".into()),
            phone: None,
            address: None,
        },
    ]
}

fn demo_invoices() -> Vec<NewInvoice> {
    vec![
        NewInvoice {
            customer_name: "John Doe".into(),
            amount: 1500.00,
            date: demo_date(15),
            status: InvoiceStatus::Pending,
            notes: None,
        },
        NewInvoice {
            customer_name: "Jane Smith".into(),
            amount: 2300.50,
            date: demo_date(14),
            status: InvoiceStatus::Paid,
            notes: None,
        },
    ]
}

/// Fills empty stores with the demo book. A store that already holds records
/// is left alone.
pub fn run<B: StorageBackend>(backend: &B) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let customers = seed_store::<Customer, _, _>(backend, demo_customers(), &mut result)?;
    let invoices = seed_store::<Invoice, _, _>(backend, demo_invoices(), &mut result)?;
    Ok(result.with_customers(customers).with_invoices(invoices))
}

fn seed_store<R, N, B>(backend: &B, demo: Vec<N>, result: &mut CmdResult) -> Result<Vec<R>>
where
    R: Record,
    N: IntoRecord<Record = R>,
    B: StorageBackend,
{
    let store = RecordStore::<R, _>::new(backend);
    let loaded = store.load()?;
    result.note_recovery(backend, loaded.recovered);
    if !loaded.records.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} already has {} record(s), not seeded.",
            R::NAMESPACE,
            loaded.records.len()
        )));
        return Ok(Vec::new());
    }

    // Appending prepends, so the demo list goes in back to front.
    let mut added = Vec::new();
    for new in demo.into_iter().rev() {
        added.insert(0, store.append(new)?.record);
    }
    result.add_message(CmdMessage::success(format!(
        "Seeded {} with {} demo record(s).",
        R::NAMESPACE,
        added.len()
    )));
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{customers, invoices};
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn seeds_empty_stores_in_demo_order() {
        let backend = MemBackend::new();
        let result = run(&backend).unwrap();
        assert_eq!(result.customers.len(), 2);
        assert_eq!(result.invoices.len(), 2);

        let listed = customers::list(&backend, None).unwrap().customers;
        assert_eq!(listed[0].name, "John Doe");
        assert_eq!(listed[1].name, "Jane Smith");

        let listed = invoices::list(&backend, None).unwrap().invoices;
        assert_eq!(listed[0].customer_name, "John Doe");
        assert_eq!(listed[1].status, InvoiceStatus::Paid);
    }

    #[test]
    fn does_not_seed_twice() {
        let backend = MemBackend::new();
        run(&backend).unwrap();
        let second = run(&backend).unwrap();
        assert!(second.customers.is_empty());
        assert!(second.invoices.is_empty());
        assert_eq!(customers::list(&backend, None).unwrap().customers.len(), 2);
    }
}
