use crate::commands::{CmdMessage, CmdResult, not_found};
use crate::error::{BillbookError, Result};
use crate::model::{Invoice, InvoiceStatus, RecordId};
use crate::store::RecordStore;
use crate::store::backend::StorageBackend;
use crate::validation::InvoiceForm;
use chrono::NaiveDate;

pub fn add<B: StorageBackend>(backend: &B, form: InvoiceForm, today: NaiveDate) -> Result<CmdResult> {
    let new = form.accept(today).map_err(BillbookError::Validation)?;
    let appended = RecordStore::new(backend).append(new)?;

    let mut result = CmdResult::default();
    result.note_recovery(backend, appended.recovered);
    result.add_message(CmdMessage::success(format!(
        "Invoice added ({}): {} {:.2}",
        appended.record.id, appended.record.customer_name, appended.record.amount
    )));
    result.invoices.push(appended.record);
    Ok(result)
}

pub fn list<B: StorageBackend>(backend: &B, status: Option<&InvoiceStatus>) -> Result<CmdResult> {
    let loaded = RecordStore::<Invoice, _>::new(backend).load()?;
    let invoices = match status {
        Some(status) => loaded
            .records
            .into_iter()
            .filter(|i| &i.status == status)
            .collect(),
        None => loaded.records,
    };

    let mut result = CmdResult::default();
    result.note_recovery(backend, loaded.recovered);
    Ok(result.with_invoices(invoices))
}

pub fn view<B: StorageBackend>(backend: &B, id: &RecordId) -> Result<CmdResult> {
    let lookup = RecordStore::<Invoice, _>::new(backend).find(id)?;
    let Some(invoice) = lookup.record else {
        return Err(not_found(backend, id, lookup.recovered));
    };
    Ok(CmdResult::default().with_invoices(vec![invoice]))
}

pub fn delete<B: StorageBackend>(backend: &B, id: &RecordId) -> Result<CmdResult> {
    let removal = RecordStore::<Invoice, _>::new(backend).delete_by_id(id)?;

    let mut result = CmdResult::default();
    result.note_recovery(backend, removal.recovered);
    if removal.removed.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No invoice with id {}, nothing deleted.",
            id
        )));
    }
    for invoice in removal.removed {
        result.add_message(CmdMessage::success(format!(
            "Invoice deleted ({}): {}",
            invoice.id, invoice.customer_name
        )));
        result.invoices.push(invoice);
    }
    Ok(result)
}

/// Sets the status of an invoice by replacing the stored record.
pub fn mark<B: StorageBackend>(backend: &B, id: &RecordId, status: InvoiceStatus) -> Result<CmdResult> {
    let store = RecordStore::<Invoice, _>::new(backend);
    let lookup = store.find(id)?;
    let Some(mut invoice) = lookup.record else {
        return Err(not_found(backend, id, lookup.recovered));
    };

    let mut result = CmdResult::default();
    if invoice.status == status {
        result.add_message(CmdMessage::info(format!(
            "Invoice {} is already {}.",
            id, status
        )));
        return Ok(result.with_invoices(vec![invoice]));
    }

    invoice.status = status;
    let replacement = store.replace(invoice.clone())?;
    if replacement.previous.is_none() {
        return Err(BillbookError::NotFound(id.clone()));
    }

    result.note_recovery(backend, replacement.recovered);
    result.add_message(CmdMessage::success(format!(
        "Invoice {} marked {}.",
        invoice.id, invoice.status
    )));
    Ok(result.with_invoices(vec![invoice]))
}
