use crate::commands::{CmdMessage, CmdResult, not_found};
use crate::error::{BillbookError, Result};
use crate::model::{Customer, IntoRecord, RecordId};
use crate::store::backend::StorageBackend;
use crate::store::{RecordStore, name_matches};
use crate::validation::CustomerForm;

/// Fields to change on an existing customer. `None` keeps the stored value;
/// `Some("")` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct CustomerEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub fn add<B: StorageBackend>(backend: &B, form: CustomerForm) -> Result<CmdResult> {
    let new = form.accept().map_err(BillbookError::Validation)?;
    let appended = RecordStore::new(backend).append(new)?;

    let mut result = CmdResult::default();
    result.note_recovery(backend, appended.recovered);
    result.add_message(CmdMessage::success(format!(
        "Customer added ({}): {}",
        appended.record.id, appended.record.name
    )));
    result.customers.push(appended.record);
    Ok(result)
}

pub fn list<B: StorageBackend>(backend: &B, search: Option<&str>) -> Result<CmdResult> {
    let loaded = RecordStore::<Customer, _>::new(backend).load()?;
    let customers = match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => loaded
            .records
            .into_iter()
            .filter(|c| name_matches(c, term))
            .collect(),
        None => loaded.records,
    };

    let mut result = CmdResult::default();
    result.note_recovery(backend, loaded.recovered);
    Ok(result.with_customers(customers))
}

pub fn view<B: StorageBackend>(backend: &B, id: &RecordId) -> Result<CmdResult> {
    let lookup = RecordStore::<Customer, _>::new(backend).find(id)?;
    let Some(customer) = lookup.record else {
        return Err(not_found(backend, id, lookup.recovered));
    };
    Ok(CmdResult::default().with_customers(vec![customer]))
}

pub fn delete<B: StorageBackend>(backend: &B, id: &RecordId) -> Result<CmdResult> {
    let removal = RecordStore::<Customer, _>::new(backend).delete_by_id(id)?;

    let mut result = CmdResult::default();
    result.note_recovery(backend, removal.recovered);
    if removal.removed.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No customer with id {}, nothing deleted.",
            id
        )));
    }
    for customer in removal.removed {
        result.add_message(CmdMessage::success(format!(
            "Customer deleted ({}): {}",
            customer.id, customer.name
        )));
        result.customers.push(customer);
    }
    Ok(result)
}

/// Deletes every customer whose name contains `needle` (case-insensitive).
pub fn remove_by_name<B: StorageBackend>(backend: &B, needle: &str) -> Result<CmdResult> {
    let removal = RecordStore::<Customer, _>::new(backend).delete_by_name(needle)?;

    let mut result = CmdResult::default();
    result.note_recovery(backend, removal.recovered);
    if removal.removed.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No customers matching '{}' found.",
            needle.trim()
        )));
        return Ok(result);
    }

    let count = removal.removed.len();
    result.add_message(CmdMessage::success(format!(
        "Deleted {} customer{} matching '{}'.",
        count,
        if count == 1 { "" } else { "s" },
        needle.trim()
    )));
    Ok(result.with_customers(removal.removed))
}

/// Rewrites a customer as a whole: the merged fields are validated again and the
/// stored record is replaced, keeping its id.
pub fn edit<B: StorageBackend>(backend: &B, id: &RecordId, edit: CustomerEdit) -> Result<CmdResult> {
    let store = RecordStore::<Customer, _>::new(backend);
    let lookup = store.find(id)?;
    let Some(current) = lookup.record else {
        return Err(not_found(backend, id, lookup.recovered));
    };

    let form = CustomerForm {
        name: edit.name.unwrap_or(current.name),
        email: edit.email.unwrap_or(current.email),
        company: edit.company.or(current.company).unwrap_or_default(),
        phone: edit.phone.or(current.phone).unwrap_or_default(),
        address: edit.address.or(current.address).unwrap_or_default(),
    };
    let updated = form
        .accept()
        .map_err(BillbookError::Validation)?
        .into_record(current.id);

    let replacement = store.replace(updated.clone())?;
    if replacement.previous.is_none() {
        return Err(BillbookError::NotFound(id.clone()));
    }

    let mut result = CmdResult::default();
    result.note_recovery(backend, replacement.recovered);
    result.add_message(CmdMessage::success(format!(
        "Customer updated ({}): {}",
        updated.id, updated.name
    )));
    Ok(result.with_customers(vec![updated]))
}
