//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for all billbook operations, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (string ids → [`RecordId`], raw payloads → forms,
//!   "today" from the local clock)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no I/O of its own and no formatting.
//!
//! `BillbookApi<B: StorageBackend>` is generic over the storage backend:
//! `FsBackend` in production, `MemBackend` in tests.

use crate::commands;
use crate::error::Result;
use crate::intake;
use crate::model::{InvoiceStatus, RecordId};
use crate::store::backend::StorageBackend;
use crate::validation::{CustomerForm, InvoiceForm};
use chrono::{Local, NaiveDate};

pub struct BillbookApi<B: StorageBackend> {
    backend: B,
    paths: commands::paths::BillbookPaths,
}

impl<B: StorageBackend> BillbookApi<B> {
    pub fn new(backend: B, paths: commands::paths::BillbookPaths) -> Self {
        Self { backend, paths }
    }

    pub fn add_customer(&self, form: CustomerForm) -> Result<CmdResult> {
        commands::customers::add(&self.backend, form)
    }

    /// Adds the customer described by a serialized payload, if there is one.
    pub fn add_customer_payload(&self, raw: Option<&str>) -> Result<CmdResult> {
        match intake::customer_payload(raw)? {
            Some(form) => commands::customers::add(&self.backend, form),
            None => Ok(nothing_to_add()),
        }
    }

    pub fn list_customers(&self, search: Option<&str>) -> Result<CmdResult> {
        commands::customers::list(&self.backend, search)
    }

    pub fn view_customer(&self, id: &str) -> Result<CmdResult> {
        commands::customers::view(&self.backend, &RecordId::from(id))
    }

    pub fn edit_customer(&self, id: &str, edit: CustomerEdit) -> Result<CmdResult> {
        commands::customers::edit(&self.backend, &RecordId::from(id), edit)
    }

    pub fn delete_customer(&self, id: &str) -> Result<CmdResult> {
        commands::customers::delete(&self.backend, &RecordId::from(id))
    }

    pub fn remove_customers_by_name(&self, needle: &str) -> Result<CmdResult> {
        commands::customers::remove_by_name(&self.backend, needle)
    }

    pub fn add_invoice(&self, form: InvoiceForm) -> Result<CmdResult> {
        commands::invoices::add(&self.backend, form, today())
    }

    pub fn add_invoice_payload(&self, raw: Option<&str>) -> Result<CmdResult> {
        match intake::invoice_payload(raw)? {
            Some(form) => commands::invoices::add(&self.backend, form, today()),
            None => Ok(nothing_to_add()),
        }
    }

    pub fn list_invoices(&self, status: Option<&InvoiceStatus>) -> Result<CmdResult> {
        commands::invoices::list(&self.backend, status)
    }

    pub fn view_invoice(&self, id: &str) -> Result<CmdResult> {
        commands::invoices::view(&self.backend, &RecordId::from(id))
    }

    pub fn mark_invoice(&self, id: &str, status: InvoiceStatus) -> Result<CmdResult> {
        commands::invoices::mark(&self.backend, &RecordId::from(id), status)
    }

    pub fn delete_invoice(&self, id: &str) -> Result<CmdResult> {
        commands::invoices::delete(&self.backend, &RecordId::from(id))
    }

    pub fn summary(&self) -> Result<CmdResult> {
        commands::summary::run(&self.backend)
    }

    pub fn seed(&self) -> Result<CmdResult> {
        commands::seed::run(&self.backend)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn store_paths(&self) -> Result<CmdResult> {
        commands::paths::run(&self.backend, &self.paths)
    }

    pub fn paths(&self) -> &commands::paths::BillbookPaths {
        &self.paths
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn nothing_to_add() -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info("No payload given, nothing to add."));
    result
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::customers::CustomerEdit;
pub use crate::commands::paths::BillbookPaths;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, StatusTotal, Summary};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use std::path::PathBuf;

    fn api() -> BillbookApi<MemBackend> {
        BillbookApi::new(
            MemBackend::new(),
            BillbookPaths::new(PathBuf::from("/unused")),
        )
    }

    #[test]
    fn customer_payload_dispatches_to_add() {
        let api = api();
        let result = api
            .add_customer_payload(Some(r#"{"name":"Jane","email":"jane@x.com"}"#))
            .unwrap();
        assert_eq!(result.customers.len(), 1);
        assert_eq!(api.list_customers(None).unwrap().customers.len(), 1);
    }

    #[test]
    fn absent_payload_adds_nothing() {
        let api = api();
        let result = api.add_invoice_payload(None).unwrap();
        assert!(result.invoices.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Info);
        assert!(api.list_invoices(None).unwrap().invoices.is_empty());
    }

    #[test]
    fn invoice_payload_defaults_to_today() {
        let api = api();
        let result = api
            .add_invoice_payload(Some(r#"{"customerName":"John Doe","amount":"99.90"}"#))
            .unwrap();
        assert_eq!(result.invoices[0].date, today());
    }

    #[test]
    fn string_ids_are_resolved() {
        let api = api();
        let id = api
            .add_customer(CustomerForm {
                name: "Jane".into(),
                email: "jane@x.com".into(),
                ..Default::default()
            })
            .unwrap()
            .customers[0]
            .id
            .to_string();

        assert_eq!(api.view_customer(&id).unwrap().customers.len(), 1);
        assert_eq!(api.delete_customer(&id).unwrap().customers.len(), 1);
        assert!(api.view_customer(&id).is_err());
    }
}
