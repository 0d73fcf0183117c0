use crate::config::BillbookConfig;
use crate::error::BillbookError;
use crate::model::{Customer, Invoice, RecordId};
use crate::store::Recovered;
use crate::store::backend::StorageBackend;
use std::path::PathBuf;

pub mod config;
pub mod customers;
pub mod invoices;
pub mod paths;
pub mod seed;
pub mod summary;

pub use summary::{StatusTotal, Summary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub summary: Option<Summary>,
    pub config: Option<BillbookConfig>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_customers(mut self, customers: Vec<Customer>) -> Self {
        self.customers = customers;
        self
    }

    pub fn with_invoices(mut self, invoices: Vec<Invoice>) -> Self {
        self.invoices = invoices;
        self
    }

    pub fn with_summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_config(mut self, config: BillbookConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    /// True when any message is a warning or worse.
    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }

    /// Surfaces a corrupt-slot recovery to the user.
    pub(crate) fn note_recovery<B: StorageBackend>(
        &mut self,
        backend: &B,
        recovered: Option<Recovered>,
    ) {
        if let Some(r) = recovered {
            self.add_message(CmdMessage::warning(recovery_notice(backend, &r)));
        }
    }
}

fn recovery_notice<B: StorageBackend>(backend: &B, r: &Recovered) -> String {
    let kept = match &r.backup_slot {
        Some(slot) => format!(
            "the unreadable data was saved to {}",
            backend.slot_path(slot).display()
        ),
        None => "the unreadable data could not be backed up and stays in place \
                 until the next change"
            .to_string(),
    };
    format!(
        "Stored {} could not be read ({}). Continuing with an empty list; {}",
        r.namespace, r.reason, kept
    )
}

/// The error for a lookup that found nothing, naming the corrupt slot when
/// that is why.
pub(crate) fn not_found<B: StorageBackend>(
    backend: &B,
    id: &RecordId,
    recovered: Option<Recovered>,
) -> BillbookError {
    match recovered {
        Some(r) => BillbookError::Unreadable {
            id: id.clone(),
            notice: recovery_notice(backend, &r),
        },
        None => BillbookError::NotFound(id.clone()),
    }
}
