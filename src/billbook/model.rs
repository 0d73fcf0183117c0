use crate::error::{BillbookError, Result};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// The two independent persisted slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    Customers,
    Invoices,
}

impl Namespace {
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Customers => "customers",
            Namespace::Invoices => "invoices",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Creation-order token identifying a record.
///
/// Generated ids are millisecond timestamps. Within one process they are
/// strictly increasing: if the clock has not moved past the last issued id
/// the next one is bumped by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Result<Self> {
        Self::generate_above(0)
    }

    /// Generates an id greater than `floor` and greater than any id issued
    /// earlier in this process. Fails when no such id fits in an `i64`.
    pub fn generate_above(floor: i64) -> Result<Self> {
        let now = Utc::now().timestamp_millis();
        let next = |last: i64| last.max(floor).checked_add(1).map(|above| now.max(above));
        // fetch_update hands back the previous value; recompute what was stored.
        LAST_ISSUED
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, next)
            .ok()
            .and_then(next)
            .map(|id| Self(id.to_string()))
            .ok_or_else(|| BillbookError::Store(format!("no record id left above {}", floor)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of a generated id. Hand-written ids yield `None`.
    pub fn as_millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A record held in one of the persisted lists.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const NAMESPACE: Namespace;

    fn id(&self) -> &RecordId;

    /// The field matched by delete-by-name.
    fn name(&self) -> &str;
}

/// A validated value that becomes a record once it is given an id.
pub trait IntoRecord {
    type Record: Record;

    fn into_record(self, id: RecordId) -> Self::Record;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Record for Customer {
    const NAMESPACE: Namespace = Namespace::Customers;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A customer that passed form validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl IntoRecord for NewCustomer {
    type Record = Customer;

    fn into_record(self, id: RecordId) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            company: self.company,
            phone: self.phone,
            address: self.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Other(s) => s,
        }
    }
}

impl From<String> for InvoiceStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => InvoiceStatus::Pending,
            "paid" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Other(s.trim().to_string()),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(InvoiceStatus::from(s.to_string()))
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: RecordId,
    pub customer_name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for Invoice {
    const NAMESPACE: Namespace = Namespace::Invoices;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.customer_name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

impl IntoRecord for NewInvoice {
    type Record = Invoice;

    fn into_record(self, id: RecordId) -> Invoice {
        Invoice {
            id,
            customer_name: self.customer_name,
            amount: self.amount,
            date: self.date,
            status: self.status,
            notes: self.notes,
        }
    }
}
