//! "New record" payloads handed over by an outer layer as serialized JSON.
//!
//! The payload is untrusted and may be absent. It is only turned into a form
//! here; the form still goes through validation before anything is stored.

use crate::error::{BillbookError, Result};
use crate::validation::{CustomerForm, InvoiceForm};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoicePayload {
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default, alias = "date")]
    due_date: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn parse<'de, T: Deserialize<'de>>(raw: Option<&'de str>, what: &str) -> Result<Option<T>> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };
    serde_json::from_str(raw).map(Some).map_err(|e| {
        tracing::warn!(error = %e, "discarding malformed {} payload", what);
        BillbookError::Payload(format!("malformed {} payload: {}", what, e))
    })
}

pub fn customer_payload(raw: Option<&str>) -> Result<Option<CustomerForm>> {
    Ok(parse::<CustomerPayload>(raw, "customer")?.map(|p| CustomerForm {
        name: p.name,
        email: p.email,
        company: p.company.unwrap_or_default(),
        phone: p.phone.unwrap_or_default(),
        address: p.address.unwrap_or_default(),
    }))
}

pub fn invoice_payload(raw: Option<&str>) -> Result<Option<InvoiceForm>> {
    Ok(parse::<InvoicePayload>(raw, "invoice")?.map(|p| InvoiceForm {
        customer_name: p.customer_name,
        amount: match p.amount {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s,
            _ => String::new(),
        },
        date: p.due_date.unwrap_or_default(),
        notes: p.notes.unwrap_or_default(),
    }))
}
