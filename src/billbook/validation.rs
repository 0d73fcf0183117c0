//! # Form Validation
//!
//! Pure field checks run before a record is accepted into a store. Nothing here
//! touches storage or the clock: callers pass "today" in when a default date is
//! needed.
//!
//! Each check returns a [`FieldError`]; a form collects them per field into
//! [`FieldErrors`]. A form is accepted only when that map is empty.
//!
//! | Check      | Rule                                                   |
//! |------------|--------------------------------------------------------|
//! | `required` | trimmed value is not empty                             |
//! | `email`    | `^[^\s@]+@[^\s@]+\.[^\s@]+$`                           |
//! | `phone`    | empty, or `^\+?[0-9\s-]{10,}$`                         |
//! | `date`     | empty, or `^[0-9]{4}-[0-9]{2}-[0-9]{2}$`, a real day    |
//! | `amount`   | parses as a finite number greater than zero            |

use crate::model::{InvoiceStatus, NewCustomer, NewInvoice};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{10,}$").expect("valid phone regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a single field was rejected. Use [`FieldError::message`] for the
/// sentence shown next to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("is required")]
    MissingField,

    #[error("{0}")]
    InvalidFormat(&'static str),

    #[error("must be a positive number")]
    InvalidAmount,
}

impl FieldError {
    pub fn message(&self, field: &str) -> String {
        match (self, field) {
            (FieldError::MissingField, "customer") => "Please select a customer".to_string(),
            (FieldError::MissingField, "amount") => "Please enter an amount".to_string(),
            (FieldError::MissingField, field) => format!("{} is required", capitalize(field)),
            (FieldError::InvalidFormat(msg), _) => msg.to_string(),
            (FieldError::InvalidAmount, _) => "Please enter a valid amount".to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Per-field validation outcome, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, FieldError)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, err)| err)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.entries.iter().map(|(name, err)| (*name, err))
    }

    /// Records the outcome of a check under `field`. Only the first error per
    /// field is kept.
    pub fn check<T>(&mut self, field: &'static str, outcome: Result<T, FieldError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                if self.get(field).is_none() {
                    self.entries.push((field, err));
                }
                None
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(field, err)| err.message(field))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

pub fn required(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::MissingField);
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), FieldError> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(FieldError::InvalidFormat("Please enter a valid email address"));
    }
    Ok(())
}

/// Optional field: empty input passes.
pub fn phone(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if !value.is_empty() && !PHONE_RE.is_match(value) {
        return Err(FieldError::InvalidFormat("Please enter a valid phone number"));
    }
    Ok(())
}

/// Optional field: empty input yields `None`.
pub fn date(value: &str) -> Result<Option<NaiveDate>, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !DATE_RE.is_match(value) {
        return Err(FieldError::InvalidFormat("Please use YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FieldError::InvalidFormat("Please enter a valid date"))
}

pub fn amount(value: &str) -> Result<f64, FieldError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(FieldError::InvalidAmount),
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Raw customer input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub address: String,
}

impl CustomerForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("name", required(&self.name));
        if errors.check("email", required(&self.email)).is_some() {
            errors.check("email", email(&self.email));
        }
        errors.check("phone", phone(&self.phone));
        errors
    }

    pub fn accept(self) -> Result<NewCustomer, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewCustomer {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: optional(self.company),
            phone: optional(self.phone),
            address: optional(self.address),
        })
    }
}

/// Raw invoice input. `amount` and `date` stay strings until accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceForm {
    pub customer_name: String,
    pub amount: String,
    pub date: String,
    pub notes: String,
}

impl InvoiceForm {
    pub fn validate(&self) -> FieldErrors {
        self.parse().0
    }

    /// Accepts the form as a new pending invoice; a blank date becomes `today`.
    pub fn accept(self, today: NaiveDate) -> Result<NewInvoice, FieldErrors> {
        let (errors, parsed) = self.parse();
        let Some((amount, date)) = parsed else {
            return Err(errors);
        };
        Ok(NewInvoice {
            customer_name: self.customer_name.trim().to_string(),
            amount,
            date: date.unwrap_or(today),
            status: InvoiceStatus::Pending,
            notes: optional(self.notes),
        })
    }

    /// Runs every check once; the parsed amount and date are only returned
    /// when no field failed.
    fn parse(&self) -> (FieldErrors, Option<(f64, Option<NaiveDate>)>) {
        let mut errors = FieldErrors::new();
        errors.check("customer", required(&self.customer_name));
        let parsed_amount = match errors.check("amount", required(&self.amount)) {
            Some(()) => errors.check("amount", amount(&self.amount)),
            None => None,
        };
        let parsed_date = errors.check("date", date(&self.date));

        let parsed = match (parsed_amount, parsed_date) {
            (Some(amount), Some(date)) if errors.is_empty() => Some((amount, date)),
            _ => None,
        };
        (errors, parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(required("   "), Err(FieldError::MissingField));
        assert_eq!(required(""), Err(FieldError::MissingField));
        assert!(required(" x ").is_ok());
    }

    #[test]
    fn email_format() {
        assert!(email("abc").is_err());
        assert!(email("a@b").is_err());
        assert!(email("a b@c.com").is_err());
        assert!(email("a@b.com").is_ok());
    }

    #[test]
    fn phone_is_optional_but_checked() {
        assert!(phone("").is_ok());
        assert!(phone("+1 555-123-4567").is_ok());
        assert!(phone("5551234567").is_ok());
        assert!(phone("12345").is_err());
        assert!(phone("555-CALL-NOW").is_err());
    }

    #[test]
    fn digits_must_be_ascii() {
        assert!(phone("١٢٣٤٥٦٧٨٩٠").is_err());
        assert!(phone("５５５１２３４５６７").is_err());
        assert!(date("２０２４-０３-１５").is_err());
    }

    #[test]
    fn date_format_and_calendar() {
        assert_eq!(date(""), Ok(None));
        assert_eq!(
            date("2024-03-15"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15))
        );
        assert!(matches!(
            date("03/15/2024"),
            Err(FieldError::InvalidFormat(_))
        ));
        assert!(matches!(
            date("2024-13-40"),
            Err(FieldError::InvalidFormat(_))
        ));
        assert!(date("2023-02-29").is_err());
        assert!(date("2024-02-29").is_ok());
    }

    #[test]
    fn amount_must_be_positive_number() {
        assert_eq!(amount("0"), Err(FieldError::InvalidAmount));
        assert_eq!(amount("-5"), Err(FieldError::InvalidAmount));
        assert_eq!(amount("abc"), Err(FieldError::InvalidAmount));
        assert_eq!(amount("NaN"), Err(FieldError::InvalidAmount));
        assert_eq!(amount("inf"), Err(FieldError::InvalidAmount));
        assert_eq!(amount("12.50"), Ok(12.5));
    }

    #[test]
    fn customer_form_collects_errors_per_field() {
        let form = CustomerForm {
            email: "not-an-email".into(),
            phone: "123".into(),
            ..Default::default()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some(&FieldError::MissingField));
        assert!(matches!(
            errors.get("email"),
            Some(FieldError::InvalidFormat(_))
        ));
        assert!(errors.get("phone").is_some());
    }

    #[test]
    fn missing_email_reports_missing_not_format() {
        let form = CustomerForm {
            name: "Jane".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().get("email"), Some(&FieldError::MissingField));
    }

    #[test]
    fn customer_form_accept_normalizes_optionals() {
        let accepted = CustomerForm {
            name: "  Jane ".into(),
            email: "jane@x.com".into(),
            company: "   ".into(),
            phone: String::new(),
            address: "1 Main St".into(),
        }
        .accept()
        .unwrap();

        assert_eq!(accepted.name, "Jane");
        assert_eq!(accepted.company, None);
        assert_eq!(accepted.phone, None);
        assert_eq!(accepted.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn invoice_form_defaults_date_to_today() {
        let accepted = InvoiceForm {
            customer_name: "John Doe".into(),
            amount: "1500".into(),
            ..Default::default()
        }
        .accept(today())
        .unwrap();

        assert_eq!(accepted.date, today());
        assert_eq!(accepted.amount, 1500.0);
        assert_eq!(accepted.status, InvoiceStatus::Pending);
        assert_eq!(accepted.notes, None);
    }

    #[test]
    fn invoice_form_reports_every_bad_field() {
        let errors = InvoiceForm {
            customer_name: String::new(),
            amount: "abc".into(),
            date: "2024-13-40".into(),
            notes: String::new(),
        }
        .accept(today())
        .unwrap_err();

        assert_eq!(errors.get("customer"), Some(&FieldError::MissingField));
        assert_eq!(errors.get("amount"), Some(&FieldError::InvalidAmount));
        assert!(errors.get("date").is_some());
    }

    #[test]
    fn empty_amount_is_missing() {
        let errors = InvoiceForm {
            customer_name: "Jane".into(),
            ..Default::default()
        }
        .validate();
        assert_eq!(errors.get("amount"), Some(&FieldError::MissingField));
    }

    #[test]
    fn display_lists_fields_in_order() {
        let errors = CustomerForm::default().validate();
        assert_eq!(errors.to_string(), "Name is required, Email is required");
    }

    #[test]
    fn messages_read_like_the_form() {
        assert_eq!(
            email("abc").unwrap_err().message("email"),
            "Please enter a valid email address"
        );
        assert_eq!(
            date("03/15/2024").unwrap_err().message("date"),
            "Please use YYYY-MM-DD format"
        );
        assert_eq!(
            date("2023-02-29").unwrap_err().message("date"),
            "Please enter a valid date"
        );
        assert_eq!(
            FieldError::MissingField.message("customer"),
            "Please select a customer"
        );
        assert_eq!(
            FieldError::InvalidAmount.message("amount"),
            "Please enter a valid amount"
        );
    }

    #[test]
    fn validate_and_accept_agree() {
        let forms = [
            InvoiceForm::default(),
            InvoiceForm {
                customer_name: "Jane".into(),
                amount: "0".into(),
                ..Default::default()
            },
            InvoiceForm {
                customer_name: "Jane".into(),
                amount: "10".into(),
                date: "2024-02-30".into(),
                ..Default::default()
            },
            InvoiceForm {
                customer_name: "Jane".into(),
                amount: "10".into(),
                ..Default::default()
            },
        ];
        for form in forms {
            let errors = form.validate();
            match form.accept(today()) {
                Ok(_) => assert!(errors.is_empty()),
                Err(rejected) => assert_eq!(rejected, errors),
            }
        }
    }
}
