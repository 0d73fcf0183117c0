use billbook::api::{CmdMessage, MessageLevel, Summary};
use billbook::config::BillbookConfig;
use billbook::model::{Customer, Invoice, InvoiceStatus};
use billbook::validation::FieldErrors;
use colored::{ColoredString, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 15;
const AMOUNT_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 9;

pub(crate) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(crate) fn print_field_errors(errors: &FieldErrors) {
    eprintln!("{}", "Please fix the following:".red());
    for (field, err) in errors.iter() {
        eprintln!("  {} {}", format!("{}:", field).bold(), err.message(field));
    }
}

pub(crate) fn print_customers(customers: &[Customer]) {
    if customers.is_empty() {
        println!("No customers found.");
        return;
    }

    for customer in customers {
        let detail = match &customer.company {
            Some(company) => format!("{}  {}", company, customer.email),
            None => customer.email.clone(),
        };
        let id_col = pad_to_width(customer.id.as_str(), ID_WIDTH);
        let available = LINE_WIDTH.saturating_sub(ID_WIDTH + 2);
        let name = truncate_to_width(&customer.name, available / 2);
        let detail = truncate_to_width(&detail, available.saturating_sub(name.width() + 2));

        println!(
            "{}  {}  {}",
            id_col.dimmed(),
            name.bold(),
            detail.dimmed()
        );
    }
}

pub(crate) fn print_customer(customer: &Customer) {
    println!("{} {}", customer.id.to_string().yellow(), customer.name.bold());
    println!("--------------------------------");
    print_field("Email", Some(&customer.email));
    print_field("Company", customer.company.as_ref());
    print_field("Phone", customer.phone.as_ref());
    print_field("Address", customer.address.as_ref());
}

pub(crate) fn print_invoices(invoices: &[Invoice], config: &BillbookConfig) {
    if invoices.is_empty() {
        println!("No invoices found.");
        return;
    }

    for invoice in invoices {
        let id_col = pad_to_width(invoice.id.as_str(), ID_WIDTH);
        let amount = format!(
            "{:>width$}",
            config.format_amount(invoice.amount),
            width = AMOUNT_WIDTH
        );
        let status = status_colored(&pad_to_width(invoice.status.as_str(), STATUS_WIDTH), &invoice.status);
        let fixed = ID_WIDTH + AMOUNT_WIDTH + STATUS_WIDTH + 10 + 8;
        let name = truncate_to_width(&invoice.customer_name, LINE_WIDTH.saturating_sub(fixed));
        let padding = LINE_WIDTH.saturating_sub(fixed + name.width());

        println!(
            "{}  {}{}  {}  {}  {}",
            id_col.dimmed(),
            name,
            " ".repeat(padding),
            invoice.date.to_string().dimmed(),
            amount,
            status
        );
    }
}

pub(crate) fn print_invoice(invoice: &Invoice, config: &BillbookConfig) {
    println!(
        "{} {}",
        invoice.id.to_string().yellow(),
        invoice.customer_name.bold()
    );
    println!("--------------------------------");
    print_field("Amount", Some(&config.format_amount(invoice.amount)));
    print_field("Date", Some(&invoice.date.to_string()));
    println!(
        "{:>9} {}",
        "Status:".dimmed(),
        status_colored(invoice.status.as_str(), &invoice.status)
    );
    print_field("Notes", invoice.notes.as_ref());
}

pub(crate) fn print_summary(summary: &Summary, config: &BillbookConfig) {
    println!("{}", "Overview".bold());
    println!("--------------------------------");
    println!("{:<12}{:>6}", "Customers", summary.customers);
    println!("{:<12}{:>6}", "Invoices", summary.invoices);
    println!();
    let rows = [
        ("Pending", &summary.pending, InvoiceStatus::Pending),
        ("Paid", &summary.paid, InvoiceStatus::Paid),
        ("Other", &summary.other, InvoiceStatus::Other(String::new())),
    ];
    for (label, total, status) in rows {
        println!(
            "{}{:>6}  {:>width$}",
            status_colored(&format!("{:<12}", label), &status),
            total.count,
            config.format_amount(total.amount),
            width = AMOUNT_WIDTH
        );
    }
    println!(
        "{:<12}{:>6}  {:>width$}",
        "Billed",
        summary.invoices,
        config.format_amount(summary.total_billed()),
        width = AMOUNT_WIDTH
    );
}

pub(crate) fn print_config(config: &BillbookConfig) {
    println!("currency = {}", config.currency);
    println!("confirm-deletes = {}", config.confirm_deletes);
}

fn print_field<S: AsRef<str>>(label: &str, value: Option<S>) {
    if let Some(value) = value {
        println!("{:>9} {}", format!("{}:", label).dimmed(), value.as_ref());
    }
}

fn status_colored(text: &str, status: &InvoiceStatus) -> ColoredString {
    match status {
        InvoiceStatus::Pending => text.yellow(),
        InvoiceStatus::Paid => text.green(),
        InvoiceStatus::Other(_) => text.normal(),
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
