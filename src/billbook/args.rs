use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "billbook", version)]
#[command(about = "Keep customers and invoices in a local book", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the book (defaults to $BILLBOOK_HOME or the OS data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage customers
    #[command(alias = "c", subcommand)]
    Customer(CustomerCommand),

    /// Manage invoices
    #[command(alias = "i", subcommand)]
    Invoice(InvoiceCommand),

    /// Show totals over the whole book
    #[command(alias = "s")]
    Summary,

    /// Fill an empty book with demo customers and invoices
    Seed,

    /// Get or set configuration
    Config {
        /// Configuration key (currency, confirm-deletes)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print where the book is stored
    Paths,
}

#[derive(Args, Debug, Default)]
pub struct CustomerFields {
    /// Customer name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Add a customer
    #[command(alias = "n")]
    Add {
        #[command(flatten)]
        fields: CustomerFields,

        /// New customer as JSON (replaces the field flags)
        #[arg(long, conflicts_with_all = ["name", "email", "company", "phone", "address"])]
        payload: Option<String>,
    },

    /// List customers
    #[command(alias = "ls")]
    List {
        /// Only customers whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one customer
    #[command(alias = "v")]
    View { id: String },

    /// Rewrite a customer; unspecified fields keep their value
    #[command(alias = "e")]
    Edit {
        id: String,

        #[command(flatten)]
        fields: CustomerFields,
    },

    /// Delete a customer by id
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every customer whose name contains the given text
    Remove {
        /// Text to look for in customer names (case-insensitive)
        #[arg(long)]
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum InvoiceCommand {
    /// Add a pending invoice
    #[command(alias = "n")]
    Add {
        /// Customer the invoice is for
        #[arg(long)]
        customer: Option<String>,

        /// Amount, a positive number
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,

        /// Due date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// New invoice as JSON (replaces the field flags)
        #[arg(long, conflicts_with_all = ["customer", "amount", "date", "notes"])]
        payload: Option<String>,
    },

    /// List invoices
    #[command(alias = "ls")]
    List {
        /// Only invoices with this status (pending, paid, ...)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one invoice
    #[command(alias = "v")]
    View { id: String },

    /// Set the status of an invoice
    Mark {
        id: String,

        /// New status (pending, paid, or any other word)
        status: String,
    },

    /// Delete an invoice by id
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
