use billbook::api::{BillbookApi, BillbookPaths, CmdResult, ConfigAction, CustomerEdit};
use billbook::config::BillbookConfig;
use billbook::error::{BillbookError, Result};
use billbook::model::InvoiceStatus;
use billbook::store::fs_backend::FsBackend;
use billbook::validation::{CustomerForm, InvoiceForm};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
mod print;

use args::{Cli, Commands, CustomerCommand, CustomerFields, InvoiceCommand};
use print::*;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        match &e {
            BillbookError::Validation(errors) => print_field_errors(errors),
            other => eprintln!("Error: {}", other),
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("BILLBOOK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("billbook={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

struct AppContext {
    api: BillbookApi<FsBackend>,
    config: BillbookConfig,
}

fn run(cli: Cli) -> Result<()> {
    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Customer(cmd)) => handle_customer(&ctx, cmd),
        Some(Commands::Invoice(cmd)) => handle_invoice(&ctx, cmd),
        Some(Commands::Summary) | None => handle_summary(&ctx),
        Some(Commands::Seed) => handle_seed(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Paths) => handle_paths(&ctx),
    }
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os("BILLBOOK_HOME") {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "billbook", "billbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BillbookError::Store("Could not determine data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    tracing::debug!(data_dir = %data_dir.display(), "opening book");

    let config = BillbookConfig::load(&data_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read config, using defaults");
        BillbookConfig::default()
    });
    let api = BillbookApi::new(
        FsBackend::new(data_dir.clone()),
        BillbookPaths::new(data_dir),
    );
    Ok(AppContext { api, config })
}

fn handle_customer(ctx: &AppContext, cmd: CustomerCommand) -> Result<()> {
    match cmd {
        CustomerCommand::Add { fields, payload } => {
            let result = match payload {
                Some(raw) => ctx.api.add_customer_payload(Some(&raw))?,
                None => ctx.api.add_customer(customer_form(fields))?,
            };
            print_messages(&result.messages);
        }
        CustomerCommand::List { search } => {
            let result = ctx.api.list_customers(search.as_deref())?;
            print_customers(&result.customers);
            print_messages(&result.messages);
        }
        CustomerCommand::View { id } => {
            let result = ctx.api.view_customer(&id)?;
            for customer in &result.customers {
                print_customer(customer);
            }
            print_messages(&result.messages);
        }
        CustomerCommand::Edit { id, fields } => {
            let edit = CustomerEdit {
                name: fields.name,
                email: fields.email,
                company: fields.company,
                phone: fields.phone,
                address: fields.address,
            };
            let result = ctx.api.edit_customer(&id, edit)?;
            print_messages(&result.messages);
        }
        CustomerCommand::Delete { id, yes } => {
            let targets = found_or_empty(ctx.api.view_customer(&id))?;
            if !targets.customers.is_empty() && !yes && ctx.config.confirm_deletes {
                println!("This will permanently delete:");
                print_customers(&targets.customers);
                if !confirm()? {
                    println!("{}", "Operation cancelled.".dimmed());
                    return Ok(());
                }
            }
            let result = ctx.api.delete_customer(&id)?;
            print_messages(&result.messages);
        }
        CustomerCommand::Remove { name, yes } => {
            let targets = ctx.api.list_customers(Some(&name))?;
            if !targets.customers.is_empty() && !yes && ctx.config.confirm_deletes {
                println!("This will permanently delete:");
                print_customers(&targets.customers);
                if !confirm()? {
                    println!("{}", "Operation cancelled.".dimmed());
                    return Ok(());
                }
            }
            let result = ctx.api.remove_customers_by_name(&name)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_invoice(ctx: &AppContext, cmd: InvoiceCommand) -> Result<()> {
    match cmd {
        InvoiceCommand::Add {
            customer,
            amount,
            date,
            notes,
            payload,
        } => {
            let result = match payload {
                Some(raw) => ctx.api.add_invoice_payload(Some(&raw))?,
                None => ctx.api.add_invoice(InvoiceForm {
                    customer_name: customer.unwrap_or_default(),
                    amount: amount.unwrap_or_default(),
                    date: date.unwrap_or_default(),
                    notes: notes.unwrap_or_default(),
                })?,
            };
            print_messages(&result.messages);
        }
        InvoiceCommand::List { status } => {
            let status = status.map(InvoiceStatus::from);
            let result = ctx.api.list_invoices(status.as_ref())?;
            print_invoices(&result.invoices, &ctx.config);
            print_messages(&result.messages);
        }
        InvoiceCommand::View { id } => {
            let result = ctx.api.view_invoice(&id)?;
            for invoice in &result.invoices {
                print_invoice(invoice, &ctx.config);
            }
            print_messages(&result.messages);
        }
        InvoiceCommand::Mark { id, status } => {
            if status.trim().is_empty() {
                return Err(BillbookError::Api("Status cannot be empty".into()));
            }
            let result = ctx.api.mark_invoice(&id, InvoiceStatus::from(status))?;
            print_messages(&result.messages);
        }
        InvoiceCommand::Delete { id, yes } => {
            let targets = found_or_empty(ctx.api.view_invoice(&id))?;
            if !targets.invoices.is_empty() && !yes && ctx.config.confirm_deletes {
                println!("This will permanently delete:");
                print_invoices(&targets.invoices, &ctx.config);
                if !confirm()? {
                    println!("{}", "Operation cancelled.".dimmed());
                    return Ok(());
                }
            }
            let result = ctx.api.delete_invoice(&id)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_summary(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.summary()?;
    if let Some(summary) = &result.summary {
        print_summary(summary, &ctx.config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_seed(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.seed()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_paths(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.store_paths()?;
    for path in &result.paths {
        println!("{}", path.display());
    }
    Ok(())
}

fn customer_form(fields: CustomerFields) -> CustomerForm {
    CustomerForm {
        name: fields.name.unwrap_or_default(),
        email: fields.email.unwrap_or_default(),
        company: fields.company.unwrap_or_default(),
        phone: fields.phone.unwrap_or_default(),
        address: fields.address.unwrap_or_default(),
    }
}

/// A missing record is not an error for delete: there is just nothing to confirm.
fn found_or_empty(lookup: Result<CmdResult>) -> Result<CmdResult> {
    match lookup {
        Ok(result) => Ok(result),
        Err(BillbookError::NotFound(_) | BillbookError::Unreadable { .. }) => {
            Ok(CmdResult::default())
        }
        Err(e) => Err(e),
    }
}

fn confirm() -> Result<bool> {
    print!("[Y] To delete: ");
    io::stdout().flush().map_err(BillbookError::Io)?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(BillbookError::Io)?;
    Ok(input.trim() == "Y")
}
