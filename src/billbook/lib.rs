//! # Billbook Architecture
//!
//! Billbook keeps a small book of customers and invoices on local disk. Like any
//! client of it, the CLI is a thin layer on top of a UI-agnostic library.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, print.rs)                           │
//! │  - Parses arguments, confirms deletes, formats output       │
//! │  - The ONLY place that knows about stdout/stdin/exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (string ids, payloads, today's date)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validates forms, drives the stores, returns CmdResult    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore<R, B>: one ordered list per slot             │
//! │  - StorageBackend: FsBackend (production), MemBackend (tests) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Records
//!
//! There are two record types, [`model::Customer`] and [`model::Invoice`], each
//! kept newest-first in its own slot. Records enter a store only through a
//! validated form ([`validation`]) and get a creation-order id on the way in.
//! Existing records change only by whole-record replacement.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Record lists and storage backends
//! - [`model`]: Core data types (`Customer`, `Invoice`, `RecordId`)
//! - [`validation`]: Form checks
//! - [`intake`]: Serialized "new record" payloads
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod intake;
pub mod model;
pub mod store;
pub mod validation;
