// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printune: core types and error definitions shared across all crates.

pub mod config;
pub mod document;
pub mod driver;
pub mod error;
pub mod human_errors;
pub mod port;
pub mod printer;
pub mod types;

pub use config::ToolConfig;
pub use document::{load_printers, printer_from_config};
pub use driver::{DriverRecord, DriverVersion};
pub use error::{PrintuneError, Result};
pub use port::PrinterPort;
pub use printer::Printer;
pub use types::*;
