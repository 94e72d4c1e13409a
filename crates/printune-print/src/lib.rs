// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printune Print: the reconciliation engine.  Wraps the external driver
// tools, parses and resolves the driver catalog, and brings printers and
// their ports and drivers in line with their declared state.  All
// system access goes through the traits in `printune-bridge`.

pub mod command;
pub mod dism;
pub mod driver_catalog;
pub mod driver_resolver;
pub mod outcome;
pub mod pnputil;
pub mod port;
pub mod preference;
pub mod print_processor;
pub mod printer;
pub mod printer_driver;
pub mod workflow;

pub use command::{CommandOutput, CommandRunner, ProcessRunner};
pub use driver_catalog::parse_catalog;
pub use driver_resolver::DriverResolver;
pub use outcome::{CommitOutcome, DriverDisposition, RemovalReport};
pub use pnputil::{DriverCommandResult, PnpUtil};
pub use port::PortReconciler;
pub use preference::{PreferenceApplier, PrinterPreference};
pub use printer::PrinterReconciler;
pub use workflow::{DriverInstallReport, Printune};
