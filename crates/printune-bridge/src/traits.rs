// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host's print subsystem.
//
// Every call is synchronous and returns a plain data snapshot. "Not found"
// is `Ok(None)`; only an infrastructure failure is an `Err`.

use std::path::PathBuf;

use printune_core::error::Result;
use printune_core::types::{PortRecord, PrinterDriverRecord, PrinterRecord};

/// Unified catalog that groups everything the reconcilers need from the host.
///
/// Platforms without a print subsystem return
/// `PrintuneError::PlatformUnavailable` from the stub implementation.
pub trait SystemCatalog:
    PrinterCatalog + PortCatalog + DriverCatalog + PrintProcessorCatalog + HostEnvironment
{
    /// Human-readable platform name (e.g. "Windows (PowerShell)").
    fn platform_name(&self) -> &str;
}

/// Print queues.
pub trait PrinterCatalog {
    fn find_printer(&self, name: &str) -> Result<Option<PrinterRecord>>;

    fn list_printers(&self) -> Result<Vec<PrinterRecord>>;

    /// Create a queue bound to the already-existing port named in
    /// `record.port_name`, in one operation.
    fn add_printer_by_existing_port(&self, record: &PrinterRecord) -> Result<()>;

    /// Overwrite the stored fields of an existing queue.
    fn put_printer(&self, record: &PrinterRecord) -> Result<()>;

    fn delete_printer(&self, name: &str) -> Result<()>;
}

/// TCP/IP printer ports.
pub trait PortCatalog {
    fn find_port(&self, name: &str) -> Result<Option<PortRecord>>;

    fn create_port(&self, record: &PortRecord) -> Result<()>;

    /// Persist `record` over the existing port of the same name.
    fn put_port(&self, record: &PortRecord) -> Result<()>;

    fn delete_port(&self, name: &str) -> Result<()>;
}

/// Printer drivers enabled in the print subsystem (as opposed to packages
/// sitting in the driver store).
pub trait DriverCatalog {
    fn find_printer_driver(&self, name: &str) -> Result<Option<PrinterDriverRecord>>;

    fn list_printer_drivers(&self) -> Result<Vec<PrinterDriverRecord>>;

    /// Enable a driver from a package already in the driver store.
    fn add_printer_driver(&self, name: &str) -> Result<()>;

    fn delete_printer_driver(&self, name: &str) -> Result<()>;
}

/// Installed print processors.
pub trait PrintProcessorCatalog {
    fn list_print_processors(&self) -> Result<Vec<String>>;
}

/// Facts about the current process and host.
pub trait HostEnvironment {
    /// Whether the process holds administrative privileges.
    fn is_elevated(&self) -> Result<bool>;
}

/// Reads configuration content from a path or URI.
pub trait ConfigSource {
    /// Return the full text at `location`.
    fn read_text(&self, location: &str) -> Result<String>;

    /// Return a local filesystem path holding the content at `location`,
    /// copying it locally first if needed.
    fn materialize(&self, location: &str) -> Result<PathBuf>;

    /// Whether `location` refers to content that is not on the local filesystem.
    fn is_remote(&self, location: &str) -> bool;
}
