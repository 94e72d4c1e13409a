// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub catalog for hosts without a Windows print subsystem.
//
// Every trait method returns `PlatformUnavailable`. The real implementation
// lives in the `powershell` module.

use printune_core::error::{PrintuneError, Result};
use printune_core::types::{PortRecord, PrinterDriverRecord, PrinterRecord};

use crate::traits::*;

/// No-op catalog returned on non-Windows platforms.
pub struct StubCatalog;

impl SystemCatalog for StubCatalog {
    fn platform_name(&self) -> &str {
        "Unsupported (stub)"
    }
}

impl PrinterCatalog for StubCatalog {
    fn find_printer(&self, _name: &str) -> Result<Option<PrinterRecord>> {
        tracing::warn!("PrinterCatalog::find_printer called on stub catalog");
        Err(PrintuneError::PlatformUnavailable)
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        tracing::warn!("PrinterCatalog::list_printers called on stub catalog");
        Err(PrintuneError::PlatformUnavailable)
    }

    fn add_printer_by_existing_port(&self, _record: &PrinterRecord) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }

    fn put_printer(&self, _record: &PrinterRecord) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }

    fn delete_printer(&self, _name: &str) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }
}

impl PortCatalog for StubCatalog {
    fn find_port(&self, _name: &str) -> Result<Option<PortRecord>> {
        tracing::warn!("PortCatalog::find_port called on stub catalog");
        Err(PrintuneError::PlatformUnavailable)
    }

    fn create_port(&self, _record: &PortRecord) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }

    fn put_port(&self, _record: &PortRecord) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }

    fn delete_port(&self, _name: &str) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }
}

impl DriverCatalog for StubCatalog {
    fn find_printer_driver(&self, _name: &str) -> Result<Option<PrinterDriverRecord>> {
        tracing::warn!("DriverCatalog::find_printer_driver called on stub catalog");
        Err(PrintuneError::PlatformUnavailable)
    }

    fn list_printer_drivers(&self) -> Result<Vec<PrinterDriverRecord>> {
        Err(PrintuneError::PlatformUnavailable)
    }

    fn add_printer_driver(&self, _name: &str) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }

    fn delete_printer_driver(&self, _name: &str) -> Result<()> {
        Err(PrintuneError::PlatformUnavailable)
    }
}

impl PrintProcessorCatalog for StubCatalog {
    fn list_print_processors(&self) -> Result<Vec<String>> {
        Err(PrintuneError::PlatformUnavailable)
    }
}

impl HostEnvironment for StubCatalog {
    fn is_elevated(&self) -> Result<bool> {
        tracing::warn!("HostEnvironment::is_elevated called on stub catalog");
        Err(PrintuneError::PlatformUnavailable)
    }
}
