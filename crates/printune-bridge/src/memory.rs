// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory system catalog for tests and dry runs.
//
// Behaves like a small print subsystem: creating a queue needs its port to
// exist, enabling a driver needs a package that provides it, and every write
// is counted so callers can assert how many changes a pass made.

use std::sync::{Arc, Mutex, MutexGuard};

use printune_core::error::{PrintuneError, Result};
use printune_core::types::{PortRecord, PrinterDriverRecord, PrinterRecord};

use crate::traits::*;

/// Number of writes issued against a [`MemoryCatalog`], per object kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub printer_creates: usize,
    pub printer_updates: usize,
    pub printer_deletes: usize,
    pub port_creates: usize,
    pub port_updates: usize,
    pub port_deletes: usize,
    pub driver_adds: usize,
    pub driver_deletes: usize,
}

impl WriteCounts {
    pub fn total(&self) -> usize {
        self.printer_creates
            + self.printer_updates
            + self.printer_deletes
            + self.port_creates
            + self.port_updates
            + self.port_deletes
            + self.driver_adds
            + self.driver_deletes
    }
}

#[derive(Debug, Default)]
struct State {
    printers: Vec<PrinterRecord>,
    ports: Vec<PortRecord>,
    drivers: Vec<PrinterDriverRecord>,
    /// Driver names that `add_printer_driver` can enable.
    packages: Vec<PrinterDriverRecord>,
    processors: Vec<String>,
    elevated: bool,
    writes: WriteCounts,
    refuse_driver_delete: bool,
    ignore_printer_delete: bool,
}

/// A recording, in-memory [`SystemCatalog`].
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<State>>,
}

impl MemoryCatalog {
    /// An empty, elevated host with the `winprint` print processor.
    pub fn new() -> Self {
        let catalog = Self::default();
        {
            let mut state = catalog.state();
            state.elevated = true;
            state.processors.push("winprint".into());
        }
        catalog
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_printer(self, record: PrinterRecord) -> Self {
        self.state().printers.push(record);
        self
    }

    pub fn with_port(self, record: PortRecord) -> Self {
        self.state().ports.push(record);
        self
    }

    /// An already-enabled printer driver.
    pub fn with_printer_driver(self, record: PrinterDriverRecord) -> Self {
        self.state().drivers.push(record);
        self
    }

    /// A driver package in the store that can be enabled later.
    pub fn with_driver_package(self, record: PrinterDriverRecord) -> Self {
        self.state().packages.push(record);
        self
    }

    pub fn with_print_processor(self, name: impl Into<String>) -> Self {
        self.state().processors.push(name.into());
        self
    }

    pub fn elevated(self, elevated: bool) -> Self {
        self.state().elevated = elevated;
        self
    }

    /// Make every driver delete fail, as the host does while a driver is
    /// still loaded by the spooler.
    pub fn refusing_driver_delete(self) -> Self {
        self.state().refuse_driver_delete = true;
        self
    }

    /// Accept printer deletes without removing anything.
    pub fn ignoring_printer_delete(self) -> Self {
        self.state().ignore_printer_delete = true;
        self
    }

    pub fn writes(&self) -> WriteCounts {
        self.state().writes
    }

    pub fn printers(&self) -> Vec<PrinterRecord> {
        self.state().printers.clone()
    }

    pub fn port(&self, name: &str) -> Option<PortRecord> {
        self.state().ports.iter().find(|p| p.name == name).cloned()
    }

    pub fn has_printer_driver(&self, name: &str) -> bool {
        self.state().drivers.iter().any(|d| d.name == name)
    }
}

impl SystemCatalog for MemoryCatalog {
    fn platform_name(&self) -> &str {
        "In-memory"
    }
}

impl PrinterCatalog for MemoryCatalog {
    fn find_printer(&self, name: &str) -> Result<Option<PrinterRecord>> {
        Ok(self.state().printers.iter().find(|p| p.name == name).cloned())
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        Ok(self.printers())
    }

    fn add_printer_by_existing_port(&self, record: &PrinterRecord) -> Result<()> {
        let mut state = self.state();
        let port_name = record.port_name.as_deref().unwrap_or_default();
        if !state.ports.iter().any(|p| p.name == port_name) {
            return Err(PrintuneError::Catalog(format!("port '{port_name}' does not exist")));
        }
        if state.printers.iter().any(|p| p.name == record.name) {
            return Err(PrintuneError::Catalog(format!("printer '{}' already exists", record.name)));
        }
        state.printers.push(record.clone());
        state.writes.printer_creates += 1;
        Ok(())
    }

    fn put_printer(&self, record: &PrinterRecord) -> Result<()> {
        let mut state = self.state();
        let existing = state
            .printers
            .iter_mut()
            .find(|p| p.name == record.name)
            .ok_or_else(|| PrintuneError::Catalog(format!("printer '{}' does not exist", record.name)))?;
        *existing = record.clone();
        state.writes.printer_updates += 1;
        Ok(())
    }

    fn delete_printer(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        if !state.ignore_printer_delete {
            let before = state.printers.len();
            state.printers.retain(|p| p.name != name);
            if state.printers.len() == before {
                return Err(PrintuneError::Catalog(format!("printer '{name}' does not exist")));
            }
        }
        state.writes.printer_deletes += 1;
        Ok(())
    }
}

impl PortCatalog for MemoryCatalog {
    fn find_port(&self, name: &str) -> Result<Option<PortRecord>> {
        Ok(self.port(name))
    }

    fn create_port(&self, record: &PortRecord) -> Result<()> {
        let mut state = self.state();
        if state.ports.iter().any(|p| p.name == record.name) {
            return Err(PrintuneError::Catalog(format!("port '{}' already exists", record.name)));
        }
        state.ports.push(record.clone());
        state.writes.port_creates += 1;
        Ok(())
    }

    fn put_port(&self, record: &PortRecord) -> Result<()> {
        let mut state = self.state();
        let existing = state
            .ports
            .iter_mut()
            .find(|p| p.name == record.name)
            .ok_or_else(|| PrintuneError::Catalog(format!("port '{}' does not exist", record.name)))?;
        *existing = record.clone();
        state.writes.port_updates += 1;
        Ok(())
    }

    fn delete_port(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        let before = state.ports.len();
        state.ports.retain(|p| p.name != name);
        if state.ports.len() == before {
            return Err(PrintuneError::Catalog(format!("port '{name}' does not exist")));
        }
        state.writes.port_deletes += 1;
        Ok(())
    }
}

impl DriverCatalog for MemoryCatalog {
    fn find_printer_driver(&self, name: &str) -> Result<Option<PrinterDriverRecord>> {
        Ok(self.state().drivers.iter().find(|d| d.name == name).cloned())
    }

    fn list_printer_drivers(&self) -> Result<Vec<PrinterDriverRecord>> {
        Ok(self.state().drivers.clone())
    }

    fn add_printer_driver(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        if state.drivers.iter().any(|d| d.name == name) {
            return Ok(());
        }
        let package = state
            .packages
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| PrintuneError::Catalog(format!("no driver package provides '{name}'")))?;
        state.drivers.push(package);
        state.writes.driver_adds += 1;
        Ok(())
    }

    fn delete_printer_driver(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        if state.refuse_driver_delete {
            return Err(PrintuneError::Catalog(format!("printer driver '{name}' is in use")));
        }
        let before = state.drivers.len();
        state.drivers.retain(|d| d.name != name);
        if state.drivers.len() == before {
            return Err(PrintuneError::Catalog(format!("printer driver '{name}' does not exist")));
        }
        state.writes.driver_deletes += 1;
        Ok(())
    }
}

impl PrintProcessorCatalog for MemoryCatalog {
    fn list_print_processors(&self) -> Result<Vec<String>> {
        Ok(self.state().processors.clone())
    }
}

impl HostEnvironment for MemoryCatalog {
    fn is_elevated(&self) -> Result<bool> {
        Ok(self.state().elevated)
    }
}
