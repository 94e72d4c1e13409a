// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reconcile a desired printer (and the port it owns) against the host.
//
// Commit creates the queue bound to its port, or updates the queue's fields
// and its port. Remove deletes the queue, then its port unless another queue
// still prints to it, then disables the driver unless another queue still
// uses it.

use printune_bridge::SystemCatalog;
use printune_core::error::{PrintuneError, Result};
use printune_core::port::PrinterPort;
use printune_core::printer::Printer;
use tracing::{debug, info, instrument, warn};

use crate::outcome::{CommitOutcome, DriverDisposition, RemovalReport};
use crate::port::PortReconciler;
use crate::printer_driver::disable_printer_driver;

/// Reads and writes print queues through a [`SystemCatalog`].
pub struct PrinterReconciler<'a> {
    catalog: &'a dyn SystemCatalog,
}

impl<'a> PrinterReconciler<'a> {
    pub fn new(catalog: &'a dyn SystemCatalog) -> Self {
        Self { catalog }
    }

    fn ports(&self) -> PortReconciler<'a> {
        PortReconciler::new(self.catalog)
    }

    /// The printer as the host currently has it, with its port attached when
    /// the host has that port. `None` if there is no such printer.
    #[instrument(skip(self))]
    pub fn from_existing(&self, name: &str) -> Result<Option<Printer>> {
        let Some(record) = self.catalog.find_printer(name)? else {
            debug!("printer not found");
            return Ok(None);
        };

        let port = match record.port_name.as_deref() {
            Some(port_name) => self.ports().from_existing(port_name)?,
            None => None,
        };
        Ok(Some(Printer::from_record(&record, port)))
    }

    /// Live existence check; never cached.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.catalog.find_printer(name)?.is_some())
    }

    pub fn changes_pending(&self, printer: &Printer) -> Result<bool> {
        let observed = self.catalog.find_printer(&printer.name)?;
        Ok(printer.changes_pending(observed.as_ref()))
    }

    /// Bring the host in line with `printer`.
    ///
    /// Nothing is written when the queue already matches. An existing queue
    /// has its fields rewritten and its port committed; a new queue has its
    /// port created first if needed, then is added in a single step bound to
    /// that port.
    #[instrument(skip(self, printer), fields(printer = %printer.name))]
    pub fn commit(&self, printer: &Printer) -> Result<CommitOutcome> {
        printer.validate()?;
        let context = || format!("committing printer '{}'", printer.name);

        let observed = self.catalog.find_printer(&printer.name)?;
        if !printer.changes_pending(observed.as_ref()) {
            debug!("printer already up to date");
            return Ok(CommitOutcome::Unchanged);
        }

        match observed {
            Some(observed) => {
                if let Some(port) = &printer.port {
                    self.ports().commit(port)?;
                }
                let mut record = printer.to_record();
                record.port_name = observed.port_name;
                self.catalog
                    .put_printer(&record)
                    .map_err(|e| e.during(context()))?;
                info!("printer updated");
                Ok(CommitOutcome::Updated)
            }
            None => {
                let port = printer.port.as_ref().ok_or_else(|| {
                    PrintuneError::InternalInconsistency(format!(
                        "printer '{}' has no port to be created on",
                        printer.name
                    ))
                })?;
                if !self.ports().exists(&port.name)? {
                    self.ports().commit(port)?;
                }
                self.catalog
                    .add_printer_by_existing_port(&printer.to_record())
                    .map_err(|e| e.during(context()))?;
                info!(port = %port.name, driver = %printer.driver_name, "printer created");
                Ok(CommitOutcome::Created)
            }
        }
    }

    /// Delete `printer` from the host, along with the port and driver it no
    /// longer shares with anything.
    ///
    /// A driver that cannot be disabled is reported, not raised.
    #[instrument(skip(self, printer), fields(printer = %printer.name))]
    pub fn remove(&self, printer: &Printer) -> Result<RemovalReport> {
        let context = || format!("removing printer '{}'", printer.name);

        self.catalog
            .delete_printer(&printer.name)
            .map_err(|e| e.during(context()))?;
        if self.exists(&printer.name)? {
            return Err(
                PrintuneError::Catalog("the printer is still present after deletion".into())
                    .during(context()),
            );
        }
        info!("printer removed");

        let remaining = self.catalog.list_printers()?;

        let port_removed = match &printer.port {
            Some(PrinterPort { name, .. })
                if remaining.iter().any(|p| p.port_name.as_deref() == Some(name.as_str())) =>
            {
                info!(port = %name, "port still used by other printers; keeping it");
                false
            }
            Some(port) if self.ports().exists(&port.name)? => {
                self.ports().remove(&port.name)?;
                true
            }
            _ => false,
        };

        let driver_in_use = remaining
            .iter()
            .any(|p| p.driver_name.as_deref() == Some(printer.driver_name.as_str()));
        let driver = if driver_in_use {
            info!(driver = %printer.driver_name, "driver still used by other printers; leaving it enabled");
            DriverDisposition::InUse
        } else {
            match disable_printer_driver(self.catalog, &printer.driver_name) {
                Ok(true) => DriverDisposition::Disabled,
                Ok(false) => {
                    warn!(driver = %printer.driver_name, "driver could not be disabled");
                    DriverDisposition::DisableFailed
                }
                Err(e) => {
                    warn!(driver = %printer.driver_name, error = %e, "driver could not be disabled");
                    DriverDisposition::DisableFailed
                }
            }
        };

        Ok(RemovalReport {
            port_removed,
            driver,
        })
    }

    /// The existing printer as configuration JSON, or `None` if it does not exist.
    pub fn serialize_existing(&self, name: &str) -> Result<Option<String>> {
        self.from_existing(name)?
            .map(|printer| printer.to_json())
            .transpose()
    }
}
