// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reconcile a desired printer port against the host.

use printune_bridge::PortCatalog;
use printune_core::error::Result;
use printune_core::port::PrinterPort;
use tracing::{debug, info, instrument};

use crate::outcome::CommitOutcome;

/// Reads and writes printer ports through a [`PortCatalog`].
pub struct PortReconciler<'a> {
    catalog: &'a dyn PortCatalog,
}

impl<'a> PortReconciler<'a> {
    pub fn new(catalog: &'a dyn PortCatalog) -> Self {
        Self { catalog }
    }

    /// The port as the host currently has it, or `None` if there is no such port.
    pub fn from_existing(&self, name: &str) -> Result<Option<PrinterPort>> {
        let found = self.catalog.find_port(name)?;
        if found.is_none() {
            debug!(port = name, "port not found");
        }
        Ok(found.as_ref().map(PrinterPort::from_record))
    }

    /// Live existence check; never cached.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.catalog.find_port(name)?.is_some())
    }

    pub fn changes_pending(&self, port: &PrinterPort) -> Result<bool> {
        let observed = self.catalog.find_port(&port.name)?;
        Ok(port.changes_pending(observed.as_ref()))
    }

    /// Create the port, or write the fields that differ. Nothing is written
    /// when the host already matches.
    #[instrument(skip(self, port), fields(port = %port.name))]
    pub fn commit(&self, port: &PrinterPort) -> Result<CommitOutcome> {
        port.validate()?;
        let context = || format!("committing printer port '{}'", port.name);

        match self.catalog.find_port(&port.name)? {
            None => {
                self.catalog
                    .create_port(&port.to_record())
                    .map_err(|e| e.during(context()))?;
                info!(host = ?port.host_address, number = port.port_number, "port created");
                Ok(CommitOutcome::Created)
            }
            Some(observed) if !port.changes_pending(Some(&observed)) => {
                debug!("port already up to date");
                Ok(CommitOutcome::Unchanged)
            }
            Some(mut observed) => {
                port.apply_to(&mut observed);
                self.catalog
                    .put_port(&observed)
                    .map_err(|e| e.during(context()))?;
                info!("port updated");
                Ok(CommitOutcome::Updated)
            }
        }
    }

    #[instrument(skip(self))]
    pub fn remove(&self, name: &str) -> Result<()> {
        self.catalog
            .delete_port(name)
            .map_err(|e| e.during(format!("removing printer port '{name}'")))?;
        info!("port removed");
        Ok(())
    }
}
