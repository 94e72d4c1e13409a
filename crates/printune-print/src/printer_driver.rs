// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enabling and disabling printer drivers in the print subsystem.
//
// A driver package in the store is not usable by a queue until the driver it
// provides has been added (enabled). Both directions re-query the catalog to
// confirm the change took effect.

use printune_bridge::DriverCatalog;
use printune_core::driver::DriverVersion;
use printune_core::error::{PrintuneError, Result};
use printune_core::types::PrinterDriverRecord;
use tracing::{info, instrument, warn};

/// Look up an enabled driver by name, optionally requiring a version.
pub fn find_printer_driver(
    catalog: &dyn DriverCatalog,
    name: &str,
    version: Option<DriverVersion>,
) -> Result<Option<PrinterDriverRecord>> {
    let found = catalog.find_printer_driver(name)?;
    Ok(found.filter(|d| version.is_none() || d.version() == version))
}

/// Look up an enabled driver by the `.inf` it was installed from.
///
/// Paths compare case-insensitively, as the host's file system does.
pub fn find_printer_driver_by_inf(
    catalog: &dyn DriverCatalog,
    inf_path: &str,
    version: Option<DriverVersion>,
) -> Result<Option<PrinterDriverRecord>> {
    Ok(catalog.list_printer_drivers()?.into_iter().find(|d| {
        d.inf_path
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(inf_path))
            && (version.is_none() || d.version() == version)
    }))
}

/// Enable `name` and return the resulting driver record.
#[instrument(skip(catalog))]
pub fn enable_printer_driver(catalog: &dyn DriverCatalog, name: &str) -> Result<PrinterDriverRecord> {
    let context = || format!("enabling printer driver '{name}'");

    catalog
        .add_printer_driver(name)
        .map_err(|e| e.during(context()))?;

    match catalog.find_printer_driver(name)? {
        Some(record) => {
            info!(version = ?record.version(), "printer driver enabled");
            Ok(record)
        }
        None => Err(PrintuneError::Catalog(
            "the driver was added without error but is not present".into(),
        )
        .during(context())),
    }
}

/// Disable `name`. Returns `true` when the driver is gone afterwards, which
/// includes the case where it was never enabled.
#[instrument(skip(catalog))]
pub fn disable_printer_driver(catalog: &dyn DriverCatalog, name: &str) -> Result<bool> {
    if catalog.find_printer_driver(name)?.is_none() {
        return Ok(true);
    }

    catalog
        .delete_printer_driver(name)
        .map_err(|e| e.during(format!("disabling printer driver '{name}'")))?;

    let removed = catalog.find_printer_driver(name)?.is_none();
    if removed {
        info!("printer driver disabled");
    } else {
        warn!("printer driver still present after delete");
    }
    Ok(removed)
}
