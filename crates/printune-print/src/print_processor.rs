// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use printune_bridge::PrintProcessorCatalog;
use printune_core::error::Result;
use tracing::warn;

/// Whether a print processor called `name` is installed (case-insensitive).
pub fn print_processor_exists(catalog: &dyn PrintProcessorCatalog, name: &str) -> Result<bool> {
    let exists = catalog
        .list_print_processors()?
        .iter()
        .any(|p| p.eq_ignore_ascii_case(name));
    if !exists {
        warn!(print_processor = name, "print processor is not installed");
    }
    Ok(exists)
}
