// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printune: system catalog abstractions and platform dispatch.
//
// The reconcilers only ever talk to the host through the traits in
// `traits`. Windows hosts get the PowerShell-backed catalog; everything else
// gets the stub, which reports `PlatformUnavailable`.

pub mod local;
pub mod memory;
pub mod powershell;
pub mod traits;

#[cfg(not(target_os = "windows"))]
pub mod stub;

pub use local::LocalConfigSource;
pub use memory::{MemoryCatalog, WriteCounts};
pub use traits::*;

/// The system catalog for the target operating system.
pub fn platform_catalog() -> Box<dyn SystemCatalog> {
    #[cfg(target_os = "windows")]
    {
        Box::new(powershell::PowerShellCatalog::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(stub::StubCatalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn non_windows_hosts_get_the_stub() {
        let catalog = platform_catalog();
        assert_eq!(catalog.platform_name(), "Unsupported (stub)");
        assert!(catalog.is_elevated().is_err());
    }
}
