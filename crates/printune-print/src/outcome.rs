// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// What a reconciliation pass did to the host.

use serde::Serialize;

/// Result of committing a desired-state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommitOutcome {
    /// The object did not exist and was created.
    Created,
    /// The object existed with different values and was written.
    Updated,
    /// The host already matched; nothing was written.
    Unchanged,
}

impl CommitOutcome {
    pub fn wrote(self) -> bool {
        self != CommitOutcome::Unchanged
    }
}

/// What happened to a removed printer's driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriverDisposition {
    /// Another printer still uses the driver; it was left enabled.
    InUse,
    Disabled,
    /// Disabling was attempted and did not succeed. Not an error.
    DisableFailed,
}

/// Summary of a printer removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    pub port_removed: bool,
    pub driver: DriverDisposition,
}
