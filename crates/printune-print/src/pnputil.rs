// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wrapper around the driver management utility (pnputil).

use std::path::{Path, PathBuf};

use printune_core::driver::DriverRecord;
use printune_core::error::{PrintuneError, Result};
use tracing::{debug, info, instrument, warn};

use crate::command::{CommandRunner, command_line};
use crate::driver_catalog::parse_catalog;

/// Exit codes pnputil uses for a successful run: plain success, "already
/// installed or newer present" (259), and "reboot required" (3010).
pub const SUCCESS_EXIT_CODES: [i32; 3] = [0, 259, 3010];

/// The outcome of one pnputil invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCommandResult {
    pub command_line: String,
    pub exit_code: i32,
    pub output: String,
    pub error: String,
}

impl DriverCommandResult {
    pub fn success(&self) -> bool {
        SUCCESS_EXIT_CODES.contains(&self.exit_code)
    }

    pub fn reboot_required(&self) -> bool {
        self.exit_code == 3010
    }

    /// Turn an unsuccessful run into an `ExternalTool` error.
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(PrintuneError::ExternalTool {
            command_line: self.command_line,
            exit_code: Some(self.exit_code),
            output: self.output,
            error: self.error,
        })
    }
}

/// Runs pnputil through a [`CommandRunner`].
pub struct PnpUtil<'a> {
    runner: &'a dyn CommandRunner,
    program: PathBuf,
}

impl<'a> PnpUtil<'a> {
    pub fn new(runner: &'a dyn CommandRunner, program: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    fn invoke(&self, args: Vec<String>) -> Result<DriverCommandResult> {
        let line = command_line(&self.program, &args);
        let output = self.runner.run(&self.program, &args)?;
        let result = DriverCommandResult {
            command_line: line,
            exit_code: output.exit_code,
            output: output.stdout,
            error: output.stderr,
        };
        if result.success() {
            debug!(command = %result.command_line, exit_code = result.exit_code, "pnputil succeeded");
        } else {
            warn!(command = %result.command_line, exit_code = result.exit_code, "pnputil failed");
        }
        Ok(result)
    }

    /// Add a driver package to the store and install it on matching devices.
    #[instrument(skip(self), fields(inf = %inf_path.display()))]
    pub fn install_driver(&self, inf_path: &Path) -> Result<DriverCommandResult> {
        let result = self.invoke(vec![
            "/add-driver".into(),
            inf_path.display().to_string(),
            "/install".into(),
        ])?;
        if result.reboot_required() {
            info!("driver installed; a reboot is required to complete it");
        }
        Ok(result)
    }

    /// Remove a driver package (by published name) from the store.
    #[instrument(skip(self))]
    pub fn uninstall_driver(&self, target: &str) -> Result<DriverCommandResult> {
        self.invoke(vec!["/delete-driver".into(), target.to_string()])
    }

    /// Raw `/enum-drivers` output.
    pub fn enumerate_drivers(&self) -> Result<DriverCommandResult> {
        self.invoke(vec!["/enum-drivers".into()])
    }

    /// Copy a driver package out of the store into `destination`.
    #[instrument(skip(self), fields(destination = %destination.display()))]
    pub fn export_driver(&self, target: &str, destination: &Path) -> Result<DriverCommandResult> {
        self.invoke(vec![
            "/export-driver".into(),
            target.to_string(),
            destination.display().to_string(),
        ])
    }

    /// Enumerate and parse every installed driver package, in tool order.
    pub fn get_drivers(&self) -> Result<Vec<DriverRecord>> {
        let result = self.enumerate_drivers()?.into_result()?;
        let records = parse_catalog(&result.output)?;
        debug!(count = records.len(), "driver packages enumerated");
        Ok(records)
    }
}
