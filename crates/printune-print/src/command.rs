// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synchronous child-process execution.
//
// Every external tool Printune drives goes through `CommandRunner`, so the
// engine can be exercised without a Windows host.

use std::path::Path;
use std::process::Command;

use printune_core::error::{PrintuneError, Result};
use tracing::debug;

/// What a finished child process produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a program to completion, capturing both output streams.
pub trait CommandRunner {
    /// An `Err` means the program could not be started; any exit code,
    /// including non-zero, is an `Ok`.
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// Render a program and its arguments the way a shell user would type them.
pub fn command_line(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// Runs real child processes in the current working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        debug!(command = %line, "spawning");

        // `output()` drains stdout and stderr concurrently, then waits.
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| PrintuneError::ExternalTool {
                command_line: line.clone(),
                exit_code: None,
                output: String::new(),
                error: e.to_string(),
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(command = %line, exit_code, "process exited");
        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
