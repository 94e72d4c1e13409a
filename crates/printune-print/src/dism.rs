// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Driver-store path → published name, via `dism /get-driverinfo`.

use std::path::PathBuf;
use std::sync::LazyLock;

use printune_core::error::Result;
use regex::Regex;
use tracing::debug;

use crate::command::CommandRunner;

static PUBLISHED_NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Published\s+Name\s*:\s*(oem\d+\.inf)").expect("static regex")
});

/// Runs the package information tool through a [`CommandRunner`].
pub struct Dism<'a> {
    runner: &'a dyn CommandRunner,
    program: PathBuf,
}

impl<'a> Dism<'a> {
    pub fn new(runner: &'a dyn CommandRunner, program: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// The published name of the package at `store_path`, or `None` when
    /// the tool's output names none.
    pub fn published_name_for(&self, store_path: &str) -> Result<Option<String>> {
        let args = vec![
            "/online".to_string(),
            "/get-driverinfo".to_string(),
            format!("/driver:{store_path}"),
        ];
        let output = self.runner.run(&self.program, &args)?;
        let name = extract_published_name(&output.stdout);
        debug!(store_path, exit_code = output.exit_code, published_name = ?name, "driver info queried");
        Ok(name)
    }
}

fn extract_published_name(output: &str) -> Option<String> {
    PUBLISHED_NAME_LINE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
