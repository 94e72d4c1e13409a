// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printing preferences: import a saved settings file onto a queue, or export
// a queue's settings to a file, through the PrintUI entry point.

use std::path::{Path, PathBuf};

use printune_bridge::{ConfigSource, SystemCatalog};
use printune_core::config::ToolConfig;
use printune_core::error::{PrintuneError, Result};
use tracing::{info, instrument, warn};

use crate::command::{CommandRunner, command_line};

const PRINTUI_ENTRY: &str = "printui.dll,PrintUIEntry";

/// A preference file available on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterPreference {
    path: PathBuf,
}

impl PrinterPreference {
    /// Materialize `location` through `source` and check the result exists.
    pub fn new(location: &str, source: &dyn ConfigSource) -> Result<Self> {
        let path = source.materialize(location)?;
        if !path.is_file() {
            let message = if source.is_remote(location) {
                format!("temporary copy of preference file '{location}' failed")
            } else {
                format!("preference file '{}' does not exist", path.display())
            };
            return Err(PrintuneError::InvalidIdentifier(message));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Runs the preference command against existing printers.
pub struct PreferenceApplier<'a> {
    config: &'a ToolConfig,
    runner: &'a dyn CommandRunner,
    catalog: &'a dyn SystemCatalog,
}

impl<'a> PreferenceApplier<'a> {
    pub fn new(
        config: &'a ToolConfig,
        runner: &'a dyn CommandRunner,
        catalog: &'a dyn SystemCatalog,
    ) -> Self {
        Self {
            config,
            runner,
            catalog,
        }
    }

    fn require_printer(&self, printer_name: &str) -> Result<()> {
        if self.catalog.find_printer(printer_name)?.is_none() {
            return Err(PrintuneError::InvalidIdentifier(format!(
                "printer '{printer_name}' does not exist"
            )));
        }
        Ok(())
    }

    fn require_elevation(&self, action: &str) -> Result<()> {
        if !self.catalog.is_elevated()? {
            return Err(PrintuneError::ElevationRequired(action.to_string()));
        }
        Ok(())
    }

    fn arguments(mode: &str, printer_name: &str, file: &Path) -> Vec<String> {
        vec![
            PRINTUI_ENTRY.to_string(),
            mode.to_string(),
            "/n".to_string(),
            printer_name.to_string(),
            "/a".to_string(),
            file.display().to_string(),
            "/q".to_string(),
        ]
    }

    /// Import `preference` onto `printer_name`.
    #[instrument(skip(self, preference), fields(file = %preference.path().display()))]
    pub fn apply(&self, preference: &PrinterPreference, printer_name: &str) -> Result<()> {
        self.require_elevation("applying printing preferences")?;
        self.require_printer(printer_name)?;

        // The file may have been removed since it was materialized.
        if !preference.path().is_file() {
            return Err(PrintuneError::InvalidIdentifier(format!(
                "preference file '{}' does not exist",
                preference.path().display()
            )));
        }

        let args = Self::arguments("/Ss", printer_name, preference.path());
        let output = self.runner.run(&self.config.rundll32, &args)?;
        if output.exit_code != 0 {
            return Err(PrintuneError::ExternalTool {
                command_line: command_line(&self.config.rundll32, &args),
                exit_code: Some(output.exit_code),
                output: output.stdout,
                error: output.stderr,
            });
        }
        info!("printing preferences applied");
        Ok(())
    }

    /// Save the settings of `printer_name` to `destination`.
    ///
    /// Best effort: a failing command is logged and otherwise ignored.
    #[instrument(skip(self), fields(destination = %destination.display()))]
    pub fn export(&self, printer_name: &str, destination: &Path) -> Result<()> {
        if !self.config.debug {
            self.require_elevation("exporting printing preferences")?;
        }
        self.require_printer(printer_name)?;

        let args = Self::arguments("/Sr", printer_name, destination);
        let output = self.runner.run(&self.config.rundll32, &args)?;
        if output.exit_code == 0 {
            info!("printing preferences exported");
        } else {
            warn!(exit_code = output.exit_code, "printing preference export failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::scripted::ScriptedRunner;
    use printune_bridge::{LocalConfigSource, MemoryCatalog};
    use printune_core::types::PrinterRecord;

    fn catalog_with_lab() -> MemoryCatalog {
        MemoryCatalog::new().with_printer(PrinterRecord {
            name: "Lab".into(),
            ..Default::default()
        })
    }

    fn release_config() -> ToolConfig {
        ToolConfig {
            debug: false,
            ..ToolConfig::default()
        }
    }

    #[test]
    fn missing_preference_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("lab.dat");
        let err = PrinterPreference::new(&missing.to_string_lossy(), &LocalConfigSource).unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));
    }

    #[test]
    fn apply_runs_printui_with_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let preference = PrinterPreference::new(&file.path().to_string_lossy(), &LocalConfigSource).unwrap();
        let config = release_config();
        let runner = ScriptedRunner::new().respond(0, "");
        let catalog = catalog_with_lab();

        PreferenceApplier::new(&config, &runner, &catalog)
            .apply(&preference, "Lab")
            .unwrap();

        let args = runner.args(0);
        assert_eq!(args[0], "printui.dll,PrintUIEntry");
        assert_eq!(args[1..4], ["/Ss", "/n", "Lab"]);
        assert_eq!(args[5], file.path().display().to_string());
        assert_eq!(args[6], "/q");
    }

    #[test]
    fn apply_failure_is_external_tool_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let preference = PrinterPreference::new(&file.path().to_string_lossy(), &LocalConfigSource).unwrap();
        let config = release_config();
        let runner = ScriptedRunner::new().respond(1, "");
        let catalog = catalog_with_lab();

        let err = PreferenceApplier::new(&config, &runner, &catalog)
            .apply(&preference, "Lab")
            .unwrap_err();
        assert!(matches!(err, PrintuneError::ExternalTool { exit_code: Some(1), .. }));
    }

    #[test]
    fn command_that_cannot_start_fails_apply_and_export() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let preference = PrinterPreference::new(&file.path().to_string_lossy(), &LocalConfigSource).unwrap();
        let config = release_config();
        let runner = ScriptedRunner::new().fail_to_start().fail_to_start();
        let catalog = catalog_with_lab();
        let applier = PreferenceApplier::new(&config, &runner, &catalog);

        let err = applier.apply(&preference, "Lab").unwrap_err();
        assert!(matches!(err, PrintuneError::ExternalTool { exit_code: None, .. }));
        let err = applier.export("Lab", Path::new("lab.dat")).unwrap_err();
        assert!(matches!(err, PrintuneError::ExternalTool { exit_code: None, .. }));
        assert_eq!(runner.call_count(), 2);
    }

    #[test]
    fn apply_needs_elevation_and_printer() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let preference = PrinterPreference::new(&file.path().to_string_lossy(), &LocalConfigSource).unwrap();
        let config = release_config();
        let runner = ScriptedRunner::new();

        let limited = catalog_with_lab().elevated(false);
        let err = PreferenceApplier::new(&config, &runner, &limited)
            .apply(&preference, "Lab")
            .unwrap_err();
        assert!(matches!(err, PrintuneError::ElevationRequired(_)));

        let empty = MemoryCatalog::new();
        let err = PreferenceApplier::new(&config, &runner, &empty)
            .apply(&preference, "Lab")
            .unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn apply_rechecks_file_before_running() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let preference = PrinterPreference::new(&file.path().to_string_lossy(), &LocalConfigSource).unwrap();
        drop(file);

        let config = release_config();
        let runner = ScriptedRunner::new();
        let catalog = catalog_with_lab();
        let err = PreferenceApplier::new(&config, &runner, &catalog)
            .apply(&preference, "Lab")
            .unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn export_failure_is_logged_not_raised() {
        let config = release_config();
        let runner = ScriptedRunner::new().respond(1, "");
        let catalog = catalog_with_lab();
        PreferenceApplier::new(&config, &runner, &catalog)
            .export("Lab", Path::new("lab.dat"))
            .unwrap();
        assert_eq!(runner.args(0)[1], "/Sr");
    }

    #[test]
    fn export_skips_elevation_in_debug_mode() {
        let runner = ScriptedRunner::new().respond(0, "");
        let catalog = catalog_with_lab().elevated(false);

        let debug = ToolConfig {
            debug: true,
            ..ToolConfig::default()
        };
        PreferenceApplier::new(&debug, &runner, &catalog)
            .export("Lab", Path::new("lab.dat"))
            .unwrap();

        let err = PreferenceApplier::new(&release_config(), &runner, &catalog)
            .export("Lab", Path::new("lab.dat"))
            .unwrap_err();
        assert!(matches!(err, PrintuneError::ElevationRequired(_)));
    }
}
