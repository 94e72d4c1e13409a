// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end workflows: driver packages in and out of the store, printers
// installed from configuration documents, and existence checks.
//
// Each workflow is one synchronous pass against the host.

use std::path::{Path, PathBuf};

use printune_bridge::{ConfigSource, SystemCatalog};
use printune_core::config::ToolConfig;
use printune_core::document::printer_from_config;
use printune_core::driver::DriverVersion;
use printune_core::error::{PrintuneError, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::command::CommandRunner;
use crate::driver_resolver::DriverResolver;
use crate::outcome::{CommitOutcome, RemovalReport};
use crate::pnputil::{DriverCommandResult, PnpUtil};
use crate::preference::{PreferenceApplier, PrinterPreference};
use crate::print_processor::print_processor_exists;
use crate::printer::PrinterReconciler;
use crate::printer_driver::{enable_printer_driver, find_printer_driver, find_printer_driver_by_inf};

/// Outcome of installing every package found under a path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverInstallReport {
    pub files: Vec<DriverInstallFile>,
    /// Whether the requested printer driver was enabled by any install.
    pub driver_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverInstallFile {
    pub path: PathBuf,
    pub exit_code: i32,
    pub success: bool,
    pub reboot_required: bool,
}

impl DriverInstallReport {
    /// True when every package installed (vacuously true with none found).
    pub fn success(&self) -> bool {
        self.files.iter().all(|f| f.success)
    }
}

/// The collaborators every workflow runs against.
pub struct Printune<'a> {
    config: &'a ToolConfig,
    runner: &'a dyn CommandRunner,
    catalog: &'a dyn SystemCatalog,
}

impl<'a> Printune<'a> {
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

    fn pnputil(&self) -> PnpUtil<'a> {
        PnpUtil::new(self.runner, &self.config.pnputil)
    }

    fn printers(&self) -> PrinterReconciler<'a> {
        PrinterReconciler::new(self.catalog)
    }

    /// Driver store changes need elevation outside debug builds.
    fn require_elevation(&self, action: &str) -> Result<()> {
        if !self.config.debug && !self.catalog.is_elevated()? {
            return Err(PrintuneError::ElevationRequired(action.to_string()));
        }
        Ok(())
    }

    /// Add every `.inf` at `path` to the driver store, then enable the
    /// printer driver `name` if one is given.
    ///
    /// `path` may be a single file or a directory; `recurse` descends into
    /// subdirectories. Failed installs are reported per file rather than
    /// aborting the pass.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn install_drivers(
        &self,
        path: &Path,
        recurse: bool,
        name: Option<&str>,
    ) -> Result<DriverInstallReport> {
        self.require_elevation("installing driver packages")?;
        let files = inf_files(path, recurse)?;
        if files.is_empty() {
            warn!("no driver packages found");
        }

        let mut report = DriverInstallReport::default();
        for file in files {
            let result = self.pnputil().install_driver(&file)?;
            if result.success() {
                info!(file = %file.display(), exit_code = result.exit_code, "driver package installed");
                if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                    match enable_printer_driver(self.catalog, name) {
                        Ok(_) => report.driver_enabled = true,
                        Err(e) => warn!(driver = name, error = %e, "printer driver not enabled"),
                    }
                }
            } else {
                warn!(
                    file = %file.display(),
                    exit_code = result.exit_code,
                    output = %result.output,
                    error = %result.error,
                    "driver package install failed"
                );
            }
            report.files.push(DriverInstallFile {
                path: file,
                exit_code: result.exit_code,
                success: result.success(),
                reboot_required: result.reboot_required(),
            });
        }
        Ok(report)
    }

    /// Remove a driver package from the store by published name.
    #[instrument(skip(self))]
    pub fn uninstall_driver(&self, target: &str) -> Result<DriverCommandResult> {
        self.require_elevation("removing a driver package")?;
        let result = self.pnputil().uninstall_driver(target.trim())?;
        if result.success() {
            info!(exit_code = result.exit_code, "driver package removed");
        }
        Ok(result)
    }

    /// Copy the package `target` resolves to into `destination`.
    #[instrument(skip(self), fields(destination = %destination.display()))]
    pub fn export_driver(
        &self,
        target: &str,
        destination: &Path,
        version: Option<&str>,
    ) -> Result<DriverCommandResult> {
        let driver = DriverResolver::new(self.config, self.runner, self.catalog)
            .resolve(target, version)?
            .ok_or_else(|| {
                PrintuneError::InvalidIdentifier(format!("no installed driver package matches '{target}'"))
            })?;
        debug!(published = %driver.published_name, version = %driver.driver_version, "export target resolved");
        self.pnputil().export_driver(&driver.published_name, destination)
    }

    /// Create or update the printer `name` declared in `config_text`.
    ///
    /// The driver must already be enabled and the print processor present.
    /// A declared preference file is materialized through `source` and
    /// applied after the commit.
    #[instrument(skip(self, config_text, source))]
    pub fn install_printer(
        &self,
        name: &str,
        config_text: &str,
        source: &dyn ConfigSource,
    ) -> Result<CommitOutcome> {
        if config_text.trim().is_empty() {
            return Err(PrintuneError::Configuration("configuration document is empty".into()));
        }
        let printer = printer_from_config(name, config_text)?;
        debug!(driver = %printer.driver_name, "printer read from configuration");

        if find_printer_driver(self.catalog, &printer.driver_name, None)?.is_none() {
            return Err(PrintuneError::InvalidIdentifier(format!(
                "printer driver '{}' is not installed or not enabled",
                printer.driver_name
            )));
        }
        if !print_processor_exists(self.catalog, &printer.print_processor)? {
            return Err(PrintuneError::Configuration(format!(
                "print processor '{}' does not exist on this host",
                printer.print_processor
            )));
        }

        let outcome = self.printers().commit(&printer)?;
        info!(?outcome, wrote = outcome.wrote(), "printer committed");

        if let Some(location) = printer.preference_file.as_deref().filter(|l| !l.trim().is_empty()) {
            let preference = PrinterPreference::new(location, source)?;
            PreferenceApplier::new(self.config, self.runner, self.catalog).apply(&preference, &printer.name)?;
        }
        Ok(outcome)
    }

    /// Remove the printer `name`. `None` when there was nothing to remove.
    #[instrument(skip(self))]
    pub fn uninstall_printer(&self, name: &str) -> Result<Option<RemovalReport>> {
        let Some(printer) = self.printers().from_existing(name)? else {
            warn!("printer not found for removal");
            return Ok(None);
        };
        self.printers().remove(&printer).map(Some)
    }

    /// Whether the printer `name` exists on the host.
    pub fn verify_printer(&self, name: &str) -> Result<bool> {
        let exists = self.printers().exists(name)?;
        info!(printer = name, exists, "printer verified");
        Ok(exists)
    }

    /// Whether the printer driver `name` is enabled, at `version` if given.
    ///
    /// `name` may also be the path of an existing `.inf`, in which case the
    /// driver installed from that file is looked up instead.
    pub fn verify_driver(&self, name: &str, version: Option<&str>) -> Result<bool> {
        let version = version
            .map(|v| v.parse::<DriverVersion>())
            .transpose()
            .map_err(|e| PrintuneError::InvalidIdentifier(e.to_string()))?;
        let found = if Path::new(name).is_file() {
            find_printer_driver_by_inf(self.catalog, name, version)?
        } else {
            find_printer_driver(self.catalog, name, version)?
        };
        let exists = found.is_some();
        info!(driver = name, ?version, exists, "printer driver verified");
        Ok(exists)
    }

    /// The existing printer as configuration JSON.
    pub fn describe_printer(&self, name: &str) -> Result<Option<String>> {
        self.printers().serialize_existing(name)
    }
}

/// `.inf` files at `path`: the file itself, or the directory's entries
/// (all descendants with `recurse`), in file-name order.
fn inf_files(path: &Path, recurse: bool) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(PrintuneError::InvalidIdentifier(format!(
            "driver path '{}' does not exist",
            path.display()
        )));
    }

    let depth = if recurse { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(path).max_depth(depth).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_inf = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("inf"));
        if entry.file_type().is_file() && is_inf {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::scripted::ScriptedRunner;
    use crate::outcome::DriverDisposition;
    use printune_bridge::{LocalConfigSource, MemoryCatalog};
    use printune_core::types::PrinterDriverRecord;
    use std::fs;

    const DRIVER: &str = "HP Universal Printing PCL 6";

    const LAB_CONFIG: &str = r#"
    // lab printers
    [
      {
        "printerName": "Lab",
        "Location": "Building 2",
        "DriverName": "HP Universal Printing PCL 6",
        "DataType": "RAW",
        "PrintProcessor": "winprint",
        "PrinterPort": { "PortName": "IP_10.0.0.5", "HostAddress": "10.0.0.5", "PortNumber": 9100 }
      }
    ]"#;

    fn hp_driver() -> PrinterDriverRecord {
        PrinterDriverRecord {
            name: DRIVER.into(),
            inf_path: Some(r"C:\drivers\hpcu250u.inf".into()),
            driver_version: Some((61 << 48) | (250 << 32) | (1 << 16) | 24832),
            ..Default::default()
        }
    }

    fn touch(path: &Path) {
        fs::write(path, "[Version]\n").unwrap();
    }

    #[test]
    fn install_drivers_walks_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.inf"));
        touch(&dir.path().join("a.INF"));
        touch(&dir.path().join("readme.txt"));
        fs::create_dir(dir.path().join("x64")).unwrap();
        touch(&dir.path().join("x64").join("c.inf"));

        let config = ToolConfig::default();
        let catalog = MemoryCatalog::new().with_driver_package(hp_driver());

        let runner = ScriptedRunner::new().respond(0, "").respond(1, "");
        let flat = Printune::new(&config, &runner, &catalog)
            .install_drivers(dir.path(), false, Some(DRIVER))
            .unwrap();
        assert_eq!(flat.files.len(), 2);
        assert!(flat.files[0].path.ends_with("a.INF"));
        assert!(!flat.success());
        assert!(flat.driver_enabled);
        assert!(catalog.has_printer_driver(DRIVER));

        let runner = ScriptedRunner::new().respond(3010, "").respond(0, "").respond(259, "");
        let deep = Printune::new(&config, &runner, &catalog)
            .install_drivers(dir.path(), true, None)
            .unwrap();
        assert_eq!(deep.files.len(), 3);
        assert!(deep.success());
        assert!(deep.files[0].reboot_required);
        assert!(!deep.driver_enabled);
    }

    #[test]
    fn enable_failure_after_install_is_not_fatal() {
        let file = tempfile::Builder::new().suffix(".inf").tempfile().unwrap();
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new().respond(0, "");
        let catalog = MemoryCatalog::new();

        let report = Printune::new(&config, &runner, &catalog)
            .install_drivers(file.path(), false, Some("Unknown Driver"))
            .unwrap();
        assert!(report.success());
        assert!(!report.driver_enabled);
    }

    fn release_config() -> ToolConfig {
        ToolConfig {
            debug: false,
            ..ToolConfig::default()
        }
    }

    #[test]
    fn driver_store_changes_need_elevation() {
        let file = tempfile::Builder::new().suffix(".inf").tempfile().unwrap();
        let config = release_config();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new().elevated(false);
        let printune = Printune::new(&config, &runner, &catalog);

        let err = printune.install_drivers(file.path(), false, None).unwrap_err();
        assert!(matches!(err, PrintuneError::ElevationRequired(_)));
        let err = printune.uninstall_driver("oem12.inf").unwrap_err();
        assert!(matches!(err, PrintuneError::ElevationRequired(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn debug_builds_skip_driver_elevation_check() {
        let file = tempfile::Builder::new().suffix(".inf").tempfile().unwrap();
        let config = ToolConfig {
            debug: true,
            ..ToolConfig::default()
        };
        let runner = ScriptedRunner::new().respond(0, "").respond(0, "");
        let catalog = MemoryCatalog::new().elevated(false);
        let printune = Printune::new(&config, &runner, &catalog);

        assert!(printune.install_drivers(file.path(), false, None).unwrap().success());
        assert!(printune.uninstall_driver("oem12.inf").unwrap().success());
        assert_eq!(runner.args(1), vec!["/delete-driver", "oem12.inf"]);
    }

    #[test]
    fn elevated_release_build_removes_driver() {
        let config = release_config();
        let runner = ScriptedRunner::new().respond(0, "");
        let catalog = MemoryCatalog::new();
        let result = Printune::new(&config, &runner, &catalog)
            .uninstall_driver(" oem12.inf ")
            .unwrap();
        assert!(result.success());
        assert_eq!(runner.args(0), vec!["/delete-driver", "oem12.inf"]);
    }

    #[test]
    fn missing_driver_path_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new();
        let err = Printune::new(&config, &runner, &catalog)
            .install_drivers(&dir.path().join("nope"), true, None)
            .unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));
    }

    #[test]
    fn export_resolves_then_exports_published_name() {
        let enumeration = "Published Name: oem12.inf\r\n\
Original Name: hpcu250u.inf\r\n\
Provider Name: HP\r\n\
Class Name: Printers\r\n\
Class GUID: {4d36e979-e325-11ce-bfc1-08002be10318}\r\n\
Driver Version: 03/14/2024 61.250.1.24832\r\n";
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new().respond(0, enumeration).respond(0, "");
        let catalog = MemoryCatalog::new();

        let result = Printune::new(&config, &runner, &catalog)
            .export_driver("hpcu250u.inf", Path::new("out"), None)
            .unwrap();
        assert!(result.success());
        assert_eq!(runner.args(1), vec!["/export-driver", "oem12.inf", "out"]);
    }

    #[test]
    fn export_of_unknown_driver_is_invalid() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new().respond(0, "");
        let catalog = MemoryCatalog::new();
        let err = Printune::new(&config, &runner, &catalog)
            .export_driver("oem3.inf", Path::new("out"), None)
            .unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn install_printer_then_reinstall_is_unchanged() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new().with_printer_driver(hp_driver());
        let printune = Printune::new(&config, &runner, &catalog);

        let first = printune.install_printer("Lab", LAB_CONFIG, &LocalConfigSource).unwrap();
        assert_eq!(first, CommitOutcome::Created);
        assert!(first.wrote());
        let second = printune.install_printer("Lab", LAB_CONFIG, &LocalConfigSource).unwrap();
        assert_eq!(second, CommitOutcome::Unchanged);
        assert!(!second.wrote());
        assert!(printune.verify_printer("Lab").unwrap());
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn install_printer_checks_driver_and_processor() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();

        let no_driver = MemoryCatalog::new();
        let err = Printune::new(&config, &runner, &no_driver)
            .install_printer("Lab", LAB_CONFIG, &LocalConfigSource)
            .unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));

        let bad_processor = LAB_CONFIG.replace("winprint", "hpzpp");
        let catalog = MemoryCatalog::new().with_printer_driver(hp_driver());
        let err = Printune::new(&config, &runner, &catalog)
            .install_printer("Lab", &bad_processor, &LocalConfigSource)
            .unwrap_err();
        assert!(matches!(err, PrintuneError::Configuration(_)));
        assert_eq!(catalog.writes().total(), 0);
    }

    #[test]
    fn install_printer_applies_preferences() {
        let prefs = tempfile::NamedTempFile::new().unwrap();
        let location = prefs.path().to_string_lossy().replace('\\', "\\\\");
        let document = LAB_CONFIG.replace(
            r#""PrintProcessor": "winprint","#,
            &format!(r#""PrintProcessor": "winprint", "PreferenceFile": "{location}","#),
        );

        let config = ToolConfig::default();
        let runner = ScriptedRunner::new().respond(0, "");
        let catalog = MemoryCatalog::new().with_printer_driver(hp_driver());
        Printune::new(&config, &runner, &catalog)
            .install_printer("Lab", &document, &LocalConfigSource)
            .unwrap();

        assert_eq!(runner.call_count(), 1);
        assert_eq!(runner.args(0)[1], "/Ss");
        assert_eq!(runner.args(0)[3], "Lab");
    }

    #[test]
    fn empty_document_is_configuration_error() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new();
        let err = Printune::new(&config, &runner, &catalog)
            .install_printer("Lab", "  ", &LocalConfigSource)
            .unwrap_err();
        assert!(matches!(err, PrintuneError::Configuration(_)));
    }

    #[test]
    fn uninstall_printer_reports_removal() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new().with_printer_driver(hp_driver());
        let printune = Printune::new(&config, &runner, &catalog);

        assert_eq!(printune.uninstall_printer("Lab").unwrap(), None);

        printune.install_printer("Lab", LAB_CONFIG, &LocalConfigSource).unwrap();
        let report = printune.uninstall_printer("Lab").unwrap().unwrap();
        assert!(report.port_removed);
        assert_eq!(report.driver, DriverDisposition::Disabled);
        assert!(!printune.verify_printer("Lab").unwrap());
    }

    #[test]
    fn verify_driver_honours_version() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new().with_printer_driver(hp_driver());
        let printune = Printune::new(&config, &runner, &catalog);

        assert!(printune.verify_driver(DRIVER, None).unwrap());
        assert!(printune.verify_driver(DRIVER, Some("61.250.1.24832")).unwrap());
        assert!(!printune.verify_driver(DRIVER, Some("62.0.0.0")).unwrap());
        assert!(matches!(
            printune.verify_driver(DRIVER, Some("latest")),
            Err(PrintuneError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn verify_driver_by_inf_path() {
        let inf = tempfile::Builder::new().suffix(".inf").tempfile().unwrap();
        let inf_path = inf.path().to_string_lossy().into_owned();
        let installed = PrinterDriverRecord {
            inf_path: Some(inf_path.clone()),
            ..hp_driver()
        };
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new().with_printer_driver(installed);
        let printune = Printune::new(&config, &runner, &catalog);

        assert!(printune.verify_driver(&inf_path, None).unwrap());
        assert!(printune.verify_driver(&inf_path, Some("61.250.1.24832")).unwrap());
        assert!(!printune.verify_driver(&inf_path, Some("1.0.0.0")).unwrap());

        let other = tempfile::Builder::new().suffix(".inf").tempfile().unwrap();
        assert!(!printune.verify_driver(&other.path().to_string_lossy(), None).unwrap());
    }

    #[test]
    fn describe_printer_round_trips_through_config() {
        let config = ToolConfig::default();
        let runner = ScriptedRunner::new();
        let catalog = MemoryCatalog::new().with_printer_driver(hp_driver());
        let printune = Printune::new(&config, &runner, &catalog);
        printune.install_printer("Lab", LAB_CONFIG, &LocalConfigSource).unwrap();

        let json = printune.describe_printer("Lab").unwrap().unwrap();
        let reloaded = printer_from_config("Lab", &json).unwrap();
        assert_eq!(reloaded.location, "Building 2");
        assert_eq!(reloaded.port_name(), Some("IP_10.0.0.5"));
    }
}
