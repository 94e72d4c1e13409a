// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration: where the host's system directory lives and which
// external executables Printune drives.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Locations of the external tools and system directories Printune needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// The host's system directory (e.g. `C:\Windows\System32`).
    pub system_dir: PathBuf,
    /// Root of the protected driver repository. Identifiers starting with
    /// this prefix are treated as driver-store paths.
    pub driver_store_root: PathBuf,
    /// Driver management utility.
    pub pnputil: PathBuf,
    /// Driver package information utility.
    pub dism: PathBuf,
    /// Host for the PrintUI preference entry point.
    pub rundll32: PathBuf,
    /// Debug builds skip the elevation check on preference export.
    pub debug: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::for_system_root(Path::new(r"C:\Windows"))
    }
}

impl ToolConfig {
    /// Derive every path from a Windows root directory.
    pub fn for_system_root(root: &Path) -> Self {
        let system_dir = root.join("System32");
        Self {
            driver_store_root: system_dir.join("DriverStore"),
            pnputil: system_dir.join("pnputil.exe"),
            dism: system_dir.join("dism.exe"),
            rundll32: system_dir.join("rundll32.exe"),
            system_dir,
            debug: cfg!(debug_assertions),
        }
    }

    /// Build from the `SystemRoot` environment variable, falling back to
    /// `C:\Windows` when it is not set.
    pub fn from_env() -> Self {
        match std::env::var_os("SystemRoot") {
            Some(root) => {
                debug!(root = ?root, "system root taken from environment");
                Self::for_system_root(Path::new(&root))
            }
            None => Self::default(),
        }
    }

    /// Load overrides from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        debug!(path = %path.as_ref().display(), "tool configuration loaded");
        Ok(config)
    }

    /// Whether `identifier` names a location inside the driver store.
    ///
    /// Comparison is ASCII case-insensitive and treats `/` and `\` alike.
    pub fn is_driver_store_path(&self, identifier: &str) -> bool {
        let root = normalize_separators(&self.driver_store_root.to_string_lossy());
        let candidate = normalize_separators(identifier.trim());
        candidate.len() >= root.len()
            && candidate.is_char_boundary(root.len())
            && candidate[..root.len()].eq_ignore_ascii_case(&root)
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('/', "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_hang_off_system32() {
        let config = ToolConfig::default();
        assert!(config.pnputil.ends_with("pnputil.exe"));
        assert!(config.driver_store_root.starts_with(&config.system_dir));
    }

    #[test]
    fn driver_store_prefix_is_case_and_separator_insensitive() {
        let config = ToolConfig {
            driver_store_root: PathBuf::from(r"C:\Windows\System32\DriverStore"),
            ..ToolConfig::default()
        };
        assert!(config.is_driver_store_path(
            r"c:\windows\system32\driverstore\FileRepository\hpcu.inf_amd64_1\hpcu.inf"
        ));
        assert!(config.is_driver_store_path(
            "C:/Windows/System32/DriverStore/FileRepository/x.inf"
        ));
        assert!(!config.is_driver_store_path(r"D:\drivers\hpcu.inf"));
        assert!(!config.is_driver_store_path("oem12.inf"));
    }

    #[test]
    fn load_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tools.json");
        std::fs::write(&path, r#"{ "pnputil": "D:\\tools\\pnputil.exe", "debug": true }"#)
            .expect("write");

        let config = ToolConfig::load(&path).expect("load");
        assert_eq!(config.pnputil, PathBuf::from(r"D:\tools\pnputil.exe"));
        assert!(config.debug);
        assert_eq!(config.dism, ToolConfig::default().dism);
    }
}
