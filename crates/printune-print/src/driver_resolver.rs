// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolve a user-supplied driver identifier to one installed driver package.
//
// Accepted forms, tried in order:
//   1. a path inside the driver store (needs elevation, looked up via dism)
//   2. a published name, `oem<digits>.inf`
//   3. anything else is an original `.inf` file name (directories ignored)
//
// The catalog is enumerated afresh on every call.

use printune_bridge::HostEnvironment;
use printune_core::config::ToolConfig;
use printune_core::driver::DriverRecord;
use printune_core::error::{PrintuneError, Result};
use tracing::{debug, instrument};

use crate::command::CommandRunner;
use crate::dism::Dism;
use crate::driver_catalog::is_published_name;
use crate::pnputil::PnpUtil;

pub struct DriverResolver<'a> {
    config: &'a ToolConfig,
    runner: &'a dyn CommandRunner,
    host: &'a dyn HostEnvironment,
}

impl<'a> DriverResolver<'a> {
    pub fn new(
        config: &'a ToolConfig,
        runner: &'a dyn CommandRunner,
        host: &'a dyn HostEnvironment,
    ) -> Self {
        Self {
            config,
            runner,
            host,
        }
    }

    /// Find the driver package `identifier` refers to.
    ///
    /// Without a `version` hint the greatest version wins (first listed on a
    /// tie). With one, the first package whose version string equals the
    /// hint, or whose date equals the hint read as a date, wins. No match is
    /// `Ok(None)`.
    #[instrument(skip(self))]
    pub fn resolve(&self, identifier: &str, version: Option<&str>) -> Result<Option<DriverRecord>> {
        let identifier = identifier.trim();

        if self.config.is_driver_store_path(identifier) {
            if !self.host.is_elevated()? {
                return Err(PrintuneError::ElevationRequired(
                    "resolving a driver by its driver store path".into(),
                ));
            }
            let published = Dism::new(self.runner, &self.config.dism)
                .published_name_for(identifier)?
                .ok_or_else(|| {
                    PrintuneError::InvalidIdentifier(format!(
                        "'{identifier}' is not an installed driver package; provide a published name or a driver store path"
                    ))
                })?;
            debug!(published = %published, "driver store path mapped");
            return self.resolve_published(&published, version);
        }

        if is_published_name(identifier) {
            return self.resolve_published(identifier, version);
        }
        self.resolve_original(identifier, version)
    }

    fn drivers(&self) -> Result<Vec<DriverRecord>> {
        PnpUtil::new(self.runner, &self.config.pnputil).get_drivers()
    }

    fn resolve_published(&self, name: &str, version: Option<&str>) -> Result<Option<DriverRecord>> {
        let candidates = self
            .drivers()?
            .into_iter()
            .filter(|d| d.published_name.eq_ignore_ascii_case(name));
        Ok(select(candidates, version))
    }

    fn resolve_original(&self, name: &str, version: Option<&str>) -> Result<Option<DriverRecord>> {
        let file_name = file_name(name);
        let candidates = self
            .drivers()?
            .into_iter()
            .filter(|d| d.original_name == file_name);
        Ok(select(candidates, version))
    }
}

/// Last path component, splitting on either separator.
fn file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

fn select(
    candidates: impl Iterator<Item = DriverRecord>,
    version: Option<&str>,
) -> Option<DriverRecord> {
    match version {
        Some(hint) => candidates.into_iter().find(|d| d.matches_version_hint(hint.trim())),
        None => candidates.fold(None, |best: Option<DriverRecord>, d| match best {
            Some(b) if b.driver_version >= d.driver_version => Some(b),
            _ => Some(d),
        }),
    }
}
