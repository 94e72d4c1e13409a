// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration source backed by the local filesystem.

use std::path::PathBuf;

use printune_core::error::{PrintuneError, Result};
use tracing::debug;

use crate::traits::ConfigSource;

/// Reads plain paths and `file://` URIs. Remote schemes are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalConfigSource;

impl LocalConfigSource {
    fn local_path(&self, location: &str) -> Result<PathBuf> {
        if self.is_remote(location) {
            return Err(PrintuneError::InvalidIdentifier(format!(
                "remote configuration sources are not supported: {location}"
            )));
        }
        Ok(PathBuf::from(strip_file_scheme(location.trim())))
    }
}

impl ConfigSource for LocalConfigSource {
    fn read_text(&self, location: &str) -> Result<String> {
        let path = self.local_path(location)?;
        debug!(path = %path.display(), "reading configuration");
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PrintuneError::InvalidIdentifier(format!(
                "configuration file '{}' does not exist",
                path.display()
            )),
            _ => PrintuneError::Io(e),
        })
    }

    fn materialize(&self, location: &str) -> Result<PathBuf> {
        self.local_path(location)
    }

    fn is_remote(&self, location: &str) -> bool {
        let lower = location.trim().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

/// `file:///C:/x` → `C:/x`, `file:///tmp/x` → `/tmp/x`, plain paths unchanged.
fn strip_file_scheme(location: &str) -> &str {
    let Some(rest) = location
        .get(..7)
        .filter(|scheme| scheme.eq_ignore_ascii_case("file://"))
        .map(|_| &location[7..])
    else {
        return location;
    };

    let bytes = rest.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        &rest[1..]
    } else {
        rest
    }
}
