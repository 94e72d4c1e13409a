// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Installed driver package records, as reported by the driver enumeration tool.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A four-part driver version (`major.minor.build.revision`).
///
/// Ordering is component-wise, so `1.10.0.0 > 1.2.3.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl DriverVersion {
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Decode the packed 64-bit form used by printer driver objects
    /// (16 bits per component, major in the high word).
    pub fn from_packed(packed: u64) -> Self {
        Self {
            major: ((packed >> 48) & 0xFFFF) as u32,
            minor: ((packed >> 32) & 0xFFFF) as u32,
            build: ((packed >> 16) & 0xFFFF) as u32,
            revision: (packed & 0xFFFF) as u32,
        }
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Error returned when a version string is not four dotted integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(pub String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid driver version '{}'", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for DriverVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseVersionError(s.to_string()))?;

        match parts.as_slice() {
            [major, minor, build, revision] => Ok(Self::new(*major, *minor, *build, *revision)),
            _ => Err(ParseVersionError(s.to_string())),
        }
    }
}

/// One installed driver package from the enumeration output.
///
/// Several records may share an `original_name` (one per installed version);
/// only `published_name` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    /// System-assigned identity, `oem<digits>.inf`.
    pub published_name: String,
    /// File name of the source `.inf` the package was installed from.
    pub original_name: String,
    pub provider_name: String,
    pub class_name: String,
    pub class_guid: String,
    pub driver_version: DriverVersion,
    pub driver_version_date: NaiveDate,
    /// Absent for unsigned packages.
    pub signer_name: Option<String>,
}

/// Date layouts accepted for a version hint.
const HINT_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y"];

/// Parse a caller-supplied hint as a calendar date, if it is one.
pub fn parse_hint_date(hint: &str) -> Option<NaiveDate> {
    let hint = hint.trim();
    HINT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(hint, fmt).ok())
}

impl DriverRecord {
    /// Whether this record satisfies a version hint: either the version string
    /// matches verbatim or the hint is a date equal to the driver date.
    pub fn matches_version_hint(&self, hint: &str) -> bool {
        if self.driver_version.to_string() == hint {
            return true;
        }
        parse_hint_date(hint) == Some(self.driver_version_date)
    }
}
