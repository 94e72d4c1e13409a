// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Observed-state snapshots returned by the system catalog.
//
// These mirror what the host reports. Any field the host may leave unset is
// an `Option` so that "not reported" is never confused with zero or empty.

use serde::{Deserialize, Serialize};

use crate::driver::DriverVersion;

/// Raw TCP (port 9100, JetDirect) printing.
pub const PROTOCOL_RAW: u32 = 1;
/// LPR/LPD (RFC 1179) printing.
pub const PROTOCOL_LPR: u32 = 2;

/// A TCP/IP printer port as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub name: String,
    pub host_address: Option<String>,
    pub port_number: Option<u32>,
    pub protocol: Option<u32>,
    pub caption: Option<String>,
    pub queue: Option<String>,
    pub byte_count: Option<bool>,
    pub snmp_enabled: Option<bool>,
    pub snmp_community: Option<String>,
    pub snmp_dev_index: Option<u32>,
}

impl PortRecord {
    /// A blank record carrying only the identity, used as the template when
    /// a port is created.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A print queue as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterRecord {
    pub name: String,
    pub location: Option<String>,
    pub driver_name: Option<String>,
    pub data_type: Option<String>,
    pub print_processor: Option<String>,
    pub port_name: Option<String>,
}

/// A printer driver that has been enabled (added to the print subsystem).
///
/// Distinct from [`crate::DriverRecord`], which describes a driver package in
/// the driver store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDriverRecord {
    pub name: String,
    pub inf_path: Option<String>,
    pub provider: Option<String>,
    /// Packed 16-bits-per-component version.
    pub driver_version: Option<u64>,
}

impl PrinterDriverRecord {
    pub fn version(&self) -> Option<DriverVersion> {
        self.driver_version.map(DriverVersion::from_packed)
    }
}
