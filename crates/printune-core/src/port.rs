// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desired-state TCP/IP printer port and its diff rules against the host.
//
// A field left at its default is never written over a host value, and so is
// never compared either. Numeric and boolean fields are only compared when the
// host actually reports a value for them; an unreported field is never, on
// its own, a reason to write.

use serde::{Deserialize, Serialize};

use crate::error::{PrintuneError, Result};
use crate::types::{PROTOCOL_RAW, PortRecord};

fn default_protocol() -> u32 {
    PROTOCOL_RAW
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A printer port as declared in configuration.
///
/// `port_number` and `snmp_dev_index` use 0 for "unset"; `snmp_dev_index` is
/// ignored entirely unless `snmp_enabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterPort {
    #[serde(rename = "PortName", alias = "portname", default)]
    pub name: String,
    #[serde(rename = "HostAddress", alias = "hostaddress", default, skip_serializing_if = "Option::is_none")]
    pub host_address: Option<String>,
    #[serde(rename = "PortNumber", alias = "portnumber", default, skip_serializing_if = "is_zero")]
    pub port_number: u32,
    #[serde(rename = "Protocol", alias = "protocol", default = "default_protocol")]
    pub protocol: u32,
    #[serde(rename = "Caption", alias = "caption", default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(rename = "Queue", alias = "queue", default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(rename = "ByteCount", alias = "bytecount", default, skip_serializing_if = "is_false")]
    pub byte_count: bool,
    #[serde(rename = "SNMPEnabled", alias = "snmpenabled", default, skip_serializing_if = "is_false")]
    pub snmp_enabled: bool,
    #[serde(rename = "SNMPCommunity", alias = "snmpcommunity", default, skip_serializing_if = "Option::is_none")]
    pub snmp_community: Option<String>,
    #[serde(rename = "SNMPDevIndex", alias = "snmpdevindex", default, skip_serializing_if = "is_zero")]
    pub snmp_dev_index: u32,
}

impl PrinterPort {
    /// A port with the given name and every other field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_address: None,
            port_number: 0,
            protocol: PROTOCOL_RAW,
            caption: None,
            queue: None,
            byte_count: false,
            snmp_enabled: false,
            snmp_community: None,
            snmp_dev_index: 0,
        }
    }

    /// Hydrate from the host's view of the port.
    ///
    /// The SNMP device index is only read when SNMP is enabled.
    pub fn from_record(record: &PortRecord) -> Self {
        let snmp_enabled = record.snmp_enabled.unwrap_or(false);
        Self {
            name: record.name.clone(),
            host_address: record.host_address.clone(),
            port_number: record.port_number.unwrap_or(0),
            protocol: record.protocol.unwrap_or(PROTOCOL_RAW),
            caption: record.caption.clone(),
            queue: record.queue.clone(),
            byte_count: record.byte_count.unwrap_or(false),
            snmp_enabled,
            snmp_community: record.snmp_community.clone(),
            snmp_dev_index: if snmp_enabled {
                record.snmp_dev_index.unwrap_or(0)
            } else {
                0
            },
        }
    }

    /// The only requirement for committing a port.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PrintuneError::MissingRequiredField {
                entity: "PrinterPort",
                field: "PortName",
            });
        }
        Ok(())
    }

    /// Stricter checks applied to ports declared in a configuration document,
    /// which must be creatable from scratch.
    pub fn validate_declared(&self) -> Result<()> {
        self.validate()?;
        if self.port_number == 0 {
            return Err(PrintuneError::MissingRequiredField {
                entity: "PrinterPort",
                field: "PortNumber",
            });
        }
        if self.host_address.as_deref().is_none_or(|h| h.trim().is_empty()) {
            return Err(PrintuneError::MissingRequiredField {
                entity: "PrinterPort",
                field: "HostAddress",
            });
        }
        Ok(())
    }

    /// Whether committing this port against `observed` would write anything.
    ///
    /// Only fields [`apply_to`](Self::apply_to) would write are compared, so
    /// a field left at its default never keeps a port pending.
    pub fn changes_pending(&self, observed: Option<&PortRecord>) -> bool {
        let Some(observed) = observed else {
            return true;
        };

        fn differs<T: PartialEq>(desired: Option<&T>, observed: Option<&T>) -> bool {
            desired.is_some_and(|d| observed != Some(d))
        }
        fn conflicts<T: PartialEq>(desired: Option<T>, observed: Option<T>) -> bool {
            matches!((desired, observed), (Some(d), Some(o)) if d != o)
        }

        let mut pending = self.name != observed.name;

        pending |= differs(self.caption.as_ref(), observed.caption.as_ref());
        pending |= differs(self.queue.as_ref(), observed.queue.as_ref());
        pending |= differs(self.host_address.as_ref(), observed.host_address.as_ref());
        pending |= differs(self.snmp_community.as_ref(), observed.snmp_community.as_ref());

        pending |= conflicts(Some(self.protocol), observed.protocol);
        pending |= conflicts(self.byte_count.then_some(true), observed.byte_count);
        pending |= conflicts(self.snmp_enabled.then_some(true), observed.snmp_enabled);
        pending |= conflicts((self.port_number != 0).then_some(self.port_number), observed.port_number);
        if self.snmp_enabled {
            pending |= conflicts(
                (self.snmp_dev_index != 0).then_some(self.snmp_dev_index),
                observed.snmp_dev_index,
            );
        }

        pending
    }

    /// Write every non-default field onto `record`.
    ///
    /// Defaults (None, false, 0) are skipped so they never overwrite a value
    /// the host already holds. Name and protocol are always written.
    pub fn apply_to(&self, record: &mut PortRecord) {
        record.name = self.name.clone();
        record.protocol = Some(self.protocol);

        if let Some(caption) = &self.caption {
            record.caption = Some(caption.clone());
        }
        if self.byte_count {
            record.byte_count = Some(true);
        }
        if let Some(queue) = &self.queue {
            record.queue = Some(queue.clone());
        }
        if self.port_number != 0 {
            record.port_number = Some(self.port_number);
        }
        if let Some(host_address) = &self.host_address {
            record.host_address = Some(host_address.clone());
        }
        if let Some(community) = &self.snmp_community {
            record.snmp_community = Some(community.clone());
        }
        if self.snmp_enabled {
            record.snmp_enabled = Some(true);
            if self.snmp_dev_index != 0 {
                record.snmp_dev_index = Some(self.snmp_dev_index);
            }
        }
    }

    /// The record a freshly created port would carry.
    pub fn to_record(&self) -> PortRecord {
        let mut record = PortRecord::named(self.name.clone());
        self.apply_to(&mut record);
        record
    }
}
