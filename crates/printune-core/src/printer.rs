// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desired-state print queue. A printer exclusively owns its port.

use serde::{Deserialize, Serialize};

use crate::error::{PrintuneError, Result};
use crate::port::PrinterPort;
use crate::types::PrinterRecord;

/// A printer as declared in configuration (or hydrated from the host).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    #[serde(rename = "PrinterName", alias = "printername", default)]
    pub name: String,
    #[serde(rename = "Location", alias = "location", default)]
    pub location: String,
    #[serde(rename = "Version", alias = "version", default)]
    pub version: String,
    #[serde(rename = "DriverName", alias = "drivername", default)]
    pub driver_name: String,
    #[serde(rename = "DataType", alias = "datatype", default)]
    pub data_type: String,
    #[serde(rename = "PrintProcessor", alias = "printprocessor", default)]
    pub print_processor: String,
    /// Printing preferences applied after the queue is committed.
    #[serde(rename = "PreferenceFile", alias = "preferencefile", default, skip_serializing_if = "Option::is_none")]
    pub preference_file: Option<String>,
    #[serde(rename = "PrinterPort", alias = "printerport", default)]
    pub port: Option<PrinterPort>,
}

impl Printer {
    /// Name of the owned port, if one is attached.
    pub fn port_name(&self) -> Option<&str> {
        self.port.as_ref().map(|p| p.name.as_str())
    }

    /// Hydrate from the host's view of the queue, attaching `port` if the
    /// host still has it. Unreported strings read as empty.
    pub fn from_record(record: &PrinterRecord, port: Option<PrinterPort>) -> Self {
        Self {
            name: record.name.clone(),
            location: record.location.clone().unwrap_or_default(),
            version: String::new(),
            driver_name: record.driver_name.clone().unwrap_or_default(),
            data_type: record.data_type.clone().unwrap_or_default(),
            print_processor: record.print_processor.clone().unwrap_or_default(),
            preference_file: None,
            port,
        }
    }

    /// The record the host should hold for this printer.
    pub fn to_record(&self) -> PrinterRecord {
        PrinterRecord {
            name: self.name.clone(),
            location: Some(self.location.clone()),
            driver_name: Some(self.driver_name.clone()),
            data_type: Some(self.data_type.clone()),
            print_processor: Some(self.print_processor.clone()),
            port_name: self.port_name().map(str::to_string),
        }
    }

    /// Name, driver, data type, and print processor must all be set.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("PrinterName", &self.name),
            ("DriverName", &self.driver_name),
            ("DataType", &self.data_type),
            ("PrintProcessor", &self.print_processor),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PrintuneError::MissingRequiredField {
                    entity: "Printer",
                    field,
                });
            }
        }
        Ok(())
    }

    /// Whether committing this printer against `observed` would write anything.
    pub fn changes_pending(&self, observed: Option<&PrinterRecord>) -> bool {
        let Some(observed) = observed else {
            return true;
        };

        fn differs(desired: &str, observed: &Option<String>) -> bool {
            desired != observed.as_deref().unwrap_or_default()
        }

        self.name != observed.name
            || differs(&self.location, &observed.location)
            || differs(&self.driver_name, &observed.driver_name)
            || differs(&self.data_type, &observed.data_type)
            || differs(&self.print_processor, &observed.print_processor)
    }

    /// Pretty JSON in the same shape configuration documents use.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
