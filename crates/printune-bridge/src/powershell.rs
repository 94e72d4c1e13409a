// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows system catalog driven through PowerShell.
//
// Queries go through the PrintManagement cmdlets and the CIM printer-port
// class, rendered with `ConvertTo-Json` and deserialized into snapshots.
// Writes are single cmdlet invocations; a non-zero exit is a catalog error.

use std::path::PathBuf;
use std::process::Command;

use printune_core::error::{PrintuneError, Result};
use printune_core::types::{PortRecord, PrinterDriverRecord, PrinterRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::traits::*;

const PORT_CLASS: &str = "Win32_TCPIPPrinterPort";
const PORT_FIELDS: &str =
    "Name,HostAddress,PortNumber,Protocol,Caption,Queue,ByteCount,SNMPEnabled,SNMPCommunity,SNMPDevIndex";
const PRINTER_FIELDS: &str = "Name,Location,DriverName,Datatype,PrintProcessor,PortName";
const DRIVER_FIELDS: &str = "Name,InfPath,Provider,DriverVersion";
const PRINT_PROCESSORS_KEY: &str =
    r"HKLM:\SYSTEM\CurrentControlSet\Control\Print\Environments\*\Print Processors\*";
const IS_ADMIN: &str = "([Security.Principal.WindowsPrincipal][Security.Principal.WindowsIdentity]::GetCurrent()).IsInRole([Security.Principal.WindowsBuiltInRole]::Administrator)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PrinterRow {
    name: String,
    location: Option<String>,
    driver_name: Option<String>,
    datatype: Option<String>,
    print_processor: Option<String>,
    port_name: Option<String>,
}

impl From<PrinterRow> for PrinterRecord {
    fn from(row: PrinterRow) -> Self {
        PrinterRecord {
            name: row.name,
            location: row.location,
            driver_name: row.driver_name,
            data_type: row.datatype,
            print_processor: row.print_processor,
            port_name: row.port_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PortRow {
    name: String,
    host_address: Option<String>,
    port_number: Option<u32>,
    protocol: Option<u32>,
    caption: Option<String>,
    queue: Option<String>,
    byte_count: Option<bool>,
    #[serde(rename = "SNMPEnabled")]
    snmp_enabled: Option<bool>,
    #[serde(rename = "SNMPCommunity")]
    snmp_community: Option<String>,
    #[serde(rename = "SNMPDevIndex")]
    snmp_dev_index: Option<u32>,
}

impl From<PortRow> for PortRecord {
    fn from(row: PortRow) -> Self {
        PortRecord {
            name: row.name,
            host_address: row.host_address,
            port_number: row.port_number,
            protocol: row.protocol,
            caption: row.caption,
            queue: row.queue,
            byte_count: row.byte_count,
            snmp_enabled: row.snmp_enabled,
            snmp_community: row.snmp_community,
            snmp_dev_index: row.snmp_dev_index,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DriverRow {
    name: String,
    inf_path: Option<String>,
    provider: Option<String>,
    driver_version: Option<u64>,
}

impl From<DriverRow> for PrinterDriverRecord {
    fn from(row: DriverRow) -> Self {
        PrinterDriverRecord {
            name: row.name,
            inf_path: row.inf_path,
            provider: row.provider,
            driver_version: row.driver_version,
        }
    }
}

/// System catalog for Windows hosts.
pub struct PowerShellCatalog {
    executable: PathBuf,
}

impl Default for PowerShellCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerShellCatalog {
    pub fn new() -> Self {
        Self::with_executable("powershell.exe")
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Run `script` and return its standard output.
    fn run(&self, script: &str) -> Result<String> {
        debug!(script, "running PowerShell");
        let output = Command::new(&self.executable)
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .output()
            .map_err(|e| {
                PrintuneError::Catalog(format!("failed to start {}: {e}", self.executable.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintuneError::Catalog(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn query<T: DeserializeOwned>(&self, pipeline: &str, fields: &str) -> Result<Vec<T>> {
        let script = format!(
            "ConvertTo-Json -Compress -Depth 2 -InputObject @({pipeline} | Select-Object {fields})"
        );
        parse_rows(&self.run(&script)?)
    }
}

/// Quote `value` as a PowerShell single-quoted literal.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn where_name(name: &str) -> String {
    format!("Where-Object {{ $_.Name -eq {} }}", ps_quote(name))
}

/// Deserialize `ConvertTo-Json` output. Empty output is an empty list and a
/// lone object is a one-element list.
fn parse_rows<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(trimmed)?;
    let rows = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(PrintuneError::from))
        .collect()
}

/// `@{Name='..'; Protocol=[uint32]1; ...}` holding only the fields `record` sets.
fn port_properties(record: &PortRecord) -> String {
    let mut props = vec![format!("Name={}", ps_quote(&record.name))];
    let strings = [
        ("HostAddress", &record.host_address),
        ("Caption", &record.caption),
        ("Queue", &record.queue),
        ("SNMPCommunity", &record.snmp_community),
    ];
    for (key, value) in strings {
        if let Some(value) = value {
            props.push(format!("{key}={}", ps_quote(value)));
        }
    }
    let numbers = [
        ("PortNumber", record.port_number),
        ("Protocol", record.protocol),
        ("SNMPDevIndex", record.snmp_dev_index),
    ];
    for (key, value) in numbers {
        if let Some(value) = value {
            props.push(format!("{key}=[uint32]{value}"));
        }
    }
    let flags = [
        ("ByteCount", record.byte_count),
        ("SNMPEnabled", record.snmp_enabled),
    ];
    for (key, value) in flags {
        if let Some(value) = value {
            props.push(format!("{key}=${value}"));
        }
    }
    format!("@{{{}}}", props.join("; "))
}

/// `-Name '..' -DriverName '..' ...` for the printer cmdlets.
fn printer_arguments(record: &PrinterRecord) -> String {
    let mut args = vec![format!("-Name {}", ps_quote(&record.name))];
    let optional = [
        ("DriverName", &record.driver_name),
        ("Datatype", &record.data_type),
        ("PrintProcessor", &record.print_processor),
        ("Location", &record.location),
        ("PortName", &record.port_name),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            args.push(format!("-{key} {}", ps_quote(value)));
        }
    }
    args.join(" ")
}

impl SystemCatalog for PowerShellCatalog {
    fn platform_name(&self) -> &str {
        "Windows (PowerShell)"
    }
}

impl PrinterCatalog for PowerShellCatalog {
    fn find_printer(&self, name: &str) -> Result<Option<PrinterRecord>> {
        let rows: Vec<PrinterRow> =
            self.query(&format!("Get-Printer | {}", where_name(name)), PRINTER_FIELDS)?;
        Ok(rows.into_iter().next().map(PrinterRecord::from))
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        let rows: Vec<PrinterRow> = self.query("Get-Printer", PRINTER_FIELDS)?;
        Ok(rows.into_iter().map(PrinterRecord::from).collect())
    }

    fn add_printer_by_existing_port(&self, record: &PrinterRecord) -> Result<()> {
        self.run(&format!("Add-Printer {}", printer_arguments(record)))
            .map(drop)
    }

    fn put_printer(&self, record: &PrinterRecord) -> Result<()> {
        self.run(&format!("Set-Printer {}", printer_arguments(record)))
            .map(drop)
    }

    fn delete_printer(&self, name: &str) -> Result<()> {
        self.run(&format!("Remove-Printer -Name {}", ps_quote(name)))
            .map(drop)
    }
}

impl PortCatalog for PowerShellCatalog {
    fn find_port(&self, name: &str) -> Result<Option<PortRecord>> {
        let pipeline = format!("Get-CimInstance -ClassName {PORT_CLASS} | {}", where_name(name));
        let rows: Vec<PortRow> = self.query(&pipeline, PORT_FIELDS)?;
        Ok(rows.into_iter().next().map(PortRecord::from))
    }

    fn create_port(&self, record: &PortRecord) -> Result<()> {
        self.run(&format!(
            "New-CimInstance -ClassName {PORT_CLASS} -Property {} | Out-Null",
            port_properties(record)
        ))
        .map(drop)
    }

    fn put_port(&self, record: &PortRecord) -> Result<()> {
        self.run(&format!(
            "Get-CimInstance -ClassName {PORT_CLASS} | {} | Set-CimInstance -Property {}",
            where_name(&record.name),
            port_properties(record)
        ))
        .map(drop)
    }

    fn delete_port(&self, name: &str) -> Result<()> {
        self.run(&format!("Remove-PrinterPort -Name {}", ps_quote(name)))
            .map(drop)
    }
}

impl DriverCatalog for PowerShellCatalog {
    fn find_printer_driver(&self, name: &str) -> Result<Option<PrinterDriverRecord>> {
        let pipeline = format!("Get-PrinterDriver | {}", where_name(name));
        let rows: Vec<DriverRow> = self.query(&pipeline, DRIVER_FIELDS)?;
        Ok(rows.into_iter().next().map(PrinterDriverRecord::from))
    }

    fn list_printer_drivers(&self) -> Result<Vec<PrinterDriverRecord>> {
        let rows: Vec<DriverRow> = self.query("Get-PrinterDriver", DRIVER_FIELDS)?;
        Ok(rows.into_iter().map(PrinterDriverRecord::from).collect())
    }

    fn add_printer_driver(&self, name: &str) -> Result<()> {
        self.run(&format!("Add-PrinterDriver -Name {}", ps_quote(name)))
            .map(drop)
    }

    fn delete_printer_driver(&self, name: &str) -> Result<()> {
        self.run(&format!("Remove-PrinterDriver -Name {}", ps_quote(name)))
            .map(drop)
    }
}

impl PrintProcessorCatalog for PowerShellCatalog {
    fn list_print_processors(&self) -> Result<Vec<String>> {
        let script = format!(
            "Get-Item -Path '{PRINT_PROCESSORS_KEY}' | ForEach-Object PSChildName | Sort-Object -Unique"
        );
        let stdout = self.run(&script)?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl HostEnvironment for PowerShellCatalog {
    fn is_elevated(&self) -> Result<bool> {
        let stdout = self.run(IS_ADMIN)?;
        match stdout.trim() {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(PrintuneError::Catalog(format!(
                "unexpected elevation check output: {other}"
            ))),
        }
    }
}
