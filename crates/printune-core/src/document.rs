// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer configuration documents.
//
// A document is JSON holding either one printer object or an array of them.
// `//` and `/* */` comments are permitted and property names are matched
// case-insensitively (keys are folded to lowercase before deserializing).

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PrintuneError, Result};
use crate::printer::Printer;

/// Parse every printer definition in a configuration document.
pub fn load_printers(content: &str) -> Result<Vec<Printer>> {
    let stripped = strip_comments(content);
    let root: Value = serde_json::from_str(&stripped).map_err(|e| {
        PrintuneError::Configuration(format!("the configuration document is not valid JSON: {e}"))
    })?;

    let entries = match fold_keys(root) {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(PrintuneError::Configuration(format!(
                "expected a printer object or an array of printers, found {}",
                json_kind(&other)
            )));
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Printer>(entry).map_err(|e| {
                PrintuneError::Configuration(format!("printer entry {index} could not be parsed: {e}"))
            })
        })
        .collect()
}

/// Select the single printer named `printer_name` from a document.
///
/// More than one definition with that name is ambiguous; none at all is an
/// invalid identifier. The selected definition (and its port, if declared)
/// must carry every required field.
pub fn printer_from_config(printer_name: &str, content: &str) -> Result<Printer> {
    let printers = load_printers(content)?;
    debug!(count = printers.len(), "printer definitions loaded");

    let mut matching = printers.into_iter().filter(|p| p.name == printer_name);
    let printer = matching.next().ok_or_else(|| {
        PrintuneError::InvalidIdentifier(format!(
            "the configuration document does not contain a printer named '{printer_name}'"
        ))
    })?;
    if matching.next().is_some() {
        return Err(PrintuneError::ConfigurationAmbiguous(format!(
            "the configuration document contains more than one printer named '{printer_name}'"
        )));
    }

    printer.validate()?;
    if let Some(port) = &printer.port {
        port.validate_declared()?;
    }
    Ok(printer)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lowercase every object key, recursively.
fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), fold_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

/// Remove `//` line comments and `/* */` block comments outside of strings.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
    // Lab printers
    [
        {
            "PrinterName": "Lab Color",
            "location": "Building 2 // east wing",
            "DRIVERNAME": "HP Universal Printing PCL 6",
            "DataType": "RAW",
            "PrintProcessor": "winprint",
            /* port is created on demand */
            "PrinterPort": {
                "PortName": "IP_10.0.0.5",
                "HostAddress": "10.0.0.5",
                "PortNumber": 9100,
                "snmpenabled": true,
                "SNMPDevIndex": 1
            }
        },
        {
            "PrinterName": "Front Desk",
            "DriverName": "Generic / Text Only",
            "DataType": "RAW",
            "PrintProcessor": "winprint"
        }
    ]
    "#;

    #[test]
    fn loads_array_with_comments_and_mixed_case_keys() {
        let printers = load_printers(DOCUMENT).expect("load");
        assert_eq!(printers.len(), 2);

        let lab = &printers[0];
        assert_eq!(lab.location, "Building 2 // east wing");
        assert_eq!(lab.driver_name, "HP Universal Printing PCL 6");
        let port = lab.port.as_ref().expect("port");
        assert_eq!(port.port_number, 9100);
        assert!(port.snmp_enabled);
        assert_eq!(port.snmp_dev_index, 1);
        assert_eq!(port.protocol, crate::types::PROTOCOL_RAW);
    }

    #[test]
    fn single_object_document() {
        let printers = load_printers(r#"{ "PrinterName": "Solo", "DriverName": "d" }"#).expect("load");
        assert_eq!(printers.len(), 1);
        assert_eq!(printers[0].name, "Solo");
    }

    #[test]
    fn selects_printer_by_name() {
        let printer = printer_from_config("Lab Color", DOCUMENT).expect("select");
        assert_eq!(printer.port_name(), Some("IP_10.0.0.5"));
    }

    #[test]
    fn unknown_name_is_invalid_identifier() {
        let err = printer_from_config("Basement", DOCUMENT).unwrap_err();
        assert!(matches!(err, PrintuneError::InvalidIdentifier(_)));
    }

    #[test]
    fn duplicate_name_is_ambiguous() {
        let doc = r#"[
            { "PrinterName": "Dup", "DriverName": "a", "DataType": "RAW", "PrintProcessor": "winprint" },
            { "PrinterName": "Dup", "DriverName": "b", "DataType": "RAW", "PrintProcessor": "winprint" }
        ]"#;
        let err = printer_from_config("Dup", doc).unwrap_err();
        assert!(matches!(err, PrintuneError::ConfigurationAmbiguous(_)));
    }

    #[test]
    fn selected_printer_must_be_complete() {
        let doc = r#"{ "PrinterName": "Half", "DriverName": "a" }"#;
        let err = printer_from_config("Half", doc).unwrap_err();
        assert!(matches!(err, PrintuneError::MissingRequiredField { field: "DataType", .. }));
    }

    #[test]
    fn declared_port_must_be_creatable() {
        let doc = r#"{
            "PrinterName": "P", "DriverName": "a", "DataType": "RAW", "PrintProcessor": "winprint",
            "PrinterPort": { "PortName": "IP_x", "PortNumber": 9100 }
        }"#;
        let err = printer_from_config("P", doc).unwrap_err();
        assert!(matches!(err, PrintuneError::MissingRequiredField { field: "HostAddress", .. }));
    }

    #[test]
    fn scalar_root_is_a_configuration_error() {
        let err = load_printers("42").unwrap_err();
        assert!(matches!(err, PrintuneError::Configuration(_)));
        let err = load_printers("{ not json").unwrap_err();
        assert!(matches!(err, PrintuneError::Configuration(_)));
    }
}
