// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parser for `pnputil /enum-drivers` output.
//
// The tool prints a banner followed by one block per driver package:
//
//     Published Name:     oem12.inf
//     Original Name:      hpcu250u.inf
//     Provider Name:      HP
//     Class Name:         Printers
//     Class GUID:         {4d36e979-e325-11ce-bfc1-08002be10318}
//     Driver Version:     03/14/2024 61.250.1.24832
//     Signer Name:        Microsoft Windows Hardware Compatibility Publisher
//
// Blocks start at each "Published Name:" label. Fields may appear in any
// order within a block and labels this parser does not know are ignored.

use std::sync::LazyLock;

use chrono::NaiveDate;
use printune_core::driver::{DriverRecord, DriverVersion};
use printune_core::error::{PrintuneError, Result};
use regex::Regex;

const PUBLISHED_NAME: &str = "Published Name";
const ORIGINAL_NAME: &str = "Original Name";
const PROVIDER_NAME: &str = "Provider Name";
const CLASS_NAME: &str = "Class Name";
const CLASS_GUID: &str = "Class GUID";
const DRIVER_VERSION: &str = "Driver Version";
const SIGNER_NAME: &str = "Signer Name";

/// Date layout of the first `Driver Version:` token.
const DRIVER_DATE_FORMAT: &str = "%m/%d/%Y";

static BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Published Name:").expect("static regex"));

static PUBLISHED_NAME_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^oem\d+\.inf$").expect("static regex"));

/// One `(?i)<label>:[ \t]*(<rest of line>)` pattern per known label.
static FIELD_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        PUBLISHED_NAME,
        ORIGINAL_NAME,
        PROVIDER_NAME,
        CLASS_NAME,
        CLASS_GUID,
        DRIVER_VERSION,
        SIGNER_NAME,
    ]
    .into_iter()
    .map(|label| {
        let pattern = format!(r"(?i){}:[ \t]*([^\r\n]*)", regex::escape(label));
        (label, Regex::new(&pattern).expect("static regex"))
    })
    .collect()
});

/// Whether `name` has the `oem<digits>.inf` shape of a published name.
pub fn is_published_name(name: &str) -> bool {
    PUBLISHED_NAME_FORMAT.is_match(name.trim())
}

/// Parse enumeration output into driver records, in output order.
///
/// Empty input (or a banner with no blocks) yields an empty list. A block
/// missing a required field, or carrying an unparsable version line, fails
/// the whole parse with `MalformedOutput`.
pub fn parse_catalog(output: &str) -> Result<Vec<DriverRecord>> {
    split_blocks(output)
        .into_iter()
        .filter(|block| !block.trim().is_empty())
        .map(parse_block)
        .collect()
}

fn split_blocks(output: &str) -> Vec<&str> {
    let starts: Vec<usize> = BLOCK_START.find_iter(output).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(output.len());
            &output[start..end]
        })
        .collect()
}

fn field<'b>(block: &'b str, label: &str) -> Option<&'b str> {
    let (_, pattern) = FIELD_PATTERNS.iter().find(|(l, _)| *l == label)?;
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

fn required<'b>(block: &'b str, label: &'static str) -> Result<&'b str> {
    field(block, label).ok_or_else(|| malformed(label, block))
}

fn malformed(label: &'static str, block: &str) -> PrintuneError {
    PrintuneError::MalformedOutput {
        field: label,
        block: block.trim_end().to_string(),
    }
}

fn parse_block(block: &str) -> Result<DriverRecord> {
    let published_name = required(block, PUBLISHED_NAME)?;
    if !is_published_name(published_name) {
        return Err(malformed(PUBLISHED_NAME, block));
    }

    let (driver_version_date, driver_version) =
        parse_version_line(required(block, DRIVER_VERSION)?).ok_or_else(|| malformed(DRIVER_VERSION, block))?;

    Ok(DriverRecord {
        published_name: published_name.to_string(),
        original_name: required(block, ORIGINAL_NAME)?.to_string(),
        provider_name: required(block, PROVIDER_NAME)?.to_string(),
        class_name: required(block, CLASS_NAME)?.to_string(),
        class_guid: required(block, CLASS_GUID)?.to_string(),
        driver_version,
        driver_version_date,
        signer_name: field(block, SIGNER_NAME).map(str::to_string),
    })
}

/// `03/14/2024 61.250.1.24832` → (date, version).
fn parse_version_line(value: &str) -> Option<(NaiveDate, DriverVersion)> {
    let mut tokens = value.split_whitespace();
    let date = NaiveDate::parse_from_str(tokens.next()?, DRIVER_DATE_FORMAT).ok()?;
    let version = tokens.next()?.parse().ok()?;
    Some((date, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TWO_DRIVERS: &str = "Microsoft PnP Utility\r\n\
\r\n\
Published Name:     oem12.inf\r\n\
Original Name:      hpcu250u.inf\r\n\
Provider Name:      HP\r\n\
Class Name:         Printers\r\n\
Class GUID:         {4d36e979-e325-11ce-bfc1-08002be10318}\r\n\
Driver Version:     03/14/2024 61.250.1.24832\r\n\
Signer Name:        Microsoft Windows Hardware Compatibility Publisher\r\n\
\r\n\
Published Name:     oem7.inf\r\n\
Original Name:      prnms009.inf\r\n\
Provider Name:      Microsoft\r\n\
Class Name:         Printers\r\n\
Class GUID:         {4d36e979-e325-11ce-bfc1-08002be10318}\r\n\
Class Version:      4.0\r\n\
Driver Version:     06/21/2006 10.0.19041.1\r\n\
\r\n";

    #[test]
    fn parses_blocks_in_order() {
        let records = parse_catalog(TWO_DRIVERS).unwrap();
        assert_eq!(records.len(), 2);

        let hp = &records[0];
        assert_eq!(hp.published_name, "oem12.inf");
        assert_eq!(hp.original_name, "hpcu250u.inf");
        assert_eq!(hp.provider_name, "HP");
        assert_eq!(hp.class_guid, "{4d36e979-e325-11ce-bfc1-08002be10318}");
        assert_eq!(hp.driver_version, DriverVersion::new(61, 250, 1, 24832));
        assert_eq!(hp.driver_version_date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(
            hp.signer_name.as_deref(),
            Some("Microsoft Windows Hardware Compatibility Publisher")
        );

        let ms = &records[1];
        assert_eq!(ms.published_name, "oem7.inf");
        assert_eq!(ms.signer_name, None);
    }

    #[test]
    fn empty_and_banner_only_input_yield_nothing() {
        assert!(parse_catalog("").unwrap().is_empty());
        assert!(parse_catalog("Microsoft PnP Utility\r\n\r\n").unwrap().is_empty());
    }

    #[test]
    fn field_before_block_start_is_banner() {
        let text = "Driver Version: 01/02/2020 1.0.0.0\n\
Published Name: OEM3.INF\n\
Class GUID: {guid}\n\
Class Name: Printers\n\
Provider Name: Acme\n\
Original Name: acme.inf\n";
        let err = parse_catalog(text).unwrap_err();
        assert!(matches!(err, PrintuneError::MalformedOutput { field: "Driver Version", .. }));
    }

    #[test]
    fn field_order_does_not_matter() {
        let reordered = "Published Name: OEM3.INF\n\
Class GUID: {guid}\n\
Driver Version: 01/02/2020 1.0.0.0\n\
Original Name: acme.inf\n\
Class Name: Printers\n\
Provider Name: Acme\n";
        let records = parse_catalog(reordered).unwrap();
        assert_eq!(records[0].published_name, "OEM3.INF");
        assert_eq!(records[0].original_name, "acme.inf");
        assert_eq!(records[0].provider_name, "Acme");
        assert_eq!(records[0].driver_version, DriverVersion::new(1, 0, 0, 0));
    }

    #[test]
    fn missing_field_names_the_field_and_keeps_the_block() {
        let block = "Published Name: oem1.inf\nOriginal Name: a.inf\nProvider Name: A\nClass Name: Printers\nDriver Version: 01/02/2020 1.0.0.0\n";
        match parse_catalog(block).unwrap_err() {
            PrintuneError::MalformedOutput { field, block } => {
                assert_eq!(field, "Class GUID");
                assert!(block.contains("oem1.inf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_version_line_is_malformed() {
        let base = "Published Name: oem1.inf\nOriginal Name: a.inf\nProvider Name: A\nClass Name: Printers\nClass GUID: {g}\n";
        for line in [
            "Driver Version: 61.250.1.24832\n",
            "Driver Version: 2024-03-14 61.250.1.24832\n",
            "Driver Version: 03/14/2024 61.250\n",
        ] {
            let err = parse_catalog(&format!("{base}{line}")).unwrap_err();
            assert!(matches!(err, PrintuneError::MalformedOutput { field: "Driver Version", .. }));
        }
    }

    #[test]
    fn published_name_must_be_oem_inf() {
        let block = "Published Name: hp.inf\nOriginal Name: a.inf\nProvider Name: A\nClass Name: P\nClass GUID: {g}\nDriver Version: 01/02/2020 1.0.0.0\n";
        let err = parse_catalog(block).unwrap_err();
        assert!(matches!(err, PrintuneError::MalformedOutput { field: "Published Name", .. }));
        assert!(is_published_name(" oem42.INF "));
        assert!(!is_published_name("oem.inf"));
    }

    fn block_text(index: u32) -> String {
        format!(
            "Published Name:     oem{index}.inf\n\
Original Name:      drv{index}.inf\n\
Provider Name:      Vendor {index}\n\
Class Name:         Printers\n\
Class GUID:         {{4d36e979-e325-11ce-bfc1-08002be10318}}\n\
Driver Version:     0{m}/1{d}/2021 {index}.0.0.{index}\n\n",
            m = index % 9 + 1,
            d = index % 9,
        )
    }

    proptest! {
        #[test]
        fn record_count_equals_block_count(count in 0u32..20) {
            let mut text = String::from("Microsoft PnP Utility\n\n");
            for i in 0..count {
                text.push_str(&block_text(i));
            }
            let records = parse_catalog(&text).unwrap();
            prop_assert_eq!(records.len() as u32, count);
            prop_assert_eq!(text.matches("Published Name:").count() as u32, count);
        }

        #[test]
        fn arbitrary_input_never_panics(input in "\\PC*") {
            let _ = parse_catalog(&input);
        }

        #[test]
        fn labelled_noise_never_panics(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("Published Name: ".to_string()),
                    Just("Driver Version: ".to_string()),
                    Just("Original Name:".to_string()),
                    "[ -~]{0,12}",
                    Just("\r\n".to_string()),
                ],
                0..40,
            )
        ) {
            let _ = parse_catalog(&parts.concat());
        }
    }
}
