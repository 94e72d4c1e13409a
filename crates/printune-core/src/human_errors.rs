// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for administrators running Printune.
//
// Every technical error is mapped to plain English with a suggestion and a
// process exit code. Severity decides whether re-running can help.

use crate::error::PrintuneError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Host state may settle (spooler busy, file locked); re-running can help.
    Transient,
    /// The operator must change something (elevate, fix the config file).
    ActionRequired,
    /// Re-running the same invocation will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    pub severity: Severity,
    /// Exit code a command-line front end should return.
    pub exit_code: i32,
}

/// Exit codes reported per error kind.
pub mod exit_codes {
    pub const INVALID_IDENTIFIER: i32 = 2;
    pub const MISSING_FIELD: i32 = 3;
    pub const ELEVATION_REQUIRED: i32 = 5;
    pub const EXTERNAL_TOOL: i32 = 10;
    pub const MALFORMED_OUTPUT: i32 = 11;
    pub const CONFIGURATION: i32 = 20;
    pub const CONFIGURATION_AMBIGUOUS: i32 = 21;
    pub const INTERNAL: i32 = 70;
    pub const CATALOG: i32 = 74;
    pub const PLATFORM_UNAVAILABLE: i32 = 78;
    pub const IO: i32 = 74;
}

/// Convert a `PrintuneError` into a `HumanError`.
///
/// `Operation` wrappers are looked through: the cause decides the advice and
/// the wrapper's context is prefixed to the message.
pub fn humanize_error(err: &PrintuneError) -> HumanError {
    match err {
        PrintuneError::Operation { context, source } => {
            let mut inner = humanize_error(source);
            inner.message = format!("{context}: {}", inner.message);
            inner
        }

        PrintuneError::InvalidIdentifier(detail) => HumanError {
            message: format!("Nothing matches '{detail}'."),
            suggestion: "Check the spelling of the printer, driver, or file name. Published driver names look like oem12.inf.".into(),
            severity: Severity::Permanent,
            exit_code: exit_codes::INVALID_IDENTIFIER,
        },

        PrintuneError::MissingRequiredField { entity, field } => HumanError {
            message: format!("The {entity} definition has no {field}."),
            suggestion: format!("Add a \"{field}\" value to the configuration file and run again."),
            severity: Severity::ActionRequired,
            exit_code: exit_codes::MISSING_FIELD,
        },

        PrintuneError::ElevationRequired(_) => HumanError {
            message: "This needs administrator rights.".into(),
            suggestion: "Run the command again from an elevated (Run as administrator) prompt.".into(),
            severity: Severity::ActionRequired,
            exit_code: exit_codes::ELEVATION_REQUIRED,
        },

        PrintuneError::ExternalTool {
            command_line,
            exit_code: None,
            ..
        } => HumanError {
            message: format!("Could not start {command_line}."),
            suggestion: "Check that the tool exists at the configured path.".into(),
            severity: Severity::Permanent,
            exit_code: exit_codes::EXTERNAL_TOOL,
        },

        PrintuneError::ExternalTool {
            command_line,
            exit_code: Some(code),
            error,
            ..
        } => HumanError {
            message: format!("{command_line} exited with code {code}."),
            suggestion: if error.trim().is_empty() {
                "Run the command by hand to see the full output.".into()
            } else {
                format!("The tool said: {}", error.trim())
            },
            severity: Severity::Transient,
            exit_code: exit_codes::EXTERNAL_TOOL,
        },

        PrintuneError::MalformedOutput { field, .. } => HumanError {
            message: format!("The driver list could not be read (bad '{field}' entry)."),
            suggestion: "The installed pnputil may print a format this version does not understand. Please report it with the tool output.".into(),
            severity: Severity::Permanent,
            exit_code: exit_codes::MALFORMED_OUTPUT,
        },

        PrintuneError::Configuration(detail) => HumanError {
            message: "The configuration file could not be read.".into(),
            suggestion: format!("Fix the file and run again. ({detail})"),
            severity: Severity::ActionRequired,
            exit_code: exit_codes::CONFIGURATION,
        },

        PrintuneError::ConfigurationAmbiguous(_) => HumanError {
            message: "The configuration file defines the same printer twice.".into(),
            suggestion: "Keep one definition per printer name.".into(),
            severity: Severity::ActionRequired,
            exit_code: exit_codes::CONFIGURATION_AMBIGUOUS,
        },

        PrintuneError::InternalInconsistency(detail) => HumanError {
            message: "Printune hit an internal inconsistency.".into(),
            suggestion: format!("Please report this. ({detail})"),
            severity: Severity::Permanent,
            exit_code: exit_codes::INTERNAL,
        },

        PrintuneError::Catalog(_) => HumanError {
            message: "The print subsystem refused the request.".into(),
            suggestion: "Make sure the Print Spooler service is running, then try again.".into(),
            severity: Severity::Transient,
            exit_code: exit_codes::CATALOG,
        },

        PrintuneError::PlatformUnavailable => HumanError {
            message: "Printer management isn't available on this system.".into(),
            suggestion: "Run Printune on a Windows host.".into(),
            severity: Severity::Permanent,
            exit_code: exit_codes::PLATFORM_UNAVAILABLE,
        },

        PrintuneError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file couldn't be found.".into(),
                suggestion: "Check the path and try again.".into(),
                severity: Severity::ActionRequired,
                exit_code: exit_codes::IO,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Access to a file was denied.".into(),
                suggestion: "Check the file permissions or run from an elevated prompt.".into(),
                severity: Severity::ActionRequired,
                exit_code: exit_codes::IO,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If it keeps happening, the file may be locked by another program.".into(),
                severity: Severity::Transient,
                exit_code: exit_codes::IO,
            },
        },

        PrintuneError::Serialization(_) => HumanError {
            message: "A JSON document could not be read or written.".into(),
            suggestion: "Check the file is valid JSON.".into(),
            severity: Severity::ActionRequired,
            exit_code: exit_codes::CONFIGURATION,
        },
    }
}
