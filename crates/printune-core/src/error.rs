// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Printune.
//
// Absence (a printer, port, or driver that is not on the host) is never an
// error; lookups return `Option`. Everything here is a genuine failure.

use thiserror::Error;

/// Top-level error type for all Printune operations.
#[derive(Debug, Error)]
pub enum PrintuneError {
    // -- Identity / input errors --
    #[error("invalid name or path: {0}")]
    InvalidIdentifier(String),

    #[error("{entity} is missing required field '{field}'")]
    MissingRequiredField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("elevated (administrator) privileges are required: {0}")]
    ElevationRequired(String),

    // -- External tools --
    #[error("{command_line} failed{}", exit_suffix(.exit_code))]
    ExternalTool {
        command_line: String,
        /// `None` when the process could not be started at all.
        exit_code: Option<i32>,
        output: String,
        error: String,
    },

    #[error("malformed external tool output: missing or invalid '{field}' in block:\n{block}")]
    MalformedOutput { field: &'static str, block: String },

    // -- Configuration documents --
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("ambiguous configuration: {0}")]
    ConfigurationAmbiguous(String),

    // -- Reconciliation --
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("{context}")]
    Operation {
        context: String,
        #[source]
        source: Box<PrintuneError>,
    },

    // -- Platform --
    #[error("system catalog error: {0}")]
    Catalog(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrintuneError {
    /// Wrap `self` as the cause of a failed system-level operation.
    pub fn during(self, context: impl Into<String>) -> Self {
        PrintuneError::Operation {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through `Operation` wrappers.
    pub fn root_cause(&self) -> &PrintuneError {
        match self {
            PrintuneError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn exit_suffix(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" with exit code {code}"),
        None => " to start".to_string(),
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintuneError>;
