//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use feedwatch_config::ConfigError;
use feedwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAVAILABLE: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(feedwatch::not_found),
        help("Run: feedwatch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Feed data source unavailable: {message}")]
    #[diagnostic(
        code(feedwatch::unavailable),
        help("The backend reported a temporary failure. Try again shortly.")
    )]
    Unavailable { message: String },

    #[error("{operation} timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(feedwatch::timeout),
        help("Raise advanced.timeout in the config file or retry.")
    )]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    #[diagnostic(code(feedwatch::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(feedwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration: {field}: {reason}")]
    #[diagnostic(
        code(feedwatch::config_invalid),
        help(
            "Fix the value in {path}\n\
             or override it with a FEEDWATCH_ environment variable."
        )
    )]
    ConfigInvalid {
        field: String,
        reason: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(feedwatch::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(feedwatch::config_write))]
    ConfigWrite(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(feedwatch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unavailable { .. } => exit_code::UNAVAILABLE,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ConfigInvalid { .. } | Self::Config(_) | Self::ConfigWrite(_) => {
                exit_code::CONFIG
            }
            Self::Internal { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Timeout {
                operation,
                timeout_ms,
            } => CliError::Timeout {
                operation,
                timeout_ms,
            },

            CoreError::Unavailable { message } => CliError::Unavailable { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let resource_type = entity_type.to_lowercase();
                CliError::NotFound {
                    list_command: format!("{resource_type}s list"),
                    resource_type,
                    identifier,
                }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::ConfigInvalid {
                field: "config".into(),
                reason: message,
                path: feedwatch_config::config_path().display().to_string(),
            },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::ConfigInvalid {
                field,
                reason,
                path: feedwatch_config::config_path().display().to_string(),
            },
            ConfigError::Figment(inner) => CliError::Config(inner),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
