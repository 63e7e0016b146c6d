//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use homepilot_config::ConfigError;
use homepilot_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Hub ──────────────────────────────────────────────────────────
    #[error("Homepilot hub request failed")]
    #[diagnostic(
        code(homepilot::hub_unavailable),
        help(
            "Check that the hub is powered and reachable from this machine.\n\
             Try: homepilot discover -vv"
        )
    )]
    HubUnavailable {
        #[source]
        source: CoreError,
    },

    #[error("Unexpected response from the hub: {message}")]
    #[diagnostic(code(homepilot::unexpected_response))]
    UnexpectedResponse { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Blind '{identifier}' not found")]
    #[diagnostic(
        code(homepilot::not_found),
        help("Run: homepilot discover to see available blinds")
    )]
    NotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(homepilot::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No hub URL configured")]
    #[diagnostic(
        code(homepilot::no_config),
        help(
            "Pass --url, set HOMEPILOT_URL, or create a config file with:\n\
             homepilot config init --url http://<hub-address>\n\
             Expected at: {path}"
        )
    )]
    NoUrl { path: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(homepilot::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(homepilot::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(homepilot::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(homepilot::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::HubUnavailable { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NoUrl { .. } => exit_code::USAGE,
            Self::UnexpectedResponse { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Toml(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AccessoryNotFound { identifier } => Self::NotFound { identifier },

            CoreError::InvalidPosition { value } => Self::Validation {
                field: "position".into(),
                reason: format!("{value} is outside 0-100"),
            },

            CoreError::ReadOnly { characteristic } => Self::Validation {
                field: "characteristic".into(),
                reason: format!("{characteristic} cannot be written"),
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Discovery { message } => Self::UnexpectedResponse { message },

            err @ CoreError::PositionUnavailable { .. } => Self::UnexpectedResponse {
                message: err.to_string(),
            },

            err @ (CoreError::RequestFailed { .. } | CoreError::CommandFailed { .. }) => {
                Self::HubUnavailable { source: err }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
