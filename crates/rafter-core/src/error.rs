use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Machine-readable error codes for hard faults.
///
/// Validation outcomes are never errors; they are collected as
/// violations on the contract. These codes cover the failures that happen
/// before a contract can run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadError,
    ConfigParseError,
    InvalidEnumValue,
    InvalidDoneRatioMode,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadError => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidEnumValue => "E2001",
            Self::InvalidDoneRatioMode => "E2002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigReadError => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidEnumValue => "Invalid enum value",
            Self::InvalidDoneRatioMode => "Invalid done ratio mode",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadError => Some("Check that .rafter/config.toml is readable."),
            Self::ConfigParseError => Some("Fix syntax in .rafter/config.toml and retry."),
            Self::InvalidEnumValue => None,
            Self::InvalidDoneRatioMode => {
                Some("Use one of: field, status, disabled.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl ParseEnumError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidEnumValue
    }
}

/// Failures while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid done ratio mode from {origin}: {source}")]
    DoneRatioMode {
        origin: &'static str,
        #[source]
        source: ParseEnumError,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadError,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::DoneRatioMode { .. } => ErrorCode::InvalidDoneRatioMode,
        }
    }
}
