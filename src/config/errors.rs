//! Errors raised while building a client configuration or loading the IDAM
//! client library.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration and library-loading failures.
///
/// None of these are fetch errors: they happen before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A port was not an integer in `1..=65535`.
    InvalidPort { value: String },
    /// A server host was empty.
    EmptyHost,
    /// No library location was configured.
    MissingLibrary,
    /// The shared library could not be opened.
    LibraryLoad { path: String, reason: String },
    /// The shared library lacks a required IDAM entry point.
    MissingSymbol { name: &'static str, reason: String },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "invalid IDAM server port {value:?}; expected an integer in 1..=65535")
            }
            ConfigError::EmptyHost => write!(f, "IDAM server host must not be empty"),
            ConfigError::MissingLibrary => {
                write!(f, "no IDAM client library configured; set IDAM_LIBRARY")
            }
            ConfigError::LibraryLoad { path, reason } => {
                write!(f, "cannot load IDAM client library {path}: {reason}")
            }
            ConfigError::MissingSymbol { name, reason } => {
                write!(f, "IDAM client library lacks {name}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ConfigError> for PyErr {
    fn from(err: ConfigError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
