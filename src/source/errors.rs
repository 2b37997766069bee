//! Errors reported by data-source collaborators.
//!
//! These are normalized into [`FetchError`](crate::signal::FetchError) by the
//! facade; source implementations should not build facade errors directly.
#[cfg(feature = "python-bindings")]
use pyo3::PyErr;

pub type SourceResult<T> = Result<T, SourceError>;

/// SourceError — what a [`DataSource`](crate::source::DataSource) can report.
///
/// Variants
/// --------
/// - `NotFound { signal, source, message }`
///   The identifier/source pair does not resolve. `message` is the
///   collaborator's own explanation and may be empty.
/// - `Unreachable { message }`
///   The server could not be contacted.
/// - `Library { message }`
///   The client library failed or rejected an argument before any request
///   was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    NotFound { signal: String, source: String, message: String },
    Unreachable { message: String },
    Library { message: String },
}

impl std::error::Error for SourceError {}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::NotFound { signal, source, message } => {
                write!(f, "'{signal}' not found in '{source}': {message}")
            }
            SourceError::Unreachable { message } => write!(f, "server unreachable: {message}"),
            SourceError::Library { message } => write!(f, "client library error: {message}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SourceError> for PyErr {
    fn from(err: SourceError) -> PyErr {
        crate::signal::FetchError::from(err).into()
    }
}
