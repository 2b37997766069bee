//! signal::errors — facade error taxonomy and Python bridges.
//!
//! Purpose
//! -------
//! Define the three failure kinds a caller of
//! [`Client::fetch`](crate::client::Client::fetch) can observe, the structured
//! reasons behind a malformed response, and the error returned by
//! [`SignalResult::slice`](crate::signal::SignalResult::slice).
//!
//! Key behaviors
//! -------------
//! - [`FetchError`] is the only error a fetch returns. Its
//!   [`FetchError::kind`] collapses it into [`FetchErrorKind`] for callers
//!   that only branch on the category.
//! - [`ShapeMismatch`] names the exact inconsistency found while validating a
//!   raw response, so logs and Python messages point at the offending axis.
//! - `From<SourceError> for FetchError` normalizes collaborator failures:
//!   unresolved requests stay `NotFound`, transport and library failures
//!   become `ConnectionError`.
//! - With `python-bindings`, every variant maps to a dedicated Python
//!   exception deriving from `idam.IdamError`.
//!
//! Conventions
//! -----------
//! - Axis indices in [`ShapeMismatch`] refer to the **exposed** (C-order)
//!   axis numbering of the resulting array, not the native IDAM order.
//! - Messages describe the constraint that failed, not how to recover; the
//!   facade never recovers on its own.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed their payloads and that
//!   source errors map onto the expected kind.
#[cfg(feature = "python-bindings")]
use pyo3::PyErr;

use crate::source::errors::SourceError;

/// Result alias for facade operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// FetchErrorKind — the three categories a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    NotFound,
    ConnectionError,
    MalformedResponse,
}

/// ShapeMismatch — why a raw response failed validation.
///
/// Variants
/// --------
/// - `RankMismatch { rank, dims }`
///   The declared rank differs from the number of reported axes.
/// - `DimensionLength { axis, declared, actual }`
///   An axis declares `declared` points but carries `actual` coordinates.
/// - `EmptyData`
///   The source returned no samples at all.
/// - `ShapeOverflow { lens }`
///   The declared axis lengths (exposed order) multiply past `usize::MAX`.
/// - `DataLength { expected, actual }`
///   The sample buffer does not hold the product of the axis lengths.
/// - `ErrorLength { axis, expected, actual }`
///   An error-bar array does not match the array it annotates;
///   `axis == None` refers to the signal data itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    RankMismatch { rank: usize, dims: usize },
    DimensionLength { axis: usize, declared: usize, actual: usize },
    EmptyData,
    ShapeOverflow { lens: Vec<usize> },
    DataLength { expected: usize, actual: usize },
    ErrorLength { axis: Option<usize>, expected: usize, actual: usize },
}

impl std::error::Error for ShapeMismatch {}

impl std::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeMismatch::RankMismatch { rank, dims } => {
                write!(f, "declared rank {rank} but {dims} dimensions were returned")
            }
            ShapeMismatch::DimensionLength { axis, declared, actual } => {
                write!(
                    f,
                    "dimension {axis} declares {declared} points but carries {actual} coordinates"
                )
            }
            ShapeMismatch::EmptyData => write!(f, "response contains no data"),
            ShapeMismatch::ShapeOverflow { lens } => {
                write!(f, "dimension lengths {lens:?} describe more values than can be addressed")
            }
            ShapeMismatch::DataLength { expected, actual } => {
                write!(f, "data holds {actual} values; dimensions require {expected}")
            }
            ShapeMismatch::ErrorLength { axis: None, expected, actual } => {
                write!(f, "data error array holds {actual} values; expected {expected}")
            }
            ShapeMismatch::ErrorLength { axis: Some(axis), expected, actual } => {
                write!(
                    f,
                    "error array of dimension {axis} holds {actual} values; expected {expected}"
                )
            }
        }
    }
}

/// FetchError — failure of a single facade call.
///
/// Variants
/// --------
/// - `NotFound { signal, source, message }`
///   The identifier/source pair did not resolve in the external source.
/// - `ConnectionError { message }`
///   The external source could not be reached or its client library failed.
/// - `MalformedResponse { signal, source, reason }`
///   The source answered, but its arrays are inconsistent with their declared
///   dimensions.
///
/// Notes
/// -----
/// - No partial result is ever attached to an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    NotFound { signal: String, source: String, message: String },
    ConnectionError { message: String },
    MalformedResponse { signal: String, source: String, reason: ShapeMismatch },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NotFound { .. } => FetchErrorKind::NotFound,
            FetchError::ConnectionError { .. } => FetchErrorKind::ConnectionError,
            FetchError::MalformedResponse { .. } => FetchErrorKind::MalformedResponse,
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::MalformedResponse { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotFound { signal, source, message } => {
                write!(f, "'{signal}' not found in '{source}'")?;
                if !message.is_empty() {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            FetchError::ConnectionError { message } => {
                write!(f, "cannot reach data source: {message}")
            }
            FetchError::MalformedResponse { signal, source, reason } => {
                write!(f, "malformed response for '{signal}' from '{source}': {reason}")
            }
        }
    }
}

impl From<SourceError> for FetchError {
    fn from(err: SourceError) -> FetchError {
        match err {
            SourceError::NotFound { signal, source, message } => {
                FetchError::NotFound { signal, source, message }
            }
            SourceError::Unreachable { message } => FetchError::ConnectionError { message },
            SourceError::Library { message } => FetchError::ConnectionError { message },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<FetchError> for PyErr {
    fn from(err: FetchError) -> PyErr {
        use crate::utils::{IdamConnectionError, MalformedResponseError, NotFoundError};

        match err.kind() {
            FetchErrorKind::NotFound => NotFoundError::new_err(err.to_string()),
            FetchErrorKind::ConnectionError => IdamConnectionError::new_err(err.to_string()),
            FetchErrorKind::MalformedResponse => MalformedResponseError::new_err(err.to_string()),
        }
    }
}

/// SliceError — invalid request to fix one axis of a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceError {
    AxisOutOfRange { axis: usize, ndim: usize },
    IndexOutOfRange { axis: usize, index: usize, len: usize },
}

impl std::error::Error for SliceError {}

impl std::fmt::Display for SliceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceError::AxisOutOfRange { axis, ndim } => {
                write!(f, "axis {axis} is out of range for a {ndim}-dimensional signal")
            }
            SliceError::IndexOutOfRange { axis, index, len } => {
                write!(f, "index {index} is out of range for axis {axis} of length {len}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SliceError> for PyErr {
    fn from(err: SliceError) -> PyErr {
        pyo3::exceptions::PyIndexError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` output of `ShapeMismatch` and `FetchError`.
    // - The `SourceError -> FetchError` mapping and `FetchError::kind`.
    //
    // They intentionally DO NOT cover:
    // - Conversion into Python exceptions, which needs an interpreter.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Dimension-length mismatches name the axis and both lengths.
    //
    // Given
    // -----
    // - `ShapeMismatch::DimensionLength { axis: 2, declared: 65, actual: 64 }`.
    //
    // Expect
    // ------
    // - The message contains "dimension 2", "65" and "64".
    fn shape_mismatch_display_names_axis_and_lengths() {
        let msg = ShapeMismatch::DimensionLength { axis: 2, declared: 65, actual: 64 }.to_string();

        assert!(msg.contains("dimension 2"), "unexpected message: {msg}");
        assert!(msg.contains("65"));
        assert!(msg.contains("64"));
    }

    #[test]
    // Purpose
    // -------
    // Data-level and axis-level error arrays are reported differently.
    fn error_length_display_distinguishes_data_and_axis() {
        let data = ShapeMismatch::ErrorLength { axis: None, expected: 4, actual: 3 }.to_string();
        let axis = ShapeMismatch::ErrorLength { axis: Some(1), expected: 4, actual: 3 }.to_string();

        assert!(data.starts_with("data error array"));
        assert!(axis.contains("dimension 1"));
    }

    #[test]
    // Purpose
    // -------
    // Source failures are normalized onto the three facade kinds.
    //
    // Given
    // -----
    // - One `SourceError` of each variant.
    //
    // Expect
    // ------
    // - `NotFound` keeps its kind and payload.
    // - `Unreachable` and `Library` both become `ConnectionError`.
    fn source_errors_map_to_fetch_kinds() {
        let not_found: FetchError = SourceError::NotFound {
            signal: "amc_plasma current".into(),
            source: "15100".into(),
            message: "no such signal".into(),
        }
        .into();
        let unreachable: FetchError =
            SourceError::Unreachable { message: "connection refused".into() }.into();
        let library: FetchError = SourceError::Library { message: "bad handle".into() }.into();

        assert_eq!(not_found.kind(), FetchErrorKind::NotFound);
        assert_eq!(
            not_found,
            FetchError::NotFound {
                signal: "amc_plasma current".into(),
                source: "15100".into(),
                message: "no such signal".into(),
            }
        );
        assert_eq!(unreachable.kind(), FetchErrorKind::ConnectionError);
        assert_eq!(library.kind(), FetchErrorKind::ConnectionError);
    }

    #[test]
    // Purpose
    // -------
    // A malformed response exposes its reason through `Error::source`.
    fn malformed_response_exposes_reason_as_source() {
        use std::error::Error;

        let err = FetchError::MalformedResponse {
            signal: "efm_psi(r,z)".into(),
            source: "23320".into(),
            reason: ShapeMismatch::EmptyData,
        };

        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
        assert_eq!(err.source().map(|e| e.to_string()), Some("response contains no data".into()));
        assert!(err.to_string().contains("'efm_psi(r,z)'"));
    }

    #[test]
    // Purpose
    // -------
    // An empty collaborator message does not leave a dangling separator.
    fn not_found_display_omits_empty_message() {
        let err = FetchError::NotFound {
            signal: String::new(),
            source: "0".into(),
            message: String::new(),
        };

        assert_eq!(err.to_string(), "'' not found in '0'");
    }
}
