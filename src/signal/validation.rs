//! signal::validation — consistency checks for raw source responses.
//!
//! Purpose
//! -------
//! Reject raw responses whose arrays disagree with their declared shape before
//! any `ndarray` container is built, so that every
//! [`SignalResult`](crate::signal::SignalResult) handed to a caller satisfies
//! `dim.len() == data.ndim()` and `dim[i].data.len() == data.shape()[i]`.
//!
//! Key behaviors
//! -------------
//! - Checks run in a fixed order: rank, per-axis coordinate lengths, empty
//!   data, total data length, then error-bar lengths. The first failure wins.
//! - The total length is computed with checked multiplication; declared
//!   lengths whose product overflows are rejected, not wrapped.
//! - Axis numbers in the reported [`ShapeMismatch`] use the exposed C-order
//!   numbering (`rank - 1 - native_index`).
//!
//! Invariants & assumptions
//! ------------------------
//! - A rank-0 response (no axes) is a scalar and must hold exactly one value.
//! - The time order is not validated here: an order outside `0..rank` means
//!   "no time axis" and is resolved during assembly.
//!
//! Conventions
//! -----------
//! - Pure functions; no allocation beyond error construction.

use crate::signal::errors::ShapeMismatch;
use crate::source::raw::{RawErrors, RawSignal};

/// Validate a raw response against its declared shape.
///
/// Parameters
/// ----------
/// - `raw`: `&RawSignal`
///   Response in native axis order.
///
/// Returns
/// -------
/// `Result<(), ShapeMismatch>`
///   - `Ok(())` when the buffer, every axis and every error array agree with
///     the declared rank and lengths.
///   - `Err(ShapeMismatch)` describing the first inconsistency found.
///
/// Errors
/// ------
/// - `ShapeMismatch::RankMismatch` when `raw.rank != raw.dims.len()`.
/// - `ShapeMismatch::DimensionLength` when an axis carries a coordinate
///   buffer whose length differs from its declared length.
/// - `ShapeMismatch::EmptyData` when the sample buffer is empty.
/// - `ShapeMismatch::DataLength` when the buffer length differs from the
///   product of the declared axis lengths.
/// - `ShapeMismatch::ErrorLength` when an error array does not match.
pub fn validate_raw(raw: &RawSignal) -> Result<(), ShapeMismatch> {
    if raw.rank != raw.dims.len() {
        return Err(ShapeMismatch::RankMismatch { rank: raw.rank, dims: raw.dims.len() });
    }

    for (native, dim) in raw.dims.iter().enumerate() {
        if dim.data.len() != dim.len {
            return Err(ShapeMismatch::DimensionLength {
                axis: exposed_axis(raw.rank, native),
                declared: dim.len,
                actual: dim.data.len(),
            });
        }
    }

    if raw.data.is_empty() {
        return Err(ShapeMismatch::EmptyData);
    }

    let lens: Vec<usize> = raw.dims.iter().rev().map(|d| d.len).collect();
    let total = lens.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n));
    let expected = match total {
        Some(n) => n,
        None => return Err(ShapeMismatch::ShapeOverflow { lens }),
    };
    if raw.data.len() != expected {
        return Err(ShapeMismatch::DataLength { expected, actual: raw.data.len() });
    }

    if let Some(errors) = &raw.errors {
        check_errors(errors, None, expected)?;
    }
    for (native, dim) in raw.dims.iter().enumerate() {
        if let Some(errors) = &dim.errors {
            check_errors(errors, Some(exposed_axis(raw.rank, native)), dim.len)?;
        }
    }

    Ok(())
}

/// Map a native axis index to its position in the exposed (C-order) array.
#[inline]
pub(crate) fn exposed_axis(rank: usize, native: usize) -> usize {
    rank - 1 - native
}

fn check_errors(
    errors: &RawErrors, axis: Option<usize>, expected: usize,
) -> Result<(), ShapeMismatch> {
    let high_len = errors.high.as_ref().map(Vec::len);
    for actual in std::iter::once(errors.low.len()).chain(high_len) {
        if actual != expected {
            return Err(ShapeMismatch::ErrorLength { axis, expected, actual });
        }
    }
    Ok(())
}
