//! Validated signal results returned by the facade.
//!
//! Purpose
//! -------
//! Provide the statically typed replacement for IDAM's dynamic `Data` object:
//! one immutable value holding the samples, their axes, and the descriptive
//! strings a plot needs.
//!
//! Key behaviors
//! -------------
//! - [`SignalResult::from_raw`] validates a native-order [`RawSignal`] and
//!   assembles the C-order view: the axis list is reversed, the time order is
//!   remapped and blank strings receive display defaults.
//! - Accessors mirror the attribute names callers already use (`data`,
//!   `label`, `dim`, `time`), so `result.dim()[0].data()` reads like
//!   `d.dim[0].data`.
//! - [`SignalResult::slice`] fixes one axis, which is how higher-rank signals
//!   are reduced for contour-style consumers.
//!
//! Invariants & assumptions
//! ------------------------
//! - `dim().len() == data().ndim()`.
//! - `dim()[i].len() == data().shape()[i]` for every axis `i`.
//! - `order()`, when present, indexes into `dim()`.
//! - Error bars, when present, match the shape of what they annotate.
//!
//! Conventions
//! -----------
//! - Exposed axis `i` is native axis `rank - 1 - i`; a native time order `k`
//!   becomes `rank - 1 - k`.
//! - Fields are private; a result cannot be mutated after construction.
//!
//! Testing notes
//! -------------
//! - Unit tests cover axis reversal, time-order remapping, label defaults,
//!   error-bar assembly and slicing. Facade-level behavior is tested in
//!   `client` and in the integration tests.
use ndarray::{Array1, ArrayD, ArrayViewD, Axis, IxDyn};

use crate::signal::{
    dimension::{DEFAULT_LABEL, DEFAULT_UNITS, Dimension, non_empty_or},
    error_bars::ErrorBars,
    errors::{FetchError, FetchResult, ShapeMismatch, SliceError},
    validation::{exposed_axis, validate_raw},
};
use crate::source::{SignalRequest, raw::RawSignal};

/// Description used when the source reports an empty description.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// `SignalResult` — one retrieved dataset.
///
/// Fields
/// ------
/// - `name`: identifier used for the request (e.g. `"amc_plasma current"`).
/// - `source`: source string used for the request (e.g. `"15100"`).
/// - `label`, `units`, `description`: descriptive strings, never empty.
/// - `data`: `ArrayD<f32>` of samples in C order.
/// - `errors`: optional error bars with the shape of `data`.
/// - `dims`: one [`Dimension`] per axis of `data`, in axis order.
/// - `order`: index into `dims` of the time axis, if the source flagged one.
///
/// Invariants
/// ----------
/// - See the module documentation; they are established by
///   [`SignalResult::from_raw`] and cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalResult {
    name: String,
    source: String,
    label: String,
    units: String,
    description: String,
    data: ArrayD<f32>,
    errors: Option<ErrorBars<IxDyn>>,
    dims: Vec<Dimension>,
    order: Option<usize>,
}

impl SignalResult {
    /// Validate a raw response and assemble the exposed result.
    ///
    /// Parameters
    /// ----------
    /// - `request`: `&SignalRequest`
    ///   The request that produced `raw`; its identifier and source are
    ///   recorded on the result and used in error messages.
    /// - `raw`: `RawSignal`
    ///   Native-order response from a data source.
    ///
    /// Returns
    /// -------
    /// `FetchResult<SignalResult>`
    ///   - `Ok(SignalResult)` satisfying all shape invariants.
    ///   - `Err(FetchError::MalformedResponse { .. })` otherwise.
    ///
    /// Errors
    /// ------
    /// - `FetchError::MalformedResponse`
    ///   Carries the [`ShapeMismatch`] reported by
    ///   [`validate_raw`](crate::signal::validation::validate_raw).
    pub fn from_raw(request: &SignalRequest, raw: RawSignal) -> FetchResult<SignalResult> {
        let malformed = |reason: ShapeMismatch| FetchError::MalformedResponse {
            signal: request.signal().to_owned(),
            source: request.source().to_owned(),
            reason,
        };

        validate_raw(&raw).map_err(malformed)?;

        // Buffers were checked by `validate_raw`; error arms report actual
        // lengths.
        let rank = raw.rank;
        let shape: Vec<usize> = raw.dims.iter().rev().map(|d| d.len).collect();
        let data_len = raw.data.len();

        let data = ArrayD::from_shape_vec(IxDyn(&shape), raw.data).map_err(|_| {
            let expected = shape.iter().product();
            malformed(ShapeMismatch::DataLength { expected, actual: data_len })
        })?;

        let errors = match raw.errors {
            Some(e) => Some(ErrorBars::from_buffers(IxDyn(&shape), e.low, e.high).map_err(
                |actual| {
                    malformed(ShapeMismatch::ErrorLength { axis: None, expected: data_len, actual })
                },
            )?),
            None => None,
        };

        let mut dims = Vec::with_capacity(rank);
        for (native, raw_dim) in raw.dims.into_iter().enumerate().rev() {
            let len = raw_dim.len;
            let dim_errors = match raw_dim.errors {
                Some(e) => Some(ErrorBars::from_buffers(len, e.low, e.high).map_err(|actual| {
                    malformed(ShapeMismatch::ErrorLength {
                        axis: Some(exposed_axis(rank, native)),
                        expected: len,
                        actual,
                    })
                })?),
                None => None,
            };
            dims.push(Dimension::new(
                raw_dim.label,
                raw_dim.units,
                Array1::from(raw_dim.data),
                dim_errors,
            ));
        }

        let order = raw.order.filter(|&k| k < rank).map(|k| exposed_axis(rank, k));

        Ok(SignalResult {
            name: request.signal().to_owned(),
            source: request.source().to_owned(),
            label: non_empty_or(raw.label, DEFAULT_LABEL),
            units: non_empty_or(raw.units, DEFAULT_UNITS),
            description: non_empty_or(raw.description, DEFAULT_DESCRIPTION),
            data,
            errors,
            dims,
            order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn errors(&self) -> Option<&ErrorBars<IxDyn>> {
        self.errors.as_ref()
    }

    /// Axes in the order of `data`'s dimensions.
    pub fn dim(&self) -> &[Dimension] {
        &self.dims
    }

    /// Index of the time axis within [`SignalResult::dim`].
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Coordinates of the time axis, i.e. `dim()[order()].data()`.
    pub fn time(&self) -> Option<&Array1<f32>> {
        self.order.map(|i| self.dims[i].data())
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// View of `data` with `axis` fixed at `index`.
    ///
    /// The result has one dimension fewer than `data`; for a
    /// `(time, z, r)` equilibrium, `slice(0, t)` is the `(z, r)` map at
    /// time index `t`.
    ///
    /// Errors
    /// ------
    /// - `SliceError::AxisOutOfRange` if `axis >= ndim()`.
    /// - `SliceError::IndexOutOfRange` if `index` exceeds the axis length.
    pub fn slice(&self, axis: usize, index: usize) -> Result<ArrayViewD<'_, f32>, SliceError> {
        let ndim = self.data.ndim();
        if axis >= ndim {
            return Err(SliceError::AxisOutOfRange { axis, ndim });
        }
        let len = self.data.len_of(Axis(axis));
        if index >= len {
            return Err(SliceError::IndexOutOfRange { axis, index, len });
        }
        Ok(self.data.index_axis(Axis(axis), index))
    }
}
