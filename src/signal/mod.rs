//! signal — typed signal results, validation, and facade errors.
//!
//! Purpose
//! -------
//! Hold everything a caller receives from the facade: the immutable
//! [`SignalResult`] / [`Dimension`] data model, the [`ErrorBars`] attached to
//! either, the validation that guarantees their shape invariants, and the
//! [`FetchError`] taxonomy.
//!
//! Key behaviors
//! -------------
//! - [`validation::validate_raw`] checks a native-order
//!   [`RawSignal`](crate::source::raw::RawSignal) against its declared shape.
//! - [`SignalResult::from_raw`] turns a validated response into the exposed
//!   C-order result.
//!
//! Invariants & assumptions
//! ------------------------
//! - `result.dim().len() == result.data().ndim()` and every
//!   `result.dim()[i].len() == result.data().shape()[i]`.
//! - Results are never partially built: validation failures return
//!   [`FetchError::MalformedResponse`] and nothing else.
//!
//! Conventions
//! -----------
//! - Samples and coordinates are `f32`, matching what the IDAM client
//!   delivers.
//! - This module performs no I/O and no logging; the client logs around it.

pub mod dimension;
pub mod error_bars;
pub mod errors;
pub mod result;
pub mod validation;

pub use self::{
    dimension::Dimension,
    error_bars::ErrorBars,
    errors::{FetchError, FetchErrorKind, FetchResult, ShapeMismatch, SliceError},
    result::SignalResult,
};
