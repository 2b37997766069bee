//! Raw responses as reported by a data source, before validation.
//!
//! Purpose
//! -------
//! Carry exactly what the IDAM client reports for one request: a flat `f32`
//! buffer, the declared rank, the time-axis order and one entry per axis, all
//! in the library's **native** axis order (axis 0 varies fastest in the
//! buffer).
//!
//! Key behaviors
//! -------------
//! - [`RawSignal`] and [`RawDimension`] are plain data; nothing here checks
//!   consistency. The facade validates them before building a
//!   [`SignalResult`](crate::signal::SignalResult).
//! - Small builder helpers make it easy to describe responses in tests and in
//!   the stub source.
//!
//! Conventions
//! -----------
//! - `dims[i]` describes native axis `i`. The facade reverses this list so
//!   that the exposed array is in C order.
//! - `order` is the native index of the time axis; `None` when the source
//!   reports no time axis.

/// Low/high error bars as reported by the source.
///
/// `high == None` means the errors are symmetric and `low` applies to both
/// sides.
#[derive(Debug, Clone, PartialEq)]
pub struct RawErrors {
    pub low: Vec<f32>,
    pub high: Option<Vec<f32>>,
}

impl RawErrors {
    pub fn symmetric(values: Vec<f32>) -> Self {
        RawErrors { low: values, high: None }
    }

    pub fn asymmetric(low: Vec<f32>, high: Vec<f32>) -> Self {
        RawErrors { low, high: Some(high) }
    }
}

/// One axis of a raw response, in native order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDimension {
    pub label: String,
    pub units: String,
    /// Declared number of points along this axis.
    pub len: usize,
    /// Coordinate values; should hold exactly `len` entries.
    pub data: Vec<f32>,
    pub errors: Option<RawErrors>,
}

impl RawDimension {
    /// Build an axis whose declared length matches its coordinate buffer.
    pub fn new(label: impl Into<String>, units: impl Into<String>, data: Vec<f32>) -> Self {
        let len = data.len();
        RawDimension { label: label.into(), units: units.into(), len, data, errors: None }
    }

    /// Override the declared length without touching the coordinates.
    pub fn with_declared_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    pub fn with_errors(mut self, errors: RawErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// A complete raw response for one `(signal, source)` request.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSignal {
    pub label: String,
    pub units: String,
    pub description: String,
    /// Declared rank of the data array.
    pub rank: usize,
    /// Native index of the time axis, if any.
    pub order: Option<usize>,
    /// Flat sample buffer, native axis 0 fastest.
    pub data: Vec<f32>,
    pub errors: Option<RawErrors>,
    /// Axes in native order.
    pub dims: Vec<RawDimension>,
}

impl RawSignal {
    /// Build a response whose rank is taken from `dims`.
    ///
    /// The time order defaults to native axis 0 when at least one axis is
    /// present, which is where IDAM reports time for ordinary traces.
    pub fn new(
        label: impl Into<String>, units: impl Into<String>, data: Vec<f32>,
        dims: Vec<RawDimension>,
    ) -> Self {
        let order = if dims.is_empty() { None } else { Some(0) };
        RawSignal {
            label: label.into(),
            units: units.into(),
            description: String::new(),
            rank: dims.len(),
            order,
            data,
            errors: None,
            dims,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the native time order (`None` for "no time axis").
    pub fn with_time_order(mut self, order: Option<usize>) -> Self {
        self.order = order;
        self
    }

    /// Override the declared rank without touching the axes.
    pub fn with_declared_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_errors(mut self, errors: RawErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}
