//! One coordinate axis of a retrieved signal.
use ndarray::{Array1, Ix1};

use crate::signal::error_bars::ErrorBars;

/// Label used when the source reports an empty axis or signal label.
pub const DEFAULT_LABEL: &str = "No data";
/// Units used when the source reports empty units.
pub const DEFAULT_UNITS: &str = "No units";

/// `Dimension` — coordinate values, label and units for one axis.
///
/// Fields
/// ------
/// - `label`: `String`
///   Short axis name for display (e.g. `"Time"`); never empty.
/// - `units`: `String`
///   Axis units (e.g. `"s"`); never empty.
/// - `data`: `Array1<f32>`
///   Coordinate values; its length equals the extent of the owning signal's
///   data along this axis.
/// - `errors`: `Option<ErrorBars<Ix1>>`
///   Optional uncertainty on the coordinates.
///
/// Notes
/// -----
/// - Instances are built by the facade only and are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    label: String,
    units: String,
    data: Array1<f32>,
    errors: Option<ErrorBars<Ix1>>,
}

impl Dimension {
    pub(crate) fn new(
        label: String, units: String, data: Array1<f32>, errors: Option<ErrorBars<Ix1>>,
    ) -> Self {
        Dimension {
            label: non_empty_or(label, DEFAULT_LABEL),
            units: non_empty_or(units, DEFAULT_UNITS),
            data,
            errors,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    pub fn errors(&self) -> Option<&ErrorBars<Ix1>> {
        self.errors.as_ref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Replace a blank string with a display default.
pub(crate) fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() { default.to_owned() } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Blank labels and units fall back to display defaults; real ones are kept.
    //
    // Given
    // -----
    // - One axis with empty label and whitespace-only units.
    // - One axis with `"Time"` / `"s"`.
    //
    // Expect
    // ------
    // - The first reports `"No data"` / `"No units"`.
    // - The second keeps its strings verbatim.
    fn dimension_new_applies_display_defaults() {
        let blank = Dimension::new(String::new(), "  ".into(), array![0.0, 1.0], None);
        let time = Dimension::new("Time".into(), "s".into(), array![0.0, 1.0], None);

        assert_eq!(blank.label(), DEFAULT_LABEL);
        assert_eq!(blank.units(), DEFAULT_UNITS);
        assert_eq!(time.label(), "Time");
        assert_eq!(time.units(), "s");
        assert_eq!(time.len(), 2);
        assert!(time.errors().is_none());
    }
}
