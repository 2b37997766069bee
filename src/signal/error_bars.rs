//! Low/high error bars attached to a signal or to one of its axes.
use ndarray::{Array, StrideShape};

/// `ErrorBars` — uncertainty on the low and high side of each value.
///
/// Fields
/// ------
/// - `low`: `Array<f32, D>`
///   Error below each value; same shape as the annotated array.
/// - `high`: `Option<Array<f32, D>>`
///   Error above each value; `None` when the source reported symmetric
///   errors, in which case [`ErrorBars::high`] returns `low`.
///
/// Invariants
/// ----------
/// - `low` and `high` (when present) share the shape of the annotated array.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBars<D>
where
    D: ndarray::Dimension,
{
    low: Array<f32, D>,
    high: Option<Array<f32, D>>,
}

impl<D> ErrorBars<D>
where
    D: ndarray::Dimension,
{
    /// Build error bars from flat buffers already checked against `shape`.
    ///
    /// Returns `Err(len)` with the length of the first buffer that does not
    /// fill `shape`.
    pub(crate) fn from_buffers<Sh>(
        shape: Sh, low: Vec<f32>, high: Option<Vec<f32>>,
    ) -> Result<Self, usize>
    where
        Sh: Into<StrideShape<D>> + Clone,
    {
        let low_len = low.len();
        let low = Array::from_shape_vec(shape.clone(), low).map_err(|_| low_len)?;
        let high = match high {
            Some(values) => {
                let high_len = values.len();
                Some(Array::from_shape_vec(shape, values).map_err(|_| high_len)?)
            }
            None => None,
        };
        Ok(ErrorBars { low, high })
    }

    pub fn low(&self) -> &Array<f32, D> {
        &self.low
    }

    pub fn high(&self) -> &Array<f32, D> {
        self.high.as_ref().unwrap_or(&self.low)
    }

    pub fn is_symmetric(&self) -> bool {
        self.high.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Ix1, array};

    #[test]
    // Purpose
    // -------
    // Symmetric error bars report the low side for both accessors.
    fn symmetric_error_bars_share_low_side() {
        let bars = ErrorBars::<Ix1>::from_buffers(3, vec![0.1, 0.2, 0.3], None).unwrap();

        assert!(bars.is_symmetric());
        assert_eq!(bars.high(), &array![0.1_f32, 0.2, 0.3]);
        assert_eq!(bars.low(), bars.high());
    }

    #[test]
    // Purpose
    // -------
    // Asymmetric error bars keep both sides, and a short buffer is refused.
    fn asymmetric_error_bars_keep_both_sides() {
        let bars =
            ErrorBars::<Ix1>::from_buffers(2, vec![0.1, 0.2], Some(vec![0.5, 0.6])).unwrap();
        let short = ErrorBars::<Ix1>::from_buffers(2, vec![0.1, 0.2], Some(vec![0.5]));

        assert!(!bars.is_symmetric());
        assert_eq!(bars.high(), &array![0.5_f32, 0.6]);
        assert_eq!(short, Err(1));
    }
}
