//! Flat numeric storage with a target shape

use crate::error::{Error, Result};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

/// Owned numeric buffer (row-major, rank 0-3)
///
/// Wraps an `ndarray::ArrayD<f64>`, so `len() == shape().iter().product()`
/// holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericBuffer {
    data: ArrayD<f64>,
}

impl NumericBuffer {
    /// Build from flat row-major values
    pub fn new(shape: &[usize], values: Vec<f64>) -> Result<Self> {
        let actual = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| {
            Error::ShapeMismatch {
                expected: shape.to_vec(),
                actual,
            }
        })?;
        Ok(Self { data })
    }

    /// Buffer of `shape` with every element set to `value`
    pub fn filled(shape: &[usize], value: f64) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// Rank-0 buffer; broadcasts to any shape on assignment
    pub fn scalar(value: f64) -> Self {
        Self::filled(&[], value)
    }

    pub fn from_ndarray(data: ArrayD<f64>) -> Self {
        Self {
            data: data.as_standard_layout().into_owned(),
        }
    }

    pub fn as_ndarray(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_ndarray(self) -> ArrayD<f64> {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major iteration over elements
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// Flat row-major copy of the elements
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Rows along the last axis, outer axes flattened (one row for rank 1)
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.data.rows().into_iter().map(|row| row.to_vec())
    }

    /// Sub-buffer at `index` along the outermost axis
    pub fn layer(&self, index: usize) -> Result<NumericBuffer> {
        let len = self.data.shape().first().copied().unwrap_or(0);
        if self.data.ndim() == 0 || index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(Self {
            data: self.data.index_axis(Axis(0), index).to_owned(),
        })
    }

    /// Stack equally shaped buffers along a new outer axis
    pub fn stack(parts: &[NumericBuffer]) -> Result<NumericBuffer> {
        let Some(first) = parts.first() else {
            return Err(Error::LayerCountMismatch {
                expected: 1,
                actual: 0,
            });
        };
        let views: Vec<ArrayViewD<'_, f64>> = parts.iter().map(|p| p.data.view()).collect();
        let data = ndarray::stack(Axis(0), &views).map_err(|_| Error::ShapeMismatch {
            expected: first.shape().to_vec(),
            actual: parts.iter().map(NumericBuffer::len).sum(),
        })?;
        Ok(Self { data })
    }

    /// Copy with every element multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> NumericBuffer {
        Self {
            data: self.data.mapv(|v| v * factor),
        }
    }

    /// Apply `f` to every element in place
    pub fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        self.data.mapv_inplace(f);
    }

    /// The shared value if every element is exactly equal
    pub fn uniform_value(&self) -> Option<f64> {
        let mut iter = self.data.iter();
        let first = *iter.next()?;
        iter.all(|v| *v == first).then_some(first)
    }

    /// Overwrite the region selected by an index prefix.
    ///
    /// Each entry of `index` fixes one leading axis; an empty prefix selects
    /// the whole buffer. `values` must broadcast to the selected region.
    pub fn assign(&mut self, index: &[usize], values: &NumericBuffer) -> Result<()> {
        if index.len() > self.data.ndim() {
            return Err(Error::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: index.len(),
            });
        }
        let mut view = self.data.view_mut();
        for &i in index {
            let len = view.len_of(Axis(0));
            if i >= len {
                return Err(Error::IndexOutOfBounds { index: i, len });
            }
            view = view.index_axis_move(Axis(0), i);
        }
        let Some(source) = values.data.broadcast(view.raw_dim()) else {
            return Err(Error::ShapeMismatch {
                expected: view.shape().to_vec(),
                actual: values.len(),
            });
        };
        view.assign(&source);
        Ok(())
    }

    fn finite(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().filter(|v| !v.is_nan())
    }

    /// Minimum ignoring NaN; NaN when nothing remains
    pub fn min(&self) -> f64 {
        self.finite().reduce(f64::min).unwrap_or(f64::NAN)
    }

    /// Maximum ignoring NaN; NaN when nothing remains
    pub fn max(&self) -> f64 {
        self.finite().reduce(f64::max).unwrap_or(f64::NAN)
    }

    /// Sum ignoring NaN
    pub fn sum(&self) -> f64 {
        self.finite().sum()
    }

    /// Mean ignoring NaN
    pub fn mean(&self) -> f64 {
        let (sum, count) = self
            .finite()
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }

    /// Median ignoring NaN
    pub fn median(&self) -> f64 {
        let mut values: Vec<f64> = self.finite().collect();
        if values.is_empty() {
            return f64::NAN;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        }
    }

    /// Population standard deviation ignoring NaN
    pub fn std(&self) -> f64 {
        let mean = self.mean();
        if mean.is_nan() {
            return f64::NAN;
        }
        let (sq, count) = self
            .finite()
            .fold((0.0, 0usize), |(s, n), v| (s + (v - mean).powi(2), n + 1));
        (sq / count as f64).sqrt()
    }
}

impl From<f64> for NumericBuffer {
    fn from(v: f64) -> Self {
        NumericBuffer::scalar(v)
    }
}

impl From<ArrayD<f64>> for NumericBuffer {
    fn from(v: ArrayD<f64>) -> Self {
        NumericBuffer::from_ndarray(v)
    }
}
