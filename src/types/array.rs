//! Array representation: internal, constant, external or layered

use super::{How, NumericBuffer, PerLayer};
use crate::error::{Error, Result};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
enum Storage {
    Internal(NumericBuffer),
    Constant(f64),
    External {
        path: PathBuf,
        base_dir: PathBuf,
        data: OnceCell<NumericBuffer>,
    },
    Layered(Vec<Array>),
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Storage::Internal(a), Storage::Internal(b)) => a == b,
            (Storage::Constant(a), Storage::Constant(b)) => a == b,
            // External arrays compare by reference, not content
            (Storage::External { path: a, .. }, Storage::External { path: b, .. }) => a == b,
            (Storage::Layered(a), Storage::Layered(b)) => a == b,
            _ => false,
        }
    }
}

/// A numeric input array with a fixed target shape.
///
/// Data lives in exactly one place, decided by the storage variant: an
/// owned buffer (internal), one scalar (constant), a file reference
/// (external), or one nested array per outer index (layered). The optional
/// factor is applied by [`Array::value`] only; stored data is always raw.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    shape: Vec<usize>,
    factor: Option<f64>,
    storage: Storage,
}

impl Array {
    /// Internal array from flat row-major values
    pub fn internal(shape: &[usize], values: Vec<f64>) -> Result<Self> {
        Ok(Self::from_buffer(NumericBuffer::new(shape, values)?))
    }

    /// Internal array taking its shape from the buffer
    pub fn from_buffer(buffer: NumericBuffer) -> Self {
        Self {
            shape: buffer.shape().to_vec(),
            factor: None,
            storage: Storage::Internal(buffer),
        }
    }

    /// Constant array broadcasting `value` to `shape`
    pub fn constant(shape: &[usize], value: f64) -> Self {
        Self {
            shape: shape.to_vec(),
            factor: None,
            storage: Storage::Constant(value),
        }
    }

    /// External array; data is read from `base_dir/path` on first access
    pub fn external(shape: &[usize], path: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            shape: shape.to_vec(),
            factor: None,
            storage: Storage::External {
                path: path.into(),
                base_dir: base_dir.into(),
                data: OnceCell::new(),
            },
        }
    }

    /// External array whose data was already read by the loader
    pub(crate) fn external_loaded(
        path: PathBuf,
        base_dir: PathBuf,
        data: NumericBuffer,
    ) -> Self {
        Self {
            shape: data.shape().to_vec(),
            factor: None,
            storage: Storage::External {
                path,
                base_dir,
                data: OnceCell::from(data),
            },
        }
    }

    /// Layered array: one nested array of shape `shape[1..]` per `shape[0]`
    pub fn layered(shape: &[usize], layers: Vec<Array>) -> Result<Self> {
        let Some((&nlay, inner)) = shape.split_first().filter(|(_, inner)| !inner.is_empty())
        else {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                actual: layers.len(),
            });
        };
        if layers.len() != nlay {
            return Err(Error::LayerCountMismatch {
                expected: nlay,
                actual: layers.len(),
            });
        }
        if let Some(bad) = layers.iter().find(|layer| layer.shape != inner) {
            return Err(Error::ShapeMismatch {
                expected: inner.to_vec(),
                actual: bad.shape.iter().product(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            factor: None,
            storage: Storage::Layered(layers),
        })
    }

    /// Set the multiplier; on a layered array it is set on every layer
    pub fn with_factor(mut self, factor: f64) -> Self {
        match &mut self.storage {
            Storage::Layered(layers) => {
                for layer in layers.iter_mut() {
                    layer.factor = Some(factor);
                }
            }
            _ => self.factor = Some(factor),
        }
        self
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn is_layered(&self) -> bool {
        matches!(self.storage, Storage::Layered(_))
    }

    pub fn layers(&self) -> Option<&[Array]> {
        match &self.storage {
            Storage::Layered(layers) => Some(layers),
            _ => None,
        }
    }

    pub fn layers_mut(&mut self) -> Option<&mut [Array]> {
        match &mut self.storage {
            Storage::Layered(layers) => Some(layers),
            _ => None,
        }
    }

    /// Storage variant, per layer when layered
    pub fn how(&self) -> PerLayer<How> {
        match &self.storage {
            Storage::Internal(_) => PerLayer::Single(How::Internal),
            Storage::Constant(_) => PerLayer::Single(How::Constant),
            Storage::External { .. } => PerLayer::Single(How::External),
            Storage::Layered(layers) => PerLayer::Layered(
                layers
                    .iter()
                    .filter_map(|layer| layer.how().single().copied())
                    .collect(),
            ),
        }
    }

    /// Effective multiplier (1.0 when unset), per layer when layered
    pub fn factor(&self) -> PerLayer<f64> {
        match &self.storage {
            Storage::Layered(layers) => {
                PerLayer::Layered(layers.iter().map(|l| l.factor.unwrap_or(1.0)).collect())
            }
            _ => PerLayer::Single(self.factor.unwrap_or(1.0)),
        }
    }

    /// Multiplier exactly as given in the input, if any
    pub fn explicit_factor(&self) -> Option<f64> {
        self.factor
    }

    pub fn internal_buffer(&self) -> Option<&NumericBuffer> {
        match &self.storage {
            Storage::Internal(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn constant_value(&self) -> Option<f64> {
        match &self.storage {
            Storage::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Referenced file of an external array, as written in the input
    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            Storage::External { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Data reshaped to `shape` with the factor applied
    pub fn value(&self) -> Result<NumericBuffer> {
        match &self.storage {
            Storage::Layered(layers) => {
                let parts = layers.iter().map(Array::value).collect::<Result<Vec<_>>>()?;
                NumericBuffer::stack(&parts)
            }
            _ => {
                let raw = self.raw()?;
                Ok(match self.factor {
                    Some(factor) => raw.scaled(factor),
                    None => raw,
                })
            }
        }
    }

    /// Data reshaped to `shape` without the factor
    pub fn raw(&self) -> Result<NumericBuffer> {
        match &self.storage {
            Storage::Internal(buffer) => {
                if buffer.shape() != self.shape.as_slice() {
                    return Err(Error::ShapeMismatch {
                        expected: self.shape.clone(),
                        actual: buffer.len(),
                    });
                }
                Ok(buffer.clone())
            }
            Storage::Constant(v) => Ok(NumericBuffer::filled(&self.shape, *v)),
            Storage::External {
                path,
                base_dir,
                data,
            } => external_data(&self.shape, path, base_dir, data).cloned(),
            Storage::Layered(layers) => {
                let parts = layers.iter().map(Array::raw).collect::<Result<Vec<_>>>()?;
                NumericBuffer::stack(&parts)
            }
        }
    }

    /// Overwrite the region addressed by an index prefix (empty = whole array).
    ///
    /// A constant array stays constant while its values remain exactly
    /// uniform and becomes internal otherwise. An external array becomes
    /// internal.
    pub fn set(&mut self, index: &[usize], values: impl Into<NumericBuffer>) -> Result<()> {
        let mut raw = self.raw()?;
        raw.assign(index, &values.into())?;
        self.store_raw(raw)
    }

    fn store_raw(&mut self, raw: NumericBuffer) -> Result<()> {
        if let Storage::Layered(layers) = &mut self.storage {
            for (i, layer) in layers.iter_mut().enumerate() {
                layer.store_raw(raw.layer(i)?)?;
            }
            return Ok(());
        }
        let uniform = raw.uniform_value();
        self.storage = match (&self.storage, uniform) {
            (Storage::Constant(_), Some(value)) => Storage::Constant(value),
            (Storage::Constant(_), None) => {
                debug!(shape = ?self.shape, "constant array promoted to internal");
                Storage::Internal(raw)
            }
            (Storage::External { path, .. }, _) => {
                debug!(path = %path.display(), "external array promoted to internal");
                Storage::Internal(raw)
            }
            _ => Storage::Internal(raw),
        };
        Ok(())
    }

    fn apply<F: Fn(f64) -> f64 + Copy>(&mut self, f: F) -> Result<()> {
        match &mut self.storage {
            Storage::Layered(layers) => {
                for layer in layers.iter_mut() {
                    layer.apply(f)?;
                }
            }
            Storage::Constant(v) => *v = f(*v),
            Storage::Internal(buffer) => buffer.map_in_place(f),
            Storage::External { path, .. } => {
                debug!(path = %path.display(), "external array promoted to internal");
                let mut raw = self.raw()?;
                raw.map_in_place(f);
                self.storage = Storage::Internal(raw);
            }
        }
        Ok(())
    }

    /// Add `x` to every raw element
    pub fn add_in_place(&mut self, x: f64) -> Result<()> {
        self.apply(|v| v + x)
    }

    /// Subtract `x` from every raw element
    pub fn sub_in_place(&mut self, x: f64) -> Result<()> {
        self.apply(|v| v - x)
    }

    /// Multiply every raw element by `x`
    pub fn scale(&mut self, x: f64) -> Result<()> {
        self.apply(|v| v * x)
    }

    /// Divide every raw element by `x`
    pub fn div_in_place(&mut self, x: f64) -> Result<()> {
        self.apply(|v| v / x)
    }

    /// Raise every raw element to the power `x`
    pub fn pow_in_place(&mut self, x: f64) -> Result<()> {
        self.apply(|v| v.powf(x))
    }

    /// Raw elements in row-major order
    pub fn raw_values(&self) -> Result<Vec<f64>> {
        Ok(self.raw()?.to_vec())
    }

    pub fn min(&self) -> Result<f64> {
        Ok(self.value()?.min())
    }

    pub fn max(&self) -> Result<f64> {
        Ok(self.value()?.max())
    }

    pub fn mean(&self) -> Result<f64> {
        Ok(self.value()?.mean())
    }

    pub fn median(&self) -> Result<f64> {
        Ok(self.value()?.median())
    }

    pub fn std(&self) -> Result<f64> {
        Ok(self.value()?.std())
    }

    pub fn sum(&self) -> Result<f64> {
        Ok(self.value()?.sum())
    }
}

fn external_data<'a>(
    shape: &[usize],
    path: &Path,
    base_dir: &Path,
    data: &'a OnceCell<NumericBuffer>,
) -> Result<&'a NumericBuffer> {
    if let Some(buffer) = data.get() {
        return Ok(buffer);
    }
    let loaded = crate::parser::read_external(&base_dir.join(path), shape)?;
    Ok(data.get_or_init(|| loaded))
}
