//! Loaded blocks

use super::{BlockSpec, ParameterSpec, ShapeSpec, Value, ValueTag};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// Parameter values of one `BEGIN`/`END` span.
///
/// Keys are always declared parameters of the block's spec. `index`
/// distinguishes repeated occurrences of the same block, such as stress
/// periods.
#[derive(Debug, Clone)]
pub struct Block {
    spec: Arc<BlockSpec>,
    index: Option<usize>,
    values: IndexMap<String, Value>,
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.spec.name == other.spec.name
            && self.index == other.index
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .all(|(k, v)| other.values.get(k) == Some(v))
    }
}

impl Block {
    pub fn new(spec: Arc<BlockSpec>) -> Self {
        Self {
            spec,
            index: None,
            values: IndexMap::new(),
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn spec(&self) -> &Arc<BlockSpec> {
        &self.spec
    }

    /// Value by case-insensitive parameter name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&name.to_ascii_lowercase())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(&name.to_ascii_lowercase())
    }

    /// Value, or the declared default when absent
    pub fn get_or_default(&self, name: &str) -> Option<&Value> {
        self.get(name)
            .or_else(|| self.spec.param(name)?.default.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_ascii_lowercase())
    }

    /// Assign a declared parameter, checking its type
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let Some(spec) = self.spec.param(name).cloned() else {
            return Err(Error::UnrecognizedParameter {
                block: self.spec.name.clone(),
                name: name.to_string(),
                line: 0,
            });
        };
        let value = coerce(&spec, value.into())?;
        self.insert(&spec, value);
        Ok(())
    }

    pub(crate) fn insert(&mut self, spec: &ParameterSpec, value: Value) {
        self.values.insert(spec.name.clone(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(&name.to_ascii_lowercase())
    }

    /// Present values in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<ParameterSpec>, &Value)> {
        self.spec
            .params
            .iter()
            .filter_map(|p| self.values.get(&p.name).map(|v| (p, v)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail on the first required parameter that is neither present nor defaulted
    pub fn validate(&self) -> Result<()> {
        match self
            .spec
            .params
            .iter()
            .find(|p| !p.optional && p.default.is_none() && !self.values.contains_key(&p.name))
        {
            Some(missing) => Err(Error::MissingRequiredParameter {
                block: self.spec.name.clone(),
                name: missing.name.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Check a value against its spec; a repeating parameter always holds a list
fn coerce(spec: &ParameterSpec, value: Value) -> Result<Value> {
    if !spec.repeating {
        return coerce_one(spec, value);
    }
    let items = match value {
        Value::List(items) => items,
        single => vec![single],
    };
    items
        .into_iter()
        .map(|item| coerce_one(spec, item))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

fn coerce_one(spec: &ParameterSpec, value: Value) -> Result<Value> {
    match (spec.tag, value) {
        (ValueTag::Double, Value::Integer(i)) => Ok(Value::Double(i as f64)),
        (ValueTag::Array, Value::Array(arr)) => {
            // only fixed shapes are known without a load context
            if let Some(ShapeSpec::Fixed(expected)) = &spec.shape {
                if arr.shape() != expected.as_slice() {
                    return Err(Error::ShapeMismatch {
                        expected: expected.clone(),
                        actual: arr.shape().iter().product(),
                    });
                }
            }
            Ok(Value::Array(arr))
        }
        (tag, value) if tag == value.tag() => Ok(value),
        (tag, value) => Err(Error::TypeMismatch {
            name: spec.name.clone(),
            expected: tag,
            actual: value.tag(),
        }),
    }
}
