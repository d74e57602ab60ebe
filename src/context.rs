//! Load configuration and model dimensions

use crate::error::{Error, Result};
use crate::types::{Block, ShapeSpec};
use std::path::{Path, PathBuf};

/// Grid dimensions taken from a `dimensions` block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub nlay: Option<usize>,
    pub nrow: Option<usize>,
    pub ncol: Option<usize>,
    pub ncpl: Option<usize>,
    pub nodes: Option<usize>,
}

impl Dimensions {
    /// Read the integer dimension parameters of a loaded block
    pub fn from_block(block: &Block) -> Self {
        let dim = |name: &str| {
            block
                .get(name)
                .and_then(|v| v.as_int())
                .and_then(|v| usize::try_from(v).ok())
        };
        Self {
            nlay: dim("nlay"),
            nrow: dim("nrow"),
            ncol: dim("ncol"),
            ncpl: dim("ncpl"),
            nodes: dim("nodes"),
        }
    }

    /// Named dimension lookup
    pub fn get(&self, name: &str) -> Option<usize> {
        match name.to_ascii_lowercase().as_str() {
            "nlay" => self.nlay,
            "nrow" => self.nrow,
            "ncol" => self.ncol,
            "ncpl" => self.ncpl,
            "nodes" => self.nodes,
            _ => None,
        }
    }

    /// Model grid shape.
    ///
    /// Structured (rows and columns) wins over vertex (cells per layer),
    /// which wins over unstructured (flat node count). This ordering matches
    /// how the discretization packages declare their dimensions; it is a
    /// convention of the format, not a general rule.
    pub fn grid_shape(&self) -> Option<Vec<usize>> {
        let nlay = self.nlay.unwrap_or(1);
        match (self.nrow, self.ncol, self.ncpl, self.nodes) {
            (Some(nrow), Some(ncol), _, _) => Some(vec![nlay, nrow, ncol]),
            (_, _, Some(ncpl), _) => Some(vec![nlay, ncpl]),
            (_, _, _, Some(nodes)) => Some(vec![nodes]),
            _ => None,
        }
    }
}

/// Everything a load call needs besides the text itself
#[derive(Debug, Clone, Default)]
pub struct LoadContext {
    /// Base directory for OPEN/CLOSE paths
    pub working_dir: PathBuf,
    pub dimensions: Option<Dimensions>,
    /// Explicit model shape; takes precedence over `dimensions`
    pub model_shape: Option<Vec<usize>>,
}

impl LoadContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_model_shape(mut self, shape: Vec<usize>) -> Self {
        self.model_shape = Some(shape);
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Concrete shape for an array parameter
    pub fn resolve_shape(&self, param: &str, shape: &ShapeSpec) -> Result<Vec<usize>> {
        let unresolved = || Error::UnresolvedShape {
            param: param.to_string(),
        };
        match shape {
            ShapeSpec::Fixed(dims) => Ok(dims.clone()),
            ShapeSpec::Grid => self
                .model_shape
                .clone()
                .or_else(|| self.dimensions.as_ref()?.grid_shape())
                .ok_or_else(unresolved),
            ShapeSpec::Nodes => self
                .model_shape
                .clone()
                .or_else(|| self.dimensions.as_ref()?.grid_shape())
                .map(|grid| vec![grid.iter().product()])
                .ok_or_else(unresolved),
            ShapeSpec::Dims(names) => {
                let dims = self.dimensions.as_ref().ok_or_else(unresolved)?;
                names
                    .iter()
                    .map(|name| dims.get(name).ok_or_else(unresolved))
                    .collect()
            }
        }
    }
}
