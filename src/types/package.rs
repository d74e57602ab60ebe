//! Loaded packages

use super::{Block, PackageSpec, Value};
use crate::context::LoadContext;
use crate::error::{Error, Result};
use crate::parser::{self, LineSource};
use crate::writer;
use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// All blocks loaded for one package, grouped by block name.
///
/// Repeated blocks (e.g. periods) keep file order within their group.
#[derive(Debug, Clone)]
pub struct Package {
    spec: Arc<PackageSpec>,
    blocks: IndexMap<String, Vec<Block>>,
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.spec.name == other.spec.name
            && self
                .spec
                .blocks
                .iter()
                .all(|b| self.blocks(&b.name) == other.blocks(&b.name))
    }
}

impl Package {
    pub fn new(spec: Arc<PackageSpec>) -> Self {
        Self {
            spec,
            blocks: IndexMap::new(),
        }
    }

    /// Load from a line stream; see [`parser::load_package`]
    pub fn load<S: LineSource + ?Sized>(
        src: &mut S,
        spec: &Arc<PackageSpec>,
        ctx: &LoadContext,
    ) -> Result<Self> {
        parser::load_package(src, spec, ctx)
    }

    /// Load a package file, resolving external arrays against its directory
    pub fn load_path(path: impl AsRef<Path>, spec: &Arc<PackageSpec>) -> Result<Self> {
        parser::load_path(path, spec)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer::write_package(writer, self)
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &Arc<PackageSpec> {
        &self.spec
    }

    /// Add a block declared by this package
    pub fn push(&mut self, block: Block) -> Result<()> {
        if self.spec.block(block.name()).is_none() {
            return Err(Error::UnrecognizedParameter {
                block: self.spec.name.clone(),
                name: block.name().to_string(),
                line: 0,
            });
        }
        self.blocks
            .entry(block.name().to_string())
            .or_default()
            .push(block);
        Ok(())
    }

    /// First block with this name
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks(name).first()
    }

    pub fn block_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.blocks
            .get_mut(&name.to_ascii_lowercase())?
            .first_mut()
    }

    /// Every occurrence of a block, in file order
    pub fn blocks(&self, name: &str) -> &[Block] {
        self.blocks
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Occurrence of a repeated block with the given index
    pub fn indexed(&self, name: &str, index: usize) -> Option<&Block> {
        self.blocks(name).iter().find(|b| b.index() == Some(index))
    }

    /// All blocks, in declared block order
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.spec
            .blocks
            .iter()
            .flat_map(|spec| self.blocks(&spec.name).iter())
    }

    /// Parameter value from the first block that holds it
    pub fn get(&self, param: &str) -> Option<&Value> {
        self.iter().find_map(|block| block.get(param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockSpec, ParameterSpec};

    fn spec() -> Arc<PackageSpec> {
        Arc::new(PackageSpec::new(
            "pkg",
            vec![
                BlockSpec::new("options", vec![ParameterSpec::keyword("save")]),
                BlockSpec::new("period", vec![ParameterSpec::integer("rate")]),
            ],
        ))
    }

    #[test]
    fn indexed_blocks_keep_order() {
        let spec = spec();
        let period = spec.block("period").unwrap().clone();
        let mut pkg = Package::new(spec);
        for (index, rate) in [(1, 10i64), (3, 30)] {
            let mut block = Block::new(period.clone()).with_index(index);
            block.set("rate", rate).unwrap();
            pkg.push(block).unwrap();
        }
        assert_eq!(pkg.blocks("PERIOD").len(), 2);
        assert_eq!(pkg.indexed("period", 3).unwrap().get("rate"), Some(&Value::Integer(30)));
        assert_eq!(pkg.get("rate"), Some(&Value::Integer(10)));
        assert!(pkg.block("options").is_none());
    }

    #[test]
    fn foreign_block_rejected() {
        let other = Arc::new(BlockSpec::new("griddata", vec![]));
        let mut pkg = Package::new(spec());
        assert!(pkg.push(Block::new(other)).is_err());
    }
}
