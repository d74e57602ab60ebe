//! Text reader for block-structured input files
//!
//! Everything reads from a [`LineSource`], which lets a reader look one
//! line past the end of what it owns and hand that line back.

mod array;
mod block;
mod cursor;
mod package;
mod primitives;
mod value;

pub use array::{load_array, read_array, read_values};
pub use block::load_block;
pub use cursor::{LineCursor, LineSource, Mark, SeekLines};
pub use package::load_package;
pub use primitives::{format_f64, parse_f64, parse_i64, strip_comment, tokenize};
pub use value::{parse_record, parse_scalar};

pub(crate) use array::read_external;

use crate::context::LoadContext;
use crate::error::{Error, Result};
use crate::types::{Block, BlockSpec, Package, PackageSpec};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Parse the first occurrence of a block from text.
///
/// Fails with `UnexpectedEof` when the block never opens.
pub fn parse_block(text: &str, spec: &Arc<BlockSpec>, ctx: &LoadContext) -> Result<Block> {
    load_block(&mut LineCursor::new(text), spec, ctx)?.ok_or_else(|| Error::UnexpectedEof {
        block: spec.name.clone(),
    })
}

/// Parse a whole package from text
pub fn parse_package(text: &str, spec: &Arc<PackageSpec>, ctx: &LoadContext) -> Result<Package> {
    load_package(&mut LineCursor::new(text), spec, ctx)
}

/// Load a package file.
///
/// External array paths resolve against the file's directory.
pub fn load_path(path: impl AsRef<Path>, spec: &Arc<PackageSpec>) -> Result<Package> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::External {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or(Path::new("."));
    let ctx = LoadContext::new(dir);
    load_package(&mut SeekLines::new(BufReader::new(file)), spec, &ctx)
}
