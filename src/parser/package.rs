//! Package loader: one stream dispatched across the block loaders of a package

use super::block::load_block;
use super::cursor::LineSource;
use super::primitives::{strip_comment, tokenize};
use crate::context::{Dimensions, LoadContext};
use crate::error::Result;
use crate::types::{Package, PackageSpec};
use std::sync::Arc;
use tracing::{debug, trace};

/// Block whose integer parameters size the arrays of later blocks
const DIMENSIONS_BLOCK: &str = "dimensions";

/// Load every block of a package, in file order.
///
/// Blocks the package does not declare are skipped. A `dimensions` block
/// updates the shape context for the blocks that follow it.
pub fn load_package<S: LineSource + ?Sized>(
    src: &mut S,
    spec: &Arc<PackageSpec>,
    ctx: &LoadContext,
) -> Result<Package> {
    let mut ctx = ctx.clone();
    let mut package = Package::new(spec.clone());

    loop {
        let mark = src.mark()?;
        let Some(raw) = src.next_line()? else {
            break;
        };
        let tokens = tokenize(strip_comment(&raw));
        let is_begin = tokens
            .first()
            .is_some_and(|t| t.eq_ignore_ascii_case("begin"));
        let block_spec = match tokens.get(1) {
            Some(name) if is_begin => spec.block(name),
            _ => None,
        };
        let Some(block_spec) = block_spec else {
            if !tokens.is_empty() {
                trace!(package = %spec.name, line = src.line_number(), "skipping line");
            }
            continue;
        };

        src.reset(mark)?;
        let Some(block) = load_block(src, block_spec, &ctx)? else {
            break;
        };
        if block.name() == DIMENSIONS_BLOCK {
            ctx.dimensions = Some(Dimensions::from_block(&block));
        }
        package.push(block)?;
    }

    debug!(package = %spec.name, "loaded package");
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineCursor;
    use crate::types::{BlockSpec, ParameterSpec, ShapeSpec, Value};

    fn spec() -> Arc<PackageSpec> {
        Arc::new(PackageSpec::new(
            "demo",
            vec![
                BlockSpec::new("dimensions", vec![ParameterSpec::integer("ncol").required()]),
                BlockSpec::new(
                    "data",
                    vec![ParameterSpec::array("x", ShapeSpec::Dims(vec!["ncol".into()]))],
                ),
                BlockSpec::new("period", vec![ParameterSpec::integer("n")]),
            ],
        ))
    }

    #[test]
    fn dimensions_size_later_arrays() {
        let text = "BEGIN DIMENSIONS\n  NCOL 2\nEND DIMENSIONS\n\nBEGIN DATA\n  X\n    INTERNAL\n      1 2\nEND DATA\n";
        let package = load_package(&mut LineCursor::new(text), &spec(), &LoadContext::default())
            .unwrap();
        let x = package.get("x").and_then(Value::as_array).unwrap();
        assert_eq!(x.shape(), &[2]);
    }

    #[test]
    fn unknown_blocks_skipped_and_indices_kept() {
        let text = "BEGIN EXTRA\n  whatever 1\nEND EXTRA\nBEGIN PERIOD 1\n  N 1\nEND PERIOD\nBEGIN PERIOD 2\n  N 2\nEND PERIOD\n";
        let package = load_package(&mut LineCursor::new(text), &spec(), &LoadContext::default())
            .unwrap();
        let periods = package.blocks("period");
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].index(), Some(1));
        assert_eq!(periods[1].index(), Some(2));
        assert_eq!(
            package.indexed("period", 2).and_then(|b| b.get("n")),
            Some(&Value::Integer(2))
        );
    }
}
