//! Serialization of blocks and packages back to text

mod array;
mod value;

pub use array::write_array;
pub use value::write_param;

use crate::types::{Block, Package};
use std::io::{self, Write};

/// Indent of a parameter line
const PAD: &str = "  ";
/// Indent of an array control line
const CONTROL_PAD: &str = "    ";
/// Indent of a layer's control line in a layered array
const LAYER_PAD: &str = "      ";

/// Write one block: header, declared parameters in schema order, footer.
///
/// Absent parameters are skipped and defaults are never written.
pub fn write_block<W: Write>(writer: &mut W, block: &Block) -> io::Result<()> {
    let name = block.name().to_ascii_uppercase();
    match block.index() {
        Some(index) => writeln!(writer, "BEGIN {name} {index}")?,
        None => writeln!(writer, "BEGIN {name}")?,
    }
    for (spec, value) in block.iter() {
        write_param(writer, spec, value)?;
    }
    writeln!(writer, "END {name}")?;
    Ok(())
}

/// Write every block of a package, separated by blank lines
pub fn write_package<W: Write>(writer: &mut W, package: &Package) -> io::Result<()> {
    for (i, block) in package.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        write_block(writer, block)?;
    }
    Ok(())
}

/// Render a package to a string
pub fn to_string(package: &Package) -> io::Result<String> {
    let mut buf = Vec::new();
    write_package(&mut buf, package)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Render one block to a string
pub fn block_to_string(block: &Block) -> io::Result<String> {
    let mut buf = Vec::new();
    write_block(&mut buf, block)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadContext;
    use crate::parser::parse_block;
    use crate::types::{BlockSpec, ParameterSpec, Value};
    use std::sync::Arc;

    fn options() -> Arc<BlockSpec> {
        Arc::new(BlockSpec::new(
            "options",
            vec![
                ParameterSpec::keyword("k"),
                ParameterSpec::integer("i"),
                ParameterSpec::double("d"),
                ParameterSpec::string("s").required(),
            ],
        ))
    }

    #[test]
    fn options_block_byte_equal() {
        let text = "BEGIN OPTIONS\n  K\n  I 1\n  D 1.0\n  S value\nEND OPTIONS\n";
        let block = parse_block(text, &options(), &LoadContext::default()).unwrap();
        assert_eq!(block_to_string(&block).unwrap(), text);
    }

    #[test]
    fn declared_order_and_index() {
        let mut block = crate::types::Block::new(options()).with_index(2);
        block.set("s", "x").unwrap();
        block.set("k", true).unwrap();
        assert_eq!(
            block_to_string(&block).unwrap(),
            "BEGIN OPTIONS 2\n  K\n  S x\nEND OPTIONS\n"
        );
    }

    #[test]
    fn punctuation_in_values_survives_reload() {
        let spec = Arc::new(BlockSpec::new(
            "options",
            vec![
                ParameterSpec::string("title").freeform(),
                ParameterSpec::filepath("f"),
            ],
        ));
        let mut block = crate::types::Block::new(spec.clone());
        block.set("title", "Hi! run#2").unwrap();
        block.set("f", std::path::PathBuf::from("out#1.lst")).unwrap();
        let text = block_to_string(&block).unwrap();
        assert_eq!(parse_block(&text, &spec, &LoadContext::default()).unwrap(), block);
    }

    #[test]
    fn repeating_parameter_roundtrip() {
        let spec = Arc::new(BlockSpec::new(
            "period",
            vec![ParameterSpec::integer("rate").repeating()],
        ));
        let text = "BEGIN PERIOD 1\n  RATE 1\n  RATE 2\nEND PERIOD\n";
        let block = parse_block(text, &spec, &LoadContext::default()).unwrap();
        assert_eq!(
            block.get("rate"),
            Some(&Value::List(vec![Value::Integer(1), Value::Integer(2)]))
        );
        let written = block_to_string(&block).unwrap();
        assert_eq!(written, text);
        assert_eq!(parse_block(&written, &spec, &LoadContext::default()).unwrap(), block);
    }

    #[test]
    fn defaults_not_written() {
        let spec = Arc::new(BlockSpec::new(
            "options",
            vec![ParameterSpec::integer("n").with_default(Value::Integer(5))],
        ));
        let block = crate::types::Block::new(spec);
        assert_eq!(block.get_or_default("n"), Some(&Value::Integer(5)));
        assert_eq!(
            block_to_string(&block).unwrap(),
            "BEGIN OPTIONS\nEND OPTIONS\n"
        );
    }
}
