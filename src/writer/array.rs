//! Array serialization

use super::{CONTROL_PAD, LAYER_PAD, PAD};
use crate::parser::format_f64;
use crate::types::{Array, How};
use std::io::{self, Write};

/// Write an array parameter: name line, then one control line and body
/// per layer, layers indented one level deeper
pub fn write_array<W: Write>(writer: &mut W, name: &str, arr: &Array) -> io::Result<()> {
    let name = name.to_ascii_uppercase();
    match arr.layers() {
        Some(layers) => {
            writeln!(writer, "{PAD}{name} LAYERED")?;
            for layer in layers {
                write_single(writer, layer, LAYER_PAD)?;
            }
        }
        None => {
            writeln!(writer, "{PAD}{name}")?;
            write_single(writer, arr, CONTROL_PAD)?;
        }
    }
    Ok(())
}

fn write_single<W: Write>(writer: &mut W, arr: &Array, indent: &str) -> io::Result<()> {
    let factor = match arr.explicit_factor() {
        Some(f) => format!(" FACTOR {}", format_f64(f)),
        None => String::new(),
    };
    let how = arr.how().single().copied().unwrap_or(How::Internal);
    match how {
        How::Internal => {
            let buffer = arr.internal_buffer().ok_or_else(|| invalid("internal array without data"))?;
            assert_eq!(
                buffer.shape(),
                arr.shape(),
                "internal buffer does not match its array shape"
            );
            writeln!(writer, "{indent}INTERNAL{factor}")?;
            for row in buffer.rows() {
                let row: Vec<String> = row.into_iter().map(format_f64).collect();
                writeln!(writer, "{indent}{PAD}{}", row.join(" "))?;
            }
        }
        How::Constant => {
            let value = arr.constant_value().ok_or_else(|| invalid("constant array without value"))?;
            writeln!(writer, "{indent}CONSTANT {}{factor}", format_f64(value))?;
        }
        How::External => {
            let path = arr.path().ok_or_else(|| invalid("external array without path"))?;
            writeln!(writer, "{indent}OPEN/CLOSE {}{factor}", path.display())?;
        }
    }
    Ok(())
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}
