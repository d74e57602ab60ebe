//! Parameter serialization

use super::PAD;
use super::array::write_array;
use crate::parser::format_f64;
use crate::types::{Fields, ParameterSpec, Value};
use std::io::{self, Write};

/// Write one parameter of a block.
///
/// A keyword that is off writes nothing.
pub fn write_param<W: Write>(writer: &mut W, spec: &ParameterSpec, value: &Value) -> io::Result<()> {
    let name = spec.name.to_ascii_uppercase();
    match value {
        Value::Keyword(false) => {}
        Value::Array(arr) => write_array(writer, &spec.name, arr)?,
        Value::List(items) => {
            for item in items {
                write_param(writer, spec, item)?;
            }
        }
        Value::Record(fields) => {
            write!(writer, "{PAD}{name}")?;
            write_members(writer, spec, fields)?;
            writeln!(writer)?;
        }
        Value::Keystring(fields) => {
            for (member, value) in fields {
                match spec.member(member) {
                    Some(member) => write_param(writer, member, value)?,
                    None => {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("{member:?} is not a member of {name}"),
                        ));
                    }
                }
            }
        }
        scalar => match scalar_token(scalar) {
            Some(token) => writeln!(writer, "{PAD}{name} {token}")?,
            None => writeln!(writer, "{PAD}{name}")?,
        },
    }
    Ok(())
}

/// Record members in declared order; tagged and keyword members carry
/// their own name
fn write_members<W: Write>(writer: &mut W, spec: &ParameterSpec, fields: &Fields) -> io::Result<()> {
    for member in &spec.members {
        let Some(value) = fields.get(&member.name) else {
            continue;
        };
        if matches!(value, Value::Keyword(false)) {
            continue;
        }
        let named = member.tagged || matches!(value, Value::Keyword(_));
        if named {
            write!(writer, "{PAD}{}", member.name.to_ascii_uppercase())?;
        }
        if let Some(token) = scalar_token(value) {
            write!(writer, " {token}")?;
        }
    }
    Ok(())
}

/// Text of a scalar's value, `None` for keywords
fn scalar_token(value: &Value) -> Option<String> {
    match value {
        Value::Integer(i) => Some(i.to_string()),
        Value::Double(d) => Some(format_f64(*d)),
        Value::String(s) => Some(s.clone()),
        Value::FilePath(p) => Some(format!("FILEIN {}", p.display())),
        Value::Keyword(_)
        | Value::Array(_)
        | Value::Record(_)
        | Value::Keystring(_)
        | Value::List(_) => None,
    }
}
