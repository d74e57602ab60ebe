//! Scalar, record and keystring parsing from one line's tokens

use super::primitives::{parse_f64, parse_i64};
use crate::error::{Error, Result};
use crate::types::{Fields, ParameterSpec, Reader, Value, ValueTag};
use std::path::PathBuf;

/// Marker tokens allowed before a file path
const FILE_MARKERS: [&str; 2] = ["FILEIN", "FILEOUT"];

/// Parse a scalar from the tokens following its name.
///
/// Returns the value and the number of tokens consumed.
pub fn parse_scalar(spec: &ParameterSpec, tokens: &[&str], line: usize) -> Result<(Value, usize)> {
    let first = || {
        tokens.first().copied().ok_or_else(|| Error::MissingToken {
            param: spec.name.clone(),
            line,
        })
    };
    match spec.tag {
        ValueTag::Keyword => Ok((Value::Keyword(true), 0)),
        ValueTag::Integer => Ok((Value::Integer(parse_i64(first()?, line)?), 1)),
        ValueTag::Double => Ok((Value::Double(parse_f64(first()?, line)?), 1)),
        ValueTag::String => match spec.reader {
            Reader::Urword => Ok((Value::String(first()?.to_string()), 1)),
            Reader::Freeform => {
                first()?;
                Ok((Value::String(tokens.join(" ")), tokens.len()))
            }
        },
        ValueTag::FilePath => {
            let skip = usize::from(
                tokens
                    .first()
                    .is_some_and(|t| FILE_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m))),
            );
            let path = tokens.get(skip).ok_or_else(|| Error::MissingToken {
                param: spec.name.clone(),
                line,
            })?;
            Ok((Value::FilePath(PathBuf::from(*path)), skip + 1))
        }
        ValueTag::Record => Ok((parse_record(spec, tokens, line)?, tokens.len())),
        ValueTag::Array | ValueTag::Keystring | ValueTag::List => Err(Error::TypeMismatch {
            name: spec.name.clone(),
            expected: ValueTag::String,
            actual: spec.tag,
        }),
    }
}

/// Parse a record's members, in declared order, from one line.
///
/// Keyword members are present when their name appears; tagged members
/// expect their name before the value; other members are value-only.
pub fn parse_record(spec: &ParameterSpec, tokens: &[&str], line: usize) -> Result<Value> {
    let mut fields = Fields::new();
    let mut pos = 0;
    for member in &spec.members {
        let by_name = member.tag == ValueTag::Keyword || member.tagged;
        let named = by_name
            && tokens
                .get(pos)
                .is_some_and(|t| t.eq_ignore_ascii_case(&member.name));
        let present = if by_name { named } else { pos < tokens.len() };
        if !present {
            if member.optional {
                continue;
            }
            return Err(Error::MissingRequiredParameter {
                block: spec.name.clone(),
                name: member.name.clone(),
            });
        }
        if named {
            pos += 1;
        }
        let (value, used) = parse_scalar(member, &tokens[pos..], line)?;
        pos += used;
        fields.insert(member.name.clone(), value);
    }
    Ok(Value::Record(fields))
}
