//! Block loader
//!
//! Scans for `BEGIN <name> [index]`, dispatches each body line to the
//! parser of the parameter it names, and stops at `END <name>`.

use super::array::array_from_header;
use super::cursor::LineSource;
use super::primitives::{strip_comment, tokenize};
use super::value::{parse_record, parse_scalar};
use crate::context::LoadContext;
use crate::error::{Error, Result};
use crate::types::{Block, BlockSpec, Fields, ParameterSpec, Reader, Value, ValueTag};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Load the next occurrence of a block.
///
/// Lines before its `BEGIN` that are not block headers are skipped. Returns
/// `Ok(None)` at end of input, or when the next header opens a different
/// block; the stream is then rewound to that header so another loader can
/// take it.
pub fn load_block<S: LineSource + ?Sized>(
    src: &mut S,
    spec: &Arc<BlockSpec>,
    ctx: &LoadContext,
) -> Result<Option<Block>> {
    let index = loop {
        let mark = src.mark()?;
        let Some(raw) = src.next_line()? else {
            return Ok(None);
        };
        let tokens = tokenize(strip_comment(&raw));
        let Some(first) = tokens.first() else {
            continue;
        };
        if !first.eq_ignore_ascii_case("begin") {
            trace!(line = src.line_number(), "skipping line outside block");
            continue;
        }
        if !tokens
            .get(1)
            .is_some_and(|name| name.eq_ignore_ascii_case(&spec.name))
        {
            src.reset(mark)?;
            return Ok(None);
        }
        break match tokens.get(2) {
            // indices are positive
            Some(token) => Some(
                token
                    .parse::<usize>()
                    .ok()
                    .filter(|&index| index > 0)
                    .ok_or_else(|| Error::NumericParse {
                        token: token.to_string(),
                        line: src.line_number(),
                    })?,
            ),
            None => None,
        };
    };
    debug!(block = %spec.name, ?index, "begin block");

    let mut block = Block::new(spec.clone());
    if let Some(index) = index {
        block = block.with_index(index);
    }

    loop {
        let Some(raw) = src.next_line()? else {
            return Err(Error::UnexpectedEof {
                block: spec.name.clone(),
            });
        };
        let line = src.line_number();
        let text = strip_comment(&raw);
        let tokens = tokenize(text);
        let Some(key) = tokens.first().copied() else {
            continue;
        };
        if key.eq_ignore_ascii_case("end") {
            match tokens.get(1) {
                Some(name) if !name.eq_ignore_ascii_case(&spec.name) => {
                    return Err(Error::MismatchedEnd {
                        expected: spec.name.clone(),
                        found: name.to_string(),
                        line,
                    });
                }
                _ => break,
            }
        }
        load_param(src, ctx, &mut block, &tokens, text, line)?;
    }

    block.validate()?;
    debug!(block = %spec.name, params = block.len(), "end block");
    Ok(Some(block))
}

/// Dispatch one body line to the parameter it names
fn load_param<S: LineSource + ?Sized>(
    src: &mut S,
    ctx: &LoadContext,
    block: &mut Block,
    tokens: &[&str],
    text: &str,
    line: usize,
) -> Result<()> {
    let spec = block.spec().clone();
    let key = tokens[0];
    let rest = &tokens[1..];

    if let Some(param) = spec.param(key) {
        let value = match param.tag {
            ValueTag::Array => Value::Array(array_from_header(src, param, tokens, ctx)?),
            ValueTag::Record => parse_record(param, rest, line)?,
            ValueTag::Keystring => {
                // `NAME MEMBER ...` spelled out in full
                let Some(member) = rest.first().and_then(|m| param.member(m)) else {
                    return Err(unrecognized(&spec, rest.first().unwrap_or(&key), line));
                };
                add_keystring_entry(block, param, member, &rest[1..], line)?;
                return Ok(());
            }
            ValueTag::String if param.reader == Reader::Freeform => {
                Value::String(text[key.len()..].trim().to_string())
            }
            _ => parse_scalar(param, rest, line)?.0,
        };
        if param.repeating {
            match block.get_mut(&param.name) {
                Some(Value::List(items)) => items.push(value),
                _ => block.insert(param, Value::List(vec![value])),
            }
            return Ok(());
        }
        if block.contains(&param.name) {
            warn!(block = %spec.name, param = %param.name, line, "parameter given twice, keeping the last");
        }
        block.insert(param, value);
        return Ok(());
    }

    for param in &spec.params {
        match param.tag {
            ValueTag::Keystring => {
                if let Some(member) = param.member(key) {
                    return add_keystring_entry(block, param, member, rest, line);
                }
            }
            // a record may be introduced by its leading keyword instead of its name
            ValueTag::Record => {
                let leads = param.members.first().is_some_and(|m| {
                    m.tag == ValueTag::Keyword && m.name.eq_ignore_ascii_case(key)
                });
                if leads {
                    let value = parse_record(param, tokens, line)?;
                    block.insert(param, value);
                    return Ok(());
                }
            }
            _ => {}
        }
    }

    Err(unrecognized(&spec, key, line))
}

fn add_keystring_entry(
    block: &mut Block,
    keystring: &ParameterSpec,
    member: &ParameterSpec,
    tokens: &[&str],
    line: usize,
) -> Result<()> {
    let (value, _) = parse_scalar(member, tokens, line)?;
    if let Some(Value::Keystring(fields)) = block.get_mut(&keystring.name) {
        fields.insert(member.name.clone(), value);
    } else {
        let mut fields = Fields::new();
        fields.insert(member.name.clone(), value);
        block.insert(keystring, Value::Keystring(fields));
    }
    Ok(())
}

fn unrecognized(spec: &BlockSpec, name: &str, line: usize) -> Error {
    Error::UnrecognizedParameter {
        block: spec.name.clone(),
        name: name.to_string(),
        line,
    }
}
