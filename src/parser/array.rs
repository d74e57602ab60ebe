//! Array codec, read path
//!
//! ```text
//!   NAME [LAYERED]
//!     INTERNAL [FACTOR f] [IPRN n]
//!       v v v ...
//!     CONSTANT c [FACTOR f]
//!     OPEN/CLOSE path [FACTOR f]
//! ```

use super::cursor::{LineCursor, LineSource};
use super::primitives::{is_numeric_line, next_content_line, parse_f64, strip_comment, tokenize};
use crate::context::LoadContext;
use crate::error::{Error, Result};
use crate::types::{Array, How, NumericBuffer, ParameterSpec, ShapeSpec};
use std::path::{Path, PathBuf};
use tracing::debug;

const LAYERED: &str = "LAYERED";
const FACTOR: &str = "FACTOR";

/// Load an array parameter starting at its name line
pub fn load_array<S: LineSource + ?Sized>(
    src: &mut S,
    spec: &ParameterSpec,
    ctx: &LoadContext,
) -> Result<Array> {
    let Some(header) = next_content_line(src)? else {
        return Err(Error::MissingToken {
            param: spec.name.clone(),
            line: src.line_number(),
        });
    };
    array_from_header(src, spec, &tokenize(&header), ctx)
}

/// Load an array whose name line has already been read and tokenized
pub(crate) fn array_from_header<S: LineSource + ?Sized>(
    src: &mut S,
    spec: &ParameterSpec,
    header: &[&str],
    ctx: &LoadContext,
) -> Result<Array> {
    let shape_spec = spec
        .shape
        .clone()
        .unwrap_or(ShapeSpec::Grid);
    let shape = ctx.resolve_shape(&spec.name, &shape_spec)?;
    let layered = spec.layered
        || header
            .last()
            .is_some_and(|t| t.eq_ignore_ascii_case(LAYERED) && header.len() > 1);
    read_array(src, &spec.name, ctx.working_dir(), &shape, layered)
}

/// Read one array body (control line onwards) of a resolved shape.
///
/// When `layered`, reads `shape[0]` consecutive control lines and bodies,
/// each of shape `shape[1..]`.
pub fn read_array<S: LineSource + ?Sized>(
    src: &mut S,
    name: &str,
    working_dir: &Path,
    shape: &[usize],
    layered: bool,
) -> Result<Array> {
    if !layered {
        return read_single(src, name, working_dir, shape);
    }
    let Some((&nlay, inner)) = shape.split_first().filter(|(_, inner)| !inner.is_empty()) else {
        return Err(Error::ShapeMismatch {
            expected: shape.to_vec(),
            actual: 0,
        });
    };
    let layers = (0..nlay)
        .map(|_| read_single(src, name, working_dir, inner))
        .collect::<Result<Vec<_>>>()?;
    Array::layered(shape, layers)
}

fn read_single<S: LineSource + ?Sized>(
    src: &mut S,
    name: &str,
    working_dir: &Path,
    shape: &[usize],
) -> Result<Array> {
    let Some(control) = next_content_line(src)? else {
        return Err(Error::MissingToken {
            param: name.to_string(),
            line: src.line_number(),
        });
    };
    let line = src.line_number();
    let tokens = tokenize(&control);
    let keyword = tokens.first().copied().unwrap_or_default();
    let how = How::from_keyword(keyword).ok_or_else(|| Error::UnknownArrayRepresentation {
        token: keyword.to_string(),
        line,
    })?;
    let operand = |what: &'static str| {
        tokens.get(1).copied().ok_or_else(|| Error::MissingToken {
            param: format!("{name} {what}"),
            line,
        })
    };

    let array = match how {
        How::Internal => Array::from_buffer(NumericBuffer::new(shape, read_values(src)?)?),
        How::Constant => Array::constant(shape, parse_f64(operand("constant")?, line)?),
        How::External => {
            let path = PathBuf::from(operand("path")?);
            let data = read_external(&working_dir.join(&path), shape)?;
            Array::external_loaded(path, working_dir.to_path_buf(), data)
        }
    };

    let factor = match tokens.iter().position(|t| t.eq_ignore_ascii_case(FACTOR)) {
        Some(at) => {
            let token = tokens.get(at + 1).ok_or_else(|| Error::MissingToken {
                param: format!("{name} factor"),
                line,
            })?;
            Some(parse_f64(token, line)?)
        }
        None => None,
    };
    Ok(match factor {
        Some(f) => array.with_factor(f),
        None => array,
    })
}

/// Read numeric body lines until a line that is not numeric.
///
/// The stream is left positioned at that line.
pub fn read_values<S: LineSource + ?Sized>(src: &mut S) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    loop {
        let mark = src.mark()?;
        let Some(raw) = src.next_line()? else {
            break;
        };
        let line = strip_comment(&raw);
        if line.is_empty() {
            continue;
        }
        if !is_numeric_line(line) {
            src.reset(mark)?;
            break;
        }
        let number = src.line_number();
        for token in line.split_whitespace() {
            values.push(parse_f64(token, number)?);
        }
    }
    Ok(values)
}

/// Read an external array file in full.
///
/// The file handle is dropped before returning, whether or not parsing
/// succeeded.
pub(crate) fn read_external(path: &Path, shape: &[usize]) -> Result<NumericBuffer> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::External {
        path: path.to_path_buf(),
        source,
    })?;
    let values = read_values(&mut LineCursor::new(&text))?;
    debug!(path = %path.display(), count = values.len(), "read external array");
    NumericBuffer::new(shape, values)
}
