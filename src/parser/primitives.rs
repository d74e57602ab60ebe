//! Line and token helpers shared by the block and array readers

use super::cursor::LineSource;
use crate::error::{Error, Result};

/// Print-control keyword; it and its argument are dropped wherever they appear
const PRINT_CONTROL: &str = "IPRN";

/// Drop a trailing comment and surrounding whitespace.
///
/// `#`, `!` and `//` start a comment only at the beginning of a token, so
/// `title Hi!` and `OPEN/CLOSE run#1.dat` are kept whole.
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let end = line
        .char_indices()
        .find(|&(i, c)| {
            let marker = c == '#' || c == '!' || line[i..].starts_with("//");
            marker && (i == 0 || bytes[i - 1].is_ascii_whitespace())
        })
        .map_or(line.len(), |(i, _)| i);
    line[..end].trim()
}

/// Next line with content, comments stripped; blank lines are skipped
pub fn next_content_line<S: LineSource + ?Sized>(src: &mut S) -> Result<Option<String>> {
    while let Some(raw) = src.next_line()? {
        let line = strip_comment(&raw);
        if !line.is_empty() {
            return Ok(Some(line.to_string()));
        }
    }
    Ok(None)
}

/// Whitespace tokens with any print-control pair removed
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    if let Some(at) = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case(PRINT_CONTROL))
    {
        let end = (at + 2).min(tokens.len());
        tokens.drain(at..end);
    }
    tokens
}

/// Whether a line belongs to a numeric array body
pub fn is_numeric_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
}

/// Parse a float, accepting Fortran `d` exponents
pub fn parse_f64(token: &str, line: usize) -> Result<f64> {
    token
        .replace(['d', 'D'], "e")
        .parse()
        .map_err(|_| Error::NumericParse {
            token: token.to_string(),
            line,
        })
}

pub fn parse_i64(token: &str, line: usize) -> Result<i64> {
    token.parse().map_err(|_| Error::NumericParse {
        token: token.to_string(),
        line,
    })
}

/// Format a float so that it reads back to the same value
pub fn format_f64(value: f64) -> String {
    format!("{value:?}")
}
