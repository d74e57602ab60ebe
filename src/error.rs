//! Error types for mf6input

use crate::types::ValueTag;
use std::io;
use std::path::PathBuf;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, building or mutating input data.
///
/// Every load error is fatal to the enclosing load call; there is no
/// partial load.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// First token of an array control line is not INTERNAL, CONSTANT or OPEN/CLOSE
    #[error("unknown array representation '{token}' at line {line}")]
    UnknownArrayRepresentation { token: String, line: usize },

    /// A token failed the numeric grammar
    #[error("invalid number '{token}' at line {line}")]
    NumericParse { token: String, line: usize },

    /// Buffer length disagrees with the declared shape
    #[error("shape mismatch: shape {expected:?} needs {} values, got {actual}", .expected.iter().product::<usize>())]
    ShapeMismatch { expected: Vec<usize>, actual: usize },

    /// Layer count of a layered array disagrees with the outer dimension
    #[error("layer count mismatch: expected {expected} layers, got {actual}")]
    LayerCountMismatch { expected: usize, actual: usize },

    /// A block body line names no declared parameter
    #[error("unrecognized parameter '{name}' in block '{block}' at line {line}")]
    UnrecognizedParameter {
        block: String,
        name: String,
        line: usize,
    },

    /// A required parameter was absent when the block ended
    #[error("missing required parameter '{name}' in block '{block}'")]
    MissingRequiredParameter { block: String, name: String },

    /// A parameter line ended before its value
    #[error("missing value for '{param}' at line {line}")]
    MissingToken { param: String, line: usize },

    /// Stream ended inside a block
    #[error("unexpected end of input inside block '{block}'")]
    UnexpectedEof { block: String },

    /// END line names a different block
    #[error("expected 'END {expected}', found 'END {found}' at line {line}")]
    MismatchedEnd {
        expected: String,
        found: String,
        line: usize,
    },

    /// Symbolic shape could not be resolved from the load context
    #[error("cannot resolve shape of '{param}' without grid dimensions")]
    UnresolvedShape { param: String },

    /// Index outside the addressed axis
    #[error("index {index} out of bounds for axis of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Assigned value has the wrong type for the declared parameter
    #[error("type mismatch for '{name}': expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        name: String,
        expected: ValueTag,
        actual: ValueTag,
    },

    /// No package schema registered under this name
    #[error("unknown package '{0}'")]
    UnknownPackage(String),

    /// External array file missing or unreadable
    #[error("cannot read external array file {}: {source}", .path.display())]
    External {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_reports_element_count() {
        let err = Error::ShapeMismatch {
            expected: vec![2, 3],
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: shape [2, 3] needs 6 values, got 5"
        );
    }

    #[test]
    fn external_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::External {
            path: PathBuf::from("missing.dat"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing.dat"));
        assert!(err.source().is_some());
    }
}
