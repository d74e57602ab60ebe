//! mf6input - reader and writer for block-structured model input files
//!
//! Input files are sequences of `BEGIN <name> [index]` / `END <name>`
//! blocks. Each body line starts with a declared parameter name followed by
//! its value: a keyword flag, a scalar, a one-line record, or a numeric
//! array given inline, as a constant, or as a reference to another file.
//!
//! # Features
//!
//! - Static schemas: packages, blocks and typed parameters
//! - Arrays that keep their input representation and factor across a
//!   load/write round-trip
//! - Layered arrays mixing representations per layer
//! - Lazy loading of external array files
//! - Grid shapes resolved from a `dimensions` block
//!
//! # Example
//!
//! ```rust
//! use mf6input::{LoadContext, SchemaRegistry, parser, writer};
//!
//! let registry = SchemaRegistry::builtin();
//! let dis = registry.get("dis").unwrap();
//!
//! let text = "\
//! BEGIN DIMENSIONS
//!   NLAY 1
//!   NROW 1
//!   NCOL 2
//! END DIMENSIONS
//!
//! BEGIN GRIDDATA
//!   DELR
//!     CONSTANT 10.0
//!   DELC
//!     CONSTANT 10.0
//!   TOP
//!     INTERNAL
//!       5.0 6.0
//!   BOTM
//!     CONSTANT 0.0
//! END GRIDDATA
//! ";
//!
//! let package = parser::parse_package(text, dis, &LoadContext::default()).unwrap();
//! let top = package.get("top").and_then(|v| v.as_array()).unwrap();
//! assert_eq!(top.value().unwrap().to_vec(), vec![5.0, 6.0]);
//!
//! let out = writer::to_string(&package).unwrap();
//! assert!(out.contains("CONSTANT 10.0"));
//! ```

pub mod context;
pub mod error;
pub mod parser;
pub mod registry;
pub mod types;
pub mod writer;

// Re-export common types at crate root
pub use context::{Dimensions, LoadContext};
pub use error::{Error, Result};
pub use registry::SchemaRegistry;
pub use types::{
    Array, Block, BlockSpec, Fields, How, NumericBuffer, Package, PackageSpec, ParameterSpec,
    PerLayer, Reader, ShapeSpec, Value, ValueTag,
};
