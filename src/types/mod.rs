//! Core types: arrays, values, schema and loaded blocks

mod array;
mod block;
mod buffer;
mod how;
mod package;
mod spec;
mod value;

pub use array::Array;
pub use block::Block;
pub use buffer::NumericBuffer;
pub use how::{How, PerLayer};
pub use package::Package;
pub use spec::{BlockSpec, PackageSpec, ParameterSpec, Reader, ShapeSpec};
pub use value::{Fields, Value, ValueTag};
