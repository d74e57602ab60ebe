//! Static schema: parameter, block and package specifications
//!
//! Specs are immutable once built and shared behind `Arc` by every block
//! loaded against them.

use super::{Value, ValueTag};
use std::sync::Arc;

/// How a scalar's value tokens are taken from its line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reader {
    /// One whitespace-delimited token
    #[default]
    Urword,
    /// Remainder of the line, verbatim
    Freeform,
}

/// Target shape of an array parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeSpec {
    /// Known at schema time
    Fixed(Vec<usize>),
    /// Named dimensions looked up in the load context, e.g. `["nrow", "ncol"]`
    Dims(Vec<String>),
    /// Full model grid: `(nlay, nrow, ncol)`, `(nlay, ncpl)` or `(nodes)`
    Grid,
    /// Flat cell count of the model grid
    Nodes,
}

/// Schema entry for one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    /// Lowercase name
    pub name: String,
    /// Owning block name, lowercase; empty for record/keystring members
    pub block: String,
    pub tag: ValueTag,
    pub description: String,
    pub optional: bool,
    pub repeating: bool,
    /// Value must be preceded by its own name token
    pub tagged: bool,
    pub layered: bool,
    pub reader: Reader,
    pub default: Option<Value>,
    pub shape: Option<ShapeSpec>,
    /// Members of a record or keystring, in declaration order
    pub members: Vec<Arc<ParameterSpec>>,
}

impl ParameterSpec {
    fn new(name: &str, tag: ValueTag) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            block: String::new(),
            tag,
            description: String::new(),
            optional: true,
            repeating: false,
            tagged: false,
            layered: false,
            reader: Reader::Urword,
            default: None,
            shape: None,
            members: Vec::new(),
        }
    }

    pub fn keyword(name: &str) -> Self {
        Self::new(name, ValueTag::Keyword)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, ValueTag::Integer)
    }

    pub fn double(name: &str) -> Self {
        Self::new(name, ValueTag::Double)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, ValueTag::String)
    }

    pub fn filepath(name: &str) -> Self {
        Self::new(name, ValueTag::FilePath)
    }

    pub fn array(name: &str, shape: ShapeSpec) -> Self {
        Self {
            shape: Some(shape),
            ..Self::new(name, ValueTag::Array)
        }
    }

    pub fn record(name: &str, members: Vec<ParameterSpec>) -> Self {
        Self {
            members: members.into_iter().map(Arc::new).collect(),
            ..Self::new(name, ValueTag::Record)
        }
    }

    pub fn keystring(name: &str, members: Vec<ParameterSpec>) -> Self {
        Self {
            members: members.into_iter().map(Arc::new).collect(),
            ..Self::new(name, ValueTag::Keystring)
        }
    }

    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    pub fn tagged(mut self) -> Self {
        self.tagged = true;
        self
    }

    pub fn layered(mut self) -> Self {
        self.layered = true;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    pub fn freeform(mut self) -> Self {
        self.reader = Reader::Freeform;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Member spec by case-insensitive name
    pub fn member(&self, name: &str) -> Option<&Arc<ParameterSpec>> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

/// Schema for one named block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub name: String,
    pub params: Vec<Arc<ParameterSpec>>,
}

impl BlockSpec {
    pub fn new(name: &str, params: Vec<ParameterSpec>) -> Self {
        let name = name.to_ascii_lowercase();
        let params = params
            .into_iter()
            .map(|mut p| {
                p.block = name.clone();
                Arc::new(p)
            })
            .collect();
        Self { name, params }
    }

    /// Declared parameter by case-insensitive name
    pub fn param(&self, name: &str) -> Option<&Arc<ParameterSpec>> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Schema for a package: its blocks in file order
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSpec {
    pub name: String,
    pub blocks: Vec<Arc<BlockSpec>>,
}

impl PackageSpec {
    pub fn new(name: &str, blocks: Vec<BlockSpec>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            blocks: blocks.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn block(&self, name: &str) -> Option<&Arc<BlockSpec>> {
        self.blocks.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Every parameter of every block
    pub fn params(&self) -> impl Iterator<Item = &Arc<ParameterSpec>> {
        self.blocks.iter().flat_map(|b| b.params.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_assigns_owner_and_lowercases() {
        let block = BlockSpec::new(
            "OPTIONS",
            vec![
                ParameterSpec::keyword("K").describe("keyword"),
                ParameterSpec::string("s").required(),
            ],
        );
        assert_eq!(block.name, "options");
        let k = block.param("k").unwrap();
        assert_eq!(k.name, "k");
        assert_eq!(k.block, "options");
        assert_eq!(k.description, "keyword");
        assert!(k.optional);
        assert!(!block.param("S").unwrap().optional);
    }

    #[test]
    fn record_members_keep_order() {
        let r = ParameterSpec::record(
            "r",
            vec![
                ParameterSpec::keyword("rk"),
                ParameterSpec::integer("ri").tagged(),
                ParameterSpec::double("rd").tagged(),
            ],
        );
        let names: Vec<&str> = r.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["rk", "ri", "rd"]);
        assert_eq!(r.member("RI").unwrap().tag, ValueTag::Integer);
    }
}
