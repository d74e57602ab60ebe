//! Schema registry: package specs looked up by name

use crate::error::{Error, Result};
use crate::types::{BlockSpec, PackageSpec, ParameterSpec, ShapeSpec, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// Package specs keyed by lowercase package name, in registration order
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    packages: IndexMap<String, Arc<PackageSpec>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the packages this crate ships with
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(dis());
        registry
    }

    /// Add a package spec, replacing any spec with the same name
    pub fn register(&mut self, spec: PackageSpec) -> Arc<PackageSpec> {
        let spec = Arc::new(spec);
        self.packages.insert(spec.name.clone(), spec.clone());
        spec
    }

    pub fn get(&self, name: &str) -> Result<&Arc<PackageSpec>> {
        self.packages
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownPackage(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}

/// Structured grid discretization
fn dis() -> PackageSpec {
    PackageSpec::new(
        "dis",
        vec![
            BlockSpec::new(
                "options",
                vec![
                    ParameterSpec::string("length_units").describe("model length units"),
                    ParameterSpec::keyword("nogrb").describe("do not write binary grid file"),
                    ParameterSpec::double("xorigin").with_default(Value::Double(0.0)),
                    ParameterSpec::double("yorigin").with_default(Value::Double(0.0)),
                    ParameterSpec::double("angrot").with_default(Value::Double(0.0)),
                ],
            ),
            BlockSpec::new(
                "dimensions",
                vec![
                    ParameterSpec::integer("nlay").required(),
                    ParameterSpec::integer("nrow").required(),
                    ParameterSpec::integer("ncol").required(),
                ],
            ),
            BlockSpec::new(
                "griddata",
                vec![
                    ParameterSpec::array("delr", ShapeSpec::Dims(vec!["ncol".into()])).required(),
                    ParameterSpec::array("delc", ShapeSpec::Dims(vec!["nrow".into()])).required(),
                    ParameterSpec::array("top", ShapeSpec::Dims(vec!["nrow".into(), "ncol".into()]))
                        .required(),
                    ParameterSpec::array("botm", ShapeSpec::Grid).required(),
                    ParameterSpec::array("idomain", ShapeSpec::Grid),
                ],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_dis() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["dis"]);
        let dis = registry.get("DIS").unwrap();
        let names: Vec<_> = dis.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["options", "dimensions", "griddata"]);
        assert!(!dis.block("dimensions").unwrap().param("nrow").unwrap().optional);
    }

    #[test]
    fn unknown_package() {
        assert!(matches!(
            SchemaRegistry::new().get("npf"),
            Err(Error::UnknownPackage(ref name)) if name == "npf"
        ));
    }
}
