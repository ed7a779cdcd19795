//! Registry of object type constructors.
//!
//! Objects are created through constructors registered per module and type
//! name. A converter captures one registry at construction time instead of
//! looking types up by name on every call.

use crate::error::ConvertError;
use crate::native::ShapeKind;
use crate::object::{Object, Value};
use std::collections::BTreeMap;

/// Name of the Python package the toolkit types live in.
pub const SPICE_MODULE: &str = "spice";

/// Builds a default-initialized instance of a type.
pub type Constructor = fn() -> Object;

/// Module name → type name → constructor.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    modules: BTreeMap<String, BTreeMap<String, Constructor>>,
}

impl TypeRegistry {
    /// An empty registry with no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `spice` module with every toolkit type, initialized the way the
    /// Python classes initialize themselves.
    #[must_use]
    pub fn spice() -> Self {
        let mut registry = Self::new();
        registry.register(SPICE_MODULE, ShapeKind::Ellipse.type_name(), new_ellipse);
        registry.register(SPICE_MODULE, ShapeKind::Plane.type_name(), new_plane);
        registry.register(SPICE_MODULE, ShapeKind::Cell.type_name(), new_cell);
        registry.register(SPICE_MODULE, ShapeKind::EkAttDsc.type_name(), new_ekattdsc);
        registry.register(SPICE_MODULE, ShapeKind::EkSegSum.type_name(), new_eksegsum);
        registry
    }

    /// Register (or replace) a constructor.
    pub fn register(&mut self, module: &str, type_name: &str, ctor: Constructor) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(type_name.to_string(), ctor);
    }

    #[must_use]
    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Registered type names of a module, sorted.
    #[must_use]
    pub fn type_names(&self, module: &str) -> Vec<&str> {
        self.modules
            .get(module)
            .map(|types| types.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Look up a constructor.
    pub fn resolve(&self, module: &str, type_name: &str) -> Result<Constructor, ConvertError> {
        let types = self
            .modules
            .get(module)
            .ok_or_else(|| ConvertError::ModuleNotFound(module.to_string()))?;
        types
            .get(type_name)
            .copied()
            .ok_or_else(|| ConvertError::TypeNotFound {
                module: module.to_string(),
                type_name: type_name.to_string(),
            })
    }

    /// Look up a constructor and call it.
    pub fn construct(&self, module: &str, type_name: &str) -> Result<Object, ConvertError> {
        let ctor = self.resolve(module, type_name)?;
        let mut obj = ctor();
        module.clone_into(&mut obj.module);
        Ok(obj)
    }
}

fn zeros() -> Value {
    Value::float_list(&[0.0; 3])
}

fn new_ellipse() -> Object {
    Object::new(SPICE_MODULE, "Ellipse")
        .with_attr("center", zeros())
        .with_attr("semi_major", zeros())
        .with_attr("semi_minor", zeros())
}

fn new_plane() -> Object {
    Object::new(SPICE_MODULE, "Plane")
        .with_attr("normal", zeros())
        .with_attr("constant", 0.0)
}

fn new_cell() -> Object {
    Object::new(SPICE_MODULE, "Cell")
        .with_attr("dtype", Value::Int(0))
        .with_attr("length", Value::Int(0))
        .with_attr("size", Value::Int(0))
        .with_attr("card", Value::Int(0))
        .with_attr("isSet", Value::Bool(false))
        .with_attr("adjust", Value::Bool(false))
        .with_attr("init", Value::Bool(false))
        .with_attr("base", Value::None)
        .with_attr("data", Value::None)
}

fn new_ekattdsc() -> Object {
    Object::new(SPICE_MODULE, "EkAttDsc")
        .with_attr("cclass", Value::Int(0))
        .with_attr("dtype", Value::Int(0))
        .with_attr("strlen", Value::Int(0))
        .with_attr("size", Value::Int(0))
        .with_attr("indexd", Value::Bool(false))
        .with_attr("nullok", Value::Bool(false))
}

fn new_eksegsum() -> Object {
    Object::new(SPICE_MODULE, "EkSegSum")
        .with_attr("tabnam", Value::Str(String::new()))
        .with_attr("nrows", Value::Int(0))
        .with_attr("ncols", Value::Int(0))
        .with_attr("cnames", Value::List(Vec::new()))
        .with_attr("cdescrs", Value::List(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spice_registry_has_all_shapes() {
        let registry = TypeRegistry::spice();
        assert!(registry.has_module("spice"));
        for kind in ShapeKind::ALL {
            assert!(
                registry.resolve(SPICE_MODULE, kind.type_name()).is_ok(),
                "missing {}",
                kind
            );
        }
        assert_eq!(
            registry.type_names("spice"),
            vec!["Cell", "EkAttDsc", "EkSegSum", "Ellipse", "Plane"]
        );
    }

    #[test]
    fn test_construct_defaults() {
        let registry = TypeRegistry::spice();
        let plane = registry.construct("spice", "Plane").unwrap();
        assert_eq!(plane.type_name, "Plane");
        assert_eq!(plane.getattr("constant"), Some(&Value::Float(0.0)));
        assert_eq!(plane.getattr("normal"), Some(&zeros()));
    }

    #[test]
    fn test_unknown_module() {
        let registry = TypeRegistry::spice();
        assert_eq!(
            registry.construct("cspice", "Plane").unwrap_err(),
            ConvertError::ModuleNotFound("cspice".to_string())
        );
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::spice();
        let err = registry.construct("spice", "Circle").unwrap_err();
        assert_eq!(err.to_string(), "module 'spice' has no type 'Circle'");
    }

    #[test]
    fn test_register_under_alias_module() {
        let mut registry = TypeRegistry::new();
        registry.register("spice2", "Plane", new_plane);
        let plane = registry.construct("spice2", "Plane").unwrap();
        assert_eq!(plane.module, "spice2");
        assert_eq!(plane.qualified_name(), "spice2.Plane");
    }
}
