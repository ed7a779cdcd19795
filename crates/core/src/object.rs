//! Dynamic object model.
//!
//! These types stand in for scripting-language values on the Rust side:
//! an [`Object`] is an instance of a named class with dynamically typed
//! attributes, and a [`Value`] is anything an attribute can hold.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Build a list of floats from a native array.
    #[must_use]
    pub fn float_list(values: &[f64]) -> Self {
        Self::List(values.iter().copied().map(Self::Float).collect())
    }

    /// Dynamic type name, as the scripting runtime would report it.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Object(obj) => &obj.type_name,
        }
    }

    /// Numeric value widened to `f64`. Booleans are not numbers here.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

/// An instance of a named class with named attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    #[serde(default = "default_module")]
    pub module: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, Value>,
}

fn default_module() -> String {
    crate::registry::SPICE_MODULE.to_string()
}

impl Object {
    /// Create an instance with no attributes set.
    #[must_use]
    pub fn new(module: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            type_name: type_name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute assignment.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.setattr(name, value);
        self
    }

    #[must_use]
    pub fn getattr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn setattr(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn delattr(&mut self, name: &str) -> Option<Value> {
        self.attrs.remove(name)
    }

    #[must_use]
    pub fn hasattr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// `module.Type`, e.g. `spice.Ellipse`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.type_name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Object(obj) => write!(f, "{}", obj),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:", self.type_name)?;
        for (i, (name, value)) in self.attrs.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{} = {}", sep, name, value)?;
        }
        f.write_str(">")
    }
}
