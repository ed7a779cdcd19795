//! Error types.

use crate::native::ShapeKind;

/// Errors raised while converting between native records and objects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// No module with this name is registered.
    #[error("no module named '{0}'")]
    ModuleNotFound(String),

    /// The module exists but does not define the type.
    #[error("module '{module}' has no type '{type_name}'")]
    TypeNotFound { module: String, type_name: String },

    /// A required attribute is absent from the object.
    #[error("'{shape}' object has no attribute '{attribute}'")]
    MissingAttribute {
        shape: ShapeKind,
        attribute: &'static str,
    },

    /// A vector attribute has the wrong number of elements.
    #[error("attribute '{attribute}' of '{shape}' must have {expected} elements, found {found}")]
    WrongLength {
        shape: ShapeKind,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    /// An attribute (or one of its elements) has the wrong dynamic type.
    #[error("attribute '{attribute}' of '{shape}' must be {expected}, found {found}")]
    TypeMismatch {
        shape: ShapeKind,
        attribute: String,
        expected: &'static str,
        found: String,
    },

    /// Conversion for this shape is not implemented.
    #[error("conversion of '{0}' is not supported yet")]
    Unsupported(ShapeKind),

    /// An entry point was called with the wrong number of positional arguments.
    #[error("{function}() takes exactly {expected} positional argument ({found} given)")]
    Arguments {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    /// An entry point argument has the wrong dynamic type.
    #[error("{function}() argument must be an object, not {found}")]
    ArgumentType {
        function: &'static str,
        found: String,
    },
}

impl ConvertError {
    /// True for shapes whose conversion is not implemented, as opposed to
    /// malformed input.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Errors reported by the wrapped toolkit's error state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolkitError {
    /// The toolkit's failure flag was set; `message` is its long diagnostic.
    #[error("{message}")]
    Failed { message: String },
}
