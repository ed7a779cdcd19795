//! SpiceBridge Core
//!
//! Conversions between the SPICE toolkit's fixed-layout records and
//! scripting-language objects with named attributes.
//!
//! # Quick Start
//!
//! ```
//! use spicebridge_core::{Ellipse, Marshaller};
//!
//! let marshaller = Marshaller::new();
//!
//! let ellipse = Ellipse::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
//! let obj = marshaller.ellipse_to_object(&ellipse).unwrap();
//! assert_eq!(obj.qualified_name(), "spice.Ellipse");
//!
//! // and back again
//! assert_eq!(marshaller.object_to_ellipse(&obj).unwrap(), ellipse);
//! ```
//!
//! # Unsupported shapes
//!
//! Cells and E-kernel descriptors have native types but no conversion yet:
//!
//! ```
//! use spicebridge_core::{Cell, ConvertError, Marshaller, ShapeKind};
//!
//! let err = Marshaller::new().cell_to_object(&Cell::default()).unwrap_err();
//! assert_eq!(err, ConvertError::Unsupported(ShapeKind::Cell));
//! ```

pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod native;
pub mod object;
pub mod registry;
pub mod schema;
pub mod toolkit;

#[cfg(feature = "python")]
pub mod python;

pub use convert::{FlatRecord, Marshaller};
pub use error::{ConvertError, ToolkitError};
pub use native::*;
pub use object::{Object, Value};
pub use registry::{TypeRegistry, SPICE_MODULE};
pub use schema::{Arity, FieldSpec};

/// Metadata about a shape for listings and help output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShapeInfo {
    /// Identifier (e.g., "ellipse")
    pub id: &'static str,
    /// Class name in the `spice` module (e.g., "Ellipse")
    pub type_name: &'static str,
    /// Whether conversions are implemented
    pub supported: bool,
    /// `(attribute, offset, width)` triples, empty when unsupported
    pub fields: Vec<(&'static str, usize, usize)>,
}

/// Describe every known shape.
#[must_use]
pub fn shape_infos() -> Vec<ShapeInfo> {
    ShapeKind::ALL
        .into_iter()
        .map(|kind| ShapeInfo {
            id: kind.id(),
            type_name: kind.type_name(),
            supported: kind.is_supported(),
            fields: schema::layout_for(kind)
                .unwrap_or(&[])
                .iter()
                .map(|f| (f.name, f.offset, f.arity.width()))
                .collect(),
        })
        .collect()
}
