//! Field-mapping tables between native records and object attributes.
//!
//! Each supported record is described as a flat run of `f64` slots (the
//! record's memory layout) and a table of attributes that map onto that run.
//! Objects are checked against the whole table before any slot is written.

use crate::error::ConvertError;
use crate::native::ShapeKind;
use crate::object::{Object, Value};

/// How many slots an attribute occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A single number.
    Scalar,
    /// A list of exactly `n` numbers.
    Vector(usize),
}

impl Arity {
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector(n) => n,
        }
    }
}

/// One attribute of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Attribute name on the object.
    pub name: &'static str,
    /// First slot of the field in the record's flat layout.
    pub offset: usize,
    pub arity: Arity,
}

impl FieldSpec {
    #[must_use]
    pub const fn scalar(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            arity: Arity::Scalar,
        }
    }

    #[must_use]
    pub const fn vector(name: &'static str, offset: usize, len: usize) -> Self {
        Self {
            name,
            offset,
            arity: Arity::Vector(len),
        }
    }
}

/// `SpiceEllipse`: three 3-vectors.
pub const ELLIPSE_LAYOUT: &[FieldSpec] = &[
    FieldSpec::vector("center", 0, 3),
    FieldSpec::vector("semi_major", 3, 3),
    FieldSpec::vector("semi_minor", 6, 3),
];

/// `SpicePlane`: normal vector followed by the constant.
pub const PLANE_LAYOUT: &[FieldSpec] = &[
    FieldSpec::vector("normal", 0, 3),
    FieldSpec::scalar("constant", 3),
];

/// Attribute table for a shape, if its conversion is implemented.
#[must_use]
pub fn layout_for(shape: ShapeKind) -> Option<&'static [FieldSpec]> {
    match shape {
        ShapeKind::Ellipse => Some(ELLIPSE_LAYOUT),
        ShapeKind::Plane => Some(PLANE_LAYOUT),
        ShapeKind::Cell | ShapeKind::EkAttDsc | ShapeKind::EkSegSum => None,
    }
}

/// Total number of slots covered by a layout.
#[must_use]
pub fn layout_width(layout: &[FieldSpec]) -> usize {
    layout
        .iter()
        .map(|f| f.offset + f.arity.width())
        .max()
        .unwrap_or(0)
}

/// Read an object's attributes into a flat slot buffer.
///
/// Every attribute is checked (presence first, then length and element
/// types) before anything is read. The first attribute missing in table
/// order is the one reported.
pub fn decode_slots(
    shape: ShapeKind,
    layout: &[FieldSpec],
    obj: &Object,
) -> Result<Vec<f64>, ConvertError> {
    let mut present = Vec::with_capacity(layout.len());
    for field in layout {
        let value = obj
            .getattr(field.name)
            .ok_or(ConvertError::MissingAttribute {
                shape,
                attribute: field.name,
            })?;
        present.push((field, value));
    }

    for (field, value) in &present {
        check_field(shape, field, value)?;
    }

    let mut slots = vec![0.0; layout_width(layout)];
    for (field, value) in present {
        match (field.arity, value) {
            (Arity::Scalar, v) => {
                slots[field.offset] = v.as_f64().unwrap_or_default();
            }
            (Arity::Vector(n), Value::List(items)) => {
                for (slot, item) in slots[field.offset..field.offset + n]
                    .iter_mut()
                    .zip(items)
                {
                    *slot = item.as_f64().unwrap_or_default();
                }
            }
            (Arity::Vector(_), _) => {}
        }
        tracing::trace!(
            shape = %shape,
            attribute = field.name,
            slots = ?&slots[field.offset..field.offset + field.arity.width()],
            "decoded attribute"
        );
    }

    Ok(slots)
}

fn check_field(shape: ShapeKind, field: &FieldSpec, value: &Value) -> Result<(), ConvertError> {
    match field.arity {
        Arity::Scalar => {
            if value.as_f64().is_none() {
                return Err(ConvertError::TypeMismatch {
                    shape,
                    attribute: field.name.to_string(),
                    expected: "a number",
                    found: value.kind().to_string(),
                });
            }
        }
        Arity::Vector(n) => {
            let items = value.as_list().ok_or_else(|| ConvertError::TypeMismatch {
                shape,
                attribute: field.name.to_string(),
                expected: "a list of numbers",
                found: value.kind().to_string(),
            })?;
            if items.len() != n {
                return Err(ConvertError::WrongLength {
                    shape,
                    attribute: field.name,
                    expected: n,
                    found: items.len(),
                });
            }
            if let Some((i, bad)) = items.iter().enumerate().find(|(_, v)| v.as_f64().is_none()) {
                return Err(ConvertError::TypeMismatch {
                    shape,
                    attribute: format!("{}[{}]", field.name, i),
                    expected: "a number",
                    found: bad.kind().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Write a flat slot buffer onto an object's attributes.
pub fn encode_slots(layout: &[FieldSpec], slots: &[f64], obj: &mut Object) {
    for field in layout {
        let value = match field.arity {
            Arity::Scalar => Value::Float(slots[field.offset]),
            Arity::Vector(n) => Value::float_list(&slots[field.offset..field.offset + n]),
        };
        obj.setattr(field.name, value);
    }
}
