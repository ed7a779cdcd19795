//! Struct ↔ object conversion.

use crate::error::ConvertError;
use crate::native::{Cell, EkAttDsc, EkSegSum, Ellipse, Plane, ShapeKind};
use crate::object::Object;
use crate::registry::{TypeRegistry, SPICE_MODULE};
use crate::schema::{self, FieldSpec, ELLIPSE_LAYOUT, PLANE_LAYOUT};

/// A native record stored as a fixed run of `f64` slots.
pub trait FlatRecord: Sized {
    const KIND: ShapeKind;
    const LAYOUT: &'static [FieldSpec];

    /// The record's slots in memory order.
    fn to_slots(&self) -> Vec<f64>;

    /// Rebuild the record from slots produced by [`schema::decode_slots`].
    fn from_slots(slots: &[f64]) -> Self;
}

fn vec3(slots: &[f64], offset: usize) -> [f64; 3] {
    [slots[offset], slots[offset + 1], slots[offset + 2]]
}

impl FlatRecord for Ellipse {
    const KIND: ShapeKind = ShapeKind::Ellipse;
    const LAYOUT: &'static [FieldSpec] = ELLIPSE_LAYOUT;

    fn to_slots(&self) -> Vec<f64> {
        [self.center, self.semi_major, self.semi_minor].concat()
    }

    fn from_slots(slots: &[f64]) -> Self {
        Self {
            center: vec3(slots, 0),
            semi_major: vec3(slots, 3),
            semi_minor: vec3(slots, 6),
        }
    }
}

impl FlatRecord for Plane {
    const KIND: ShapeKind = ShapeKind::Plane;
    const LAYOUT: &'static [FieldSpec] = PLANE_LAYOUT;

    fn to_slots(&self) -> Vec<f64> {
        let mut slots = self.normal.to_vec();
        slots.push(self.constant);
        slots
    }

    fn from_slots(slots: &[f64]) -> Self {
        Self {
            normal: vec3(slots, 0),
            constant: slots[3],
        }
    }
}

/// Converts between native records and objects of a registered module.
#[derive(Debug, Clone)]
pub struct Marshaller {
    registry: TypeRegistry,
    module: String,
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new()
    }
}

impl Marshaller {
    /// A converter over the built-in `spice` module.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::spice(), SPICE_MODULE)
    }

    /// A converter that builds objects from `module` in `registry`.
    #[must_use]
    pub fn with_registry(registry: TypeRegistry, module: impl Into<String>) -> Self {
        Self {
            registry,
            module: module.into(),
        }
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Build an object from any flat record.
    pub fn to_object<T: FlatRecord>(&self, record: &T) -> Result<Object, ConvertError> {
        let mut obj = self.registry.construct(&self.module, T::KIND.type_name())?;
        schema::encode_slots(T::LAYOUT, &record.to_slots(), &mut obj);
        tracing::debug!(shape = %T::KIND, object = %obj.qualified_name(), "record → object");
        Ok(obj)
    }

    /// Read any flat record out of an object.
    ///
    /// The object's type name is not checked; any object carrying the
    /// record's attributes is accepted.
    pub fn from_object<T: FlatRecord>(&self, obj: &Object) -> Result<T, ConvertError> {
        let slots = schema::decode_slots(T::KIND, T::LAYOUT, obj).inspect_err(|e| {
            tracing::debug!(shape = %T::KIND, error = %e, "object rejected");
        })?;
        tracing::debug!(shape = %T::KIND, object = %obj.qualified_name(), "object → record");
        Ok(T::from_slots(&slots))
    }

    pub fn ellipse_to_object(&self, ellipse: &Ellipse) -> Result<Object, ConvertError> {
        self.to_object(ellipse)
    }

    pub fn plane_to_object(&self, plane: &Plane) -> Result<Object, ConvertError> {
        self.to_object(plane)
    }

    /// Not implemented; always [`ConvertError::Unsupported`].
    pub fn cell_to_object(&self, _cell: &Cell) -> Result<Object, ConvertError> {
        Err(ConvertError::Unsupported(ShapeKind::Cell))
    }

    /// Not implemented; always [`ConvertError::Unsupported`].
    pub fn ekattdsc_to_object(&self, _descr: &EkAttDsc) -> Result<Object, ConvertError> {
        Err(ConvertError::Unsupported(ShapeKind::EkAttDsc))
    }

    /// Not implemented; always [`ConvertError::Unsupported`].
    pub fn eksegsum_to_object(&self, _summary: &EkSegSum) -> Result<Object, ConvertError> {
        Err(ConvertError::Unsupported(ShapeKind::EkSegSum))
    }

    /// Fails with [`ConvertError::MissingAttribute`] if `center`,
    /// `semi_major` or `semi_minor` is absent.
    pub fn object_to_ellipse(&self, obj: &Object) -> Result<Ellipse, ConvertError> {
        self.from_object(obj)
    }

    pub fn object_to_plane(&self, obj: &Object) -> Result<Plane, ConvertError> {
        self.from_object(obj)
    }

    /// Not implemented; always [`ConvertError::Unsupported`].
    pub fn object_to_cell(&self, _obj: &Object) -> Result<Cell, ConvertError> {
        Err(ConvertError::Unsupported(ShapeKind::Cell))
    }

    /// Not implemented; always [`ConvertError::Unsupported`].
    pub fn object_to_ekattdsc(&self, _obj: &Object) -> Result<EkAttDsc, ConvertError> {
        Err(ConvertError::Unsupported(ShapeKind::EkAttDsc))
    }

    /// Not implemented; always [`ConvertError::Unsupported`].
    pub fn object_to_eksegsum(&self, _obj: &Object) -> Result<EkSegSum, ConvertError> {
        Err(ConvertError::Unsupported(ShapeKind::EkSegSum))
    }
}
