//! Native record layouts of the SPICE toolkit.
//!
//! `Ellipse` and `Plane` mirror `SpiceEllipse` and `SpicePlane` field for
//! field, so they can be handed to the toolkit as-is. The cell and E-kernel
//! descriptor types carry the attributes the Python classes expose; their
//! conversions are not implemented yet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A planar ellipse in 3-D space (`SpiceEllipse`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: [f64; 3],
    pub semi_major: [f64; 3],
    pub semi_minor: [f64; 3],
}

impl Ellipse {
    #[must_use]
    pub fn new(center: [f64; 3], semi_major: [f64; 3], semi_minor: [f64; 3]) -> Self {
        Self {
            center,
            semi_major,
            semi_minor,
        }
    }
}

/// A plane in Hessian normal form (`SpicePlane`).
///
/// Field order follows the toolkit: the normal vector comes first.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: [f64; 3],
    pub constant: f64,
}

impl Plane {
    #[must_use]
    pub fn new(normal: [f64; 3], constant: f64) -> Self {
        Self { normal, constant }
    }
}

/// Element data type of cells and E-kernel columns (`SpiceDataType`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Chr = 0,
    Dp = 1,
    Int = 2,
    Time = 3,
    Bool = 4,
}

/// Cell header (`SpiceCell`), without the untyped base/data pointers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub dtype: DataType,
    pub length: i32,
    pub size: i32,
    pub card: i32,
    pub is_set: bool,
    pub adjust: bool,
    pub init: bool,
}

/// E-kernel column attribute descriptor (`SpiceEKAttDsc`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EkAttDsc {
    pub cclass: i32,
    pub dtype: DataType,
    pub strlen: i32,
    pub size: i32,
    pub indexd: bool,
    pub nullok: bool,
}

/// E-kernel segment summary (`SpiceEKSegSum`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EkSegSum {
    pub tabnam: String,
    pub nrows: i32,
    pub ncols: i32,
    pub cnames: Vec<String>,
    pub cdescrs: Vec<EkAttDsc>,
}

/// The record shapes known to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Ellipse,
    Plane,
    Cell,
    EkAttDsc,
    EkSegSum,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        Self::Ellipse,
        Self::Plane,
        Self::Cell,
        Self::EkAttDsc,
        Self::EkSegSum,
    ];

    /// Short identifier used on the command line (e.g. "ekattdsc").
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Ellipse => "ellipse",
            Self::Plane => "plane",
            Self::Cell => "cell",
            Self::EkAttDsc => "ekattdsc",
            Self::EkSegSum => "eksegsum",
        }
    }

    /// Name of the class in the `spice` Python module.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Ellipse => "Ellipse",
            Self::Plane => "Plane",
            Self::Cell => "Cell",
            Self::EkAttDsc => "EkAttDsc",
            Self::EkSegSum => "EkSegSum",
        }
    }

    /// Whether conversions in both directions are implemented.
    #[must_use]
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Ellipse | Self::Plane)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == lower)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.id()).collect();
                format!("unknown shape '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}
