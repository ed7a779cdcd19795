//! End-to-end conversion behaviour through the public API.

use pretty_assertions::assert_eq;
use spicebridge_core::diagnostics::{spice_berto, spice_test};
use spicebridge_core::{
    Cell, ConvertError, EkAttDsc, EkSegSum, Ellipse, Marshaller, Object, Plane, ShapeKind,
    TypeRegistry, Value,
};

fn ellipse_object(center: [f64; 3], semi_major: [f64; 3], semi_minor: [f64; 3]) -> Object {
    Object::new("spice", "Ellipse")
        .with_attr("center", Value::float_list(&center))
        .with_attr("semi_major", Value::float_list(&semi_major))
        .with_attr("semi_minor", Value::float_list(&semi_minor))
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_ellipse_object_round_trip() {
    let m = Marshaller::new();
    let obj = ellipse_object([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);

    let ellipse = m.object_to_ellipse(&obj).unwrap();
    assert_eq!(ellipse.center, [1.0, 2.0, 3.0]);
    assert_eq!(ellipse.semi_major, [4.0, 5.0, 6.0]);
    assert_eq!(ellipse.semi_minor, [7.0, 8.0, 9.0]);

    let back = m.ellipse_to_object(&ellipse).unwrap();
    assert_eq!(back, obj);
}

#[test]
fn test_ellipse_round_trip_is_exact() {
    let m = Marshaller::new();
    let awkward = [0.1 + 0.2, f64::MIN_POSITIVE, -1.0e300];
    let obj = ellipse_object(awkward, [f64::EPSILON, 1.0 / 3.0, -0.0], [2.0e-308, 7.5, 1e10]);

    let back = m.ellipse_to_object(&m.object_to_ellipse(&obj).unwrap()).unwrap();
    assert_eq!(back, obj);
}

#[test]
fn test_plane_round_trip() {
    let m = Marshaller::new();
    let obj = Object::new("spice", "Plane")
        .with_attr("constant", 2.5)
        .with_attr("normal", Value::float_list(&[0.0, 0.0, 1.0]));

    let plane = m.object_to_plane(&obj).unwrap();
    assert_eq!(plane, Plane::new([0.0, 0.0, 1.0], 2.5));

    let back = m.plane_to_object(&plane).unwrap();
    assert_eq!(back.getattr("constant"), Some(&Value::Float(2.5)));
    assert_eq!(back.getattr("normal"), Some(&Value::float_list(&[0.0, 0.0, 1.0])));
}

// =============================================================================
// Failure paths
// =============================================================================

#[test]
fn test_missing_semi_minor() {
    let m = Marshaller::new();
    let mut obj = ellipse_object([1.0; 3], [2.0; 3], [3.0; 3]);
    obj.delattr("semi_minor");

    assert_eq!(
        m.object_to_ellipse(&obj).unwrap_err(),
        ConvertError::MissingAttribute {
            shape: ShapeKind::Ellipse,
            attribute: "semi_minor"
        }
    );
}

#[test]
fn test_plane_errors_are_typed() {
    let m = Marshaller::new();
    let obj = Object::new("spice", "Plane")
        .with_attr("constant", Value::Str("2.5".into()))
        .with_attr("normal", Value::float_list(&[0.0, 0.0, 1.0]));

    assert!(matches!(
        m.object_to_plane(&obj),
        Err(ConvertError::TypeMismatch { shape: ShapeKind::Plane, .. })
    ));
}

#[test]
fn test_unsupported_shapes() {
    let m = Marshaller::new();
    let obj = Object::new("spice", "Cell");

    assert_eq!(
        m.cell_to_object(&Cell::default()).unwrap_err(),
        ConvertError::Unsupported(ShapeKind::Cell)
    );
    assert_eq!(
        m.ekattdsc_to_object(&EkAttDsc::default()).unwrap_err(),
        ConvertError::Unsupported(ShapeKind::EkAttDsc)
    );
    assert_eq!(
        m.eksegsum_to_object(&EkSegSum::default()).unwrap_err(),
        ConvertError::Unsupported(ShapeKind::EkSegSum)
    );
    assert_eq!(
        m.object_to_cell(&obj).unwrap_err(),
        ConvertError::Unsupported(ShapeKind::Cell)
    );
    assert_eq!(
        m.object_to_ekattdsc(&obj).unwrap_err(),
        ConvertError::Unsupported(ShapeKind::EkAttDsc)
    );
    assert!(m.object_to_eksegsum(&obj).unwrap_err().is_unsupported());
}

#[test]
fn test_unsupported_needs_no_registry() {
    // Stubs fail the same way even when nothing is registered.
    let m = Marshaller::with_registry(TypeRegistry::new(), "spice");
    assert_eq!(
        m.cell_to_object(&Cell::default()).unwrap_err(),
        ConvertError::Unsupported(ShapeKind::Cell)
    );
    assert_eq!(
        m.ellipse_to_object(&Ellipse::default()).unwrap_err(),
        ConvertError::ModuleNotFound("spice".into())
    );
}

// =============================================================================
// Diagnostic entry points
// =============================================================================

#[test]
fn test_berto_ignores_input_values() {
    let m = Marshaller::new();
    for seed in [0.0, -12.5, 1e9] {
        let arg = Value::Object(ellipse_object([seed; 3], [seed + 1.0; 3], [seed * 2.0; 3]));
        let out = spice_berto(&m, &[arg]).unwrap();

        assert_eq!(
            out,
            ellipse_object([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0])
        );
    }
}

#[test]
fn test_entry_points_reject_argument_counts() {
    let m = Marshaller::new();
    let plane = Value::Object(
        Object::new("spice", "Plane")
            .with_attr("constant", 1.0)
            .with_attr("normal", Value::float_list(&[1.0, 0.0, 0.0])),
    );

    for args in [vec![], vec![plane.clone(), plane.clone()]] {
        assert!(matches!(
            spice_test(&m, &args),
            Err(ConvertError::Arguments { expected: 1, .. })
        ));
        assert!(matches!(
            spice_berto(&m, &args),
            Err(ConvertError::Arguments { expected: 1, .. })
        ));
    }
    assert!(spice_test(&m, &[plane]).is_ok());
}
