//! Diagnostic round-trip entry points.
//!
//! Both functions take positional arguments the way a scripting-language
//! call would deliver them, check the argument shape before touching any
//! attribute, and return the object produced by converting back.

use crate::convert::Marshaller;
use crate::error::ConvertError;
use crate::native::Ellipse;
use crate::object::{Object, Value};

/// Values written over the decoded ellipse by [`spice_berto`].
pub const BERTO_ELLIPSE: Ellipse = Ellipse {
    center: [1.0, 2.0, 3.0],
    semi_major: [4.0, 5.0, 6.0],
    semi_minor: [7.0, 8.0, 9.0],
};

/// Accept exactly one positional argument, which must be an object.
fn single_object<'a>(function: &'static str, args: &'a [Value]) -> Result<&'a Object, ConvertError> {
    match args {
        [Value::Object(obj)] => Ok(obj),
        [other] => Err(ConvertError::ArgumentType {
            function,
            found: other.kind().to_string(),
        }),
        _ => Err(ConvertError::Arguments {
            function,
            expected: 1,
            found: args.len(),
        }),
    }
}

/// Ellipse round trip: object → struct → overwrite with [`BERTO_ELLIPSE`] → object.
///
/// The decoded components are logged before being overwritten, so the
/// returned object never depends on the input's values.
pub fn spice_berto(marshaller: &Marshaller, args: &[Value]) -> Result<Object, ConvertError> {
    let obj = single_object("spice_berto", args)?;
    let ellipse = marshaller.object_to_ellipse(obj)?;

    let sections = [
        ("center", &ellipse.center),
        ("semi_major", &ellipse.semi_major),
        ("semi_minor", &ellipse.semi_minor),
    ];
    for (section, values) in sections {
        for (index, value) in values.iter().enumerate() {
            tracing::info!(section, index, value, "{}[{}] = {:.6}", section, index, value);
        }
    }

    marshaller.ellipse_to_object(&BERTO_ELLIPSE)
}

/// Plane round trip: object → struct → object.
pub fn spice_test(marshaller: &Marshaller, args: &[Value]) -> Result<Object, ConvertError> {
    let obj = single_object("spice_test", args)?;
    let plane = marshaller.object_to_plane(obj)?;
    marshaller.plane_to_object(&plane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ellipse_arg() -> Value {
        Value::Object(
            Object::new("spice", "Ellipse")
                .with_attr("center", Value::float_list(&[234.3, 8348.3, 937.6]))
                .with_attr("semi_major", Value::float_list(&[5.0, 293.4, 11.0]))
                .with_attr("semi_minor", Value::float_list(&[6.0, 3.0, 6.0])),
        )
    }

    #[test]
    fn test_berto_overwrites_values() {
        let m = Marshaller::new();
        let out = spice_berto(&m, &[ellipse_arg()]).unwrap();
        assert_eq!(m.object_to_ellipse(&out).unwrap(), BERTO_ELLIPSE);
    }

    #[test]
    fn test_berto_argument_count() {
        let m = Marshaller::new();
        assert_eq!(
            spice_berto(&m, &[]).unwrap_err(),
            ConvertError::Arguments {
                function: "spice_berto",
                expected: 1,
                found: 0
            }
        );
        assert!(matches!(
            spice_berto(&m, &[ellipse_arg(), ellipse_arg()]),
            Err(ConvertError::Arguments { found: 2, .. })
        ));
    }

    #[test]
    fn test_argument_must_be_object() {
        let m = Marshaller::new();
        let err = spice_test(&m, &[Value::Float(1.0)]).unwrap_err();
        assert_eq!(err.to_string(), "spice_test() argument must be an object, not float");
    }

    #[test]
    fn test_plane_round_trip() {
        let m = Marshaller::new();
        let plane = Object::new("spice", "Plane")
            .with_attr("normal", Value::float_list(&[2.4, 34.5, 9.2]))
            .with_attr("constant", 4.7);

        let out = spice_test(&m, &[Value::Object(plane.clone())]).unwrap();
        assert_eq!(out, plane);
    }

    #[test]
    fn test_berto_propagates_missing_attribute() {
        let m = Marshaller::new();
        let Value::Object(mut obj) = ellipse_arg() else {
            unreachable!()
        };
        obj.delattr("semi_minor");

        assert!(matches!(
            spice_berto(&m, &[Value::Object(obj)]),
            Err(ConvertError::MissingAttribute {
                attribute: "semi_minor",
                ..
            })
        ));
    }
}
