//! Python bindings via pyo3.
//!
//! Bridges real Python objects to the converter: attributes named in the
//! field tables are read off any Python object, and results are built as
//! instances of the classes in the `spice` package. Those classes are
//! resolved once per interpreter.

use crate::convert::Marshaller;
use crate::diagnostics;
use crate::error::{ConvertError, ToolkitError};
use crate::native::ShapeKind;
use crate::object::{Object, Value};
use crate::registry::SPICE_MODULE;
use crate::schema::layout_for;
use crate::toolkit::{check_failed, ErrorState};
use pyo3::create_exception;
use pyo3::exceptions::{
    PyAttributeError, PyException, PyImportError, PyNotImplementedError, PyTypeError,
    PyValueError,
};
use pyo3::prelude::*;
use pyo3::sync::GILOnceCell;
use pyo3::types::{PyBool, PyFloat, PyInt, PyList, PyModule, PyString, PyTuple};
use std::sync::OnceLock;

create_exception!(
    spice,
    SpiceException,
    PyException,
    "Raised when a SPICE toolkit call fails."
);

impl From<ConvertError> for PyErr {
    fn from(err: ConvertError) -> Self {
        let message = err.to_string();
        match err {
            ConvertError::ModuleNotFound(_) | ConvertError::TypeNotFound { .. } => {
                PyImportError::new_err(message)
            }
            ConvertError::MissingAttribute { .. } => PyAttributeError::new_err(message),
            ConvertError::WrongLength { .. } | ConvertError::TypeMismatch { .. } => {
                PyValueError::new_err(message)
            }
            ConvertError::Unsupported(_) => PyNotImplementedError::new_err(message),
            ConvertError::Arguments { .. } | ConvertError::ArgumentType { .. } => {
                PyTypeError::new_err(message)
            }
        }
    }
}

impl From<ToolkitError> for PyErr {
    fn from(err: ToolkitError) -> Self {
        SpiceException::new_err(err.to_string())
    }
}

/// Raise `SpiceException` if the toolkit flagged a failure.
pub fn raise_if_failed<S: ErrorState + ?Sized>(state: &mut S) -> PyResult<()> {
    check_failed(state).map_err(PyErr::from)
}

static MARSHALLER: OnceLock<Marshaller> = OnceLock::new();

fn marshaller() -> &'static Marshaller {
    MARSHALLER.get_or_init(Marshaller::new)
}

/// The `spice` package's record classes.
struct SpiceTypes {
    ellipse: Py<PyAny>,
    plane: Py<PyAny>,
}

static SPICE_TYPES: GILOnceCell<SpiceTypes> = GILOnceCell::new();

impl SpiceTypes {
    fn get(py: Python<'_>) -> PyResult<&'static SpiceTypes> {
        SPICE_TYPES.get_or_try_init(py, || {
            let module = py.import(SPICE_MODULE)?;
            tracing::debug!(module = SPICE_MODULE, "resolved record classes");
            Ok(SpiceTypes {
                ellipse: module.getattr(ShapeKind::Ellipse.type_name())?.unbind(),
                plane: module.getattr(ShapeKind::Plane.type_name())?.unbind(),
            })
        })
    }

    fn class(&self, kind: ShapeKind) -> Result<&Py<PyAny>, ConvertError> {
        match kind {
            ShapeKind::Ellipse => Ok(&self.ellipse),
            ShapeKind::Plane => Ok(&self.plane),
            other => Err(ConvertError::Unsupported(other)),
        }
    }
}

/// Convert a Python value to a [`Value`].
///
/// Anything that is not a scalar, string or sequence becomes an attribute-less
/// object carrying its class name.
pub fn py_to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::None);
    }
    if obj.is_instance_of::<PyBool>() {
        return Ok(Value::Bool(obj.extract()?));
    }
    if obj.is_instance_of::<PyInt>() {
        if let Ok(i) = obj.extract::<i64>() {
            return Ok(Value::Int(i));
        }
        return Ok(Value::Float(obj.extract()?));
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(Value::Float(obj.extract()?));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Value::Str(obj.extract()?));
    }
    if let Ok(list) = obj.downcast::<PyList>() {
        let items: PyResult<Vec<_>> = list.iter().map(|item| py_to_value(&item)).collect();
        return Ok(Value::List(items?));
    }
    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        let items: PyResult<Vec<_>> = tuple.iter().map(|item| py_to_value(&item)).collect();
        return Ok(Value::List(items?));
    }

    let ty = obj.get_type();
    Ok(Value::Object(Object::new(
        ty.module()?.to_string(),
        ty.name()?.to_string(),
    )))
}

/// Read the attributes of `kind` off a Python object.
///
/// Missing attributes are left out so the field-table check reports them.
pub fn py_to_object(kind: ShapeKind, obj: &Bound<'_, PyAny>) -> PyResult<Object> {
    let layout = layout_for(kind).ok_or(ConvertError::Unsupported(kind))?;
    let ty = obj.get_type();
    let mut out = Object::new(ty.module()?.to_string(), ty.name()?.to_string());

    for field in layout {
        match obj.getattr(field.name) {
            Ok(value) => out.setattr(field.name, py_to_value(&value)?),
            Err(e) if e.is_instance_of::<PyAttributeError>(obj.py()) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// The cached `spice` class an object maps onto, if any.
fn cached_shape(obj: &Object) -> Option<ShapeKind> {
    if obj.module != SPICE_MODULE {
        return None;
    }
    ShapeKind::ALL
        .into_iter()
        .find(|kind| kind.is_supported() && kind.type_name() == obj.type_name)
}

/// Convert a [`Value`] to a Python object.
pub fn value_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    match value {
        Value::None => Ok(py.None()),
        Value::Bool(b) => Ok((*b).into_pyobject(py)?.to_owned().into_any().unbind()),
        Value::Int(i) => Ok((*i).into_pyobject(py)?.into_any().unbind()),
        Value::Float(f) => Ok(PyFloat::new(py, *f).into_any().unbind()),
        Value::Str(s) => Ok(PyString::new(py, s).into_any().unbind()),
        Value::List(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(value_to_py(py, item)?)?;
            }
            Ok(list.into_any().unbind())
        }
        Value::Object(obj) => {
            let class = match cached_shape(obj) {
                Some(kind) => SpiceTypes::get(py)?.class(kind)?.bind(py).clone(),
                // foreign nested objects are imported by name
                None => py.import(obj.module.as_str())?.getattr(obj.type_name.as_str())?,
            };
            let instance = class.call0()?;
            for (name, attr) in &obj.attrs {
                instance.setattr(name.as_str(), value_to_py(py, attr)?)?;
            }
            Ok(instance.unbind())
        }
    }
}

/// Instantiate the `spice` class for `kind` and copy `obj`'s attributes onto it.
pub fn object_to_py(py: Python<'_>, kind: ShapeKind, obj: &Object) -> PyResult<PyObject> {
    let class = SpiceTypes::get(py)?.class(kind)?;
    let instance = class.call0(py)?;
    let bound = instance.bind(py);
    for (name, value) in &obj.attrs {
        bound.setattr(name.as_str(), value_to_py(py, value)?)?;
    }
    Ok(instance)
}

/// Ellipse round trip that overwrites the ellipse with fixed test values.
#[pyfunction]
pub fn spice_berto(py: Python<'_>, ellipse: &Bound<'_, PyAny>) -> PyResult<PyObject> {
    let args = [Value::Object(py_to_object(ShapeKind::Ellipse, ellipse)?)];
    let out = diagnostics::spice_berto(marshaller(), &args)?;
    object_to_py(py, ShapeKind::Ellipse, &out)
}

/// Plane round trip.
#[pyfunction]
pub fn spice_test(py: Python<'_>, plane: &Bound<'_, PyAny>) -> PyResult<PyObject> {
    let args = [Value::Object(py_to_object(ShapeKind::Plane, plane)?)];
    let out = diagnostics::spice_test(marshaller(), &args)?;
    object_to_py(py, ShapeKind::Plane, &out)
}

/// Add the entry points and `SpiceException` to an extension module.
pub fn register(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(spice_berto, module)?)?;
    module.add_function(wrap_pyfunction!(spice_test, module)?)?;
    module.add("SpiceException", module.py().get_type::<SpiceException>())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::RecordedErrors;
    use std::ffi::CStr;

    const SPICE_PY: &CStr = c"
class Ellipse(object):
    def __init__(self, center=None, semi_major=None, semi_minor=None):
        self.center = center or [0.0] * 3
        self.semi_major = semi_major or [0.0] * 3
        self.semi_minor = semi_minor or [0.0] * 3

class Plane(object):
    def __init__(self, normal=None, constant=0.0):
        self.normal = normal or [0.0] * 3
        self.constant = constant

class Bare(object):
    pass
";

    fn with_spice<R>(f: impl FnOnce(Python<'_>, &Bound<'_, PyAny>) -> R) -> R {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let modules = py.import("sys").unwrap().getattr("modules").unwrap();
            if !modules.contains("spice").unwrap() {
                let module =
                    PyModule::from_code(py, SPICE_PY, c"spice/__init__.py", c"spice").unwrap();
                modules.set_item("spice", module).unwrap();
            }
            let spice = modules.get_item("spice").unwrap();
            f(py, &spice)
        })
    }

    #[test]
    fn test_berto_returns_fixed_values() {
        with_spice(|py, spice| {
            let ellipse = spice
                .getattr("Ellipse")
                .unwrap()
                .call1((vec![234.3, 8348.3, 937.6], vec![5, 293, 11], (6.0, 3.0, 6.0)))
                .unwrap();

            let out = spice_berto(py, &ellipse).unwrap();
            let out = out.bind(py);
            assert_eq!(out.get_type().name().unwrap().to_string(), "Ellipse");
            let center: Vec<f64> = out.getattr("center").unwrap().extract().unwrap();
            let semi_major: Vec<f64> = out.getattr("semi_major").unwrap().extract().unwrap();
            let semi_minor: Vec<f64> = out.getattr("semi_minor").unwrap().extract().unwrap();
            assert_eq!(center, vec![1.0, 2.0, 3.0]);
            assert_eq!(semi_major, vec![4.0, 5.0, 6.0]);
            assert_eq!(semi_minor, vec![7.0, 8.0, 9.0]);
        });
    }

    #[test]
    fn test_plane_round_trip() {
        with_spice(|py, spice| {
            let plane = spice
                .getattr("Plane")
                .unwrap()
                .call1((vec![0.0, 0.0, 1.0], 2.5))
                .unwrap();

            let out = spice_test(py, &plane).unwrap();
            let out = out.bind(py);
            let normal: Vec<f64> = out.getattr("normal").unwrap().extract().unwrap();
            let constant: f64 = out.getattr("constant").unwrap().extract().unwrap();
            assert_eq!(normal, vec![0.0, 0.0, 1.0]);
            assert_eq!(constant, 2.5);
        });
    }

    #[test]
    fn test_missing_attribute_raises_attribute_error() {
        with_spice(|py, spice| {
            let bare = spice.getattr("Bare").unwrap().call0().unwrap();
            let err = spice_berto(py, &bare).unwrap_err();
            assert!(err.is_instance_of::<PyAttributeError>(py));
            assert!(err.to_string().contains("center"));
        });
    }

    #[test]
    fn test_short_vector_raises_value_error() {
        with_spice(|py, spice| {
            let plane = spice
                .getattr("Plane")
                .unwrap()
                .call1((vec![0.0, 1.0], 1.0))
                .unwrap();
            let err = spice_test(py, &plane).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }

    #[test]
    fn test_toolkit_failure_raises_spice_exception() {
        with_spice(|py, _| {
            let mut state = RecordedErrors::new();
            state.signal("SPICE(NOSUCHFILE)", "file /dev/null is not a kernel");
            let err = raise_if_failed(&mut state).unwrap_err();
            assert!(err.is_instance_of::<SpiceException>(py));
            assert!(raise_if_failed(&mut state).is_ok());
        });
    }

    #[test]
    fn test_value_conversion() {
        with_spice(|py, _| {
            let obj = py
                .eval(c"[1, 2.5, True, None, 'x', (3,)]", None, None)
                .unwrap();
            let value = py_to_value(&obj).unwrap();
            assert_eq!(
                value,
                Value::List(vec![
                    Value::Int(1),
                    Value::Float(2.5),
                    Value::Bool(true),
                    Value::None,
                    Value::Str("x".to_string()),
                    Value::List(vec![Value::Int(3)]),
                ])
            );
            let back = value_to_py(py, &value).unwrap();
            let expected = py
                .eval(c"[1, 2.5, True, None, 'x', [3]]", None, None)
                .unwrap();
            assert!(back.bind(py).eq(expected).unwrap());
        });
    }

    #[test]
    fn test_nested_spice_object_uses_cached_class() {
        with_spice(|py, spice| {
            let plane = Object::new(SPICE_MODULE, "Plane")
                .with_attr("constant", 1.5)
                .with_attr("normal", Value::float_list(&[0.0, 1.0, 0.0]));
            assert_eq!(cached_shape(&plane), Some(ShapeKind::Plane));
            assert_eq!(cached_shape(&Object::new(SPICE_MODULE, "Cell")), None);
            assert_eq!(cached_shape(&Object::new("other", "Plane")), None);

            let out = value_to_py(py, &Value::Object(plane)).unwrap();
            let out = out.bind(py);
            assert!(out.is_instance(&spice.getattr("Plane").unwrap()).unwrap());
            let constant: f64 = out.getattr("constant").unwrap().extract().unwrap();
            assert_eq!(constant, 1.5);
        });
    }

    #[test]
    fn test_wrong_argument_count_raises_type_error() {
        with_spice(|py, spice| {
            let module = PyModule::new(py, "_spice").unwrap();
            register(&module).unwrap();
            let plane = spice.getattr("Plane").unwrap().call0().unwrap();

            for name in ["spice_berto", "spice_test"] {
                let function = module.getattr(name).unwrap();
                let err = function.call0().unwrap_err();
                assert!(err.is_instance_of::<PyTypeError>(py), "{name}: {err}");
                let err = function.call1((&plane, &plane)).unwrap_err();
                assert!(err.is_instance_of::<PyTypeError>(py), "{name}: {err}");
            }
            assert!(module.getattr("spice_test").unwrap().call1((&plane,)).is_ok());
        });
    }

    #[test]
    fn test_register_module() {
        with_spice(|py, _| {
            let module = PyModule::new(py, "_spice").unwrap();
            register(&module).unwrap();
            assert!(module.getattr("spice_berto").is_ok());
            assert!(module.getattr("spice_test").is_ok());
            assert!(module.getattr("SpiceException").is_ok());
        });
    }
}
