//! The `_spice` Python extension module.
//!
//! The `spice` Python package imports this module for its diagnostic entry
//! points and `SpiceException`. All conversion logic lives in
//! `spicebridge-core`.

use pyo3::prelude::*;

#[pymodule]
fn _spice(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    spicebridge_core::python::register(m)
}
