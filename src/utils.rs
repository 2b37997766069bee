//! Python-side helpers: exception types, argument conversion, array export,
//! and the process-wide native client used by the bindings.
use std::sync::OnceLock;

use ndarray::{Array, Dimension as NdDimension};
use numpy::{IntoPyArray, PyArray};
use pyo3::{create_exception, exceptions::PyException, prelude::*, types::PyAny};

use crate::{client::Client, source::NativeSource};

create_exception!(_idam, IdamError, PyException, "Base class for IDAM data-access failures.");
create_exception!(_idam, NotFoundError, IdamError, "The signal/source pair does not resolve.");
create_exception!(_idam, IdamConnectionError, IdamError, "The IDAM server cannot be reached.");
create_exception!(
    _idam,
    MalformedResponseError,
    IdamError,
    "The server returned arrays inconsistent with their dimensions."
);

static NATIVE_CLIENT: OnceLock<Client<NativeSource>> = OnceLock::new();

/// Client shared by every Python call, opened from the environment on first
/// use.
pub fn native_client() -> PyResult<&'static Client<NativeSource>> {
    if let Some(client) = NATIVE_CLIENT.get() {
        return Ok(client);
    }
    let client = Client::from_env()?;
    Ok(NATIVE_CLIENT.get_or_init(|| client))
}

/// Render any Python object as an IDAM source string, as `str(obj)` would.
///
/// Shot numbers, file paths and other source forms are all accepted.
pub fn extract_source(raw: &Bound<'_, PyAny>) -> PyResult<String> {
    Ok(raw.str()?.to_cow()?.into_owned())
}

/// Copy an `ndarray` array into a new NumPy array.
pub fn to_numpy<'py, D>(py: Python<'py>, values: &Array<f32, D>) -> Bound<'py, PyArray<f32, D>>
where
    D: NdDimension,
{
    values.to_owned().into_pyarray(py)
}
