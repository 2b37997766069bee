//! idam — typed access to IDAM diagnostic signals, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the data-access facade to Python through the `_idam` extension
//! module. The IDAM client library does the querying and transport; this
//! crate validates what it returns and presents it as immutable, statically
//! typed results.
//!
//! Key behaviors
//! -------------
//! - Re-export the facade ([`Client`]), the result model ([`SignalResult`],
//!   [`Dimension`], [`ErrorBars`]), the error taxonomy ([`FetchError`]) and
//!   the source seam ([`DataSource`], [`StubSource`], and with the `native`
//!   feature [`NativeSource`]).
//! - With `python-bindings`, define the `Data` and `Dimension` classes, the
//!   server/property functions and the exception hierarchy of the `_idam`
//!   module.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every [`SignalResult`] handed out satisfies
//!   `dim().len() == data().ndim()` and
//!   `dim()[i].len() == data().shape()[i]`.
//! - The Python layer performs only argument conversion, GIL release and
//!   error mapping; all behavior lives in the Rust modules.
//!
//! Conventions
//! -----------
//! - Arrays are exposed in C order; axis 0 of a time trace is time.
//! - Python exceptions derive from `idam.IdamError`; configuration problems
//!   raise `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Rust callers build a [`Client`] over any [`DataSource`]:
//!   `Client::from_env()` for the native library, `Client::new(StubSource)`
//!   for tests.
//! - Python callers use `idam.Data("amc_plasma current", 15100)` and hand
//!   `d.dim[0].data` / `d.data` to their plotting library.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` exercises the facade end
//!   to end against the stub source. The native source and Python layer need
//!   a real IDAM installation and are not covered by `cargo test`.

pub mod client;
pub mod config;
pub mod signal;
pub mod source;
pub mod telemetry;
#[cfg(feature = "python-bindings")]
pub mod utils;

pub use crate::{
    client::Client,
    config::{ClientConfig, ConfigError, ServerAddress, ServerOverride},
    signal::{
        Dimension, ErrorBars, FetchError, FetchErrorKind, FetchResult, ShapeMismatch, SignalResult,
        SliceError,
    },
    source::{DataSource, SignalRequest, SourceError, StubSource},
};

#[cfg(feature = "native")]
pub use crate::source::NativeSource;

#[cfg(feature = "python-bindings")]
use ndarray::{Ix1, IxDyn};

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::utils::{
    IdamConnectionError, IdamError, MalformedResponseError, NotFoundError, extract_source,
    native_client, to_numpy,
};

/// Dimension — Python view of one coordinate axis.
///
/// Purpose
/// -------
/// Mirror [`signal::Dimension`] for Python callers with the attribute names of
/// the `idam.Dimension` Python type.
///
/// Fields
/// ------
/// - `inner`: [`signal::Dimension`]
///   Validated axis; every getter copies out of it.
///
/// Notes
/// -----
/// - Instances are created by `Data.dim`; there is no Python constructor.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "idam", name = "Dimension", frozen)]
pub struct PyDimension {
    inner: Dimension,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyDimension {
    /// Short axis label.
    #[getter]
    pub fn label(&self) -> &str {
        self.inner.label()
    }

    #[getter]
    pub fn units(&self) -> &str {
        self.inner.units()
    }

    /// NumPy array of coordinate values.
    #[getter]
    pub fn data<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        to_numpy(py, self.inner.data())
    }

    /// Low-side errors, or `None`.
    #[getter]
    pub fn errl<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray1<f32>>> {
        self.inner.errors().map(|e| to_numpy::<Ix1>(py, e.low()))
    }

    /// High-side errors (equal to `errl` when symmetric), or `None`.
    #[getter]
    pub fn errh<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray1<f32>>> {
        self.inner.errors().map(|e| to_numpy::<Ix1>(py, e.high()))
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "Dimension(label={:?}, units={:?}, len={})",
            self.inner.label(),
            self.inner.units(),
            self.inner.len()
        )
    }
}

/// Data — Python-facing wrapper for one retrieved signal.
///
/// Purpose
/// -------
/// Fetch a signal on construction, so `idam.Data(name, source)` returns a
/// populated object exposing the validated [`SignalResult`] through
/// read-only attributes.
///
/// Parameters
/// ----------
/// Constructed from Python via `Data(data, source, host=None, port=None)`:
/// - `data`: `str`
///   Signal identifier, e.g. `"amc_plasma current"`.
/// - `source`: `object`
///   Converted with `str()`; usually a shot number such as `15100`.
/// - `host`, `port`: `Optional`
///   Server override for this request only.
///
/// Fields
/// ------
/// - `inner`: [`SignalResult`]
///
/// Notes
/// -----
/// - The GIL is released while the request is in flight.
/// - Raises `NotFoundError`, `IdamConnectionError` or
///   `MalformedResponseError` (all subclasses of `IdamError`).
#[cfg(feature = "python-bindings")]
#[pyclass(module = "idam", name = "Data", frozen)]
pub struct PyData {
    inner: SignalResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyData {
    #[new]
    #[pyo3(
        signature = (data, source, host = None, port = None),
        text_signature = "(data, source, /, host=None, port=None)"
    )]
    pub fn new<'py>(
        py: Python<'py>, data: &str, source: &Bound<'py, PyAny>, host: Option<String>,
        port: Option<u16>,
    ) -> PyResult<Self> {
        let request = SignalRequest::new(data, extract_source(source)?)
            .with_server(ServerOverride::new(host, port)?);
        let client = native_client()?;
        let inner = py.allow_threads(|| client.fetch_request(&request))?;
        Ok(PyData { inner })
    }

    /// Name used to request the data.
    #[getter]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[getter]
    pub fn source(&self) -> &str {
        self.inner.source()
    }

    #[getter]
    pub fn label(&self) -> &str {
        self.inner.label()
    }

    #[getter]
    pub fn units(&self) -> &str {
        self.inner.units()
    }

    /// Longer description of the data.
    #[getter]
    pub fn desc(&self) -> &str {
        self.inner.description()
    }

    #[getter]
    pub fn dim(&self) -> Vec<PyDimension> {
        self.inner.dim().iter().cloned().map(|inner| PyDimension { inner }).collect()
    }

    /// Index of the time dimension, or `None`.
    #[getter]
    pub fn order(&self) -> Option<usize> {
        self.inner.order()
    }

    /// Time values; same as `dim[order].data`.
    #[getter]
    pub fn time<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray1<f32>>> {
        self.inner.time().map(|t| to_numpy(py, t))
    }

    #[getter]
    pub fn data<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f32>> {
        to_numpy(py, self.inner.data())
    }

    #[getter]
    pub fn errl<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArrayDyn<f32>>> {
        self.inner.errors().map(|e| to_numpy::<IxDyn>(py, e.low()))
    }

    #[getter]
    pub fn errh<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArrayDyn<f32>>> {
        self.inner.errors().map(|e| to_numpy::<IxDyn>(py, e.high()))
    }

    /// Copy of `data` with `axis` fixed at `index`.
    #[pyo3(text_signature = "(self, axis, index, /)")]
    pub fn slice<'py>(
        &self, py: Python<'py>, axis: usize, index: usize,
    ) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        let view = self.inner.slice(axis, index)?;
        Ok(to_numpy(py, &view.to_owned()))
    }

    pub fn __repr__(&self) -> String {
        format!(
            "Data(name={:?}, source={:?}, label={:?}, shape={:?})",
            self.inner.name(),
            self.inner.source(),
            self.inner.label(),
            self.inner.shape()
        )
    }
}

/// Fetch `signal` for shot `experiment_id`; same as `Data(signal, experiment_id)`.
///
/// `experiment_id` is rendered with `str()` like the `Data` source, so any
/// shot number (including negative ones) reaches the server, which decides.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(signal, experiment_id, /)")]
fn fetch<'py>(
    py: Python<'py>, signal: &str, experiment_id: &Bound<'py, PyAny>,
) -> PyResult<PyData> {
    let request = SignalRequest::new(signal, extract_source(experiment_id)?);
    let client = native_client()?;
    let inner = py.allow_threads(|| client.fetch_request(&request))?;
    Ok(PyData { inner })
}

/// Set the host name (and optionally the port) of the IDAM server.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (host, port = None), text_signature = "(host, /, port=None)")]
fn set_host(host: String, port: Option<u16>) -> PyResult<()> {
    let client = native_client()?;
    let port = match port {
        Some(port) => port,
        None => client.server()?.port,
    };
    client.set_server(&ServerAddress::new(host, port)?)?;
    Ok(())
}

/// Set the port number of the IDAM server.
#[cfg(feature = "python-bindings")]
#[pyfunction]
fn set_port(port: u16) -> PyResult<()> {
    let client = native_client()?;
    let host = client.server()?.host;
    client.set_server(&ServerAddress::new(host, port)?)?;
    Ok(())
}

/// Set (or with `value=False`, reset) a client/server behavior property.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (name, value = true), text_signature = "(name, /, value=True)")]
fn set_property(name: &str, value: bool) -> PyResult<()> {
    native_client()?.set_property(name, value)?;
    Ok(())
}

/// Get a client/server behavior property.
#[cfg(feature = "python-bindings")]
#[pyfunction]
fn get_property(name: &str) -> PyResult<bool> {
    Ok(native_client()?.property(name)?)
}

/// _idam — PyO3 module initializer for the Python extension.
///
/// Registers the `Data` and `Dimension` classes, the module functions and the
/// exception hierarchy. The native client is opened lazily on first use, so
/// importing the module never touches the IDAM library.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _idam(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_class::<PyData>()?;
    m.add_class::<PyDimension>()?;
    m.add_function(wrap_pyfunction!(fetch, m)?)?;
    m.add_function(wrap_pyfunction!(set_host, m)?)?;
    m.add_function(wrap_pyfunction!(set_port, m)?)?;
    m.add_function(wrap_pyfunction!(set_property, m)?)?;
    m.add_function(wrap_pyfunction!(get_property, m)?)?;
    m.add("IdamError", py.get_type::<IdamError>())?;
    m.add("NotFoundError", py.get_type::<NotFoundError>())?;
    m.add("IdamConnectionError", py.get_type::<IdamConnectionError>())?;
    m.add("MalformedResponseError", py.get_type::<MalformedResponseError>())?;
    Ok(())
}
