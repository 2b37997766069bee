//! Native IDAM client loaded at run time.
//!
//! Purpose
//! -------
//! Implement [`DataSource`] on top of the IDAM C client library, opened with
//! `libloading` from the location given in [`ClientConfig`] (`IDAM_LIBRARY`),
//! so nothing about the installation is baked into the build.
//!
//! Key behaviors
//! -------------
//! - All entry points are resolved once in [`NativeSource::load`]; a missing
//!   symbol fails loading rather than the first request.
//! - Every library interaction holds a process-wide lock. The IDAM client is
//!   not thread-safe and keeps the server host/port in global state.
//! - A per-request server override is applied under that lock and restored
//!   when the request finishes, on both success and failure paths.
//! - Every handle obtained from `idamGetAPI` is released with `idamFree`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The resolved function pointers are only called while `library` is alive;
//!   both live in the same [`NativeSource`].
//! - Buffers passed to the `getIdamFloat*` readers are sized from the counts
//!   the library reports for the same handle.
//! - A negative handle means the client could not talk to the server; a
//!   failed source status means the request did not resolve.
//!
//! Conventions
//! -----------
//! - Responses are returned in native axis order; validation and axis
//!   reversal happen in the facade.
use std::ffi::{CStr, CString, c_char, c_float, c_int};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use libloading::{Library, Symbol};
use tracing::{debug, trace};

use crate::config::{ClientConfig, ConfigError, ConfigResult, ServerAddress, ServerOverride};
use crate::source::{
    errors::{SourceError, SourceResult},
    raw::{RawDimension, RawErrors, RawSignal},
    traits::{DataSource, SignalRequest},
};

/// IDAM's marker for "no error data" in `getIdamErrorType`.
const TYPE_UNKNOWN: c_int = 0;

static IDAM_LOCK: Mutex<()> = Mutex::new(());

type GetApiFn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
type HandleIntFn = unsafe extern "C" fn(c_int) -> c_int;
type HandleStrFn = unsafe extern "C" fn(c_int) -> *const c_char;
type HandleFloatsFn = unsafe extern "C" fn(c_int, *mut c_float);
type HandleErrorFn = unsafe extern "C" fn(c_int, c_int, *mut c_float);
type DimIntFn = unsafe extern "C" fn(c_int, c_int) -> c_int;
type DimStrFn = unsafe extern "C" fn(c_int, c_int) -> *const c_char;
type DimFloatsFn = unsafe extern "C" fn(c_int, c_int, *mut c_float);
type DimErrorFn = unsafe extern "C" fn(c_int, c_int, c_int, *mut c_float);
type FreeFn = unsafe extern "C" fn(c_int);
type PutStrFn = unsafe extern "C" fn(*const c_char);
type PutIntFn = unsafe extern "C" fn(c_int);
type GetStrFn = unsafe extern "C" fn() -> *const c_char;
type GetIntFn = unsafe extern "C" fn() -> c_int;
type NamedIntFn = unsafe extern "C" fn(*const c_char) -> c_int;

struct IdamApi {
    get_api: GetApiFn,
    source_status: HandleIntFn,
    error_msg: HandleStrFn,
    data_num: HandleIntFn,
    rank: HandleIntFn,
    order: HandleIntFn,
    dim_num: DimIntFn,
    float_data: HandleFloatsFn,
    data_label: HandleStrFn,
    data_units: HandleStrFn,
    data_desc: HandleStrFn,
    error_type: HandleIntFn,
    error_asymmetry: HandleIntFn,
    float_asymmetric_error: HandleErrorFn,
    dim_label: DimStrFn,
    dim_units: DimStrFn,
    float_dim_data: DimFloatsFn,
    dim_error_type: DimIntFn,
    dim_error_asymmetry: DimIntFn,
    float_dim_asymmetric_error: DimErrorFn,
    free: FreeFn,
    put_server_host: PutStrFn,
    put_server_port: PutIntFn,
    get_server_host: GetStrFn,
    get_server_port: GetIntFn,
    set_property: PutStrFn,
    reset_property: PutStrFn,
    get_property: NamedIntFn,
}

impl IdamApi {
    fn resolve(library: &Library) -> ConfigResult<Self> {
        // SAFETY: each type alias matches the C prototype in idamclient.h.
        unsafe {
            Ok(IdamApi {
                get_api: symbol(library, "idamGetAPI")?,
                source_status: symbol(library, "getIdamSourceStatus")?,
                error_msg: symbol(library, "getIdamErrorMsg")?,
                data_num: symbol(library, "getIdamDataNum")?,
                rank: symbol(library, "getIdamRank")?,
                order: symbol(library, "getIdamOrder")?,
                dim_num: symbol(library, "getIdamDimNum")?,
                float_data: symbol(library, "getIdamFloatData")?,
                data_label: symbol(library, "getIdamDataLabel")?,
                data_units: symbol(library, "getIdamDataUnits")?,
                data_desc: symbol(library, "getIdamDataDesc")?,
                error_type: symbol(library, "getIdamErrorType")?,
                error_asymmetry: symbol(library, "getIdamErrorAsymmetry")?,
                float_asymmetric_error: symbol(library, "getIdamFloatAsymmetricError")?,
                dim_label: symbol(library, "getIdamDimLabel")?,
                dim_units: symbol(library, "getIdamDimUnits")?,
                float_dim_data: symbol(library, "getIdamFloatDimData")?,
                dim_error_type: symbol(library, "getIdamDimErrorType")?,
                dim_error_asymmetry: symbol(library, "getIdamDimErrorAsymmetry")?,
                float_dim_asymmetric_error: symbol(library, "getIdamFloatDimAsymmetricError")?,
                free: symbol(library, "idamFree")?,
                put_server_host: symbol(library, "putIdamServerHost")?,
                put_server_port: symbol(library, "putIdamServerPort")?,
                get_server_host: symbol(library, "getIdamServerHost")?,
                get_server_port: symbol(library, "getIdamServerPort")?,
                set_property: symbol(library, "setIdamProperty")?,
                reset_property: symbol(library, "resetIdamProperty")?,
                get_property: symbol(library, "getIdamProperty")?,
            })
        }
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> ConfigResult<T> {
    let found: Symbol<'_, T> = library
        .get(name.as_bytes())
        .map_err(|e| ConfigError::MissingSymbol { name, reason: e.to_string() })?;
    Ok(*found)
}

/// `NativeSource` — [`DataSource`] backed by the IDAM client library.
pub struct NativeSource {
    api: IdamApi,
    path: PathBuf,
    _library: Library,
}

impl std::fmt::Debug for NativeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeSource").field("path", &self.path).finish_non_exhaustive()
    }
}

impl NativeSource {
    /// Open the IDAM client library and point it at the configured server.
    ///
    /// Errors
    /// ------
    /// - `ConfigError::MissingLibrary` if `config` names no library.
    /// - `ConfigError::LibraryLoad` if the library cannot be opened or
    ///   rejects the configured server.
    /// - `ConfigError::MissingSymbol` if an IDAM entry point is absent.
    pub fn load(config: &ClientConfig) -> ConfigResult<Self> {
        let path = config.library().ok_or(ConfigError::MissingLibrary)?;
        let display_path = path.display().to_string();
        let load_error =
            |reason: String| ConfigError::LibraryLoad { path: display_path.clone(), reason };

        // SAFETY: loading runs the library's initializers; IDAM's have no
        // preconditions beyond being loaded once per process image.
        let library = unsafe { Library::new(path).map_err(|e| load_error(e.to_string()))? };
        let api = IdamApi::resolve(&library)?;
        let source = NativeSource { api, path: path.to_path_buf(), _library: library };

        source.set_server(config.server()).map_err(|e| load_error(e.to_string()))?;

        debug!(library = %display_path, server = %config.server(), "IDAM client library loaded");
        Ok(source)
    }

    pub fn library_path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for NativeSource {
    fn query(&self, request: &SignalRequest) -> SourceResult<RawSignal> {
        let _lock = lock();
        query_locked(&self.api, request)
    }

    fn set_property(&self, name: &str, enabled: bool) -> SourceResult<()> {
        let _lock = lock();
        write_property(&self.api, name, enabled)
    }

    fn property(&self, name: &str) -> SourceResult<bool> {
        let _lock = lock();
        read_property(&self.api, name)
    }

    fn set_server(&self, server: &ServerAddress) -> SourceResult<()> {
        let _lock = lock();
        write_server(&self.api, server)
    }

    fn server(&self) -> SourceResult<ServerAddress> {
        let _lock = lock();
        read_server(&self.api)
    }
}

fn lock() -> MutexGuard<'static, ()> {
    IDAM_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run one request against `api`. Callers must hold [`IDAM_LOCK`].
///
/// Drop order releases the handle first, then restores the server settings.
fn query_locked(api: &IdamApi, request: &SignalRequest) -> SourceResult<RawSignal> {
    let not_found = |message: &str| SourceError::NotFound {
        signal: request.signal().to_owned(),
        source: request.source().to_owned(),
        message: message.to_owned(),
    };
    let signal =
        CString::new(request.signal()).map_err(|_| not_found("identifier contains NUL"))?;
    let source = CString::new(request.source()).map_err(|_| not_found("source contains NUL"))?;

    let _restore = ServerRestore::apply(api, request.server_override())?;
    if let Ok(server) = read_server(api) {
        debug!(%server, signal = request.signal(), source = request.source(), "querying IDAM");
    }

    // SAFETY: both strings outlive the call.
    let handle = unsafe { (api.get_api)(signal.as_ptr(), source.as_ptr()) };
    if handle < 0 {
        // SAFETY: IDAM reports the connection error for negative handles.
        let message = unsafe { owned_string((api.error_msg)(handle)) };
        return Err(SourceError::Unreachable { message });
    }
    let handle = HandleGuard { api, handle };
    trace!(handle = handle.handle, "IDAM handle opened");

    // SAFETY: `handle` is live until the guard drops.
    unsafe {
        if (api.source_status)(handle.handle) == 0 {
            return Err(not_found(&owned_string((api.error_msg)(handle.handle))));
        }
        Ok(read_signal(api, handle.handle))
    }
}

/// Copy everything IDAM holds for `handle` into a [`RawSignal`].
///
/// # Safety
///
/// `handle` must be a live handle returned by `api.get_api`.
unsafe fn read_signal(api: &IdamApi, handle: c_int) -> RawSignal {
    let label = owned_string((api.data_label)(handle));
    let units = owned_string((api.data_units)(handle));
    let description = owned_string((api.data_desc)(handle));

    let data_num = count((api.data_num)(handle));
    if data_num == 0 {
        return RawSignal::new(label, units, Vec::new(), Vec::new()).with_description(description);
    }

    let rank = count((api.rank)(handle));
    let order = usize::try_from((api.order)(handle)).ok();

    let mut data = vec![0.0_f32; data_num];
    (api.float_data)(handle, data.as_mut_ptr());

    let errors = if (api.error_type)(handle) != TYPE_UNKNOWN {
        let asymmetric = (api.error_asymmetry)(handle) != 0;
        let read = |above: c_int| {
            let mut values = vec![0.0_f32; data_num];
            (api.float_asymmetric_error)(handle, above, values.as_mut_ptr());
            values
        };
        Some(RawErrors { low: read(0), high: asymmetric.then(|| read(1)) })
    } else {
        None
    };

    let mut dims = Vec::with_capacity(rank);
    for axis in 0..rank as c_int {
        dims.push(read_dimension(api, handle, axis));
    }

    RawSignal { label, units, description, rank, order, data, errors, dims }
}

/// # Safety
///
/// `handle` must be live and `axis` below the rank IDAM reports for it.
unsafe fn read_dimension(api: &IdamApi, handle: c_int, axis: c_int) -> RawDimension {
    let len = count((api.dim_num)(handle, axis));

    let mut coords = vec![0.0_f32; len];
    (api.float_dim_data)(handle, axis, coords.as_mut_ptr());

    let errors = if (api.dim_error_type)(handle, axis) != TYPE_UNKNOWN {
        let asymmetric = (api.dim_error_asymmetry)(handle, axis) != 0;
        let read = |above: c_int| {
            let mut values = vec![0.0_f32; len];
            (api.float_dim_asymmetric_error)(handle, axis, above, values.as_mut_ptr());
            values
        };
        Some(RawErrors { low: read(0), high: asymmetric.then(|| read(1)) })
    } else {
        None
    };

    RawDimension {
        label: owned_string((api.dim_label)(handle, axis)),
        units: owned_string((api.dim_units)(handle, axis)),
        len,
        data: coords,
        errors,
    }
}

fn read_server(api: &IdamApi) -> SourceResult<ServerAddress> {
    // SAFETY: plain getters on the client's global settings.
    let (host, port) =
        unsafe { (owned_string((api.get_server_host)()), (api.get_server_port)()) };
    let port = u16::try_from(port).map_err(|_| SourceError::Library {
        message: format!("server port {port} out of range"),
    })?;
    Ok(ServerAddress { host, port })
}

fn write_server(api: &IdamApi, server: &ServerAddress) -> SourceResult<()> {
    let host = CString::new(server.host.as_str())
        .map_err(|_| SourceError::Library { message: "server host contains NUL".into() })?;
    // SAFETY: IDAM copies the host string.
    unsafe {
        (api.put_server_host)(host.as_ptr());
        (api.put_server_port)(c_int::from(server.port));
    }
    Ok(())
}

fn write_property(api: &IdamApi, name: &str, enabled: bool) -> SourceResult<()> {
    let name = property_name(name)?;
    // SAFETY: `name` outlives the call.
    unsafe {
        if enabled {
            (api.set_property)(name.as_ptr());
        } else {
            (api.reset_property)(name.as_ptr());
        }
    }
    Ok(())
}

fn read_property(api: &IdamApi, name: &str) -> SourceResult<bool> {
    let name = property_name(name)?;
    // SAFETY: `name` outlives the call.
    Ok(unsafe { (api.get_property)(name.as_ptr()) } != 0)
}

fn property_name(name: &str) -> SourceResult<CString> {
    CString::new(name).map_err(|_| SourceError::Library {
        message: format!("property name {name:?} contains NUL"),
    })
}

fn count(value: c_int) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Copy a C string owned by the library; null becomes empty.
unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Frees an IDAM handle on drop.
struct HandleGuard<'a> {
    api: &'a IdamApi,
    handle: c_int,
}

impl Drop for HandleGuard<'_> {
    fn drop(&mut self) {
        // SAFETY: the handle came from `idamGetAPI` and is freed once.
        unsafe { (self.api.free)(self.handle) };
        trace!(handle = self.handle, "IDAM handle freed");
    }
}

/// Applies a server override and puts the previous settings back on drop.
///
/// Must be created and dropped while holding [`IDAM_LOCK`].
struct ServerRestore<'a> {
    api: &'a IdamApi,
    host: Option<CString>,
    port: Option<c_int>,
}

impl<'a> ServerRestore<'a> {
    fn apply(api: &'a IdamApi, over: &ServerOverride) -> SourceResult<Self> {
        let new_host = over
            .host()
            .map(CString::new)
            .transpose()
            .map_err(|_| SourceError::Library { message: "server host contains NUL".into() })?;

        // SAFETY: getters/setters on the client's global settings; the
        // previous host is copied before it is overwritten.
        unsafe {
            let host = match new_host {
                Some(host) => {
                    let current = (api.get_server_host)();
                    let previous = if current.is_null() {
                        CString::default()
                    } else {
                        CStr::from_ptr(current).to_owned()
                    };
                    (api.put_server_host)(host.as_ptr());
                    Some(previous)
                }
                None => None,
            };
            let port = match over.port() {
                Some(port) => {
                    let previous = (api.get_server_port)();
                    (api.put_server_port)(c_int::from(port));
                    Some(previous)
                }
                None => None,
            };
            Ok(ServerRestore { api, host, port })
        }
    }
}

impl Drop for ServerRestore<'_> {
    fn drop(&mut self) {
        // SAFETY: restores values read from the same globals in `apply`.
        unsafe {
            if let Some(port) = self.port {
                (self.api.put_server_port)(port);
            }
            if let Some(host) = &self.host {
                (self.api.put_server_host)(host.as_ptr());
            }
        }
    }
}
