//! The seam between the facade and the external data-access library.
//!
//! Purpose
//! -------
//! Define [`DataSource`], the only thing the facade knows about the external
//! collaborator, and [`SignalRequest`], the value passed across it.
//!
//! Key behaviors
//! -------------
//! - `query` returns the raw, unvalidated response for one request. It is
//!   responsible for applying and then undoing any per-request server
//!   override.
//! - Property and server accessors forward client-wide settings to the
//!   collaborator. They take `&self`: the IDAM client keeps these settings in
//!   process-global state, so implementations use interior mutability.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementations hold no per-request state between calls; two queries
//!   with equal requests against an unchanged backend return equal responses.
//! - Implementations that are shared between threads must serialize access
//!   to non-thread-safe backends themselves.
use crate::config::{ServerAddress, ServerOverride};
use crate::source::{errors::SourceResult, raw::RawSignal};

/// `SignalRequest` — one `(signal, source)` lookup plus an optional server
/// override.
///
/// Fields
/// ------
/// - `signal`: opaque identifier understood by the backend
///   (e.g. `"amc_plasma current"`).
/// - `source`: opaque source string; a shot number in decimal for ordinary
///   experiment lookups, but file paths and other IDAM source forms pass
///   through unchanged.
/// - `server`: host/port replacing the default server for this request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalRequest {
    signal: String,
    source: String,
    server: ServerOverride,
}

impl SignalRequest {
    pub fn new(signal: impl Into<String>, source: impl Into<String>) -> Self {
        SignalRequest {
            signal: signal.into(),
            source: source.into(),
            server: ServerOverride::default(),
        }
    }

    /// Request for `signal` in experiment (shot) `experiment_id`.
    pub fn shot(signal: impl Into<String>, experiment_id: u32) -> Self {
        Self::new(signal, experiment_id.to_string())
    }

    pub fn with_server(mut self, server: ServerOverride) -> Self {
        self.server = server;
        self
    }

    pub fn signal(&self) -> &str {
        &self.signal
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn server_override(&self) -> &ServerOverride {
        &self.server
    }
}

/// DataSource — client interface to an IDAM-like data-access backend.
pub trait DataSource {
    /// Resolve one request into a raw response in native axis order.
    fn query(&self, request: &SignalRequest) -> SourceResult<RawSignal>;

    /// Enable or disable a client/server behavior flag.
    fn set_property(&self, name: &str, enabled: bool) -> SourceResult<()>;

    /// Current value of a client/server behavior flag.
    fn property(&self, name: &str) -> SourceResult<bool>;

    /// Replace the default server for subsequent requests.
    fn set_server(&self, server: &ServerAddress) -> SourceResult<()>;

    /// Default server used by requests without an override.
    fn server(&self) -> SourceResult<ServerAddress>;
}

impl<T> DataSource for &T
where
    T: DataSource + ?Sized,
{
    fn query(&self, request: &SignalRequest) -> SourceResult<RawSignal> {
        (**self).query(request)
    }

    fn set_property(&self, name: &str, enabled: bool) -> SourceResult<()> {
        (**self).set_property(name, enabled)
    }

    fn property(&self, name: &str) -> SourceResult<bool> {
        (**self).property(name)
    }

    fn set_server(&self, server: &ServerAddress) -> SourceResult<()> {
        (**self).set_server(server)
    }

    fn server(&self) -> SourceResult<ServerAddress> {
        (**self).server()
    }
}
