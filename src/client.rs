//! client — the data-access facade.
//!
//! Purpose
//! -------
//! Turn a signal identifier and an experiment id into a validated
//! [`SignalResult`], delegating retrieval to a [`DataSource`] and adding
//! nothing but shape validation and logging.
//!
//! Key behaviors
//! -------------
//! - [`Client::fetch`] is the one-call contract: identifier and shot in,
//!   result or [`FetchError`] out.
//! - [`Client::fetch_request`] accepts any source string and an optional
//!   per-request server override.
//! - Property and server accessors forward to the source unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - No retries, no caching, no fallbacks: every source failure surfaces
//!   immediately as a [`FetchError`].
//! - The client keeps no per-request state; it is `Send + Sync` whenever the
//!   source is, so callers may share one client between threads.
//! - Identifiers and experiment ids are not validated here. Empty identifiers
//!   and unusual shot numbers are passed through and the source decides.
use tracing::{info, warn};

#[cfg(feature = "native")]
use crate::config::{ClientConfig, ConfigResult};
use crate::config::ServerAddress;
#[cfg(feature = "native")]
use crate::source::NativeSource;
use crate::{
    signal::{FetchError, FetchResult, SignalResult},
    source::{DataSource, SignalRequest, SourceResult},
};

/// `Client` — stateless facade over a [`DataSource`].
#[derive(Debug)]
pub struct Client<S> {
    source: S,
}

impl<S> Client<S>
where
    S: DataSource,
{
    pub fn new(source: S) -> Self {
        Client { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Retrieve `signal` for experiment (shot) `experiment_id`.
    ///
    /// Returns
    /// -------
    /// `FetchResult<SignalResult>`
    ///   A result whose `dim()` has one entry per axis of `data()`.
    ///
    /// Errors
    /// ------
    /// - `FetchError::NotFound` if the pair does not resolve.
    /// - `FetchError::ConnectionError` if the source cannot be reached.
    /// - `FetchError::MalformedResponse` if the response is inconsistent.
    pub fn fetch(&self, signal: &str, experiment_id: u32) -> FetchResult<SignalResult> {
        self.fetch_request(&SignalRequest::shot(signal, experiment_id))
    }

    /// Retrieve the signal described by `request`.
    ///
    /// Any server override in `request` applies to this call only.
    pub fn fetch_request(&self, request: &SignalRequest) -> FetchResult<SignalResult> {
        info!(signal = request.signal(), source = request.source(), "reading signal");

        let raw = self.source.query(request).map_err(|err| {
            warn!(signal = request.signal(), source = request.source(), error = %err,
                "query failed");
            FetchError::from(err)
        })?;

        SignalResult::from_raw(request, raw).inspect_err(|err| {
            warn!(signal = request.signal(), source = request.source(), error = %err,
                "rejected response");
        })
    }

    pub fn set_property(&self, name: &str, enabled: bool) -> SourceResult<()> {
        self.source.set_property(name, enabled)
    }

    pub fn property(&self, name: &str) -> SourceResult<bool> {
        self.source.property(name)
    }

    pub fn set_server(&self, server: &ServerAddress) -> SourceResult<()> {
        info!(%server, "default server changed");
        self.source.set_server(server)
    }

    pub fn server(&self) -> SourceResult<ServerAddress> {
        self.source.server()
    }
}

#[cfg(feature = "native")]
impl Client<NativeSource> {
    /// Open the native IDAM client described by the environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::with_config(&ClientConfig::from_env()?)
    }

    pub fn with_config(config: &ClientConfig) -> ConfigResult<Self> {
        Ok(Client::new(NativeSource::load(config)?))
    }
}
