//! In-memory data source for tests and offline use.
//!
//! Purpose
//! -------
//! Stand in for the IDAM client with a fixed table of responses, so the facade
//! can be exercised without a server or a native library.
//!
//! Key behaviors
//! -------------
//! - Responses are keyed by `(signal, source)`; absent keys report
//!   `SourceError::NotFound`.
//! - [`StubSource::with_transport_fault`] makes every query report
//!   `SourceError::Unreachable`, mimicking a server that cannot be contacted.
//! - Every query is recorded together with the server it was effectively
//!   addressed to, so override handling can be inspected.
//! - Properties are stored case-insensitively, as IDAM does.
//!
//! Conventions
//! -----------
//! - Responses are returned as given; the stub never "fixes" malformed ones,
//!   which is what makes it useful for validation tests.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::ServerAddress;
use crate::source::{
    errors::{SourceError, SourceResult},
    raw::RawSignal,
    traits::{DataSource, SignalRequest},
};

/// One recorded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub request: SignalRequest,
    /// Server the query was addressed to after applying any override.
    pub server: ServerAddress,
}

#[derive(Debug, Default)]
struct StubState {
    server: ServerAddress,
    properties: HashMap<String, bool>,
    calls: Vec<StubCall>,
}

/// `StubSource` — table-driven [`DataSource`].
#[derive(Debug, Default)]
pub struct StubSource {
    signals: HashMap<(String, String), RawSignal>,
    fault: Option<String>,
    state: Mutex<StubState>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `raw` for `(signal, source)`.
    pub fn with_signal(
        mut self, signal: impl Into<String>, source: impl Into<String>, raw: RawSignal,
    ) -> Self {
        self.signals.insert((signal.into(), source.into()), raw);
        self
    }

    /// Serve `raw` for `signal` in experiment `experiment_id`.
    pub fn with_shot(self, signal: impl Into<String>, experiment_id: u32, raw: RawSignal) -> Self {
        self.with_signal(signal, experiment_id.to_string(), raw)
    }

    /// Fail every query as if the server could not be reached.
    pub fn with_transport_fault(mut self, message: impl Into<String>) -> Self {
        self.fault = Some(message.into());
        self
    }

    /// Queries received so far, oldest first.
    pub fn calls(&self) -> Vec<StubCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DataSource for StubSource {
    fn query(&self, request: &SignalRequest) -> SourceResult<RawSignal> {
        let mut state = self.state();
        let server = state.server.with_override(request.server_override());
        state.calls.push(StubCall { request: request.clone(), server: server.clone() });

        if let Some(message) = &self.fault {
            return Err(SourceError::Unreachable { message: format!("{server}: {message}") });
        }

        self.signals
            .get(&(request.signal().to_owned(), request.source().to_owned()))
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                signal: request.signal().to_owned(),
                source: request.source().to_owned(),
                message: "no such signal in stub".to_owned(),
            })
    }

    fn set_property(&self, name: &str, enabled: bool) -> SourceResult<()> {
        self.state().properties.insert(name.to_lowercase(), enabled);
        Ok(())
    }

    fn property(&self, name: &str) -> SourceResult<bool> {
        Ok(self.state().properties.get(&name.to_lowercase()).copied().unwrap_or(false))
    }

    fn set_server(&self, server: &ServerAddress) -> SourceResult<()> {
        self.state().server = server.clone();
        Ok(())
    }

    fn server(&self) -> SourceResult<ServerAddress> {
        Ok(self.state().server.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerOverride;
    use crate::source::raw::RawDimension;

    fn trace() -> RawSignal {
        let time = RawDimension::new("Time", "s", vec![0.0, 0.1]);
        RawSignal::new("Ip", "kA", vec![1.0, 2.0], vec![time])
    }

    #[test]
    // Purpose
    // -------
    // Known keys are served, unknown keys are `NotFound`, and every query is
    // recorded with its effective server.
    fn stub_serves_known_keys_and_records_calls() {
        let stub = StubSource::new().with_shot("amc_plasma current", 15100, trace());
        let over = ServerOverride::new(None, Some(1234)).unwrap();

        let hit = stub.query(&SignalRequest::shot("amc_plasma current", 15100));
        let miss = stub.query(&SignalRequest::shot("amc_plasma current", 15101).with_server(over));

        assert_eq!(hit, Ok(trace()));
        assert!(matches!(miss, Err(SourceError::NotFound { ref source, .. }) if source == "15101"));
        let calls = stub.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].server, ServerAddress::default());
        assert_eq!(calls[1].server.port, 1234);
        assert_eq!(stub.server().unwrap(), ServerAddress::default());
    }

    #[test]
    // Purpose
    // -------
    // A transport fault wins over a known key.
    fn stub_transport_fault_reports_unreachable() {
        let stub = StubSource::new()
            .with_shot("amc_plasma current", 15100, trace())
            .with_transport_fault("connection refused");

        let err = stub.query(&SignalRequest::shot("amc_plasma current", 15100)).unwrap_err();

        assert!(matches!(
            err,
            SourceError::Unreachable { ref message } if message.contains("connection refused")
        ));
    }

    #[test]
    // Purpose
    // -------
    // Properties are case-insensitive and default to false.
    fn stub_properties_round_trip_case_insensitively() {
        let stub = StubSource::new();

        stub.set_property("Verbose", true).unwrap();

        assert!(stub.property("verbose").unwrap());
        assert!(!stub.property("get_meta").unwrap());
        stub.set_property("VERBOSE", false).unwrap();
        assert!(!stub.property("verbose").unwrap());
    }
}
