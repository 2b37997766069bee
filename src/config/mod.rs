//! config — server addresses and client configuration.
//!
//! Purpose
//! -------
//! Describe where the IDAM server lives and where the IDAM client library is
//! installed, without hardcoding either. Values come from the environment or
//! from explicit builder calls.
//!
//! Key behaviors
//! -------------
//! - [`ServerAddress`] is a complete host/port pair; it defaults to the MAST
//!   data server.
//! - [`ServerOverride`] is a partial host/port pair applied to one request
//!   only.
//! - [`ClientConfig::from_env`] reads `IDAM_HOST`, `IDAM_PORT` and
//!   `IDAM_LIBRARY`; [`ClientConfig::from_lookup`] does the same from any
//!   key/value lookup so the parsing can be tested without touching the
//!   process environment.
//!
//! Invariants & assumptions
//! ------------------------
//! - Hosts are non-empty and ports are in `1..=65535`.
//! - A missing variable keeps the default; a present but invalid one is an
//!   error rather than being ignored.

pub mod errors;

use std::path::{Path, PathBuf};

pub use self::errors::{ConfigError, ConfigResult};

/// Host of the MAST IDAM data server.
pub const DEFAULT_HOST: &str = "mast.fusion.org.uk";
/// Port of the MAST IDAM data server.
pub const DEFAULT_PORT: u16 = 56565;

/// Environment variable naming the IDAM server host.
pub const ENV_HOST: &str = "IDAM_HOST";
/// Environment variable naming the IDAM server port.
pub const ENV_PORT: &str = "IDAM_PORT";
/// Environment variable naming the IDAM client shared library.
pub const ENV_LIBRARY: &str = "IDAM_LIBRARY";

/// A complete IDAM server address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> ConfigResult<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if port == 0 {
            return Err(ConfigError::InvalidPort { value: port.to_string() });
        }
        Ok(ServerAddress { host, port })
    }

    /// Address obtained by applying `over` on top of `self`.
    pub fn with_override(&self, over: &ServerOverride) -> ServerAddress {
        ServerAddress {
            host: over.host.clone().unwrap_or_else(|| self.host.clone()),
            port: over.port.unwrap_or(self.port),
        }
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        ServerAddress { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT }
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Per-request host and/or port replacing the client's server for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ServerOverride {
    host: Option<String>,
    port: Option<u16>,
}

impl ServerOverride {
    pub fn new(host: Option<String>, port: Option<u16>) -> ConfigResult<Self> {
        if matches!(&host, Some(h) if h.trim().is_empty()) {
            return Err(ConfigError::EmptyHost);
        }
        if port == Some(0) {
            return Err(ConfigError::InvalidPort { value: "0".into() });
        }
        Ok(ServerOverride { host, port })
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.port.is_none()
    }
}

/// `ClientConfig` — everything needed to open a native IDAM client.
///
/// Fields
/// ------
/// - `server`: default server for requests without an override.
/// - `library`: path of the IDAM client shared library (`libidam.so`);
///   required by the native source only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    server: ServerAddress,
    library: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(server: ServerAddress) -> Self {
        ClientConfig { server, library: None }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration from an arbitrary lookup.
    ///
    /// Errors
    /// ------
    /// - `ConfigError::EmptyHost` if `IDAM_HOST` is set but blank.
    /// - `ConfigError::InvalidPort` if `IDAM_PORT` is not in `1..=65535`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup(ENV_PORT) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };
        let library = lookup(ENV_LIBRARY).filter(|p| !p.trim().is_empty()).map(PathBuf::from);

        Ok(ClientConfig { server: ServerAddress::new(host, port)?, library })
    }

    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    pub fn with_server(mut self, server: ServerAddress) -> Self {
        self.server = server;
        self
    }

    pub fn server(&self) -> &ServerAddress {
        &self.server
    }

    pub fn library(&self) -> Option<&Path> {
        self.library.as_deref()
    }
}

fn parse_port(raw: &str) -> ConfigResult<u16> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort { value: raw.to_owned() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Defaults and parsing in `ClientConfig::from_lookup`.
    // - Validation in `ServerAddress::new` and `ServerOverride::new`.
    // - Override application.
    //
    // They intentionally DO NOT cover:
    // - `from_env`, which only forwards to `from_lookup`.
    // -------------------------------------------------------------------------

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    // Purpose
    // -------
    // An empty environment yields the MAST server and no library.
    fn from_lookup_uses_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server(), &ServerAddress::default());
        assert_eq!(config.server().to_string(), "mast.fusion.org.uk:56565");
        assert!(config.library().is_none());
    }

    #[test]
    // Purpose
    // -------
    // All three variables are honored.
    fn from_lookup_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_HOST, "idam1.example.org"),
            (ENV_PORT, " 56566 "),
            (ENV_LIBRARY, "/opt/idam/lib/libidam.so"),
        ]))
        .unwrap();

        assert_eq!(config.server(), &ServerAddress::new("idam1.example.org", 56566).unwrap());
        assert_eq!(config.library(), Some(Path::new("/opt/idam/lib/libidam.so")));
    }

    #[test]
    // Purpose
    // -------
    // Invalid values are reported instead of silently replaced.
    //
    // Expect
    // ------
    // - Non-numeric, zero and out-of-range ports give `InvalidPort`.
    // - A blank host gives `EmptyHost`.
    fn from_lookup_rejects_invalid_values() {
        for bad in ["abc", "0", "70000"] {
            let err = ClientConfig::from_lookup(lookup_from(&[(ENV_PORT, bad)])).unwrap_err();
            assert_eq!(err, ConfigError::InvalidPort { value: bad.into() });
        }
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_HOST, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyHost);
    }

    #[test]
    // Purpose
    // -------
    // Overrides replace only the parts they carry.
    fn with_override_replaces_given_parts() {
        let base = ServerAddress::default();
        let port_only = ServerOverride::new(None, Some(1234)).unwrap();
        let host_only = ServerOverride::new(Some("localhost".into()), None).unwrap();

        assert_eq!(base.with_override(&port_only), ServerAddress::new(DEFAULT_HOST, 1234).unwrap());
        assert_eq!(
            base.with_override(&host_only),
            ServerAddress::new("localhost", DEFAULT_PORT).unwrap()
        );
        assert_eq!(base.with_override(&ServerOverride::default()), base);
        assert!(ServerOverride::default().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Overrides reject the same invalid values as full addresses.
    fn server_override_new_validates() {
        assert_eq!(ServerOverride::new(Some(String::new()), None), Err(ConfigError::EmptyHost));
        assert_eq!(
            ServerOverride::new(None, Some(0)),
            Err(ConfigError::InvalidPort { value: "0".into() })
        );
    }
}
