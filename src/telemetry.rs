//! Telemetry helpers for applications embedding `idam`.
//!
//! The crate only emits `tracing` events under the `idam` target; installing
//! a subscriber is left to the host application unless it opts into
//! [`init_default_tracing`].

/// Filter used when `RUST_LOG` is unset: facade events at `info`, library
/// handle traffic hidden, everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,idam=info";

/// Installs a `tracing` subscriber for `idam` events when the `telemetry`
/// feature is enabled.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Targets are kept so facade (`idam::client`) and native-library
/// (`idam::source::native`) events can be told apart.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when the feature is disabled or a global subscriber was
/// already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
