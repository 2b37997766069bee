//! source — collaborators that actually retrieve signals.
//!
//! Purpose
//! -------
//! Isolate everything that talks to the external data-access library behind
//! the [`DataSource`] trait, so the facade only sees raw responses and
//! [`SourceError`]s.
//!
//! Key behaviors
//! -------------
//! - [`traits`] defines [`DataSource`] and the [`SignalRequest`] passed to it.
//! - [`raw`] holds the unvalidated, native-order response types.
//! - [`stub`] provides a table-driven in-memory source.
//! - [`native`] (feature `native`) opens the IDAM client library at run time.
//!
//! Invariants & assumptions
//! ------------------------
//! - Sources return responses exactly as the backend reports them; shape
//!   validation is the facade's job.
//! - Sources perform no retries and keep no cache.

pub mod errors;
#[cfg(feature = "native")]
pub mod native;
pub mod raw;
pub mod stub;
pub mod traits;

#[cfg(feature = "native")]
pub use self::native::NativeSource;
pub use self::{
    errors::{SourceError, SourceResult},
    raw::{RawDimension, RawErrors, RawSignal},
    stub::{StubCall, StubSource},
    traits::{DataSource, SignalRequest},
};
