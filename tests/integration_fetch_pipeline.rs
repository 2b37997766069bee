//! Integration tests for the data-access facade.
//!
//! Purpose
//! -------
//! - Validate the end-to-end fetch path: from a native-order response served
//!   by the stub source, through validation and axis normalization, to the
//!   `SignalResult` a plotting caller consumes.
//! - Exercise realistic diagnostic shapes (a 1-D plasma-current trace and a
//!   3-D flux equilibrium) rather than toy arrays only.
//!
//! Coverage
//! --------
//! - `client::Client`:
//!   - `fetch` success, `NotFound`, `ConnectionError`, `MalformedResponse`.
//!   - Idempotence of repeated fetches.
//! - `signal::SignalResult`:
//!   - Shape invariants for arbitrary consistent responses (property test).
//!   - Time axis, labels and slicing for contour-style consumers.
//!
//! Exclusions
//! ----------
//! - The native IDAM source and Python bindings, which need a real IDAM
//!   installation.
//! - Individual validation branches, covered by unit tests.
use approx::assert_relative_eq;
use idam::{
    Client, FetchError, FetchErrorKind, ShapeMismatch, StubSource,
    source::{RawDimension, RawErrors, RawSignal},
};
use proptest::prelude::*;

/// Purpose
/// -------
/// Build a plasma-current trace: 5 samples on a single time axis, with
/// symmetric error bars.
fn plasma_current() -> RawSignal {
    let time = vec![0.0, 0.05, 0.1, 0.15, 0.2];
    let current = vec![0.0, 310.5, 620.0, 640.2, 655.9];
    RawSignal::new("Plasma Current", "kA", current, vec![RawDimension::new("Time", "s", time)])
        .with_description("Rogowski coil plasma current")
        .with_errors(RawErrors::symmetric(vec![5.0; 5]))
}

/// Purpose
/// -------
/// Build a flux equilibrium in IDAM's native order: R (4 points, fastest),
/// Z (3 points), Time (2 points), with time flagged as native axis 2.
///
/// Returns
/// -------
/// - A consistent response whose exposed shape is `[2, 3, 4]`
///   (time, z, r) and whose values equal their flat native index.
fn flux_equilibrium() -> RawSignal {
    let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
    RawSignal::new(
        "Poloidal Flux",
        "Wb",
        data,
        vec![
            RawDimension::new("R", "m", vec![0.2, 0.6, 1.0, 1.4]),
            RawDimension::new("Z", "m", vec![-1.0, 0.0, 1.0]),
            RawDimension::new("Time", "s", vec![0.25, 0.30]),
        ],
    )
    .with_time_order(Some(2))
}

fn make_client() -> Client<StubSource> {
    Client::new(
        StubSource::new()
            .with_shot("amc_plasma current", 15100, plasma_current())
            .with_shot("efm_psi(r,z)", 23320, flux_equilibrium()),
    )
}

#[test]
// Purpose
// -------
// A plasma-current trace comes back as a 1-D signal over time with labels
// suitable for axis display.
fn plasma_current_trace_is_one_dimensional() {
    let client = make_client();

    let d = client.fetch("amc_plasma current", 15100).unwrap();

    assert_eq!(d.dim().len(), 1);
    assert_eq!(d.ndim(), 1);
    assert_eq!(d.dim()[0].data().len(), d.shape()[0]);
    assert!(!d.label().is_empty());
    assert!(!d.dim()[0].label().is_empty());
    assert_eq!(d.time(), Some(d.dim()[0].data()));
    assert_eq!(d.description(), "Rogowski coil plasma current");
    assert_relative_eq!(d.errors().unwrap().high()[[3]], 5.0);
}

#[test]
// Purpose
// -------
// A flux equilibrium comes back as a 3-D signal whose time slices are 2-D
// maps over (z, r).
//
// Expect
// ------
// - Shape `[2, 3, 4]` with axes Time, Z, R.
// - `slice(0, 1)` is a `[3, 4]` map whose entries are `12 + 4 z + r`.
fn flux_equilibrium_slices_into_contour_maps() {
    let client = make_client();

    let psi = client.fetch("efm_psi(r,z)", 23320).unwrap();

    assert_eq!(psi.dim().len(), 3);
    assert_eq!(psi.shape(), &[2, 3, 4]);
    assert_eq!(psi.dim()[0].label(), "Time");
    assert_eq!(psi.dim()[2].label(), "R");
    assert_eq!(psi.order(), Some(0));

    let map = psi.slice(0, 1).unwrap();
    assert_eq!(map.shape(), &[3, 4]);
    assert_relative_eq!(map[[2, 3]], 12.0 + 8.0 + 3.0);
    assert_eq!(map.shape()[0], psi.dim()[1].len());
    assert_eq!(map.shape()[1], psi.dim()[2].len());
}

#[test]
// Purpose
// -------
// Unknown pairs, empty identifiers and shot 0 are all reported by the source
// as `NotFound`; no partial result is produced.
fn unresolved_requests_are_not_found() {
    let client = make_client();

    for (signal, shot) in [("amc_plasma current", 15101), ("", 15100), ("amc_plasma current", 0)] {
        let err = client.fetch(signal, shot).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::NotFound, "{signal:?} / {shot}");
    }
}

#[test]
// Purpose
// -------
// A transport fault surfaces as `ConnectionError`, even for known pairs.
fn transport_fault_is_connection_error() {
    let client = Client::new(
        StubSource::new()
            .with_shot("amc_plasma current", 15100, plasma_current())
            .with_transport_fault("connection refused"),
    );

    let err = client.fetch("amc_plasma current", 15100).unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::ConnectionError);
    assert!(err.to_string().contains("connection refused"));
}

#[test]
// Purpose
// -------
// Declared dimension lengths that disagree with the data shape surface as
// `MalformedResponse`.
fn inconsistent_dimensions_are_malformed() {
    let mut raw = flux_equilibrium();
    raw.dims[0] = RawDimension::new("R", "m", vec![0.2, 0.6, 1.0]);
    let client = Client::new(StubSource::new().with_shot("efm_psi(r,z)", 23320, raw));

    let err = client.fetch("efm_psi(r,z)", 23320).unwrap_err();

    assert_eq!(
        err,
        FetchError::MalformedResponse {
            signal: "efm_psi(r,z)".into(),
            source: "23320".into(),
            reason: ShapeMismatch::DataLength { expected: 18, actual: 24 },
        }
    );
}

#[test]
// Purpose
// -------
// Declared axis lengths whose product cannot be addressed are rejected as a
// malformed response rather than aborting the fetch.
//
// Given
// -----
// - Five axes of 8192 points each and a 16-value buffer.
//
// Expect
// ------
// - `MalformedResponse` with `ShapeMismatch::ShapeOverflow`.
fn overflowing_dimensions_are_malformed() {
    let dims = (0..5).map(|i| RawDimension::new(format!("x{i}"), "m", vec![0.0; 8192])).collect();
    let raw = RawSignal::new("Huge", "V", vec![0.0; 16], dims);
    let client = Client::new(StubSource::new().with_shot("sig", 1, raw));

    let err = client.fetch("sig", 1).unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    assert!(matches!(
        err,
        FetchError::MalformedResponse { reason: ShapeMismatch::ShapeOverflow { .. }, .. }
    ));
}

#[test]
// Purpose
// -------
// Repeated fetches against an unchanged source return equal results.
fn repeated_fetches_are_equal() {
    let client = make_client();

    let first = client.fetch("efm_psi(r,z)", 23320).unwrap();
    let second = client.fetch("efm_psi(r,z)", 23320).unwrap();

    assert_eq!(first, second);
}

/// Purpose
/// -------
/// Generate a consistent native-order response of rank 1 to 4, each axis with
/// 1 to 5 points, and a time order that may or may not be in range.
fn consistent_response() -> impl Strategy<Value = RawSignal> {
    (prop::collection::vec(1usize..=5, 1..=4), prop::option::of(0usize..6)).prop_map(
        |(lens, order)| {
            let total: usize = lens.iter().product();
            let dims = lens
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    RawDimension::new(format!("axis{i}"), "m", (0..n).map(|v| v as f32).collect())
                })
                .collect();
            RawSignal::new("Signal", "V", (0..total).map(|v| v as f32).collect(), dims)
                .with_time_order(order)
        },
    )
}

proptest! {
    #[test]
    // Purpose
    // -------
    // For every consistent response, the fetched result has one dimension per
    // data axis and each dimension's length matches the data extent.
    fn fetched_results_satisfy_shape_invariants(
        raw in consistent_response(),
        shot in 0u32..100_000,
    ) {
        let rank = raw.rank;
        let client = Client::new(StubSource::new().with_shot("sig", shot, raw));

        let result = client.fetch("sig", shot).unwrap();

        prop_assert_eq!(result.dim().len(), result.data().ndim());
        prop_assert_eq!(result.ndim(), rank);
        for (axis, dim) in result.dim().iter().enumerate() {
            prop_assert_eq!(dim.data().len(), result.shape()[axis]);
        }
        if let Some(order) = result.order() {
            prop_assert!(order < rank);
        }
    }
}
