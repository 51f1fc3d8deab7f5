//! Relative tolerance comparison.
//!
//! Price and amount checks accept a configurable relative deviation band.
//! Quantity reconciliation deliberately does NOT go through this module: it
//! is an exact-equality requirement (see `gr_resolve`).

/// Returns whether `observed` lies within `tolerance × |reference|` of
/// `reference`.
///
/// A zero reference matches only a zero observation; there is no band to
/// scale against.
#[must_use]
pub fn within_tolerance(observed: f64, reference: f64, tolerance: f64) -> bool {
    if reference == 0.0 {
        return observed == 0.0;
    }
    (observed - reference).abs() <= tolerance * reference.abs()
}

/// Relative deviation of `observed` from `reference`.
///
/// Used as a tie-break, so the zero-reference case must still order: a zero
/// observation deviates by 0.0, anything else by infinity.
#[must_use]
pub fn relative_deviation(observed: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return if observed == 0.0 { 0.0 } else { f64::INFINITY };
    }
    (observed - reference).abs() / reference.abs()
}
