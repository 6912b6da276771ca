//! Reference likelihood densities for ranking jet assignments
//!
//! This module provides:
//! - [`LikelihoodTables`] - The lookup contract consumed by the engine
//! - [`binned`] - Histogram-backed densities loaded from persisted
//!   reference distributions
//!
//! The reference distributions themselves are produced by a separate
//! calibration step; this crate only normalizes and serves them.

pub mod binned;

pub use binned::{BinnedDensity1d, BinnedDensity2d, BinnedLikelihood};

/// Read-only density lookups used to rank candidate jet assignments
///
/// Both lookups return `None` when the argument falls outside the table's
/// domain. This is distinct from `Some(0.0)`, which means the density is
/// genuinely zero there: an out-of-domain candidate is discarded outright,
/// while a zero density produces a rank of negative infinity that simply
/// never wins.
///
/// Implementations are expected to be normalized so the integral over the
/// domain is 1, making log-densities from different tables comparable.
pub trait LikelihoodTables {
    /// Density over the neutrino-solution compatibility distance
    fn neutrino_distance_density(&self, distance: f64) -> Option<f64>;

    /// Joint density over the hadronic-side (top mass, W mass) plane
    fn hadronic_masses_density(&self, m_top: f64, m_w: f64) -> Option<f64>;
}

// Lookups take &self, so one table set can back several engines at once
// through shared references.
impl<T: LikelihoodTables + ?Sized> LikelihoodTables for &T {
    fn neutrino_distance_density(&self, distance: f64) -> Option<f64> {
        (**self).neutrino_distance_density(distance)
    }

    fn hadronic_masses_density(&self, m_top: f64, m_w: f64) -> Option<f64> {
        (**self).hadronic_masses_density(m_top, m_w)
    }
}
