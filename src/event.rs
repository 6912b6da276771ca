//! Per-event inputs supplied by the event reader
//!
//! The reconstruction consumes a jet collection, a charged-lepton
//! four-momentum, and the measured missing transverse momentum. All of these
//! are rebuilt by the reader for every event and are immutable afterwards.

use nalgebra::Vector2;

use crate::kinematics::FourMomentum;

/// A reconstructed jet with its b-tagging decision
///
/// Jet collections handed to the reconstruction are expected to be ordered in
/// decreasing transverse momentum. The engine relies on this ordering to
/// terminate its kinematic pre-selection early and to enumerate light-jet
/// pairs without duplicates; it does not re-sort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet {
    p4: FourMomentum,
    b_tagged: bool,
}

impl Jet {
    /// Create a jet from its four-momentum and b-tag flag
    pub fn new(p4: FourMomentum, b_tagged: bool) -> Self {
        Self { p4, b_tagged }
    }

    /// Four-momentum of the jet
    #[inline]
    pub fn p4(&self) -> &FourMomentum {
        &self.p4
    }

    /// Whether the jet is tagged as originating from a b quark
    #[inline]
    pub fn is_b_tagged(&self) -> bool {
        self.b_tagged
    }
}

/// Measured missing transverse momentum
///
/// Only the two transverse components are measured; the longitudinal
/// component of the invisible particle is not constrained by this input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingMomentum {
    px: f64,
    py: f64,
}

impl MissingMomentum {
    /// Create from Cartesian transverse components
    pub fn from_xy(px: f64, py: f64) -> Self {
        Self { px, py }
    }

    /// Create from a magnitude and an azimuthal angle
    pub fn from_magnitude_phi(magnitude: f64, phi: f64) -> Self {
        Self {
            px: magnitude * phi.cos(),
            py: magnitude * phi.sin(),
        }
    }

    /// x component
    #[inline]
    pub fn px(&self) -> f64 {
        self.px
    }

    /// y component
    #[inline]
    pub fn py(&self) -> f64 {
        self.py
    }

    /// Transverse vector (px, py)
    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        Vector2::new(self.px, self.py)
    }

    /// Magnitude of the missing transverse momentum
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuthal angle
    #[inline]
    pub fn phi(&self) -> f64 {
        self.py.atan2(self.px)
    }
}
