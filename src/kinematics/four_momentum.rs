//! Relativistic four-momentum
//!
//! The four components are the only stored state; transverse momentum,
//! pseudorapidity, azimuth, and invariant mass are always computed from them
//! so the derived quantities cannot drift out of sync.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use nalgebra::{Vector2, Vector3};

/// Energy-momentum four-vector
///
/// Momenta and energies are in GeV throughout. The struct is `Copy`; summing
/// four-momenta builds composite systems (dijet, top-quark candidates) whose
/// invariant mass is read off with [`FourMomentum::mass`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourMomentum {
    /// Spatial momentum (px, py, pz)
    momentum: Vector3<f64>,
    /// Energy
    energy: f64,
}

impl FourMomentum {
    /// Create a four-momentum from a spatial momentum and an energy
    pub fn new(momentum: Vector3<f64>, energy: f64) -> Self {
        Self { momentum, energy }
    }

    /// Create a four-momentum from Cartesian components
    pub fn from_pxpypze(px: f64, py: f64, pz: f64, energy: f64) -> Self {
        Self::new(Vector3::new(px, py, pz), energy)
    }

    /// Create a four-momentum from collider coordinates and a mass
    ///
    /// # Arguments
    /// * `pt` - Transverse momentum (GeV)
    /// * `eta` - Pseudorapidity
    /// * `phi` - Azimuthal angle (rad)
    /// * `mass` - Invariant mass (GeV, non-negative)
    pub fn from_pt_eta_phi_mass(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let momentum = Vector3::new(pt * phi.cos(), pt * phi.sin(), pt * eta.sinh());
        let energy = (momentum.norm_squared() + mass * mass).sqrt();
        Self { momentum, energy }
    }

    /// x component of the momentum
    #[inline]
    pub fn px(&self) -> f64 {
        self.momentum.x
    }

    /// y component of the momentum
    #[inline]
    pub fn py(&self) -> f64 {
        self.momentum.y
    }

    /// z component of the momentum
    #[inline]
    pub fn pz(&self) -> f64 {
        self.momentum.z
    }

    /// Energy
    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Spatial momentum vector
    #[inline]
    pub fn momentum(&self) -> Vector3<f64> {
        self.momentum
    }

    /// Transverse momentum vector (px, py)
    #[inline]
    pub fn transverse(&self) -> Vector2<f64> {
        self.momentum.xy()
    }

    /// Magnitude of the spatial momentum
    #[inline]
    pub fn p(&self) -> f64 {
        self.momentum.norm()
    }

    /// Transverse momentum
    #[inline]
    pub fn pt(&self) -> f64 {
        self.momentum.xy().norm()
    }

    /// Azimuthal angle in (-pi, pi]
    #[inline]
    pub fn phi(&self) -> f64 {
        self.momentum.y.atan2(self.momentum.x)
    }

    /// Polar angle measured from the +z axis
    #[inline]
    pub fn theta(&self) -> f64 {
        self.pt().atan2(self.momentum.z)
    }

    /// Pseudorapidity, eta = asinh(pz / pt)
    #[inline]
    pub fn eta(&self) -> f64 {
        (self.momentum.z / self.pt()).asinh()
    }

    /// Squared invariant mass, E^2 - |p|^2
    ///
    /// Can be slightly negative for massless particles due to rounding.
    #[inline]
    pub fn mass2(&self) -> f64 {
        self.energy * self.energy - self.momentum.norm_squared()
    }

    /// Invariant mass
    ///
    /// A negative squared mass from rounding yields `-sqrt(-m2)`, preserving
    /// the sign for diagnostics.
    pub fn mass(&self) -> f64 {
        let m2 = self.mass2();
        if m2 >= 0.0 {
            m2.sqrt()
        } else {
            -(-m2).sqrt()
        }
    }

    /// Relativistic velocity, |p| / E
    #[inline]
    pub fn beta(&self) -> f64 {
        self.p() / self.energy
    }

    /// Cosine of the opening angle between the spatial momenta
    pub fn cos_angle(&self, other: &FourMomentum) -> f64 {
        self.momentum.dot(&other.momentum) / (self.p() * other.p())
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum {
            momentum: self.momentum + rhs.momentum,
            energy: self.energy + rhs.energy,
        }
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: FourMomentum) {
        self.momentum += rhs.momentum;
        self.energy += rhs.energy;
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> FourMomentum {
        iter.fold(
            FourMomentum::new(Vector3::zeros(), 0.0),
            |acc, p4| acc + p4,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_collider_coordinates_round_trip() {
        let p4 = FourMomentum::from_pt_eta_phi_mass(40.0, 1.2, -0.7, 4.7);

        assert!((p4.pt() - 40.0).abs() < TOL);
        assert!((p4.eta() - 1.2).abs() < TOL);
        assert!((p4.phi() + 0.7).abs() < TOL);
        assert!((p4.mass() - 4.7).abs() < 1e-8);
    }

    #[test]
    fn test_massless_particle() {
        let p4 = FourMomentum::from_pt_eta_phi_mass(25.0, 0.0, 0.5, 0.0);

        assert!((p4.energy() - p4.p()).abs() < TOL);
        assert!(p4.mass().abs() < 1e-6);
        assert!((p4.beta() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_invariant_mass_of_system() {
        // Back-to-back massless pair: invariant mass is twice the energy of one leg
        let a = FourMomentum::from_pxpypze(30.0, 0.0, 0.0, 30.0);
        let b = FourMomentum::from_pxpypze(-30.0, 0.0, 0.0, 30.0);

        let sum = a + b;
        assert!((sum.mass() - 60.0).abs() < TOL);
        assert!(sum.p() < TOL);
    }

    #[test]
    fn test_sum_iterator() {
        let parts = [
            FourMomentum::from_pt_eta_phi_mass(50.0, 0.3, 1.0, 0.0),
            FourMomentum::from_pt_eta_phi_mass(35.0, -0.8, -2.0, 0.0),
            FourMomentum::from_pt_eta_phi_mass(20.0, 1.5, 0.2, 0.0),
        ];

        let total: FourMomentum = parts.iter().copied().sum();
        let manual = parts[0] + parts[1] + parts[2];
        assert_eq!(total, manual);
    }

    #[test]
    fn test_cos_angle() {
        let a = FourMomentum::from_pxpypze(1.0, 0.0, 0.0, 1.0);
        let b = FourMomentum::from_pxpypze(0.0, 2.0, 0.0, 2.0);
        assert!(a.cos_angle(&b).abs() < TOL);

        let c = FourMomentum::from_pxpypze(3.0, 0.0, 0.0, 3.0);
        assert!((a.cos_angle(&c) - 1.0).abs() < TOL);
    }

    #[test]
    fn test_mass_sign_convention() {
        // Spacelike vector: |p| > E
        let p4 = FourMomentum::from_pxpypze(2.0, 0.0, 0.0, 1.0);
        assert!(p4.mass() < 0.0);
        assert!((p4.mass() + 3.0_f64.sqrt()).abs() < TOL);
    }
}
