//! Analytic reconstruction of the neutrino momentum
//!
//! The momentum of the unobserved neutrino in a `t -> b l nu` decay is
//! constrained by requiring that the lepton-neutrino system reproduces the
//! W-boson mass and the lepton-neutrino-b system reproduces the top-quark
//! mass. The two constraints define an ellipse in the space of neutrino
//! three-momenta, following
//!
//! > B.A. Betchart, R. Demina, A. Harel,
//! > Nucl. Instrum. Meth. A736 (2014) 169, arXiv:1305.1878.
//!
//! Solutions on the ellipse are parameterized by an angle `t` through an
//! affine transform `H` applied to `T(t) = (cos t, sin t, 1)`. The solver
//! picks the unique solution whose transverse momentum is closest to the
//! measured missing pt, and reports that Euclidean distance as a measure of
//! compatibility.
//!
//! If the two mass constraints cannot be met simultaneously for the given
//! lepton and b-jet, no solution exists; this is a routine outcome reported
//! through [`SolveStatus::Infeasible`].

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Matrix3, Vector3};
use smallvec::SmallVec;

use crate::errors::SolverError;
use crate::event::MissingMomentum;
use crate::kinematics::{axis_rotation, Axis, FourMomentum};

/// Number of points in the grid scan that brackets minima of the loss
///
/// The loss function over the ellipse parameter has at most two local minima,
/// and this density is calibrated to always separate them.
pub const GRID_POINTS: usize = 100;

/// Width, in radians, below which a bisection bracket is considered converged
pub const BISECTION_TOLERANCE: f64 = 1e-8;

/// Outcome classification of one solver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A solution meeting both mass constraints was found
    Feasible,
    /// The two mass constraints are mutually inconsistent for this input
    Infeasible,
}

/// Reconstructed neutrino momentum and its compatibility with the measurement
#[derive(Debug, Clone, PartialEq)]
pub struct NuSolution {
    /// Neutrino three-momentum in lab coordinates; zero when infeasible
    pub momentum: Vector3<f64>,
    /// Euclidean distance between the solution's transverse momentum and the
    /// measured missing pt
    ///
    /// Very close to an exact match the squared distance can round to a small
    /// negative number; the sign is preserved (`-sqrt(-d2)`) so such cases
    /// remain identifiable. Infinite when infeasible.
    pub distance: f64,
    /// Ellipse parameter of the chosen solution;
    /// [`NeutrinoSolver::constraint_solution`] maps it back to `momentum`
    pub parameter: f64,
    /// Whether the mass constraints could be satisfied
    pub status: SolveStatus,
}

impl NuSolution {
    /// The infeasible outcome: zero momentum, infinite distance
    pub fn infeasible() -> Self {
        Self {
            momentum: Vector3::zeros(),
            distance: f64::INFINITY,
            parameter: 0.0,
            status: SolveStatus::Infeasible,
        }
    }

    /// Whether the mass constraints could be satisfied
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.status == SolveStatus::Feasible
    }

    /// Massless four-momentum of the reconstructed neutrino
    pub fn p4(&self) -> FourMomentum {
        FourMomentum::new(self.momentum, self.momentum.norm())
    }
}

/// Solver for the neutrino momentum under two mass constraints
///
/// The target masses are set at construction and can be changed with
/// [`NeutrinoSolver::set_masses`]; nothing else persists between calls
/// except scratch matrices reused to avoid re-deriving the most recent
/// solution ellipse. Methods take `&mut self`, so a solver instance cannot
/// be shared between threads without synchronization; give each worker its
/// own instance.
#[derive(Debug, Clone)]
pub struct NeutrinoSolver {
    /// Squared target mass of the lepton-neutrino-b system
    mass_top2: f64,
    /// Squared target mass of the lepton-neutrino system
    mass_w2: f64,

    /// Transform from the ellipse parametrization `T(t) = (cos t, sin t, 1)`
    /// to the neutrino momentum in lab coordinates; valid after the most
    /// recent feasible solve
    h: Matrix3<f64>,
    /// Quadratic form whose value `T'XT` is the squared transverse distance
    /// to the measured missing pt
    x_form: Matrix3<f64>,
    /// Quadratic form whose value `T'MT` is the derivative of `T'XT` with
    /// respect to the ellipse parameter
    m_form: Matrix3<f64>,
}

impl NeutrinoSolver {
    /// Create a solver with target masses for the two constraints
    ///
    /// # Arguments
    /// * `mass_top` - Target mass of the lepton-neutrino-b system (GeV)
    /// * `mass_w` - Target mass of the lepton-neutrino system (GeV)
    pub fn new(mass_top: f64, mass_w: f64) -> Self {
        let mut solver = Self {
            mass_top2: 0.0,
            mass_w2: 0.0,
            h: Matrix3::zeros(),
            x_form: Matrix3::zeros(),
            m_form: Matrix3::zeros(),
        };

        solver.set_masses(mass_top, mass_w);
        solver
    }

    /// Change the target masses; no other state is affected
    pub fn set_masses(&mut self, mass_top: f64, mass_w: f64) {
        self.mass_top2 = mass_top * mass_top;
        self.mass_w2 = mass_w * mass_w;
    }

    /// Reconstruct the neutrino momentum
    ///
    /// # Arguments
    /// * `lepton` - Four-momentum of the charged lepton
    /// * `b_jet` - Four-momentum of the jet assigned to the same top decay
    /// * `missing` - Measured missing transverse momentum
    ///
    /// # Returns
    /// The best-fit solution, or [`SolverError::MinimizationFailed`] if the
    /// minimum of the loss function cannot be bracketed, which only happens
    /// for NaN or otherwise non-physical inputs.
    pub fn solve(
        &mut self,
        lepton: &FourMomentum,
        b_jet: &FourMomentum,
        missing: &MissingMomentum,
    ) -> Result<NuSolution, SolverError> {
        if !self.solve_mass_constraints(lepton, b_jet) {
            return Ok(NuSolution::infeasible());
        }

        // Measured missing pt in matrix form. The third column matches the
        // constant component of T; the longitudinal component is unmeasured.
        let mut v0 = Matrix3::zeros();
        v0[(0, 2)] = missing.px();
        v0[(1, 2)] = missing.py();

        // Weights of the residual components. Zero weight removes the
        // unmeasured longitudinal component, so T'XT reduces to the squared
        // Euclidean distance between the transverse momenta.
        let mut sigma = Matrix3::identity();
        sigma[(2, 2)] = 0.0;

        let lambda = v0 - self.h;
        self.x_form = lambda.transpose() * sigma * lambda;

        // d/dt T = D T for the circle parametrization, hence
        // d/dt (T'XT) = T'MT with M = XD + (XD)'.
        let mut d = Matrix3::zeros();
        d[(0, 1)] = -1.0;
        d[(1, 0)] = 1.0;

        let xd = self.x_form * d;
        self.m_form = xd + xd.transpose();

        let (parameter, min_value) = self.minimize()?;

        let momentum = self.h * parameter_point(parameter);

        let distance = if min_value >= 0.0 {
            min_value.sqrt()
        } else {
            // Rounding can push an exact zero slightly negative. Preserve the
            // sign so the caller can tell this apart from a true positive
            // distance.
            -(-min_value).sqrt()
        };

        Ok(NuSolution {
            momentum,
            distance,
            parameter,
            status: SolveStatus::Feasible,
        })
    }

    /// Neutrino momentum on the constraint ellipse at parameter `t`
    ///
    /// Evaluates `H T(t)` for the transform built by the most recent solve.
    /// Meaningful only after a solve that returned a feasible solution; for
    /// that solve's reported parameter it reproduces the reported momentum
    /// exactly.
    pub fn constraint_solution(&self, t: f64) -> Vector3<f64> {
        self.h * parameter_point(t)
    }

    /// Squared transverse distance to the measured missing pt at parameter `t`
    #[inline]
    fn loss(&self, t: f64) -> f64 {
        quadratic_form(&self.x_form, t)
    }

    /// Derivative of the loss with respect to the parameter
    #[inline]
    fn loss_derivative(&self, t: f64) -> f64 {
        quadratic_form(&self.m_form, t)
    }

    /// Find the parameter minimizing the loss over `[0, 2 pi)`
    ///
    /// Two-phase search: a grid scan brackets every interval where the loss
    /// derivative flips from negative to positive (at most two, by the
    /// geometry of the quadratic form), then bisection on the derivative
    /// refines each bracket. Returns the refined global minimum as
    /// `(parameter, loss value)`.
    fn minimize(&self) -> Result<(f64, f64), SolverError> {
        let step = 2.0 * PI / GRID_POINTS as f64;

        let mut prev_derivative = self.loss_derivative(0.0);

        // Centres of the bracketing intervals. At most two, so no heap.
        let mut brackets: SmallVec<[f64; 2]> = SmallVec::new();

        // Scan wraps through 2 pi so every consecutive pair is covered.
        let mut t = step;

        for _ in 1..=GRID_POINTS {
            let derivative = self.loss_derivative(t);

            if prev_derivative < 0.0 && derivative > 0.0 {
                brackets.push(t - 0.5 * step);

                if brackets.len() == 2 {
                    break;
                }
            }

            prev_derivative = derivative;
            t += step;
        }

        if brackets.is_empty() {
            return Err(SolverError::MinimizationFailed {
                description: "no sign change of the loss derivative found in the grid scan"
                    .to_string(),
            });
        }

        let mut best_parameter = 0.0;
        let mut best_value = f64::INFINITY;

        for &centre in &brackets {
            let mut lo = centre - 0.5 * step;
            let mut hi = centre + 0.5 * step;

            while hi - lo > BISECTION_TOLERANCE {
                let mid = 0.5 * (lo + hi);

                if self.loss_derivative(mid) > 0.0 {
                    // The loss is growing at mid, so the minimum is to the left
                    hi = mid;
                } else {
                    lo = mid;
                }
            }

            let refined = 0.5 * (lo + hi);
            let value = self.loss(refined);

            if value < best_value {
                best_value = value;
                best_parameter = refined;
            }
        }

        Ok((best_parameter, best_value))
    }

    /// Build the transform `H` from the two mass constraints
    ///
    /// Returns false when the discriminant is negative, meaning the
    /// constraints cannot be met simultaneously for this lepton/b-jet pair.
    fn solve_mass_constraints(&mut self, lepton: &FourMomentum, b_jet: &FourMomentum) -> bool {
        // Opening angle between the lepton and b-jet momenta
        let cos = lepton.cos_angle(b_jet);
        let sin = (1.0 - cos * cos).sqrt();

        // Mass-shell offsets of the two constraints
        let x0p = -(self.mass_top2 - self.mass_w2 - b_jet.mass2()) / (2.0 * b_jet.energy());
        let x0 = -(self.mass_w2 - lepton.mass2()) / (2.0 * lepton.energy());

        let beta_lep = lepton.beta();
        let beta_b = b_jet.beta();
        let gamma_inv2 = 1.0 - beta_lep * beta_lep;

        let epsilon2 = self.mass_w2 * gamma_inv2;

        let sx = (x0 * beta_lep - lepton.p() * gamma_inv2) / (beta_lep * beta_lep);
        let sy = (x0p / beta_b - cos * sx) / sin;

        let omega = (beta_lep / beta_b - cos) / sin;
        let omega2 = omega * omega + gamma_inv2;

        let shift = (sx + omega * sy) / omega2;
        let x1 = sx - shift;
        let y1 = sy - shift * omega;

        // Discriminant of the constraint intersection
        let z2 = x1 * x1 * omega2 - (sy - omega * sx).powi(2) - (self.mass_w2 - x0 * x0 - epsilon2);

        if z2 < 0.0 {
            return false;
        }

        let z = z2.sqrt();

        // Ellipse in the frame aligned with the lepton momentum
        let mut h_tilde = Matrix3::zeros();
        h_tilde[(0, 0)] = z / omega2.sqrt();
        h_tilde[(0, 2)] = x1 - lepton.p();
        h_tilde[(1, 0)] = omega * z / omega2.sqrt();
        h_tilde[(1, 2)] = y1;
        h_tilde[(2, 1)] = z;

        // Rotation taking the lab frame into that canonical frame: align the
        // lepton with the x axis, then bring the b jet into the x-y plane.
        let rz = axis_rotation(Axis::Z, -lepton.phi());
        let ry = axis_rotation(Axis::Y, FRAC_PI_2 - lepton.theta());

        let b_rotated = ry * rz * b_jet.momentum();
        let rx = axis_rotation(Axis::X, -b_rotated[2].atan2(b_rotated[1]));

        let rotation = (rx * ry * rz).transpose();

        self.h = rotation * h_tilde;
        true
    }
}

/// The circle parametrization `T(t) = (cos t, sin t, 1)`
#[inline]
fn parameter_point(t: f64) -> Vector3<f64> {
    Vector3::new(t.cos(), t.sin(), 1.0)
}

/// Value of the quadratic form `T(t)' M T(t)`
#[inline]
fn quadratic_form(m: &Matrix3<f64>, t: f64) -> f64 {
    let point = parameter_point(t);
    point.dot(&(m * point))
}
