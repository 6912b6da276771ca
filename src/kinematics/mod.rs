//! Shared kinematic primitives
//!
//! This module provides:
//! - [`four_momentum`] - Relativistic four-vectors and derived quantities
//! - [`rotation`] - Elementary rotations about the coordinate axes

pub mod four_momentum;
pub mod rotation;

pub use four_momentum::FourMomentum;
pub use rotation::{axis_rotation, Axis};
