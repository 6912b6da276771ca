/*!
# ttreco - Kinematic reconstruction of semileptonic ttbar events

Reconstructs the kinematics of pair-produced top quarks observed through one
charged lepton plus jets, where the neutrino escapes detection.

## Features

- Analytic neutrino reconstruction from the top-quark and W-boson mass
  constraints plus the measured missing transverse momentum
- Combinatorial assignment of jets to the four quarks of the
  `tt -> b l nu, b q q` final state, ranked by a two-part likelihood
- Histogram-backed reference densities with out-of-domain signalling

## Modules

- [`kinematics`] - Four-momenta and axis rotations
- [`event`] - Per-event inputs: jets and missing transverse momentum
- [`solver`] - The two-mass-constraint neutrino solver
- [`likelihood`] - Reference density tables used for ranking
- [`reco`] - The jet-assignment engine and its outcome types
- [`errors`] - Error types

## Example

```rust
use ttreco::{
    BinnedDensity1d, BinnedDensity2d, BinnedLikelihood, FourMomentum, Jet,
    MissingMomentum, TtbarReconstructor,
};

// Reference densities, normally loaded from a persisted calibration
let tables = BinnedLikelihood::new(
    BinnedDensity1d::from_counts(vec![0.0, 30.0, 150.0], vec![7.0, 3.0]).unwrap(),
    BinnedDensity2d::from_counts(
        vec![100.0, 180.0, 300.0],
        vec![40.0, 90.0, 160.0],
        vec![3.0, 1.0, 2.0, 1.0],
    )
    .unwrap(),
);

let mut engine = TtbarReconstructor::new(tables);
engine.set_jet_selection(20.0, 2.4);

// One event: pt-ordered jets with b-tag flags, a lepton, and missing pt
let jets = vec![
    Jet::new(FourMomentum::from_pt_eta_phi_mass(95.0, 0.3, 0.4, 8.0), true),
    Jet::new(FourMomentum::from_pt_eta_phi_mass(72.0, -0.6, 2.1, 7.0), true),
    Jet::new(FourMomentum::from_pt_eta_phi_mass(51.0, 1.1, -2.4, 5.0), false),
    Jet::new(FourMomentum::from_pt_eta_phi_mass(33.0, 0.9, -0.8, 4.0), false),
];
let lepton = FourMomentum::from_pt_eta_phi_mass(42.0, 0.1, 1.8, 0.0);
let missing = MissingMomentum::from_xy(24.0, -13.0);

let outcome = engine.reconstruct(&jets, &lepton, &missing).unwrap();

if let Some(assignment) = outcome.assignment() {
    println!(
        "rank {:.2}, hadronic top mass {:.1} GeV",
        assignment.rank,
        assignment.top_had_p4(&jets).mass(),
    );
}
```
*/

pub mod errors;
pub mod event;
pub mod kinematics;
pub mod likelihood;
pub mod reco;
pub mod solver;

// Core types
pub use event::{Jet, MissingMomentum};
pub use kinematics::FourMomentum;

// Neutrino solver
pub use solver::{NeutrinoSolver, NuSolution, SolveStatus};

// Likelihood tables
pub use likelihood::{BinnedDensity1d, BinnedDensity2d, BinnedLikelihood, LikelihoodTables};

// Assignment engine
pub use reco::{
    Assignment, DecayJet, JetSelection, RecoStatus, Reconstruction, TtbarReconstructor,
    DEFAULT_TOP_MASS, DEFAULT_W_MASS,
};

// Errors
pub use errors::{RecoError, SolverError, TableError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
