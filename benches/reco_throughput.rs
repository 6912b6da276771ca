//! Criterion benchmark for per-event reconstruction throughput.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};

use ttreco::{
    FourMomentum, Jet, LikelihoodTables, MissingMomentum, TtbarReconstructor,
};

/// Flat densities keep every candidate alive, so the bench covers the full
/// combinatorial search
struct UniformTables;

impl LikelihoodTables for UniformTables {
    fn neutrino_distance_density(&self, _distance: f64) -> Option<f64> {
        Some(0.01)
    }

    fn hadronic_masses_density(&self, _m_top: f64, _m_w: f64) -> Option<f64> {
        Some(1e-4)
    }
}

fn synthetic_event() -> (Vec<Jet>, FourMomentum, MissingMomentum) {
    let kinematics = [
        (110.0, 0.4, 0.8, true),
        (95.0, -0.3, 2.5, true),
        (80.0, 1.1, -1.9, false),
        (60.0, -0.9, 0.3, false),
        (45.0, 0.7, -2.8, false),
        (30.0, -1.5, 1.4, false),
    ];

    let jets = kinematics
        .iter()
        .map(|&(pt, eta, phi, tag)| {
            Jet::new(FourMomentum::from_pt_eta_phi_mass(pt, eta, phi, 6.0), tag)
        })
        .collect();

    let lepton = FourMomentum::from_pt_eta_phi_mass(38.0, 0.1, -0.6, 0.0);
    let missing = MissingMomentum::from_xy(41.0, -17.0);

    (jets, lepton, missing)
}

fn bench_reconstruct(c: &mut Criterion) {
    let (jets, lepton, missing) = synthetic_event();
    let mut engine = TtbarReconstructor::new(UniformTables);
    engine.set_jet_selection(20.0, 2.4);

    c.bench_function("reconstruct_6jet_event", |b| {
        b.iter(|| engine.reconstruct(&jets, &lepton, &missing).unwrap())
    });
}

criterion_group!(benches, bench_reconstruct);
criterion_main!(benches);
