//! Combinatorial assignment of jets to the ttbar decay products
//!
//! For every admissible way of matching four jets to the decay products of a
//! top-quark pair, the engine reconstructs the neutrino, evaluates the two
//! reference densities, and ranks the interpretation by their combined
//! log-likelihood. The highest-ranked interpretation wins.

use serde::Serialize;

use crate::errors::RecoError;
use crate::event::{Jet, MissingMomentum};
use crate::kinematics::FourMomentum;
use crate::likelihood::LikelihoodTables;
use crate::reco::types::{Assignment, Reconstruction};
use crate::solver::NeutrinoSolver;

/// Default target mass of the top quark (GeV), from the generator param_card
pub const DEFAULT_TOP_MASS: f64 = 173.0;

/// Default target mass of the W boson (GeV), from the generator param_card
pub const DEFAULT_W_MASS: f64 = 80.419002;

/// Kinematic selection applied to jets before the combinatorial search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JetSelection {
    /// Minimum transverse momentum (GeV)
    pub min_pt: f64,
    /// Maximum absolute pseudorapidity
    pub max_abs_eta: f64,
}

impl Default for JetSelection {
    /// No selection: every jet in the input collection is considered
    fn default() -> Self {
        Self {
            min_pt: 0.0,
            max_abs_eta: f64::INFINITY,
        }
    }
}

/// Jet-assignment engine for semileptonic ttbar events
///
/// Holds the neutrino solver, the reference likelihood tables, and the
/// configured jet selection. Nothing else survives between events; the
/// engine can process an arbitrary event stream sequentially. For
/// multi-event parallelism give each worker its own engine — the tables can
/// be shared behind a reference since lookups take `&self`.
#[derive(Debug, Clone)]
pub struct TtbarReconstructor<L> {
    tables: L,
    solver: NeutrinoSolver,
    selection: JetSelection,

    /// Indices of jets passing the selection; kept between events to avoid
    /// reallocation
    selected: Vec<usize>,
}

impl<L: LikelihoodTables> TtbarReconstructor<L> {
    /// Create an engine with default masses and no jet selection
    ///
    /// # Arguments
    /// * `tables` - Reference densities used to rank interpretations
    pub fn new(tables: L) -> Self {
        Self {
            tables,
            solver: NeutrinoSolver::new(DEFAULT_TOP_MASS, DEFAULT_W_MASS),
            selection: JetSelection::default(),
            selected: Vec::new(),
        }
    }

    /// Set the jet selection, consuming style
    pub fn with_jet_selection(mut self, selection: JetSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the kinematic selection applied to jets
    pub fn set_jet_selection(&mut self, min_pt: f64, max_abs_eta: f64) {
        self.selection = JetSelection { min_pt, max_abs_eta };
    }

    /// Change the target masses of the two constraints
    pub fn set_masses(&mut self, mass_top: f64, mass_w: f64) {
        self.solver.set_masses(mass_top, mass_w);
    }

    /// Currently configured jet selection
    #[inline]
    pub fn jet_selection(&self) -> JetSelection {
        self.selection
    }

    /// Reference likelihood tables
    #[inline]
    pub fn tables(&self) -> &L {
        &self.tables
    }

    /// Reconstruct one event
    ///
    /// `jets` must be ordered in decreasing transverse momentum. All ways of
    /// assigning four selected jets to the decay products are tried, with
    /// b-tagged jets required for the two b quarks; each candidate is scored
    /// by the combined log-likelihood of its neutrino compatibility distance
    /// and its hadronic-side masses, and the best-ranked candidate is
    /// returned. Ties keep the candidate found first.
    ///
    /// # Arguments
    /// * `jets` - Pt-ordered jet collection of the event
    /// * `lepton` - Four-momentum of the selected charged lepton
    /// * `missing` - Measured missing transverse momentum
    ///
    /// # Returns
    /// The per-event outcome, or an error if the neutrino solver hits its
    /// internal invariant violation (non-physical input).
    pub fn reconstruct(
        &mut self,
        jets: &[Jet],
        lepton: &FourMomentum,
        missing: &MissingMomentum,
    ) -> Result<Reconstruction, RecoError> {
        // Kinematic pre-selection. The collection is pt-ordered, so the
        // first jet below threshold ends the scan.
        self.selected.clear();

        for (index, jet) in jets.iter().enumerate() {
            if jet.p4().eta().abs() > self.selection.max_abs_eta {
                continue;
            }

            if jet.p4().pt() < self.selection.min_pt {
                break;
            }

            self.selected.push(index);
        }

        if self.selected.len() < 4 {
            return Ok(Reconstruction::InsufficientJets);
        }

        let n_selected = self.selected.len();

        let mut best_rank = f64::NEG_INFINITY;
        let mut best: Option<Assignment> = None;

        for ii_b_lep in 0..n_selected {
            let i_b_lep = self.selected[ii_b_lep];

            // Jets matched to b quarks must be b-tagged
            if !jets[i_b_lep].is_b_tagged() {
                continue;
            }

            // The neutrino solution and its density depend only on the
            // leptonic-side b jet, so both are evaluated once per candidate
            // here rather than inside the hadronic-side loops.
            let neutrino = self.solver.solve(lepton, jets[i_b_lep].p4(), missing)?;

            if !neutrino.is_feasible() {
                continue;
            }

            let Some(nu_density) = self.tables.neutrino_distance_density(neutrino.distance)
            else {
                continue;
            };

            let ll_nu = nu_density.ln();

            for ii_b_had in 0..n_selected {
                if ii_b_had == ii_b_lep {
                    continue;
                }

                let i_b_had = self.selected[ii_b_had];

                if !jets[i_b_had].is_b_tagged() {
                    continue;
                }

                for ii_q1 in 0..n_selected {
                    if ii_q1 == ii_b_lep || ii_q1 == ii_b_had {
                        continue;
                    }

                    // The subleading light jet comes after the leading one in
                    // the pt-ordered selection, so each unordered pair is
                    // evaluated once.
                    for ii_q2 in (ii_q1 + 1)..n_selected {
                        if ii_q2 == ii_b_lep || ii_q2 == ii_b_had {
                            continue;
                        }

                        let i_q1 = self.selected[ii_q1];
                        let i_q2 = self.selected[ii_q2];

                        let p4_w = *jets[i_q1].p4() + *jets[i_q2].p4();
                        let p4_top = p4_w + *jets[i_b_had].p4();

                        let Some(mass_density) = self
                            .tables
                            .hadronic_masses_density(p4_top.mass(), p4_w.mass())
                        else {
                            continue;
                        };

                        let rank = ll_nu + mass_density.ln();

                        if rank > best_rank {
                            best_rank = rank;
                            best = Some(Assignment {
                                b_top_lep: i_b_lep,
                                b_top_had: i_b_had,
                                q1_top_had: i_q1,
                                q2_top_had: i_q2,
                                rank,
                                neutrino: neutrino.clone(),
                            });
                        }
                    }
                }
            }
        }

        match best {
            Some(assignment) => Ok(Reconstruction::Reconstructed(assignment)),
            None => Ok(Reconstruction::NoViableAssignment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reco::types::RecoStatus;

    /// Tables that accept everything with a flat density
    struct UniformTables;

    impl LikelihoodTables for UniformTables {
        fn neutrino_distance_density(&self, _distance: f64) -> Option<f64> {
            Some(0.01)
        }

        fn hadronic_masses_density(&self, _m_top: f64, _m_w: f64) -> Option<f64> {
            Some(1e-4)
        }
    }

    /// Tables whose mass density is out of domain everywhere
    struct ClosedMassTables;

    impl LikelihoodTables for ClosedMassTables {
        fn neutrino_distance_density(&self, _distance: f64) -> Option<f64> {
            Some(0.01)
        }

        fn hadronic_masses_density(&self, _m_top: f64, _m_w: f64) -> Option<f64> {
            None
        }
    }

    fn jet(pt: f64, eta: f64, phi: f64, b_tagged: bool) -> Jet {
        Jet::new(FourMomentum::from_pt_eta_phi_mass(pt, eta, phi, 5.0), b_tagged)
    }

    fn event_inputs() -> (FourMomentum, MissingMomentum) {
        (
            FourMomentum::from_pt_eta_phi_mass(40.0, 0.2, 0.0, 0.0),
            MissingMomentum::from_xy(30.0, 10.0),
        )
    }

    #[test]
    fn test_too_few_jets() {
        let (lepton, missing) = event_inputs();
        let mut engine = TtbarReconstructor::new(UniformTables);

        let jets = vec![
            jet(80.0, 0.1, 1.0, true),
            jet(60.0, -0.4, 2.0, true),
            jet(45.0, 0.8, -1.5, false),
        ];

        let outcome = engine.reconstruct(&jets, &lepton, &missing).unwrap();
        assert_eq!(outcome, Reconstruction::InsufficientJets);
    }

    #[test]
    fn test_selection_thresholds_reduce_jets() {
        let (lepton, missing) = event_inputs();
        let mut engine = TtbarReconstructor::new(UniformTables);
        engine.set_jet_selection(50.0, 2.4);

        // Five jets, but one is too forward and the last one is too soft,
        // leaving three
        let jets = vec![
            jet(90.0, 0.1, 1.0, true),
            jet(70.0, 3.0, 2.0, true),
            jet(65.0, -0.4, -2.0, true),
            jet(55.0, 0.8, 0.5, false),
            jet(20.0, 0.2, -1.0, false),
        ];

        let outcome = engine.reconstruct(&jets, &lepton, &missing).unwrap();
        assert_eq!(outcome.status(), RecoStatus::InsufficientJets);
    }

    #[test]
    fn test_no_b_tags_means_no_assignment() {
        let (lepton, missing) = event_inputs();
        let mut engine = TtbarReconstructor::new(UniformTables);

        let jets = vec![
            jet(90.0, 0.1, 1.0, false),
            jet(70.0, -0.5, 2.0, false),
            jet(55.0, 0.8, -2.0, false),
            jet(40.0, 0.2, 0.5, false),
        ];

        let outcome = engine.reconstruct(&jets, &lepton, &missing).unwrap();
        assert_eq!(outcome, Reconstruction::NoViableAssignment);
    }

    #[test]
    fn test_out_of_domain_masses_discard_all_candidates() {
        let (lepton, missing) = event_inputs();
        let mut engine = TtbarReconstructor::new(ClosedMassTables);

        let jets = vec![
            jet(90.0, 0.1, 1.0, true),
            jet(70.0, -0.5, 2.0, true),
            jet(55.0, 0.8, -2.0, false),
            jet(40.0, 0.2, 0.5, false),
        ];

        let outcome = engine.reconstruct(&jets, &lepton, &missing).unwrap();
        assert_eq!(outcome, Reconstruction::NoViableAssignment);
    }

    #[test]
    fn test_unique_combination_is_selected() {
        let (lepton, missing) = event_inputs();
        let mut engine = TtbarReconstructor::new(UniformTables);

        // Exactly two tagged and two untagged jets: the only freedom is which
        // tagged jet goes on the leptonic side, and both choices build the
        // same light-jet pair
        let jets = vec![
            jet(90.0, 0.1, 1.0, true),
            jet(70.0, -0.5, 2.0, true),
            jet(55.0, 0.8, -2.0, false),
            jet(40.0, 0.2, 0.5, false),
        ];

        let outcome = engine.reconstruct(&jets, &lepton, &missing).unwrap();
        let assignment = outcome.assignment().expect("event must be reconstructed");

        // Light jets can only be the untagged pair, in pt order
        assert_eq!(assignment.q1_top_had, 2);
        assert_eq!(assignment.q2_top_had, 3);

        // The b assignments are the tagged jets in one of the two orders
        let bs = [assignment.b_top_lep, assignment.b_top_had];
        assert!(bs == [0, 1] || bs == [1, 0]);

        assert!(assignment.rank.is_finite());
        assert!(assignment.neutrino.is_feasible());
    }
}
