//! Outcome types of the jet-assignment engine

use serde::Serialize;

use crate::event::Jet;
use crate::kinematics::FourMomentum;
use crate::solver::NuSolution;

/// The four quarks of the `tt -> b l nu, b q q` final state that jets are
/// matched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayJet {
    /// b quark from the semileptonically decaying top quark
    BTopLep,
    /// b quark from the hadronically decaying top quark
    BTopHad,
    /// Leading light-flavour quark from the hadronic W decay
    Q1TopHad,
    /// Subleading light-flavour quark from the hadronic W decay
    Q2TopHad,
}

/// The accepted interpretation of one event
///
/// Jets are identified by their indices in the jet collection the event was
/// reconstructed from, so the interpretation stays valid for as long as the
/// caller keeps that collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Index of the jet matched to the b quark on the leptonic side
    pub b_top_lep: usize,
    /// Index of the jet matched to the b quark on the hadronic side
    pub b_top_had: usize,
    /// Index of the jet matched to the leading light quark
    pub q1_top_had: usize,
    /// Index of the jet matched to the subleading light quark
    pub q2_top_had: usize,
    /// Log-likelihood of this interpretation
    pub rank: f64,
    /// Neutrino solution obtained for the leptonic-side b jet
    pub neutrino: NuSolution,
}

impl Assignment {
    /// Index of the jet matched to the given decay product
    pub fn jet_index(&self, role: DecayJet) -> usize {
        match role {
            DecayJet::BTopLep => self.b_top_lep,
            DecayJet::BTopHad => self.b_top_had,
            DecayJet::Q1TopHad => self.q1_top_had,
            DecayJet::Q2TopHad => self.q2_top_had,
        }
    }

    /// Four-momentum of the reconstructed neutrino
    pub fn neutrino_p4(&self) -> FourMomentum {
        self.neutrino.p4()
    }

    /// Four-momentum of the semileptonically decaying top quark
    ///
    /// `jets` must be the collection the event was reconstructed from.
    pub fn top_lep_p4(&self, lepton: &FourMomentum, jets: &[Jet]) -> FourMomentum {
        *lepton + self.neutrino_p4() + *jets[self.b_top_lep].p4()
    }

    /// Four-momentum of the hadronically decaying top quark
    ///
    /// `jets` must be the collection the event was reconstructed from.
    pub fn top_had_p4(&self, jets: &[Jet]) -> FourMomentum {
        *jets[self.b_top_had].p4() + *jets[self.q1_top_had].p4() + *jets[self.q2_top_had].p4()
    }
}

/// Per-event outcome of the reconstruction
///
/// The two failure variants are routine: events with too little hadronic
/// activity or without any interpretation inside both likelihood domains
/// occur in every dataset and are simply not reconstructable.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconstruction {
    /// The highest-ranked interpretation of the event
    Reconstructed(Assignment),
    /// Fewer than four jets passed the kinematic pre-selection
    InsufficientJets,
    /// Every admissible assignment was discarded during scoring
    NoViableAssignment,
}

impl Reconstruction {
    /// The accepted interpretation, if the event was reconstructed
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Reconstruction::Reconstructed(a) => Some(a),
            _ => None,
        }
    }

    /// Whether the event was reconstructed
    #[inline]
    pub fn is_reconstructed(&self) -> bool {
        matches!(self, Reconstruction::Reconstructed(_))
    }

    /// Status code of the outcome, for bookkeeping by the caller
    pub fn status(&self) -> RecoStatus {
        match self {
            Reconstruction::Reconstructed(_) => RecoStatus::Reconstructed,
            Reconstruction::InsufficientJets => RecoStatus::InsufficientJets,
            Reconstruction::NoViableAssignment => RecoStatus::NoViableAssignment,
        }
    }
}

/// Status code of a per-event outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecoStatus {
    Reconstructed,
    InsufficientJets,
    NoViableAssignment,
}
