//! Error types for the solver and the reconstruction engine
//!
//! Routine per-event outcomes (infeasible mass constraints, too few jets, no
//! viable jet assignment) are represented as status values, not errors. The
//! types here cover the conditions that must abort processing instead.

use std::fmt;

/// Errors raised by the neutrino solver
#[derive(Debug, Clone)]
pub enum SolverError {
    /// The grid scan over the solution ellipse found no bracket for a minimum
    /// of the loss function.
    ///
    /// The loss is smooth with at least one minimum for any real geometry, so
    /// this indicates NaN or otherwise non-physical input momenta.
    MinimizationFailed {
        /// Description of the failure
        description: String,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::MinimizationFailed { description } => {
                write!(f, "Minimization failed: {}", description)
            }
        }
    }
}

impl std::error::Error for SolverError {}

/// Errors raised by the reconstruction engine
#[derive(Debug, Clone)]
pub enum RecoError {
    /// The neutrino solver failed while scanning a candidate assignment
    Solver(SolverError),
}

impl fmt::Display for RecoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoError::Solver(e) => write!(f, "Neutrino solver failed: {}", e),
        }
    }
}

impl std::error::Error for RecoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecoError::Solver(e) => Some(e),
        }
    }
}

impl From<SolverError> for RecoError {
    fn from(e: SolverError) -> Self {
        RecoError::Solver(e)
    }
}

/// Errors raised while constructing binned density tables
#[derive(Debug, Clone)]
pub enum TableError {
    /// Bin edges are missing, too few, or not strictly increasing
    InvalidBinning {
        /// Description of the offending axis
        context: String,
    },

    /// The reference distribution has zero or negative total content and
    /// cannot be normalized
    EmptyDistribution {
        /// Which table could not be normalized
        context: String,
    },

    /// A persisted table could not be parsed
    Parse {
        /// Description of the parse failure
        description: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidBinning { context } => {
                write!(f, "Invalid binning: {}", context)
            }
            TableError::EmptyDistribution { context } => {
                write!(f, "Cannot normalize empty distribution: {}", context)
            }
            TableError::Parse { description } => {
                write!(f, "Failed to parse table: {}", description)
            }
        }
    }
}

impl std::error::Error for TableError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::MinimizationFailed {
            description: "no sign change found".to_string(),
        };
        assert!(err.to_string().contains("no sign change"));
    }

    #[test]
    fn test_error_conversion() {
        let solver_err = SolverError::MinimizationFailed {
            description: "grid scan".to_string(),
        };
        let reco_err: RecoError = solver_err.into();
        assert!(matches!(reco_err, RecoError::Solver(_)));
        assert!(reco_err.to_string().contains("grid scan"));
    }

    #[test]
    fn test_table_error_display() {
        let err = TableError::InvalidBinning {
            context: "neutrino distance axis".to_string(),
        };
        assert!(err.to_string().contains("neutrino distance axis"));

        let err = TableError::EmptyDistribution {
            context: "hadronic masses".to_string(),
        };
        assert!(err.to_string().contains("hadronic masses"));
    }
}
