//! Histogram-backed probability densities
//!
//! The reference distributions are persisted as bin edges plus per-bin
//! contents. At construction they are normalized so that the integral over
//! the domain is 1 (each bin's content divided by the total and by the bin
//! width), matching how the tables are consumed: as probability densities,
//! not raw counts.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::errors::TableError;
use crate::likelihood::LikelihoodTables;

/// Check that edges define a valid binning: at least one bin, strictly
/// increasing.
fn check_edges(edges: &[f64], context: &str) -> Result<(), TableError> {
    if edges.len() < 2 {
        return Err(TableError::InvalidBinning {
            context: format!("{}: need at least two bin edges", context),
        });
    }

    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(TableError::InvalidBinning {
            context: format!("{}: bin edges must be strictly increasing", context),
        });
    }

    Ok(())
}

/// Locate the bin containing `x`, or `None` if `x` lies outside `[first, last)`.
fn find_bin(edges: &[f64], x: f64) -> Option<usize> {
    if x < edges[0] || x >= *edges.last().unwrap() {
        return None;
    }

    Some(edges.partition_point(|&e| e <= x) - 1)
}

/// One-dimensional binned probability density
///
/// Bins may have variable widths. Lookups outside the binning range report
/// out-of-domain rather than zero density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinnedDensity1d {
    /// Bin edges, strictly increasing; `edges.len() == density.len() + 1`
    edges: Vec<f64>,
    /// Normalized density per bin
    density: Vec<f64>,
}

impl BinnedDensity1d {
    /// Build a normalized density from bin edges and raw bin contents
    ///
    /// Contents are divided by their total and by the bin widths so the
    /// density integrates to 1 over the binning range.
    pub fn from_counts(edges: Vec<f64>, counts: Vec<f64>) -> Result<Self, TableError> {
        check_edges(&edges, "1d density")?;

        if counts.len() + 1 != edges.len() {
            return Err(TableError::InvalidBinning {
                context: format!(
                    "1d density: {} edges are incompatible with {} bins",
                    edges.len(),
                    counts.len()
                ),
            });
        }

        let total: f64 = counts.iter().sum();

        if !(total > 0.0) || counts.iter().any(|&c| c < 0.0) {
            return Err(TableError::EmptyDistribution {
                context: "1d density: bin contents must be non-negative with a positive sum"
                    .to_string(),
            });
        }

        let density = counts
            .iter()
            .zip(edges.windows(2))
            .map(|(&c, w)| c / (total * (w[1] - w[0])))
            .collect();

        Ok(Self { edges, density })
    }

    /// Density at `x`, or `None` if `x` is outside the binning range
    pub fn value(&self, x: f64) -> Option<f64> {
        find_bin(&self.edges, x).map(|bin| self.density[bin])
    }

    /// Lower and upper boundary of the binning range
    pub fn domain(&self) -> (f64, f64) {
        (self.edges[0], *self.edges.last().unwrap())
    }

    /// Integral of the density over its domain
    ///
    /// 1 by construction; useful to re-check deserialized tables.
    pub fn integral(&self) -> f64 {
        self.density
            .iter()
            .zip(self.edges.windows(2))
            .map(|(&d, w)| d * (w[1] - w[0]))
            .sum()
    }

    /// Check structural invariants of a deserialized table
    pub fn validate(&self) -> Result<(), TableError> {
        check_edges(&self.edges, "1d density")?;

        if self.density.len() + 1 != self.edges.len() {
            return Err(TableError::InvalidBinning {
                context: "1d density: edge and density lengths are inconsistent".to_string(),
            });
        }

        Ok(())
    }
}

/// Two-dimensional binned probability density
///
/// Values are stored row-major: all y bins of the first x bin, then all
/// y bins of the second, and so on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinnedDensity2d {
    /// Bin edges along x, strictly increasing
    x_edges: Vec<f64>,
    /// Bin edges along y, strictly increasing
    y_edges: Vec<f64>,
    /// Normalized density per bin, row-major in (x, y)
    density: Vec<f64>,
}

impl BinnedDensity2d {
    /// Build a normalized density from bin edges and raw bin contents
    ///
    /// `counts` is row-major in (x, y) with
    /// `counts.len() == (x_edges.len() - 1) * (y_edges.len() - 1)`.
    pub fn from_counts(
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
        counts: Vec<f64>,
    ) -> Result<Self, TableError> {
        check_edges(&x_edges, "2d density, x axis")?;
        check_edges(&y_edges, "2d density, y axis")?;

        let nx = x_edges.len() - 1;
        let ny = y_edges.len() - 1;

        if counts.len() != nx * ny {
            return Err(TableError::InvalidBinning {
                context: format!(
                    "2d density: expected {} bins, got {}",
                    nx * ny,
                    counts.len()
                ),
            });
        }

        let total: f64 = counts.iter().sum();

        if !(total > 0.0) || counts.iter().any(|&c| c < 0.0) {
            return Err(TableError::EmptyDistribution {
                context: "2d density: bin contents must be non-negative with a positive sum"
                    .to_string(),
            });
        }

        let mut density = Vec::with_capacity(counts.len());

        for ix in 0..nx {
            let wx = x_edges[ix + 1] - x_edges[ix];

            for iy in 0..ny {
                let wy = y_edges[iy + 1] - y_edges[iy];
                density.push(counts[ix * ny + iy] / (total * wx * wy));
            }
        }

        Ok(Self {
            x_edges,
            y_edges,
            density,
        })
    }

    /// Density at `(x, y)`, or `None` if either coordinate is outside its
    /// binning range
    pub fn value(&self, x: f64, y: f64) -> Option<f64> {
        let ix = find_bin(&self.x_edges, x)?;
        let iy = find_bin(&self.y_edges, y)?;

        Some(self.density[ix * (self.y_edges.len() - 1) + iy])
    }

    /// Integral of the density over its domain
    pub fn integral(&self) -> f64 {
        let ny = self.y_edges.len() - 1;

        self.density
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let (ix, iy) = (i / ny, i % ny);
                let wx = self.x_edges[ix + 1] - self.x_edges[ix];
                let wy = self.y_edges[iy + 1] - self.y_edges[iy];
                d * wx * wy
            })
            .sum()
    }

    /// Check structural invariants of a deserialized table
    pub fn validate(&self) -> Result<(), TableError> {
        check_edges(&self.x_edges, "2d density, x axis")?;
        check_edges(&self.y_edges, "2d density, y axis")?;

        if self.density.len() != (self.x_edges.len() - 1) * (self.y_edges.len() - 1) {
            return Err(TableError::InvalidBinning {
                context: "2d density: edge and density lengths are inconsistent".to_string(),
            });
        }

        Ok(())
    }
}

/// The pair of reference densities consumed by the reconstruction engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinnedLikelihood {
    /// Density over the neutrino-solution compatibility distance
    pub neutrino_distance: BinnedDensity1d,
    /// Joint density over the hadronic-side (top mass, W mass) plane
    pub hadronic_masses: BinnedDensity2d,
}

impl BinnedLikelihood {
    /// Combine the two reference densities
    pub fn new(neutrino_distance: BinnedDensity1d, hadronic_masses: BinnedDensity2d) -> Self {
        Self {
            neutrino_distance,
            hadronic_masses,
        }
    }

    /// Load a persisted likelihood definition from JSON
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let tables: BinnedLikelihood =
            serde_json::from_reader(reader).map_err(|e| TableError::Parse {
                description: e.to_string(),
            })?;

        tables.neutrino_distance.validate()?;
        tables.hadronic_masses.validate()?;

        Ok(tables)
    }
}

impl LikelihoodTables for BinnedLikelihood {
    fn neutrino_distance_density(&self, distance: f64) -> Option<f64> {
        self.neutrino_distance.value(distance)
    }

    fn hadronic_masses_density(&self, m_top: f64, m_w: f64) -> Option<f64> {
        self.hadronic_masses.value(m_top, m_w)
    }
}
