//! The public correlation entry points.

use crate::error::Error;
use ndarray::Array2;
use velcorr_nostd_internal::{
    CoverageCounts, Reducer, StatePackViewMut, VelocityCorrelation, VelocityGrid, apply_radial,
    sample_coverage,
};

/// Why a radius has no defined correlation value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndefinedReason {
    /// no valid sample pair at this radius (e.g. the radius leaves the grid
    /// along every orientation, or every candidate cell is no-data)
    NoSamplePairs,
    /// zero variance across the sampled base points; a flat field has no
    /// correlation structure
    ZeroVariance,
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UndefinedReason::NoSamplePairs => write!(f, "no sample pairs"),
            UndefinedReason::ZeroVariance => write!(f, "zero variance"),
        }
    }
}

/// The correlation at one radius: a value, or an explicit undefined marking.
///
/// Undefined entries are first-class results, never errors: a degenerate
/// radius doesn't abort the rest of the batch, and reporters must be able to
/// render it distinctly from a numeric 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Correlation {
    Value(f64),
    Undefined(UndefinedReason),
}

impl Correlation {
    /// the correlation value, unless this entry is undefined
    pub fn value(&self) -> Option<f64> {
        match *self {
            Correlation::Value(v) => Some(v),
            Correlation::Undefined(_) => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Correlation::Undefined(_))
    }
}

/// One entry of a correlation result.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationPoint {
    /// separation distance, in grid-cell units
    pub radius: f64,
    pub correlation: Correlation,
    /// number of sampled pairs, pooled across all 8 orientations
    pub n_pairs: u64,
}

fn check_radii(radii: &[f64]) -> Result<(), Error> {
    if radii.is_empty() {
        Err(Error::radius_list("the radius list must not be empty"))
    } else if radii.iter().any(|r| !r.is_finite()) {
        Err(Error::radius_list("each radius must be finite"))
    } else if radii.iter().any(|r| *r < 0.0) {
        Err(Error::radius_list("each radius must be non-negative"))
    } else {
        Ok(())
    }
}

/// Compute the normalized spatial velocity autocorrelation `I(r)` of `grid`
/// at each requested radius.
///
/// Radii are expressed in grid-cell units and are processed independently,
/// in request order. A radius reaching past the grid extent is not an error;
/// it produces fewer pairs (possibly none, in which case its entry is marked
/// [`Correlation::Undefined`]). The computation is pure and deterministic:
/// the accumulation order is fixed, so identical inputs reproduce identical
/// output bit-for-bit.
pub fn compute_correlation(
    grid: &VelocityGrid,
    radii: &[f64],
) -> Result<Vec<CorrelationPoint>, Error> {
    check_radii(radii)?;

    let reducer = VelocityCorrelation;
    let mut statepacks = Array2::<f64>::zeros((reducer.accum_state_size(), radii.len()));
    apply_radial(
        &mut StatePackViewMut::from_array_view(statepacks.view_mut()),
        &reducer,
        grid,
        radii,
    )
    .map_err(Error::internal)?;

    // The undefined-ness classification needs the raw moments (the reducer's
    // own value extraction just lets degenerate divisions produce NaN), so
    // we read the states through the public index constants.
    let mut out = Vec::with_capacity(radii.len());
    for (i, &radius) in radii.iter().enumerate() {
        let state = statepacks.column(i);
        let n = state[VelocityCorrelation::COUNT];
        let correlation = if n == 0.0 {
            Correlation::Undefined(UndefinedReason::NoSamplePairs)
        } else {
            let mean_dot = state[VelocityCorrelation::S_DOT] / n;
            let mean_vx = state[VelocityCorrelation::S_VX] / n;
            let mean_vy = state[VelocityCorrelation::S_VY] / n;
            let mean_v2 = state[VelocityCorrelation::S_V2] / n;
            let mean_sq = mean_vx * mean_vx + mean_vy * mean_vy;
            let denominator = mean_v2 - mean_sq;
            if denominator == 0.0 {
                Correlation::Undefined(UndefinedReason::ZeroVariance)
            } else {
                Correlation::Value((mean_dot - mean_sq) / denominator)
            }
        };
        out.push(CorrelationPoint {
            radius,
            correlation,
            n_pairs: n as u64,
        });
    }
    Ok(out)
}

/// Per-radius sampling coverage: how many base cells participated in at
/// least one valid pair, in 4 or more, and along all 8 orientations.
///
/// These are the metastatistics that accompany the correlation score in the
/// Dombrowski-style analysis; they give a sense of how well-supported the
/// value at a radius is.
pub fn coverage(grid: &VelocityGrid, radius: f64) -> Result<CoverageCounts, Error> {
    let n_cells = (grid.rows() * grid.cols()) as usize;
    let mut pair_counts = vec![0_u8; n_cells];
    sample_coverage(grid, radius, &mut pair_counts).map_err(Error::internal)
}
