//! The radial sampling kernel.
//!
//! For each requested radius, every defined grid cell is paired with the
//! cell one rounded orientation-offset away, and the pairs from all 8
//! orientations are pooled into that radius's accumulator state. Radii are
//! processed independently, so the per-radius work is a self-contained fold.
//!
//! The summation order is fixed (radius by radius; within a radius,
//! orientation-major, then row-major over base cells) so that repeated runs
//! over the same inputs reproduce results bit-for-bit.

use crate::grid::VelocityGrid;
use crate::orientation::{N_ORIENTATIONS, orientation_offsets_xy};
use crate::reducer::{PairSample, Reducer};
use crate::state::{AccumStateViewMut, StatePackViewMut};
use core::cmp;

fn check_radii(radii: &[f64]) -> Result<(), &'static str> {
    if radii.is_empty() {
        Err("radii must not be empty")
    } else if radii.iter().any(|r| !r.is_finite() || *r < 0.0) {
        Err("each radius must be finite and non-negative")
    } else {
        Ok(())
    }
}

/// the base-cell index range along one axis for which both the base cell and
/// the offset cell fall inside an axis of length `len`
///
/// An offset larger than the axis produces an empty range.
fn clamped_range(len: isize, offset: isize) -> (isize, isize) {
    let start = cmp::max(-offset, 0);
    let stop = cmp::min(len, len - offset);
    (start, stop)
}

/// feed every defined pair at a fixed integer offset into the accum_state
fn apply_fixed_offset(
    accum_state: &mut AccumStateViewMut,
    reducer: &impl Reducer,
    grid: &VelocityGrid,
    offset_xy: [isize; 2],
) {
    let [ox, oy] = offset_xy;
    let (y_start, y_stop) = clamped_range(grid.rows(), oy);
    let (x_start, x_stop) = clamped_range(grid.cols(), ox);

    for iy in y_start..y_stop {
        for ix in x_start..x_stop {
            let Some(base) = grid.vector_at(iy, ix) else {
                continue;
            };
            let Some(offset) = grid.vector_at(iy + oy, ix + ox) else {
                continue;
            };
            let sample = PairSample {
                dot: base[0] * offset[0] + base[1] * offset[1],
                base_xy: base,
            };
            reducer.consume(accum_state, &sample);
        }
    }
}

/// Fill `statepacks` with one reduced accumulator state per requested radius.
///
/// Radii may reach past the grid extent; they simply contribute no pairs for
/// some or all orientations. Each state is (re)initialized before any sample
/// is consumed; the caller interprets the states afterwards.
pub fn apply_radial(
    statepacks: &mut StatePackViewMut,
    reducer: &impl Reducer,
    grid: &VelocityGrid,
    radii: &[f64],
) -> Result<(), &'static str> {
    check_radii(radii)?;
    if statepacks.n_states() != radii.len() {
        return Err("statepacks must hold exactly one accum_state per radius");
    }
    if statepacks.state_size() != reducer.accum_state_size() {
        return Err("the accum_state size doesn't match the reducer");
    }

    for (i, &radius) in radii.iter().enumerate() {
        let mut accum_state = statepacks.get_state_mut(i);
        reducer.init_accum_state(&mut accum_state);
        for offset_xy in orientation_offsets_xy(radius) {
            apply_fixed_offset(&mut accum_state, reducer, grid, offset_xy);
        }
    }
    Ok(())
}

/// Per-radius sampling-coverage tallies (how many base cells actually
/// participated, and how thoroughly).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverageCounts {
    /// base cells with at least one valid pair at this radius
    pub n_reviewed: usize,
    /// base cells with 4 or more valid pairs
    pub n_at_least_4: usize,
    /// base cells paired along all 8 orientations
    pub n_all_8: usize,
}

/// Count, for every base cell, how many of the 8 orientations produced a
/// valid pair at `radius`, then summarize the counts.
///
/// `pair_counts` is caller-allocated scratch (this crate never allocates);
/// it must hold `rows * cols` entries and is interpreted row-major. On
/// return it holds the per-cell tallies.
pub fn sample_coverage(
    grid: &VelocityGrid,
    radius: f64,
    pair_counts: &mut [u8],
) -> Result<CoverageCounts, &'static str> {
    check_radii(&[radius])?;
    let (rows, cols) = (grid.rows(), grid.cols());
    if pair_counts.len() != (rows * cols) as usize {
        return Err("pair_counts must hold one entry per grid cell");
    }

    pair_counts.fill(0);
    for [ox, oy] in orientation_offsets_xy(radius) {
        let (y_start, y_stop) = clamped_range(rows, oy);
        let (x_start, x_stop) = clamped_range(cols, ox);
        for iy in y_start..y_stop {
            for ix in x_start..x_stop {
                if grid.vector_at(iy, ix).is_some() && grid.vector_at(iy + oy, ix + ox).is_some() {
                    pair_counts[(iy * cols + ix) as usize] += 1;
                }
            }
        }
    }

    let mut out = CoverageCounts {
        n_reviewed: 0,
        n_at_least_4: 0,
        n_all_8: 0,
    };
    for &count in pair_counts.iter() {
        out.n_reviewed += (count > 0) as usize;
        out.n_at_least_4 += (count >= 4) as usize;
        out.n_all_8 += (count == N_ORIENTATIONS as u8) as usize;
    }
    Ok(out)
}
