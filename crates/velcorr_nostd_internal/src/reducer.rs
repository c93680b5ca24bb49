//! Accumulation machinery.
//!
//! The correlation at a given radius is a statistic over a stream of sampled
//! point pairs. The accumulation machinery is responsible for computing that
//! statistic from the stream:
//!
//! - the current state of a single accumulator is the `accum_state`, a small
//!   run of `f64` values viewed through [`AccumStateView`] /
//!   [`AccumStateViewMut`];
//! - the accumulation logic lives behind the [`Reducer`] trait, which
//!   modifies one `accum_state` at a time;
//! - external code owns the storage. A collection of `accum_state`s (one per
//!   radius) is managed by a `StatePackViewMut`.
//!
//! Keeping `merge` in the trait means each radius's fold can be split into
//! independent partial folds and recombined, so a parallel backend could be
//! added without touching the reducer.

use crate::state::{AccumStateView, AccumStateViewMut};
use ndarray::ArrayViewMut1;

/// One sampled point pair, as consumed by a [`Reducer`].
///
/// `dot` is the full pairwise quantity; the base-point velocity rides along
/// because the normalization terms are computed over the same population of
/// base points that produced the pairs.
#[derive(Clone, Copy)]
pub struct PairSample {
    /// dot product between the base vector and the offset vector
    pub dot: f64,
    /// the base-point velocity components, `[vx, vy]`
    pub base_xy: [f64; 2],
}

/// Reducers operate on individual `accum_state`s.
pub trait Reducer {
    /// the number of f64 elements needed to track the accumulator data
    fn accum_state_size(&self) -> usize;

    /// initializes the storage tracking the accumulator's state.
    ///
    /// You need to call this function before you start consuming samples. It
    /// can also be used to reset an accumulator since it blindly overwrites
    /// any existing values.
    fn init_accum_state(&self, accum_state: &mut AccumStateViewMut);

    /// consume a sampled pair to update the accum_state
    fn consume(&self, accum_state: &mut AccumStateViewMut, sample: &PairSample);

    /// merge the state information tracked by `accum_state` and `other`, and
    /// update `accum_state` accordingly
    fn merge(&self, accum_state: &mut AccumStateViewMut, other: &AccumStateView);

    /// extract all output-values from a single accum_state. Expects `value`
    /// to have the shape `[self.output_components().len()]` and `accum_state`
    /// to have the shape `[self.accum_state_size()]`
    fn value_from_accum_state(&self, value: &mut ArrayViewMut1<f64>, accum_state: &AccumStateView);

    /// names of the output components, in the order `value_from_accum_state`
    /// writes them
    fn output_components(&self) -> &'static [&'static str];
}

/// The spatial velocity-autocorrelation statistic (Dombrowski et al. 2004).
///
/// Samples from all 8 orientations at a radius are pooled into one state.
/// The normalized value is
///
/// ```text
/// I(r) = (<v . v_off> - <v>.<v>) / (<|v|^2> - <v>.<v>)
/// ```
///
/// with every mean taken over the sampled base points. A state with no pairs
/// or a zero-variance denominator has no defined correlation;
/// `value_from_accum_state` lets the division produce a NaN there, and
/// callers that need to report *why* inspect the raw state through the
/// public index constants.
#[derive(Clone, Copy)]
pub struct VelocityCorrelation;

impl VelocityCorrelation {
    /// running sum of `v . v_off` over all sampled pairs
    pub const S_DOT: usize = 0;
    /// running sum of the base-point x-velocities
    pub const S_VX: usize = 1;
    /// running sum of the base-point y-velocities
    pub const S_VY: usize = 2;
    /// running sum of the base-point squared magnitudes
    pub const S_V2: usize = 3;
    /// number of sampled pairs
    pub const COUNT: usize = 4;

    const VALUE_CORRELATION: usize = 0;
    const VALUE_N_PAIRS: usize = 1;
    const OUTPUT_COMPONENTS: &'static [&'static str] = &["correlation", "n_pairs"];
}

impl Reducer for VelocityCorrelation {
    fn accum_state_size(&self) -> usize {
        5_usize
    }

    fn init_accum_state(&self, accum_state: &mut AccumStateViewMut) {
        accum_state.fill(0.0);
    }

    fn consume(&self, accum_state: &mut AccumStateViewMut, sample: &PairSample) {
        let [vx, vy] = sample.base_xy;
        accum_state[Self::S_DOT] += sample.dot;
        accum_state[Self::S_VX] += vx;
        accum_state[Self::S_VY] += vy;
        accum_state[Self::S_V2] += vx * vx + vy * vy;
        accum_state[Self::COUNT] += 1.0;
    }

    fn merge(&self, accum_state: &mut AccumStateViewMut, other: &AccumStateView) {
        for i in 0..self.accum_state_size() {
            accum_state[i] += other[i];
        }
    }

    fn value_from_accum_state(&self, value: &mut ArrayViewMut1<f64>, accum_state: &AccumStateView) {
        let n = accum_state[Self::COUNT];
        let mean_dot = accum_state[Self::S_DOT] / n;
        let mean_vx = accum_state[Self::S_VX] / n;
        let mean_vy = accum_state[Self::S_VY] / n;
        let mean_v2 = accum_state[Self::S_V2] / n;
        let mean_sq = mean_vx * mean_vx + mean_vy * mean_vy;
        value[[Self::VALUE_CORRELATION]] = (mean_dot - mean_sq) / (mean_v2 - mean_sq);
        value[[Self::VALUE_N_PAIRS]] = n;
    }

    fn output_components(&self) -> &'static [&'static str] {
        Self::OUTPUT_COMPONENTS
    }
}
