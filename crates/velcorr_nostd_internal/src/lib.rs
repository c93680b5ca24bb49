//! Core machinery for computing the spatial velocity autocorrelation of a
//! 2D vector field.
//!
//! This crate holds the pieces that don't require the standard library: the
//! grid view type, the orientation/offset geometry, the accumulation
//! machinery, and the radial sampling kernel. The `velcorr` crate wraps all
//! of this behind an ergonomic API with proper error types.
#![no_std]

mod apply_radial;
mod grid;
mod orientation;
mod reducer;
mod state;

pub use apply_radial::{CoverageCounts, apply_radial, sample_coverage};
pub use grid::{VelocityGrid, View2DProps};
pub use orientation::{N_ORIENTATIONS, orientation_offsets_xy, round_half_away_from_zero};
pub use reducer::{PairSample, Reducer, VelocityCorrelation};
pub use state::{AccumStateView, AccumStateViewMut, StatePackViewMut};
