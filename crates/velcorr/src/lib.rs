/*!
Computes the spatial velocity autocorrelation of a 2D vector field.

# High-Level: the correlation coefficient I(r)

Following the spatial correlation formulation of Dombrowski et al. (2004),
`I(r)` measures how similar the velocity at a point is to the velocity at
points a distance `r` away. Point pairs are sampled at 8 orientations spaced
45° apart, pooled, and the mean pairwise dot product is normalized by the
mean-centered variance of the sampled field, so the result is a
dimensionless correlation coefficient: 1 at `r = 0` for any non-degenerate
field, decaying toward 0 as the separation exceeds the field's correlation
length.

# User Guide

Build a [`VelocityField`] (directly from component buffers, or from a sparse
observation table via [`rescale_positions`] +
[`VelocityField::from_samples`]), then run [`compute_correlation`] over a
list of radii in grid-cell units:

```
use velcorr::{Correlation, VelocityField, compute_correlation};

let field = VelocityField::from_components(
    2,
    2,
    vec![1.0, 2.0, 0.5, 1.5],
    vec![0.0, -1.0, 0.5, 0.0],
)?;
let result = compute_correlation(&field.grid()?, &[0.0, 1.0])?;
assert_eq!(result[0].correlation, Correlation::Value(1.0));
# Ok::<(), velcorr::Error>(())
```

A radius with no valid sample pairs, or with a zero-variance denominator,
yields [`Correlation::Undefined`] for that entry only; the remaining radii
are unaffected.

# Developer Guide

The numerical core lives in [`velcorr_nostd_internal`]; this crate adds
owned storage, reshaping of sparse tabular data, and proper error types.

*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the crates in this package
mod correlate;
mod error;
mod field;

// pull in symbols that are visible outside of the package
pub use correlate::{
    Correlation, CorrelationPoint, UndefinedReason, compute_correlation, coverage,
};
pub use error::Error;
pub use field::{GridSample, SampledVector, VelocityField, rescale_positions};
pub use velcorr_nostd_internal::{
    CoverageCounts, N_ORIENTATIONS, PairSample, Reducer, StatePackViewMut, VelocityCorrelation,
    VelocityGrid, View2DProps, apply_radial, orientation_offsets_xy,
};
