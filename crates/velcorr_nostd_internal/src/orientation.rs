//! The fixed orientation set used for directional sampling.
//!
//! Pairs at a separation `r` are sampled along 8 unit directions spaced at
//! 45° intervals, starting from +x and turning toward +y. The geometric
//! offset `r * d` is rounded to a concrete cell offset before any lookup;
//! the rounding rule is pinned (round-half-away-from-zero) because it
//! decides which pairs get counted at radii where `r / sqrt(2)` is not an
//! integer.

use core::f64::consts::FRAC_1_SQRT_2;

pub const N_ORIENTATIONS: usize = 8;

const DIRECTIONS_XY: [[f64; 2]; N_ORIENTATIONS] = [
    [1.0, 0.0],
    [FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [0.0, 1.0],
    [-FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [-1.0, 0.0],
    [-FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
    [0.0, -1.0],
    [FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
];

/// round-half-away-from-zero
///
/// Implemented with casts since `f64::round` isn't available in no-std
/// crates. The cast saturates for inputs far outside the `isize` range, but
/// offsets that large never correspond to a representable grid anyway.
pub fn round_half_away_from_zero(x: f64) -> isize {
    if x >= 0.0 {
        (x + 0.5) as isize
    } else {
        (x - 0.5) as isize
    }
}

/// the integer cell offsets `[ox, oy]` sampled at `radius` (in grid-cell
/// units), one per orientation, in the fixed orientation order
pub fn orientation_offsets_xy(radius: f64) -> [[isize; 2]; N_ORIENTATIONS] {
    let mut out = [[0_isize; 2]; N_ORIENTATIONS];
    for (offset, d) in out.iter_mut().zip(DIRECTIONS_XY.iter()) {
        *offset = [
            round_half_away_from_zero(d[0] * radius),
            round_half_away_from_zero(d[1] * radius),
        ];
    }
    out
}
