mod common;

use common::{field_from_fn, isclose};
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;
use velcorr::{
    Correlation, CoverageCounts, UndefinedReason, VelocityField, VelocityGrid,
    compute_correlation, coverage, orientation_offsets_xy,
};

/// straight-line recomputation of the pooled correlation at one radius,
/// kept deliberately independent of the accumulator machinery
fn reference_correlation(grid: &VelocityGrid, radius: f64) -> Option<f64> {
    let (mut s_dot, mut s_vx, mut s_vy, mut s_v2, mut n) = (0.0, 0.0, 0.0, 0.0, 0_u64);
    for [ox, oy] in orientation_offsets_xy(radius) {
        for iy in 0..grid.rows() {
            for ix in 0..grid.cols() {
                let (Some(v), Some(w)) = (grid.vector_at(iy, ix), grid.vector_at(iy + oy, ix + ox))
                else {
                    continue;
                };
                s_dot += v[0] * w[0] + v[1] * w[1];
                s_vx += v[0];
                s_vy += v[1];
                s_v2 += v[0] * v[0] + v[1] * v[1];
                n += 1;
            }
        }
    }
    if n == 0 {
        return None;
    }
    let n = n as f64;
    let (mean_dot, mean_vx, mean_vy, mean_v2) = (s_dot / n, s_vx / n, s_vy / n, s_v2 / n);
    let mean_sq = mean_vx * mean_vx + mean_vy * mean_vy;
    let denominator = mean_v2 - mean_sq;
    if denominator == 0.0 {
        None
    } else {
        Some((mean_dot - mean_sq) / denominator)
    }
}

/// the 5x5 regression fixture: every cell (1, 0) except a (2, 0) outlier at
/// the centre
fn outlier_field() -> VelocityField {
    field_from_fn(5, 5, |iy, ix| {
        if (iy, ix) == (2, 2) {
            [2.0, 0.0]
        } else {
            [1.0, 0.0]
        }
    })
    .unwrap()
}

/// velocity vectors spiraling around the centre of a (2r+1)x(2r+1) grid
fn spiral_field(radius: usize) -> VelocityField {
    let dia = 2 * radius + 1;
    field_from_fn(dia, dia, |iy, ix| {
        if (iy, ix) == (radius, radius) {
            return [0.0, 0.0];
        }
        let px = ix as f64 - radius as f64;
        let py = -(iy as f64 - radius as f64);
        let angle = py.atan2(px) - std::f64::consts::FRAC_PI_2;
        [angle.cos(), angle.sin()]
    })
    .unwrap()
}

#[test]
fn zero_radius_correlation_is_exactly_one() {
    // at r = 0 every defined cell pairs with itself, so the dot-product and
    // magnitude sums accumulate identical addends in identical order and
    // the ratio is exactly 1 (not merely close to 1)
    let field = field_from_fn(4, 4, |iy, ix| {
        [0.3 * ix as f64 - 0.1 * iy as f64, 0.05 + (ix * iy) as f64]
    })
    .unwrap();
    let result = compute_correlation(&field.grid().unwrap(), &[0.0]).unwrap();
    assert_eq!(result[0].correlation, Correlation::Value(1.0));
    // 16 cells, each self-paired once per orientation
    assert_eq!(result[0].n_pairs, 128);
}

#[test]
fn outlier_fixture_regression() {
    // closed forms from the pooled formula: I(1) = -1/17, I(2) = -2/29
    let field = outlier_field();
    let result = compute_correlation(&field.grid().unwrap(), &[0.0, 1.0, 2.0]).unwrap();

    assert_eq!(result[0].correlation, Correlation::Value(1.0));
    assert_eq!(result[0].n_pairs, 200);

    let i1 = result[1].correlation.value().unwrap();
    assert!(isclose(i1, -1.0 / 17.0, 1.0e-12, 0.0), "I(1) = {i1}");
    assert_eq!(result[1].n_pairs, 144);

    let i2 = result[2].correlation.value().unwrap();
    assert!(isclose(i2, -2.0 / 29.0, 1.0e-12, 0.0), "I(2) = {i2}");
    assert_eq!(result[2].n_pairs, 124);

    // the single outlier weakens the correlation at every nonzero radius
    assert!(i1 < 1.0);
    assert!(i2 < 1.0);
}

#[test]
fn scaling_every_vector_leaves_correlation_unchanged() {
    let radii = [0.0, 1.0, 2.0, 3.0];
    let base = field_from_fn(6, 5, |iy, ix| {
        [((ix + 2 * iy) as f64).sin(), ((3 * ix) as f64).cos() - 0.4]
    })
    .unwrap();
    let expected = compute_correlation(&base.grid().unwrap(), &radii).unwrap();

    for k in [3.5, -2.0, 1.0e-3] {
        let scaled = field_from_fn(6, 5, |iy, ix| {
            let [u, v] = [((ix + 2 * iy) as f64).sin(), ((3 * ix) as f64).cos() - 0.4];
            [k * u, k * v]
        })
        .unwrap();
        let actual = compute_correlation(&scaled.grid().unwrap(), &radii).unwrap();
        for (a, e) in actual.iter().zip(expected.iter()) {
            let (a, e) = (a.correlation.value().unwrap(), e.correlation.value().unwrap());
            assert!(isclose(a, e, 1.0e-12, 1.0e-12), "{a} vs {e} at k = {k}");
        }
    }
}

#[test]
fn additive_shift_matches_direct_recomputation() {
    // mean-centering happens against the sampled base points, so a uniform
    // shift must reproduce exactly what the closed-form recomputation over
    // the shifted field gives (in exact arithmetic the pooled statistic is
    // shift-invariant -- each pair is sampled along with its reverse, so
    // the base and offset populations coincide -- but the engine must not
    // *assume* that; it has to recompute)
    let radii = [1.0, 2.0];
    let shift = [0.75, -0.25];
    let shifted = field_from_fn(4, 4, |iy, ix| {
        [
            0.3 * ix as f64 + 0.1 * iy as f64 + shift[0],
            0.05 * ix as f64 - 0.2 * iy as f64 + shift[1],
        ]
    })
    .unwrap();

    let result = compute_correlation(&shifted.grid().unwrap(), &radii).unwrap();
    for (point, &radius) in result.iter().zip(radii.iter()) {
        let expected = reference_correlation(&shifted.grid().unwrap(), radius).unwrap();
        let actual = point.correlation.value().unwrap();
        assert!(
            isclose(actual, expected, 1.0e-13, 0.0),
            "I({radius}) = {actual}, reference gives {expected}"
        );
    }
}

#[test]
fn uniform_field_is_undefined_at_every_radius() {
    let field = field_from_fn(5, 5, |_, _| [1.0, 0.0]).unwrap();
    let result = compute_correlation(&field.grid().unwrap(), &[0.0, 1.0, 2.0]).unwrap();
    for point in &result {
        assert_eq!(
            point.correlation,
            Correlation::Undefined(UndefinedReason::ZeroVariance),
            "radius {}",
            point.radius
        );
        assert!(point.n_pairs > 0);
    }
}

#[test]
fn unreachable_radius_is_marked_and_does_not_abort_the_batch() {
    // on a 5x5 grid, radius 7 rounds to offsets of at least 5 cells along
    // every orientation, so no pair fits
    let field = outlier_field();
    let result = compute_correlation(&field.grid().unwrap(), &[1.0, 7.0, 2.0]).unwrap();

    assert!(result[0].correlation.value().is_some());
    assert_eq!(
        result[1].correlation,
        Correlation::Undefined(UndefinedReason::NoSamplePairs)
    );
    assert_eq!(result[1].n_pairs, 0);
    assert!(result[2].correlation.value().is_some());
}

#[test]
fn no_data_cells_reduce_pairs_without_failing() {
    let full = outlier_field();
    let full_result = compute_correlation(&full.grid().unwrap(), &[1.0]).unwrap();

    let holey = field_from_fn(5, 5, |iy, ix| match (iy, ix) {
        (0, 1) | (3, 3) => [f64::NAN, f64::NAN],
        (2, 2) => [2.0, 0.0],
        _ => [1.0, 0.0],
    })
    .unwrap();
    let holey_result = compute_correlation(&holey.grid().unwrap(), &[1.0]).unwrap();

    assert!(holey_result[0].correlation.value().is_some());
    assert_eq!(full_result[0].n_pairs, 144);
    assert_eq!(holey_result[0].n_pairs, 118);
}

#[test]
fn repeated_runs_reproduce_bitwise() {
    let seed = 10582441886303702641_u64;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::new(-1.0_f64, 1.0).unwrap();
    let velocity_x: Vec<f64> = (0..9).map(|_| dist.sample(&mut rng)).collect();
    let velocity_y: Vec<f64> = (0..9).map(|_| dist.sample(&mut rng)).collect();
    let field =
        VelocityField::from_components(3, 3, velocity_x.clone(), velocity_y.clone()).unwrap();
    let again = VelocityField::from_components(3, 3, velocity_x, velocity_y).unwrap();

    let radii = [0.0, 1.0];
    let first = compute_correlation(&field.grid().unwrap(), &radii).unwrap();
    let second = compute_correlation(&again.grid().unwrap(), &radii).unwrap();
    for (a, b) in first.iter().zip(second.iter()) {
        let (a, b) = (a.correlation.value().unwrap(), b.correlation.value().unwrap());
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn spiral_field_is_strongly_correlated_at_short_range() {
    let field = spiral_field(5);
    let result = compute_correlation(&field.grid().unwrap(), &[1.0]).unwrap();
    let i1 = result[0].correlation.value().unwrap();
    assert!(i1 > 0.9, "I(1) = {i1}");
}

#[test]
fn opposing_triangles_anticorrelate_across_the_grid() {
    // upper triangle flows one way, lower triangle the other; at a
    // separation spanning most of the grid the pairs mostly straddle the
    // diagonal
    let field = field_from_fn(10, 10, |iy, ix| {
        let z = if iy < ix {
            1.0
        } else if iy > ix {
            -1.0
        } else {
            0.0
        };
        [z, z]
    })
    .unwrap();
    let result = compute_correlation(&field.grid().unwrap(), &[9.0]).unwrap();
    let i9 = result[0].correlation.value().unwrap();
    assert!(i9 < -0.3, "I(9) = {i9}");
}

#[test]
fn radius_list_validation() {
    let field = outlier_field();
    let grid = field.grid().unwrap();
    assert!(compute_correlation(&grid, &[]).is_err());
    assert!(compute_correlation(&grid, &[-1.0]).is_err());
    assert!(compute_correlation(&grid, &[1.0, f64::NAN]).is_err());
    assert!(compute_correlation(&grid, &[f64::INFINITY]).is_err());
}

#[test]
fn coverage_matches_reference_counts() {
    // hand-derived counts for a fully-defined 10x10 grid
    let field = field_from_fn(10, 10, |_, _| [1.0, 0.0]).unwrap();
    let grid = field.grid().unwrap();

    assert_eq!(
        coverage(&grid, 1.0).unwrap(),
        CoverageCounts {
            n_reviewed: 100,
            n_at_least_4: 96,
            n_all_8: 64,
        }
    );
    assert_eq!(
        coverage(&grid, 9.0).unwrap(),
        CoverageCounts {
            n_reviewed: 72,
            n_at_least_4: 0,
            n_all_8: 0,
        }
    );
}
