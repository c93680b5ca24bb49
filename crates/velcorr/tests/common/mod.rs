// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

use velcorr::{Error, VelocityField};

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

/// build a fully-defined field where cell (y, x) holds `f(y, x)`
pub fn field_from_fn(
    rows: usize,
    cols: usize,
    f: impl Fn(usize, usize) -> [f64; 2],
) -> Result<VelocityField, Error> {
    let mut velocity_x = Vec::with_capacity(rows * cols);
    let mut velocity_y = Vec::with_capacity(rows * cols);
    for iy in 0..rows {
        for ix in 0..cols {
            let [u, v] = f(iy, ix);
            velocity_x.push(u);
            velocity_y.push(v);
        }
    }
    VelocityField::from_components(rows, cols, velocity_x, velocity_y)
}
