//! Owned velocity-field storage and the tabular-to-grid reshaping step.
//!
//! PIV-style exports list one velocity observation per row, with positions
//! in pixels and observations a fixed number of pixels apart. Before the
//! correlation engine can run, those positions are rescaled onto unit-spaced
//! integer grid coordinates ([`rescale_positions`]) and the observations are
//! placed on a dense grid ([`VelocityField::from_samples`]). Cells never
//! populated stay marked as no-data.
//!
//! The engine assumes the resulting grid is isotropic (equal physical
//! spacing along both axes); guaranteeing that is this module's caller's
//! responsibility, via the step-size and unit-conversion parameters.

use crate::error::Error;
use velcorr_nostd_internal::{VelocityGrid, View2DProps};

/// A raw velocity observation, with the position in the caller's pixel
/// units.
#[derive(Clone, Copy, Debug)]
pub struct SampledVector {
    pub x: f64,
    pub y: f64,
    /// x-velocity
    pub u: f64,
    /// y-velocity
    pub v: f64,
}

/// An observation whose position has been rescaled onto integer grid cells.
#[derive(Clone, Copy, Debug)]
pub struct GridSample {
    pub x: usize,
    pub y: usize,
    pub u: f64,
    pub v: f64,
}

/// how far a rescaled position may sit from an integer before we refuse to
/// cast it
const CAST_TOL: f64 = 1e-5;

/// Rescale raw positions so that adjacent observations sit on adjacent
/// integer grid coordinates.
///
/// Positions are shifted so the minimum is 0, then divided by
/// `step_size * px_unit_conversion` (the pixel spacing between observations
/// times the physical length of one pixel). Every scaled position must land
/// within `1e-5` of an integer; anything further off means the supplied step
/// size or conversion factor doesn't describe the data.
pub fn rescale_positions(
    samples: &[SampledVector],
    step_size: u32,
    px_unit_conversion: f64,
) -> Result<Vec<GridSample>, Error> {
    if samples.is_empty() {
        return Err(Error::grid("the sample table must not be empty".into()));
    }
    if step_size == 0 {
        return Err(Error::grid("step_size must be at least 1".into()));
    }
    if !(px_unit_conversion > 0.0 && px_unit_conversion.is_finite()) {
        return Err(Error::grid(
            "px_unit_conversion must be positive and finite".into(),
        ));
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for s in samples {
        min_x = min_x.min(s.x);
        min_y = min_y.min(s.y);
    }

    let scale = f64::from(step_size) * px_unit_conversion;
    let mut out = Vec::with_capacity(samples.len());
    for s in samples {
        let sx = (s.x - min_x) / scale;
        let sy = (s.y - min_y) / scale;
        if (sx - sx.round()).abs() > CAST_TOL || (sy - sy.round()).abs() > CAST_TOL {
            return Err(Error::grid(
                "cannot safely cast scaled positions to integers; confirm \
                 that step_size and px_unit_conversion are correct"
                    .into(),
            ));
        }
        out.push(GridSample {
            x: sx.round() as usize,
            y: sy.round() as usize,
            u: s.u,
            v: s.v,
        });
    }
    Ok(out)
}

/// A dense 2D velocity field that owns its component buffers.
///
/// Construct one from gridded samples (or raw component buffers), then lend
/// the engine a [`VelocityGrid`] view via [`VelocityField::grid`].
pub struct VelocityField {
    rows: usize,
    cols: usize,
    velocity_x: Vec<f64>,
    velocity_y: Vec<f64>,
}

impl VelocityField {
    /// a field of the given shape with every cell marked no-data
    pub fn filled_no_data(rows: usize, cols: usize) -> Result<VelocityField, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::grid("both grid dimensions must be at least 1".into()));
        }
        Ok(VelocityField {
            rows,
            cols,
            velocity_x: vec![f64::NAN; rows * cols],
            velocity_y: vec![f64::NAN; rows * cols],
        })
    }

    /// build a field from row-major component buffers (a cell is no-data if
    /// either of its components is NaN)
    pub fn from_components(
        rows: usize,
        cols: usize,
        velocity_x: Vec<f64>,
        velocity_y: Vec<f64>,
    ) -> Result<VelocityField, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::grid("both grid dimensions must be at least 1".into()));
        }
        if velocity_x.len() != rows * cols || velocity_y.len() != rows * cols {
            return Err(Error::grid(
                "each component buffer must hold rows * cols values".into(),
            ));
        }
        Ok(VelocityField {
            rows,
            cols,
            velocity_x,
            velocity_y,
        })
    }

    /// Place integer-positioned samples on a dense grid.
    ///
    /// The grid shape is `(max_y + 1, max_x + 1)`; cells without an
    /// observation stay no-data. When two samples claim the same cell, the
    /// later one wins.
    pub fn from_samples(samples: &[GridSample]) -> Result<VelocityField, Error> {
        if samples.is_empty() {
            return Err(Error::grid("the sample table must not be empty".into()));
        }
        let rows = 1 + samples.iter().map(|s| s.y).max().unwrap_or(0);
        let cols = 1 + samples.iter().map(|s| s.x).max().unwrap_or(0);
        let mut field = VelocityField::filled_no_data(rows, cols)?;
        for s in samples {
            let i = s.y * cols + s.x;
            field.velocity_x[i] = s.u;
            field.velocity_y[i] = s.v;
        }
        Ok(field)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// lend out a read-only grid view for the engine
    pub fn grid(&self) -> Result<VelocityGrid<'_>, Error> {
        let idx_props =
            View2DProps::from_shape_contiguous([self.rows, self.cols]).map_err(Error::internal)?;
        VelocityGrid::new(&self.velocity_x, &self.velocity_y, idx_props).map_err(Error::internal)
    }
}
