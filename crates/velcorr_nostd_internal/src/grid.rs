/// Check if a 2D array shape (for a View2DProps) is valid
fn check_shape(shape_yx: &[usize; 2]) -> Result<(), &'static str> {
    if shape_yx.contains(&0) {
        Err("shape_yx must not hold 0")
    } else {
        Ok(())
    }
}

/// View2DProps specifies how a "2D" array is laid out in memory. It _must_ be
/// contiguous along the fast axis, which is axis 1.
///
/// For concreteness, an array with shape `[a, b]` has `a` elements (rows)
/// along axis 0 and `b` elements (columns) along axis 1.
#[derive(Clone)]
pub struct View2DProps {
    // these are signed ints because we do a lot of math with negative offsets
    // and want to avoid excessive casts
    shape_yx: [isize; 2],
    strides_yx: [isize; 2],
}

impl View2DProps {
    /// Create a contiguous-in-memory View2DProps from shape_yx alone
    pub fn from_shape_contiguous(shape_yx: [usize; 2]) -> Result<View2DProps, &'static str> {
        check_shape(&shape_yx)?;
        Ok(Self {
            shape_yx: [shape_yx[0] as isize, shape_yx[1] as isize],
            strides_yx: [shape_yx[1] as isize, 1_isize],
        })
    }

    /// Create a View2DProps from shape_yx and strides_yx
    pub fn from_shape_strides(
        shape_yx: [usize; 2],
        strides_yx: [usize; 2],
    ) -> Result<View2DProps, &'static str> {
        check_shape(&shape_yx)?;

        if strides_yx[1] != 1 {
            Err("the grid must be contiguous along the fast axis")
        } else if strides_yx[0] < shape_yx[1] * strides_yx[1] {
            Err("the length of the contiguous axis can't exceed strides_yx[0]")
        } else {
            Ok(Self {
                shape_yx: [shape_yx[0] as isize, shape_yx[1] as isize],
                strides_yx: [strides_yx[0] as isize, strides_yx[1] as isize],
            })
        }
    }

    /// returns the number of elements that a slice must have to be described
    /// by self
    pub fn contiguous_length(&self) -> usize {
        (self.shape_yx[0] * self.strides_yx[0]) as usize
    }

    pub fn shape(&self) -> &[isize; 2] {
        &self.shape_yx
    }

    /// map a 2D index to 1D
    pub fn map_idx(&self, iy: isize, ix: isize) -> isize {
        iy * self.strides_yx[0] + ix * self.strides_yx[1]
    }
}

/// A borrowed view of a dense, regularly-spaced 2D velocity field.
///
/// Each cell holds a 2-component vector, stored as two parallel component
/// slices. A NaN in either component marks the cell as "no data" (cells never
/// populated when a sparse table was placed on the grid); such cells are
/// excluded from all sampling.
///
/// The row spacing and column spacing are assumed to be equal in physical
/// units. The caller (usually the reshaping step) is responsible for that
/// invariant; it is never re-verified here, and violating it silently makes
/// the radii geometrically meaningless.
pub struct VelocityGrid<'a> {
    velocity_x: &'a [f64],
    velocity_y: &'a [f64],
    idx_props: View2DProps,
}

impl<'a> VelocityGrid<'a> {
    /// create a new instance
    pub fn new(
        velocity_x: &'a [f64],
        velocity_y: &'a [f64],
        idx_props: View2DProps,
    ) -> Result<VelocityGrid<'a>, &'static str> {
        if velocity_x.len() < idx_props.contiguous_length() {
            Err("length of velocity_x is inconsistent with strides and shape")
        } else if velocity_y.len() != velocity_x.len() {
            Err("velocity_x and velocity_y must have the same length")
        } else {
            Ok(Self {
                velocity_x,
                velocity_y,
                idx_props,
            })
        }
    }

    /// the number of rows (the y extent)
    pub fn rows(&self) -> isize {
        self.idx_props.shape()[0]
    }

    /// the number of columns (the x extent)
    pub fn cols(&self) -> isize {
        self.idx_props.shape()[1]
    }

    /// look up the vector at cell `(iy, ix)`, as `[vx, vy]`.
    ///
    /// Returns `None` for an out-of-bounds index or a no-data cell.
    pub fn vector_at(&self, iy: isize, ix: isize) -> Option<[f64; 2]> {
        if iy < 0 || ix < 0 || iy >= self.rows() || ix >= self.cols() {
            return None;
        }
        let i = self.idx_props.map_idx(iy, ix) as usize;
        let v = [self.velocity_x[i], self.velocity_y[i]];
        if v[0].is_nan() || v[1].is_nan() {
            None
        } else {
            Some(v)
        }
    }
}
