use core::ops::{Index, IndexMut};
use ndarray::{ArrayView1, ArrayViewMut1, ArrayViewMut2, Axis};

/// Read-only view of a single accumulator state.
///
/// Reducers are agnostic about how a given accum_state is organized in
/// memory; these wrappers exist so that all references to the ndarray package
/// stay contained to a handful of files.
pub struct AccumStateView<'a> {
    data: ArrayView1<'a, f64>,
}

impl<'a> AccumStateView<'a> {
    pub fn from_array_view(array_view: ArrayView1<'a, f64>) -> Self {
        Self { data: array_view }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Index<usize> for AccumStateView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

/// Mutable view of a single accumulator state.
pub struct AccumStateViewMut<'a> {
    data: ArrayViewMut1<'a, f64>,
}

impl<'a> AccumStateViewMut<'a> {
    pub fn from_array_view(array_view: ArrayViewMut1<'a, f64>) -> Self {
        Self { data: array_view }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value)
    }

    /// reborrow as a read-only view (used when merging a pair of states)
    pub fn as_view(&self) -> AccumStateView<'_> {
        AccumStateView::from_array_view(self.data.view())
    }
}

impl Index<usize> for AccumStateViewMut<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for AccumStateViewMut<'_> {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

/// Represents a collection of accumulator states, one per requested radius.
///
/// Column `i` of the wrapped array is the accum_state for radius `i`.
pub struct StatePackViewMut<'a> {
    data: ArrayViewMut2<'a, f64>,
}

impl<'a> StatePackViewMut<'a> {
    pub fn from_array_view(array_view: ArrayViewMut2<'a, f64>) -> Self {
        Self { data: array_view }
    }

    pub fn get_state(&self, i: usize) -> AccumStateView<'_> {
        AccumStateView::from_array_view(self.data.index_axis(Axis(1), i))
    }

    pub fn get_state_mut(&mut self, i: usize) -> AccumStateViewMut<'_> {
        AccumStateViewMut::from_array_view(self.data.index_axis_mut(Axis(1), i))
    }

    pub fn state_size(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn n_states(&self) -> usize {
        self.data.len_of(Axis(1))
    }
}
