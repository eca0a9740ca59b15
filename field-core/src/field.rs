//! Field samples and sampled grids.

/// Net force at one sample location.
///
/// Values are raw and unclamped; near a point they can be arbitrarily large.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSample {
    pub fx: f64,
    pub fy: f64,
}

impl FieldSample {
    /// The sample as three channels `[fx, 0.0, fy]`, ready to be mapped onto
    /// an RGB pixel.
    #[inline]
    pub fn channels(&self) -> [f64; 3] {
        [self.fx, 0.0, self.fy]
    }
}

/// A square, row-major grid of [`FieldSample`]s.
///
/// Cell `(col, row)` holds the field at `(col / resolution, row / resolution)`,
/// so the grid covers `[0, 1)²` with samples at the top-left corner of each
/// cell.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldGrid {
    resolution: usize,
    samples: Vec<FieldSample>,
}

impl FieldGrid {
    pub(crate) fn from_samples(resolution: usize, samples: Vec<FieldSample>) -> Self {
        debug_assert_eq!(samples.len(), resolution * resolution);
        Self {
            resolution,
            samples,
        }
    }

    /// Number of cells along each axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sample coordinate of a cell index along either axis.
    #[inline]
    pub fn coord(resolution: usize, index: usize) -> f64 {
        index as f64 / resolution as f64
    }

    pub fn get(&self, col: usize, row: usize) -> Option<FieldSample> {
        if col < self.resolution && row < self.resolution {
            self.samples.get(row * self.resolution + col).copied()
        } else {
            None
        }
    }

    pub fn samples(&self) -> &[FieldSample] {
        &self.samples
    }
}
