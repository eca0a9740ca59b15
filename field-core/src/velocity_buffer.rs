use crate::types::PointId;
use glam::DVec2;

/// Scratch storage for the velocities computed in the first phase of a step.
///
/// Every point's next velocity is written here while the point collection is
/// still untouched, so all of them are computed from the same snapshot. The
/// simulator then copies the staged values back in one pass.
///
/// Internally, `vel[i]` corresponds to point `i`.
#[derive(Debug, Default)]
pub struct VelocityBuffer {
    vel: Vec<DVec2>,
}

impl VelocityBuffer {
    /// Creates a buffer holding `len` zero velocities.
    pub fn with_len(len: usize) -> Self {
        Self {
            vel: vec![DVec2::ZERO; len],
        }
    }

    /// Resizes the buffer to `len` and zeroes every entry.
    ///
    /// Entries are cleared even when the length already matches, so a
    /// half-filled buffer from an aborted step never leaks into the next one.
    pub fn ensure_len(&mut self, len: usize) {
        if self.vel.len() != len {
            self.vel.resize(len, DVec2::ZERO);
        }
        self.clear();
    }

    /// Zeroes every staged velocity, keeping the length unchanged.
    pub fn clear(&mut self) {
        for v in &mut self.vel {
            *v = DVec2::ZERO;
        }
    }

    /// Stages the next velocity for point `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn set(&mut self, id: PointId, vel: DVec2) {
        self.vel[id] = vel;
    }

    /// Returns the velocity staged for point `id`.
    ///
    /// ### Parameters
    /// - `id` - Point index (used as an index into the buffer).
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn get(&self, id: PointId) -> DVec2 {
        self.vel[id]
    }

    /// Number of points this buffer holds velocities for.
    pub fn len(&self) -> usize {
        self.vel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vel.is_empty()
    }

    /// Staged velocities in point order.
    ///
    /// ### Returns
    /// A slice where entry `i` is the velocity staged for point `i`.
    pub fn as_slice(&self) -> &[DVec2] {
        &self.vel
    }
}
