//! Mobile points and their per-step integration.

use glam::DVec2;
use rand::Rng;

use crate::{config::Config, error::FieldError, force, types::PointId};

/// Accumulated force is divided by this before it is added to velocity.
pub const VELOCITY_DIVISOR: f64 = 1000.0;

/// Velocity is scaled by this before it is added to position.
///
/// Together with [`VELOCITY_DIVISOR`] this sets the apparent speed of the
/// simulation per step. Both were picked by eye for roughly 22 steps per
/// second; nothing here depends on wall-clock time.
pub const POSITION_SCALE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Point {
    /// A resting point at `pos`.
    pub fn at(pos: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
        }
    }

    pub fn with_velocity(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }

    /// A resting point placed uniformly at random in `[0, 1)²`.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::at(DVec2::new(rng.random::<f64>(), rng.random::<f64>()))
    }

    /// Computes this point's velocity after one step, without mutating anything.
    ///
    /// 1. Accumulates the net force from every other point in `points` and
    ///    from the walls (see [`force::net_force`]).
    /// 2. Adds `force / VELOCITY_DIVISOR` to the current velocity.
    /// 3. Damps the result by `1 - cfg.friction`.
    ///
    /// ### Parameters
    /// - `id` - This point's index in `points`; that entry is skipped.
    /// - `points` - The full collection, read as a snapshot.
    /// - `cfg` - Friction and force strengths.
    ///
    /// ### Errors
    /// [`FieldError::DegenerateDistance`] if another point sits exactly on
    /// this one.
    pub fn next_velocity(
        &self,
        id: PointId,
        points: &[Point],
        cfg: &Config,
    ) -> Result<DVec2, FieldError> {
        let acc = force::net_force(self.pos, Some(id), points, cfg)?;
        let mut vel = self.vel + acc / VELOCITY_DIVISOR;
        vel *= 1.0 - cfg.friction;
        Ok(vel)
    }

    /// Moves the point along its current velocity.
    #[inline]
    pub fn apply_velocity(&mut self) {
        self.pos += self.vel * POSITION_SCALE;
    }

    /// `true` if both coordinates lie in `[0, 1]`, edges included.
    pub fn in_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.pos.x) && (0.0..=1.0).contains(&self.pos.y)
    }
}
