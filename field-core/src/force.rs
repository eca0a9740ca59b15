//! Force accumulation shared by point updates and field sampling.
//!
//! Both paths go through [`net_force`], so a sample taken at a point's
//! position (with that point skipped) equals the force the point feels.

use glam::DVec2;

use crate::{config::Config, error::FieldError, point::Point, types::PointId};

/// Repulsion from the four edges of the unit square at `pos`.
///
/// Each axis gets `-c² * strength + (1 - c)² * strength`, applied on top of
/// `acc` in that order.
#[inline]
pub fn add_wall_force(acc: DVec2, pos: DVec2, strength: f64) -> DVec2 {
    let far = DVec2::ONE - pos;
    let mut acc = acc;
    acc -= pos * pos * strength;
    acc += far * far * strength;
    acc
}

/// Net force at `pos` from every point in `points` plus the walls.
///
/// The pairwise term is `(pos - p) / |pos - p|² * point_force`, which falls
/// off as the inverse of the distance. The point at index `skip`, if any, is
/// left out; that is how a point avoids repelling itself.
///
/// ### Errors
/// [`FieldError::DegenerateDistance`] if `pos` coincides exactly with a
/// point that is not skipped.
pub fn net_force(
    pos: DVec2,
    skip: Option<PointId>,
    points: &[Point],
    cfg: &Config,
) -> Result<DVec2, FieldError> {
    let mut acc = DVec2::ZERO;

    for (id, p) in points.iter().enumerate() {
        if Some(id) == skip {
            continue;
        }
        let delta = pos - p.pos;
        let d2 = delta.length_squared();
        if d2 == 0.0 {
            return Err(FieldError::DegenerateDistance {
                point: skip,
                other: id,
            });
        }
        acc += delta / d2 * cfg.point_force;
    }

    Ok(add_wall_force(acc, pos, cfg.wall_force))
}
