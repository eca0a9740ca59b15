//! The field simulator: owns the points and the parameters, advances the
//! simulation and evaluates the force field.
//!
//! A step runs in two phases:
//! 1. Every point's next velocity is computed from the same, untouched
//!    snapshot of positions and staged in a [`VelocityBuffer`].
//! 2. The staged velocities are committed and every point moves along its
//!    new velocity.
//!
//! Fusing the two loops would let later points see earlier points' moves,
//! which changes the results.

use glam::DVec2;
use rand::Rng;

use crate::{
    config::Config,
    error::FieldError,
    field::{FieldGrid, FieldSample},
    force,
    point::Point,
    types::PointId,
    velocity_buffer::VelocityBuffer,
};

/// A set of mutually repelling points inside the unit square.
///
/// The collection is only mutated through the methods below. Removal swaps
/// the last point into the freed slot, so callers must not rely on point
/// order (or on a [`PointId`]) staying stable across removals.
#[derive(Debug, Default)]
pub struct FieldSimulator {
    points: Vec<Point>,
    cfg: Config,
    staged: VelocityBuffer,
}

impl FieldSimulator {
    /// An empty simulator with the given parameters.
    pub fn new(cfg: Config) -> Self {
        Self {
            points: Vec::new(),
            cfg,
            staged: VelocityBuffer::default(),
        }
    }

    /// A simulator starting from an explicit set of points.
    pub fn with_points(cfg: Config, points: Vec<Point>) -> Self {
        Self {
            staged: VelocityBuffer::with_len(points.len()),
            points,
            cfg,
        }
    }

    /// Read-only view of the points, in storage order.
    ///
    /// The order is only stable until the next removal.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points in the simulation.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The parameters the next step or sample will use.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn friction(&self) -> f64 {
        self.cfg.friction
    }

    pub fn wall_force(&self) -> f64 {
        self.cfg.wall_force
    }

    pub fn point_force(&self) -> f64 {
        self.cfg.point_force
    }

    /// Replaces all three parameters at once.
    ///
    /// No validation is done; the new values apply from the next step or
    /// sample onward.
    ///
    /// ### Parameters
    /// - `cfg` - Friction and force strengths to use from now on.
    pub fn set_config(&mut self, cfg: Config) {
        self.cfg = cfg;
    }

    /// Sets the per-step velocity damping.
    ///
    /// ### Parameters
    /// - `friction` - `0` keeps all momentum, `1` stops every point. Values
    ///   outside `[0, 1]` are accepted as is.
    pub fn set_friction(&mut self, friction: f64) {
        self.cfg.friction = friction;
    }

    /// Sets the strength of the repulsion from the square's edges.
    ///
    /// ### Parameters
    /// - `wall_force` - Scale of the wall term. A negative value turns the
    ///   walls into attractors.
    pub fn set_wall_force(&mut self, wall_force: f64) {
        self.cfg.wall_force = wall_force;
    }

    /// Sets the strength of the pairwise repulsion between points.
    ///
    /// ### Parameters
    /// - `point_force` - Scale of the inverse-distance term.
    pub fn set_point_force(&mut self, point_force: f64) {
        self.cfg.point_force = point_force;
    }

    /// Appends a resting point at a uniformly random position in `[0, 1)²`.
    pub fn add_point(&mut self, rng: &mut impl Rng) -> PointId {
        self.push(Point::random(rng))
    }

    /// Appends a resting point at `pos`.
    pub fn add_point_at(&mut self, pos: DVec2) -> PointId {
        self.push(Point::at(pos))
    }

    fn push(&mut self, point: Point) -> PointId {
        let id = self.points.len();
        log::debug!("adding point {} at ({:.4}, {:.4})", id, point.pos.x, point.pos.y);
        self.points.push(point);
        id
    }

    /// Removes a uniformly chosen point in O(1).
    ///
    /// The last point is moved into the freed slot. Returns the removed
    /// point, or `None` if the collection is empty.
    pub fn remove_random_point(&mut self, rng: &mut impl Rng) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let id = rng.random_range(0..self.points.len());
        let removed = self.points.swap_remove(id);
        log::debug!("removed point {}, {} left", id, self.points.len());
        Some(removed)
    }

    /// Drops every point with a coordinate outside `[0, 1]`.
    ///
    /// ### Returns
    /// The number of points removed.
    pub fn remove_out_of_bounds_points(&mut self) -> usize {
        let before = self.points.len();
        self.points.retain(Point::in_unit_square);
        let removed = before - self.points.len();
        if removed > 0 {
            log::debug!("removed {} out-of-bounds points", removed);
        }
        removed
    }

    /// Removes every point. Parameters are kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Advances every point by one step.
    ///
    /// ### Errors
    /// [`FieldError::DegenerateDistance`] if two points coincide exactly.
    /// The simulator is left unchanged in that case.
    pub fn step(&mut self) -> Result<(), FieldError> {
        self.staged.ensure_len(self.points.len());

        for (id, p) in self.points.iter().enumerate() {
            let vel = p.next_velocity(id, &self.points, &self.cfg)?;
            self.staged.set(id, vel);
        }

        for (p, &vel) in self.points.iter_mut().zip(self.staged.as_slice()) {
            p.vel = vel;
            p.apply_velocity();
        }

        log::trace!("stepped {} points", self.points.len());
        Ok(())
    }

    /// Net force at `(x, y)` from every point and the walls.
    ///
    /// Uses the same accumulation as a point's velocity update, with no point
    /// skipped and no friction. Nothing is mutated.
    ///
    /// ### Errors
    /// [`FieldError::DegenerateDistance`] if `(x, y)` coincides exactly with a
    /// point.
    pub fn sample_field(&self, x: f64, y: f64) -> Result<FieldSample, FieldError> {
        let f = force::net_force(DVec2::new(x, y), None, &self.points, &self.cfg)?;
        Ok(FieldSample { fx: f.x, fy: f.y })
    }

    /// Samples the field over a `resolution x resolution` grid covering
    /// `[0, 1)²`. See [`FieldGrid`] for the layout.
    pub fn sample_grid(&self, resolution: usize) -> Result<FieldGrid, FieldError> {
        let mut samples = Vec::with_capacity(resolution * resolution);
        for row in 0..resolution {
            let y = FieldGrid::coord(resolution, row);
            for col in 0..resolution {
                let x = FieldGrid::coord(resolution, col);
                samples.push(self.sample_field(x, y)?);
            }
        }
        Ok(FieldGrid::from_samples(resolution, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn cfg(friction: f64, wall_force: f64, point_force: f64) -> Config {
        Config {
            friction,
            wall_force,
            point_force,
        }
    }

    fn scattered(n: usize, seed: u64) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| Point::random(&mut rng)).collect()
    }

    #[test]
    fn step_on_empty_simulator_is_a_no_op() {
        let mut sim = FieldSimulator::default();
        sim.step().unwrap();
        assert!(sim.is_empty());
    }

    #[test]
    fn empty_field_is_pure_wall_force() {
        let sim = FieldSimulator::new(cfg(0.0, 2.0, 0.1));

        let corner = sim.sample_field(0.0, 0.0).unwrap();
        assert_eq!(corner.channels(), [2.0, 0.0, 2.0]);

        let center = sim.sample_field(0.5, 0.5).unwrap();
        assert_eq!(center.channels(), [0.0, 0.0, 0.0]);

        let (x, y) = (0.2, 0.9);
        let s = sim.sample_field(x, y).unwrap();
        let expected_fx = -x * x * 2.0 + (1.0 - x) * (1.0 - x) * 2.0;
        let expected_fy = -y * y * 2.0 + (1.0 - y) * (1.0 - y) * 2.0;
        assert!((s.fx - expected_fx).abs() < 1e-12);
        assert!((s.fy - expected_fy).abs() < 1e-12);
    }

    #[test]
    fn full_friction_zeroes_every_velocity() {
        let mut points = scattered(8, 1);
        for (i, p) in points.iter_mut().enumerate() {
            p.vel = DVec2::new(i as f64, -(i as f64));
        }
        let mut sim = FieldSimulator::with_points(cfg(1.0, 2.0, 0.1), points);

        sim.step().unwrap();

        for p in sim.points() {
            assert_eq!(p.vel, DVec2::ZERO);
        }
    }

    #[test]
    fn no_forces_and_no_friction_keeps_points_still() {
        let points = scattered(6, 2);
        let mut sim = FieldSimulator::with_points(cfg(0.0, 0.0, 0.0), points.clone());

        for _ in 0..50 {
            sim.step().unwrap();
        }

        for (before, after) in points.iter().zip(sim.points()) {
            assert_eq!(after.vel, DVec2::ZERO);
            assert_eq!(after.pos, before.pos);
        }
    }

    #[test]
    fn step_reads_positions_from_the_pre_step_snapshot() {
        let c = cfg(0.1, 2.0, 0.5);
        let a = Point::at(DVec2::new(0.25, 0.5));
        let b = Point::at(DVec2::new(0.75, 0.5));
        let snapshot = [a, b];

        let va = a.next_velocity(0, &snapshot, &c).unwrap();
        let vb = b.next_velocity(1, &snapshot, &c).unwrap();

        let mut sim = FieldSimulator::with_points(c, snapshot.to_vec());
        sim.step().unwrap();

        assert_eq!(sim.points()[0].vel, va);
        assert_eq!(sim.points()[1].vel, vb);
        assert_eq!(sim.points()[0].pos, a.pos + va * crate::point::POSITION_SCALE);
        assert_eq!(sim.points()[1].pos, b.pos + vb * crate::point::POSITION_SCALE);
    }

    #[test]
    fn step_does_not_depend_on_point_order() {
        let c = cfg(0.02, 2.0, 0.1);
        let points = scattered(12, 3);
        let mut reversed: Vec<Point> = points.clone();
        reversed.reverse();

        let mut forward = FieldSimulator::with_points(c, points);
        let mut backward = FieldSimulator::with_points(c, reversed);
        forward.step().unwrap();
        backward.step().unwrap();

        for (f, b) in forward.points().iter().zip(backward.points().iter().rev()) {
            // Summation order differs, so allow rounding noise.
            assert!(f.vel.abs_diff_eq(b.vel, 1e-12), "{:?} vs {:?}", f.vel, b.vel);
            assert!(f.pos.abs_diff_eq(b.pos, 1e-12));
        }
    }

    #[test]
    fn mirrored_points_feel_mirrored_forces() {
        let c = cfg(0.0, 2.0, 0.1);
        let a = Point::at(DVec2::new(0.25, 0.375));
        let b = Point::at(DVec2::ONE - a.pos);
        let mut sim = FieldSimulator::with_points(c, vec![a, b]);

        sim.step().unwrap();

        let va = sim.points()[0].vel;
        let vb = sim.points()[1].vel;
        assert!(va.abs_diff_eq(-vb, 1e-12), "{:?} vs {:?}", va, vb);
        assert!(va.x > 0.0 && va.y > 0.0);
    }

    #[test]
    fn points_repel_each_other() {
        let c = cfg(0.0, 0.0, 0.1);
        let mut sim = FieldSimulator::with_points(
            c,
            vec![
                Point::at(DVec2::new(0.4, 0.5)),
                Point::at(DVec2::new(0.6, 0.5)),
            ],
        );

        sim.step().unwrap();

        assert!(sim.points()[0].pos.x < 0.4);
        assert!(sim.points()[1].pos.x > 0.6);
        assert_eq!(sim.points()[0].pos.y, 0.5);
    }

    #[test]
    fn coincident_points_abort_the_step_without_mutation() {
        let mut points = vec![
            Point::at(DVec2::new(0.1, 0.2)),
            Point::at(DVec2::new(0.6, 0.6)),
            Point::at(DVec2::new(0.6, 0.6)),
        ];
        points[0].vel = DVec2::new(0.01, 0.02);
        let mut sim = FieldSimulator::with_points(Config::default(), points.clone());

        let err = sim.step().unwrap_err();

        assert_eq!(
            err,
            FieldError::DegenerateDistance {
                point: Some(1),
                other: 2
            }
        );
        assert_eq!(sim.points(), points.as_slice());
    }

    #[test]
    fn sampling_on_a_point_is_degenerate() {
        let mut sim = FieldSimulator::default();
        sim.add_point_at(DVec2::new(0.5, 0.25));

        let err = sim.sample_field(0.5, 0.25).unwrap_err();
        assert_eq!(
            err,
            FieldError::DegenerateDistance {
                point: None,
                other: 0
            }
        );
    }

    #[test]
    fn sampling_at_a_point_matches_its_acceleration() {
        let c = cfg(0.0, 2.0, 0.1);
        let points = vec![
            Point::at(DVec2::new(0.3, 0.3)),
            Point::at(DVec2::new(0.7, 0.2)),
        ];
        let sim = FieldSimulator::with_points(c, points.clone());

        // Field sampled next to point 0 from point 1 alone equals what point 0
        // feels, since a point never repels itself.
        let solo = FieldSimulator::with_points(c, vec![points[1]]);
        let s = solo.sample_field(0.3, 0.3).unwrap();
        let v = points[0].next_velocity(0, sim.points(), &c).unwrap();

        assert!((v.x - s.fx / crate::point::VELOCITY_DIVISOR).abs() < 1e-15);
        assert!((v.y - s.fy / crate::point::VELOCITY_DIVISOR).abs() < 1e-15);
    }

    #[test]
    fn sample_field_does_not_mutate() {
        let points = scattered(5, 4);
        let sim = FieldSimulator::with_points(Config::default(), points.clone());
        let _ = sim.sample_field(0.123, 0.456);
        assert_eq!(sim.points(), points.as_slice());
    }

    #[test]
    fn setters_take_effect_on_next_sample() {
        let mut sim = FieldSimulator::default();
        sim.set_wall_force(4.0);
        assert_eq!(sim.sample_field(0.0, 0.0).unwrap().fx, 4.0);

        sim.set_friction(-2.0);
        sim.set_point_force(9.0);
        assert_eq!(sim.friction(), -2.0);
        assert_eq!(sim.point_force(), 9.0);
        assert_eq!(sim.wall_force(), 4.0);
    }

    #[test]
    fn add_point_appends_a_resting_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sim = FieldSimulator::default();

        let a = sim.add_point(&mut rng);
        let b = sim.add_point(&mut rng);

        assert_eq!((a, b), (0, 1));
        assert_eq!(sim.len(), 2);
        assert!(sim.points().iter().all(|p| p.vel == DVec2::ZERO));
        assert!(sim.points().iter().all(Point::in_unit_square));
    }

    #[test]
    fn remove_random_point_on_empty_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut sim = FieldSimulator::default();
        assert_eq!(sim.remove_random_point(&mut rng), None);
        assert_eq!(sim.len(), 0);
    }

    #[test]
    fn remove_random_point_keeps_the_rest() {
        let mut rng = StdRng::seed_from_u64(7);
        let original = scattered(10, 8);
        let mut sim = FieldSimulator::with_points(Config::default(), original.clone());

        let removed = sim.remove_random_point(&mut rng).unwrap();

        assert_eq!(sim.len(), 9);
        assert!(original.contains(&removed));
        assert!(!sim.points().contains(&removed));
        assert!(sim.points().iter().all(|p| original.contains(p)));
    }

    #[test]
    fn remove_random_point_moves_last_into_the_hole() {
        let mut rng = StdRng::seed_from_u64(9);
        let original = scattered(5, 10);
        let mut sim = FieldSimulator::with_points(Config::default(), original.clone());

        let removed = sim.remove_random_point(&mut rng).unwrap();
        let hole = original.iter().position(|p| *p == removed).unwrap();

        if hole != original.len() - 1 {
            assert_eq!(sim.points()[hole], original[original.len() - 1]);
        }
    }

    #[test]
    fn remove_out_of_bounds_keeps_closed_unit_square() {
        let inside = vec![
            Point::at(DVec2::new(0.0, 0.0)),
            Point::at(DVec2::new(1.0, 1.0)),
            Point::at(DVec2::new(0.5, 0.2)),
        ];
        let outside = vec![
            Point::at(DVec2::new(-0.1, 0.5)),
            Point::at(DVec2::new(0.5, 1.2)),
            Point::at(DVec2::new(2.0, -3.0)),
        ];
        let mut all = inside.clone();
        all.extend(outside);
        let mut sim = FieldSimulator::with_points(Config::default(), all);

        let removed = sim.remove_out_of_bounds_points();

        assert_eq!(removed, 3);
        assert_eq!(sim.points(), inside.as_slice());
    }

    #[test]
    fn remove_out_of_bounds_on_empty_is_a_no_op() {
        let mut sim = FieldSimulator::default();
        assert_eq!(sim.remove_out_of_bounds_points(), 0);
        assert!(sim.is_empty());
    }

    #[test]
    fn clear_drops_all_points() {
        let mut sim = FieldSimulator::with_points(Config::default(), scattered(3, 11));
        sim.clear();
        assert!(sim.is_empty());
        sim.step().unwrap();
    }

    #[test]
    fn sample_grid_matches_pointwise_samples() {
        let sim = FieldSimulator::with_points(Config::default(), scattered(3, 12));
        let grid = sim.sample_grid(8).unwrap();

        assert_eq!(grid.resolution(), 8);
        assert_eq!(grid.samples().len(), 64);
        assert_eq!(grid.get(3, 5).unwrap(), sim.sample_field(3.0 / 8.0, 5.0 / 8.0).unwrap());
    }

    #[test]
    fn sample_grid_propagates_degenerate_samples() {
        let mut sim = FieldSimulator::default();
        sim.add_point_at(DVec2::new(0.25, 0.5));
        assert!(sim.sample_grid(4).is_err());
    }

    #[test]
    fn sample_grid_with_zero_resolution_is_empty() {
        let sim = FieldSimulator::default();
        let grid = sim.sample_grid(0).unwrap();
        assert!(grid.samples().is_empty());
    }
}
