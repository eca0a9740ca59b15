/// Identifier for a point in a [`crate::simulator::FieldSimulator`].
///
/// This is an index into the simulator's point collection, and is only
/// meaningful until the next removal: [`FieldSimulator::remove_random_point`]
/// swaps the last point into the freed slot.
///
/// [`FieldSimulator::remove_random_point`]: crate::simulator::FieldSimulator::remove_random_point
pub type PointId = usize;
