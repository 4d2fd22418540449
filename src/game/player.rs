//! Read-only view of a simulated player

use crate::protocol::MovementType;

/// What the location codec needs to know about a live player.
///
/// The simulation owns and mutates the actual entity; implementors only
/// expose its current values.
pub trait PlayerStateView {
    fn id(&self) -> i32;

    /// World position (x, y)
    fn position(&self) -> (f32, f32);

    fn movement_type(&self) -> MovementType;

    fn movement_direction(&self) -> i32;

    /// Velocity while running, in simulation units
    fn run_velocity(&self) -> f32;

    /// Velocity while walking, in simulation units
    fn walk_velocity(&self) -> f32;
}
