//! Wire record definitions shared by client and server

pub mod player_location;

pub use player_location::{DecodeError, MovementType, PlayerLocationRecord, SPEED_DIVISOR};
