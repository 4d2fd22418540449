//! Location Sync - player location records for client/server position sync
//!
//! - `protocol`: the fixed 22-byte player location record and its codec
//! - `game`: the read-only player view records are built from
//! - `inspect`: hex/JSON conversion used by the inspector binary
//! - `config`: environment configuration for the binary

pub mod config;
pub mod game;
pub mod inspect;
pub mod protocol;

pub use game::PlayerStateView;
pub use protocol::{DecodeError, MovementType, PlayerLocationRecord};
