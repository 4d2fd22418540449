//! Simulation-side types the protocol reads from

pub mod player;

pub use player::PlayerStateView;
