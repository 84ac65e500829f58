//! Minimal game shell around the core: an ECS world of movers, a fixed-rate
//! tic loop and the snapshot handed to the renderer.

mod collision;
mod components;
mod systems;
mod tic;

pub use collision::{Blocked, MoveResult, footprint_overlaps, resolve_move};
pub use components::{
    Appearance, Body, Heading, InputCmd, Keys, LastBlocked, Lift, Position, Velocity,
};
pub use systems::{
    LIFT_MIN, LIFT_RISE_RATE, MOVE_SPEED, TURN_RATE, USE_RANGE, lift_system, movement_system,
    player_input, use_door,
};
pub use tic::{DT, PLAYER_RADIUS, SIM_FPS, Snapshot, TicRunner};
