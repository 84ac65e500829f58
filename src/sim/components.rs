use glam::Vec2;
use smallvec::SmallVec;

use crate::sim::collision::Blocked;
use crate::world::{KeyId, TextureId};

/// World-space position, grid units.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Grid units per second.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec2);

/// Circular collision footprint.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub radius: f32,
}

/// Sprite drawn for the entity.
#[derive(Debug, Clone, Copy)]
pub struct Appearance(pub TextureId);

/// Billboard height override, in sprite heights (+ = down).
#[derive(Debug, Clone, Copy)]
pub struct Lift(pub f32);

/// Facing, radians.
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// Axes refused by the collision resolver on the last tic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastBlocked(pub Blocked);

/// Keys an actor carries for locked doors.
#[derive(Debug, Clone, Default)]
pub struct Keys(pub SmallVec<[KeyId; 4]>);

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32,  // –1 … +1
    pub strafe: f32,   // –1 … +1  (left / right)
    pub turn: f32,     // –1 … +1  (left / right)
    pub run: bool,     // Shift
    pub use_act: bool, // Space
}
