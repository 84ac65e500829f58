use glam::Vec2;
use hecs::{Entity, World};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::collision::{Blocked, circle_overlaps_cell, resolve_move};
use super::tic::DT;
use super::{Body, Heading, InputCmd, Keys, LastBlocked, Lift, Position, Velocity};
use crate::world::{Category, DoorError, DoorState, Grid};

pub const MOVE_SPEED: f32 = 3.0; // grid units / second
pub const TURN_RATE: f32 = std::f32::consts::PI; // rad / second (180°/s)
/// How far in front of the player a door can be used.
pub const USE_RANGE: f32 = 0.9;
/// Projectile sprites climb this many sprite heights per second ...
pub const LIFT_RISE_RATE: f32 = 0.35;
/// ... until they reach this lift.
pub const LIFT_MIN: f32 = -0.15;

/// Turn the player and set its wish velocity from one tic of input.
pub fn player_input(world: &mut World, player: Entity, cmd: &InputCmd) {
    let Ok((heading, vel)) = world.query_one_mut::<(&mut Heading, &mut Velocity)>(player) else {
        return;
    };

    if cmd.turn != 0.0 {
        heading.0 = (heading.0 + cmd.turn * TURN_RATE * DT).rem_euclid(std::f32::consts::TAU);
    }

    let speed = if cmd.run {
        MOVE_SPEED * 1.5
    } else {
        MOVE_SPEED
    };

    if cmd.forward != 0.0 || cmd.strafe != 0.0 {
        let (s, c) = heading.0.sin_cos();
        let fwd = Vec2::new(c, s);
        let right = fwd.perp();
        let wish = (fwd * cmd.forward + right * cmd.strafe).normalize_or_zero();
        vel.0 = wish * speed;
    } else {
        vel.0 = Vec2::ZERO;
    }
}

/// Toggle the door directly in front of `actor`.
///
/// Returns the door's new state, or `None` when there is no door in reach or
/// closing it would trap a body inside.
pub fn use_door(world: &World, grid: &mut Grid, actor: Entity) -> Option<DoorState> {
    let (pos, heading) = {
        let mut q = world.query_one::<(&Position, &Heading)>(actor).ok()?;
        let (p, h) = q.get()?;
        (p.0, h.0)
    };
    let (s, c) = heading.sin_cos();
    let target = pos + Vec2::new(c, s) * USE_RANGE;
    let (ix, iy) = (target.x.floor() as i32, target.y.floor() as i32);

    let state = grid.door_state(ix, iy)?;
    let res = match state {
        DoorState::Closed | DoorState::Closing => {
            let keys = world
                .get::<&Keys>(actor)
                .map(|k| k.0.clone())
                .unwrap_or_default();
            grid.open_door(ix, iy, &keys)
        }
        DoorState::Open | DoorState::Opening => {
            let occupied = world
                .query::<(&Position, &Body)>()
                .iter()
                .any(|(_, (p, b))| circle_overlaps_cell(p.0, b.radius, ix, iy));
            if occupied {
                debug!(ix, iy, "door blocked by a body; not closing");
                return None;
            }
            grid.close_door(ix, iy)
        }
    };

    match res {
        Ok(state) => Some(state),
        Err(DoorError::Locked(key)) => {
            info!(ix, iy, key, "door is locked");
            None
        }
        Err(DoorError::NotADoor(..)) => None,
    }
}

/// Run every mover through the collision resolver. Projectiles that hit
/// geometry are despawned.
pub fn movement_system(world: &mut World, grid: &Grid, dt: f32) {
    let mut spent: SmallVec<[Entity; 4]> = SmallVec::new();

    for (e, (pos, vel, body, last, cat)) in world.query_mut::<(
        &mut Position,
        &Velocity,
        &Body,
        &mut LastBlocked,
        Option<&Category>,
    )>() {
        if vel.0 == Vec2::ZERO {
            last.0 = Blocked::empty();
            continue;
        }
        let r = resolve_move(grid, pos.0, body.radius, vel.0 * dt);
        pos.0 = r.pos;
        last.0 = r.blocked;

        if !r.blocked.is_empty() && cat == Some(&Category::Projectile) {
            spent.push(e);
        }
    }

    for e in spent {
        debug!(?e, "projectile hit a wall");
        if let Err(err) = world.despawn(e) {
            warn!(?e, %err, "spent projectile was already gone");
        }
    }
}

/// Raise every lifted sprite as it ages, clamped at [`LIFT_MIN`].
pub fn lift_system(world: &mut World, dt: f32) {
    for (_, lift) in world.query_mut::<&mut Lift>() {
        lift.0 = (lift.0 - LIFT_RISE_RATE * dt).max(LIFT_MIN);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
