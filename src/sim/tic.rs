use glam::Vec2;
use hecs::World;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{
    Appearance, Body, Heading, InputCmd, Keys, LastBlocked, Lift, Position, Velocity, systems,
};
use crate::world::{Category, Entity, Grid, KeyId, Pose, TextureId};

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Radius of the player's footprint, grid units.
pub const PLAYER_RADIUS: f32 = 0.25;

/// One consistent view of the world handed to the render pass.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub camera: Pose,
    pub entities: Vec<Entity>,
}

/// Owns the ECS world and drives all game‑logic systems.
pub struct TicRunner {
    world: World,
    player: hecs::Entity,
    cmd: InputCmd,
    last: Instant,
}

impl TicRunner {
    /// Empty world with the player standing at `pos`, facing `yaw`.
    pub fn new(pos: Vec2, yaw: f32) -> Self {
        let mut world = World::new();
        let player = world.spawn((
            Position(pos),
            Velocity::default(),
            Body {
                radius: PLAYER_RADIUS,
            },
            Heading(yaw),
            LastBlocked::default(),
            Keys::default(),
        ));
        Self {
            world,
            player,
            cmd: InputCmd::default(),
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn player(&self) -> hecs::Entity {
        self.player
    }

    /// Spawn a stationary enemy or pickup and return its handle.
    pub fn spawn(
        &mut self,
        category: Category,
        pos: Vec2,
        radius: f32,
        sprite: TextureId,
    ) -> hecs::Entity {
        self.world.spawn((
            Position(pos),
            Velocity::default(),
            Body { radius },
            Appearance(sprite),
            category,
            LastBlocked::default(),
        ))
    }

    /// Spawn a projectile flying with `vel` (grid units / second). Its
    /// sprite starts low and climbs while it flies.
    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, sprite: TextureId) -> hecs::Entity {
        self.world.spawn((
            Position(pos),
            Velocity(vel),
            Body { radius: 0.05 },
            Appearance(sprite),
            Category::Projectile,
            LastBlocked::default(),
            Lift(Category::Projectile.billboard().lift),
        ))
    }

    pub fn give_key(&mut self, key: KeyId) {
        if let Ok(mut keys) = self.world.get::<&mut Keys>(self.player) {
            if !keys.0.contains(&key) {
                keys.0.push(key);
                debug!(key, "player picked up a key");
            }
        }
    }

    /// Input applied on following tics. `use_act` fires once.
    pub fn set_input(&mut self, cmd: InputCmd) {
        let use_act = self.cmd.use_act || cmd.use_act;
        self.cmd = InputCmd { use_act, ..cmd };
    }

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, grid: &mut Grid) {
        while self.last.elapsed() >= TIC {
            self.tick(grid);
            self.last += TIC;
        }
    }

    /* ---------------------------------------------------------------- */
    /* one fixed‑rate game tic                                           */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, grid: &mut Grid) {
        systems::player_input(&mut self.world, self.player, &self.cmd);
        if self.cmd.use_act {
            systems::use_door(&self.world, grid, self.player);
            self.cmd.use_act = false;
        }
        systems::movement_system(&mut self.world, grid, DT);
        systems::lift_system(&mut self.world, DT);
        grid.advance_doors(DT);
    }

    /// Player pose with the given horizontal FoV.
    pub fn player_pose(&self, fov: f32) -> Pose {
        let mut q = self
            .world
            .query_one::<(&Position, &Heading)>(self.player)
            .ok();
        match q.as_mut().and_then(|q| q.get()) {
            Some((p, h)) => Pose::new(p.0, h.0, fov),
            None => Pose::new(Vec2::ZERO, 0.0, fov),
        }
    }

    /// Freeze positions for one render pass.
    pub fn snapshot(&self, fov: f32) -> Snapshot {
        let entities = self
            .world
            .query::<(&Position, &Body, &Appearance, &Category, Option<&Lift>)>()
            .iter()
            .map(|(_, (p, b, a, c, lift))| {
                let e = Entity::new(p.0, b.radius, a.0, *c);
                match lift {
                    Some(l) => e.with_lift(l.0),
                    None => e,
                }
            })
            .collect();
        Snapshot {
            camera: self.player_pose(fov),
            entities,
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
