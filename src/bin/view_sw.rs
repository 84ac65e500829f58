//! Interactive software-rendered viewer.
//!
//! ```bash
//! cargo run --release -- [--map level.txt] [--width 960 --height 600] [--planar]
//! ```
//!
//! W/S or ↑/↓ move, A/D strafe, ←/→ turn, Shift runs, Space opens doors,
//! M toggles the minimap. `RUST_LOG=debug` shows door and collision events.

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use raycast_rs::{
    config::{MinimapConfig, RenderConfig},
    engine::ColumnMapping,
    renderer::{Renderer, Scene, Software},
    sim::{InputCmd, TicRunner},
    world::{Category, Cell, Grid, Texture, TextureBank, TextureId, rgb},
};

const DEMO_MAP: &str = "\
################
#..............#
#..##......##..#
#..#........#..#
#......22......#
#......22......#
#..#........#..#
#..##......##..#
#......##......#
####D#####A#####
#......#.......#
#..3...#...4...#
#......#.......#
################";

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// ASCII map (`#`/digits walls, `.` floor, `D` door, `A`-`C` locked doors)
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 66.0)]
    fov: f32,

    #[arg(long, default_value_t = 100.0)]
    render_distance: f32,

    /// Spread rays evenly over the view plane instead of by angle
    #[arg(long)]
    planar: bool,

    /// Keys the player starts with, e.g. `--keys 1,2`
    #[arg(long, value_delimiter = ',')]
    keys: Vec<u8>,
}

struct Sprites {
    enemy: TextureId,
    pickup: TextureId,
}

/// Wall textures land on the ids the ASCII grid uses (`#` = 1, `D` = 5, …).
fn build_bank() -> anyhow::Result<(TextureBank, Sprites)> {
    let mut bank = TextureBank::default_with_checker();
    bank.insert("BRICK", Texture::brick(64))?;
    bank.insert("STONE", Texture::stone(64))?;
    bank.insert("WOOD", Texture::wood(64))?;
    bank.insert("METAL", Texture::metal(64))?;
    bank.insert("DOOR", Texture::wood(64))?;
    bank.insert("LOCKED_DOOR", Texture::metal(64))?;
    let enemy = bank.insert("ENEMY", Texture::disc("ENEMY", 32, rgb(200, 30, 30)))?;
    let pickup = bank.insert("PICKUP", Texture::disc("PICKUP", 32, rgb(40, 80, 230)))?;
    Ok((bank, Sprites { enemy, pickup }))
}

fn first_free_cell(grid: &Grid) -> Option<Vec2> {
    grid.iter()
        .find(|(_, _, c)| matches!(c, Cell::Empty))
        .map(|(x, y, _)| Vec2::new(x as f32 + 0.5, y as f32 + 0.5))
}

fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }
    if win.is_key_down(Key::Left) {
        cmd.turn -= 1.0;
    }
    if win.is_key_down(Key::Right) {
        cmd.turn += 1.0;
    }
    cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
    cmd.use_act = win.is_key_pressed(Key::Space, KeyRepeat::No); // edge-trigger
    cmd
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();

    let config = RenderConfig {
        width: opts.width,
        height: opts.height,
        fov: opts.fov.to_radians(),
        render_distance: opts.render_distance,
        mapping: if opts.planar {
            ColumnMapping::Planar
        } else {
            ColumnMapping::Angular
        },
        ..Default::default()
    };
    config.validate()?;

    let src = match &opts.map {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?,
        None => DEMO_MAP.to_owned(),
    };
    let mut grid = Grid::from_ascii(&src)?;
    if !grid.is_enclosed() {
        warn!("map border is not solid; rays may escape to the sky");
    }
    info!(width = grid.width(), height = grid.height(), "map loaded");

    let (bank, sprites) = build_bank()?;

    let start = first_free_cell(&grid).context("map has no empty cell to start in")?;
    let mut sim = TicRunner::new(start, 0.0);
    for &k in &opts.keys {
        sim.give_key(k);
    }
    if opts.map.is_none() {
        sim.spawn(Category::Enemy, Vec2::new(10.5, 5.5), 0.3, sprites.enemy);
        sim.spawn(Category::Enemy, Vec2::new(4.5, 11.5), 0.3, sprites.enemy);
        sim.spawn(Category::Pickup, Vec2::new(13.5, 2.5), 0.2, sprites.pickup);
        sim.spawn(Category::Pickup, Vec2::new(2.5, 7.5), 0.2, sprites.pickup);
    }

    let mut renderer = Software::new(config);
    let mut show_minimap = config.minimap.enabled;

    let mut win = Window::new(
        "raycast_rs software renderer",
        config.width,
        config.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* input → update ------------------------------------------------ */
        sim.set_input(read_input(&win));
        sim.pump(&mut grid);

        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            show_minimap = !show_minimap;
            renderer = Software::new(RenderConfig {
                minimap: MinimapConfig {
                    enabled: show_minimap,
                    ..config.minimap
                },
                ..config
            });
        }

        /* render one frozen snapshot -------------------------------------- */
        let t0 = Instant::now();
        let snap = sim.snapshot(config.fov);
        let scene = Scene {
            grid: &grid,
            camera: &snap.camera,
            entities: &snap.entities,
        };

        renderer.begin_frame(config.width, config.height);
        renderer.draw_scene(&scene, &bank);
        let mut presented = Ok(());
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            presented = win.update_with_buffer(fb, w, h);
        });
        presented?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg render: {avg_ms:.2} ms  ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
