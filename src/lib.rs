//! Grid raycasting engine: DDA wall scan, depth-tested billboards,
//! a top-down minimap and sliding circle-vs-grid collision.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
