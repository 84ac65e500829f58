//! Render-pass tunables.
//!
//! Everything the column renderer, sprite projector and minimap need that is
//! not part of the world snapshot. The viewer fills this from its command line.

use thiserror::Error;

use crate::engine::ColumnMapping;
use crate::world::{Rgba, rgb};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("screen must be at least 1×1, got {0}×{1}")]
    EmptyScreen(usize, usize),

    #[error("field of view must be in (0, π), got {0}")]
    BadFov(f32),

    #[error("`{0}` must be positive, got {1}")]
    NotPositive(&'static str, f32),

    #[error("fog floor must be in [0, 1], got {0}")]
    BadFogFloor(f32),
}

/// Top-down overlay placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapConfig {
    pub enabled: bool,
    /// Pixels per grid cell.
    pub scale: f32,
    /// Top-left corner of the overlay, in pixels.
    pub pad: i32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 6.0,
            pad: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Horizontal field of view, radians.
    pub fov: f32,
    /// Rays stop (and fog saturates) at this perpendicular distance.
    pub render_distance: f32,
    /// Distance of the projection plane; slice height = h · plane / distance.
    pub projection_plane: f32,
    /// Darkest brightness fog may reach.
    pub fog_floor: f32,
    /// Extra brightness multiplier for faces hit across an x grid line.
    pub x_side_shade: f32,
    pub sky: Rgba,
    pub ceiling: Rgba,
    pub floor: Rgba,
    pub mapping: ColumnMapping,
    pub minimap: MinimapConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            fov: 66_f32.to_radians(),
            render_distance: 100.0,
            projection_plane: 1.0,
            fog_floor: 0.25,
            x_side_shade: 0.78,
            sky: rgb(40, 60, 90),
            ceiling: rgb(40, 60, 90),
            floor: rgb(35, 35, 35),
            mapping: ColumnMapping::Angular,
            minimap: MinimapConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyScreen(self.width, self.height));
        }
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(ConfigError::BadFov(self.fov));
        }
        for (name, v) in [
            ("render_distance", self.render_distance),
            ("projection_plane", self.projection_plane),
            ("x_side_shade", self.x_side_shade),
            ("minimap.scale", self.minimap.scale),
        ] {
            if !(v > 0.0) {
                return Err(ConfigError::NotPositive(name, v));
            }
        }
        if !(0.0..=1.0).contains(&self.fog_floor) {
            return Err(ConfigError::BadFogFloor(self.fog_floor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_nonsense() {
        let mut cfg = RenderConfig {
            width: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyScreen(0, 400)));

        cfg.width = 320;
        cfg.fov = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::BadFov(0.0)));

        cfg.fov = 1.0;
        cfg.render_distance = -1.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NotPositive("render_distance", -1.0))
        );

        cfg.render_distance = 10.0;
        cfg.fog_floor = 1.5;
        assert_eq!(cfg.validate(), Err(ConfigError::BadFogFloor(1.5)));
    }
}
