use glam::Vec2;

use crate::world::texture::TextureId;

/// Gameplay family of a world entity. Category-specific state (HP, AI,
/// lifetime) lives with whoever owns the entity, never here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Enemy,
    Pickup,
    Projectile,
}

/// How a category's billboard sits in the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Billboard {
    /// Size relative to a wall slice at the same depth.
    pub scale: f32,
    /// Vertical shift of the sprite centre, in sprite heights (+ = down).
    pub lift: f32,
}

impl Category {
    pub fn billboard(self) -> Billboard {
        match self {
            Category::Enemy => Billboard {
                scale: 1.0,
                lift: 0.0,
            },
            // pickups sit on the floor at half size
            Category::Pickup => Billboard {
                scale: 0.5,
                lift: 0.5,
            },
            Category::Projectile => Billboard {
                scale: 0.25,
                lift: 0.3,
            },
        }
    }
}

/// The projection/collision-relevant part of anything living in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    pub pos: Vec2,
    pub radius: f32,
    pub sprite: TextureId,
    pub category: Category,
    /// Vertical shift of the sprite centre, in sprite heights (+ = down).
    /// Starts at the category's [`Billboard::lift`].
    pub lift: f32,
}

impl Entity {
    pub fn new(pos: Vec2, radius: f32, sprite: TextureId, category: Category) -> Self {
        Self {
            pos,
            radius,
            sprite,
            category,
            lift: category.billboard().lift,
        }
    }

    /// Same entity drawn at a different height.
    pub fn with_lift(self, lift: f32) -> Self {
        Self { lift, ..self }
    }
}
