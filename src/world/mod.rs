mod entity;
mod grid;
mod pose;
mod texture;

pub use grid::{Cell, DOOR_TRANSITION_SECS, Door, DoorError, DoorState, Grid, GridError, KeyId};

pub use entity::{Billboard, Category, Entity};

pub use pose::Pose;

pub use texture::{NO_TEXTURE, Rgba, Texture, TextureBank, TextureError, TextureId, alpha, rgb};
