//! Grid ray casting and the column ↔ angle mapping shared by every pass.

mod mapping;
mod raycast;
mod types;

pub use mapping::ColumnMapping;
pub use raycast::{Face, RayHit, RayResult, cast_frame, cast_ray};
pub use types::Screen;
