// Format-agnostic repository of textures handed over by whatever asset code
// the host application has. The renderer and world logic interact through
// `TextureId` only.

use std::collections::HashMap;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Pixel format shared by textures and the frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Build an opaque pixel from 8-bit channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Alpha channel of a pixel.
#[inline]
pub const fn alpha(px: Rgba) -> u8 {
    (px >> 24) as u8
}

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        Texture::from_fn("CHECKER", 8, 8, |x, y| {
            if (x ^ y) & 1 == 0 {
                rgb(170, 170, 170)
            } else {
                rgb(85, 85, 85)
            }
        })
    }
}

impl Texture {
    /// Fill a `w × h` texture by evaluating `f(x, y)` for every texel.
    pub fn from_fn(
        name: impl Into<String>,
        w: usize,
        h: usize,
        mut f: impl FnMut(usize, usize) -> Rgba,
    ) -> Self {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                pixels.push(f(x, y));
            }
        }
        Texture {
            name: name.into(),
            w,
            h,
            pixels,
        }
    }

    /// One flat colour.
    pub fn solid(name: impl Into<String>, color: Rgba) -> Self {
        Texture::from_fn(name, 1, 1, |_, _| color)
    }

    /// Sample with normalised coordinates; both axes wrap.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let tx = ((u * self.w as f32) as isize).rem_euclid(self.w as isize) as usize;
        let ty = ((v * self.h as f32) as isize).rem_euclid(self.h as isize) as usize;
        self.pixels[ty * self.w + tx]
    }

    /*──────────────────── procedural wall sets ────────────────────*/

    /// Staggered red bricks with light mortar lines.
    pub fn brick(size: usize) -> Self {
        let brick_h = (size / 4).max(1);
        let brick_w = (size / 4).max(1);
        Texture::from_fn("BRICK", size, size, |x, y| {
            let row = y / brick_h;
            let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
            let bx = (x + offset) % size;
            if y % brick_h == 0 || bx % brick_w == 0 {
                rgb(200, 200, 200)
            } else {
                rgb(165, 52, 52)
            }
        })
    }

    /// Grey stone with a hashed speckle.
    pub fn stone(size: usize) -> Self {
        Texture::from_fn("STONE", size, size, |x, y| {
            let (xi, yi) = (x as i64, y as i64);
            if ((xi * 13 + yi * 7) ^ (xi * 3 - yi * 5)) & 15 == 0 {
                let c = (90 + (x * y) % 40) as u8;
                rgb(c, c, c)
            } else {
                rgb(110, 110, 120)
            }
        })
    }

    /// Wavy wood grain split into four planks.
    pub fn wood(size: usize) -> Self {
        let plank = (size / 4).max(1);
        Texture::from_fn("WOOD", size, size, |x, y| {
            if x % plank == 0 {
                return rgb(90, 60, 30);
            }
            let (xf, yf) = (x as f32, y as f32);
            let v = 120.0 + 40.0 * ((xf + yf * 0.5) * 0.12).sin() + 20.0 * (yf * 0.3).sin();
            rgb(140, v.clamp(60.0, 200.0) as u8, 60)
        })
    }

    /// Brushed metal with rivets every 16 texels.
    pub fn metal(size: usize) -> Self {
        Texture::from_fn("METAL", size, size, |x, y| {
            let (dx, dy) = ((x % 16) as i32 - 8, (y % 16) as i32 - 8);
            if dx * dx + dy * dy <= 4 {
                rgb(90, 95, 100)
            } else {
                let shade = (130 + (y % 8) * 2) as u8;
                rgb(shade, shade, shade.saturating_add(5))
            }
        })
    }

    /// Round billboard with transparent corners.
    pub fn disc(name: impl Into<String>, size: usize, color: Rgba) -> Self {
        let r = size as f32 * 0.5;
        Texture::from_fn(name, size, size, |x, y| {
            let dx = x as f32 + 0.5 - r;
            let dy = y as f32 + 0.5 - r;
            if dx * dx + dy * dy <= r * r { color } else { 0 }
        })
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Pixel vector does not match `w × h`, or a side is zero.
    #[error("texture `{0}` has inconsistent dimensions")]
    BadSize(String),
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about image files — that’s the loader’s job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Borrow a texture, degrading unknown ids to the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the pixel
    ///   vector disagrees with the dimensions (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadSize(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: Rgba) -> Texture {
        Texture {
            name: "Dummy".to_string(),
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(rgb(255, 0, 0))).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(rgb(0, 0, 255))).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);

        assert_eq!(bank.texture(blue).unwrap().pixels[0], rgb(0, 0, 255));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn mis_sized_texture_rejected() {
        let mut bank = TextureBank::default_with_checker();
        let mut tex = dummy_tex(0);
        tex.pixels.pop();
        assert_eq!(
            bank.insert("SHORT", tex).unwrap_err(),
            TextureError::BadSize("SHORT".into())
        );
    }

    #[test]
    fn sample_wraps_both_axes() {
        let tex = Texture::from_fn("RAMP", 4, 1, |x, _| x as Rgba);
        assert_eq!(tex.sample(0.0, 0.0), 0);
        assert_eq!(tex.sample(0.99, 0.0), 3);
        assert_eq!(tex.sample(1.0, 0.0), 0);
        assert_eq!(tex.sample(-0.25, 3.5), 3);
    }

    #[test]
    fn disc_has_transparent_corners() {
        let tex = Texture::disc("BALL", 8, rgb(1, 2, 3));
        assert_eq!(alpha(tex.pixels[0]), 0);
        assert_eq!(tex.pixels[4 * 8 + 4], rgb(1, 2, 3));
    }
}
