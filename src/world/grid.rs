use thiserror::Error;
use tracing::debug;

use crate::world::texture::{NO_TEXTURE, TextureId};

/// Key colour a locked door asks for.
pub type KeyId = u8;

/// Seconds a door needs to swing fully open or shut.
pub const DOOR_TRANSITION_SECS: f32 = 1.0;

/// Runtime state of a door cell.
///
/// Only `Open` lets rays and actors through; the two in-between states are
/// solid until the transition completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    pub texture: TextureId,
    pub state: DoorState,
    /// 0.0 = fully closed, 1.0 = fully open.
    pub progress: f32,
    /// Key required to open, if any.
    pub key: Option<KeyId>,
}

impl Door {
    pub fn closed(texture: TextureId, key: Option<KeyId>) -> Self {
        Door {
            texture,
            state: DoorState::Closed,
            progress: 0.0,
            key,
        }
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.state == DoorState::Open
    }
}

/// One square of the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Wall(TextureId),
    Door(Door),
}

impl Cell {
    /// Blocks movement *and* stops rays.
    #[inline]
    pub fn is_solid(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Wall(_) => true,
            Cell::Door(d) => !d.is_passable(),
        }
    }

    /// Texture shown when a ray stops here.
    #[inline]
    pub fn texture(&self) -> TextureId {
        match self {
            Cell::Empty => NO_TEXTURE,
            Cell::Wall(t) => *t,
            Cell::Door(d) => d.texture,
        }
    }
}

/// Errors raised while building a [`Grid`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("map has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown map character `{ch}` at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },

    #[error("expected {expected} cells for the given size, got {found}")]
    SizeMismatch { expected: usize, found: usize },
}

/// Errors raised by the door accessor.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DoorError {
    #[error("cell ({0}, {1}) is not a door")]
    NotADoor(i32, i32),

    #[error("door needs key {0}")]
    Locked(KeyId),
}

/// Static tile map, row-major, never resized after construction.
///
/// Out-of-range queries behave like solid boundary walls.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if cells.len() != width * height {
            return Err(GridError::SizeMismatch {
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse the plain-text map format used by the viewer and the tests.
    ///
    /// ```text
    /// #        wall, texture 1
    /// 1-9      wall with that texture id
    /// . or ' ' empty
    /// D        door (texture 5)
    /// A B C    door locked by key 1, 2 or 3 (texture 6)
    /// ```
    ///
    /// Blank lines are skipped; every remaining line must have the same length.
    pub fn from_ascii(src: &str) -> Result<Self, GridError> {
        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;

        for line in src.lines().map(|l| l.trim_end_matches('\r')) {
            if line.trim().is_empty() {
                continue;
            }
            let row = height;
            let mut found = 0;
            for (col, ch) in line.chars().enumerate() {
                cells.push(parse_cell(ch).ok_or(GridError::UnknownCell { ch, row, col })?);
                found += 1;
            }
            if row == 0 {
                width = found;
            } else if found != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            height += 1;
        }

        Self::new(width, height, cells)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, ix: i32, iy: i32) -> Option<usize> {
        if ix < 0 || iy < 0 || ix as usize >= self.width || iy as usize >= self.height {
            return None;
        }
        Some(iy as usize * self.width + ix as usize)
    }

    /// `None` outside the map.
    #[inline]
    pub fn cell(&self, ix: i32, iy: i32) -> Option<&Cell> {
        self.index(ix, iy).map(|i| &self.cells[i])
    }

    /// Solid for collision. Out-of-range is solid.
    #[inline]
    pub fn is_solid(&self, ix: i32, iy: i32) -> bool {
        self.cell(ix, iy).is_none_or(Cell::is_solid)
    }

    /// Stops rays. Same rule as [`Grid::is_solid`]; kept separate so callers
    /// state which question they ask.
    #[inline]
    pub fn is_opaque(&self, ix: i32, iy: i32) -> bool {
        self.is_solid(ix, iy)
    }

    /// True when every border cell is a wall, so no ray can leave the map.
    pub fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width as i32, self.height as i32);
        let border_wall = |ix: i32, iy: i32| matches!(self.cell(ix, iy), Some(Cell::Wall(_)));
        (0..w).all(|x| border_wall(x, 0) && border_wall(x, h - 1))
            && (0..h).all(|y| border_wall(0, y) && border_wall(w - 1, y))
    }

    /// Iterate `(ix, iy, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, c)| {
            ((i % self.width) as i32, (i / self.width) as i32, c)
        })
    }

    /*──────────────────────── door accessor ───────────────────────*/

    pub fn door_state(&self, ix: i32, iy: i32) -> Option<DoorState> {
        match self.cell(ix, iy)? {
            Cell::Door(d) => Some(d.state),
            _ => None,
        }
    }

    fn door_mut(&mut self, ix: i32, iy: i32) -> Result<&mut Door, DoorError> {
        let idx = self.index(ix, iy).ok_or(DoorError::NotADoor(ix, iy))?;
        match &mut self.cells[idx] {
            Cell::Door(d) => Ok(d),
            _ => Err(DoorError::NotADoor(ix, iy)),
        }
    }

    /// Start opening the door at `(ix, iy)` if `keys` holds its key.
    /// Already open or opening doors are left alone.
    pub fn open_door(&mut self, ix: i32, iy: i32, keys: &[KeyId]) -> Result<DoorState, DoorError> {
        let door = self.door_mut(ix, iy)?;
        if let Some(k) = door.key {
            if !keys.contains(&k) {
                return Err(DoorError::Locked(k));
            }
        }
        if matches!(door.state, DoorState::Closed | DoorState::Closing) {
            door.state = DoorState::Opening;
            debug!(ix, iy, "door opening");
        }
        Ok(door.state)
    }

    /// Start closing the door at `(ix, iy)`.
    pub fn close_door(&mut self, ix: i32, iy: i32) -> Result<DoorState, DoorError> {
        let door = self.door_mut(ix, iy)?;
        if matches!(door.state, DoorState::Open | DoorState::Opening) {
            door.state = DoorState::Closing;
            debug!(ix, iy, "door closing");
        }
        Ok(door.state)
    }

    /// Advance every moving door by `dt` seconds.
    pub fn advance_doors(&mut self, dt: f32) {
        let step = dt / DOOR_TRANSITION_SECS;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let Cell::Door(door) = cell else { continue };
            match door.state {
                DoorState::Opening => {
                    door.progress = (door.progress + step).min(1.0);
                    if door.progress >= 1.0 {
                        door.state = DoorState::Open;
                        debug!(ix = i % self.width, iy = i / self.width, "door open");
                    }
                }
                DoorState::Closing => {
                    door.progress = (door.progress - step).max(0.0);
                    if door.progress <= 0.0 {
                        door.state = DoorState::Closed;
                        debug!(ix = i % self.width, iy = i / self.width, "door closed");
                    }
                }
                DoorState::Open | DoorState::Closed => {}
            }
        }
    }
}

fn parse_cell(ch: char) -> Option<Cell> {
    Some(match ch {
        '.' | ' ' => Cell::Empty,
        '#' => Cell::Wall(1),
        '1'..='9' => Cell::Wall(ch as TextureId - '0' as TextureId),
        'D' => Cell::Door(Door::closed(5, None)),
        'A'..='C' => Cell::Door(Door::closed(6, Some(ch as KeyId - b'A' + 1))),
        _ => return None,
    })
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
#####
#...#
#.D.#
#.A.#
#####
";

    #[test]
    fn parses_ascii_room() {
        let g = Grid::from_ascii(ROOM).unwrap();
        assert_eq!((g.width(), g.height()), (5, 5));
        assert_eq!(g.cell(0, 0), Some(&Cell::Wall(1)));
        assert_eq!(g.cell(1, 1), Some(&Cell::Empty));
        assert_eq!(g.door_state(2, 2), Some(DoorState::Closed));
        assert!(g.is_enclosed());
    }

    #[test]
    fn digits_pick_texture() {
        let g = Grid::from_ascii("37\n##").unwrap();
        assert_eq!(g.cell(0, 0), Some(&Cell::Wall(3)));
        assert_eq!(g.cell(1, 0), Some(&Cell::Wall(7)));
    }

    #[test]
    fn rejects_bad_maps() {
        assert_eq!(Grid::from_ascii("\n\n").unwrap_err(), GridError::Empty);
        assert_eq!(
            Grid::from_ascii("###\n##").unwrap_err(),
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            Grid::from_ascii("#?#").unwrap_err(),
            GridError::UnknownCell {
                ch: '?',
                row: 0,
                col: 1
            }
        );
        assert!(matches!(
            Grid::new(2, 2, vec![Cell::Empty; 3]),
            Err(GridError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn out_of_range_is_solid() {
        let g = Grid::from_ascii("..\n..").unwrap();
        assert!(!g.is_solid(0, 0));
        assert!(g.is_solid(-1, 0));
        assert!(g.is_opaque(2, 1));
        assert!(!g.is_enclosed());
    }

    #[test]
    fn door_opens_over_time() {
        let mut g = Grid::from_ascii(ROOM).unwrap();
        assert!(g.is_solid(2, 2));

        assert_eq!(g.open_door(2, 2, &[]), Ok(DoorState::Opening));
        g.advance_doors(DOOR_TRANSITION_SECS * 0.5);
        assert_eq!(g.door_state(2, 2), Some(DoorState::Opening));
        assert!(g.is_solid(2, 2), "opening door still blocks");

        g.advance_doors(DOOR_TRANSITION_SECS);
        assert_eq!(g.door_state(2, 2), Some(DoorState::Open));
        assert!(!g.is_solid(2, 2));

        g.close_door(2, 2).unwrap();
        assert!(g.is_solid(2, 2));
        g.advance_doors(DOOR_TRANSITION_SECS * 2.0);
        assert_eq!(g.door_state(2, 2), Some(DoorState::Closed));
    }

    #[test]
    fn locked_door_needs_key() {
        let mut g = Grid::from_ascii(ROOM).unwrap();
        assert_eq!(g.open_door(2, 3, &[]), Err(DoorError::Locked(1)));
        assert_eq!(g.open_door(2, 3, &[2]), Err(DoorError::Locked(1)));
        assert_eq!(g.open_door(2, 3, &[1]), Ok(DoorState::Opening));
        assert_eq!(g.open_door(1, 1, &[1]), Err(DoorError::NotADoor(1, 1)));
        assert_eq!(g.open_door(-4, 1, &[]), Err(DoorError::NotADoor(-4, 1)));
    }
}
