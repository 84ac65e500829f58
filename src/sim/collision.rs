//! Circle-vs-grid movement with per-axis sliding.
//!
//! Each axis is tried on its own: x first with the old y, then y with the
//! (possibly kept) x. A blocked axis keeps its old coordinate, the free axis
//! still moves, so diagonal pushes into a wall slide along it.

use bitflags::bitflags;
use glam::{Vec2, vec2};
use smallvec::SmallVec;
use tracing::warn;

use crate::world::Grid;

/// Sub-steps never shrink below this, whatever the radius.
const MIN_STEP: f32 = 1e-3;

bitflags! {
    /// Axes on which the proposed displacement was refused.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Blocked: u8 {
        const X = 0b01;
        const Y = 0b10;
    }
}

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    pub blocked: Blocked,
}

type CellList = SmallVec<[(i32, i32); 9]>;

/// True when the circle strictly overlaps the unit square of cell `(ix, iy)`.
/// Touching an edge is not an overlap.
#[inline]
pub(crate) fn circle_overlaps_cell(pos: Vec2, radius: f32, ix: i32, iy: i32) -> bool {
    let lo = vec2(ix as f32, iy as f32);
    let nearest = pos.clamp(lo, lo + Vec2::ONE);
    let d2 = pos.distance_squared(nearest);
    // a point footprint still counts when it sits inside the cell
    d2 < radius * radius || (d2 == 0.0 && pos.cmpgt(lo).all() && pos.cmplt(lo + Vec2::ONE).all())
}

/// Solid cells the footprint at `pos` overlaps.
fn overlapped_cells(grid: &Grid, pos: Vec2, radius: f32) -> CellList {
    let lo = (pos - Vec2::splat(radius)).floor();
    let hi = (pos + Vec2::splat(radius)).floor();
    let mut out = CellList::new();
    for iy in lo.y as i32..=hi.y as i32 {
        for ix in lo.x as i32..=hi.x as i32 {
            if grid.is_solid(ix, iy) && circle_overlaps_cell(pos, radius, ix, iy) {
                out.push((ix, iy));
            }
        }
    }
    out
}

/// Does a circle of `radius` at `pos` overlap any solid cell?
/// Cells outside the grid count as solid.
pub fn footprint_overlaps(grid: &Grid, pos: Vec2, radius: f32) -> bool {
    !overlapped_cells(grid, pos, radius).is_empty()
}

/// Sweep the footprint from `from` along `d` in sub-steps of at most
/// `max_step`. `false` at the first sub-step that overlaps.
fn sweep_is_clear(grid: &Grid, from: Vec2, radius: f32, d: Vec2, max_step: f32) -> bool {
    let steps = (d.abs().max_element() / max_step).ceil().max(1.0) as u32;
    (1..=steps).all(|i| {
        let at = from + d * (i as f32 / steps as f32);
        !footprint_overlaps(grid, at, radius)
    })
}

/// Move a circular actor by `delta`, sliding along walls.
///
/// Each axis is swept in sub-steps no longer than `radius` so a fast actor
/// cannot skip over a one-cell wall. If any sub-step of an axis hits
/// geometry that axis keeps its starting coordinate.
///
/// An actor that already overlaps geometry is left where it is and reported
/// blocked on both axes.
pub fn resolve_move(grid: &Grid, pos: Vec2, radius: f32, delta: Vec2) -> MoveResult {
    let stuck = overlapped_cells(grid, pos, radius);
    if !stuck.is_empty() {
        warn!(
            x = pos.x,
            y = pos.y,
            radius,
            cells = ?stuck.as_slice(),
            "actor starts inside solid cells; not moving it"
        );
        return MoveResult {
            pos,
            blocked: Blocked::all(),
        };
    }

    if !delta.is_finite() {
        return MoveResult {
            pos,
            blocked: Blocked::empty(),
        };
    }

    let max_step = radius.max(MIN_STEP);
    let mut p = pos;
    let mut blocked = Blocked::empty();

    // x first with the old y ...
    if delta.x != 0.0 {
        if sweep_is_clear(grid, p, radius, vec2(delta.x, 0.0), max_step) {
            p.x += delta.x;
        } else {
            blocked |= Blocked::X;
        }
    }
    // ... then y with whatever x survived
    if delta.y != 0.0 {
        if sweep_is_clear(grid, p, radius, vec2(0.0, delta.y), max_step) {
            p.y += delta.y;
        } else {
            blocked |= Blocked::Y;
        }
    }

    MoveResult { pos: p, blocked }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
