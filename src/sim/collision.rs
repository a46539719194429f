//! Collision detection against the tile grid and between sprites
//!
//! Tile collision is axis-separated: callers resolve X, then Y using the
//! already-clamped X, so a move can never cut diagonally through a corner.

use glam::{IVec2, Vec2};

use super::grid::{TileGrid, snap};
use super::state::{Entity, Sprite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Outcome of moving a sprite along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMove {
    /// New coordinate along the axis
    pub position: f32,
    pub collided: bool,
}

/// Inclusive tile range walked in travel order
fn span(from: i32, to: i32, reverse: bool) -> impl Iterator<Item = i32> + Clone {
    (0..=(to - from)).map(move |i| if reverse { to - i } else { from + i })
}

/// Find the solid tile nearest to the origin of travel inside the box swept
/// from the sprite's position to `new_pos`. Only one axis should change.
pub fn tile_collision(grid: &TileGrid, sprite: &Sprite, new_pos: Vec2) -> Option<IVec2> {
    let from = sprite.pos.min(new_pos);
    let to = sprite.pos.max(new_pos);
    let delta = new_pos - sprite.pos;

    let from_col = grid.pixels_to_tiles(from.x);
    let from_row = grid.pixels_to_tiles(from.y);
    let to_col = grid.pixels_to_tiles(to.x + sprite.size.x - 1.0);
    let to_row = grid.pixels_to_tiles(to.y + sprite.size.y - 1.0);

    let cols = span(from_col, to_col, delta.x < 0.0);
    let rows = span(from_row, to_row, delta.y < 0.0);

    if delta.y != 0.0 {
        rows.flat_map(|y| cols.clone().map(move |x| IVec2::new(x, y)))
            .find(|t| grid.is_solid(t.x, t.y))
    } else {
        cols.flat_map(|x| rows.clone().map(move |y| IVec2::new(x, y)))
            .find(|t| grid.is_solid(t.x, t.y))
    }
}

/// Move a sprite by `delta` along one axis against the grid.
///
/// On a hit the coordinate is clamped to the near edge of the blocking tile.
/// Velocity is left alone; reacting to the hit is up to the caller.
pub fn resolve_axis(grid: &TileGrid, sprite: &Sprite, delta: f32, axis: Axis) -> AxisMove {
    let i = axis.index();
    let current = sprite.pos[i];
    if delta == 0.0 {
        return AxisMove {
            position: current,
            collided: false,
        };
    }

    let mut target = sprite.pos;
    target[i] += delta;

    match tile_collision(grid, sprite, target) {
        None => AxisMove {
            position: target[i],
            collided: false,
        },
        Some(tile) => {
            let position = if delta > 0.0 {
                grid.tiles_to_pixels(tile[i]) - sprite.size[i]
            } else {
                grid.tiles_to_pixels(tile[i] + 1)
            };
            AxisMove {
                position,
                collided: true,
            }
        }
    }
}

/// Rectangle intersection on whole-pixel positions. A sprite never overlaps itself.
pub fn overlaps(a: &Sprite, b: &Sprite) -> bool {
    if std::ptr::eq(a, b) {
        return false;
    }
    let (ax, ay) = (snap(a.pos.x), snap(a.pos.y));
    let (bx, by) = (snap(b.pos.x), snap(b.pos.y));
    ax < bx + b.size.x && bx < ax + a.size.x && ay < by + b.size.y && by < ay + a.size.y
}

/// Strict point-in-box test used for bullet hits
pub fn point_in_rect(point: Vec2, sprite: &Sprite) -> bool {
    point.x > sprite.pos.x
        && point.x < sprite.pos.x + sprite.size.x
        && point.y > sprite.pos.y
        && point.y < sprite.pos.y + sprite.size.y
}

/// Index of the first tangible entity, in insertion order, that overlaps `candidate`
pub fn find_overlap(candidate: &Sprite, entities: &[Entity]) -> Option<usize> {
    entities
        .iter()
        .position(|e| e.is_tangible() && overlaps(candidate, &e.sprite))
}
