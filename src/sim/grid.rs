//! Static tile occupancy for one loaded level
//!
//! Tile imagery lives outside the core; a cell is either solid or empty.

use serde::{Deserialize, Serialize};

/// Round half up, matching how sprite positions snap to whole pixels
#[inline]
pub(crate) fn snap(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Fixed `width × height` grid of solid/empty cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tile_size: i32,
    /// Row-major occupancy
    cells: Vec<bool>,
}

impl TileGrid {
    /// Create an empty grid. Dimensions are clamped to at least one tile.
    pub fn new(width: i32, height: i32, tile_size: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tile_size: tile_size.max(1),
            cells: vec![false; (width * height) as usize],
        }
    }

    /// Width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Tile edge length in pixels
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let in_bounds = (0..self.width).contains(&col) && (0..self.height).contains(&row);
        in_bounds.then(|| (row * self.width + col) as usize)
    }

    /// Mark a cell solid or empty. Out-of-range cells are ignored.
    pub fn set_solid(&mut self, col: i32, row: i32, solid: bool) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = solid;
        }
    }

    /// Whether a tile occupies the cell. Anything outside the grid is empty.
    pub fn has_tile(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some_and(|i| self.cells[i])
    }

    /// Movement blocking query.
    ///
    /// Columns outside the grid act as walls; rows above or below it never
    /// block, so sprites may leave the map vertically.
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        if col < 0 || col >= self.width {
            return true;
        }
        self.has_tile(col, row)
    }

    /// Pixel coordinate to tile coordinate (floors for negative pixels)
    #[inline]
    pub fn pixels_to_tiles(&self, pixels: f32) -> i32 {
        (snap(pixels) as i32).div_euclid(self.tile_size)
    }

    /// Tile coordinate to the pixel coordinate of its top/left edge
    #[inline]
    pub fn tiles_to_pixels(&self, tiles: i32) -> f32 {
        (tiles * self.tile_size) as f32
    }
}
