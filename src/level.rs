//! Level data and the level source boundary
//!
//! Maps are plain text, one character per tile:
//!
//! ```text
//! # comment lines start with '#'
//! A-Z   solid tile (the letter picks the image, which the core ignores)
//! o     star        !  music
//! *     goal        m  mushroom
//! 1     grub
//! ```
//!
//! Anything else is empty space. The map is as wide as its longest line.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sim::{PowerUpKind, TileGrid};

/// Built-in level pack
const BUILTIN_MAPS: [&str; 2] = [
    include_str!("../maps/map1.txt"),
    include_str!("../maps/map2.txt"),
];

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("map has no tiles")]
    Empty,
    #[error("level pack contains no maps")]
    NoLevels,
    #[error("failed to read map {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What gets placed in a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Grub,
    PowerUp(PowerUpKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub col: i32,
    pub row: i32,
    pub what: Placement,
}

/// A parsed level: solid tiles plus enemy/power-up placements
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub grid: TileGrid,
    pub spawns: Vec<Spawn>,
}

fn placement_for(ch: char) -> Option<Placement> {
    match ch {
        'o' => Some(Placement::PowerUp(PowerUpKind::Star)),
        '!' => Some(Placement::PowerUp(PowerUpKind::Music)),
        '*' => Some(Placement::PowerUp(PowerUpKind::Goal)),
        'm' => Some(Placement::PowerUp(PowerUpKind::Mushroom)),
        '1' => Some(Placement::Grub),
        _ => None,
    }
}

/// Parse a text map
pub fn parse_map(text: &str, tile_size: i32) -> Result<Level, LevelError> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect();

    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    if lines.is_empty() || width == 0 {
        return Err(LevelError::Empty);
    }

    let mut grid = TileGrid::new(width as i32, lines.len() as i32, tile_size);
    let mut spawns = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let (col, row) = (col as i32, row as i32);
            if ch.is_ascii_uppercase() {
                grid.set_solid(col, row, true);
            } else if let Some(what) = placement_for(ch) {
                spawns.push(Spawn { col, row, what });
            }
        }
    }

    Ok(Level { grid, spawns })
}

/// Supplies level data for the current and the next level
pub trait LevelSource {
    /// Advance to the next level (wrapping after the last) and load it
    fn load_next(&mut self) -> Result<Level, LevelError>;
    /// Load the current level again from scratch
    fn reload(&mut self) -> Result<Level, LevelError>;
}

/// An ordered set of text maps
#[derive(Debug, Clone)]
pub struct LevelPack {
    maps: Vec<String>,
    current: Option<usize>,
    tile_size: i32,
}

impl LevelPack {
    pub fn new(maps: Vec<String>, tile_size: i32) -> Self {
        Self {
            maps,
            current: None,
            tile_size,
        }
    }

    /// The maps bundled with the crate
    pub fn builtin(tile_size: i32) -> Self {
        Self::new(BUILTIN_MAPS.iter().map(|m| m.to_string()).collect(), tile_size)
    }

    /// Read maps from disk, in the given order
    pub fn from_files<P: AsRef<Path>>(paths: &[P], tile_size: i32) -> Result<Self, LevelError> {
        let maps = paths
            .iter()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|source| LevelError::Io {
                    path: path.as_ref().to_path_buf(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(maps, tile_size))
    }

    /// Index of the level last handed out
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    fn load(&mut self, index: usize) -> Result<Level, LevelError> {
        let map = self.maps.get(index).ok_or(LevelError::NoLevels)?;
        let level = parse_map(map, self.tile_size)?;
        self.current = Some(index);
        Ok(level)
    }
}

impl LevelSource for LevelPack {
    fn load_next(&mut self) -> Result<Level, LevelError> {
        if self.maps.is_empty() {
            return Err(LevelError::NoLevels);
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.maps.len());
        self.load(next)
    }

    fn reload(&mut self) -> Result<Level, LevelError> {
        match self.current {
            Some(index) => self.load(index),
            None => self.load_next(),
        }
    }
}
