//! Grubfall - a tile-based side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Frame-synchronous simulation (physics, tile collision, AI, combat)
//! - `level`: Text maps and the level source boundary
//! - `game`: Level transitions around the simulation
//! - `audio`: Event to sound cue translation
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod level;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Tile edge length in pixels
    pub const TILE_SIZE: i32 = 64;

    /// Downward acceleration (pixels/ms²)
    pub const GRAVITY: f32 = 0.002;

    /// Minimum time between two player shots (ms)
    pub const SHOT_COOLDOWN_MS: u64 = 200;
    /// Shots that can be fired back to back before overheating
    pub const BURST_LIMIT: u32 = 10;
    /// Cooldown after a full burst before the counter resets (ms)
    pub const OVERHEAT_MS: u64 = 1000;
    /// Bullets expire once older than this (ms)
    pub const BULLET_LIFESPAN_MS: u64 = 400;
    /// Bullet speed (pixels/ms)
    pub const BULLET_SPEED: f32 = 1.0;
    /// Vertical offset from the firer's top edge to the muzzle
    pub const BULLET_SPAWN_OFFSET_Y: f32 = 30.0;

    /// Player defaults
    pub const PLAYER_START_HEALTH: i32 = 20;
    pub const PLAYER_MAX_SPEED: f32 = 0.5;
    pub const PLAYER_JUMP_SPEED: f32 = -0.95;
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPAWN_COLUMN: i32 = 3;
    /// Idle time needed for one regen tick (ms)
    pub const IDLE_REGEN_MS: u64 = 1000;
    pub const IDLE_REGEN_AMOUNT: i32 = 5;

    /// Grub defaults
    pub const GRUB_HEALTH: i32 = 10;
    pub const GRUB_MAX_SPEED: f32 = 0.05;
    pub const GRUB_WIDTH: f32 = 56.0;
    pub const GRUB_HEIGHT: f32 = 44.0;
    pub const GRUB_WAKE_MS: u64 = 500;
    pub const GRUB_FIRE_INTERVAL_MS: u64 = 400;

    /// Power-up sprite size
    pub const POWER_UP_SIZE: f32 = 32.0;

    /// Time a creature spends dying before it is dead (ms)
    pub const DIE_TIME_MS: u64 = 1000;

    /// Combat rewards and penalties
    pub const KILL_SCORE: u64 = 10;
    pub const KILL_HEAL: i32 = 10;
    pub const ENEMY_BULLET_DAMAGE: i32 = 5;
    pub const MUSHROOM_HEAL: i32 = 5;
}
