//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`], so a
//! level pack can ship its own balance as a (partial) JSON document.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay constants for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Tile edge length in pixels
    pub tile_size: i32,
    /// Downward acceleration (pixels/ms²)
    pub gravity: f32,

    // === Player weapon ===
    pub shot_cooldown_ms: u64,
    pub burst_limit: u32,
    pub overheat_ms: u64,
    pub bullet_lifespan_ms: u64,
    pub bullet_speed: f32,
    pub bullet_spawn_offset_y: f32,

    // === Player ===
    pub player_start_health: i32,
    pub player_max_speed: f32,
    pub jump_speed: f32,
    pub player_size: Vec2,
    pub player_spawn_column: i32,
    pub idle_regen_ms: u64,
    pub idle_regen_amount: i32,

    // === Grubs ===
    pub grub_health: i32,
    pub grub_max_speed: f32,
    pub grub_size: Vec2,
    pub grub_wake_ms: u64,
    pub grub_fire_interval_ms: u64,

    pub power_up_size: Vec2,
    pub die_time_ms: u64,

    // === Combat ===
    pub kill_score: u64,
    pub kill_heal: i32,
    pub enemy_bullet_damage: i32,
    pub mushroom_heal: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            gravity: GRAVITY,

            shot_cooldown_ms: SHOT_COOLDOWN_MS,
            burst_limit: BURST_LIMIT,
            overheat_ms: OVERHEAT_MS,
            bullet_lifespan_ms: BULLET_LIFESPAN_MS,
            bullet_speed: BULLET_SPEED,
            bullet_spawn_offset_y: BULLET_SPAWN_OFFSET_Y,

            player_start_health: PLAYER_START_HEALTH,
            player_max_speed: PLAYER_MAX_SPEED,
            jump_speed: PLAYER_JUMP_SPEED,
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_spawn_column: PLAYER_SPAWN_COLUMN,
            idle_regen_ms: IDLE_REGEN_MS,
            idle_regen_amount: IDLE_REGEN_AMOUNT,

            grub_health: GRUB_HEALTH,
            grub_max_speed: GRUB_MAX_SPEED,
            grub_size: Vec2::new(GRUB_WIDTH, GRUB_HEIGHT),
            grub_wake_ms: GRUB_WAKE_MS,
            grub_fire_interval_ms: GRUB_FIRE_INTERVAL_MS,

            power_up_size: Vec2::splat(POWER_UP_SIZE),
            die_time_ms: DIE_TIME_MS,

            kill_score: KILL_SCORE,
            kill_heal: KILL_HEAL,
            enemy_bullet_damage: ENEMY_BULLET_DAMAGE,
            mushroom_heal: MUSHROOM_HEAL,
        }
    }
}

impl Tuning {
    /// Parse a tuning document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize for shipping alongside a level pack
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
