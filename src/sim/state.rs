//! World state and entity model
//!
//! Entities are flat records: a body that every entity has, an optional
//! creature lifecycle, and a [`Role`] tag that selects behavior. There is no
//! state outside the [`World`] value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use super::timers::FireControl;
use crate::level::{Level, Placement};
use crate::tuning::Tuning;

/// Axis-aligned body: position of the top-left corner, velocity in pixels/ms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Sprite {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }
}

/// Creature lifecycle. Only ever advances Alive → Dying → Dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dying,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Direction of travel for a horizontal velocity (zero counts as right)
    pub fn of_velocity(dx: f32) -> Self {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }
}

/// Health and lifecycle of anything that can die
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub health: i32,
    state: LifeState,
    /// Time spent in the current state (ms)
    pub state_ms: u64,
    pub flying: bool,
    pub facing: Facing,
}

impl Creature {
    pub fn new(health: i32, facing: Facing) -> Self {
        Self {
            health,
            state: LifeState::Alive,
            state_ms: 0,
            flying: false,
            facing,
        }
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    /// Move one step along the lifecycle. Any other transition is refused.
    pub fn set_state(&mut self, next: LifeState) -> bool {
        let allowed = matches!(
            (self.state, next),
            (LifeState::Alive, LifeState::Dying) | (LifeState::Dying, LifeState::Dead)
        );
        if allowed {
            self.state = next;
            self.state_ms = 0;
        }
        allowed
    }
}

/// The single player-controlled creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub sprite: Sprite,
    pub creature: Creature,
    pub max_speed: f32,
    pub on_ground: bool,
    /// No directional or jump input this frame
    pub idle: bool,
    /// Idle time not yet converted into health (ms)
    pub idle_ms: u64,
    /// Tile column at the end of the last frame (stride bonus)
    pub column: i32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning, column: i32) -> Self {
        Self {
            sprite: Sprite::new(pos, tuning.player_size),
            creature: Creature::new(tuning.player_start_health, Facing::Right),
            max_speed: tuning.player_max_speed,
            on_ground: false,
            idle: false,
            idle_ms: 0,
            column,
        }
    }

    pub fn is_jumping(&self) -> bool {
        !self.on_ground
    }

    /// Start a jump from the ground, or unconditionally when forced (bounce)
    pub fn jump(&mut self, force: bool, jump_speed: f32) {
        if self.on_ground || force {
            self.on_ground = false;
            self.sprite.vel.y = jump_speed;
        }
    }

    /// Set the vertical position; dropping to a lower pixel row leaves the ground
    pub fn set_y(&mut self, y: f32) {
        if super::grid::snap(y) > super::grid::snap(self.sprite.pos.y) {
            self.on_ground = false;
        }
        self.sprite.pos.y = y;
    }

    pub fn collide_horizontal(&mut self) {
        self.sprite.vel.x = 0.0;
    }

    pub fn collide_vertical(&mut self) {
        if self.sprite.vel.y > 0.0 {
            self.on_ground = true;
        }
        self.sprite.vel.y = 0.0;
    }

    /// Alive → Dying. Returns false if the player was already going down.
    pub fn kill(&mut self) -> bool {
        let killed = self.creature.set_state(LifeState::Dying);
        if killed {
            self.sprite.vel = Vec2::ZERO;
        }
        killed
    }
}

/// Sleep → wake → fire cycle of a grub
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrubBrain {
    pub awake: bool,
    pub wake_ms: u64,
    pub fire_ms: u64,
    pub fire_requested: bool,
    pub max_speed: f32,
}

impl GrubBrain {
    pub fn new(max_speed: f32) -> Self {
        Self {
            max_speed,
            ..Default::default()
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Star,
    Music,
    Goal,
    Mushroom,
}

/// What a non-player entity is, resolved once at spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Role {
    Grub(GrubBrain),
    PowerUp(PowerUpKind),
}

/// A non-player entity (enemy or power-up)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub sprite: Sprite,
    /// Present for creatures only
    pub creature: Option<Creature>,
    pub role: Role,
}

impl Entity {
    pub fn is_grub(&self) -> bool {
        matches!(self.role, Role::Grub(_))
    }

    /// Dying and dead creatures are transparent to overlap checks
    pub fn is_tangible(&self) -> bool {
        self.creature.as_ref().is_none_or(Creature::is_alive)
    }

    pub fn is_dead(&self) -> bool {
        self.creature
            .as_ref()
            .is_some_and(|c| c.state() == LifeState::Dead)
    }

    /// Alive → Dying for creatures; power-ups cannot be killed
    pub fn kill(&mut self) -> bool {
        let killed = self
            .creature
            .as_mut()
            .is_some_and(|c| c.set_state(LifeState::Dying));
        if killed {
            self.sprite.vel = Vec2::ZERO;
        }
        killed
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A straight-flying projectile. Has no health or lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
    pub age_ms: u64,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, facing: Facing, speed: f32, owner: Owner) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(facing.sign() * speed, 0.0),
            owner,
            age_ms: 0,
        }
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.pos += self.vel * elapsed_ms as f32;
        self.age_ms = self.age_ms.saturating_add(elapsed_ms);
    }
}

/// Something that can run into the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Entity(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    Stomp,
    Bullet,
}

/// Discrete notifications emitted by a frame, consumed by audio/rendering/loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CollidedHorizontal(Actor),
    CollidedVertical(Actor),
    ShotFired,
    EnemyShotFired { by: u32 },
    PlayerHit { damage: i32 },
    EnemyKilled { id: u32, cause: KillCause },
    PlayerDied,
    PowerUp(PowerUpKind),
    TrackMuteToggle,
    LoadNextLevel,
    /// The player is dead; the caller must supply a fresh world
    ReloadLevel,
}

/// Everything that changes while a level is played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub tuning: Tuning,
    pub(crate) grid: TileGrid,
    pub player: Player,
    /// Enemies and power-ups in insertion order
    pub entities: Vec<Entity>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub fire: FireControl,
    score: u64,
    next_id: u32,
}

impl World {
    /// Empty world with the player standing at `player_pos`
    pub fn new(grid: TileGrid, player_pos: Vec2, tuning: Tuning) -> Self {
        let column = grid.pixels_to_tiles(player_pos.x);
        Self {
            tuning,
            player: Player::new(player_pos, &tuning, column),
            grid,
            entities: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            fire: FireControl::default(),
            score: 0,
            next_id: 1,
        }
    }

    /// Build a world from loaded level data
    pub fn from_level(level: Level, tuning: Tuning) -> Self {
        let Level { grid, spawns } = level;
        let spawn_x = grid.tiles_to_pixels(tuning.player_spawn_column);
        let mut world = Self::new(grid, Vec2::new(spawn_x, 0.0), tuning);

        for spawn in spawns {
            let size = match spawn.what {
                Placement::Grub => tuning.grub_size,
                Placement::PowerUp(_) => tuning.power_up_size,
            };
            // Centered in the cell, standing on its floor
            let tile = world.grid.tile_size() as f32;
            let pos = Vec2::new(
                world.grid.tiles_to_pixels(spawn.col) + (tile - size.x) / 2.0,
                world.grid.tiles_to_pixels(spawn.row + 1) - size.y,
            );
            match spawn.what {
                Placement::Grub => world.spawn_grub(pos),
                Placement::PowerUp(kind) => world.spawn_power_up(kind, pos),
            };
        }
        world
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Score only ever goes up
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn spawn_grub(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            sprite: Sprite::new(pos, self.tuning.grub_size),
            creature: Some(Creature::new(self.tuning.grub_health, Facing::Left)),
            role: Role::Grub(GrubBrain::new(self.tuning.grub_max_speed)),
        });
        id
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            sprite: Sprite::new(pos, self.tuning.power_up_size),
            creature: None,
            role: Role::PowerUp(kind),
        });
        id
    }

    /// Spawn a bullet at a firer's muzzle (top-left plus the spawn offset)
    pub fn spawn_bullet(&mut self, firer_pos: Vec2, facing: Facing, owner: Owner) -> u32 {
        let id = self.next_entity_id();
        let pos = firer_pos + Vec2::new(0.0, self.tuning.bullet_spawn_offset_y);
        let bullet = Bullet::new(id, pos, facing, self.tuning.bullet_speed, owner);
        match owner {
            Owner::Player => self.player_bullets.push(bullet),
            Owner::Enemy => self.enemy_bullets.push(bullet),
        }
        id
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            player: PlayerView {
                pos: self.player.sprite.pos,
                size: self.player.sprite.size,
                health: self.player.creature.health,
                state: self.player.creature.state(),
                facing: self.player.creature.facing,
            },
            entities: self
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    tag: match e.role {
                        Role::Grub(_) => EntityTag::Grub,
                        Role::PowerUp(kind) => EntityTag::PowerUp(kind),
                    },
                    pos: e.sprite.pos,
                    size: e.sprite.size,
                    state: e.creature.as_ref().map(Creature::state),
                })
                .collect(),
            bullets: self
                .player_bullets
                .iter()
                .chain(&self.enemy_bullets)
                .map(|b| BulletView {
                    pos: b.pos,
                    owner: b.owner,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityTag {
    Grub,
    PowerUp(PowerUpKind),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub state: LifeState,
    pub facing: Facing,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub tag: EntityTag,
    pub pos: Vec2,
    pub size: Vec2,
    pub state: Option<LifeState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub owner: Owner,
}

/// Frame snapshot handed to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub player: PlayerView,
    pub entities: Vec<EntityView>,
    pub bullets: Vec<BulletView>,
}
