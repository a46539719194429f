//! Frame-synchronous simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One `step` per external frame tick, run to completion
//! - No rendering or audio dependencies
//! - Collections are never mutated while they are being scanned

pub mod collision;
pub mod combat;
pub mod grid;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Axis, AxisMove, find_overlap, overlaps, point_in_rect, resolve_axis};
pub use grid::TileGrid;
pub use state::{
    Actor, Bullet, Creature, Entity, EntityTag, Facing, GameEvent, GrubBrain, KillCause,
    LifeState, Owner, Player, PowerUpKind, Role, Snapshot, Sprite, World,
};
pub use tick::{StepInput, step};
pub use timers::FireControl;

/// Current score of a world
pub fn get_score(world: &World) -> u64 {
    world.score()
}
