//! Cooldowns, lifespans and AI clocks
//!
//! All counters live on the world or on the entity they belong to; the
//! functions here only advance them.

use serde::{Deserialize, Serialize};

use super::state::{Bullet, Creature, Facing, GrubBrain, LifeState, Player, Sprite};
use crate::tuning::Tuning;

/// Player weapon cooldown state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireControl {
    /// Time since the last shot (ms)
    pub since_shot_ms: u64,
    /// Shots fired in the current burst
    pub shots: u32,
    /// Cooldown accrued since the burst limit was reached (ms)
    pub overheat_ms: u64,
}

impl FireControl {
    pub fn accrue(&mut self, elapsed_ms: u64) {
        self.since_shot_ms = self.since_shot_ms.saturating_add(elapsed_ms);
    }

    pub fn can_fire(&self, tuning: &Tuning) -> bool {
        self.since_shot_ms >= tuning.shot_cooldown_ms && self.shots < tuning.burst_limit
    }

    /// Consume a shot if the cooldown allows it
    pub fn try_fire(&mut self, tuning: &Tuning) -> bool {
        if !self.can_fire(tuning) {
            return false;
        }
        self.since_shot_ms = 0;
        self.shots += 1;
        true
    }

    pub fn is_overheated(&self, tuning: &Tuning) -> bool {
        self.shots >= tuning.burst_limit
    }

    /// End-of-frame bookkeeping: once a full burst has cooled down, reset it
    pub fn settle(&mut self, elapsed_ms: u64, tuning: &Tuning) {
        if !self.is_overheated(tuning) {
            return;
        }
        self.overheat_ms = self.overheat_ms.saturating_add(elapsed_ms);
        if self.overheat_ms >= tuning.overheat_ms {
            self.overheat_ms = 0;
            self.shots = 0;
        }
    }
}

/// Accrue idle time and convert every full interval into health.
///
/// Any input resets the partial interval. Returns the health gained.
pub fn accrue_idle(player: &mut Player, idle: bool, elapsed_ms: u64, tuning: &Tuning) -> i32 {
    player.idle = idle;
    if !idle || !player.creature.is_alive() {
        player.idle_ms = 0;
        return 0;
    }

    player.idle_ms = player.idle_ms.saturating_add(elapsed_ms);
    let interval = tuning.idle_regen_ms.max(1);
    let ticks = player.idle_ms / interval;
    player.idle_ms %= interval;

    let gained = tuning.idle_regen_amount.saturating_mul(ticks as i32);
    player.creature.health = player.creature.health.saturating_add(gained);
    gained
}

/// Advance a creature's state clock. Returns true the frame it becomes dead.
pub fn advance_lifecycle(creature: &mut Creature, elapsed_ms: u64, tuning: &Tuning) -> bool {
    creature.state_ms = creature.state_ms.saturating_add(elapsed_ms);
    creature.state() == LifeState::Dying
        && creature.state_ms >= tuning.die_time_ms
        && creature.set_state(LifeState::Dead)
}

/// Run a grub's sleep/wake/fire clock for one frame
pub fn tick_grub(
    brain: &mut GrubBrain,
    sprite: &mut Sprite,
    creature: &mut Creature,
    elapsed_ms: u64,
    tuning: &Tuning,
) {
    if !creature.is_alive() {
        return;
    }

    if brain.awake {
        brain.fire_ms = brain.fire_ms.saturating_add(elapsed_ms);
    } else {
        brain.wake_ms = brain.wake_ms.saturating_add(elapsed_ms);
        if brain.wake_ms >= tuning.grub_wake_ms {
            brain.awake = true;
            brain.wake_ms = 0;
            sprite.vel.x = -brain.max_speed;
            creature.facing = Facing::Left;
        }
    }

    if brain.fire_ms >= tuning.grub_fire_interval_ms {
        brain.fire_requested = true;
        // Remainder carries into the next cycle
        brain.fire_ms -= tuning.grub_fire_interval_ms;
    }
}

pub fn bullet_expired(bullet: &Bullet, tuning: &Tuning) -> bool {
    bullet.age_ms > tuning.bullet_lifespan_ms
}
