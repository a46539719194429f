//! Combat outcomes: stomps, contact deaths, bullet hits and power-ups

use super::collision::{find_overlap, point_in_rect};
use super::state::{GameEvent, KillCause, PowerUpKind, Role, World};

/// Resolve the player touching another entity.
///
/// With `can_kill` (the player was falling) a hostile creature is stomped;
/// otherwise touching it kills the player. Power-ups are collected either way.
pub fn check_player_collision(world: &mut World, can_kill: bool, events: &mut Vec<GameEvent>) {
    if !world.player.creature.is_alive() {
        return;
    }

    let Some(index) = find_overlap(&world.player.sprite, &world.entities) else {
        return;
    };

    match world.entities[index].role {
        Role::PowerUp(kind) => acquire_power_up(world, index, kind, events),
        Role::Grub(_) if can_kill => stomp(world, index, events),
        Role::Grub(_) => {
            if world.player.kill() {
                log::debug!("Player killed by contact with entity {}", world.entities[index].id);
                events.push(GameEvent::PlayerDied);
            }
        }
    }
}

/// Kill the creature under the player and bounce off it
fn stomp(world: &mut World, index: usize, events: &mut Vec<GameEvent>) {
    let tuning = world.tuning;
    let enemy = &mut world.entities[index];
    if !enemy.kill() {
        return;
    }
    let (id, top) = (enemy.id, enemy.sprite.pos.y);

    let player = &mut world.player;
    player.sprite.pos.y = top - player.sprite.size.y;
    player.jump(true, tuning.jump_speed);

    reward_kill(world);
    log::debug!("Entity {id} stomped");
    events.push(GameEvent::EnemyKilled {
        id,
        cause: KillCause::Stomp,
    });
}

fn reward_kill(world: &mut World) {
    let tuning = world.tuning;
    world.add_score(tuning.kill_score);
    let health = &mut world.player.creature.health;
    *health = health.saturating_add(tuning.kill_heal);
}

/// Remove a power-up from the world and apply its effect
pub fn acquire_power_up(
    world: &mut World,
    index: usize,
    kind: PowerUpKind,
    events: &mut Vec<GameEvent>,
) {
    world.entities.remove(index);
    log::debug!("Picked up {kind:?}");
    events.push(GameEvent::PowerUp(kind));

    match kind {
        PowerUpKind::Star => {}
        PowerUpKind::Music => events.push(GameEvent::TrackMuteToggle),
        PowerUpKind::Goal => events.push(GameEvent::LoadNextLevel),
        PowerUpKind::Mushroom => {
            let heal = world.tuning.mushroom_heal;
            let health = &mut world.player.creature.health;
            *health = health.saturating_add(heal);
        }
    }
}

/// Bullets against their targets: enemy fire vs. the player, player fire vs. grubs.
///
/// A hit is the bullet's position strictly inside the target's box.
pub fn resolve_bullet_hits(world: &mut World, events: &mut Vec<GameEvent>) {
    let tuning = world.tuning;

    let player = &world.player.sprite;
    if let Some(i) = world
        .enemy_bullets
        .iter()
        .position(|b| point_in_rect(b.pos, player))
    {
        world.enemy_bullets.remove(i);
        let health = &mut world.player.creature.health;
        *health = health.saturating_sub(tuning.enemy_bullet_damage);
        events.push(GameEvent::PlayerHit {
            damage: tuning.enemy_bullet_damage,
        });
        // Lethal damage lands before any kill reward this frame
        check_player_health(world, events);
    }

    let mut spent = Vec::new();
    let mut killed = Vec::new();
    for enemy in world.entities.iter_mut().filter(|e| e.is_grub()) {
        if !enemy.is_tangible() {
            continue;
        }
        let hit = world
            .player_bullets
            .iter()
            .find(|b| !spent.contains(&b.id) && point_in_rect(b.pos, &enemy.sprite));
        if let Some(bullet) = hit {
            spent.push(bullet.id);
            if enemy.kill() {
                killed.push(enemy.id);
            }
        }
    }
    world.player_bullets.retain(|b| !spent.contains(&b.id));

    for id in killed {
        reward_kill(world);
        log::debug!("Entity {id} shot");
        events.push(GameEvent::EnemyKilled {
            id,
            cause: KillCause::Bullet,
        });
    }
}

/// Any frame that ends with the player alive at zero health kills them
pub fn check_player_health(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.player.creature.health <= 0 && world.player.kill() {
        log::debug!("Player ran out of health");
        events.push(GameEvent::PlayerDied);
    }
}
