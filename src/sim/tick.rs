//! Per-frame simulation step
//!
//! `step` is the only mutator of a [`World`]. Phases run in a fixed order
//! every frame: physics settles before combat, combat before cooldowns.

use glam::Vec2;

use super::collision::{Axis, resolve_axis};
use super::combat;
use super::grid::TileGrid;
use super::state::{Actor, Facing, GameEvent, LifeState, Owner, Role, Sprite, World};
use super::timers;

/// Input flags for a single frame.
///
/// `jump` and `exit` are expected edge-triggered (initial press only), the
/// others hold while the key is down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub fire: bool,
    /// Stop requested; handled by whoever drives the frame loop
    pub exit: bool,
}

impl StepInput {
    /// Directional or jump input counts as activity; firing does not
    pub fn is_idle(&self) -> bool {
        !(self.move_left || self.move_right || self.jump)
    }
}

/// Advance the world by `elapsed_ms` and return what happened
pub fn step(world: &mut World, elapsed_ms: u64, input: &StepInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Player is dead: the caller swaps in a fresh world
    if world.player.creature.state() == LifeState::Dead {
        events.push(GameEvent::ReloadLevel);
        return events;
    }

    let tuning = world.tuning;

    // Timers
    world.fire.accrue(elapsed_ms);
    timers::accrue_idle(&mut world.player, input.is_idle(), elapsed_ms, &tuning);

    apply_input(world, input, &mut events);

    update_player(world, elapsed_ms, &mut events);
    update_grub_physics(world, elapsed_ms, &mut events);

    update_sprites(world, elapsed_ms);

    advance_bullets(world, elapsed_ms);
    spawn_enemy_fire(world, &mut events);

    combat::resolve_bullet_hits(world, &mut events);
    combat::check_player_health(world, &mut events);

    world.fire.settle(elapsed_ms, &tuning);

    events
}

/// Translate held keys into player velocity, jumps and shots
fn apply_input(world: &mut World, input: &StepInput, events: &mut Vec<GameEvent>) {
    let tuning = world.tuning;
    let player = &mut world.player;
    if player.creature.is_alive() {
        let mut velocity_x = 0.0;
        if input.move_left {
            velocity_x -= player.max_speed;
            player.creature.facing = Facing::Left;
        }
        if input.move_right {
            velocity_x += player.max_speed;
            player.creature.facing = Facing::Right;
        }
        if input.jump {
            player.jump(false, tuning.jump_speed);
        }
        player.sprite.vel.x = velocity_x;
    }

    // FireControl alone gates firing
    if input.fire && world.fire.try_fire(&tuning) {
        let (pos, facing) = (world.player.sprite.pos, world.player.creature.facing);
        world.spawn_bullet(pos, facing, Owner::Player);
        events.push(GameEvent::ShotFired);
    }
}

fn apply_gravity(sprite: &mut Sprite, flying: bool, gravity: f32, dt: f32) {
    if !flying {
        sprite.vel.y += gravity * dt;
    }
}

/// Player physics, with contact checks after each axis
fn update_player(world: &mut World, elapsed_ms: u64, events: &mut Vec<GameEvent>) {
    let dt = elapsed_ms as f32;
    let gravity = world.tuning.gravity;

    let player = &mut world.player;
    apply_gravity(&mut player.sprite, player.creature.flying, gravity, dt);

    let x = resolve_axis(&world.grid, &player.sprite, player.sprite.vel.x * dt, Axis::X);
    player.sprite.pos.x = x.position;
    if x.collided {
        player.collide_horizontal();
        events.push(GameEvent::CollidedHorizontal(Actor::Player));
    }
    combat::check_player_collision(world, false, events);

    let player = &mut world.player;
    let old_y = player.sprite.pos.y;
    let y = resolve_axis(&world.grid, &player.sprite, player.sprite.vel.y * dt, Axis::Y);
    player.set_y(y.position);
    if y.collided {
        player.collide_vertical();
        events.push(GameEvent::CollidedVertical(Actor::Player));
    }
    let can_kill = old_y < world.player.sprite.pos.y;
    combat::check_player_collision(world, can_kill, events);

    stride_bonus(world);
}

/// Crossing tile columns is worth one health per column
fn stride_bonus(world: &mut World) {
    let player = &mut world.player;
    if !player.creature.is_alive() {
        return;
    }
    let column = world.grid.pixels_to_tiles(player.sprite.pos.x);
    if column != player.column {
        let crossed = (column - player.column).abs();
        player.creature.health = player.creature.health.saturating_add(crossed);
        player.column = column;
    }
}

/// Move one body along X then Y. Returns which axes hit the grid.
fn move_body(grid: &TileGrid, sprite: &mut Sprite, dt: f32) -> (bool, bool) {
    let x = resolve_axis(grid, sprite, sprite.vel.x * dt, Axis::X);
    sprite.pos.x = x.position;
    if x.collided {
        sprite.vel.x = 0.0;
    }

    let y = resolve_axis(grid, sprite, sprite.vel.y * dt, Axis::Y);
    sprite.pos.y = y.position;
    if y.collided {
        sprite.vel.y = 0.0;
    }
    (x.collided, y.collided)
}

fn update_grub_physics(world: &mut World, elapsed_ms: u64, events: &mut Vec<GameEvent>) {
    let dt = elapsed_ms as f32;
    let gravity = world.tuning.gravity;

    for entity in &mut world.entities {
        let Some(creature) = &entity.creature else {
            continue;
        };
        if entity.is_dead() {
            continue;
        }
        apply_gravity(&mut entity.sprite, creature.flying, gravity, dt);

        let (hit_x, hit_y) = move_body(&world.grid, &mut entity.sprite, dt);
        if hit_x {
            events.push(GameEvent::CollidedHorizontal(Actor::Entity(entity.id)));
        }
        if hit_y {
            events.push(GameEvent::CollidedVertical(Actor::Entity(entity.id)));
        }
    }
}

/// Lifecycle clocks and AI; dead enemies leave the world
fn update_sprites(world: &mut World, elapsed_ms: u64) {
    let tuning = world.tuning;

    timers::advance_lifecycle(&mut world.player.creature, elapsed_ms, &tuning);

    world.entities.retain(|e| !e.is_dead());

    for entity in &mut world.entities {
        let Some(creature) = entity.creature.as_mut() else {
            continue;
        };
        timers::advance_lifecycle(creature, elapsed_ms, &tuning);
        if let Role::Grub(brain) = &mut entity.role {
            timers::tick_grub(brain, &mut entity.sprite, creature, elapsed_ms, &tuning);
        }
    }
}

/// Fly bullets; expired or walled-in ones are removed after the scan
fn advance_bullets(world: &mut World, elapsed_ms: u64) {
    let tuning = world.tuning;
    let grid = &world.grid;

    for bullets in [&mut world.player_bullets, &mut world.enemy_bullets] {
        let mut spent = Vec::new();
        for bullet in bullets.iter_mut() {
            bullet.advance(elapsed_ms);
            let in_wall = grid.has_tile(
                grid.pixels_to_tiles(bullet.pos.x),
                grid.pixels_to_tiles(bullet.pos.y),
            );
            if timers::bullet_expired(bullet, &tuning) || in_wall {
                spent.push(bullet.id);
            }
        }
        bullets.retain(|b| !spent.contains(&b.id));
    }
}

/// Grubs that asked to fire get a bullet in their direction of travel
fn spawn_enemy_fire(world: &mut World, events: &mut Vec<GameEvent>) {
    let mut requests: Vec<(u32, Vec2, Facing)> = Vec::new();
    for entity in &mut world.entities {
        if let Role::Grub(brain) = &mut entity.role
            && brain.fire_requested
        {
            brain.fire_requested = false;
            let facing = Facing::of_velocity(entity.sprite.vel.x);
            requests.push((entity.id, entity.sprite.pos, facing));
        }
    }

    for (by, pos, facing) in requests {
        world.spawn_bullet(pos, facing, Owner::Enemy);
        events.push(GameEvent::EnemyShotFired { by });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{KillCause, PowerUpKind};
    use crate::tuning::Tuning;

    const FRAME_MS: u64 = 16;

    fn empty_world() -> World {
        World::new(TileGrid::new(40, 12, 64), Vec2::new(192.0, 0.0), Tuning::default())
    }

    /// Player standing on a full-width floor at row 5
    fn floored_world() -> World {
        let mut grid = TileGrid::new(40, 8, 64);
        for col in 0..40 {
            grid.set_solid(col, 5, true);
        }
        let tuning = Tuning::default();
        let mut world = World::new(grid, Vec2::new(192.0, 320.0 - tuning.player_size.y), tuning);
        world.player.on_ground = true;
        world
    }

    fn fire() -> StepInput {
        StepInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_free_fall_accumulates_gravity() {
        let mut world = empty_world();
        let input = StepInput::default();
        for _ in 0..10 {
            step(&mut world, FRAME_MS, &input);
        }
        assert!((world.player.sprite.vel.y - 0.32).abs() < 1e-5);
        assert!(world.player.sprite.pos.y > 0.0);
    }

    #[test]
    fn test_falls_past_grid_bottom() {
        let mut world = empty_world();
        let input = StepInput::default();
        for _ in 0..200 {
            step(&mut world, FRAME_MS, &input);
        }
        let floor_px = world.grid().tiles_to_pixels(world.grid().height());
        assert!(world.player.sprite.pos.y > floor_px);
    }

    #[test]
    fn test_landing_emits_vertical_collision() {
        let mut world = floored_world();
        let events = step(&mut world, FRAME_MS, &StepInput::default());
        assert!(events.contains(&GameEvent::CollidedVertical(Actor::Player)));
        assert_eq!(world.player.sprite.vel.y, 0.0);
        assert_eq!(world.player.sprite.pos.y, 320.0 - world.player.sprite.size.y);
        assert!(world.player.on_ground);
    }

    #[test]
    fn test_running_into_wall() {
        let mut world = floored_world();
        for row in 0..5 {
            world.grid.set_solid(5, row, true);
        }
        let input = StepInput {
            move_right: true,
            ..Default::default()
        };
        let mut hit = false;
        for _ in 0..30 {
            let events = step(&mut world, FRAME_MS, &input);
            hit |= events.contains(&GameEvent::CollidedHorizontal(Actor::Player));
        }
        assert!(hit);
        assert_eq!(world.player.sprite.pos.x, 320.0 - world.player.sprite.size.x);
        assert_eq!(world.player.creature.facing, Facing::Right);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut world = floored_world();
        step(&mut world, FRAME_MS, &StepInput::default());
        let ground_y = world.player.sprite.pos.y;

        let jump = StepInput {
            jump: true,
            ..Default::default()
        };
        step(&mut world, FRAME_MS, &jump);
        assert!(world.player.sprite.pos.y < ground_y);
        assert!(world.player.is_jumping());
    }

    #[test]
    fn test_stride_bonus_per_column() {
        let mut world = floored_world();
        let start = world.player.creature.health;
        world.player.sprite.pos.x = 3.0 * 64.0 + 60.0;
        step(&mut world, FRAME_MS, &StepInput::default());
        world.player.sprite.pos.x = 6.0 * 64.0;
        step(&mut world, FRAME_MS, &StepInput::default());
        assert_eq!(world.player.column, 6);
        assert_eq!(world.player.creature.health, start + 3);
    }

    #[test]
    fn test_idle_regen() {
        let mut world = floored_world();
        let start = world.player.creature.health;
        for _ in 0..10 {
            step(&mut world, 100, &StepInput::default());
        }
        assert_eq!(world.player.creature.health, start + 5);

        // Movement resets the partial second
        for _ in 0..9 {
            step(&mut world, 100, &StepInput::default());
        }
        let moving = StepInput {
            move_left: true,
            ..Default::default()
        };
        step(&mut world, 1, &moving);
        assert_eq!(world.player.idle_ms, 0);
    }

    #[test]
    fn test_fire_rate_cap() {
        let mut world = floored_world();
        let tuning = world.tuning;

        for shot in 1..=tuning.burst_limit {
            let events = step(&mut world, tuning.shot_cooldown_ms, &fire());
            assert!(events.contains(&GameEvent::ShotFired), "shot {shot}");
        }
        assert_eq!(world.fire.shots, tuning.burst_limit);

        // Cooldown satisfied but the burst is spent
        let events = step(&mut world, tuning.shot_cooldown_ms, &fire());
        assert!(!events.contains(&GameEvent::ShotFired));
        assert_eq!(world.fire.shots, tuning.burst_limit);

        // Let the overheat run out
        let mut waited = world.fire.overheat_ms;
        while world.fire.shots != 0 {
            step(&mut world, 100, &StepInput::default());
            waited += 100;
        }
        assert!(waited >= tuning.overheat_ms);
        assert_eq!(world.fire.shots, 0);

        let events = step(&mut world, FRAME_MS, &fire());
        assert!(events.contains(&GameEvent::ShotFired));
        assert_eq!(world.fire.shots, 1);
    }

    #[test]
    fn test_dying_player_can_still_fire() {
        let mut world = floored_world();
        world.player.kill();

        let events = step(&mut world, 250, &fire());
        assert!(events.contains(&GameEvent::ShotFired));
        assert_eq!(world.player_bullets.len(), 1);

        // Movement stays locked
        let right = StepInput {
            move_right: true,
            ..Default::default()
        };
        step(&mut world, FRAME_MS, &right);
        assert_eq!(world.player.sprite.vel.x, 0.0);
    }

    #[test]
    fn test_enemy_hit_kills_before_shot_reward() {
        let mut world = floored_world();
        world.player.creature.health = 5;
        let offset = world.tuning.bullet_spawn_offset_y;
        let muzzle = world.player.sprite.pos + Vec2::new(10.0, 10.0 - offset);
        world.spawn_bullet(muzzle, Facing::Left, Owner::Enemy);
        world.enemy_bullets[0].vel = Vec2::ZERO;

        let grub_y = 320.0 - world.tuning.grub_size.y;
        let grub = world.spawn_grub(Vec2::new(600.0, grub_y));
        world.spawn_bullet(Vec2::new(610.0, grub_y - 20.0), Facing::Right, Owner::Player);
        world.player_bullets[0].vel = Vec2::ZERO;

        let events = step(&mut world, FRAME_MS, &StepInput::default());

        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(events.contains(&GameEvent::EnemyKilled {
            id: grub,
            cause: KillCause::Bullet
        }));
        assert_eq!(world.player.creature.state(), LifeState::Dying);
    }

    #[test]
    fn test_shots_are_spaced_by_cooldown() {
        let mut world = floored_world();
        let mut fired = 0;
        for _ in 0..25 {
            let events = step(&mut world, 20, &fire());
            fired += events.iter().filter(|e| **e == GameEvent::ShotFired).count();
        }
        // 500ms of held fire at a 200ms cooldown
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_bullet_expires_after_lifespan() {
        let mut world = empty_world();
        world.player.creature.flying = true;
        world.spawn_bullet(Vec2::new(10.0, 0.0), Facing::Right, Owner::Player);
        world.player_bullets[0].vel = Vec2::ZERO;

        for _ in 0..4 {
            step(&mut world, 100, &StepInput::default());
        }
        assert_eq!(world.player_bullets.len(), 1, "age == lifespan is not expired");

        step(&mut world, 1, &StepInput::default());
        assert!(world.player_bullets.is_empty());
    }

    #[test]
    fn test_bullet_stops_in_wall() {
        let mut world = empty_world();
        world.player.creature.flying = true;
        world.grid.set_solid(4, 0, true);
        world.spawn_bullet(Vec2::new(200.0, 0.0), Facing::Right, Owner::Player);

        step(&mut world, 50, &StepInput::default());
        assert_eq!(world.player_bullets.len(), 1);
        step(&mut world, 10, &StepInput::default());
        assert!(world.player_bullets.is_empty());
    }

    #[test]
    fn test_bullet_leaving_grid_keeps_flying() {
        let mut world = empty_world();
        world.player.creature.flying = true;
        world.spawn_bullet(Vec2::new(20.0, 0.0), Facing::Left, Owner::Player);
        step(&mut world, 100, &StepInput::default());
        assert_eq!(world.player_bullets.len(), 1);
        assert!(world.player_bullets[0].pos.x < 0.0);
    }

    #[test]
    fn test_grub_wakes_after_half_second() {
        let mut world = floored_world();
        let id = world.spawn_grub(Vec2::new(1500.0, 320.0 - world.tuning.grub_size.y));
        for _ in 0..4 {
            step(&mut world, 100, &StepInput::default());
        }
        let Role::Grub(brain) = &world.entity(id).unwrap().role else {
            panic!("expected grub");
        };
        assert!(!brain.awake);

        step(&mut world, 100, &StepInput::default());
        let grub = world.entity(id).unwrap();
        let Role::Grub(brain) = &grub.role else {
            panic!("expected grub");
        };
        assert!(brain.awake);
        assert_eq!(grub.sprite.vel.x, -world.tuning.grub_max_speed);
    }

    #[test]
    fn test_awake_grub_fires_left() {
        let mut world = floored_world();
        let id = world.spawn_grub(Vec2::new(1500.0, 320.0 - world.tuning.grub_size.y));
        let mut shots = 0;
        for _ in 0..9 {
            let events = step(&mut world, 100, &StepInput::default());
            shots += events
                .iter()
                .filter(|e| **e == GameEvent::EnemyShotFired { by: id })
                .count();
        }
        // Awake at 500ms, first shot 400ms later
        assert_eq!(shots, 1);
        assert_eq!(world.enemy_bullets.len(), 1);
        assert!(world.enemy_bullets[0].vel.x < 0.0);
    }

    #[test]
    fn test_bullet_kills_grub() {
        let mut world = floored_world();
        let grub_y = 320.0 - world.tuning.grub_size.y;
        let id = world.spawn_grub(Vec2::new(600.0, grub_y));
        // Bullet already inside the grub's box
        world.spawn_bullet(Vec2::new(610.0, grub_y - 20.0), Facing::Right, Owner::Player);
        world.player_bullets[0].vel = Vec2::ZERO;
        let health = world.player.creature.health;

        let events = step(&mut world, FRAME_MS, &StepInput::default());

        assert!(world.player_bullets.is_empty());
        let grub = world.entity(id).unwrap();
        assert_eq!(grub.creature.as_ref().unwrap().state(), LifeState::Dying);
        assert_eq!(world.score(), 10);
        assert_eq!(world.player.creature.health, health + 10);
        assert!(events.contains(&GameEvent::EnemyKilled {
            id,
            cause: KillCause::Bullet
        }));
    }

    #[test]
    fn test_mushroom_pickup() {
        let mut world = floored_world();
        let pos = world.player.sprite.pos + Vec2::new(10.0, 10.0);
        world.spawn_power_up(PowerUpKind::Mushroom, pos);
        let health = world.player.creature.health;

        let events = step(&mut world, FRAME_MS, &StepInput::default());

        assert!(world.entities.is_empty());
        assert!(events.contains(&GameEvent::PowerUp(PowerUpKind::Mushroom)));
        assert_eq!(world.player.creature.health, health + 5);
        assert_eq!(world.score(), 0);
    }

    #[test]
    fn test_falling_onto_grub_is_a_stomp() {
        let mut world = floored_world();
        let grub_y = 320.0 - world.tuning.grub_size.y;
        let id = world.spawn_grub(Vec2::new(192.0, grub_y));
        // Player just above the grub, falling
        world.player.sprite.pos.y = grub_y - world.player.sprite.size.y - 2.0;
        world.player.sprite.vel.y = 0.3;
        world.player.on_ground = false;

        let events = step(&mut world, FRAME_MS, &StepInput::default());

        assert!(events.contains(&GameEvent::EnemyKilled {
            id,
            cause: KillCause::Stomp
        }));
        assert!(world.player.creature.is_alive());
        assert_eq!(world.player.sprite.vel.y, world.tuning.jump_speed);
        assert_eq!(world.score(), 10);
    }

    #[test]
    fn test_walking_into_grub_kills_player() {
        let mut world = floored_world();
        let grub_y = 320.0 - world.tuning.grub_size.y;
        world.spawn_grub(Vec2::new(192.0 + 50.0, grub_y));
        step(&mut world, FRAME_MS, &StepInput::default());

        let right = StepInput {
            move_right: true,
            ..Default::default()
        };
        let events = step(&mut world, FRAME_MS, &right);
        assert!(events.contains(&GameEvent::PlayerDied));
        assert_eq!(world.player.creature.state(), LifeState::Dying);
    }

    #[test]
    fn test_dead_player_requests_reload() {
        let mut world = floored_world();
        world.player.kill();
        let idle = StepInput::default();
        let events = step(&mut world, 999, &idle);
        assert!(!events.contains(&GameEvent::ReloadLevel));

        step(&mut world, 1, &idle);
        assert_eq!(world.player.creature.state(), LifeState::Dead);

        let pos = world.player.sprite.pos;
        let events = step(&mut world, FRAME_MS, &idle);
        assert_eq!(events, vec![GameEvent::ReloadLevel]);
        assert_eq!(world.player.sprite.pos, pos);
    }

    #[test]
    fn test_dead_grubs_are_dropped() {
        let mut world = floored_world();
        let id = world.spawn_grub(Vec2::new(1500.0, 320.0 - world.tuning.grub_size.y));
        world.entities[0].kill();
        let die_time = world.tuning.die_time_ms;
        step(&mut world, die_time, &StepInput::default());
        assert!(world.entity(id).unwrap().is_dead());
        step(&mut world, FRAME_MS, &StepInput::default());
        assert!(world.entity(id).is_none());
    }

    #[test]
    fn test_enemy_fire_drains_health() {
        let mut world = floored_world();
        world.player.creature.health = 5;
        let offset = world.tuning.bullet_spawn_offset_y;
        let muzzle = world.player.sprite.pos + Vec2::new(10.0, 10.0 - offset);
        world.spawn_bullet(muzzle, Facing::Left, Owner::Enemy);
        world.enemy_bullets[0].vel = Vec2::ZERO;

        let events = step(&mut world, FRAME_MS, &StepInput::default());
        assert!(events.contains(&GameEvent::PlayerHit { damage: 5 }));
        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(world.enemy_bullets.is_empty());
    }
}
