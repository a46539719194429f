//! Level-transition driver
//!
//! `step` only asks for a new level; [`Game`] services those requests from a
//! [`LevelSource`] and carries the score across worlds.

use crate::level::{LevelError, LevelSource};
use crate::sim::{GameEvent, StepInput, World, step};
use crate::tuning::Tuning;

pub struct Game<S: LevelSource> {
    levels: S,
    tuning: Tuning,
    world: World,
    level_number: u32,
}

impl<S: LevelSource> Game<S> {
    /// Load the first level
    pub fn new(mut levels: S, tuning: Tuning) -> Result<Self, LevelError> {
        let world = World::from_level(levels.load_next()?, tuning);
        log::info!("Level 1 loaded");
        Ok(Self {
            levels,
            tuning,
            world,
            level_number: 1,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn score(&self) -> u64 {
        self.world.score()
    }

    /// Levels entered so far, counting the first
    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    /// Run one frame and apply any level change it requested
    pub fn frame(&mut self, elapsed_ms: u64, input: &StepInput) -> Result<Vec<GameEvent>, LevelError> {
        let events = step(&mut self.world, elapsed_ms, input);

        if events.contains(&GameEvent::ReloadLevel) {
            let level = self.levels.reload()?;
            self.replace_world(World::from_level(level, self.tuning));
            log::info!("Level {} reloaded (score {})", self.level_number, self.score());
        } else if events.contains(&GameEvent::LoadNextLevel) {
            let level = self.levels.load_next()?;
            self.replace_world(World::from_level(level, self.tuning));
            self.level_number += 1;
            log::info!("Advanced to level {} (score {})", self.level_number, self.score());
        }

        Ok(events)
    }

    fn replace_world(&mut self, mut world: World) {
        world.add_score(self.world.score());
        self.world = world;
    }
}
