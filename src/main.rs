//! Grubfall headless runner
//!
//! Plays a scripted run through a map pack and logs what happens.
//!
//! ```text
//! grubfall [map.txt] [tuning.json]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

use grubfall::Tuning;
use grubfall::audio::AudioManager;
use grubfall::game::Game;
use grubfall::level::{LevelPack, LevelSource};
use grubfall::sim::{GameEvent, StepInput};

/// Fixed frame length for the scripted run (ms)
const FRAME_MS: u64 = 16;
const FRAMES: u32 = 900;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Grubfall (headless) starting...");

    let mut args = std::env::args().skip(1);
    let map_path = args.next().map(PathBuf::from);
    let tuning_path = args.next().map(PathBuf::from);

    let tuning = match &tuning_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning file {}", path.display()))?;
            Tuning::from_json(&json)
                .with_context(|| format!("failed to parse tuning file {}", path.display()))?
        }
        None => Tuning::default(),
    };

    let pack = match &map_path {
        Some(path) => LevelPack::from_files(&[path], tuning.tile_size)?,
        None => LevelPack::builtin(tuning.tile_size),
    };

    run(pack, tuning)
}

/// Scripted controls: run right, hop every so often, shoot in bursts
fn scripted_input(frame: u32) -> StepInput {
    StepInput {
        move_right: frame % 240 < 200,
        move_left: frame % 240 >= 220,
        jump: frame % 45 == 0,
        fire: frame % 60 < 30,
        exit: frame + 1 >= FRAMES,
    }
}

fn run<S: LevelSource>(levels: S, tuning: Tuning) -> Result<()> {
    let mut game = Game::new(levels, tuning).context("failed to load the first level")?;
    let mut audio = AudioManager::new();
    let mut deaths = 0u32;

    for frame in 0..FRAMES {
        let input = scripted_input(frame);
        let events = game.frame(FRAME_MS, &input)?;

        for event in &events {
            match event {
                GameEvent::CollidedHorizontal(_) | GameEvent::CollidedVertical(_) => {}
                GameEvent::PlayerDied => {
                    deaths += 1;
                    log::info!("frame {frame}: {event:?}");
                }
                _ => log::info!("frame {frame}: {event:?}"),
            }
        }
        for cue in audio.handle(&events) {
            log::debug!("frame {frame}: play {} (echo: {})", cue.effect.asset_path(), cue.echo);
        }

        if input.exit {
            break;
        }
    }

    let snapshot = game.world().snapshot();
    log::debug!(
        "Final snapshot: {}",
        serde_json::to_string(&snapshot).context("failed to encode snapshot")?
    );
    println!(
        "Level {} | score {} | health {} | deaths {}",
        game.level_number(),
        game.score(),
        snapshot.player.health,
        deaths
    );
    Ok(())
}
