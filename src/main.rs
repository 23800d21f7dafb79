//! forceplay headless runner.
//!
//! Drives the demo scene from `forceplay::game` at a fixed tick rate without a window:
//!
//! 1. Load `config.ini` (defaults if missing) and initialize the ECS world
//! 2. Start the sound worker with a logging backend
//! 3. Spawn walkers that wander the arena under forces
//! 4. Run the main loop: advance time, wander, move, forward sound requests
//! 5. Stop the sound worker on exit
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --ticks 600
//! ```

use forceplay::game;
use forceplay::resources::gameconfig::GameConfig;
use forceplay::resources::soundcontroller::{setup_sound, shutdown_sound};
use forceplay::resources::soundengine::LogSoundEngine;
use forceplay::resources::tickclock::TickClock;
use forceplay::resources::worldtime::WorldTime;
use forceplay::systems::forces::force_movement_system;
use forceplay::systems::sound::{forward_sound_requests, update_sound_requests};
use forceplay::systems::time::update_world_time;
use bevy_ecs::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Force movement and sound dispatch demo
#[derive(Parser)]
#[command(version, about = "Headless force movement and sound dispatch demo")]
struct Cli {
    /// Path of the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of ticks to simulate before exiting.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Number of walkers to spawn.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=6))]
    walkers: u8,

    /// Seed for the walkers' random destinations.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    save_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }

    if cli.save_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", cli.config.display());
        return;
    }

    // --------------- ECS world + resources ---------------
    let frame_delta = config.frame_delta();
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    world.insert_resource(TickClock::new());
    world.insert_resource(config);

    // Sound worker must be up before gameplay starts writing requests.
    if let Err(e) = setup_sound(&mut world, LogSoundEngine::new) {
        log::error!("Failed to start sound worker: {}", e);
        std::process::exit(1);
    }

    game::setup(&mut world, usize::from(cli.walkers), cli.seed);

    let mut update = Schedule::default();
    update.add_systems(game::wander_system);
    update.add_systems(force_movement_system.after(game::wander_system));
    update.add_systems(
        // sound systems must be together
        (
            update_sound_requests,
            forward_sound_requests::<LogSoundEngine>,
        )
            .chain()
            .after(game::wander_system),
    );

    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    let frame = Duration::from_secs_f32(frame_delta);
    let halt_at = cli.ticks / 2;
    for tick in 0..cli.ticks {
        let started = Instant::now();

        // Freeze everyone for a second halfway through.
        if tick == halt_at {
            world.resource::<game::HaltSwitch>().set(true);
            log::info!("walkers halted");
        } else if tick == halt_at + u64::from(world.resource::<GameConfig>().target_tps) {
            world.resource::<game::HaltSwitch>().set(false);
            log::info!("walkers released");
        }

        update_world_time(&mut world, frame_delta);
        update.run(&mut world);
        world.clear_trackers();

        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let ticks = world.resource::<TickClock>().ticks();
    log::info!("simulated {} frames ({} ms of game time)", cli.ticks, ticks);
    shutdown_sound::<LogSoundEngine>(&mut world);
}
