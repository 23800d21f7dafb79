//! Game configuration resource.
//!
//! Manages simulation settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [loop]
//! target_tps = 60
//! time_scale = 1.0
//!
//! [movement]
//! reach_tolerance = 5.0
//!
//! [sound]
//! lock_time = 50
//! staleness_window = 500
//! idle_ms = 20
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use crate::components::movementcontroller::DEFAULT_REACH_TOLERANCE;
use crate::resources::soundcontroller::DEFAULT_LOCK_TIME;
use crate::resources::sounddispatch::{DEFAULT_IDLE_INTERVAL, DEFAULT_STALENESS_WINDOW};

/// Default safe values for startup
const DEFAULT_TARGET_TPS: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Simulation ticks per second of the main loop.
    pub target_tps: u32,
    /// Multiplier applied to frame time.
    pub time_scale: f32,
    /// Distance under which a force target counts as reached.
    pub reach_tolerance: f32,
    /// Minimum ticks between two rate-limited sound dispatches.
    pub sound_lock_time: u64,
    /// Age in ticks after which queued sound work is dropped.
    pub sound_staleness_window: u64,
    /// Idle wait of the sound worker, in milliseconds.
    pub sound_idle_ms: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            target_tps: DEFAULT_TARGET_TPS,
            time_scale: DEFAULT_TIME_SCALE,
            reach_tolerance: DEFAULT_REACH_TOLERANCE,
            sound_lock_time: DEFAULT_LOCK_TIME,
            sound_staleness_window: DEFAULT_STALENESS_WINDOW,
            sound_idle_ms: DEFAULT_IDLE_INTERVAL.as_millis() as u64,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Frame delta in seconds for the configured tick rate.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_tps.max(1) as f32
    }

    pub fn sound_idle_interval(&self) -> Duration {
        Duration::from_millis(self.sound_idle_ms)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [loop] section
        if let Some(tps) = config.getuint("loop", "target_tps").ok().flatten() {
            self.target_tps = tps as u32;
        }
        if let Some(scale) = config.getfloat("loop", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        // [movement] section
        if let Some(tolerance) = config.getfloat("movement", "reach_tolerance").ok().flatten() {
            self.reach_tolerance = tolerance as f32;
        }

        // [sound] section
        if let Some(lock) = config.getuint("sound", "lock_time").ok().flatten() {
            self.sound_lock_time = lock;
        }
        if let Some(window) = config.getuint("sound", "staleness_window").ok().flatten() {
            self.sound_staleness_window = window;
        }
        if let Some(idle) = config.getuint("sound", "idle_ms").ok().flatten() {
            self.sound_idle_ms = idle;
        }

        info!(
            "Loaded config: tps={}, time_scale={}, reach_tolerance={}, sound lock={} stale={} idle={}ms",
            self.target_tps,
            self.time_scale,
            self.reach_tolerance,
            self.sound_lock_time,
            self.sound_staleness_window,
            self.sound_idle_ms
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("loop", "target_tps", Some(self.target_tps.to_string()));
        config.set("loop", "time_scale", Some(self.time_scale.to_string()));
        config.set(
            "movement",
            "reach_tolerance",
            Some(self.reach_tolerance.to_string()),
        );
        config.set("sound", "lock_time", Some(self.sound_lock_time.to_string()));
        config.set(
            "sound",
            "staleness_window",
            Some(self.sound_staleness_window.to_string()),
        );
        config.set("sound", "idle_ms", Some(self.sound_idle_ms.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
