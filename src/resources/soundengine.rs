//! Playback vocabulary of the sound backend.
//!
//! The dispatch queue itself accepts closures over any backend type; this
//! trait is what [`SoundRequest`](crate::events::sound::SoundRequest)
//! messages are translated into.

use log::info;

pub trait SoundEngine {
    fn play_fx(&mut self, id: &str);
    fn play_music(&mut self, id: &str, looped: bool);
    fn stop_music(&mut self, id: &str);
}

/// Backend that only logs what it is asked to play. Used by the headless runner.
#[derive(Debug, Default)]
pub struct LogSoundEngine {
    played: u64,
}

impl LogSoundEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of effects and tracks started so far.
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl SoundEngine for LogSoundEngine {
    fn play_fx(&mut self, id: &str) {
        self.played += 1;
        info!("[sound] fx play id='{}'", id);
    }

    fn play_music(&mut self, id: &str, looped: bool) {
        self.played += 1;
        info!("[sound] music play id='{}' looped={}", id, looped);
    }

    fn stop_music(&mut self, id: &str) {
        info!("[sound] music stop id='{}'", id);
    }
}
