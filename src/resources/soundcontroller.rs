//! Rate-limited front door to the sound dispatch queue.
//!
//! [`SoundController`] keeps one "last dispatched" tick for the whole game.
//! [`SoundController::call`] only lets work through when more than
//! `lock_time` ticks passed since the previous dispatch, which keeps bursts of
//! identical triggers (ten bullets hitting a wall in one frame) from stacking
//! up the same effect. [`SoundController::call_ignore_timeout`] bypasses the
//! check but still counts as a dispatch.
//!
//! The limiter starts as if a dispatch happened at tick 0, so rate-limited
//! calls are refused until `lock_time` ticks after the loop started.
//!
//! Use [`setup_sound`] once during initialization to start the worker and
//! register the resources, and [`shutdown_sound`] during teardown.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

use bevy_ecs::prelude::*;
use log::info;

use crate::events::sound::SoundRequest;
use crate::resources::gameconfig::GameConfig;
use crate::resources::sounddispatch::{DispatchCounts, SoundDispatchQueue};
use crate::resources::tickclock::TickClock;

/// Minimum spacing, in ticks, between two rate-limited dispatches.
pub const DEFAULT_LOCK_TIME: u64 = 50;

#[derive(Resource)]
pub struct SoundController<B: 'static> {
    queue: SoundDispatchQueue<B>,
    lock_time: u64,
    last_dispatch: AtomicU64,
}

impl<B: 'static> SoundController<B> {
    pub fn new(clock: TickClock) -> Self {
        Self::with_queue(SoundDispatchQueue::new(clock))
    }

    pub fn with_queue(queue: SoundDispatchQueue<B>) -> Self {
        Self {
            queue,
            lock_time: DEFAULT_LOCK_TIME,
            last_dispatch: AtomicU64::new(0),
        }
    }

    pub fn with_lock_time(mut self, ticks: u64) -> Self {
        self.lock_time = ticks;
        self
    }

    /// Build a controller whose timings come from `config`.
    pub fn from_config(clock: TickClock, config: &GameConfig) -> Self {
        let queue = SoundDispatchQueue::new(clock)
            .with_staleness_window(config.sound_staleness_window)
            .with_idle_interval(config.sound_idle_interval());
        Self::with_queue(queue).with_lock_time(config.sound_lock_time)
    }

    fn is_open(&self, last: u64) -> bool {
        self.queue.clock().since(last) > self.lock_time
    }

    /// True when a rate-limited call would currently be accepted.
    pub fn can_play(&self) -> bool {
        self.is_open(self.last_dispatch.load(Ordering::Acquire))
    }

    /// Enqueue `work` as timestamped if the rate limiter allows it.
    ///
    /// Returns whether the work was accepted; rejected work is simply dropped.
    pub fn call(&self, work: impl FnOnce(&mut B) + Send + 'static) -> bool {
        let now = self.queue.clock().ticks();
        let mut last = self.last_dispatch.load(Ordering::Acquire);
        loop {
            if !self.is_open(last) {
                return false;
            }
            match self.last_dispatch.compare_exchange_weak(
                last,
                now,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(current) => last = current,
            }
        }
        self.queue.enqueue(work, false);
        true
    }

    /// Enqueue `work` regardless of the rate limiter.
    pub fn call_ignore_timeout(&self, work: impl FnOnce(&mut B) + Send + 'static, forced: bool) {
        self.queue.enqueue(work, forced);
        self.last_dispatch
            .store(self.queue.clock().ticks(), Ordering::Release);
    }

    pub fn start<F>(&mut self, make_backend: F) -> io::Result<()>
    where
        F: FnOnce() -> B + Send + 'static,
    {
        self.queue.start(make_backend)
    }

    pub fn terminate(&self) {
        self.queue.terminate();
    }

    /// Block until the worker thread has exited.
    pub fn join(&mut self) {
        self.queue.join();
    }

    pub fn is_running(&self) -> bool {
        self.queue.is_running()
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    pub fn counts(&self) -> DispatchCounts {
        self.queue.counts()
    }
}

/// Start the sound worker and register the sound resources.
///
/// This function:
/// - Reuses the world's [`TickClock`] (inserting one if missing).
/// - Reads timings from [`GameConfig`] when present, defaults otherwise.
/// - Spawns the worker, which builds its backend with `make_backend`.
/// - Inserts [`SoundController<B>`] and `Messages<SoundRequest>`.
pub fn setup_sound<B, F>(world: &mut World, make_backend: F) -> io::Result<()>
where
    B: 'static,
    F: FnOnce() -> B + Send + 'static,
{
    let clock = world.get_resource_or_insert_with(TickClock::new).clone();
    let mut controller = match world.get_resource::<GameConfig>() {
        Some(config) => SoundController::from_config(clock, config),
        None => SoundController::new(clock),
    };
    controller.start(make_backend)?;

    world.insert_resource(controller);
    world.insert_resource(Messages::<SoundRequest>::default());
    Ok(())
}

/// Stop the sound worker, wait for it, and remove the controller.
pub fn shutdown_sound<B: 'static>(world: &mut World) {
    if let Some(mut controller) = world.remove_resource::<SoundController<B>>() {
        controller.terminate();
        controller.join();
        let counts = controller.counts();
        info!(
            "sound shut down: executed={} dropped={} abandoned={}",
            counts.executed,
            counts.dropped,
            controller.pending()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_is_closed_until_lock_time_after_start() {
        let clock = TickClock::new();
        let controller: SoundController<()> = SoundController::new(clock.clone());
        assert!(!controller.can_play());
        assert!(!controller.call(|_| {}));

        clock.advance(50);
        assert!(!controller.can_play());
        clock.advance(1);
        assert!(controller.can_play());
        assert!(controller.call(|_| {}));
        assert_eq!(controller.pending(), 1);
    }

    #[test]
    fn can_play_reopens_after_lock_time() {
        let clock = TickClock::starting_at(1_000);
        let controller: SoundController<()> = SoundController::new(clock.clone());
        assert!(controller.call(|_| {}));
        assert!(!controller.can_play());

        clock.advance(50);
        assert!(!controller.can_play());
        clock.advance(1);
        assert!(controller.can_play());
    }

    #[test]
    fn call_within_lock_time_is_dropped() {
        let clock = TickClock::starting_at(1_000);
        let controller: SoundController<()> = SoundController::new(clock.clone());
        assert!(controller.call(|_| {}));
        clock.advance(10);
        assert!(!controller.call(|_| {}));
        assert_eq!(controller.pending(), 1);

        clock.advance(41);
        assert!(controller.call(|_| {}));
        assert_eq!(controller.pending(), 2);
    }

    #[test]
    fn ignore_timeout_always_enqueues_and_resets_limiter() {
        let clock = TickClock::starting_at(1_000);
        let controller: SoundController<()> = SoundController::new(clock.clone());
        controller.call_ignore_timeout(|_| {}, false);
        controller.call_ignore_timeout(|_| {}, true);
        assert_eq!(controller.pending(), 2);
        assert!(!controller.can_play());
        assert!(!controller.call(|_| {}));
    }

    #[test]
    fn custom_lock_time() {
        let clock = TickClock::starting_at(1_000);
        let controller: SoundController<()> =
            SoundController::new(clock.clone()).with_lock_time(5);
        assert!(controller.call(|_| {}));
        clock.advance(6);
        assert!(controller.call(|_| {}));
    }

    #[test]
    fn concurrent_callers_pass_the_limiter_once() {
        let clock = TickClock::starting_at(500);
        let controller: SoundController<()> = SoundController::new(clock);
        let accepted = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| controller.call(|_| {})))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|accepted| *accepted)
                .count()
        });
        assert_eq!(accepted, 1);
        assert_eq!(controller.pending(), 1);
    }
}
