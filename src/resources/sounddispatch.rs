//! Background queue that serializes work into a single-threaded sound backend.
//!
//! Producers on any thread call [`SoundDispatchQueue::enqueue`] with a closure
//! over the backend. A dedicated worker thread, started with
//! [`SoundDispatchQueue::start`], owns the backend and runs the closures one at
//! a time in submission order.
//!
//! Each queued item is tagged with an optional submission tick:
//! - *timestamped* items (`forced == false`) run only while they are fresh,
//!   i.e. fewer than `staleness_window` ticks old when the worker reaches them;
//!   stale items are dropped, never retried;
//! - *forced* items carry no tick and always run.
//!
//! Notes
//! - The backend is built on the worker thread by the factory passed to
//!   `start`, so it does not need to be `Send`.
//! - When the queue is empty the worker waits on the channel for at most the
//!   idle interval, then re-checks its running flag.
//! - [`SoundDispatchQueue::terminate`] only clears the running flag. The worker
//!   finishes the pass it is in, draining what is queued, and then exits. Items
//!   enqueued after that are abandoned.

use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, info, warn};

use crate::resources::tickclock::TickClock;

/// Age in ticks at which a timestamped item is discarded unexecuted.
pub const DEFAULT_STALENESS_WINDOW: u64 = 500;
/// How long the worker waits on an empty queue before re-checking its flag.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(20);

/// Unit of work executed against the sound backend.
pub type SoundWork<B> = Box<dyn FnOnce(&mut B) + Send>;

/// Queued work plus its submission tick (`None` for forced items).
pub struct SoundJob<B> {
    work: SoundWork<B>,
    submitted: Option<u64>,
}

impl<B> SoundJob<B> {
    pub fn is_forced(&self) -> bool {
        self.submitted.is_none()
    }

    /// Whether the job may still run at the clock's current tick.
    pub fn is_fresh(&self, clock: &TickClock, staleness_window: u64) -> bool {
        match self.submitted {
            None => true,
            Some(at) => clock.since(at) < staleness_window,
        }
    }
}

/// Snapshot of the worker's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchCounts {
    pub executed: u64,
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct DispatchStats {
    executed: AtomicU64,
    dropped: AtomicU64,
}

pub struct SoundDispatchQueue<B> {
    tx: Sender<SoundJob<B>>,
    rx: Receiver<SoundJob<B>>,
    clock: TickClock,
    staleness_window: u64,
    idle_interval: Duration,
    running: Arc<AtomicBool>,
    stats: Arc<DispatchStats>,
    handle: Option<JoinHandle<()>>,
}

impl<B: 'static> SoundDispatchQueue<B> {
    pub fn new(clock: TickClock) -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            clock,
            staleness_window: DEFAULT_STALENESS_WINDOW,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(DispatchStats::default()),
            handle: None,
        }
    }

    pub fn with_staleness_window(mut self, ticks: u64) -> Self {
        self.staleness_window = ticks;
        self
    }

    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn staleness_window(&self) -> u64 {
        self.staleness_window
    }

    /// Append `work` to the queue. Non-forced work is stamped with the current tick.
    pub fn enqueue(&self, work: impl FnOnce(&mut B) + Send + 'static, forced: bool) {
        let job = SoundJob {
            work: Box::new(work),
            submitted: if forced {
                None
            } else {
                Some(self.clock.ticks())
            },
        };
        // The queue owns a receiver, so the channel cannot be disconnected here.
        let _ = self.tx.send(job);
    }

    /// Number of items waiting for the worker.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn counts(&self) -> DispatchCounts {
        DispatchCounts {
            executed: self.stats.executed.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Spawn the worker thread. The backend is created on that thread by
    /// `make_backend`. Starting an already running queue is a no-op.
    pub fn start<F>(&mut self, make_backend: F) -> io::Result<()>
    where
        F: FnOnce() -> B + Send + 'static,
    {
        if self.is_running() {
            warn!("sound dispatch worker already running");
            return Ok(());
        }
        // A previous worker may still be finishing its last pass.
        if let Some(old) = self.handle.take() {
            let _ = old.join();
        }

        let worker = Worker {
            rx: self.rx.clone(),
            clock: self.clock.clone(),
            staleness_window: self.staleness_window,
            idle_interval: self.idle_interval,
            running: Arc::clone(&self.running),
            stats: Arc::clone(&self.stats),
        };

        self.running.store(true, Ordering::Release);
        let spawned = std::thread::Builder::new()
            .name("sound-dispatch".to_string())
            .spawn(move || {
                let mut backend = make_backend();
                worker.run(&mut backend);
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Ask the worker to stop after its current pass. Does not wait.
    pub fn terminate(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("sound dispatch worker stop requested");
        }
    }

    /// Wait for the worker thread to exit. Call [`Self::terminate`] first.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sound dispatch worker exited with a panic");
            }
        }
    }
}

impl<B> Drop for SoundDispatchQueue<B> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

struct Worker<B> {
    rx: Receiver<SoundJob<B>>,
    clock: TickClock,
    staleness_window: u64,
    idle_interval: Duration,
    running: Arc<AtomicBool>,
    stats: Arc<DispatchStats>,
}

impl<B> Worker<B> {
    fn run(self, backend: &mut B) {
        info!(
            "sound dispatch worker starting (id={:?})",
            std::thread::current().id()
        );

        'run: while self.running.load(Ordering::Acquire) {
            match self.rx.recv_timeout(self.idle_interval) {
                Ok(job) => {
                    self.dispatch(job, backend);
                    // Drain whatever else is queued before looking at the flag again.
                    for job in self.rx.try_iter() {
                        self.dispatch(job, backend);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break 'run,
            }
        }

        info!(
            "sound dispatch worker exiting (id={:?}, pending={})",
            std::thread::current().id(),
            self.rx.len()
        );
    }

    fn dispatch(&self, job: SoundJob<B>, backend: &mut B) {
        if !job.is_fresh(&self.clock, self.staleness_window) {
            debug!(
                "dropping stale sound work (submitted={:?}, now={})",
                job.submitted,
                self.clock.ticks()
            );
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let work = job.work;
        if catch_unwind(AssertUnwindSafe(move || work(backend))).is_err() {
            warn!("sound work panicked; worker continues");
        }
        self.stats.executed.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(submitted: Option<u64>) -> SoundJob<()> {
        SoundJob {
            work: Box::new(|_: &mut ()| {}),
            submitted,
        }
    }

    #[test]
    fn forced_job_is_always_fresh() {
        let forced = job(None);
        assert!(forced.is_forced());
        let clock = TickClock::new();
        assert!(forced.is_fresh(&clock, DEFAULT_STALENESS_WINDOW));
        clock.advance(1_000_000);
        assert!(forced.is_fresh(&clock, DEFAULT_STALENESS_WINDOW));
    }

    #[test]
    fn staleness_boundary_is_exclusive() {
        let stamped = job(Some(1_000));
        let clock = TickClock::starting_at(1_000);
        assert!(stamped.is_fresh(&clock, 500));
        clock.advance_to(1_499);
        assert!(stamped.is_fresh(&clock, 500));
        clock.advance_to(1_500);
        assert!(!stamped.is_fresh(&clock, 500));
        clock.advance_to(1_501);
        assert!(!stamped.is_fresh(&clock, 500));
    }

    #[test]
    fn enqueue_stamps_only_unforced_work() {
        let clock = TickClock::starting_at(42);
        let queue: SoundDispatchQueue<()> = SoundDispatchQueue::new(clock);
        queue.enqueue(|_| {}, false);
        queue.enqueue(|_| {}, true);
        assert_eq!(queue.pending(), 2);

        let first = queue.rx.try_recv().unwrap();
        let second = queue.rx.try_recv().unwrap();
        assert_eq!(first.submitted, Some(42));
        assert!(second.is_forced());
    }

    #[test]
    fn terminate_without_start_is_harmless() {
        let mut queue: SoundDispatchQueue<()> = SoundDispatchQueue::new(TickClock::new());
        assert!(!queue.is_running());
        queue.terminate();
        queue.join();
        assert!(!queue.is_running());
    }
}
