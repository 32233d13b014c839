//! Paced execution of a [`CrackSimulation`].
//!
//! Each step waits for the per-character delay, then reveals a character.
//! Cancellation is cooperative: the token is checked before every wait and
//! before every emission, so once it is set no further frame is delivered.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, bounded};
use parking_lot::Mutex;
use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::errors::{PseError, Result};
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::simulation::frames::{CrackFrame, CrackSimulation};

// ──────────────────── cancellation ────────────────────

/// Shared cancellation flag.
///
/// `Relaxed` ordering is enough: the driver polls the flag and no other
/// memory is published through it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Underlying flag, for registering with `signal_hook::flag`.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

// ──────────────────── pacing ────────────────────

/// Waits between frames.
pub trait Pacer {
    /// Wait for `delay`. Returns `false` if `token` was cancelled before the
    /// wait finished.
    fn wait(&mut self, delay: Duration, token: &CancelToken) -> bool;
}

/// Real-time pacer. Sleeps in bounded slices so cancellation is noticed
/// within one slice.
#[derive(Debug, Clone, Copy)]
pub struct ThreadPacer {
    slice: Duration,
}

impl ThreadPacer {
    #[must_use]
    pub fn new(slice: Duration) -> Self {
        Self {
            slice: slice.max(Duration::from_millis(1)),
        }
    }

    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(Duration::from_millis(config.max_sleep_slice_ms))
    }
}

impl Default for ThreadPacer {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl Pacer for ThreadPacer {
    fn wait(&mut self, delay: Duration, token: &CancelToken) -> bool {
        let deadline = Instant::now() + delay;
        loop {
            if token.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(self.slice.min(deadline - now));
        }
    }
}

/// Records requested delays without sleeping.
#[derive(Debug, Clone, Default)]
pub struct ManualPacer {
    waits: Vec<Duration>,
}

impl ManualPacer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    #[must_use]
    pub fn total_waited(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Pacer for ManualPacer {
    fn wait(&mut self, delay: Duration, token: &CancelToken) -> bool {
        if token.is_cancelled() {
            return false;
        }
        self.waits.push(delay);
        true
    }
}

// ──────────────────── driver ────────────────────

/// How a driven simulation ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SimulationOutcome {
    Completed {
        frames: usize,
    },
    Cancelled {
        frames_emitted: usize,
        last_frame: Option<CrackFrame>,
    },
}

impl SimulationOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Runs simulations against a [`Pacer`], optionally reporting to the
/// activity log.
#[derive(Clone, Default)]
pub struct SimulationDriver {
    logger: Option<ActivityLoggerHandle>,
}

impl SimulationDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_logger(logger: ActivityLoggerHandle) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    fn log(&self, event: ActivityEvent) {
        if let Some(logger) = &self.logger {
            logger.send(event);
        }
    }

    /// Drive `sim` to completion or cancellation on the current thread,
    /// calling `on_frame` for every emitted frame.
    pub fn run<P, F>(
        &self,
        sim: &mut CrackSimulation,
        pacer: &mut P,
        token: &CancelToken,
        mut on_frame: F,
    ) -> SimulationOutcome
    where
        P: Pacer + ?Sized,
        F: FnMut(&CrackFrame),
    {
        let plan = *sim.plan();
        self.log(ActivityEvent::SimulationStarted {
            length: plan.length,
            bits: plan.bits.value(),
            total_ms: u64::try_from(plan.total.as_millis()).unwrap_or(u64::MAX),
        });

        while !sim.is_finished() {
            if token.is_cancelled() || !pacer.wait(plan.per_char_delay, token) || token.is_cancelled()
            {
                return self.cancelled(sim);
            }
            let Some(frame) = sim.next_frame() else {
                break;
            };
            on_frame(&frame);
        }

        if sim.is_cancelled() {
            return self.cancelled(sim);
        }

        let (attempts, elapsed_ms) = sim
            .last_frame()
            .map_or((0, 0), |f| (f.attempts, f.elapsed_ms));
        self.log(ActivityEvent::SimulationCompleted {
            frames: sim.frames_emitted(),
            attempts,
            elapsed_ms,
        });
        SimulationOutcome::Completed {
            frames: sim.frames_emitted(),
        }
    }

    fn cancelled(&self, sim: &mut CrackSimulation) -> SimulationOutcome {
        sim.cancel();
        let last_frame = sim.last_frame().cloned();
        self.log(ActivityEvent::SimulationCancelled {
            frames_emitted: sim.frames_emitted(),
            elapsed_ms: last_frame.as_ref().map_or(0, |f| f.elapsed_ms),
        });
        SimulationOutcome::Cancelled {
            frames_emitted: sim.frames_emitted(),
            last_frame,
        }
    }

    /// Run `sim` on a named background thread, delivering frames over a
    /// channel.
    pub fn spawn<P>(
        &self,
        mut sim: CrackSimulation,
        mut pacer: P,
        token: CancelToken,
    ) -> Result<SimulationHandle>
    where
        P: Pacer + Send + 'static,
    {
        // One slot per frame, so the worker never blocks on a slow reader.
        let (tx, rx) = bounded::<CrackFrame>(sim.len().max(1));
        let last = Arc::new(Mutex::new(None::<CrackFrame>));
        let worker_last = Arc::clone(&last);
        let worker_token = token.clone();
        let driver = self.clone();

        let join = thread::Builder::new()
            .name("pse-simulation".to_string())
            .spawn(move || {
                driver.run(&mut sim, &mut pacer, &worker_token, |frame| {
                    *worker_last.lock() = Some(frame.clone());
                    let _ = tx.try_send(frame.clone());
                })
            })
            .map_err(|e| PseError::Runtime {
                details: format!("failed to spawn simulation thread: {e}"),
            })?;

        Ok(SimulationHandle {
            frames: rx,
            last,
            token,
            join: Some(join),
        })
    }
}

// ──────────────────── background handle ────────────────────

/// Handle to a simulation running on its own thread.
pub struct SimulationHandle {
    frames: Receiver<CrackFrame>,
    last: Arc<Mutex<Option<CrackFrame>>>,
    token: CancelToken,
    join: Option<thread::JoinHandle<SimulationOutcome>>,
}

impl SimulationHandle {
    /// Frames in emission order. Disconnects when the worker exits.
    #[must_use]
    pub fn frames(&self) -> &Receiver<CrackFrame> {
        &self.frames
    }

    /// Most recently emitted frame, regardless of what has been received.
    #[must_use]
    pub fn last_frame(&self) -> Option<CrackFrame> {
        self.last.lock().clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Wait for the worker and return its outcome.
    pub fn join(mut self) -> Result<SimulationOutcome> {
        let Some(join) = self.join.take() else {
            return Err(PseError::Runtime {
                details: "simulation already joined".to_string(),
            });
        };
        join.join().map_err(|_| PseError::Runtime {
            details: "simulation thread panicked".to_string(),
        })
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            self.token.cancel();
            let _ = join.join();
        }
    }
}
