//! Activity logger: engine events flow over a bounded crossbeam channel to a
//! dedicated thread that owns the `JsonlWriter`.
//!
//! `send()` uses `try_send()`, so scoring, decoy generation and simulation
//! are never blocked by logging back-pressure. Full-channel drops are counted
//! and reported on the next write.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::core::config::LoggingConfig;
use crate::core::errors::{PseError, Result};
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};
use crate::strength::entropy::StrengthTier;

// ──────────────────── channel capacity ────────────────────

const CHANNEL_CAPACITY: usize = 1024;

// ──────────────────── public event type ────────────────────

/// Events emitted by the engine. Fields are lengths, counts and scores;
/// never password text.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEvent {
    EngineStarted {
        version: String,
        config_hash: String,
    },
    EntropyScored {
        length: usize,
        bits: f64,
        tier: StrengthTier,
    },
    DecoysGenerated {
        count: usize,
        reference_length: usize,
    },
    DecoyGenerationFailed {
        requested: usize,
        produced: usize,
        attempts: usize,
    },
    SimulationStarted {
        length: usize,
        bits: f64,
        total_ms: u64,
    },
    SimulationCompleted {
        frames: usize,
        attempts: u64,
        elapsed_ms: u64,
    },
    SimulationCancelled {
        frames_emitted: usize,
        elapsed_ms: u64,
    },
    ChallengeCreated {
        kind: &'static str,
        level: u64,
        xp_reward: u64,
    },
    HealthReported {
        passwords: usize,
        score: u8,
        issues: usize,
    },
    ConfigLoaded {
        path: String,
        config_hash: String,
    },
    Error {
        code: String,
        message: String,
    },
    /// Sentinel asking the logger thread to flush and exit.
    Shutdown,
}

impl ActivityEvent {
    /// Error event for a failed engine operation.
    #[must_use]
    pub fn from_error(err: &PseError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

// ──────────────────── public handle ────────────────────

/// Cheaply cloneable handle for sending activity events.
#[derive(Clone)]
pub struct ActivityLoggerHandle {
    tx: Sender<ActivityEvent>,
    dropped_events: Arc<AtomicU64>,
}

impl ActivityLoggerHandle {
    /// Handle whose events go to the returned receiver instead of a logger
    /// thread. For in-process consumers and tests.
    #[must_use]
    pub fn detached(capacity: usize) -> (Self, Receiver<ActivityEvent>) {
        let (tx, rx) = bounded(capacity.max(1));
        let handle = Self {
            tx,
            dropped_events: Arc::new(AtomicU64::new(0)),
        };
        (handle, rx)
    }

    /// Send an event. Never blocks; a full channel drops the event and bumps
    /// the dropped counter.
    pub fn send(&self, event: ActivityEvent) {
        if let Err(TrySendError::Full(_)) = self.tx.try_send(event) {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
        // Disconnected is fine during shutdown.
    }

    /// Events dropped due to back-pressure and not yet reported.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Ask the logger thread to flush and exit. Blocks only until the
    /// sentinel is queued.
    ///
    /// Fails with `ChannelClosed` when the receiving side is already gone,
    /// i.e. the logger thread exited early and queued events were lost.
    pub fn shutdown(&self) -> Result<()> {
        self.tx
            .send(ActivityEvent::Shutdown)
            .map_err(|_| PseError::ChannelClosed { component: "logger" })
    }
}

// ──────────────────── configuration ────────────────────

pub struct ActivityLoggerConfig {
    pub jsonl_config: JsonlConfig,
    pub channel_capacity: usize,
}

impl ActivityLoggerConfig {
    /// `None` when the config disables file logging.
    #[must_use]
    pub fn from_logging(logging: &LoggingConfig) -> Option<Self> {
        JsonlConfig::from_logging(logging).map(|jsonl_config| Self {
            jsonl_config,
            channel_capacity: CHANNEL_CAPACITY,
        })
    }
}

// ──────────────────── spawn ────────────────────

/// Spawn the logger thread.
///
/// The thread runs until `handle.shutdown()` is called or every handle is
/// dropped.
pub fn spawn_logger(
    config: ActivityLoggerConfig,
) -> Result<(ActivityLoggerHandle, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<ActivityEvent>(config.channel_capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_clone = Arc::clone(&dropped);

    let handle = ActivityLoggerHandle {
        tx,
        dropped_events: dropped,
    };

    let join = thread::Builder::new()
        .name("pse-logger".to_string())
        .spawn(move || logger_thread_main(&rx, config.jsonl_config, &dropped_clone))
        .map_err(|e| PseError::Runtime {
            details: format!("failed to spawn logger thread: {e}"),
        })?;

    Ok((handle, join))
}

// ──────────────────── logger thread ────────────────────

fn logger_thread_main(rx: &Receiver<ActivityEvent>, jsonl_config: JsonlConfig, dropped: &AtomicU64) {
    let mut jsonl = JsonlWriter::open(jsonl_config);

    while let Ok(event) = rx.recv() {
        let d = dropped.swap(0, Ordering::Relaxed);
        if d > 0 {
            let mut warn = LogEntry::new(EventType::Error, Severity::Warning);
            warn.details = Some(format!("{d} log events dropped due to back-pressure"));
            jsonl.write_entry(&warn);
        }

        if matches!(event, ActivityEvent::Shutdown) {
            break;
        }
        if let Some(entry) = event_to_log_entry(&event) {
            jsonl.write_entry(&entry);
        }
    }

    jsonl.flush();
    jsonl.fsync();
}

// ──────────────────── event conversion ────────────────────

fn tier_name(tier: StrengthTier) -> String {
    serde_json::to_value(tier)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| format!("{tier:?}"))
}

#[allow(clippy::cast_precision_loss)]
fn event_to_log_entry(event: &ActivityEvent) -> Option<LogEntry> {
    let entry = match event {
        ActivityEvent::EngineStarted {
            version,
            config_hash,
        } => {
            let mut e = LogEntry::new(EventType::EngineStarted, Severity::Info);
            e.details = Some(format!("version={version} config_hash={config_hash}"));
            e.ok = Some(true);
            e
        }
        ActivityEvent::EntropyScored { length, bits, tier } => {
            let mut e = LogEntry::new(EventType::EntropyScored, Severity::Info);
            e.length = Some(*length as u64);
            e.entropy_bits = Some(*bits);
            e.tier = Some(tier_name(*tier));
            e
        }
        ActivityEvent::DecoysGenerated {
            count,
            reference_length,
        } => {
            let mut e = LogEntry::new(EventType::DecoysGenerated, Severity::Info);
            e.count = Some(*count as u64);
            e.length = Some(*reference_length as u64);
            e.ok = Some(true);
            e
        }
        ActivityEvent::DecoyGenerationFailed {
            requested,
            produced,
            attempts,
        } => {
            let mut e = LogEntry::new(EventType::DecoyGenerationFailed, Severity::Warning);
            e.count = Some(*produced as u64);
            e.attempts = Some(*attempts as u64);
            e.ok = Some(false);
            e.error_code = Some("PSE-3001".to_string());
            e.details = Some(format!("requested={requested} produced={produced}"));
            e
        }
        ActivityEvent::SimulationStarted {
            length,
            bits,
            total_ms,
        } => {
            let mut e = LogEntry::new(EventType::SimulationStarted, Severity::Info);
            e.length = Some(*length as u64);
            e.entropy_bits = Some(*bits);
            e.duration_ms = Some(*total_ms);
            e
        }
        ActivityEvent::SimulationCompleted {
            frames,
            attempts,
            elapsed_ms,
        } => {
            let mut e = LogEntry::new(EventType::SimulationCompleted, Severity::Info);
            e.count = Some(*frames as u64);
            e.attempts = Some(*attempts);
            e.duration_ms = Some(*elapsed_ms);
            e.ok = Some(true);
            e
        }
        ActivityEvent::SimulationCancelled {
            frames_emitted,
            elapsed_ms,
        } => {
            let mut e = LogEntry::new(EventType::SimulationCancelled, Severity::Info);
            e.count = Some(*frames_emitted as u64);
            e.duration_ms = Some(*elapsed_ms);
            e.ok = Some(false);
            e
        }
        ActivityEvent::ChallengeCreated {
            kind,
            level,
            xp_reward,
        } => {
            let mut e = LogEntry::new(EventType::ChallengeCreated, Severity::Info);
            e.level = Some(*level);
            e.score = Some(*xp_reward as f64);
            e.details = Some(format!("kind={kind}"));
            e
        }
        ActivityEvent::HealthReported {
            passwords,
            score,
            issues,
        } => {
            let mut e = LogEntry::new(EventType::HealthReported, Severity::Info);
            e.count = Some(*passwords as u64);
            e.score = Some(f64::from(*score));
            e.details = Some(format!("issues={issues}"));
            e
        }
        ActivityEvent::ConfigLoaded { path, config_hash } => {
            let mut e = LogEntry::new(EventType::ConfigLoaded, Severity::Info);
            e.details = Some(format!("path={path} config_hash={config_hash}"));
            e.ok = Some(true);
            e
        }
        ActivityEvent::Error { code, message } => {
            let mut e = LogEntry::new(EventType::Error, Severity::Critical);
            e.error_code = Some(code.clone());
            e.error_message = Some(message.clone());
            e.ok = Some(false);
            e
        }
        ActivityEvent::Shutdown => return None,
    };
    Some(entry)
}

// ──────────────────── tests ────────────────────
