//! End-to-end crack simulation scenarios: background driver, real-time
//! pacing, cancellation and activity logging.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use password_security_engine::core::config::{LoggingConfig, SimulationConfig};
use password_security_engine::logger::activity::{
    ActivityEvent, ActivityLoggerConfig, ActivityLoggerHandle, spawn_logger,
};
use password_security_engine::simulation::driver::{
    CancelToken, SimulationDriver, SimulationOutcome, ThreadPacer,
};
use password_security_engine::simulation::frames::{CrackFrame, CrackSimulation};
use password_security_engine::strength::entropy::observed_entropy;

fn fast_config() -> SimulationConfig {
    SimulationConfig {
        very_weak_total_ms: 40,
        weak_total_ms: 60,
        fair_total_ms: 80,
        strong_total_ms: 100,
        max_sleep_slice_ms: 5,
        ..SimulationConfig::default()
    }
}

fn slow_config() -> SimulationConfig {
    SimulationConfig {
        very_weak_total_ms: 10_000,
        weak_total_ms: 10_000,
        fair_total_ms: 10_000,
        strong_total_ms: 10_000,
        max_sleep_slice_ms: 5,
        ..SimulationConfig::default()
    }
}

fn simulation(password: &str, config: &SimulationConfig) -> CrackSimulation {
    CrackSimulation::new(password, observed_entropy(password), config).expect("simulation")
}

#[test]
fn background_run_delivers_frames_in_order() {
    let config = fast_config();
    let sim = simulation("Zebra!Quartz", &config);
    let handle = SimulationDriver::new()
        .spawn(sim, ThreadPacer::from_config(&config), CancelToken::new())
        .expect("spawn");

    let frames: Vec<CrackFrame> = handle.frames().iter().collect();
    let last = handle.last_frame();
    let outcome = handle.join().expect("join");

    assert_eq!(outcome, SimulationOutcome::Completed { frames: 12 });
    assert_eq!(frames.len(), 12);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.revealed_prefix.chars().count(), i + 1);
        assert_eq!(frame.is_complete, i == 11);
    }
    assert!(frames.windows(2).all(|w| w[0].attempts <= w[1].attempts));
    assert!(frames.windows(2).all(|w| w[0].elapsed_ms <= w[1].elapsed_ms));
    assert_eq!(last.as_ref(), frames.last());
}

#[test]
fn real_time_pacing_takes_roughly_the_planned_total() {
    let config = fast_config();
    let mut sim = simulation("abc", &config);
    let planned = sim.plan().total;
    let start = Instant::now();
    let outcome = SimulationDriver::new().run(
        &mut sim,
        &mut ThreadPacer::from_config(&config),
        &CancelToken::new(),
        |_| {},
    );

    assert!(outcome.is_completed());
    // Per-character delays are truncated, so allow a millisecond of slack.
    assert!(start.elapsed() + Duration::from_millis(1) >= planned);
}

#[test]
fn cancel_mid_run_stops_promptly() {
    let config = slow_config();
    let sim = simulation("correcthorse", &config);
    let handle = SimulationDriver::new()
        .spawn(sim, ThreadPacer::from_config(&config), CancelToken::new())
        .expect("spawn");

    let first = handle
        .frames()
        .recv_timeout(Duration::from_secs(5))
        .expect("first frame");
    assert_eq!(first.revealed_prefix, "c");

    let cancelled_at = Instant::now();
    handle.cancel();
    let outcome = handle.join().expect("join");
    assert!(cancelled_at.elapsed() < Duration::from_secs(1));

    match outcome {
        SimulationOutcome::Cancelled {
            frames_emitted,
            last_frame,
        } => {
            assert!(frames_emitted < 12);
            let last = last_frame.expect("at least one frame");
            assert!(!last.is_complete);
            assert_eq!(last.revealed_prefix.chars().count(), frames_emitted);
        }
        other @ SimulationOutcome::Completed { .. } => panic!("expected cancellation, got {other:?}"),
    }
}

#[test]
fn raw_flag_cancels_like_a_signal() {
    let config = slow_config();
    let token = CancelToken::new();
    let flag = token.flag();
    let sim = simulation("abcdef", &config);
    let handle = SimulationDriver::new()
        .spawn(sim, ThreadPacer::from_config(&config), token)
        .expect("spawn");

    flag.store(true, Ordering::Relaxed);
    let outcome = handle.join().expect("join");
    assert!(!outcome.is_completed());
}

#[test]
fn dropping_the_handle_cancels_the_worker() {
    let config = slow_config();
    let token = CancelToken::new();
    let observer = token.clone();
    let sim = simulation("abcdef", &config);
    let handle = SimulationDriver::new()
        .spawn(sim, ThreadPacer::from_config(&config), token)
        .expect("spawn");

    let start = Instant::now();
    drop(handle);
    assert!(observer.is_cancelled());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn driver_reports_lifecycle_to_detached_logger() {
    let (logger, events) = ActivityLoggerHandle::detached(16);
    let config = fast_config();
    let mut sim = simulation("hunter2", &config);
    let outcome = SimulationDriver::with_logger(logger).run(
        &mut sim,
        &mut ThreadPacer::from_config(&config),
        &CancelToken::new(),
        |_| {},
    );
    assert!(outcome.is_completed());

    let received: Vec<ActivityEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert!(matches!(
        received[0],
        ActivityEvent::SimulationStarted { length: 7, .. }
    ));
    assert!(matches!(
        received[1],
        ActivityEvent::SimulationCompleted { frames: 7, .. }
    ));
}

#[test]
fn logger_thread_writes_simulation_events_to_jsonl() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("activity.jsonl");
    let logging = LoggingConfig {
        jsonl_path: Some(path.clone()),
        ..LoggingConfig::default()
    };
    let (logger, join) =
        spawn_logger(ActivityLoggerConfig::from_logging(&logging).expect("logging enabled"))
            .expect("spawn logger");

    let config = fast_config();
    let mut sim = simulation("letmein", &config);
    let token = CancelToken::new();
    token.cancel();
    let outcome = SimulationDriver::with_logger(logger.clone()).run(
        &mut sim,
        &mut ThreadPacer::from_config(&config),
        &token,
        |_| {},
    );
    assert!(!outcome.is_completed());

    logger.shutdown().expect("logger thread still running");
    join.join().expect("logger thread");

    let raw = std::fs::read_to_string(&path).expect("log file");
    assert!(!raw.contains("letmein"));
    let events: Vec<serde_json::Value> = raw
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "simulation_started");
    assert_eq!(events[1]["event"], "simulation_cancelled");
    assert_eq!(events[1]["ok"], false);
}
