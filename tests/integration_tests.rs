//! Integration tests: CLI smoke tests and end-to-end command scenarios.

mod common;

use std::collections::HashSet;
use std::fs;

use serde_json::Value;

fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: pse [OPTIONS] <COMMAND>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn level_reports_tier_and_xp() {
    let result = common::run_cli_case("level_reports_tier_and_xp", &["--json", "level", "12"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = result.json();
    assert_eq!(payload["command"], "level");
    assert_eq!(payload["difficulty"]["tier"], "medium");
    assert_eq!(payload["difficulty"]["modifier"], 1);
    assert_eq!(payload["difficulty"]["multiplier_bp"], 15_500);
    // (10 + 12 * 2) * 1.55
    assert_eq!(payload["xp_reward"], 52);
}

#[test]
fn level_zero_is_a_user_error() {
    let result = common::run_cli_case("level_zero_is_a_user_error", &["--json", "level", "0"]);
    assert_eq!(result.exit_code(), Some(1), "log: {}", result.log_path.display());
    assert!(
        result.stderr.contains("PSE-2003"),
        "missing error code; log: {}",
        result.log_path.display()
    );
}

#[test]
fn analyze_lists_weakness_flags() {
    let result = common::run_cli_case(
        "analyze_lists_weakness_flags",
        &["--json", "analyze", "password", "--personal", "word"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = result.json();
    let flags: Vec<&str> = payload["weaknesses"]
        .as_array()
        .expect("weaknesses array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    for expected in ["too_short", "dictionary_word", "no_uppercase", "personal_info"] {
        assert!(flags.contains(&expected), "missing {expected} in {flags:?}");
    }
    assert_eq!(payload["length"], 8);
    assert_eq!(payload["tier"], "fair");
}

#[test]
fn entropy_for_memorable_style() {
    let result = common::run_cli_case(
        "entropy_for_memorable_style",
        &["--json", "entropy", "--style", "xkcd"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = result.json();
    assert_eq!(payload["style"], "xkcd");
    assert_eq!(payload["tier"], "strong");
    let bits = payload["entropy_bits"].as_f64().expect("bits");
    assert!((bits - 67.84).abs() < 0.01, "unexpected bits {bits}");
}

#[test]
fn entropy_with_no_classes_fails() {
    let result = common::run_cli_case(
        "entropy_with_no_classes_fails",
        &[
            "--json",
            "entropy",
            "--no-uppercase",
            "--no-lowercase",
            "--no-digits",
            "--no-symbols",
        ],
    );
    assert_eq!(result.exit_code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("PSE-2001"));
}

#[test]
fn decoys_are_distinct_and_include_reference_once() {
    let result = common::run_cli_case(
        "decoys_are_distinct_and_include_reference_once",
        &["--json", "decoys", "Blue-Otter-42", "-n", "7", "--seed", "42"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = result.json();
    let options: Vec<&str> = payload["options"]
        .as_array()
        .expect("options array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(options.len(), 8);
    let unique: HashSet<&str> = options.iter().copied().collect();
    assert_eq!(unique.len(), 8);

    let correct = usize::try_from(payload["correct_index"].as_u64().expect("index"))
        .expect("index fits");
    assert_eq!(options[correct], "Blue-Otter-42");
    assert_eq!(options.iter().filter(|o| **o == "Blue-Otter-42").count(), 1);
}

#[test]
fn decoys_are_reproducible_with_seed() {
    let args = ["--json", "decoys", "Tr0ub4dor&3", "--seed", "7"];
    let first = common::run_cli_case("decoys_seed_first", &args);
    let second = common::run_cli_case("decoys_seed_second", &args);
    assert_eq!(first.json(), second.json());
}

#[test]
fn simulate_without_delay_reveals_every_character() {
    let result = common::run_cli_case(
        "simulate_without_delay_reveals_every_character",
        &["--json", "simulate", "abc123", "--no-delay"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = result.json();
    assert_eq!(payload["outcome"]["outcome"], "completed");
    let frames = payload["frames"].as_array().expect("frames array");
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0]["revealed_prefix"], "a");
    assert_eq!(frames[5]["revealed_prefix"], "abc123");
    assert_eq!(frames[5]["is_complete"], true);
    assert_eq!(frames[5]["progress"], 1.0);
}

#[test]
fn simulate_rejects_empty_password() {
    let result = common::run_cli_case(
        "simulate_rejects_empty_password",
        &["--json", "simulate", "", "--no-delay"],
    );
    assert_eq!(result.exit_code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("PSE-2005"));
}

#[test]
fn memory_challenge_uses_bracket_settings() {
    let result = common::run_cli_case(
        "memory_challenge_uses_bracket_settings",
        &["--json", "challenge", "memory", "--level", "40", "--seed", "3"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let challenge = &result.json()["challenge"];
    assert_eq!(challenge["bracket"], "expert");
    assert_eq!(challenge["display_seconds"], 5);
    assert_eq!(challenge["max_attempts"], 3);
    assert_eq!(
        challenge["reference"].as_str().expect("reference").chars().count(),
        16
    );
    assert_eq!(
        challenge["display"]["options"].as_array().expect("options").len(),
        12
    );
}

#[test]
fn cracker_challenge_lists_weaknesses() {
    let result = common::run_cli_case(
        "cracker_challenge_lists_weaknesses",
        &["--json", "challenge", "cracker", "--level", "2", "--seed", "11"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let challenge = &result.json()["challenge"];
    assert_eq!(challenge["tier"], 1);
    assert_eq!(challenge["hints_available"], 3);
    assert_eq!(challenge["time_limit_secs"], 60);
    assert!(
        !challenge["weaknesses"]
            .as_array()
            .expect("weaknesses")
            .is_empty()
    );
}

#[test]
fn health_scores_vault_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vault = dir.path().join("vault.json");
    let created = chrono::Utc::now().to_rfc3339();
    let body = serde_json::json!([
        {"id": "mail", "password": "xQ7!mR2@pL9#vT4$wZ8%", "created_at": created},
        {"id": "bank", "password": "pass", "created_at": "2001-01-01T00:00:00Z"},
    ]);
    fs::write(&vault, body.to_string()).expect("write vault");

    let vault_arg = vault.to_string_lossy().to_string();
    let result = common::run_cli_case(
        "health_scores_vault_export",
        &["--json", "health", &vault_arg],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let report = &result.json()["report"];
    assert_eq!(report["total"], 2);
    assert_eq!(report["strong"], 1);
    assert_eq!(report["weak"], 1);
    let issues = report["issues"].as_array().expect("issues");
    assert!(issues.iter().all(|issue| issue["id"] == "bank"));
    assert!(issues.iter().any(|issue| issue["kind"] == "old_password"));

    let achievements = report["achievements"].as_array().expect("achievements");
    let unlocked = |id: &str| {
        achievements
            .iter()
            .find(|a| a["id"] == id)
            .and_then(|a| a["unlocked"].as_bool())
    };
    assert_eq!(unlocked("first_password"), Some(true));
    assert_eq!(unlocked("password_creator"), Some(false));
    assert_eq!(unlocked("all_strong"), Some(false));
}

#[test]
fn health_with_missing_vault_is_runtime_error() {
    let result = common::run_cli_case(
        "health_with_missing_vault_is_runtime_error",
        &["--json", "health", "/nonexistent/pse/vault.json"],
    );
    assert_eq!(result.exit_code(), Some(2), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("PSE-3201"));
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "[rewards]\nbase_xp = 25\n");
    let path_arg = path.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "config_validate_accepts_valid_file",
        &["--json", "--config", &path_arg, "config", "validate"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = result.json();
    assert_eq!(payload["valid"], true);
    assert!(payload["hash"].as_str().is_some_and(|h| !h.is_empty()));
}

#[test]
fn config_validate_rejects_bad_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "[strength]\nguesses_per_second = -5.0\n");
    let path_arg = path.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "config_validate_rejects_bad_values",
        &["--json", "--config", &path_arg, "config", "validate"],
    );
    assert_eq!(result.exit_code(), Some(1), "log: {}", result.log_path.display());

    let payload = result.json();
    assert_eq!(payload["valid"], false);
    assert_eq!(payload["code"], "PSE-1001");
}

#[test]
fn missing_explicit_config_is_reported() {
    let result = common::run_cli_case(
        "missing_explicit_config_is_reported",
        &["--json", "--config", "/nonexistent/pse.toml", "level", "1"],
    );
    assert_eq!(result.exit_code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("PSE-1002"));
}

#[test]
fn configured_reward_constants_change_xp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "[rewards]\nbase_xp = 100\nlevel_coefficient = 0\n");
    let path_arg = path.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "configured_reward_constants_change_xp",
        &["--json", "--config", &path_arg, "level", "6"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    // 100 * 1.2
    assert_eq!(result.json()["xp_reward"], 120);
}

#[test]
fn activity_log_records_commands_without_passwords() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("activity.jsonl");
    let config = write_config(
        &dir,
        &format!("[logging]\njsonl_path = \"{}\"\n", log_path.display()),
    );
    let config_arg = config.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "activity_log_records_commands_without_passwords",
        &[
            "--json",
            "--config",
            &config_arg,
            "simulate",
            "Zebra!Quartz",
            "--no-delay",
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let raw = fs::read_to_string(&log_path).expect("activity log written");
    assert!(!raw.contains("Zebra!Quartz"), "password leaked into log");

    let events: Vec<String> = raw
        .lines()
        .map(|line| {
            let entry: Value = serde_json::from_str(line).expect("valid JSONL line");
            entry["event"].as_str().expect("event").to_string()
        })
        .collect();
    for expected in [
        "engine_started",
        "config_loaded",
        "simulation_started",
        "simulation_completed",
    ] {
        assert!(
            events.iter().any(|e| e == expected),
            "missing {expected} in {events:?}"
        );
    }
}
