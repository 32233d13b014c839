//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::thread;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize, control};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use signal_hook::consts::{SIGINT, SIGTERM};
use thiserror::Error;

use password_security_engine::analyzer::weakness::{PersonalContext, analyze_with_context};
use password_security_engine::content::cracker::CrackerChallenge;
use password_security_engine::content::health::{HealthReport, SavedPassword};
use password_security_engine::content::memory::MemoryChallenge;
use password_security_engine::core::config::EngineConfig;
use password_security_engine::core::errors::PseError;
use password_security_engine::decoy::generator::{DisplayOrder, generate_decoys};
use password_security_engine::logger::activity::{
    ActivityEvent, ActivityLoggerConfig, ActivityLoggerHandle, spawn_logger,
};
use password_security_engine::progression::difficulty::{difficulty_for_level, xp_reward};
use password_security_engine::simulation::driver::{
    CancelToken, ManualPacer, Pacer, SimulationDriver, SimulationOutcome, ThreadPacer,
};
use password_security_engine::simulation::frames::{CrackFrame, CrackSimulation};
use password_security_engine::strength::crack_time::estimate_crack_time;
use password_security_engine::strength::entropy::{
    CharacterClasses, StrengthTier, entropy_bits_for_length, observed_entropy,
};
use password_security_engine::strength::style::{PasswordStyle, style_entropy};

/// Password Security Engine: developer harness over the content engine.
#[derive(Debug, Parser)]
#[command(
    name = "pse",
    author,
    version,
    about = "Password Security Engine - strength, weakness, decoy and crack simulation tooling",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Classify a password into weakness flags.
    Analyze(AnalyzeArgs),
    /// Estimate entropy and crack time for a generation setting.
    Entropy(EntropyArgs),
    /// Generate near-duplicate decoys for a reference password.
    Decoys(DecoysArgs),
    /// Show difficulty and XP reward for a level.
    Level(LevelArgs),
    /// Run the paced crack simulation for a password.
    Simulate(SimulateArgs),
    /// Build a memory or cracker challenge for a level.
    Challenge(ChallengeArgs),
    /// Score a vault export (JSON array of saved passwords).
    Health(HealthArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Password to analyze.
    password: String,
    /// Personal tokens (names, birthdays) to check for.
    #[arg(long = "personal", value_name = "TOKEN")]
    personal: Vec<String>,
}

#[derive(Debug, Clone, Args)]
struct EntropyArgs {
    /// Generated length for random passwords.
    #[arg(long, default_value_t = 16, conflicts_with = "style")]
    length: usize,
    /// Memorable style (xkcd, phonetic, story, pronounceable).
    #[arg(long, value_name = "NAME")]
    style: Option<String>,
    /// Exclude uppercase letters.
    #[arg(long)]
    no_uppercase: bool,
    /// Exclude lowercase letters.
    #[arg(long)]
    no_lowercase: bool,
    /// Exclude digits.
    #[arg(long)]
    no_digits: bool,
    /// Exclude symbols.
    #[arg(long)]
    no_symbols: bool,
    /// Override the assumed attacker guess rate.
    #[arg(long, value_name = "RATE")]
    guesses_per_second: Option<f64>,
}

#[derive(Debug, Clone, Args)]
struct DecoysArgs {
    /// Reference password.
    reference: String,
    /// Number of decoys.
    #[arg(long, short = 'n', default_value_t = 5)]
    count: usize,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
struct LevelArgs {
    /// Level index (1-based).
    level: u64,
}

#[derive(Debug, Clone, Args)]
struct SimulateArgs {
    /// Password to "crack".
    password: String,
    /// Emit frames without real-time pacing.
    #[arg(long)]
    no_delay: bool,
}

#[derive(Debug, Clone, Args)]
struct ChallengeArgs {
    #[command(subcommand)]
    kind: ChallengeKind,
}

#[derive(Debug, Clone, Subcommand)]
enum ChallengeKind {
    /// Memorize-and-pick round.
    Memory {
        /// Level index (1-based).
        #[arg(long, default_value_t = 1)]
        level: u64,
        /// Use this reference instead of a generated one.
        #[arg(long)]
        reference: Option<String>,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Find-the-weaknesses round.
    Cracker {
        /// Level index (1-based).
        #[arg(long, default_value_t = 1)]
        level: u64,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Args)]
struct HealthArgs {
    /// Vault export path.
    #[arg(value_name = "PATH")]
    vault: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print config path in use.
    Path,
    /// Show effective configuration.
    Show,
    /// Validate configuration.
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// Operation partially succeeded.
    #[error("{0}")]
    Partial(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
            Self::Partial(_) => 4,
        }
    }
}

impl From<PseError> for CliError {
    fn from(err: PseError) -> Self {
        let message = err.to_string();
        match err {
            PseError::InvalidConfig { .. }
            | PseError::MissingConfig { .. }
            | PseError::ConfigParse { .. }
            | PseError::EmptyCharacterPool
            | PseError::InvalidEntropy { .. }
            | PseError::InvalidLevel { .. }
            | PseError::InvalidGuessRate { .. }
            | PseError::EmptyPassword { .. } => Self::User(message),
            PseError::DecoyBudgetExhausted { .. } => Self::Partial(message),
            PseError::Serialization { .. } => Self::Internal(message),
            PseError::Io { .. } | PseError::ChannelClosed { .. } | PseError::Runtime { .. } => {
                Self::Runtime(message)
            }
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    if let Command::Config(args) = &cli.command {
        return run_config(cli, args);
    }

    let session = Session::open(cli)?;
    let result = match &cli.command {
        Command::Analyze(args) => run_analyze(cli, &session, args),
        Command::Entropy(args) => run_entropy(cli, &session, args),
        Command::Decoys(args) => run_decoys(cli, &session, args),
        Command::Level(args) => run_level(cli, &session, args),
        Command::Simulate(args) => run_simulate(cli, &session, args),
        Command::Challenge(args) => run_challenge(cli, &session, args),
        Command::Health(args) => run_health(cli, &session, args),
        Command::Config(_) => Ok(()),
    };
    session.close();
    result
}

// ---------------------------------------------------------------------------
// Session: loaded config plus optional activity logger
// ---------------------------------------------------------------------------

struct Session {
    config: EngineConfig,
    logger: Option<ActivityLoggerHandle>,
    logger_join: Option<thread::JoinHandle<()>>,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self, CliError> {
        let config = EngineConfig::load(cli.config.as_deref())?;
        let (logger, logger_join) = match ActivityLoggerConfig::from_logging(&config.logging) {
            Some(logger_config) => {
                let (handle, join) = spawn_logger(logger_config)?;
                (Some(handle), Some(join))
            }
            None => (None, None),
        };

        let session = Self {
            config,
            logger,
            logger_join,
        };
        let config_hash = session.config.stable_hash()?;
        session.log(ActivityEvent::EngineStarted {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config_hash: config_hash.clone(),
        });
        session.log(ActivityEvent::ConfigLoaded {
            path: session.config.logging.config_file.display().to_string(),
            config_hash,
        });
        Ok(session)
    }

    fn log(&self, event: ActivityEvent) {
        if let Some(logger) = &self.logger {
            logger.send(event);
        }
    }

    /// Log `err` and hand it back as a CLI error.
    fn fail(&self, err: PseError) -> CliError {
        self.log(ActivityEvent::from_error(&err));
        CliError::from(err)
    }

    fn driver(&self) -> SimulationDriver {
        self.logger
            .clone()
            .map_or_else(SimulationDriver::new, SimulationDriver::with_logger)
    }

    fn close(mut self) {
        if let Some(logger) = self.logger.take() {
            if let Err(err) = logger.shutdown() {
                eprintln!("pse: warning: activity log incomplete: {err}");
            }
        }
        if let Some(join) = self.logger_join.take() {
            let _ = join.join();
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

// ---------------------------------------------------------------------------
// Strength commands
// ---------------------------------------------------------------------------

fn run_analyze(cli: &Cli, session: &Session, args: &AnalyzeArgs) -> Result<(), CliError> {
    let context = PersonalContext::new(args.personal.iter().map(String::as_str));
    let report = analyze_with_context(&args.password, &context);
    let bits = observed_entropy(&args.password);
    let length = args.password.chars().count();
    session.log(ActivityEvent::EntropyScored {
        length,
        bits: bits.value(),
        tier: bits.tier(),
    });

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Length: {length}");
            println!("Entropy: {bits} ({})", tier_label(bits.tier()));
            if report.is_empty() {
                println!("{}", "No weaknesses found.".green());
            } else {
                println!("Weaknesses ({}):", report.len());
                for flag in &report.flags {
                    println!("  - {:<16} {}", flag.to_string().yellow(), flag.description());
                }
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "analyze",
                "length": length,
                "entropy_bits": bits.value(),
                "tier": bits.tier(),
                "weaknesses": report.flags,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_entropy(cli: &Cli, session: &Session, args: &EntropyArgs) -> Result<(), CliError> {
    let (label, bits) = match &args.style {
        Some(name) => {
            let style = PasswordStyle::memorable(name)
                .ok_or_else(|| CliError::User(format!("unknown password style: {name}")))?;
            let bits = style_entropy(&style).map_err(|e| session.fail(e))?;
            (style.name().to_string(), bits)
        }
        None => {
            let classes = CharacterClasses {
                uppercase: !args.no_uppercase,
                lowercase: !args.no_lowercase,
                digits: !args.no_digits,
                symbols: !args.no_symbols,
            };
            let bits = entropy_bits_for_length(args.length, classes).map_err(|e| session.fail(e))?;
            (format!("random x{}", args.length), bits)
        }
    };

    let rate = args
        .guesses_per_second
        .unwrap_or(session.config.strength.guesses_per_second);
    let crack_time = estimate_crack_time(bits, rate).map_err(|e| session.fail(e))?;

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Style: {label}");
            println!("Entropy: {bits} ({})", tier_label(bits.tier()));
            println!("Crack time @ {rate:e} guesses/s: {crack_time}");
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "entropy",
                "style": label,
                "entropy_bits": bits.value(),
                "tier": bits.tier(),
                "guesses_per_second": rate,
                "crack_time": crack_time.to_string(),
                "log10_seconds": crack_time.log10_seconds,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_level(cli: &Cli, session: &Session, args: &LevelArgs) -> Result<(), CliError> {
    let difficulty = difficulty_for_level(args.level).map_err(|e| session.fail(e))?;
    let xp = xp_reward(args.level, &difficulty, &session.config.rewards);

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Level {}: {}", args.level, difficulty.tier.to_string().bold());
            println!("  Modifier:   {}", difficulty.modifier);
            println!("  Multiplier: {:.2}x", difficulty.multiplier);
            println!("  XP reward:  {xp}");
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "level",
                "difficulty": serde_json::to_value(difficulty)?,
                "xp_reward": xp,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoys and challenges
// ---------------------------------------------------------------------------

fn run_decoys(cli: &Cli, session: &Session, args: &DecoysArgs) -> Result<(), CliError> {
    let mut rng = seeded_rng(args.seed);
    let decoys = match generate_decoys(&args.reference, args.count, &mut rng, &session.config.decoys)
    {
        Ok(decoys) => decoys,
        Err(err) => {
            if let PseError::DecoyBudgetExhausted {
                requested,
                produced,
                attempts,
            } = &err
            {
                session.log(ActivityEvent::DecoyGenerationFailed {
                    requested: *requested,
                    produced: *produced,
                    attempts: *attempts,
                });
            }
            return Err(session.fail(err));
        }
    };
    session.log(ActivityEvent::DecoysGenerated {
        count: decoys.len(),
        reference_length: args.reference.chars().count(),
    });
    let order = DisplayOrder::new(args.reference.clone(), decoys, &mut rng);

    match output_mode(cli) {
        OutputMode::Human => print_display_order(&order),
        OutputMode::Json => {
            let payload = json!({
                "command": "decoys",
                "options": order.options(),
                "correct_index": order.correct_index(),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn print_display_order(order: &DisplayOrder) {
    for (i, option) in order.options().iter().enumerate() {
        if order.is_correct(i) {
            println!("  {i:>2}. {} {}", option.green(), "(reference)".dimmed());
        } else {
            println!("  {i:>2}. {option}");
        }
    }
}

fn run_challenge(cli: &Cli, session: &Session, args: &ChallengeArgs) -> Result<(), CliError> {
    match &args.kind {
        ChallengeKind::Memory {
            level,
            reference,
            seed,
        } => {
            let mut rng = seeded_rng(*seed);
            let round =
                MemoryChallenge::for_level(*level, reference.as_deref(), &mut rng, &session.config)
                    .map_err(|e| session.fail(e))?;
            session.log(ActivityEvent::ChallengeCreated {
                kind: "memory",
                level: *level,
                xp_reward: round.xp_reward,
            });

            match output_mode(cli) {
                OutputMode::Human => {
                    println!(
                        "Memory round, level {} ({:?}, {})",
                        round.level, round.bracket, round.difficulty.tier
                    );
                    println!(
                        "  Show for {}s, {} attempts, {} XP",
                        round.display_seconds, round.max_attempts, round.xp_reward
                    );
                    print_display_order(&round.display);
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "challenge memory",
                        "challenge": serde_json::to_value(&round)?,
                    });
                    write_json_line(&payload)?;
                }
            }
        }
        ChallengeKind::Cracker { level, seed } => {
            let mut rng = seeded_rng(*seed);
            let round = CrackerChallenge::for_level(*level, &mut rng, &session.config)
                .map_err(|e| session.fail(e))?;
            session.log(ActivityEvent::ChallengeCreated {
                kind: "cracker",
                level: *level,
                xp_reward: round.xp_reward,
            });

            match output_mode(cli) {
                OutputMode::Human => {
                    println!(
                        "Cracker round, level {} (tier {}, {})",
                        round.level, round.tier, round.difficulty.tier
                    );
                    println!("  Password: {}", round.password.bold());
                    println!(
                        "  {} hints, {}s limit, {} XP",
                        round.hints_available, round.time_limit_secs, round.xp_reward
                    );
                    for flag in &round.weaknesses {
                        println!("  - {}", flag.to_string().yellow());
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "challenge cracker",
                        "challenge": serde_json::to_value(&round)?,
                    });
                    write_json_line(&payload)?;
                }
            }
        }
    }
    Ok(())
}

fn run_health(cli: &Cli, session: &Session, args: &HealthArgs) -> Result<(), CliError> {
    let raw = fs::read_to_string(&args.vault).map_err(|e| session.fail(PseError::io(&args.vault, e)))?;
    let vault: Vec<SavedPassword> =
        serde_json::from_str(&raw).map_err(|e| session.fail(PseError::from(e)))?;
    let report = HealthReport::compute(&vault, Utc::now());
    session.log(ActivityEvent::HealthReported {
        passwords: report.total,
        score: report.score,
        issues: report.issues.len(),
    });

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Health score: {}/100", score_label(report.score));
            println!(
                "  {} passwords, {} strong, {} weak, average {:.1} bits",
                report.total, report.strong, report.weak, report.average_entropy
            );
            for issue in &report.issues {
                println!("  - {}: {}", issue.id(), issue.recommendation());
            }
            let unlocked: Vec<&str> = report
                .achievements
                .iter()
                .filter(|a| a.unlocked)
                .map(|a| a.id)
                .collect();
            if !unlocked.is_empty() {
                println!("  Achievements: {}", unlocked.join(", "));
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "health",
                "report": serde_json::to_value(&report)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

fn run_simulate(cli: &Cli, session: &Session, args: &SimulateArgs) -> Result<(), CliError> {
    let bits = observed_entropy(&args.password);
    let mut sim = CrackSimulation::new(&args.password, bits, &session.config.simulation)
        .map_err(|e| session.fail(e))?;

    let token = CancelToken::new();
    for signal in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, token.flag()) {
            eprintln!("[PSE-SIGNAL] failed to register signal {signal}: {e}");
        }
    }

    let mode = output_mode(cli);
    let mut pacer: Box<dyn Pacer> = if args.no_delay {
        Box::new(ManualPacer::new())
    } else {
        Box::new(ThreadPacer::from_config(&session.config.simulation))
    };

    let total_len = sim.len();
    let mut frames: Vec<CrackFrame> = Vec::with_capacity(total_len);
    let outcome = session
        .driver()
        .run(&mut sim, pacer.as_mut(), &token, |frame| {
            if mode == OutputMode::Human {
                print_frame(frame, total_len);
            }
            frames.push(frame.clone());
        });

    match mode {
        OutputMode::Human => {
            println!();
            match &outcome {
                SimulationOutcome::Completed { frames } => {
                    println!("{} after {frames} frames", "Cracked".red().bold());
                }
                SimulationOutcome::Cancelled { frames_emitted, .. } => {
                    println!("{} after {frames_emitted} frames", "Cancelled".yellow());
                }
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "simulate",
                "length": total_len,
                "entropy_bits": bits.value(),
                "frames": frames,
                "outcome": serde_json::to_value(&outcome)?,
            });
            write_json_line(&payload)?;
        }
    }

    if outcome.is_completed() {
        Ok(())
    } else {
        Err(CliError::Partial("simulation cancelled".to_string()))
    }
}

fn print_frame(frame: &CrackFrame, total_len: usize) {
    let hidden = total_len.saturating_sub(frame.revealed_prefix.chars().count());
    let mut stdout = io::stdout().lock();
    let _ = write!(
        stdout,
        "\r[{}{}] {:>5.1}%  {} attempts",
        frame.revealed_prefix.red(),
        "*".repeat(hidden).dimmed(),
        frame.progress * 100.0,
        frame.attempts
    );
    let _ = stdout.flush();
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(EngineConfig::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = EngineConfig::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config show",
                        "config": serde_json::to_value(&config)?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match EngineConfig::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.logging.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.logging.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn tier_label(tier: StrengthTier) -> ColoredString {
    match tier {
        StrengthTier::VeryWeak => "very weak".red().bold(),
        StrengthTier::Weak => "weak".red(),
        StrengthTier::Fair => "fair".yellow(),
        StrengthTier::Strong => "strong".green(),
        StrengthTier::VeryStrong => "very strong".green().bold(),
    }
}

fn score_label(score: u8) -> ColoredString {
    let text = score.to_string();
    match score {
        0..=39 => text.red(),
        40..=69 => text.yellow(),
        _ => text.green(),
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("PSE_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        Some("auto") | None => fallback,
        Some(_) => fallback,
    }
}
