//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use password_security_engine::prelude::*;
//! ```

// Core
pub use crate::core::config::EngineConfig;
pub use crate::core::errors::{PseError, Result};

// Strength
pub use crate::strength::crack_time::{CrackTime, TimeUnit, estimate_crack_time, format_crack_time};
pub use crate::strength::entropy::{
    CharacterClasses, EntropyBits, StrengthTier, entropy_bits, entropy_bits_for_length,
    observed_entropy, strength_tier,
};
pub use crate::strength::style::{PasswordStyle, style_entropy};

// Analyzer
pub use crate::analyzer::weakness::{
    PersonalContext, WeaknessFlag, WeaknessReport, analyze_weaknesses, analyze_with_context,
};

// Progression
pub use crate::progression::difficulty::{
    DifficultyDescriptor, DifficultyTier, difficulty_for_level, xp_reward,
};

// Decoys
pub use crate::decoy::generator::{DisplayOrder, generate_decoys};

// Simulation
pub use crate::simulation::driver::{
    CancelToken, ManualPacer, Pacer, SimulationDriver, SimulationHandle, SimulationOutcome,
    ThreadPacer,
};
pub use crate::simulation::frames::{CrackFrame, CrackSimulation};

// Content
pub use crate::content::cracker::CrackerChallenge;
pub use crate::content::health::{Achievement, HealthReport, SavedPassword};
pub use crate::content::memory::MemoryChallenge;

// Logger
pub use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
