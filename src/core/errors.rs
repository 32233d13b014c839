//! PSE-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, PseError>;

/// Top-level error type for the password security engine.
#[derive(Debug, Error)]
pub enum PseError {
    #[error("[PSE-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[PSE-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[PSE-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[PSE-2001] character pool is empty: at least one character class must be enabled")]
    EmptyCharacterPool,

    #[error("[PSE-2002] invalid entropy value: {value}")]
    InvalidEntropy { value: f64 },

    #[error("[PSE-2003] invalid level {level}: levels start at 1")]
    InvalidLevel { level: u64 },

    #[error("[PSE-2004] invalid guess rate: {value} guesses/second")]
    InvalidGuessRate { value: f64 },

    #[error("[PSE-2005] empty password passed to {context}")]
    EmptyPassword { context: &'static str },

    #[error(
        "[PSE-3001] cannot generate {requested} unique decoys within budget: \
         produced {produced} after {attempts} attempts"
    )]
    DecoyBudgetExhausted {
        requested: usize,
        produced: usize,
        attempts: usize,
    },

    #[error("[PSE-3101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[PSE-3201] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[PSE-3202] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[PSE-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl PseError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "PSE-1001",
            Self::MissingConfig { .. } => "PSE-1002",
            Self::ConfigParse { .. } => "PSE-1003",
            Self::EmptyCharacterPool => "PSE-2001",
            Self::InvalidEntropy { .. } => "PSE-2002",
            Self::InvalidLevel { .. } => "PSE-2003",
            Self::InvalidGuessRate { .. } => "PSE-2004",
            Self::EmptyPassword { .. } => "PSE-2005",
            Self::DecoyBudgetExhausted { .. } => "PSE-3001",
            Self::Serialization { .. } => "PSE-3101",
            Self::Io { .. } => "PSE-3201",
            Self::ChannelClosed { .. } => "PSE-3202",
            Self::Runtime { .. } => "PSE-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Decoy exhaustion is retryable only in the sense that a different seed
    /// may reach enough distinct mutations; precondition violations never are.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DecoyBudgetExhausted { .. } | Self::Io { .. } | Self::ChannelClosed { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for PseError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for PseError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
