//! Strength model: entropy, tiers, crack-time estimates, style estimates.

pub mod crack_time;
pub mod entropy;
pub mod style;
