//! Crack simulation: frame state machine and paced driver.

pub mod driver;
pub mod frames;
