//! Activity logging: JSONL writer plus a channel-fed logger thread.

pub mod activity;
pub mod jsonl;
