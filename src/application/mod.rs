//! Application layer - subscription coordination and domain facades.

pub mod coordinator;
pub mod facades;
