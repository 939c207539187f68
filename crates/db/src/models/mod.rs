//! Row models for the migrated tables.

pub mod attachment;
pub mod log;
