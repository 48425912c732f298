//! Utilities shared by the crate
pub mod logger;
