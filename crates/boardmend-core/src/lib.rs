//! Core types, traits, errors, config, and tracing shared by every boardmend crate.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
