//! CLI command handlers

pub mod commands;

pub use commands::{compare, latest, list, RunOptions, RunOutcome};
