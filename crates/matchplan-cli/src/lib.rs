//! Command-line collaborator for the matchplan calculator.
//!
//! Loads plan configuration, turns user-entered dollar text into cents, runs the
//! allocation engine and renders the resulting schedule. No allocation logic lives
//! here.

/// Argument parsing and command dispatch
pub mod cli;
/// TOML configuration with environment overrides
pub mod config;
/// Text and JSON rendering
pub mod report;
/// Structured logging setup
pub mod tracing_setup;

pub use cli::{Cli, Command};
pub use config::PlanConfig;
pub use report::{OutputFormat, ScheduleReport};
