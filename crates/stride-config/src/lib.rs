//! Configuration for the stride movement stack.
//!
//! Runtime-tunable settings persisted to disk as RON files, with CLI
//! overrides via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, MovementConfig, NetworkConfig};
pub use error::ConfigError;
