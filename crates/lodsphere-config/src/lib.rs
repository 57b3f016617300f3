//! Configuration for the lodsphere demo host.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and are validated on load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, PlanetConfig, RebuildMode, ViewerConfig};
pub use error::ConfigError;
