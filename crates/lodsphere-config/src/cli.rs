//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Lodsphere command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lodsphere", about = "Cube-sphere quadtree LOD demo")]
pub struct CliArgs {
    /// Planet radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Viewer start position as `x,y,z`.
    #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
    pub viewer: Option<[f64; 3]>,

    /// Number of simulated frames.
    #[arg(long)]
    pub passes: Option<u32>,

    /// Process faces on separate threads.
    #[arg(long)]
    pub parallel: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parse `x,y,z` into a position. Exactly three finite components.
fn parse_position(s: &str) -> Result<[f64; 3], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let position = <[f64; 3]>::try_from(parts.as_slice())
        .map_err(|_| format!("expected x,y,z, got {} components", parts.len()))?;
    if position.iter().any(|c| !c.is_finite()) {
        return Err("components must be finite".to_string());
    }
    Ok(position)
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(radius) = args.radius {
            self.planet.radius = radius;
        }
        if let Some(start) = args.viewer {
            self.viewer.start = start;
        }
        if let Some(frames) = args.passes {
            self.viewer.frames = frames;
        }
        if let Some(parallel) = args.parallel {
            self.planet.parallel = parallel;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
