//! Headless demo host that flies a viewer toward a cube-sphere planet.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p lodsphere-demo` for the default approach, or
//! `cargo run -p lodsphere-demo -- --viewer 0,0,150 --passes 1` for a single pass.

mod movement;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use glam::DVec3;
use lodsphere_config::{CliArgs, Config, ConfigError, PlanetConfig, RebuildMode};
use lodsphere_cubesphere::CubeFace;
use lodsphere_lod::{LodError, PassStats, Planet, PlanetSettings, RebuildPolicy};
use lodsphere_mesh::FaceMesh;
use tracing::{debug, error, info};

use crate::movement::{ApproachPath, MovementTrigger};

fn planet_settings(config: &PlanetConfig) -> PlanetSettings {
    PlanetSettings {
        radius: config.radius,
        center: DVec3::from_array(config.center),
        lod_distances: config.lod_distances.clone(),
        culling_min_angle: config.culling_angle_deg.to_radians(),
        max_depth: config.max_depth,
        resolution: config.resolution,
        rebuild_policy: match config.rebuild {
            RebuildMode::LeafCount => RebuildPolicy::LeafCount,
            RebuildMode::LeafSet => RebuildPolicy::LeafSet,
        },
    }
}

fn log_face(face: CubeFace, mesh: &FaceMesh) {
    info!(
        "{:?}: {} vertices, {} triangles, {} position floats, {} normal floats",
        face,
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.positions_flat().len(),
        mesh.normals_flat().len()
    );
}

fn fly(config: &Config) -> Result<PassStats, LodError> {
    let path = ApproachPath::new(
        DVec3::from_array(config.viewer.start),
        DVec3::from_array(config.viewer.end),
        config.viewer.frames,
        config.viewer.frames_per_step,
    );
    let mut planet = Planet::new(planet_settings(&config.planet), path.position_at(0))?;
    let mut trigger = MovementTrigger::new();
    let mut last = PassStats::default();
    let mut passes = 0u32;

    for frame in 0..path.frames() {
        let position = path.position_at(frame);
        if !trigger.observe(position) {
            debug!("Frame {frame}: viewer idle, skipping pass");
            continue;
        }
        planet.set_viewer_position(position);
        last = if config.planet.parallel {
            planet.generation_pass_parallel()
        } else {
            planet.generation_pass()
        };
        passes += 1;
    }

    info!(
        "Flight finished after {} frames, {} generation passes, viewer altitude {:.2}",
        path.frames(),
        passes,
        planet.viewer_distance() - planet.radius()
    );
    for face in planet.faces() {
        log_face(face.face(), face.mesh());
    }
    Ok(last)
}

/// Load `config.ron` from `config_dir`, apply CLI overrides and validate.
///
/// A missing file is created with defaults; an unreadable or invalid one is an error.
fn load_config(config_dir: &Path, args: &CliArgs) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_create(config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lodsphere")
    });

    let config = match load_config(&config_dir, &args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let log_dir = config_dir.join("logs");
    lodsphere_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match fly(&config) {
        Ok(stats) => {
            info!(
                "Final pass: {} visible leaves of {}, {} vertices, {} triangles",
                stats.visible_leaves, stats.total_leaves, stats.vertices, stats.triangles
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Planet setup failed: {e}");
            ExitCode::FAILURE
        }
    }
}
