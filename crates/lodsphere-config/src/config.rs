//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on `planet.resolution`.
pub const MAX_RESOLUTION: u32 = 256;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planet geometry and LOD settings.
    pub planet: PlanetConfig,
    /// Viewer start position and scripted flight.
    pub viewer: ViewerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// How a face decides its visible leaf set changed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RebuildMode {
    /// Compare visible leaf counts only.
    LeafCount,
    /// Compare the identity of every visible leaf.
    #[default]
    LeafSet,
}

/// Planet configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Sphere radius.
    pub radius: f64,
    /// Planet center in world space.
    pub center: [f64; 3],
    /// Explicit per-depth subdivision distances. Derived from the radius when absent.
    pub lod_distances: Option<Vec<f64>>,
    /// Leaves at this central angle from the viewer or wider are culled.
    pub culling_angle_deg: f64,
    /// Deepest quadtree depth.
    pub max_depth: u8,
    /// Vertex samples per leaf side.
    pub resolution: u32,
    /// Change detector for merged face meshes.
    pub rebuild: RebuildMode,
    /// Process the six faces on separate threads.
    pub parallel: bool,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            center: [0.0; 3],
            lod_distances: None,
            culling_angle_deg: 110.0,
            max_depth: 8,
            resolution: 8,
            rebuild: RebuildMode::default(),
            parallel: false,
        }
    }
}

/// Viewer configuration for the headless demo flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Where the viewer starts.
    pub start: [f64; 3],
    /// Where the scripted approach ends.
    pub end: [f64; 3],
    /// Number of simulated frames.
    pub frames: u32,
    /// The viewer moves once every this many frames and hovers in between.
    pub frames_per_step: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 0.0, 700.0],
            end: [0.0, 0.0, 101.0],
            frames: 60,
            frames_per_step: 2,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

impl Config {
    /// Reject values that parse but cannot describe a planet or flight.
    ///
    /// LOD table ordering is left to the planet itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let planet = &self.planet;
        if !planet.radius.is_finite() || planet.radius <= 0.0 {
            return Err(invalid("planet.radius", format!("must be positive, got {}", planet.radius)));
        }
        if planet.center.iter().any(|c| !c.is_finite()) {
            return Err(invalid("planet.center", format!("must be finite, got {:?}", planet.center)));
        }
        let angle = planet.culling_angle_deg;
        if angle.is_nan() || angle <= 0.0 || angle > 180.0 {
            return Err(invalid(
                "planet.culling_angle_deg",
                format!("must be in (0, 180], got {}", planet.culling_angle_deg),
            ));
        }
        if !(2..=MAX_RESOLUTION).contains(&planet.resolution) {
            return Err(invalid(
                "planet.resolution",
                format!("must be in 2..={MAX_RESOLUTION}, got {}", planet.resolution),
            ));
        }
        if let Some(distances) = &planet.lod_distances
            && distances.len() < planet.max_depth as usize + 1
        {
            return Err(invalid(
                "planet.lod_distances",
                format!(
                    "needs {} entries for max_depth {}, got {}",
                    planet.max_depth as usize + 1,
                    planet.max_depth,
                    distances.len()
                ),
            ));
        }
        if self.viewer.frames_per_step == 0 {
            return Err(invalid("viewer.frames_per_step", "must be at least 1".to_string()));
        }
        let mut coords = self.viewer.start.iter().chain(&self.viewer.end);
        if coords.any(|c| !c.is_finite()) {
            return Err(invalid("viewer", "positions must be finite".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
