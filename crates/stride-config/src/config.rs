//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Movement tuning (abilities and baseline locomotion).
    pub movement: MovementConfig,
    /// Network/session settings.
    pub network: NetworkConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Tuning for the character movement component and its abilities.
///
/// Distances are in meters, speeds in m/s, forces in m/s of added velocity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal distance covered by a directional teleport.
    pub teleport_distance: f32,
    /// Maximum gap between the capsule surface and a wall for wall-running.
    pub wall_max_distance: f32,
    /// Tolerance for wall-normal change between ticks, 0 to 1. Lower values
    /// allow wall-running around tighter corners.
    pub wall_run_corner_variance: f32,
    /// Speed the character is held at while wall-running.
    pub wall_run_speed: f32,
    /// Gravity scale applied while wall-running.
    pub wall_run_gravity_scale: f32,
    /// Impulse magnitude applied when jumping off a wall.
    pub wall_jump_force: f32,
    /// How vertical a surface normal may be and still count as a wall
    /// (strict upper bound on `|dot(up, normal)|`).
    pub wall_normal_vertical_limit: f32,
    /// Downward gravity acceleration, m/s².
    pub gravity: f32,
    /// Gravity scale outside of wall-running.
    pub default_gravity_scale: f32,
    /// Baseline maximum walk speed before modifiers.
    pub max_walk_speed: f32,
    /// Upward velocity applied by a grounded jump.
    pub jump_impulse: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            teleport_distance: 10.0,
            wall_max_distance: 0.5,
            wall_run_corner_variance: 0.6,
            wall_run_speed: 10.0,
            wall_run_gravity_scale: 0.15,
            wall_jump_force: 8.0,
            wall_normal_vertical_limit: 0.1,
            gravity: -9.81,
            default_gravity_scale: 1.0,
            max_walk_speed: 5.0,
            jump_impulse: 7.0,
        }
    }
}

/// Network/session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Server address.
    pub server_address: String,
    /// Server port.
    pub server_port: u16,
    /// Simulation tick rate (Hz) shared by client prediction and server.
    pub tick_rate: u32,
    /// Maximum retained unacknowledged moves on a predicting client.
    pub move_log_capacity: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1".to_string(),
            server_port: 7777,
            tick_rate: 60,
            move_log_capacity: 128,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log every ability replication message as it is applied.
    pub trace_replication: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_replication: false,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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
        let pretty = ron::ser::PrettyConfig::new();
        let contents =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(&config_path, contents).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
