//! Configuration types for the debrisense dashboard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Location;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub map: MapConfig,
    /// Markers shown when the backend's location list cannot be loaded
    #[serde(default = "default_fallback_locations")]
    pub fallback_locations: Vec<Location>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            dashboard: DashboardConfig::default(),
            map: MapConfig::default(),
            fallback_locations: default_fallback_locations(),
        }
    }
}

/// Prediction backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    /// Unset means the HTTP client's own defaults apply
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_seconds: None,
        }
    }
}

/// Dashboard web server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_dashboard_port(),
            preferences_path: default_preferences_path(),
            image_dir: default_image_dir(),
        }
    }
}

/// Initial map viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center")]
    pub center: [f64; 2],
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_bounds")]
    pub max_bounds: [[f64; 2]; 2],
    #[serde(default = "default_max_bounds_viscosity")]
    pub max_bounds_viscosity: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
            min_zoom: default_min_zoom(),
            max_bounds: default_max_bounds(),
            max_bounds_viscosity: default_max_bounds_viscosity(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_dashboard_port() -> u16 {
    11116
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("debrisense-preferences.json")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("data/image")
}

// Malaysia
fn default_center() -> [f64; 2] {
    [4.2105, 108.9758]
}

fn default_zoom() -> u8 {
    6
}

fn default_min_zoom() -> u8 {
    2
}

fn default_max_bounds() -> [[f64; 2]; 2] {
    [[-90.0, -180.0], [90.0, 180.0]]
}

fn default_max_bounds_viscosity() -> f64 {
    1.0
}

fn default_fallback_locations() -> Vec<Location> {
    vec![
        Location::new(
            "Sungai Inanam",
            5.997846609055653,
            116.12997039272707,
            Some("sungaiInanam.png"),
        ),
        Location::new(
            "Sungai Klang",
            3.0179012973130344,
            101.37692352872754,
            Some("sungaiKlang.png"),
        ),
        Location::new(
            "Sungai Pinang",
            5.403345957392342,
            100.33223539657536,
            Some("sungaiPinang.png"),
        ),
    ]
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DebrisenseError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
