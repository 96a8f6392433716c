//! Map viewport and tile layers

use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::theme::Theme;

const CARTO_DARK_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";
const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";
const OSM_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Tile source handed to the map widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub subdomains: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                url: CARTO_DARK_URL.to_string(),
                attribution: CARTO_ATTRIBUTION.to_string(),
                subdomains: "abcd".to_string(),
                max_zoom: 19,
            },
            Theme::Light => Self {
                url: OSM_URL.to_string(),
                attribution: OSM_ATTRIBUTION.to_string(),
                subdomains: "abc".to_string(),
                max_zoom: 19,
            },
        }
    }
}

/// Map configuration plus the active tile layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewport {
    pub center: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_bounds: [[f64; 2]; 2],
    pub max_bounds_viscosity: f64,
    pub tile_layer: TileLayer,
}

impl MapViewport {
    pub fn new(config: &MapConfig, theme: Theme) -> Self {
        Self {
            center: config.center,
            zoom: config.zoom,
            min_zoom: config.min_zoom,
            max_bounds: config.max_bounds,
            max_bounds_viscosity: config.max_bounds_viscosity,
            tile_layer: TileLayer::for_theme(theme),
        }
    }

    /// Swap the tile layer for the given theme, returning the new layer
    pub fn apply_theme(&mut self, theme: Theme) -> &TileLayer {
        self.tile_layer = TileLayer::for_theme(theme);
        tracing::debug!("Map tile layer switched to {}", self.tile_layer.url);
        &self.tile_layer
    }
}
