//! Location markers placed on the map

use serde::Serialize;

use crate::api::BackendClient;
use crate::models::{Location, UpdateSchedule};

/// How much detail a marker's panel can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailMode {
    /// Live sensor, weather and prediction sections
    Enhanced,
    /// Image, name, pollution level and coordinates only
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leaflet div-icon options for location markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub class_name: &'static str,
    pub html: &'static str,
    pub size: [u16; 2],
    pub anchor: [u16; 2],
}

pub const DONUT_ICON: MarkerIcon = MarkerIcon {
    class_name: "custom-donut-marker",
    html: r#"<div class="donut-outer"><div class="donut-inner"></div></div>"#,
    size: [20, 20],
    anchor: [10, 10],
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub location: Location,
    pub mode: DetailMode,
    pub icon: MarkerIcon,
}

/// Result of the page-load location fetch
#[derive(Debug, Clone, PartialEq)]
pub struct LocationLoad {
    pub locations: Vec<Location>,
    pub mode: DetailMode,
    pub schedule: Option<UpdateSchedule>,
}

/// Fetch the location list once, falling back to `fallback` on any failure.
///
/// The update schedule is only requested after the list loaded from the
/// backend; a schedule failure leaves it unset.
pub async fn fetch_locations(api: &BackendClient, fallback: &[Location]) -> LocationLoad {
    let locations = match api.get_all_locations().await {
        Ok(locations) => locations,
        Err(e) => {
            tracing::warn!(
                "Failed to load locations from backend, using {} fallback locations: {}",
                fallback.len(),
                e
            );
            return LocationLoad {
                locations: fallback.to_vec(),
                mode: DetailMode::Basic,
                schedule: None,
            };
        }
    };

    tracing::info!("Loaded {} locations from backend", locations.len());

    let schedule = match api.get_update_schedule().await {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            tracing::warn!("Failed to load update schedule: {}", e);
            None
        }
    };

    LocationLoad {
        locations,
        mode: DetailMode::Enhanced,
        schedule,
    }
}

/// Every marker placed so far. A location keeps its marker id across page
/// loads, so markers on pages opened earlier stay clickable.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    next_id: u64,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, location: Location, mode: DetailMode) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        tracing::debug!("Placed marker {} for '{}'", id, location.name);
        self.markers.push(Marker {
            id,
            location,
            mode,
            icon: DONUT_ICON,
        });
        id
    }

    /// Place one marker per loaded location.
    ///
    /// A location already on the map, matched by name, keeps its id and takes
    /// the new coordinates and mode.
    pub fn place(&mut self, load: &LocationLoad) -> Vec<Marker> {
        let mut placed: Vec<Marker> = Vec::with_capacity(load.locations.len());
        for location in &load.locations {
            let existing = self
                .markers
                .iter_mut()
                .find(|m| m.location.name == location.name);
            let id = match existing {
                Some(marker) => {
                    marker.location = location.clone();
                    marker.mode = load.mode;
                    marker.id
                }
                None => self.add(location.clone(), load.mode),
            };
            if placed.iter().any(|m| m.id == id) {
                continue;
            }
            if let Some(marker) = self.get(id) {
                placed.push(marker.clone());
            }
        }
        placed
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
