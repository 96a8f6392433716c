//! Location detail pipeline
//!
//! One pipeline serves both marker kinds. Enhanced markers fetch sensor,
//! weather and prediction data concurrently and fall back to the basic view
//! if any of the three fails; basic markers render the basic view directly.
//! Every run takes a panel ticket from its page session first and only
//! commits its result if that page started no newer run since.

use chrono::Utc;

use crate::api::BackendClient;
use crate::markers::{DetailMode, MarkerId};
use crate::models::{EarlyWarning, Location, Reported, SensorReading, UpdateSchedule, WarningInputs};
use crate::panel::{render_basic, render_enhanced, EnhancedPanel};
use crate::prediction::PredictionSet;
use crate::state::{CommittedPanel, PanelContent, PanelTicket, StateHandle};
use crate::weather::WeatherSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    /// The panel is now displayed
    Displayed(CommittedPanel),
    /// A newer panel request started before this one finished
    Superseded { generation: u64 },
    UnknownMarker,
}

/// Open the detail panel for a marker on the page identified by `session`
pub async fn show_location_detail(
    state: &StateHandle,
    api: &BackendClient,
    session: &str,
    marker_id: MarkerId,
) -> DetailOutcome {
    let (marker, ticket, schedule) = {
        let mut app = state.write().await;
        let Some(marker) = app.markers.get(marker_id).cloned() else {
            tracing::debug!("Detail requested for unknown marker {}", marker_id);
            return DetailOutcome::UnknownMarker;
        };
        let ticket = app.begin_panel(session, marker_id);
        (marker, ticket, app.schedule.clone())
    };

    tracing::debug!(
        "Loading {:?} detail for '{}' (generation {})",
        marker.mode,
        marker.location.name,
        ticket.generation
    );

    let content = match marker.mode {
        DetailMode::Basic => basic_content(&marker.location),
        DetailMode::Enhanced => {
            enhanced_content(state, api, session, ticket, &marker.location, schedule.as_ref())
                .await
        }
    };

    let mut app = state.write().await;
    match app.commit_panel(session, ticket, content) {
        Some(panel) => DetailOutcome::Displayed(panel),
        None => DetailOutcome::Superseded {
            generation: ticket.generation,
        },
    }
}

fn basic_content(location: &Location) -> PanelContent {
    PanelContent {
        mode: DetailMode::Basic,
        html: render_basic(location),
        predictions: None,
    }
}

async fn enhanced_content(
    state: &StateHandle,
    api: &BackendClient,
    session: &str,
    ticket: PanelTicket,
    location: &Location,
    schedule: Option<&UpdateSchedule>,
) -> PanelContent {
    let name = location.name.as_str();
    let fetched = tokio::try_join!(
        api.get_sensor_data(name),
        api.get_weather_data(name),
        api.get_enhanced_predictions(name),
    );

    let (sensors, weather, predictions) = match fetched {
        Ok(sections) => sections,
        Err(e) => {
            tracing::warn!(
                "Failed to load detail data for '{}', showing basic info: {}",
                name,
                e
            );
            return basic_content(location);
        }
    };

    let still_current = state.read().await.is_panel_current(session, ticket);
    let warning = if still_current {
        early_warning(api, &sensors, &weather).await
    } else {
        None
    };

    let html = render_enhanced(&EnhancedPanel {
        location,
        sensors: &sensors,
        weather: &weather,
        predictions: &predictions,
        warning: warning.as_ref(),
        schedule,
        now: Utc::now(),
    });

    let trend = match predictions {
        Reported::Data(set) => set,
        Reported::Error(_) => PredictionSet {
            horizons: Vec::new(),
            timestamp: None,
        },
    };

    PanelContent {
        mode: DetailMode::Enhanced,
        html,
        predictions: Some(trend),
    }
}

/// Inputs for the warning request, taken from the fetched sections
pub fn warning_inputs(
    sensors: &Reported<SensorReading>,
    weather: &Reported<WeatherSnapshot>,
) -> Option<WarningInputs> {
    let reading = sensors.data()?;
    let current = &weather.data()?.current;
    Some(WarningInputs {
        rainfall: current.rainfall_mm,
        wind_speed: current.wind_kph.unwrap_or(0.0),
        tide_level: reading.tide_level.value.unwrap_or(0.0),
    })
}

// A failed warning only omits the banner.
async fn early_warning(
    api: &BackendClient,
    sensors: &Reported<SensorReading>,
    weather: &Reported<WeatherSnapshot>,
) -> Option<EarlyWarning> {
    let inputs = warning_inputs(sensors, weather)?;
    match api.early_warning(&inputs).await {
        Ok(warning) => Some(warning),
        Err(e) => {
            tracing::warn!("Early warning request failed: {}", e);
            None
        }
    }
}
