//! Backend payload and domain types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::prediction::RiskLevel;

/// A monitored river location as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub pollution_level: Option<f64>,
}

impl Location {
    pub fn new(name: &str, lat: f64, lng: f64, image: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lng,
            image: image.map(str::to_string),
            pollution_level: None,
        }
    }
}

/// Response body of `GET /get_all_locations`
#[derive(Debug, Deserialize)]
pub(crate) struct LocationList {
    #[serde(default)]
    pub locations: Option<Vec<Location>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Section data that the backend either delivered or flagged with an error.
///
/// An error-flagged body is still a successful fetch: the message is shown
/// inside its section instead of downgrading the whole panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Reported<T> {
    Data(T),
    Error(String),
}

impl<T> Reported<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Reported::Data(data) => Some(data),
            Reported::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Reported::Data(_) => None,
            Reported::Error(message) => Some(message),
        }
    }
}

/// Online/offline status of a single sensor metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Online,
    #[default]
    #[serde(other)]
    Offline,
}

impl SensorStatus {
    pub fn icon(self) -> &'static str {
        match self {
            SensorStatus::Online => "🟢",
            SensorStatus::Offline => "🔴",
        }
    }
}

/// Response body of `GET /get_sensor_data/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorPayload {
    #[serde(default)]
    pub water_level: Option<f64>,
    #[serde(default)]
    pub flow_rate: Option<f64>,
    #[serde(default)]
    pub tide_level: Option<f64>,
    #[serde(default)]
    pub sensor_status: HashMap<String, SensorStatus>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One measured quantity and the status of the sensor behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorMetric {
    pub value: Option<f64>,
    pub status: SensorStatus,
}

/// Latest readings for one location
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub water_level: SensorMetric,
    pub flow_rate: SensorMetric,
    pub tide_level: SensorMetric,
    pub timestamp: Option<String>,
}

impl SensorReading {
    pub fn from_payload(payload: SensorPayload) -> Reported<SensorReading> {
        if let Some(error) = payload.error {
            return Reported::Error(error);
        }

        let metric = |value: Option<f64>, key: &str| SensorMetric {
            value,
            status: payload
                .sensor_status
                .get(key)
                .copied()
                .unwrap_or_default(),
        };

        Reported::Data(SensorReading {
            water_level: metric(payload.water_level, "water_level"),
            flow_rate: metric(payload.flow_rate, "flow_rate"),
            tide_level: metric(payload.tide_level, "tide_level"),
            timestamp: payload.timestamp,
        })
    }
}

/// Response body of `GET /get_update_schedule`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSchedule {
    #[serde(default)]
    pub next_update: Option<String>,
}

/// Request body of `POST /predict_debris`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInputs {
    pub rainfall: f64,
    pub wind_speed: f64,
    pub tide_level: f64,
    pub water_flow_rate: f64,
}

/// Response body of `POST /predict_debris`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisPrediction {
    pub prediction: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

/// Request body of `POST /early_warning`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarningInputs {
    pub rainfall: f64,
    pub wind_speed: f64,
    pub tide_level: f64,
}

/// Response body of `POST /early_warning`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarning {
    pub warning_level: RiskLevel,
    #[serde(default)]
    pub warning_score: Option<u32>,
    pub message: String,
}
