//! Debris predictions keyed by forecast horizon

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Reported;

/// Color used for risk levels the dashboard does not recognize
pub const UNKNOWN_RISK_COLOR: &str = "#9e9e9e";

/// Risk category attached to a prediction or early warning
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    VeryLow,
    Other(String),
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "critical" => RiskLevel::Critical,
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            "very_low" => RiskLevel::VeryLow,
            _ => RiskLevel::Other(value),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(value: RiskLevel) -> Self {
        value.as_str().to_string()
    }
}

impl RiskLevel {
    /// The backend's spelling of this level
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Other(raw) => raw,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "#ff0000",
            RiskLevel::High => "#ff6b6b",
            RiskLevel::Medium => "#ffd93d",
            RiskLevel::Low => "#6bcf7f",
            RiskLevel::VeryLow => "#4a9eff",
            RiskLevel::Other(_) => UNKNOWN_RISK_COLOR,
        }
    }

    /// Uppercased label such as `VERY LOW RISK`
    pub fn label(&self) -> String {
        let raw = self.as_str().trim();
        if raw.is_empty() {
            return "UNKNOWN RISK".to_string();
        }
        format!("{} RISK", raw.replace('_', " ").to_uppercase())
    }

    /// CSS class name; unrecognized levels share a single class
    pub fn css_class(&self) -> &str {
        match self {
            RiskLevel::Other(_) => "unknown",
            known => known.as_str(),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence fraction rendered as a whole percentage
pub fn confidence_percent(confidence: f64) -> u32 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// A single horizon's prediction as sent by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonPayload {
    #[serde(default)]
    pub prediction: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of `GET /get_enhanced_predictions/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionsPayload {
    #[serde(default)]
    pub predictions: HashMap<String, HorizonPayload>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Predicted debris concentration for one horizon
#[derive(Debug, Clone, PartialEq)]
pub struct DebrisForecast {
    pub value: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

impl DebrisForecast {
    pub fn confidence_percent(&self) -> u32 {
        confidence_percent(self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HorizonForecast {
    /// Horizon key as sent by the backend, e.g. `6h`
    pub horizon: String,
    pub hours: Option<u32>,
    pub outcome: Reported<DebrisForecast>,
}

/// All horizons for one location, shortest horizon first
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSet {
    pub horizons: Vec<HorizonForecast>,
    pub timestamp: Option<String>,
}

impl PredictionSet {
    pub fn from_payload(payload: PredictionsPayload) -> Reported<PredictionSet> {
        if let Some(error) = payload.error {
            return Reported::Error(error);
        }

        let mut horizons: Vec<HorizonForecast> = payload
            .predictions
            .into_iter()
            .map(|(horizon, raw)| HorizonForecast {
                hours: parse_horizon_hours(&horizon),
                outcome: horizon_outcome(raw),
                horizon,
            })
            .collect();

        // Unparseable keys sort after every numeric horizon.
        horizons.sort_by(|a, b| {
            (a.hours.is_none(), a.hours, &a.horizon).cmp(&(b.hours.is_none(), b.hours, &b.horizon))
        });

        Reported::Data(PredictionSet {
            horizons,
            timestamp: payload.timestamp,
        })
    }

    pub fn get(&self, horizon: &str) -> Option<&HorizonForecast> {
        self.horizons.iter().find(|h| h.horizon == horizon)
    }
}

fn horizon_outcome(raw: HorizonPayload) -> Reported<DebrisForecast> {
    if let Some(error) = raw.error {
        return Reported::Error(error);
    }
    match (raw.prediction, raw.risk_level) {
        (Some(value), Some(risk_level)) => Reported::Data(DebrisForecast {
            value,
            risk_level,
            confidence: raw.confidence.unwrap_or(0.0),
        }),
        _ => Reported::Error("Prediction unavailable".to_string()),
    }
}

fn parse_horizon_hours(horizon: &str) -> Option<u32> {
    horizon.strip_suffix('h')?.parse().ok()
}
