//! Weather payload adapter
//!
//! The backend relays whatever its weather provider returned, so the same
//! quantity can arrive under several names (`temp_c`, `temp`,
//! `current.temp_c`, ...). Everything is normalized here, once, into
//! [`WeatherSnapshot`]; renderers never look at raw payloads.

use serde_json::Value;

use crate::models::Reported;

/// Maximum number of forecast days shown in the panel
pub const FORECAST_DAYS_SHOWN: usize = 2;

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub rainfall_mm: f64,
    pub wind_kph: Option<f64>,
    pub humidity_pct: Option<f64>,
}

/// A single forecast day
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastDay {
    pub date: Option<String>,
    pub total_rainfall_mm: f64,
    pub max_wind_kph: f64,
    pub avg_temp_c: f64,
}

/// Normalized weather data for one location
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    pub note: Option<String>,
    pub timestamp: Option<String>,
}

impl WeatherSnapshot {
    /// Normalize a raw `/get_weather_data` body
    pub fn from_payload(payload: &Value) -> Reported<WeatherSnapshot> {
        if let Some(error) = error_message(payload.get("error")) {
            return Reported::Error(error);
        }

        let current = payload.get("current").unwrap_or(&Value::Null);
        if let Some(error) = error_message(current.get("error")) {
            return Reported::Error(error);
        }

        let forecast = payload
            .get("forecast")
            .and_then(Value::as_array)
            .map(|days| days.iter().map(forecast_day).collect())
            .unwrap_or_default();

        Reported::Data(WeatherSnapshot {
            current: current_conditions(current),
            forecast,
            note: payload
                .get("note")
                .and_then(Value::as_str)
                .map(str::to_string),
            timestamp: payload
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// True when the backend says it served simulated data
    pub fn is_mock(&self) -> bool {
        self.note
            .as_deref()
            .is_some_and(|note| note.to_lowercase().contains("mock"))
    }

    /// The forecast days the panel shows
    pub fn forecast_shown(&self) -> &[ForecastDay] {
        let shown = self.forecast.len().min(FORECAST_DAYS_SHOWN);
        &self.forecast[..shown]
    }
}

fn current_conditions(current: &Value) -> CurrentConditions {
    CurrentConditions {
        temperature_c: first_number(current, &[&["temp_c"], &["temp"], &["current", "temp_c"]]),
        rainfall_mm: first_number(
            current,
            &[&["precip_mm"], &["rainfall"], &["current", "precip_mm"]],
        )
        .unwrap_or(0.0),
        wind_kph: first_number(
            current,
            &[&["wind_kph"], &["wind_speed"], &["current", "wind_kph"]],
        ),
        humidity_pct: first_number(current, &[&["humidity"], &["current", "humidity"]]),
    }
}

fn forecast_day(day: &Value) -> ForecastDay {
    ForecastDay {
        date: day.get("date").and_then(Value::as_str).map(str::to_string),
        total_rainfall_mm: first_number(
            day,
            &[&["total_rainfall"], &["day", "totalprecip_mm"], &["precip_mm"]],
        )
        .unwrap_or(0.0),
        max_wind_kph: first_number(
            day,
            &[&["max_wind_speed"], &["day", "maxwind_kph"], &["wind_kph"]],
        )
        .unwrap_or(0.0),
        avg_temp_c: first_number(day, &[&["avg_temp"], &["day", "avgtemp_c"], &["temp_c"]])
            .unwrap_or(0.0),
    }
}

/// Return the first path that resolves to a number.
///
/// Numeric strings count as numbers; anything else falls through to the
/// next candidate path.
fn first_number(value: &Value, paths: &[&[&str]]) -> Option<f64> {
    paths.iter().find_map(|path| {
        let found = path
            .iter()
            .try_fold(value, |node, key| node.get(*key))?;
        match found {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    })
}

fn error_message(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
