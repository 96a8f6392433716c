//! Sidebar markup for the location detail panel
//!
//! Every value coming from the backend or the config file is escaped before
//! it is placed in markup. Section toggling and timeframe switching happen
//! in the page script via `toggleSection` and `showTimeframe`.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{EarlyWarning, Location, Reported, SensorMetric, SensorReading, UpdateSchedule};
use crate::prediction::{HorizonForecast, PredictionSet};
use crate::timefmt::{format_date, format_next_update, format_time_ago};
use crate::weather::WeatherSnapshot;

pub const WEATHER_UNAVAILABLE: &str = "Weather data is currently unavailable. Please try again later.";
pub const NO_FORECAST: &str = "No forecast data available";

/// Escape text for use in element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Placeholder shown while detail data is being fetched
pub fn render_loading(location: &Location) -> String {
    format!(
        r#"{header}
<div class="loading">
    <p>Loading real-time data...</p>
</div>"#,
        header = location_header(location),
    )
}

/// Reduced view used for fallback markers and failed detail fetches
pub fn render_basic(location: &Location) -> String {
    let pollution = location
        .pollution_level
        .map(|level| level.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    format!(
        r#"{header}
<div class="basic-data">
    <h4>Basic Information</h4>
    <p><strong>Pollution Level:</strong> {pollution}</p>
    <p><strong>Location:</strong> {lat}, {lng}</p>
</div>"#,
        header = location_header(location),
        pollution = pollution,
        lat = location.lat,
        lng = location.lng,
    )
}

/// Everything the enhanced view is rendered from
#[derive(Debug, Clone, Copy)]
pub struct EnhancedPanel<'a> {
    pub location: &'a Location,
    pub sensors: &'a Reported<SensorReading>,
    pub weather: &'a Reported<WeatherSnapshot>,
    pub predictions: &'a Reported<PredictionSet>,
    pub warning: Option<&'a EarlyWarning>,
    pub schedule: Option<&'a UpdateSchedule>,
    pub now: DateTime<Utc>,
}

pub fn render_enhanced(panel: &EnhancedPanel<'_>) -> String {
    let sensor_updated = panel.sensors.data().and_then(|s| s.timestamp.as_deref());
    let weather_updated = panel.weather.data().and_then(|w| w.timestamp.as_deref());
    let predictions_updated = panel
        .predictions
        .data()
        .and_then(|p| p.timestamp.as_deref());

    let mut html = location_header(panel.location);
    html.push_str("\n<div class=\"enhanced-data\">\n");
    if let Some(warning) = panel.warning {
        html.push_str(&warning_banner(warning));
    }
    html.push_str(&section(
        "sensor-section",
        "Real-time Sensors",
        Some(&format_time_ago(sensor_updated, panel.now)),
        &sensor_section(panel.sensors),
    ));
    html.push_str(&section(
        "weather-section",
        "Weather Forecast",
        Some(&format_time_ago(weather_updated, panel.now)),
        &weather_section(panel.weather),
    ));
    html.push_str(&section(
        "predictions-section",
        "AI Predictions",
        Some(&format_time_ago(predictions_updated, panel.now)),
        &predictions_section(panel.predictions),
    ));
    html.push_str(&section(
        "charts-section",
        "Data Trends",
        None,
        r#"<div class="chart-container">
        <canvas id="predictionChart"></canvas>
    </div>"#,
    ));
    let _ = write!(
        html,
        r#"<div class="update-schedule">
    <p><strong>Next Update:</strong> {}</p>
</div>
</div>"#,
        format_next_update(panel.schedule, panel.now)
    );
    html
}

fn location_header(location: &Location) -> String {
    let name = escape_html(&location.name);
    let fallback = format!(
        r#"<div class="no-image" style="display: {display};">
        <p>📸 Image not available</p>
        <p>{name}</p>
    </div>"#,
        display = if location.image.is_some() { "none" } else { "block" },
        name = name,
    );
    let image = match &location.image {
        Some(file) => format!(
            r#"<img src="/data/image/{src}" alt="{name}" class="location-img" onerror="this.style.display='none'; this.nextElementSibling.style.display='block';">
    "#,
            src = escape_html(file),
            name = name,
        ),
        None => String::new(),
    };
    format!(
        r#"<div class="location-image">
    {image}{fallback}
</div>
<div class="river-name">
    <h3>{name}</h3>
</div>"#,
    )
}

fn section(id: &str, title: &str, updated: Option<&str>, body: &str) -> String {
    let updated = updated
        .map(|text| format!(r#"<span class="update-time">Updated: {}</span>"#, text))
        .unwrap_or_default();
    format!(
        r#"<div class="data-section">
    <div class="section-header" onclick="toggleSection('{id}')">
        <h4>{title}</h4>
        <span class="toggle-icon">▼</span>
        {updated}
    </div>
    <div id="{id}" class="section-content">
    {body}
    </div>
</div>
"#,
    )
}

fn error_line(message: &str) -> String {
    format!(r#"<p class="error">❌ {}</p>"#, escape_html(message))
}

fn value_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn sensor_section(sensors: &Reported<SensorReading>) -> String {
    let reading = match sensors {
        Reported::Data(reading) => reading,
        Reported::Error(message) => return error_line(message),
    };

    let item = |label: &str, metric: &SensorMetric, unit: &str| {
        let class = if metric.value.is_some() { "online" } else { "offline" };
        format!(
            r#"<div class="sensor-item {class}">
            <div class="sensor-header">
                <span>{label}</span>
                <span class="status">{icon}</span>
            </div>
            <div class="sensor-value">{value} {unit}</div>
        </div>"#,
            icon = metric.status.icon(),
            value = value_or_na(metric.value),
        )
    };

    format!(
        r#"<div class="sensor-grid">
        {}
        {}
        {}
    </div>"#,
        item("Water Level", &reading.water_level, "m"),
        item("Flow Rate", &reading.flow_rate, "m³/s"),
        item("Tide Level", &reading.tide_level, "m"),
    )
}

fn weather_section(weather: &Reported<WeatherSnapshot>) -> String {
    let snapshot = match weather {
        Reported::Data(snapshot) => snapshot,
        Reported::Error(message) => {
            tracing::debug!("Weather section error: {}", message);
            return error_line(WEATHER_UNAVAILABLE);
        }
    };

    let mut html = String::new();
    if snapshot.is_mock() {
        if let Some(note) = &snapshot.note {
            let _ = write!(html, r#"<p class="weather-note">ℹ️ {}</p>"#, escape_html(note));
        }
    }

    let current = &snapshot.current;
    let _ = write!(
        html,
        r#"<div class="current-weather">
        <h5>Current Conditions</h5>
        <div class="weather-grid">
            <div class="weather-item"><span>Temperature</span><span class="value">{}°C</span></div>
            <div class="weather-item"><span>Rainfall</span><span class="value">{} mm</span></div>
            <div class="weather-item"><span>Wind Speed</span><span class="value">{} km/h</span></div>
            <div class="weather-item"><span>Humidity</span><span class="value">{}%</span></div>
        </div>
    </div>"#,
        value_or_na(current.temperature_c),
        current.rainfall_mm,
        value_or_na(current.wind_kph),
        value_or_na(current.humidity_pct),
    );

    html.push_str(r#"<div class="forecast-weather"><h5>24-Hour Forecast</h5>"#);
    let days = snapshot.forecast_shown();
    if days.is_empty() {
        let _ = write!(html, r#"<p class="no-forecast">{}</p>"#, NO_FORECAST);
    } else {
        html.push_str(r#"<div class="forecast-grid">"#);
        for day in days {
            let _ = write!(
                html,
                r#"<div class="forecast-day">
                <div class="forecast-date">{}</div>
                <div class="forecast-data">
                    <div>Rainfall: {} mm</div>
                    <div>Wind: {} km/h</div>
                    <div>Temp: {}°C</div>
                </div>
            </div>"#,
                escape_html(&format_date(day.date.as_deref())),
                day.total_rainfall_mm,
                day.max_wind_kph,
                day.avg_temp_c,
            );
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

fn timeframe_label(horizon: &HorizonForecast) -> String {
    match horizon.hours {
        Some(1) => "1 Hour".to_string(),
        Some(hours) => format!("{} Hours", hours),
        None => horizon.horizon.clone(),
    }
}

fn predictions_section(predictions: &Reported<PredictionSet>) -> String {
    let set = match predictions {
        Reported::Data(set) => set,
        Reported::Error(message) => return error_line(message),
    };
    if set.horizons.is_empty() {
        return error_line("No predictions available");
    }

    let mut buttons = String::new();
    let mut cards = String::new();
    for (index, horizon) in set.horizons.iter().enumerate() {
        let key = escape_html(&horizon.horizon);
        let first = index == 0;
        // The key only ever reaches script through the dataset.
        let _ = write!(
            buttons,
            r#"<button class="timeframe-btn{active}" data-timeframe="{key}" onclick="showTimeframe(this.dataset.timeframe)">{label}</button>"#,
            active = if first { " active" } else { "" },
            label = escape_html(&timeframe_label(horizon)),
        );

        let display = if first { "block" } else { "none" };
        match &horizon.outcome {
            Reported::Data(forecast) => {
                let risk = &forecast.risk_level;
                let _ = write!(
                    cards,
                    r#"<div class="prediction-card {class}" data-timeframe="{key}" style="display: {display}">
            <div class="prediction-header">
                <h5>{key} Prediction</h5>
                <span class="confidence">{confidence}% confidence</span>
            </div>
            <div class="prediction-body">
                <div class="prediction-value" style="color: {color}">{value} kg/m³</div>
                <div class="risk-level {class}">{label}</div>
            </div>
        </div>"#,
                    class = escape_html(risk.css_class()),
                    confidence = forecast.confidence_percent(),
                    color = risk.color(),
                    value = forecast.value,
                    label = escape_html(&risk.label()),
                );
            }
            Reported::Error(message) => {
                let _ = write!(
                    cards,
                    r#"<div class="prediction-card failed" data-timeframe="{key}" style="display: {display}">{error}</div>"#,
                    error = error_line(message),
                );
            }
        }
    }

    format!(
        r#"<div class="prediction-timeframes">
        <div class="timeframe-selector">{buttons}</div>
    </div>
    {cards}"#,
    )
}

fn warning_banner(warning: &EarlyWarning) -> String {
    let level = &warning.warning_level;
    let score = warning
        .warning_score
        .map(|score| format!(r#" <span class="warning-score">(score {})</span>"#, score))
        .unwrap_or_default();
    format!(
        r#"<div class="early-warning {class}" style="border-color: {color}; color: {color}">
    <strong>⚠️ {label}</strong>{score}
    <p>{message}</p>
</div>
"#,
        class = escape_html(level.css_class()),
        color = level.color(),
        label = escape_html(&level.label()),
        message = escape_html(&warning.message),
    )
}
