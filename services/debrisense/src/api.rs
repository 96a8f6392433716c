//! Client for the debris prediction backend

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;
use crate::io::{HttpClient, HttpResponse};
use crate::models::{
    DebrisPrediction, EarlyWarning, Location, LocationList, PredictionInputs, Reported,
    SensorPayload, SensorReading, UpdateSchedule, WarningInputs,
};
use crate::prediction::{PredictionSet, PredictionsPayload};
use crate::weather::WeatherSnapshot;
use crate::DebrisenseError;

/// Typed access to the backend's HTTP endpoints.
///
/// Per-location section fetches return [`Reported`] so an error-flagged body
/// reaches the renderer; only transport failures and unparsable bodies are
/// `Err`.
pub struct BackendClient {
    base_url: Url,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl BackendClient {
    pub fn new(config: &BackendConfig, http: Arc<dyn HttpClient>) -> crate::Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            DebrisenseError::Config(format!("Invalid backend URL {:?}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DebrisenseError::Config(format!(
                "Backend URL {:?} cannot be used as a base",
                config.base_url
            )));
        }

        tracing::debug!("Created BackendClient at {}", base_url);
        Ok(Self { base_url, http })
    }

    pub async fn get_all_locations(&self) -> crate::Result<Vec<Location>> {
        let body: LocationList = self.get_json(&["get_all_locations"]).await?;
        if let Some(error) = body.error {
            return Err(DebrisenseError::Backend(error));
        }
        body.locations.ok_or_else(|| {
            DebrisenseError::Backend("Location list response has no locations".to_string())
        })
    }

    pub async fn get_update_schedule(&self) -> crate::Result<UpdateSchedule> {
        self.get_json(&["get_update_schedule"]).await
    }

    pub async fn get_sensor_data(&self, name: &str) -> crate::Result<Reported<SensorReading>> {
        let payload: SensorPayload = self.get_json(&["get_sensor_data", name]).await?;
        Ok(SensorReading::from_payload(payload))
    }

    pub async fn get_weather_data(&self, name: &str) -> crate::Result<Reported<WeatherSnapshot>> {
        let payload: serde_json::Value = self.get_json(&["get_weather_data", name]).await?;
        Ok(WeatherSnapshot::from_payload(&payload))
    }

    pub async fn get_enhanced_predictions(
        &self,
        name: &str,
    ) -> crate::Result<Reported<PredictionSet>> {
        let payload: PredictionsPayload =
            self.get_json(&["get_enhanced_predictions", name]).await?;
        Ok(PredictionSet::from_payload(payload))
    }

    pub async fn predict_debris(&self, inputs: &PredictionInputs) -> crate::Result<DebrisPrediction> {
        self.post_json(&["predict_debris"], &serde_json::to_value(inputs)?)
            .await
    }

    pub async fn early_warning(&self, inputs: &WarningInputs) -> crate::Result<EarlyWarning> {
        self.post_json(&["early_warning"], &serde_json::to_value(inputs)?)
            .await
    }

    /// Absolute URL for a backend path; segments are percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> crate::Result<String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DebrisenseError::Config(format!("Backend URL {} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> crate::Result<T> {
        let url = self.endpoint(segments)?;
        let response = self.http.get(&url).await?;
        parse_body(&url, response)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &serde_json::Value,
    ) -> crate::Result<T> {
        let url = self.endpoint(segments)?;
        let response = self.http.post_json(&url, body).await?;
        if !response.is_success() {
            return Err(DebrisenseError::Backend(backend_error_message(&response)));
        }
        parse_body(&url, response)
    }
}

// The backend answers section endpoints with a JSON error body and a 4xx/5xx
// status; that body is still meaningful, so the status alone is not fatal.
fn parse_body<T: DeserializeOwned>(url: &str, response: HttpResponse) -> crate::Result<T> {
    if !response.is_success() {
        tracing::debug!("Non-2xx response from {}: status={}", url, response.status);
    }
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::debug!("Failed to parse response from {}: {}", url, e);
        DebrisenseError::Json(e)
    })
}

fn backend_error_message(response: &HttpResponse) -> String {
    serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("Backend returned status {}", response.status))
}
