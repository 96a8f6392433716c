//! Step definitions that script the prediction backend

use cucumber::given;
use serde_json::json;

use crate::world::{location_path, DebrisenseWorld};

fn list_location(world: &mut DebrisenseWorld, name: &str, lat: f64, lng: f64) {
    world
        .listed_locations
        .push(json!({ "id": world.listed_locations.len() + 1, "name": name, "lat": lat, "lng": lng }));
    world.backend.respond(
        "/get_all_locations",
        200,
        json!({ "locations": world.listed_locations }).to_string(),
    );
    world.backend.respond(
        "/get_update_schedule",
        200,
        r#"{"next_update": "2025-08-26T13:00:00"}"#,
    );
}

#[given(expr = "the backend lists {int} locations")]
fn backend_lists_locations(world: &mut DebrisenseWorld, count: usize) {
    for i in 0..count {
        let name = format!("Sungai Station {}", i + 1);
        list_location(world, &name, 3.0 + i as f64 * 0.1, 101.3 + i as f64 * 0.1);
    }
}

#[given(expr = "the backend lists the location {string}")]
fn backend_lists_location(world: &mut DebrisenseWorld, name: String) {
    let offset = world.listed_locations.len() as f64 * 0.5;
    list_location(world, &name, 3.0 + offset, 101.3 + offset);
}

#[given("the backend is unreachable")]
fn backend_unreachable(world: &mut DebrisenseWorld) {
    world.backend.fail("/", "connection refused");
}

#[given(expr = "the backend answers the location list with the error {string}")]
fn location_list_error(world: &mut DebrisenseWorld, message: String) {
    world.backend.respond(
        "/get_all_locations",
        500,
        json!({ "error": message }).to_string(),
    );
}

#[given(expr = "the backend has live data for {string}")]
fn live_data(world: &mut DebrisenseWorld, name: String) {
    world.backend.respond(
        &location_path("get_sensor_data", &name),
        200,
        r#"{"water_level": 1.8, "flow_rate": 120.0, "tide_level": 0.9,
            "sensor_status": {"water_level": "online", "flow_rate": "online", "tide_level": "offline"},
            "timestamp": "2025-08-26T10:00:00"}"#,
    );
    world.backend.respond(
        &location_path("get_weather_data", &name),
        200,
        r#"{"current": {"temp_c": 30.5, "precip_mm": 14.0, "wind_kph": 21.0, "humidity": 80},
            "forecast": [
                {"date": "2025-08-27", "day": {"totalprecip_mm": 12.0, "maxwind_kph": 25.0, "avgtemp_c": 28.0}},
                {"date": "2025-08-28", "day": {"totalprecip_mm": 3.0, "maxwind_kph": 15.0, "avgtemp_c": 29.0}}
            ],
            "timestamp": "2025-08-26T10:00:00"}"#,
    );
    world.backend.respond(
        &location_path("get_enhanced_predictions", &name),
        200,
        r#"{"predictions": {
                "6h": {"prediction": 120.5, "risk_level": "low", "confidence": 0.9},
                "12h": {"prediction": 150.0, "risk_level": "medium", "confidence": 0.8},
                "24h": {"prediction": 210.0, "risk_level": "high", "confidence": 0.7}
            }, "timestamp": "2025-08-26T10:00:00"}"#,
    );
    world.backend.respond(
        "/early_warning",
        200,
        r#"{"warning_level": "medium", "warning_score": 2, "message": "Debris risk level: medium"}"#,
    );
}

#[given(expr = "the backend predicts {float} with risk {string} and confidence {float} at {string} for {string}")]
fn single_prediction(
    world: &mut DebrisenseWorld,
    value: f64,
    risk: String,
    confidence: f64,
    horizon: String,
    name: String,
) {
    let mut predictions = serde_json::Map::new();
    predictions.insert(
        horizon,
        json!({ "prediction": value, "risk_level": risk, "confidence": confidence }),
    );
    world.backend.respond(
        &location_path("get_enhanced_predictions", &name),
        200,
        json!({ "predictions": predictions, "timestamp": "2025-08-26T10:00:00" }).to_string(),
    );
}

#[given(expr = "the backend has no weather forecast for {string}")]
fn no_forecast(world: &mut DebrisenseWorld, name: String) {
    world.backend.respond(
        &location_path("get_weather_data", &name),
        200,
        r#"{"current": {"temp_c": 30.5, "precip_mm": 0.0, "wind_kph": 5.0, "humidity": 70}}"#,
    );
}

#[given(expr = "the weather request for {string} fails")]
fn weather_fails(world: &mut DebrisenseWorld, name: String) {
    world
        .backend
        .fail(&location_path("get_weather_data", &name), "timed out");
}

#[given(expr = "the backend reports the sensor error {string} for {string}")]
fn sensor_error(world: &mut DebrisenseWorld, message: String, name: String) {
    world.backend.respond(
        &location_path("get_sensor_data", &name),
        404,
        json!({ "error": message }).to_string(),
    );
}
