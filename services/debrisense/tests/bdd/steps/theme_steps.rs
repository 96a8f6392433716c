//! Step definitions for the theme toggle

use cucumber::{given, then, when};
use serde_json::json;

use crate::world::DebrisenseWorld;

#[given(expr = "the saved theme preference is {string}")]
fn saved_preference(world: &mut DebrisenseWorld, theme: String) {
    let path = world.preferences_path();
    std::fs::write(&path, json!({ "theme": theme }).to_string()).unwrap();
}

#[given("the saved preferences file is corrupt")]
fn corrupt_preferences(world: &mut DebrisenseWorld) {
    let path = world.preferences_path();
    std::fs::write(&path, "{ not json").unwrap();
}

async fn fetch_theme(world: &mut DebrisenseWorld) {
    world.request("GET", "/api/theme", None).await;
    world.theme_state = Some(world.last_json());
}

async fn post_theme(world: &mut DebrisenseWorld, theme: &str) {
    world
        .request("POST", "/api/theme", Some(json!({ "theme": theme })))
        .await;
    assert_eq!(world.last_status.map(|s| s.as_u16()), Some(200));
    world.theme_state = Some(world.last_json());
}

#[when("the dashboard starts")]
async fn dashboard_starts(world: &mut DebrisenseWorld) {
    fetch_theme(world).await;
}

#[when("the dashboard restarts")]
async fn dashboard_restarts(world: &mut DebrisenseWorld) {
    world.restart();
    fetch_theme(world).await;
}

#[when("the user toggles the theme")]
async fn toggle_theme(world: &mut DebrisenseWorld) {
    fetch_theme(world).await;
    let current = world.last_json()["theme"].as_str().unwrap_or_default().to_string();
    let next = if current == "light" { "dark" } else { "light" };
    post_theme(world, next).await;
}

#[when(expr = "the user selects the {string} theme")]
async fn select_theme(world: &mut DebrisenseWorld, theme: String) {
    post_theme(world, &theme).await;
}

#[when("the page is loaded")]
async fn page_loaded(world: &mut DebrisenseWorld) {
    world.request("GET", "/", None).await;
}

#[then(expr = "the theme should be {string}")]
fn theme_is(world: &mut DebrisenseWorld, theme: String) {
    let state = world.theme_state.as_ref().expect("theme not fetched");
    assert_eq!(state["theme"], theme.as_str());
}

#[then(expr = "the toggle should read {string}")]
fn toggle_reads(world: &mut DebrisenseWorld, label: String) {
    let state = world.theme_state.as_ref().expect("theme not fetched");
    assert_eq!(state["toggle_label"], label.as_str());
}

#[then(expr = "the map should use the {string} tiles")]
fn map_tiles(world: &mut DebrisenseWorld, theme: String) {
    let state = world.theme_state.as_ref().expect("theme not fetched");
    let url = state["tile_layer"]["url"].as_str().unwrap_or_default();
    match theme.as_str() {
        "dark" => assert!(url.contains("dark_all"), "{}", url),
        "light" => assert!(url.contains("tile.openstreetmap.org"), "{}", url),
        other => panic!("unknown theme {:?}", other),
    }
}

#[then(expr = "the chart text should be {string}")]
fn chart_text(world: &mut DebrisenseWorld, color: String) {
    let state = world.theme_state.as_ref().expect("theme not fetched");
    let chart = &state["charts"]["predictionChart"];
    assert_eq!(chart["options"]["scales"]["y"]["ticks"]["color"], color.as_str());
    assert_eq!(chart["options"]["scales"]["x"]["ticks"]["color"], color.as_str());
    assert_eq!(chart["options"]["plugins"]["legend"]["labels"]["color"], color.as_str());
}

#[then(expr = "the saved theme preference should be {string}")]
fn saved_preference_is(world: &mut DebrisenseWorld, theme: String) {
    let path = world.preferences_path();
    let content = std::fs::read_to_string(&path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(saved["theme"], theme.as_str());
}
