//! Step definitions for marker placement

use cucumber::{then, when};

use crate::world::DebrisenseWorld;

#[when("the page loads the markers")]
async fn page_loads_markers(world: &mut DebrisenseWorld) {
    world.request("GET", "/api/markers", None).await;
    assert_eq!(world.last_status.map(|s| s.as_u16()), Some(200));
    let markers = world.last_json();
    world.markers = markers.as_array().cloned().unwrap_or_default();
}

#[when("another page loads the markers")]
async fn another_page_loads_markers(world: &mut DebrisenseWorld) {
    world.earlier_markers = std::mem::take(&mut world.markers);
    page_loads_markers(world).await;
}

#[then("both pages should see the same marker ids")]
fn same_ids(world: &mut DebrisenseWorld) {
    let ids = |markers: &[serde_json::Value]| -> Vec<u64> {
        markers.iter().filter_map(|m| m["id"].as_u64()).collect()
    };
    assert!(!world.earlier_markers.is_empty());
    assert_eq!(ids(&world.earlier_markers), ids(&world.markers));
}

#[then(expr = "every marker on the earlier page should open from page {string}")]
async fn earlier_markers_open(world: &mut DebrisenseWorld, session: String) {
    let earlier = world.earlier_markers.clone();
    assert!(!earlier.is_empty());
    for marker in earlier {
        let id = marker["id"].as_u64().unwrap();
        world
            .request("GET", &format!("/panel/{}/loading", id), None)
            .await;
        assert_eq!(world.last_status.map(|s| s.as_u16()), Some(200), "{}", marker);
        world
            .request("GET", &format!("/panel/{}?session={}", id, session), None)
            .await;
        assert_eq!(world.last_status.map(|s| s.as_u16()), Some(200), "{}", marker);
    }
}

#[then(expr = "{int} markers should be placed")]
async fn markers_placed(world: &mut DebrisenseWorld, count: usize) {
    assert_eq!(world.markers.len(), count);
    let state = world.state();
    assert_eq!(state.read().await.markers.len(), count);
}

#[then(expr = "every marker should open the {string} view")]
fn every_marker_mode(world: &mut DebrisenseWorld, mode: String) {
    assert!(!world.markers.is_empty());
    for marker in &world.markers {
        assert_eq!(marker["mode"], mode.as_str(), "marker {}", marker);
    }
}

#[then(expr = "a marker should be placed for {string}")]
fn marker_for(world: &mut DebrisenseWorld, name: String) {
    world.marker_id(&name);
}

#[then("every marker should use the donut icon")]
fn donut_icons(world: &mut DebrisenseWorld) {
    for marker in &world.markers {
        assert_eq!(marker["icon"]["class_name"], "custom-donut-marker");
        assert_eq!(marker["icon"]["size"], serde_json::json!([20, 20]));
        assert_eq!(marker["icon"]["anchor"], serde_json::json!([10, 10]));
    }
}

#[then("marker ids should be unique")]
fn unique_ids(world: &mut DebrisenseWorld) {
    let mut ids: Vec<u64> = world
        .markers
        .iter()
        .filter_map(|m| m["id"].as_u64())
        .collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
