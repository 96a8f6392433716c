//! Step definitions for the location detail panel

use cucumber::{given, then, when};

use debrisense::markers::{DetailMode, MarkerId};
use debrisense::state::PanelContent;

use crate::world::DebrisenseWorld;

#[when(expr = "the user opens the panel for {string}")]
async fn open_panel(world: &mut DebrisenseWorld, name: String) {
    let id = world.marker_id(&name);
    world.request("GET", &format!("/panel/{}", id), None).await;
    assert_eq!(world.last_status.map(|s| s.as_u16()), Some(200));
    world.panel = Some(world.last_json());
}

#[when(expr = "the page requests the loading view for {string}")]
async fn loading_view(world: &mut DebrisenseWorld, name: String) {
    let id = world.marker_id(&name);
    world
        .request("GET", &format!("/panel/{}/loading", id), None)
        .await;
}

#[when(expr = "page {string} opens the panel for {string}")]
async fn page_opens_panel(world: &mut DebrisenseWorld, session: String, name: String) {
    let id = world.marker_id(&name);
    world
        .request("GET", &format!("/panel/{}?session={}", id, session), None)
        .await;
    world.panel = Some(world.last_json());
}

#[when(expr = "the page requests the panel for marker {int}")]
async fn panel_for_marker(world: &mut DebrisenseWorld, id: u64) {
    world.request("GET", &format!("/panel/{}", id), None).await;
}

async fn start_loading(world: &mut DebrisenseWorld, session: &str, name: &str) {
    let id = world.marker_id(name);
    let state = world.state();
    let ticket = state.write().await.begin_panel(session, MarkerId(id));
    world.pending_ticket = Some((session.to_string(), ticket));
}

#[given(expr = "a panel request for {string} is still loading")]
async fn panel_still_loading(world: &mut DebrisenseWorld, name: String) {
    start_loading(world, "", &name).await;
}

#[given(expr = "page {string} is still loading the panel for {string}")]
async fn page_still_loading(world: &mut DebrisenseWorld, session: String, name: String) {
    start_loading(world, &session, &name).await;
}

#[when("the earlier panel request finishes")]
async fn earlier_request_finishes(world: &mut DebrisenseWorld) {
    let (session, ticket) = world.pending_ticket.take().expect("no pending panel request");
    let state = world.state();
    let committed = state.write().await.commit_panel(
        &session,
        ticket,
        PanelContent {
            mode: DetailMode::Basic,
            html: "<p>stale</p>".to_string(),
            predictions: None,
        },
    );
    world.stale_commit_displayed = Some(committed.is_some());
}

#[then("the panel should be displayed")]
fn panel_displayed(world: &mut DebrisenseWorld) {
    assert!(world.panel.is_some());
}

#[then(expr = "the panel should show {string}")]
fn panel_shows(world: &mut DebrisenseWorld, text: String) {
    let panel = world.panel.as_ref().expect("no panel displayed");
    let html = panel["html"].as_str().unwrap_or_default();
    assert!(html.contains(&text), "{:?} not in panel:\n{}", text, html);
}

#[then(expr = "the panel should not show {string}")]
fn panel_does_not_show(world: &mut DebrisenseWorld, text: String) {
    let panel = world.panel.as_ref().expect("no panel displayed");
    let html = panel["html"].as_str().unwrap_or_default();
    assert!(!html.contains(&text), "{:?} unexpectedly in panel", text);
}

#[then(expr = "the panel mode should be {string}")]
fn panel_mode(world: &mut DebrisenseWorld, mode: String) {
    let panel = world.panel.as_ref().expect("no panel displayed");
    assert_eq!(panel["mode"], mode.as_str());
}

#[then(expr = "the prediction chart should plot {int} horizons")]
fn chart_horizons(world: &mut DebrisenseWorld, count: usize) {
    let panel = world.panel.as_ref().expect("no panel displayed");
    let labels = panel["chart"]["data"]["labels"]
        .as_array()
        .expect("panel has no chart");
    assert_eq!(labels.len(), count);
}

#[then("the panel should have no prediction chart")]
fn no_chart(world: &mut DebrisenseWorld) {
    let panel = world.panel.as_ref().expect("no panel displayed");
    assert!(panel.get("chart").is_none());
}

#[then("the earlier response should be discarded")]
fn earlier_discarded(world: &mut DebrisenseWorld) {
    assert_eq!(world.stale_commit_displayed, Some(false));
}

#[then("the earlier response should be displayed")]
fn earlier_displayed(world: &mut DebrisenseWorld) {
    assert_eq!(world.stale_commit_displayed, Some(true));
}

async fn assert_page_shows(world: &mut DebrisenseWorld, session: &str, name: &str) {
    let id = world.marker_id(name);
    let state = world.state();
    let app = state.read().await;
    let displayed = app
        .session(session)
        .and_then(|page| page.panel.displayed())
        .expect("nothing displayed");
    assert_eq!(displayed.marker, MarkerId(id));
}

#[then(expr = "the sidebar should still show {string}")]
async fn sidebar_still_shows(world: &mut DebrisenseWorld, name: String) {
    assert_page_shows(world, "", &name).await;
}

#[then(expr = "page {string} should show {string}")]
async fn page_shows(world: &mut DebrisenseWorld, session: String, name: String) {
    assert_page_shows(world, &session, &name).await;
}

#[then(expr = "the response status should be {int}")]
fn response_status(world: &mut DebrisenseWorld, status: u16) {
    assert_eq!(world.last_status.map(|s| s.as_u16()), Some(status));
}

#[then(expr = "the response should contain {string}")]
fn response_contains(world: &mut DebrisenseWorld, text: String) {
    let body = world.last_body.as_deref().unwrap_or_default();
    assert!(body.contains(&text), "{:?} not in response:\n{}", text, body);
}
