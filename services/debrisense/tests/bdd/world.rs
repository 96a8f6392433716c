//! BDD world for debrisense tests

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cucumber::World;
use tower::ServiceExt;

use debrisense::api::BackendClient;
use debrisense::config::Config;
use debrisense::dashboard::build_router;
use debrisense::io::{HttpClient, HttpResponse};
use debrisense::state::{new_state_handle, PanelTicket, StateHandle};
use debrisense::theme::{FilePreferenceStore, ThemeController};
use debrisense::DebrisenseError;

/// Canned backend reply for URLs containing a given path
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Fail(String),
}

/// A backend stand-in answering from a list of path routes.
///
/// The most recently registered matching route wins; unmatched URLs fail
/// like an unreachable host.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    routes: Arc<Mutex<Vec<(String, Reply)>>>,
}

impl ScriptedBackend {
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.routes.lock().unwrap().push((
            path.to_string(),
            Reply::Respond(HttpResponse {
                status,
                body: body.into(),
            }),
        ));
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.routes
            .lock()
            .unwrap()
            .push((path.to_string(), Reply::Fail(message.to_string())));
    }

    fn reply(&self, url: &str) -> debrisense::Result<HttpResponse> {
        let routes = self.routes.lock().unwrap();
        match routes.iter().rev().find(|(path, _)| url.contains(path.as_str())) {
            Some((_, Reply::Respond(response))) => Ok(response.clone()),
            Some((_, Reply::Fail(message))) => Err(DebrisenseError::Http(message.clone())),
            None => Err(DebrisenseError::Http(format!("connection refused: {}", url))),
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedBackend {
    async fn get(&self, url: &str) -> debrisense::Result<HttpResponse> {
        self.reply(url)
    }

    async fn post_json(
        &self,
        url: &str,
        _body: &serde_json::Value,
    ) -> debrisense::Result<HttpResponse> {
        self.reply(url)
    }
}

/// Backend path for a per-location endpoint, encoded the way the client sends it
pub fn location_path(endpoint: &str, name: &str) -> String {
    format!("/{}/{}", endpoint, name.replace(' ', "%20"))
}

#[derive(Debug, Default, World)]
pub struct DebrisenseWorld {
    pub backend: ScriptedBackend,
    pub listed_locations: Vec<serde_json::Value>,
    pub preferences_dir: Option<tempfile::TempDir>,
    pub state: Option<StateHandle>,
    pub api: Option<Arc<BackendClient>>,
    pub markers: Vec<serde_json::Value>,
    /// Markers as drawn by a page opened before the latest load
    pub earlier_markers: Vec<serde_json::Value>,
    pub last_status: Option<StatusCode>,
    pub last_body: Option<String>,
    pub panel: Option<serde_json::Value>,
    pub theme_state: Option<serde_json::Value>,
    /// Page session and ticket of a panel request still in flight
    pub pending_ticket: Option<(String, PanelTicket)>,
    pub stale_commit_displayed: Option<bool>,
}

impl DebrisenseWorld {
    pub fn preferences_path(&mut self) -> PathBuf {
        let dir = self
            .preferences_dir
            .get_or_insert_with(|| tempfile::tempdir().unwrap());
        dir.path().join("preferences.json")
    }

    /// Shared state and backend client, assembled on first use
    pub fn dashboard(&mut self) -> (StateHandle, Arc<BackendClient>) {
        if self.state.is_none() {
            let config = Config::default();
            let store = FilePreferenceStore::new(self.preferences_path());
            let theme = ThemeController::load(Arc::new(store));
            self.state = Some(new_state_handle(&config, theme));
            self.api = Some(Arc::new(
                BackendClient::new(&config.backend, Arc::new(self.backend.clone())).unwrap(),
            ));
        }
        (self.state.clone().unwrap(), self.api.clone().unwrap())
    }

    /// Drop all in-memory state, keeping the preferences file
    pub fn restart(&mut self) {
        self.state = None;
        self.api = None;
        self.markers.clear();
        self.earlier_markers.clear();
        self.panel = None;
        self.theme_state = None;
    }

    pub fn state(&mut self) -> StateHandle {
        self.dashboard().0
    }

    /// Send a request through the dashboard router and record the response
    pub async fn request(&mut self, method: &str, uri: &str, body: Option<serde_json::Value>) {
        let (state, api) = self.dashboard();
        let image_dir = self.preferences_path().with_file_name("images");
        let router = build_router(state, api, &image_dir);

        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        self.last_status = Some(response.status());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        self.last_body = Some(String::from_utf8(bytes.to_vec()).unwrap());
    }

    pub fn last_json(&self) -> serde_json::Value {
        serde_json::from_str(self.last_body.as_deref().unwrap_or("null")).unwrap()
    }

    /// Id of the placed marker for a location name
    pub fn marker_id(&self, name: &str) -> u64 {
        self.markers
            .iter()
            .find(|m| m["location"]["name"] == name)
            .and_then(|m| m["id"].as_u64())
            .unwrap_or_else(|| panic!("no marker placed for {:?}", name))
    }
}
