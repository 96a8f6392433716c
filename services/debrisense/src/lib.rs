//! Debrisense - River debris monitoring dashboard
//!
//! Shows monitored river locations on a map and renders live sensor, weather
//! and debris prediction data from the prediction backend in a sidebar.

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod io;
pub mod map;
pub mod markers;
pub mod models;
pub mod page;
pub mod panel;
pub mod prediction;
pub mod state;
pub mod theme;
pub mod timefmt;
pub mod weather;

pub use config::{load_config, Config};
pub use error::{DebrisenseError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::BackendClient;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::theme::{FilePreferenceStore, PreferenceStore, ThemeController};

/// Builder for the dashboard server.
///
/// The HTTP client and preference store default to reqwest and the
/// configured preferences file; tests swap them out.
pub struct DashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    preferences: Option<Arc<dyn PreferenceStore>>,
}

impl DashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            preferences: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_preference_store(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Bind the listener and assemble state; nothing is fetched yet
    pub async fn build(self) -> Result<BoundDashboard> {
        let http = match self.http {
            Some(http) => http,
            None => match self.config.backend.request_timeout() {
                Some(timeout) => Arc::new(ReqwestHttpClient::with_timeout(timeout)?),
                None => Arc::new(ReqwestHttpClient::default()),
            },
        };
        let preferences = self.preferences.unwrap_or_else(|| {
            Arc::new(FilePreferenceStore::new(
                self.config.dashboard.preferences_path.clone(),
            ))
        });

        let api = Arc::new(BackendClient::new(&self.config.backend, http)?);
        let theme = ThemeController::load(preferences);
        let state = state::new_state_handle(&self.config, theme);
        let router = dashboard::build_router(state, api, &self.config.dashboard.image_dir);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.dashboard.port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            DebrisenseError::Config(format!(
                "Failed to bind dashboard to port {}: {}",
                self.config.dashboard.port, e
            ))
        })?;
        let local_addr = listener.local_addr()?;

        println!("Bound debrisense server bound_addr={}", local_addr);
        tracing::info!("Bound debrisense server bound_addr={}", local_addr);
        tracing::info!("Backend at {}", self.config.backend.base_url);

        Ok(BoundDashboard {
            listener,
            router,
            local_addr,
        })
    }
}

/// A dashboard whose listener is bound but not yet serving
pub struct BoundDashboard {
    listener: tokio::net::TcpListener,
    router: axum::Router,
    local_addr: SocketAddr,
}

impl BoundDashboard {
    pub fn listen_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let cancel = CancellationToken::new();

        let cancel_for_signal = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            }
            cancel_for_signal.cancel();
        });

        self.serve(cancel).await
    }

    /// Serve until `cancel` fires
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        tracing::info!("Dashboard listening on http://{}", self.local_addr);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
            })
            .await?;
        tracing::info!("Dashboard stopped");
        Ok(())
    }
}
