//! Application state shared by the HTTP handlers

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::chart::{ChartRegistry, ChartSpec, PREDICTION_CANVAS};
use crate::config::Config;
use crate::map::MapViewport;
use crate::markers::{DetailMode, LocationLoad, Marker, MarkerId, MarkerRegistry};
use crate::models::{Location, UpdateSchedule};
use crate::prediction::PredictionSet;
use crate::theme::{PendingSave, Theme, ThemeController};

/// Proof that a panel request started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTicket {
    pub generation: u64,
    pub marker: MarkerId,
}

/// What the sidebar currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedPanel {
    pub generation: u64,
    pub marker: MarkerId,
    pub mode: DetailMode,
}

/// Generation counter guarding the sidebar against out-of-order responses
#[derive(Debug, Default)]
pub struct PanelSlot {
    generation: u64,
    displayed: Option<DisplayedPanel>,
}

impl PanelSlot {
    /// A slot whose first ticket comes after `generation`
    fn after(generation: u64) -> Self {
        Self {
            generation,
            displayed: None,
        }
    }

    /// Open a panel request; every earlier ticket becomes stale
    pub fn begin(&mut self, marker: MarkerId) -> PanelTicket {
        self.generation += 1;
        PanelTicket {
            generation: self.generation,
            marker,
        }
    }

    pub fn is_current(&self, ticket: PanelTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Record the panel as displayed if its ticket is still current
    pub fn commit(&mut self, ticket: PanelTicket, mode: DetailMode) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding panel for marker {} (generation {}, current {})",
                ticket.marker,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.displayed = Some(DisplayedPanel {
            generation: ticket.generation,
            marker: ticket.marker,
            mode,
        });
        true
    }

    pub fn displayed(&self) -> Option<&DisplayedPanel> {
        self.displayed.as_ref()
    }
}

/// Rendered panel waiting to be committed
#[derive(Debug, Clone, PartialEq)]
pub struct PanelContent {
    pub mode: DetailMode,
    pub html: String,
    /// Present when the panel has a prediction trend to draw
    pub predictions: Option<PredictionSet>,
}

/// Panel handed to the page script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommittedPanel {
    pub generation: u64,
    pub mode: DetailMode,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
}

/// Most page sessions kept at once; the least recently used one is dropped
/// when another page shows up
pub const MAX_PAGE_SESSIONS: usize = 64;

/// Panel and chart state of one open page
#[derive(Debug, Default)]
pub struct PageSession {
    pub panel: PanelSlot,
    pub charts: ChartRegistry,
    last_used: u64,
}

/// Server-side state. Markers, schedule and theme are shared by every page;
/// the displayed panel and its chart belong to the page session that opened it.
#[derive(Debug)]
pub struct AppState {
    pub viewport: MapViewport,
    pub markers: MarkerRegistry,
    pub schedule: Option<UpdateSchedule>,
    pub theme: ThemeController,
    pub fallback_locations: Vec<Location>,
    sessions: HashMap<String, PageSession>,
    clock: u64,
}

impl AppState {
    pub fn new(config: &Config, theme: ThemeController) -> Self {
        Self {
            viewport: MapViewport::new(&config.map, theme.theme()),
            markers: MarkerRegistry::new(),
            schedule: None,
            theme,
            fallback_locations: config.fallback_locations.clone(),
            sessions: HashMap::new(),
            clock: 0,
        }
    }

    /// Place markers for a fresh location load.
    ///
    /// Locations already on the map keep their marker ids, so markers drawn
    /// by pages loaded earlier stay valid.
    pub fn place_markers(&mut self, load: &LocationLoad) -> Vec<Marker> {
        self.schedule = load.schedule.clone();
        self.markers.place(load)
    }

    pub fn session(&self, id: &str) -> Option<&PageSession> {
        self.sessions.get(id)
    }

    /// The page session `id`, created on first use
    pub fn session_mut(&mut self, id: &str) -> &mut PageSession {
        self.clock += 1;
        if !self.sessions.contains_key(id) && self.sessions.len() >= MAX_PAGE_SESSIONS {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, session)| session.last_used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!("Dropping idle page session {:?}", oldest);
                self.sessions.remove(&oldest);
            }
        }
        let clock = self.clock;
        // a recreated page never hands out a generation an evicted one used
        let session = self
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| PageSession {
                panel: PanelSlot::after(clock),
                ..PageSession::default()
            });
        session.last_used = clock;
        session
    }

    /// Open a panel request for one page; that page's earlier tickets go stale
    pub fn begin_panel(&mut self, session: &str, marker: MarkerId) -> PanelTicket {
        self.session_mut(session).panel.begin(marker)
    }

    pub fn is_panel_current(&self, session: &str, ticket: PanelTicket) -> bool {
        self.session(session)
            .is_some_and(|page| page.panel.is_current(ticket))
    }

    /// Display rendered content on a page if `ticket` is still current there.
    ///
    /// The prediction chart is drawn with the theme active now; a panel
    /// without predictions clears the page's chart canvas.
    pub fn commit_panel(
        &mut self,
        session: &str,
        ticket: PanelTicket,
        content: PanelContent,
    ) -> Option<CommittedPanel> {
        let theme = self.theme.theme();
        let page = self.sessions.get_mut(session)?;
        if !page.panel.commit(ticket, content.mode) {
            return None;
        }

        let chart = match &content.predictions {
            Some(predictions) => {
                let spec = ChartSpec::prediction_trend(predictions, theme);
                page.charts.draw(PREDICTION_CANVAS, spec.clone());
                Some(spec)
            }
            None => {
                page.charts.remove(PREDICTION_CANVAS);
                None
            }
        };

        Some(CommittedPanel {
            generation: ticket.generation,
            mode: content.mode,
            html: content.html,
            chart,
        })
    }

    /// Switch theme for every page: tiles plus all live charts. The returned
    /// save should run once the state lock is released.
    pub fn set_theme(&mut self, theme: Theme) -> PendingSave {
        let Self {
            theme: controller,
            viewport,
            sessions,
            ..
        } = self;
        controller.set_theme(
            theme,
            viewport,
            sessions.values_mut().map(|page| &mut page.charts),
        )
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<AppState>>;

pub fn new_state_handle(config: &Config, theme: ThemeController) -> StateHandle {
    Arc::new(RwLock::new(AppState::new(config, theme)))
}
