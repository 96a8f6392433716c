//! Light/dark theme selection and persistence

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chart::ChartRegistry;
use crate::map::MapViewport;
use crate::DebrisenseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class set on `<body>`; dark is the unstyled default
    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "light-mode",
            Theme::Dark => "",
        }
    }

    /// Toggle button caption, naming the theme a click switches to
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }

    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage for the persisted theme choice
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    /// The saved theme, or `None` if nothing was saved yet
    fn load_theme(&self) -> crate::Result<Option<Theme>>;

    fn save_theme(&self, theme: Theme) -> crate::Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Option<Theme>,
}

/// Preferences kept in a small JSON file
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load_theme(&self) -> crate::Result<Option<Theme>> {
        if !self.path.exists() {
            tracing::debug!("No preferences file at {:?}", self.path);
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DebrisenseError::Preferences(format!(
                "Failed to read preferences {:?}: {}",
                self.path, e
            ))
        })?;
        let preferences: Preferences = serde_json::from_str(&content).map_err(|e| {
            DebrisenseError::Preferences(format!(
                "Failed to parse preferences {:?}: {}",
                self.path, e
            ))
        })?;
        Ok(preferences.theme)
    }

    fn save_theme(&self, theme: Theme) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(&Preferences { theme: Some(theme) })?;
        std::fs::write(&self.path, content).map_err(|e| {
            DebrisenseError::Preferences(format!(
                "Failed to write preferences {:?}: {}",
                self.path, e
            ))
        })?;
        tracing::debug!("Saved theme '{}' to {:?}", theme, self.path);
        Ok(())
    }
}

/// Owns the active theme and applies changes to the map and charts
pub struct ThemeController {
    theme: Theme,
    store: Arc<dyn PreferenceStore>,
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("theme", &self.theme)
            .finish()
    }
}

impl ThemeController {
    /// Start from the persisted choice, or dark when none can be read
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let theme = match store.load_theme() {
            Ok(Some(theme)) => theme,
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("Could not load theme preference, using dark: {}", e);
                Theme::default()
            }
        };
        tracing::debug!("Initial theme: {}", theme);
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme: swap tiles and restyle every live chart.
    ///
    /// Persisting is left to the returned [`PendingSave`] so callers can
    /// release their locks before touching the disk.
    pub fn set_theme<'a>(
        &mut self,
        theme: Theme,
        viewport: &mut MapViewport,
        charts: impl IntoIterator<Item = &'a mut ChartRegistry>,
    ) -> PendingSave {
        self.theme = theme;
        viewport.apply_theme(theme);
        for registry in charts {
            registry.restyle_all(theme);
        }
        tracing::info!("Theme set to {}", theme);
        PendingSave {
            store: Arc::clone(&self.store),
            theme,
        }
    }

    pub fn toggle<'a>(
        &mut self,
        viewport: &mut MapViewport,
        charts: impl IntoIterator<Item = &'a mut ChartRegistry>,
    ) -> PendingSave {
        let next = self.theme.toggled();
        self.set_theme(next, viewport, charts)
    }
}

/// A theme choice that still has to reach the preference store.
///
/// A failed save is logged; the new theme stays active for this session.
#[must_use = "the theme is only persisted once saved"]
pub struct PendingSave {
    store: Arc<dyn PreferenceStore>,
    theme: Theme,
}

impl fmt::Debug for PendingSave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSave")
            .field("theme", &self.theme)
            .finish()
    }
}

impl PendingSave {
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn save(self) {
        if let Err(e) = self.store.save_theme(self.theme) {
            tracing::warn!("Could not persist theme '{}': {}", self.theme, e);
        }
    }

    /// Save on the blocking pool
    pub async fn persist(self) {
        let theme = self.theme;
        if let Err(e) = tokio::task::spawn_blocking(move || self.save()).await {
            tracing::warn!("Theme '{}' save task failed: {}", theme, e);
        }
    }
}
