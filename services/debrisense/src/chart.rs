//! Prediction trend chart configuration and the live chart registry
//!
//! Charts are described as Chart.js configuration objects and drawn by the
//! page script. The registry holds the configuration currently drawn on each
//! canvas so a redraw replaces it and a theme change can restyle it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::prediction::PredictionSet;
use crate::theme::Theme;

/// Canvas the detail panel draws its prediction trend on
pub const PREDICTION_CANVAS: &str = "predictionChart";

const VALUE_COLOR: &str = "#4a9eff";
const VALUE_FILL: &str = "rgba(74, 158, 255, 0.1)";
const CONFIDENCE_COLOR: &str = "#ffd93d";
const CONFIDENCE_FILL: &str = "rgba(255, 217, 61, 0.1)";
const LINE_TENSION: f64 = 0.4;

/// Text and grid colors for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub text: &'static str,
    pub grid: &'static str,
}

impl ChartPalette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                text: "#333",
                grid: "rgba(0,0,0,0.1)",
            },
            Theme::Dark => Self {
                text: "#ffffff",
                grid: "rgba(255,255,255,0.1)",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub tension: f64,
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: Scale,
    pub y1: Scale,
    pub x: Scale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub grid: ColorStyle,
    pub ticks: ColorStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ScaleTitle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleTitle {
    pub display: bool,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub labels: ColorStyle,
}

impl Scale {
    fn styled(palette: ChartPalette) -> Self {
        Self {
            position: None,
            begin_at_zero: None,
            max: None,
            grid: color(palette.grid),
            ticks: color(palette.text),
            title: None,
        }
    }

    fn titled(mut self, text: &str, palette: ChartPalette) -> Self {
        self.title = Some(ScaleTitle {
            display: true,
            text: text.to_string(),
            color: palette.text.to_string(),
        });
        self
    }

    fn restyle(&mut self, palette: ChartPalette) {
        self.grid = color(palette.grid);
        self.ticks = color(palette.text);
        if let Some(title) = &mut self.title {
            title.color = palette.text.to_string();
        }
    }
}

fn color(value: &str) -> ColorStyle {
    ColorStyle {
        color: value.to_string(),
    }
}

impl ChartSpec {
    /// Dual-axis line chart of predicted debris level and confidence.
    ///
    /// Horizons whose prediction failed plot as zero.
    pub fn prediction_trend(predictions: &PredictionSet, theme: Theme) -> Self {
        let palette = ChartPalette::for_theme(theme);

        let labels = predictions
            .horizons
            .iter()
            .map(|h| h.horizon.clone())
            .collect();
        let values = predictions
            .horizons
            .iter()
            .map(|h| h.outcome.data().map_or(0.0, |f| f.value))
            .collect();
        let confidences = predictions
            .horizons
            .iter()
            .map(|h| h.outcome.data().map_or(0.0, |f| f.confidence * 100.0))
            .collect();

        let mut y = Scale::styled(palette).titled("Debris Level", palette);
        y.begin_at_zero = Some(true);

        let mut y1 = Scale::styled(palette).titled("Confidence (%)", palette);
        y1.position = Some("right".to_string());
        y1.begin_at_zero = Some(true);
        y1.max = Some(100.0);

        Self {
            kind: "line".to_string(),
            data: ChartData {
                labels,
                datasets: vec![
                    Dataset {
                        label: "Predicted Debris Level".to_string(),
                        data: values,
                        border_color: VALUE_COLOR.to_string(),
                        background_color: VALUE_FILL.to_string(),
                        tension: LINE_TENSION,
                        y_axis_id: None,
                    },
                    Dataset {
                        label: "Confidence (%)".to_string(),
                        data: confidences,
                        border_color: CONFIDENCE_COLOR.to_string(),
                        background_color: CONFIDENCE_FILL.to_string(),
                        tension: LINE_TENSION,
                        y_axis_id: Some("y1".to_string()),
                    },
                ],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                scales: Scales {
                    y,
                    y1,
                    x: Scale::styled(palette),
                },
                plugins: Plugins {
                    legend: Legend {
                        labels: color(palette.text),
                    },
                },
            },
        }
    }

    /// Recolor text and grid lines; data and series colors are untouched
    pub fn restyle(&mut self, theme: Theme) {
        let palette = ChartPalette::for_theme(theme);
        self.options.scales.y.restyle(palette);
        self.options.scales.y1.restyle(palette);
        self.options.scales.x.restyle(palette);
        self.options.plugins.legend.labels = color(palette.text);
    }
}

/// Charts currently drawn, keyed by canvas id
#[derive(Debug, Clone, Default)]
pub struct ChartRegistry {
    charts: BTreeMap<String, ChartSpec>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a chart on a canvas, replacing whatever was drawn there.
    /// Returns true if an earlier chart was destroyed.
    pub fn draw(&mut self, canvas_id: &str, spec: ChartSpec) -> bool {
        let replaced = self.charts.insert(canvas_id.to_string(), spec).is_some();
        if replaced {
            tracing::debug!("Destroyed previous chart on canvas '{}'", canvas_id);
        }
        replaced
    }

    /// Drop the chart on a canvas that is no longer displayed
    pub fn remove(&mut self, canvas_id: &str) -> Option<ChartSpec> {
        self.charts.remove(canvas_id)
    }

    pub fn get(&self, canvas_id: &str) -> Option<&ChartSpec> {
        self.charts.get(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn restyle_all(&mut self, theme: Theme) {
        for spec in self.charts.values_mut() {
            spec.restyle(theme);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChartSpec)> {
        self.charts.iter().map(|(id, spec)| (id.as_str(), spec))
    }
}
