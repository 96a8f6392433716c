//! Page shell: map container, sidebar and the browser glue script

use crate::theme::Theme;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js";

/// Render the page with the initial theme applied
pub fn render_index(theme: Theme) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Debrisense River Monitor</title>
    <link rel="stylesheet" href="{leaflet_css}">
    <script src="{leaflet_js}"></script>
    <script src="{chart_js}"></script>
    <style>{style}</style>
</head>
<body class="{body_class}">
    <header class="topbar">
        <h1>Debrisense River Monitor</h1>
        <button id="theme-toggle" class="theme-toggle" type="button">
            <span class="theme-icon">{toggle_icon}</span>
            <span class="theme-text">{toggle_label}</span>
        </button>
    </header>
    <div id="map"></div>
    <aside id="sidebar" class="sidebar">
        <button class="close-btn" type="button" onclick="toggleSidebar()">&times;</button>
        <div id="location-info"></div>
    </aside>
    <script>{script}</script>
</body>
</html>"#,
        leaflet_css = LEAFLET_CSS,
        leaflet_js = LEAFLET_JS,
        chart_js = CHART_JS,
        style = PAGE_CSS,
        body_class = theme.body_class(),
        toggle_icon = theme.toggle_icon(),
        toggle_label = theme.toggle_label(),
        script = PAGE_SCRIPT,
    )
}

const PAGE_CSS: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
  font-family: system-ui, -apple-system, sans-serif;
  background: #1a1a1a;
  color: #ffffff;
  height: 100vh;
  overflow: hidden;
}
body.light-mode { background: #f5f5f5; color: #333; }
.topbar {
  display: flex;
  justify-content: space-between;
  align-items: center;
  height: 56px;
  padding: 0 1rem;
  background: #222;
}
body.light-mode .topbar { background: #ffffff; border-bottom: 1px solid #ddd; }
.topbar h1 { font-size: 1.1rem; font-weight: 600; }
.theme-toggle {
  display: flex;
  gap: 0.4rem;
  align-items: center;
  padding: 0.4rem 0.9rem;
  border: 1px solid rgba(255,255,255,0.2);
  border-radius: 999px;
  background: transparent;
  color: inherit;
  cursor: pointer;
}
body.light-mode .theme-toggle { border-color: rgba(0,0,0,0.2); }
#map { height: calc(100vh - 56px); width: 100%; }
.sidebar {
  position: fixed;
  top: 56px;
  right: -420px;
  width: 400px;
  height: calc(100vh - 56px);
  overflow-y: auto;
  padding: 1rem;
  background: #2a2a2a;
  transition: right 0.3s ease;
  z-index: 1000;
}
.sidebar.active { right: 0; }
body.light-mode .sidebar { background: #ffffff; box-shadow: -2px 0 8px rgba(0,0,0,0.1); }
.close-btn { float: right; background: none; border: none; color: inherit; font-size: 1.5rem; cursor: pointer; }
.location-img { width: 100%; border-radius: 8px; }
.no-image { padding: 40px; text-align: center; color: #cccccc; background: rgba(255,255,255,0.05); }
.river-name h3 { margin: 0.75rem 0; }
.loading { color: #cccccc; padding: 1rem 0; }
.data-section { margin-bottom: 0.75rem; border: 1px solid rgba(255,255,255,0.1); border-radius: 6px; }
body.light-mode .data-section { border-color: rgba(0,0,0,0.1); }
.section-header { display: flex; gap: 0.5rem; align-items: center; padding: 0.5rem 0.75rem; cursor: pointer; }
.section-header h4 { flex: 1; }
.section-header.collapsed .toggle-icon { transform: rotate(-90deg); }
.update-time { font-size: 0.75rem; color: #999; }
.section-content { padding: 0.5rem 0.75rem; }
.section-content.collapsed { display: none; }
.sensor-grid, .weather-grid, .forecast-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 0.5rem; }
.sensor-item, .weather-item, .forecast-day { padding: 0.5rem; border-radius: 4px; background: rgba(255,255,255,0.05); }
body.light-mode .sensor-item, body.light-mode .weather-item, body.light-mode .forecast-day { background: rgba(0,0,0,0.04); }
.sensor-header { display: flex; justify-content: space-between; font-size: 0.8rem; }
.sensor-value { font-size: 1.1rem; font-weight: 600; }
.weather-item { display: flex; justify-content: space-between; }
.weather-note { color: #ffd93d; font-size: 0.8rem; margin-bottom: 10px; }
.no-forecast { color: #cccccc; text-align: center; padding: 20px; }
.timeframe-selector { display: flex; gap: 0.25rem; margin-bottom: 0.5rem; }
.timeframe-btn { flex: 1; padding: 0.3rem; border: 1px solid #4a9eff; border-radius: 4px; background: transparent; color: inherit; cursor: pointer; }
.timeframe-btn.active { background: #4a9eff; color: #ffffff; }
.prediction-header { display: flex; justify-content: space-between; }
.prediction-value { font-size: 1.4rem; font-weight: 700; }
.risk-level { font-size: 0.8rem; font-weight: 600; letter-spacing: 0.05em; }
.early-warning { margin-bottom: 0.75rem; padding: 0.5rem 0.75rem; border: 2px solid; border-radius: 6px; }
.error { color: #ff6b6b; }
.chart-container { position: relative; height: 220px; }
.update-schedule { font-size: 0.85rem; color: #999; }
.custom-donut-marker .donut-outer {
  width: 20px; height: 20px; border-radius: 50%;
  background: rgba(74, 158, 255, 0.35);
  display: flex; align-items: center; justify-content: center;
}
.custom-donut-marker .donut-inner { width: 10px; height: 10px; border-radius: 50%; background: #4a9eff; }
"#;

const PAGE_SCRIPT: &str = r#"
const charts = {};
let map = null;
let tileLayer = null;
let panelSeq = 0;
const pageSession = Date.now().toString(36) + Math.random().toString(36).slice(2);
const sessionQuery = '?session=' + encodeURIComponent(pageSession);

function applyTileLayer(layer) {
  if (tileLayer) { map.removeLayer(tileLayer); }
  tileLayer = L.tileLayer(layer.url, {
    attribution: layer.attribution,
    subdomains: layer.subdomains,
    maxZoom: layer.max_zoom
  }).addTo(map);
}

function toggleSidebar(open) {
  const sidebar = document.getElementById('sidebar');
  if (open === true) { sidebar.classList.add('active'); } else { sidebar.classList.toggle('active'); }
}

function toggleSection(id) {
  const content = document.getElementById(id);
  if (!content) return;
  content.classList.toggle('collapsed');
  content.previousElementSibling.classList.toggle('collapsed');
}

function showTimeframe(timeframe) {
  document.querySelectorAll('.prediction-card').forEach(card => {
    card.style.display = card.dataset.timeframe === timeframe ? 'block' : 'none';
  });
  document.querySelectorAll('.timeframe-btn').forEach(btn => {
    btn.classList.toggle('active', btn.dataset.timeframe === timeframe);
  });
}

function drawChart(canvasId, spec) {
  if (charts[canvasId]) { charts[canvasId].destroy(); delete charts[canvasId]; }
  const canvas = document.getElementById(canvasId);
  if (!canvas || !spec) return;
  charts[canvasId] = new Chart(canvas, spec);
}

function element(tag, text, className) {
  const node = document.createElement(tag);
  if (text !== undefined) { node.textContent = text; }
  if (className) { node.className = className; }
  return node;
}

function renderBasicFallback(info, location) {
  if (charts.predictionChart) { charts.predictionChart.destroy(); delete charts.predictionChart; }
  const image = element('div', undefined, 'location-image');
  const placeholder = element('div', undefined, 'no-image');
  placeholder.style.display = 'block';
  placeholder.append(element('p', '📸 Image not available'), element('p', location.name));
  image.append(placeholder);

  const title = element('div', undefined, 'river-name');
  title.append(element('h3', location.name));

  const basic = element('div', undefined, 'basic-data');
  const level = location.pollution_level == null ? 'Unknown' : String(location.pollution_level);
  const pollution = element('p');
  pollution.append(element('strong', 'Pollution Level:'), ' ' + level);
  const position = element('p');
  position.append(element('strong', 'Location:'), ' ' + location.lat + ', ' + location.lng);
  basic.append(element('h4', 'Basic Information'), pollution, position);

  info.replaceChildren(image, title, basic);
}

async function openPanel(marker) {
  const seq = ++panelSeq;
  const info = document.getElementById('location-info');
  toggleSidebar(true);
  try {
    const loading = await fetch('/panel/' + marker.id + '/loading');
    if (seq !== panelSeq) return;
    if (loading.ok) { info.innerHTML = await loading.text(); }

    const response = await fetch('/panel/' + marker.id + sessionQuery);
    if (response.status === 409 || seq !== panelSeq) return;
    if (!response.ok) { throw new Error('panel request failed: ' + response.status); }
    const panel = await response.json();
    if (seq !== panelSeq) return;
    if (charts.predictionChart) { charts.predictionChart.destroy(); delete charts.predictionChart; }
    info.innerHTML = panel.html;
    if (panel.chart) { drawChart('predictionChart', panel.chart); }
  } catch (error) {
    if (seq !== panelSeq) return;
    console.warn('Showing basic location info:', error);
    renderBasicFallback(info, marker.location);
  }
}

function applyTheme(state) {
  document.body.classList.toggle('light-mode', state.theme === 'light');
  const toggle = document.getElementById('theme-toggle');
  toggle.querySelector('.theme-icon').textContent = state.toggle_icon;
  toggle.querySelector('.theme-text').textContent = state.toggle_label;
  applyTileLayer(state.tile_layer);
  Object.entries(state.charts || {}).forEach(([canvasId, spec]) => {
    const chart = charts[canvasId];
    if (!chart) return;
    chart.options.scales = spec.options.scales;
    chart.options.plugins = spec.options.plugins;
    chart.update();
  });
}

async function init() {
  const view = await (await fetch('/api/map')).json();
  map = L.map('map', {
    center: view.center,
    zoom: view.zoom,
    minZoom: view.min_zoom,
    maxBounds: view.max_bounds,
    maxBoundsViscosity: view.max_bounds_viscosity,
    zoomControl: true,
    attributionControl: true
  });
  applyTileLayer(view.tile_layer);

  const markers = await (await fetch('/api/markers')).json();
  markers.forEach(marker => {
    const icon = L.divIcon({
      className: marker.icon.class_name,
      html: marker.icon.html,
      iconSize: marker.icon.size,
      iconAnchor: marker.icon.anchor
    });
    L.marker([marker.location.lat, marker.location.lng], { icon: icon })
      .addTo(map)
      .on('click', () => openPanel(marker));
  });

  document.getElementById('theme-toggle').addEventListener('click', async () => {
    const next = document.body.classList.contains('light-mode') ? 'dark' : 'light';
    const response = await fetch('/api/theme' + sessionQuery, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ theme: next })
    });
    if (response.ok) { applyTheme(await response.json()); }
  });

  map.invalidateSize();
}

document.addEventListener('DOMContentLoaded', init);
"#;
