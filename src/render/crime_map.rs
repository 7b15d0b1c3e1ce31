use std::path::Path;

use log::debug;
use serde::Serialize;

use super::{escape_html, script_json, write_file, RenderError};
use crate::config::{MapSettings, Theme};
use crate::data::IncidentRecord;

/// One circle marker as handed to Leaflet.
#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    popup: String,
    tooltip: String,
}

impl Marker {
    fn from_record(record: &IncidentRecord) -> Self {
        let category = escape_html(&record.incident_category);
        Marker {
            lat: record.latitude,
            lon: record.longitude,
            popup: format!(
                "Category: {category}<br>Date: {}",
                record.incident_date.format("%Y-%m-%d")
            ),
            tooltip: category,
        }
    }
}

#[derive(Debug, Serialize)]
struct MapView {
    center: [f64; 2],
    zoom: u8,
    color: String,
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Crime Map - San Francisco</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map { height: 100%; width: 100%; margin: 0; padding: 0; }
  .legend { position: fixed; bottom: 50px; left: 50px; z-index: 1000;
            background-color: white; padding: 10px; border: 2px solid grey;
            border-radius: 5px; }
</style>
</head>
<body>
<div id="map"></div>
<div class="legend">
  <h4>Crime Map - San Francisco</h4>
  <p>Red dots represent crime locations</p>
  <p>Click on dots for more information</p>
  <p>Sample of __COUNT__ incidents shown</p>
</div>
<script>
  const view = __VIEW__;
  const markers = __MARKERS__;
  const map = L.map('map').setView(view.center, view.zoom);
  L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);
  for (const m of markers) {
    L.circleMarker([m.lat, m.lon], { radius: 3, color: view.color, fill: true })
      .bindPopup(m.popup)
      .bindTooltip(m.tooltip)
      .addTo(map);
  }
</script>
</body>
</html>
"#;

/// Build the standalone Leaflet page for `sample`.
pub fn build_html(
    sample: &[&IncidentRecord],
    settings: &MapSettings,
    theme: &Theme,
) -> Result<String, RenderError> {
    let markers: Vec<Marker> = sample.iter().map(|r| Marker::from_record(r)).collect();
    let view = MapView {
        center: [settings.center.0, settings.center.1],
        zoom: settings.zoom,
        color: theme.marker_color.clone(),
    };

    Ok(TEMPLATE
        .replace("__COUNT__", &markers.len().to_string())
        .replace("__VIEW__", &script_json(&view)?)
        .replace("__MARKERS__", &script_json(&markers)?))
}

/// Write the interactive point map to `path`.
pub fn render(
    sample: &[&IncidentRecord],
    path: &Path,
    settings: &MapSettings,
    theme: &Theme,
) -> Result<(), RenderError> {
    let html = build_html(sample, settings, theme)?;
    write_file(path, &html)?;
    debug!("wrote {} markers to {}", sample.len(), path.display());
    Ok(())
}
