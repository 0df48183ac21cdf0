//! Standalone Leaflet page for a rendered map.
//!
//! The [`MapDocument`] is serialized to JSON and embedded in a fixed page
//! template; a small script builds the Leaflet map from it. Overlays are
//! inline `data:` URIs, so the page needs nothing but the CDN assets.

use boundaries::{PathStyle, Tooltip};
use chrono::{DateTime, Utc};
use map_common::LayerKind;
use serde::Serialize;

use crate::error::ViewerResult;
use crate::request::Basemap;

/// A base map tile layer.
#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

impl From<Basemap> for TileLayer {
    fn from(basemap: Basemap) -> Self {
        Self {
            name: basemap.name(),
            url: basemap.tile_url(),
            attribution: basemap.attribution(),
            max_zoom: basemap.max_zoom(),
        }
    }
}

/// A colorized raster placed over its bounds.
#[derive(Debug, Clone, Serialize)]
pub struct ImageOverlay {
    pub name: String,
    /// `data:image/png;base64,...`
    pub url: String,
    /// `[[south, west], [north, east]]`
    pub bounds: [[f64; 2]; 2],
    pub opacity: f64,
    pub interactive: bool,
}

/// The ward outlines with hover highlight and tooltip.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryOverlay {
    pub name: String,
    /// GeoJSON FeatureCollection.
    pub data: serde_json::Value,
    pub style: PathStyle,
    pub highlight: PathStyle,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn for_kind(kind: LayerKind) -> Self {
        Self {
            title: kind.title(),
            entries: kind
                .scheme()
                .legend()
                .map(|(color, label)| LegendEntry { color, label })
                .collect(),
        }
    }
}

/// Map controls to add.
#[derive(Debug, Clone, Serialize)]
pub struct Controls {
    pub zoom: bool,
    pub scale: bool,
    pub minimap: bool,
    pub fullscreen: bool,
    pub measure: bool,
    /// Leaflet position of the layer toggle.
    pub layer_control: &'static str,
}

impl Controls {
    pub fn new(measure: bool) -> Self {
        Self {
            zoom: true,
            scale: true,
            minimap: true,
            fullscreen: true,
            measure,
            layer_control: "topright",
        }
    }
}

/// Everything needed to draw one map.
#[derive(Debug, Clone, Serialize)]
pub struct MapDocument {
    pub title: String,
    pub year: i32,
    /// Initial `[lat, lon]`: the middle of the overlays, or the
    /// configured center when none loaded.
    pub center: [f64; 2],
    pub zoom: u8,
    pub basemap: TileLayer,
    pub overlays: Vec<ImageOverlay>,
    pub boundaries: Option<BoundaryOverlay>,
    /// Union of overlay bounds; the map is fitted to it when present.
    pub fit_bounds: Option<[[f64; 2]; 2]>,
    #[serde(skip)]
    pub legends: Vec<Legend>,
    pub controls: Controls,
    #[serde(skip)]
    pub generated_at: DateTime<Utc>,
}

impl MapDocument {
    /// Names of all overlays in the layer control, rasters first.
    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays
            .iter()
            .map(|o| o.name.as_str())
            .chain(self.boundaries.iter().map(|b| b.name.as_str()))
            .collect()
    }

    /// Render the standalone HTML page.
    pub fn to_html(&self) -> ViewerResult<String> {
        let map_json = script_safe(&serde_json::to_string(self)?);
        let heading = format!("{} Map Viewer – {}", self.title, self.year);

        let title = escape_html(&heading);
        let legend = self.legend_html();
        let generated = self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string();

        Ok(fill_template(
            PAGE_TEMPLATE,
            &[
                ("TITLE", &title),
                ("LEGEND", &legend),
                ("GENERATED", &generated),
                ("MAP_JSON", &map_json),
            ],
        ))
    }

    fn legend_html(&self) -> String {
        let mut html = String::new();
        for legend in &self.legends {
            html.push_str("<div class=\"legend\">\n");
            html.push_str(&format!("<h4>{}</h4>\n", escape_html(legend.title)));
            for entry in &legend.entries {
                html.push_str(&format!(
                    "<div class=\"legend-row\"><span class=\"swatch\" style=\"background-color: {};\"></span>{}</div>\n",
                    escape_html(entry.color),
                    escape_html(entry.label)
                ));
            }
            html.push_str("</div>\n");
        }
        html
    }
}

/// Replace `{{NAME}}` placeholders in one pass over `template`.
///
/// Substituted values are copied verbatim and never scanned again.
/// Unknown placeholders are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet-minimap@3.6.1/dist/Control.MiniMap.min.css">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet.fullscreen/3.0.0/Control.FullScreen.min.css">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/gh/ljagis/leaflet-measure@2.1.7/dist/leaflet-measure.min.css">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/leaflet-minimap@3.6.1/dist/Control.MiniMap.min.js"></script>
    <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet.fullscreen/3.0.0/Control.FullScreen.min.js"></script>
    <script src="https://cdn.jsdelivr.net/gh/ljagis/leaflet-measure@2.1.7/dist/leaflet-measure.min.js"></script>
    <style>
        html, body { margin: 0; height: 100%; font-family: 'Segoe UI', sans-serif; }
        body { display: flex; flex-direction: column; }
        .map-header {
            background: linear-gradient(135deg, #1e3a8a 0%, #3b82f6 100%);
            color: white;
            padding: 14px 24px;
        }
        .map-header h1 { margin: 0; font-size: 1.3rem; font-weight: 600; }
        .map-body { flex: 1; display: flex; min-height: 0; }
        #map { flex: 1; }
        .map-panel {
            width: 260px;
            padding: 16px;
            background: #f8fafc;
            border-left: 1px solid #e2e8f0;
            overflow-y: auto;
        }
        .legend { margin-bottom: 18px; }
        .legend h4 { margin: 0 0 8px 0; color: #1e293b; }
        .legend-row { display: flex; align-items: center; margin-bottom: 6px; font-size: 0.9rem; }
        .swatch { width: 20px; height: 20px; margin-right: 8px; border-radius: 3px; }
        .map-footer { font-size: 0.8rem; color: #64748b; margin-top: 24px; }
    </style>
</head>
<body>
    <div class="map-header"><h1>{{TITLE}}</h1></div>
    <div class="map-body">
        <div id="map"></div>
        <div class="map-panel">
{{LEGEND}}
            <div class="map-footer">Generated {{GENERATED}}</div>
        </div>
    </div>
    <script>
        const MAP = {{MAP_JSON}};

        function escapeHtml(value) {
            return String(value)
                .replace(/&/g, '&amp;')
                .replace(/</g, '&lt;')
                .replace(/>/g, '&gt;')
                .replace(/"/g, '&quot;');
        }

        function formatValue(value, localize) {
            if (value === null || value === undefined) return '';
            if (localize && typeof value === 'number') return value.toLocaleString();
            return value;
        }

        const map = L.map('map', {
            center: MAP.center,
            zoom: MAP.zoom,
            zoomControl: MAP.controls.zoom
        });

        const baseLayers = {};
        baseLayers[MAP.basemap.name] = L.tileLayer(MAP.basemap.url, {
            attribution: MAP.basemap.attribution,
            maxZoom: MAP.basemap.max_zoom
        }).addTo(map);

        const overlays = {};
        MAP.overlays.forEach(function (overlay) {
            overlays[overlay.name] = L.imageOverlay(overlay.url, overlay.bounds, {
                opacity: overlay.opacity,
                interactive: overlay.interactive
            }).addTo(map);
        });

        if (MAP.boundaries) {
            const wards = MAP.boundaries;
            const layer = L.geoJSON(wards.data, {
                style: function () { return wards.style; },
                onEachFeature: function (feature, featureLayer) {
                    const props = feature.properties || {};
                    const rows = wards.tooltip.fields.map(function (field, i) {
                        return '<b>' + escapeHtml(wards.tooltip.aliases[i]) + '</b> ' +
                            escapeHtml(formatValue(props[field], wards.tooltip.localize));
                    });
                    featureLayer.bindTooltip(rows.join('<br>'), { sticky: wards.tooltip.sticky });
                    featureLayer.on('mouseover', function () { featureLayer.setStyle(wards.highlight); });
                    featureLayer.on('mouseout', function () { layer.resetStyle(featureLayer); });
                }
            }).addTo(map);
            overlays[wards.name] = layer;
        }

        if (MAP.fit_bounds) {
            map.fitBounds(MAP.fit_bounds);
        }

        if (MAP.controls.scale) {
            L.control.scale().addTo(map);
        }
        if (MAP.controls.minimap) {
            new L.Control.MiniMap(L.tileLayer(MAP.basemap.url, { attribution: MAP.basemap.attribution }), {
                toggleDisplay: true
            }).addTo(map);
        }
        if (MAP.controls.measure) {
            L.control.measure({
                primaryLengthUnit: 'meters',
                secondaryLengthUnit: 'kilometers',
                primaryAreaUnit: 'sqmeters'
            }).addTo(map);
        }
        if (MAP.controls.fullscreen) {
            L.control.fullscreen({ position: 'topleft' }).addTo(map);
        }

        L.control.layers(baseLayers, overlays, { position: MAP.controls.layer_control }).addTo(map);
    </script>
</body>
</html>
"#;
