//! One render cycle: rasters and wards in, [`MapDocument`] out.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use boundaries::{load_boundaries_with, LabelFieldRule};
use chrono::Utc;
use map_common::{GeoBounds, LayerId, MapError};
use renderer::{colorize, png};
use tracing::{debug, error, info, warn};

use crate::config::ViewerConfig;
use crate::error::ViewerResult;
use crate::html::{BoundaryOverlay, Controls, ImageOverlay, Legend, MapDocument};
use crate::request::RenderRequest;

/// What a skipped load was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Layer(LayerId),
    Boundaries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A layer that could not be drawn, reported once per render.
#[derive(Debug)]
pub struct SkipReport {
    pub subject: Subject,
    pub severity: Severity,
    pub error: MapError,
}

impl SkipReport {
    pub fn path(&self) -> PathBuf {
        self.error.path().to_path_buf()
    }
}

/// Result of a render cycle.
#[derive(Debug)]
pub struct RenderOutcome {
    pub document: MapDocument,
    /// Layers drawn, in drawing order.
    pub loaded: Vec<LayerId>,
    pub skipped: Vec<SkipReport>,
    /// Union of the drawn layers' bounds.
    pub bounds: Option<GeoBounds>,
}

impl RenderOutcome {
    pub fn has_errors(&self) -> bool {
        self.skipped.iter().any(|s| s.severity == Severity::Error)
    }
}

/// Draw every visible layer of `request`, skipping the ones that fail.
///
/// Only an invalid request or a PNG encoding failure aborts the cycle.
pub fn render(config: &ViewerConfig, request: &RenderRequest) -> ViewerResult<RenderOutcome> {
    request.validate(config)?;

    let mut overlays = Vec::new();
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();
    let mut layer_bounds = Vec::new();

    for layer in request.visible_layers() {
        let path = config.layer_path(layer, request.year);
        let name = format!("{} {}", layer.display_name(), request.year);

        match colorize(&path, layer.kind()) {
            Ok((image, bounds)) => {
                let encoded = png::encode_image(&image)?;
                overlays.push(ImageOverlay {
                    name: name.clone(),
                    url: format!("data:image/png;base64,{}", STANDARD.encode(&encoded)),
                    bounds: bounds.to_leaflet(),
                    opacity: request.opacity,
                    interactive: true,
                });
                loaded.push(layer);
                layer_bounds.push(bounds);
                info!(layer = %name, width = image.width, height = image.height, "Loaded layer");
            }
            Err(e) => {
                error!(layer = %name, path = %e.path().display(), kind = e.kind(), error = %e, "Failed to load layer");
                skipped.push(SkipReport {
                    subject: Subject::Layer(layer),
                    severity: Severity::Error,
                    error: e,
                });
            }
        }
    }

    let boundaries = if request.show_wards {
        load_ward_overlay(config, &mut skipped)?
    } else {
        None
    };

    let bounds = GeoBounds::union_all(&layer_bounds);

    let document = MapDocument {
        title: config.title.clone(),
        year: request.year,
        center: bounds
            .map(|b| {
                let (lat, lon) = b.center();
                [lat, lon]
            })
            .unwrap_or(config.map.center),
        zoom: request.zoom,
        basemap: request.basemap.into(),
        overlays,
        boundaries,
        fit_bounds: bounds.map(|b| b.to_leaflet()),
        legends: request.active_kinds().into_iter().map(Legend::for_kind).collect(),
        controls: Controls::new(request.show_measure),
        generated_at: Utc::now(),
    };

    debug!(
        year = request.year,
        overlays = document.overlays.len(),
        wards = document.boundaries.is_some(),
        bounds_collected = layer_bounds.len(),
        fit_bounds = ?document.fit_bounds,
        "Render complete"
    );

    Ok(RenderOutcome {
        document,
        loaded,
        skipped,
        bounds,
    })
}

fn load_ward_overlay(
    config: &ViewerConfig,
    skipped: &mut Vec<SkipReport>,
) -> ViewerResult<Option<BoundaryOverlay>> {
    let rule = LabelFieldRule::new(&config.boundaries.label_keys);

    match load_boundaries_with(&config.boundary_stem(), &rule) {
        Ok(set) => {
            info!(
                path = %set.source.display(),
                features = set.len(),
                label_field = %set.label_field,
                "Loaded ward boundaries"
            );
            Ok(Some(BoundaryOverlay {
                name: config.boundaries.name.clone(),
                data: serde_json::to_value(set.to_feature_collection())?,
                style: set.style,
                highlight: set.highlight,
                tooltip: set.tooltip,
            }))
        }
        Err(e) => {
            let severity = if e.is_not_found() {
                warn!(stem = %config.boundary_stem().display(), "Ward boundary shapefile/geojson not found");
                Severity::Warning
            } else {
                error!(path = %e.path().display(), error = %e, "Failed to load ward boundaries");
                Severity::Error
            };
            skipped.push(SkipReport {
                subject: Subject::Boundaries,
                severity,
                error: e,
            });
            Ok(None)
        }
    }
}
