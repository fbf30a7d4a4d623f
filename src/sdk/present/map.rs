use std::collections::BTreeMap;

use serde::Serialize;

use crate::sdk::geolocation::GeoPosition;

/// Where the map opens before any position is known.
pub const DEFAULT_CENTER: GeoPosition = GeoPosition {
    latitude: 20.5937,
    longitude: 78.9629,
};
pub const DEFAULT_ZOOM: u8 = 5;

/// Opaque reference to a drawn layer, only meaningful to the surface that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    UserLocation,
    Result,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub weight: u8,
    pub dash_array: Option<String>,
}

impl LineStyle {
    pub fn route() -> Self {
        Self {
            color: "#2563eb".to_string(),
            weight: 3,
            dash_array: Some("6 6".to_string()),
        }
    }
}

/// The drawing primitives the client needs from a map library.
pub trait MapSurface {
    fn set_view(&mut self, center: GeoPosition, zoom: u8);
    fn add_marker(&mut self, position: GeoPosition, style: MarkerStyle) -> LayerHandle;
    fn add_polyline(&mut self, points: &[GeoPosition], style: &LineStyle) -> LayerHandle;
    /// Removing an unknown or already removed handle is a no-op.
    fn remove_layer(&mut self, handle: LayerHandle);
    fn bind_popup(&mut self, handle: LayerHandle, html: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Marker {
        position: GeoPosition,
        style: MarkerStyle,
        popup: Option<String>,
    },
    Polyline {
        points: Vec<GeoPosition>,
        style: LineStyle,
        popup: Option<String>,
    },
}

impl Layer {
    fn popup_mut(&mut self) -> &mut Option<String> {
        match self {
            Layer::Marker { popup, .. } | Layer::Polyline { popup, .. } => popup,
        }
    }
}

/// A map surface that keeps its live layers in memory.
///
/// Serializes to the JSON the CLI writes out with `--map-out`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedMap {
    center: GeoPosition,
    zoom: u8,
    layers: BTreeMap<u64, Layer>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for RecordedMap {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl RecordedMap {
    pub fn new(center: GeoPosition, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            layers: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn center(&self) -> GeoPosition {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&Layer> {
        self.layers.get(&handle.0)
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.layers
            .values()
            .filter(|layer| matches!(layer, Layer::Marker { .. }))
            .count()
    }

    pub fn markers_with_style(&self, wanted: MarkerStyle) -> usize {
        self.layers
            .values()
            .filter(|layer| matches!(layer, Layer::Marker { style, .. } if *style == wanted))
            .count()
    }

    pub fn polyline_count(&self) -> usize {
        self.layers
            .values()
            .filter(|layer| matches!(layer, Layer::Polyline { .. }))
            .count()
    }

    fn insert(&mut self, layer: Layer) -> LayerHandle {
        self.next_id += 1;
        self.layers.insert(self.next_id, layer);
        LayerHandle(self.next_id)
    }
}

impl MapSurface for RecordedMap {
    fn set_view(&mut self, center: GeoPosition, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }

    fn add_marker(&mut self, position: GeoPosition, style: MarkerStyle) -> LayerHandle {
        self.insert(Layer::Marker {
            position,
            style,
            popup: None,
        })
    }

    fn add_polyline(&mut self, points: &[GeoPosition], style: &LineStyle) -> LayerHandle {
        self.insert(Layer::Polyline {
            points: points.to_vec(),
            style: style.clone(),
            popup: None,
        })
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        if self.layers.remove(&handle.0).is_none() {
            log::debug!("Layer {} already removed", handle.0);
        }
    }

    fn bind_popup(&mut self, handle: LayerHandle, html: &str) {
        match self.layers.get_mut(&handle.0) {
            Some(layer) => *layer.popup_mut() = Some(html.to_string()),
            None => log::debug!("Popup bound to missing layer {}", handle.0),
        }
    }
}
