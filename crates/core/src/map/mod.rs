//! Map descriptions built from validated records.
//!
//! Nothing here renders anything. A [Map] is a plain description (center,
//! zoom, layout, layers, controls) that serializes to JSON for whichever
//! widget library draws it.

mod style;
mod visualizer;

pub use style::{GeoJsonLayer, Style, StyleCallback};
pub use visualizer::MapVisualizer;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// The zoom a base map starts at when the caller doesn't pick one.
pub const DEFAULT_ZOOM: u8 = 8;

/// An interactive map description.
#[derive(Debug, Clone, Serialize)]
pub struct Map {
    /// `[lat, lon]`.
    pub center: [f64; 2],

    /// The initial zoom level.
    pub zoom: u8,

    /// Widget dimensions.
    pub layout: Layout,

    /// Layers, bottom to top.
    pub layers: Vec<Layer>,

    /// Controls, e.g. a split slider.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
}

/// Widget dimensions as CSS lengths, e.g. `{"height": "700px"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Widget height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    /// Widget width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    /// Any other layout keys, passed through untouched.
    #[serde(flatten)]
    pub additional_fields: JsonMap<String, Value>,
}

/// Caller overrides for a base map.
///
/// Each field that is `Some` wins over the value computed from the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOptions {
    /// `[lat, lon]`.
    pub center: Option<[f64; 2]>,

    /// The initial zoom level.
    pub zoom: Option<u8>,

    /// Widget dimensions.
    pub layout: Option<Layout>,
}

/// A map layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    /// Raster tiles from a url template.
    Tile(TileLayer),

    /// Vector features with per-feature styling.
    GeoJson(GeoJsonLayer),
}

/// A raster tile layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    /// The `{z}/{x}/{y}` url template.
    pub url: String,

    /// The lowest zoom to request tiles at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<u8>,

    /// The highest zoom to request tiles at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,

    /// `[[south, west], [north, east]]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[[f64; 2]; 2]>,
}

/// A map control.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    /// A slider comparing two tile layers side by side.
    Split(SplitMapControl),
}

/// A side-by-side comparison of two tile layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitMapControl {
    /// Shown left of the slider.
    pub left_layer: TileLayer,

    /// Shown right of the slider.
    pub right_layer: TileLayer,
}

impl Map {
    /// Adds a layer on top of the existing ones.
    pub fn add(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }

    /// Adds a control.
    pub fn add_control(&mut self, control: impl Into<Control>) {
        self.controls.push(control.into());
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            height: Some("700px".to_string()),
            width: None,
            additional_fields: JsonMap::new(),
        }
    }
}

impl TileLayer {
    /// A tile layer with just a url.
    pub fn new(url: impl ToString) -> TileLayer {
        TileLayer {
            url: url.to_string(),
            min_zoom: None,
            max_zoom: None,
            bounds: None,
        }
    }
}

impl From<TileLayer> for Layer {
    fn from(value: TileLayer) -> Self {
        Layer::Tile(value)
    }
}

impl From<GeoJsonLayer> for Layer {
    fn from(value: GeoJsonLayer) -> Self {
        Layer::GeoJson(value)
    }
}

impl From<SplitMapControl> for Control {
    fn from(value: SplitMapControl) -> Self {
        Control::Split(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Layout, Map, TileLayer};
    use serde_json::json;

    #[test]
    fn layout_passes_through_unknown_keys() {
        let layout: Layout =
            serde_json::from_value(json!({"height": "500px", "border": "1px solid"})).unwrap();
        assert_eq!(layout.height.as_deref(), Some("500px"));
        assert_eq!(layout.additional_fields["border"], "1px solid");
        assert_eq!(
            serde_json::to_value(&layout).unwrap(),
            json!({"height": "500px", "border": "1px solid"})
        );
    }

    #[test]
    fn serialize_tile_layer() {
        let mut map = Map {
            center: [37.35, 36.75],
            zoom: 8,
            layout: Layout::default(),
            layers: Vec::new(),
            controls: Vec::new(),
        };
        map.add(TileLayer::new("http://raster.test/{z}/{x}/{y}"));
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({
                "center": [37.35, 36.75],
                "zoom": 8,
                "layout": {"height": "700px"},
                "layers": [{"type": "tile", "url": "http://raster.test/{z}/{x}/{y}"}]
            })
        );
    }
}
