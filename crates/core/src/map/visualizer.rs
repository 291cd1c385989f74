use super::{
    DEFAULT_ZOOM, GeoJsonLayer, Layout, Map, MapOptions, SplitMapControl, Style, TileLayer,
};
use crate::{Bbox, Collection, Error, Item, Result, TileJson, mosaic::Period};
use chrono::{DateTime, Utc};
use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::Value;

/// Builds [Map] descriptions from validated records.
#[derive(Debug, Clone, Default)]
pub struct MapVisualizer {
    layout: Layout,
}

impl MapVisualizer {
    /// Creates a visualizer whose maps default to `layout`.
    pub fn new(layout: Layout) -> MapVisualizer {
        MapVisualizer { layout }
    }

    /// Returns an empty map centered on `bounds`, with overrides applied.
    pub fn base_map(&self, bounds: Bbox, zoom: u8, options: &MapOptions) -> Map {
        Map {
            center: options.center.unwrap_or_else(|| bounds.center()),
            zoom: options.zoom.unwrap_or(zoom),
            layout: options
                .layout
                .clone()
                .unwrap_or_else(|| self.layout.clone()),
            layers: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// A map with one tile layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{Bbox, TileJson, map::{Layer, MapOptions, MapVisualizer}};
    ///
    /// let tilejson = TileJson {
    ///     tiles: vec!["http://raster.test/{z}/{x}/{y}".to_string()],
    ///     minzoom: 12,
    ///     maxzoom: 22,
    ///     bounds: Bbox::new(36.0, 36.9, 37.5, 37.8),
    ///     name: None,
    ///     additional_fields: Default::default(),
    /// };
    /// let map = MapVisualizer::default().tile_map(&tilejson, &MapOptions::default()).unwrap();
    /// assert!(matches!(&map.layers[0], Layer::Tile(layer) if layer.min_zoom == Some(12)));
    /// ```
    pub fn tile_map(&self, tilejson: &TileJson, options: &MapOptions) -> Result<Map> {
        let url = tilejson.tile_url().ok_or(Error::NoTiles)?;
        let mut map = self.base_map(tilejson.bounds, DEFAULT_ZOOM, options);
        map.add(TileLayer {
            url: url.to_string(),
            min_zoom: Some(tilejson.minzoom),
            max_zoom: Some(tilejson.maxzoom),
            bounds: Some(tilejson.bounds.lat_lon_bounds()),
        });
        Ok(map)
    }

    /// A map comparing two tile sets with a split slider, centered on the left one.
    pub fn split_map(&self, left: &TileJson, right: &TileJson, options: &MapOptions) -> Result<Map> {
        let left_url = left.tile_url().ok_or(Error::NoTiles)?;
        let right_url = right.tile_url().ok_or(Error::NoTiles)?;
        let mut map = self.base_map(left.bounds, DEFAULT_ZOOM, options);
        map.add_control(SplitMapControl {
            left_layer: TileLayer::new(left_url),
            right_layer: TileLayer::new(right_url),
        });
        Ok(map)
    }

    /// A map of every bounding box in a collection's spatial extent, with the
    /// overall footprint outlined and dashed.
    pub fn collection_footprints_map(
        &self,
        collection: &Collection,
        options: &MapOptions,
    ) -> Result<Map> {
        let main_bbox = collection
            .main_bbox()
            .ok_or_else(|| Error::NoSpatialExtent(collection.id.clone()))?;
        let mut map = self.base_map(main_bbox, DEFAULT_ZOOM, options);
        let features = collection
            .extent
            .spatial
            .bbox
            .iter()
            .map(|bbox| {
                let mut properties = JsonObject::new();
                let _ = properties.insert("is_main".to_string(), Value::Bool(*bbox == main_bbox));
                Feature {
                    bbox: None,
                    geometry: Some(bbox.to_polygon()),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();
        let layer = GeoJsonLayer::new(feature_collection(features)).with_style_callback(|feature| {
            if feature.property("is_main") == Some(&Value::Bool(true)) {
                Style {
                    color: Some("black".to_string()),
                    fill_opacity: Some(0.0),
                    weight: Some(2.0),
                    dash_array: Some("5, 5".to_string()),
                    ..Default::default()
                }
            } else {
                Style {
                    color: Some("blue".to_string()),
                    fill_opacity: Some(0.1),
                    weight: Some(1.0),
                    ..Default::default()
                }
            }
        });
        map.add(layer);
        Ok(map)
    }

    /// A map of item footprints, blue before the event and red at or after it.
    ///
    /// Every item must carry a parseable `datetime`.
    pub fn pre_post_event_map(
        &self,
        items: &[Item],
        event_date: DateTime<Utc>,
        options: &MapOptions,
    ) -> Result<Map> {
        let first = items.first().ok_or(Error::NoItems)?;
        for item in items {
            let _ = item.datetime()?;
        }
        let mut map = self.base_map(first.bbox, DEFAULT_ZOOM, options);
        let features = items.iter().map(Item::to_feature).collect();
        let layer =
            GeoJsonLayer::new(feature_collection(features)).with_style_callback(move |feature| {
                let mut style = Style {
                    fill_opacity: Some(0.5),
                    weight: Some(0.2),
                    ..Default::default()
                };
                match feature_datetime(feature) {
                    Some(datetime) => {
                        let color = match Period::classify(datetime, event_date) {
                            Period::Pre => "blue",
                            Period::Post => "red",
                        };
                        style.fill_color = Some(color.to_string());
                    }
                    None => tracing::warn!("feature has no parseable datetime, leaving it unfilled"),
                }
                style
            });
        map.add(layer);
        Ok(map)
    }
}

fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn feature_datetime(feature: &Feature) -> Option<DateTime<Utc>> {
    let datetime = feature.property("datetime")?.as_str()?;
    DateTime::parse_from_rfc3339(datetime)
        .ok()
        .map(|datetime| datetime.with_timezone(&Utc))
}
