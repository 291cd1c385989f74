use crate::{Bbox, Error, Result, Validate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A [TileJSON](https://github.com/mapbox/tilejson-spec) document describing
/// how to render a set of tiles.
///
/// These are produced per request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileJson {
    /// Tile url templates. Only the first is used for rendering.
    pub tiles: Vec<String>,

    /// The lowest zoom level tiles are available at.
    pub minzoom: u8,

    /// The highest zoom level tiles are available at.
    pub maxzoom: u8,

    /// The extent covered by the tiles.
    pub bounds: Bbox,

    /// A name describing the tileset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Additional fields, e.g. `tilejson`, `scheme`, or `center`.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl TileJson {
    /// Returns the url template used for rendering.
    ///
    /// Validated tile endpoints always have one.
    pub fn tile_url(&self) -> Option<&str> {
        self.tiles.first().map(String::as_str)
    }
}

impl Validate for TileJson {
    fn valid(self) -> Result<TileJson> {
        if self.tiles.is_empty() {
            Err(Error::NoTiles)
        } else if self.minzoom > self.maxzoom {
            Err(Error::InvalidZoomRange {
                minzoom: self.minzoom,
                maxzoom: self.maxzoom,
            })
        } else {
            Ok(self)
        }
    }
}
