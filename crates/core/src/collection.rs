use crate::{Bbox, Error, Link, Links, Result, Validate};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog-level metadata for one imagery collection, usually one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Identifier for the collection, used in every subsequent lookup.
    pub id: String,

    /// A short descriptive one-line title for the collection.
    pub title: String,

    /// Detailed multi-line description to fully explain the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Spatial and temporal extents.
    pub extent: Extent,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Descriptions of the assets that items in this collection carry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_assets: Option<IndexMap<String, Value>>,

    /// Additional fields not part of the record shape.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// The extent of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Spatial extent.
    pub spatial: SpatialExtent,

    /// Temporal extent.
    pub temporal: TemporalExtent,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// The spatial extent of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    /// Bounding boxes. The first one is the overall footprint; the rest are
    /// sub-regions, e.g. one per acquisition area.
    pub bbox: Vec<Bbox>,
}

/// The temporal extent of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    /// Time intervals. `None` means open-ended.
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

impl Collection {
    /// Creates a collection with one spatial bbox and an open temporal interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{Bbox, Collection};
    ///
    /// let collection = Collection::new("Kahramanmaras-turkey-earthquake-23", "Turkey Earthquake", Bbox::new(36.0, 36.0, 38.0, 38.0));
    /// assert_eq!(collection.main_bbox(), Some(Bbox::new(36.0, 36.0, 38.0, 38.0)));
    /// ```
    pub fn new(id: impl ToString, title: impl ToString, bbox: Bbox) -> Collection {
        Collection {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            extent: Extent {
                spatial: SpatialExtent { bbox: vec![bbox] },
                temporal: TemporalExtent {
                    interval: vec![[None, None]],
                },
                additional_fields: Map::new(),
            },
            links: Vec::new(),
            item_assets: None,
            additional_fields: Map::new(),
        }
    }

    /// Returns the overall footprint, the first spatial bbox.
    pub fn main_bbox(&self) -> Option<Bbox> {
        self.extent.spatial.bbox.first().copied()
    }

    /// Returns the temporal intervals of this collection.
    pub fn temporal_interval(&self) -> &[[Option<DateTime<Utc>>; 2]] {
        &self.extent.temporal.interval
    }
}

impl Links for Collection {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

impl Validate for Collection {
    fn valid(self) -> Result<Collection> {
        if self.extent.spatial.bbox.is_empty() {
            Err(Error::NoSpatialExtent(self.id))
        } else {
            Ok(self)
        }
    }
}
