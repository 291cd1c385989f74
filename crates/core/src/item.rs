use crate::{Bbox, Error, Link, Links, Result, Validate};
use chrono::{DateTime, Utc};
use geojson::{Feature, Geometry, feature::Id};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog entry: a single satellite scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Provider identifier, unique within the collection.
    pub id: String,

    /// Bounding box of the asset.
    pub bbox: Bbox,

    /// The full footprint of the asset, if known.
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Open mapping of additional metadata. Pre/post-event operations need a
    /// `datetime` entry.
    pub properties: Map<String, Value>,

    /// Assets keyed by name, e.g. `visual`.
    #[serde(default)]
    pub assets: IndexMap<String, Asset>,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// The id of the owning collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Additional fields, e.g. `type` and `stac_version`.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// A file or service that belongs to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// URI to the asset object.
    pub href: String,

    /// Media type of the asset.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// The displayed title for clients and users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The semantic roles of the asset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Item {
    /// Creates a new item with a bbox and no other metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{Bbox, Item};
    ///
    /// let item = Item::new("an-id", Bbox::new(0.0, 0.0, 1.0, 1.0));
    /// assert_eq!(item.id, "an-id");
    /// ```
    pub fn new(id: impl ToString, bbox: Bbox) -> Item {
        Item {
            id: id.to_string(),
            bbox,
            geometry: None,
            properties: Map::new(),
            assets: IndexMap::new(),
            links: Vec::new(),
            collection: None,
            additional_fields: Map::new(),
        }
    }

    /// Sets the `datetime` property.
    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Item {
        let _ = self.properties.insert(
            "datetime".to_string(),
            Value::String(datetime.to_rfc3339()),
        );
        self
    }

    /// Returns the acquisition time from the `datetime` property.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use eo_maxar::{Bbox, Item};
    ///
    /// let datetime = Utc.with_ymd_and_hms(2023, 2, 6, 0, 0, 0).unwrap();
    /// let item = Item::new("an-id", Bbox::new(0.0, 0.0, 1.0, 1.0)).with_datetime(datetime);
    /// assert_eq!(item.datetime().unwrap(), datetime);
    /// ```
    pub fn datetime(&self) -> Result<DateTime<Utc>> {
        let datetime = self
            .properties
            .get("datetime")
            .and_then(Value::as_str)
            .ok_or(Error::MissingField("datetime"))?;
        DateTime::parse_from_rfc3339(datetime)
            .map(|datetime| datetime.with_timezone(&Utc))
            .map_err(Error::from)
    }

    /// Converts this item into a GeoJSON feature.
    ///
    /// Assets, links, and the collection id become foreign members.
    pub fn to_feature(&self) -> Feature {
        let mut foreign_members = self.additional_fields.clone();
        let _ = foreign_members.remove("type");
        if let Ok(assets) = serde_json::to_value(&self.assets) {
            let _ = foreign_members.insert("assets".to_string(), assets);
        }
        if let Ok(links) = serde_json::to_value(&self.links) {
            let _ = foreign_members.insert("links".to_string(), links);
        }
        if let Some(collection) = &self.collection {
            let _ = foreign_members.insert(
                "collection".to_string(),
                Value::String(collection.clone()),
            );
        }
        Feature {
            bbox: Some(self.bbox.to_vec()),
            geometry: self.geometry.clone(),
            id: Some(Id::String(self.id.clone())),
            properties: Some(self.properties.clone()),
            foreign_members: Some(foreign_members),
        }
    }
}

impl Links for Item {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

impl Validate for Item {
    fn valid(self) -> Result<Item> {
        Ok(self)
    }
}
