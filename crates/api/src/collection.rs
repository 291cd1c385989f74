use crate::{Client, Result, TileRequest};
use chrono::{DateTime, Utc};
use eo_maxar::{
    Bbox, Collection, Item, Period, TileJson,
    map::{Map, MapOptions, MapVisualizer},
};
use std::cell::OnceCell;

/// One collection, with its metadata and items fetched on first use.
///
/// Metadata and items are fetched at most once per instance and never
/// invalidated. Mosaics are never cached: every mosaic call registers a fresh
/// search.
///
/// # Examples
///
/// ```no_run
/// use chrono::{TimeZone, Utc};
/// use eo_maxar::{Bbox, map::MapOptions};
/// use eo_maxar_api::{Client, Config, MaxarCollection};
///
/// let client = Client::new(Config::default()).unwrap();
/// let collection = MaxarCollection::new("Kahramanmaras-turkey-earthquake-23", &client);
/// let map = collection
///     .mosaic_split_map(
///         Bbox::new(36.0, 36.9, 37.5, 37.8),
///         Utc.with_ymd_and_hms(2023, 2, 6, 0, 0, 0).unwrap(),
///         &MapOptions::default(),
///     )
///     .unwrap();
/// client.close();
/// ```
#[derive(Debug)]
pub struct MaxarCollection<'a> {
    collection_id: String,
    client: &'a Client,
    visualizer: MapVisualizer,
    info: OnceCell<Collection>,
    items: OnceCell<Vec<Item>>,
}

impl<'a> MaxarCollection<'a> {
    /// Creates a facade over one collection.
    ///
    /// Maps default to the client's configured layout.
    pub fn new(collection_id: impl ToString, client: &'a Client) -> MaxarCollection<'a> {
        MaxarCollection {
            collection_id: collection_id.to_string(),
            client,
            visualizer: MapVisualizer::new(client.config().map_layout.clone()),
            info: OnceCell::new(),
            items: OnceCell::new(),
        }
    }

    /// Replaces the map visualizer.
    pub fn with_visualizer(mut self, visualizer: MapVisualizer) -> MaxarCollection<'a> {
        self.visualizer = visualizer;
        self
    }

    /// Returns the collection id.
    pub fn id(&self) -> &str {
        &self.collection_id
    }

    /// Returns the collection's metadata, fetching it on first use.
    pub fn info(&self) -> Result<&Collection> {
        if let Some(info) = self.info.get() {
            return Ok(info);
        }
        let info = self.client.collection(&self.collection_id)?;
        Ok(self.info.get_or_init(|| info))
    }

    /// Returns every item in the collection, fetching them on first use.
    pub fn items(&self) -> Result<&[Item]> {
        if let Some(items) = self.items.get() {
            return Ok(items);
        }
        let items = self.client.items(&self.collection_id)?;
        Ok(self.items.get_or_init(|| items))
    }

    /// Registers a mosaic for one side of the event and resolves its tiles,
    /// using the default asset and zoom range.
    pub fn mosaic_tilejson(
        &self,
        bbox: Bbox,
        event_date: DateTime<Utc>,
        period: Period,
    ) -> Result<TileJson> {
        let request = self.client.tile_request(crate::DEFAULT_ASSET);
        self.mosaic_tilejson_with(bbox, event_date, period, &request)
    }

    /// Registers a mosaic for one side of the event and resolves its tiles.
    pub fn mosaic_tilejson_with(
        &self,
        bbox: Bbox,
        event_date: DateTime<Utc>,
        period: Period,
        request: &TileRequest,
    ) -> Result<TileJson> {
        let search_id = self.client.register_mosaic(
            &self.collection_id,
            bbox,
            period.filter(event_date),
            period.name(),
        )?;
        self.client.search_tilejson(&search_id, request)
    }

    /// A map of the collection's footprints.
    pub fn collection_bbox_map(&self, options: &MapOptions) -> Result<Map> {
        let map = self
            .visualizer
            .collection_footprints_map(self.info()?, options)?;
        Ok(map)
    }

    /// A map of item footprints colored by which side of the event they fall on.
    pub fn pre_post_map(&self, event_date: DateTime<Utc>, options: &MapOptions) -> Result<Map> {
        let map = self
            .visualizer
            .pre_post_event_map(self.items()?, event_date, options)?;
        Ok(map)
    }

    /// A map of one item's asset.
    pub fn single_cog_map(&self, item_id: &str, asset: &str, options: &MapOptions) -> Result<Map> {
        let tilejson =
            self.client
                .item_tilejson(&self.collection_id, item_id, &self.client.tile_request(asset))?;
        Ok(self.visualizer.tile_map(&tilejson, options)?)
    }

    /// A map of the pre-event mosaic.
    pub fn pre_event_mosaic_map(
        &self,
        bbox: Bbox,
        event_date: DateTime<Utc>,
        options: &MapOptions,
    ) -> Result<Map> {
        let tilejson = self.mosaic_tilejson(bbox, event_date, Period::Pre)?;
        Ok(self.visualizer.tile_map(&tilejson, options)?)
    }

    /// A map of the post-event mosaic.
    pub fn post_event_mosaic_map(
        &self,
        bbox: Bbox,
        event_date: DateTime<Utc>,
        options: &MapOptions,
    ) -> Result<Map> {
        let tilejson = self.mosaic_tilejson(bbox, event_date, Period::Post)?;
        Ok(self.visualizer.tile_map(&tilejson, options)?)
    }

    /// A split map comparing the pre-event and post-event mosaics.
    ///
    /// If either mosaic fails, no map is returned.
    pub fn mosaic_split_map(
        &self,
        bbox: Bbox,
        event_date: DateTime<Utc>,
        options: &MapOptions,
    ) -> Result<Map> {
        let pre = self.mosaic_tilejson(bbox, event_date, Period::Pre)?;
        let post = self.mosaic_tilejson(bbox, event_date, Period::Post)?;
        Ok(self.visualizer.split_map(&pre, &post, options)?)
    }
}
