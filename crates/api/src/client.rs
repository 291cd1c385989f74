use crate::{
    Config, Error, Result, Transport,
    page::{CollectionsPage, ItemsPage, Page},
};
use eo_maxar::{
    Bbox, Collection, Item, MosaicRegisterResponse, TileJson, filter::Expr, mosaic::RegisterSearch,
};
use std::collections::HashSet;
use url::Url;

/// The asset rendered when the caller doesn't name one.
pub const DEFAULT_ASSET: &str = "visual";

/// A client for the STAC API and the raster API behind it.
///
/// All calls block, and run strictly one after another.
///
/// # Examples
///
/// ```no_run
/// use eo_maxar_api::{Client, Config};
///
/// let client = Client::new(Config::from_env().unwrap()).unwrap();
/// let collection_ids = client.collection_ids().unwrap();
/// client.close();
/// ```
#[derive(Debug)]
pub struct Client {
    transport: Transport,
    config: Config,
}

/// What to render from a search or item, and at which zooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    /// The asset name, e.g. `visual`.
    pub asset: String,

    /// The lowest zoom to request.
    pub minzoom: u8,

    /// The highest zoom to request.
    pub maxzoom: u8,
}

impl Client {
    /// Creates a new client with its own connection pool.
    pub fn new(config: Config) -> Result<Client> {
        Ok(Client {
            transport: Transport::new()?,
            config,
        })
    }

    /// Returns this client's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the ids of every collection, following `next` links until
    /// there are none.
    pub fn collection_ids(&self) -> Result<Vec<String>> {
        let url = self.stac_url(&["collections"])?;
        self.paginate::<CollectionsPage>(url, &[])
    }

    /// Fetches one collection.
    pub fn collection(&self, collection_id: &str) -> Result<Collection> {
        let url = self.stac_url(&["collections", collection_id])?;
        self.transport.get(url.as_str(), &[])
    }

    /// Fetches every item in a collection, requesting the configured page size.
    pub fn items(&self, collection_id: &str) -> Result<Vec<Item>> {
        self.items_with_limit(collection_id, self.config.page_limit)
    }

    /// Fetches every item in a collection.
    ///
    /// `limit` is only sent with the first request. The `next` links the
    /// server hands back already carry it and are followed verbatim.
    pub fn items_with_limit(&self, collection_id: &str, limit: u64) -> Result<Vec<Item>> {
        let url = self.stac_url(&["collections", collection_id, "items"])?;
        let items = self.paginate::<ItemsPage>(url, &[("limit", limit.to_string())])?;
        tracing::info!("fetched {} item(s) from {collection_id}", items.len());
        Ok(items)
    }

    /// Registers a mosaic search over one collection and returns its id.
    ///
    /// `filter` is and-ed with a filter on the collection id, and results are
    /// sorted least cloudy first.
    pub fn register_mosaic(
        &self,
        collection_id: &str,
        bbox: Bbox,
        filter: Expr,
        name: &str,
    ) -> Result<String> {
        let url = self.raster_url(&["searches", "register"], "")?;
        let body = RegisterSearch::new(collection_id, bbox, filter, name);
        if tracing::enabled!(tracing::Level::DEBUG) {
            match body.filter.to_text() {
                Ok(text) => tracing::debug!("registering {name}: {text}"),
                Err(err) => tracing::debug!("registering {name} (filter not renderable: {err})"),
            }
        }
        let response: MosaicRegisterResponse = self.transport.post(url.as_str(), &body)?;
        tracing::info!("registered mosaic search {} ({name})", response.id);
        Ok(response.id)
    }

    /// Resolves a registered search into a tile endpoint.
    pub fn search_tilejson(&self, search_id: &str, request: &TileRequest) -> Result<TileJson> {
        let url = self.raster_url(&["searches", search_id], &self.config.tilejson_path)?;
        self.transport.get(url.as_str(), &request.query())
    }

    /// Resolves a single item into a tile endpoint, without registering a search.
    pub fn item_tilejson(
        &self,
        collection_id: &str,
        item_id: &str,
        request: &TileRequest,
    ) -> Result<TileJson> {
        let url = self.raster_url(
            &["collections", collection_id, "items", item_id],
            &self.config.tilejson_path,
        )?;
        self.transport.get(url.as_str(), &request.query())
    }

    /// Returns a tile request for `asset` at the configured zoom range.
    pub fn tile_request(&self, asset: &str) -> TileRequest {
        TileRequest {
            asset: asset.to_string(),
            minzoom: self.config.minzoom,
            maxzoom: self.config.maxzoom,
        }
    }

    /// Releases the connection pool.
    pub fn close(self) {
        self.transport.close();
    }

    /// Walks a listing until a page has no `next` link.
    ///
    /// A `next` link back to a page already visited ends the walk.
    fn paginate<P: Page>(&self, url: Url, query: &[(&str, String)]) -> Result<Vec<P::Entry>> {
        let mut entries = Vec::new();
        let mut page: P = self.transport.get(url.as_str(), query)?;
        let mut first = url;
        if !query.is_empty() {
            let _ = first.query_pairs_mut().extend_pairs(query);
        }
        let mut visited = HashSet::from([first.to_string()]);
        loop {
            let next = page.next_href().map(String::from);
            entries.extend(page.into_entries());
            match next {
                Some(href) => {
                    let key = Url::parse(&href)
                        .map(String::from)
                        .unwrap_or_else(|_| href.clone());
                    if !visited.insert(key) {
                        tracing::warn!("next link {href} was already visited, stopping");
                        break;
                    }
                    tracing::debug!("following next link: {href}");
                    page = self.transport.get(&href, &[])?;
                }
                None => break,
            }
        }
        Ok(entries)
    }

    fn stac_url(&self, segments: &[&str]) -> Result<Url> {
        endpoint("STAC_API_URL", &self.config.stac_api_url, segments, "")
    }

    fn raster_url(&self, segments: &[&str], tail: &str) -> Result<Url> {
        endpoint("RASTER_API_URL", &self.config.raster_api_url, segments, tail)
    }
}

/// Appends `segments` to `root`, percent-encoding each one, then the
/// already-separated `tail` path.
fn endpoint(key: &'static str, root: &str, segments: &[&str], tail: &str) -> Result<Url> {
    let invalid = |message: String| Error::InvalidConfig {
        key,
        value: root.to_string(),
        message,
    };
    let mut url = Url::parse(root).map_err(|err| invalid(err.to_string()))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| invalid("not a base url".to_string()))?;
        let _ = path
            .pop_if_empty()
            .extend(segments)
            .extend(tail.split('/').filter(|segment| !segment.is_empty()));
    }
    Ok(url)
}

impl TileRequest {
    /// Creates a tile request.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar_api::TileRequest;
    ///
    /// let request = TileRequest::new("visual", 14, 20).unwrap();
    /// TileRequest::new("visual", 20, 14).unwrap_err();
    /// ```
    pub fn new(asset: impl ToString, minzoom: u8, maxzoom: u8) -> Result<TileRequest> {
        TileRequest {
            asset: asset.to_string(),
            minzoom,
            maxzoom,
        }
        .valid()
    }

    /// Overrides the zoom range.
    pub fn with_zoom(mut self, minzoom: u8, maxzoom: u8) -> Result<TileRequest> {
        self.minzoom = minzoom;
        self.maxzoom = maxzoom;
        self.valid()
    }

    /// Returns an error if the zoom range is inverted.
    pub fn valid(self) -> Result<TileRequest> {
        if self.minzoom > self.maxzoom {
            Err(eo_maxar::Error::InvalidZoomRange {
                minzoom: self.minzoom,
                maxzoom: self.maxzoom,
            }
            .into())
        } else {
            Ok(self)
        }
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("assets", self.asset.clone()),
            ("minzoom", self.minzoom.to_string()),
            ("maxzoom", self.maxzoom.to_string()),
        ]
    }
}

impl Default for TileRequest {
    fn default() -> Self {
        TileRequest {
            asset: DEFAULT_ASSET.to_string(),
            minzoom: crate::config::DEFAULT_MINZOOM,
            maxzoom: crate::config::DEFAULT_MAXZOOM,
        }
    }
}
