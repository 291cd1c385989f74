use crate::{Error, Result};
use eo_maxar::map::Layout;
use std::str::FromStr;
use url::Url;

/// The default STAC API root.
pub const DEFAULT_STAC_API_URL: &str = "http://localhost:8081";

/// The default raster API root.
pub const DEFAULT_RASTER_API_URL: &str = "http://localhost:8082";

/// The default tilejson path, relative to a search or item.
pub const DEFAULT_TILEJSON_PATH: &str = "WebMercatorQuad/tilejson.json";

/// The page size requested on the first page of an item listing.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// The default lowest zoom requested from the raster API.
///
/// Sub-meter imagery isn't worth drawing further out than this.
pub const DEFAULT_MINZOOM: u8 = 12;

/// The default highest zoom requested from the raster API.
pub const DEFAULT_MAXZOOM: u8 = 22;

/// Client configuration.
///
/// Built once at startup and handed to [Client::new](crate::Client::new).
/// Every field has a default, and every field can be overridden from the
/// environment:
///
/// | Field | Variable |
/// |---|---|
/// | `stac_api_url` | `STAC_API_URL` |
/// | `raster_api_url` | `RASTER_API_URL` |
/// | `tilejson_path` | `TILEJSON_PATH` |
/// | `map_layout` | `MAP_LAYOUT` (a JSON object) |
/// | `page_limit` | `ITEMS_PAGE_LIMIT` |
/// | `minzoom`, `maxzoom` | `TILE_MINZOOM`, `TILE_MAXZOOM` |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The STAC API root, without a trailing slash.
    pub stac_api_url: String,

    /// The raster API root, without a trailing slash.
    pub raster_api_url: String,

    /// Appended to a search or item path to get its tilejson.
    pub tilejson_path: String,

    /// The layout maps get unless the caller overrides it.
    pub map_layout: Layout,

    /// The page size requested on the first page of an item listing.
    pub page_limit: u64,

    /// The default lowest zoom requested from the raster API.
    pub minzoom: u8,

    /// The default highest zoom requested from the raster API.
    pub maxzoom: u8,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Config> {
        Config::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads configuration from any variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar_api::Config;
    /// use std::collections::HashMap;
    ///
    /// let vars = HashMap::from([("STAC_API_URL", "https://stac.test/")]);
    /// let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.stac_api_url, "https://stac.test");
    /// assert_eq!(config.page_limit, 100);
    /// ```
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let mut config = Config::default();
        if let Some(value) = vars("STAC_API_URL") {
            config.stac_api_url = api_url("STAC_API_URL", &value)?;
        }
        if let Some(value) = vars("RASTER_API_URL") {
            config.raster_api_url = api_url("RASTER_API_URL", &value)?;
        }
        if let Some(value) = vars("TILEJSON_PATH") {
            config.tilejson_path = value.trim_matches('/').to_string();
        }
        if let Some(value) = vars("MAP_LAYOUT") {
            config.map_layout =
                serde_json::from_str(&value).map_err(|err| Error::InvalidConfig {
                    key: "MAP_LAYOUT",
                    value: value.clone(),
                    message: err.to_string(),
                })?;
        }
        if let Some(value) = vars("ITEMS_PAGE_LIMIT") {
            config.page_limit = parse("ITEMS_PAGE_LIMIT", &value)?;
        }
        if let Some(value) = vars("TILE_MINZOOM") {
            config.minzoom = parse("TILE_MINZOOM", &value)?;
        }
        if let Some(value) = vars("TILE_MAXZOOM") {
            config.maxzoom = parse("TILE_MAXZOOM", &value)?;
        }
        config.valid()
    }

    /// Sets the STAC API root.
    pub fn with_stac_api_url(mut self, url: &str) -> Result<Config> {
        self.stac_api_url = api_url("STAC_API_URL", url)?;
        Ok(self)
    }

    /// Sets the raster API root.
    pub fn with_raster_api_url(mut self, url: &str) -> Result<Config> {
        self.raster_api_url = api_url("RASTER_API_URL", url)?;
        Ok(self)
    }

    /// Sets the tilejson path.
    pub fn with_tilejson_path(mut self, path: &str) -> Config {
        self.tilejson_path = path.trim_matches('/').to_string();
        self
    }

    /// Returns an error if the zoom range is inverted or the page size is zero.
    pub fn valid(self) -> Result<Config> {
        if self.minzoom > self.maxzoom {
            Err(eo_maxar::Error::InvalidZoomRange {
                minzoom: self.minzoom,
                maxzoom: self.maxzoom,
            }
            .into())
        } else if self.page_limit == 0 {
            Err(Error::InvalidConfig {
                key: "ITEMS_PAGE_LIMIT",
                value: "0".to_string(),
                message: "page size must be positive".to_string(),
            })
        } else {
            Ok(self)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stac_api_url: DEFAULT_STAC_API_URL.to_string(),
            raster_api_url: DEFAULT_RASTER_API_URL.to_string(),
            tilejson_path: DEFAULT_TILEJSON_PATH.to_string(),
            map_layout: Layout::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
            minzoom: DEFAULT_MINZOOM,
            maxzoom: DEFAULT_MAXZOOM,
        }
    }
}

fn api_url(key: &'static str, value: &str) -> Result<String> {
    let url = Url::parse(value).map_err(|err| Error::InvalidConfig {
        key,
        value: value.to_string(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfig {
            key,
            value: value.to_string(),
            message: "not a base url".to_string(),
        });
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse<T>(key: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| Error::InvalidConfig {
        key,
        value: value.to_string(),
        message: err.to_string(),
    })
}
