// The verbosity stuff is cribbed from https://github.com/clap-rs/clap-verbosity-flag/blob/c621a6a8a7c0b6df8f1464a985a5d076b4915693/src/lib.rs and updated for tracing

#![deny(unused_crate_dependencies)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use eo_maxar::{
    Bbox, Period, ToJson,
    map::{MapOptions, MapVisualizer},
};
use eo_maxar_api::{Client, Config, DEFAULT_ASSET, MaxarCollection};
use serde::Serialize;
use std::io::Write;
use tracing::metadata::Level;
use tracing_subscriber::{
    Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[cfg(test)]
use {assert_cmd as _, mockito as _, rstest as _};

/// eo-maxar: browse Maxar Open Data collections and build mosaic maps from them
#[derive(Debug, Parser)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// The STAC API root.
    ///
    /// Overrides `STAC_API_URL`.
    #[arg(long = "stac-api-url", global = true)]
    stac_api_url: Option<String>,

    /// The raster API root.
    ///
    /// Overrides `RASTER_API_URL`.
    #[arg(long = "raster-api-url", global = true)]
    raster_api_url: Option<String>,

    /// The tilejson path appended to searches and items, e.g. `WebMercatorQuad/tilejson.json`.
    ///
    /// Overrides `TILEJSON_PATH`.
    #[arg(long = "tilejson-path", global = true)]
    tilejson_path: Option<String>,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = ErrorLevel::verbose_help(),
        long_help = ErrorLevel::verbose_long_help(),
    )]
    verbose: u8,

    #[arg(
        long,
        short = 'q',
        action = clap::ArgAction::Count,
        global = true,
        help = ErrorLevel::quiet_help(),
        long_help = ErrorLevel::quiet_long_help(),
        conflicts_with = "verbose",
    )]
    quiet: u8,
}

/// An eo-maxar subcommand.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists the id of every collection.
    Collections,

    /// Prints one collection.
    Collection {
        /// The collection id.
        collection_id: String,
    },

    /// Prints every item in a collection.
    Items {
        /// The collection id.
        collection_id: String,

        /// The page size requested from the server.
        ///
        /// Defaults to `ITEMS_PAGE_LIMIT`, or 100.
        #[arg(short = 'n', long = "limit")]
        limit: Option<u64>,
    },

    /// Registers a pre-event or post-event mosaic and prints its tilejson.
    Mosaic {
        /// The collection id.
        collection_id: String,

        /// The mosaic bounds, as `xmin,ymin,xmax,ymax`.
        #[arg(long, allow_hyphen_values = true)]
        bbox: Bbox,

        /// The event date, as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
        #[arg(long = "event-date", value_parser = parse_event_date)]
        event_date: DateTime<Utc>,

        /// Which side of the event to mosaic: `pre` or `post`.
        #[arg(long)]
        period: Period,

        /// The asset to render.
        #[arg(long, default_value = DEFAULT_ASSET)]
        asset: String,

        /// The lowest zoom to request.
        #[arg(long)]
        minzoom: Option<u8>,

        /// The highest zoom to request.
        #[arg(long)]
        maxzoom: Option<u8>,

        /// Print a map description instead of the tilejson.
        #[arg(long, default_value_t = false)]
        map: bool,
    },

    /// Prints a split map comparing the pre-event and post-event mosaics.
    Split {
        /// The collection id.
        collection_id: String,

        /// The mosaic bounds, as `xmin,ymin,xmax,ymax`.
        #[arg(long, allow_hyphen_values = true)]
        bbox: Bbox,

        /// The event date, as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
        #[arg(long = "event-date", value_parser = parse_event_date)]
        event_date: DateTime<Utc>,
    },

    /// Prints the tilejson of a single item, without registering a search.
    ItemTiles {
        /// The collection id.
        collection_id: String,

        /// The item id.
        item_id: String,

        /// The asset to render.
        #[arg(long, default_value = DEFAULT_ASSET)]
        asset: String,

        /// Print a map description instead of the tilejson.
        #[arg(long, default_value_t = false)]
        map: bool,
    },

    /// Prints a map of a collection's footprints.
    Footprints {
        /// The collection id.
        collection_id: String,
    },

    /// Prints a map of item footprints colored by which side of the event they fall on.
    PrePost {
        /// The collection id.
        collection_id: String,

        /// The event date, as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
        #[arg(long = "event-date", value_parser = parse_event_date)]
        event_date: DateTime<Utc>,
    },
}

#[derive(Copy, Clone, Debug, Default)]
struct ErrorLevel;

impl Cli {
    /// Runs this command.
    ///
    /// If `init_tracing_subscriber` is `false`, it is expected that the caller
    /// is setting up the appropriate logging.
    pub fn run(self, init_tracing_subscriber: bool) -> Result<()> {
        if init_tracing_subscriber {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_filter(LevelFilter::from(self.log_level())),
                )
                .init();
        }
        let client = Client::new(self.config()?)?;
        let result = self.execute(&client);
        client.close();
        let value = result?;
        let mut stdout = std::io::stdout().lock();
        value.to_json_writer(&mut stdout, true)?;
        writeln!(stdout)?;
        Ok(())
    }

    /// Returns the configuration from the environment, with command-line overrides applied.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(url) = &self.stac_api_url {
            config = config.with_stac_api_url(url)?;
        }
        if let Some(url) = &self.raster_api_url {
            config = config.with_raster_api_url(url)?;
        }
        if let Some(path) = &self.tilejson_path {
            config = config.with_tilejson_path(path);
        }
        tracing::debug!("{config:?}");
        Ok(config)
    }

    fn execute(&self, client: &Client) -> Result<serde_json::Value> {
        let options = MapOptions::default();
        match &self.command {
            Command::Collections => to_value(client.collection_ids()?),
            Command::Collection { collection_id } => to_value(client.collection(collection_id)?),
            Command::Items {
                collection_id,
                limit,
            } => {
                let limit = limit.unwrap_or(client.config().page_limit);
                to_value(client.items_with_limit(collection_id, limit)?)
            }
            Command::Mosaic {
                collection_id,
                bbox,
                event_date,
                period,
                asset,
                minzoom,
                maxzoom,
                map,
            } => {
                let request = client.tile_request(asset);
                let (default_minzoom, default_maxzoom) = (request.minzoom, request.maxzoom);
                let request = request.with_zoom(
                    minzoom.unwrap_or(default_minzoom),
                    maxzoom.unwrap_or(default_maxzoom),
                )?;
                let tilejson = MaxarCollection::new(collection_id, client).mosaic_tilejson_with(
                    *bbox,
                    *event_date,
                    *period,
                    &request,
                )?;
                if *map {
                    to_value(visualizer(client).tile_map(&tilejson, &options)?)
                } else {
                    to_value(tilejson)
                }
            }
            Command::Split {
                collection_id,
                bbox,
                event_date,
            } => to_value(
                MaxarCollection::new(collection_id, client).mosaic_split_map(
                    *bbox,
                    *event_date,
                    &options,
                )?,
            ),
            Command::ItemTiles {
                collection_id,
                item_id,
                asset,
                map,
            } => {
                if *map {
                    to_value(
                        MaxarCollection::new(collection_id, client)
                            .single_cog_map(item_id, asset, &options)?,
                    )
                } else {
                    to_value(client.item_tilejson(
                        collection_id,
                        item_id,
                        &client.tile_request(asset),
                    )?)
                }
            }
            Command::Footprints { collection_id } => {
                to_value(MaxarCollection::new(collection_id, client).collection_bbox_map(&options)?)
            }
            Command::PrePost {
                collection_id,
                event_date,
            } => to_value(
                MaxarCollection::new(collection_id, client).pre_post_map(*event_date, &options)?,
            ),
        }
    }

    /// Returns the tracing level set by `-v` and `-q`, or `None` if logging is off.
    pub fn log_level(&self) -> Option<Level> {
        level_enum(self.verbosity())
    }

    fn verbosity(&self) -> i8 {
        level_value(ErrorLevel::default()) - (self.quiet as i8) + (self.verbose as i8)
    }
}

impl ErrorLevel {
    fn default() -> Option<Level> {
        Some(Level::ERROR)
    }

    fn verbose_help() -> Option<&'static str> {
        Some("Increase verbosity")
    }

    fn verbose_long_help() -> Option<&'static str> {
        None
    }

    fn quiet_help() -> Option<&'static str> {
        Some("Decrease verbosity")
    }

    fn quiet_long_help() -> Option<&'static str> {
        None
    }
}

fn visualizer(client: &Client) -> MapVisualizer {
    MapVisualizer::new(client.config().map_layout.clone())
}

fn to_value(value: impl Serialize) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(Into::into)
}

fn parse_event_date(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(datetime) => Ok(datetime.with_timezone(&Utc)),
        Err(err) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .map_err(|_| err),
    }
}

fn level_enum(verbosity: i8) -> Option<Level> {
    match verbosity {
        i8::MIN..=-1 => None,
        0 => Some(Level::ERROR),
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        4..=i8::MAX => Some(Level::TRACE),
    }
}

fn level_value(level: Option<Level>) -> i8 {
    match level {
        None => -1,
        Some(Level::ERROR) => 0,
        Some(Level::WARN) => 1,
        Some(Level::INFO) => 2,
        Some(Level::DEBUG) => 3,
        Some(Level::TRACE) => 4,
    }
}
