//! A blocking client for the Maxar Open Data STAC API and the raster API
//! that serves mosaics of it.
//!
//! - [Client] pages through collection and item listings, registers mosaic
//!   searches, and resolves them into tile endpoints.
//! - [MaxarCollection] wraps one collection, memoizes its metadata and items,
//!   and composes client calls into maps.
//! - [Config] carries the API roots and defaults, read from the environment.
//!
//! Nothing is retried and nothing runs concurrently. Errors surface from the
//! call that caused them.

#![warn(missing_docs, unused_qualifications)]

mod client;
mod collection;
mod config;
mod error;
mod page;
mod transport;

pub use client::{Client, DEFAULT_ASSET, TileRequest};
pub use collection::MaxarCollection;
pub use config::{
    Config, DEFAULT_MAXZOOM, DEFAULT_MINZOOM, DEFAULT_PAGE_LIMIT, DEFAULT_RASTER_API_URL,
    DEFAULT_STAC_API_URL, DEFAULT_TILEJSON_PATH,
};
pub use error::Error;
pub use transport::{Transport, user_agent};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
