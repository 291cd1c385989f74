//! Data structures for exploring the [Maxar Open Data](https://www.maxar.com/open-data)
//! archive through a [STAC](https://stacspec.org) API and a companion raster API.
//!
//! This crate **is**:
//!
//! - The record shapes the servers return ([Collection], [Item], [TileJson],
//!   [MosaicRegisterResponse]), validated at the boundary
//! - The [CQL2-JSON](filter) payloads sent to register a [mosaic] search
//! - A [map] adapter that turns records into renderable map descriptions
//!
//! This crate **is not**:
//!
//! - A network client. See `eo-maxar-api` for that.
//!
//! # Examples
//!
//! ```
//! use eo_maxar::{FromJson, MosaicRegisterResponse};
//!
//! let response = MosaicRegisterResponse::from_json_slice(br#"{"id": "6b3e7a51"}"#).unwrap();
//! assert_eq!(response.id, "6b3e7a51");
//! ```

#![warn(missing_docs, unused_qualifications)]

mod bbox;
mod collection;
mod error;
pub mod filter;
mod item;
mod json;
mod link;
pub mod map;
pub mod mosaic;
mod sort;
mod tilejson;

pub use bbox::Bbox;
pub use collection::{Collection, Extent, SpatialExtent, TemporalExtent};
pub use error::{Error, ErrorKind};
pub use item::{Asset, Item};
pub use json::{FromJson, ToJson, Validate};
pub use link::{Link, Links};
pub use mosaic::{MosaicRegisterResponse, Period};
pub use sort::{CLOUDS_PERCENT, Direction, Sortby};
pub use tilejson::TileJson;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Return this crate's version.
///
/// # Examples
///
/// ```
/// println!("{}", eo_maxar::version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
