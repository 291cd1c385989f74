//! Mosaic searches: server-side saved queries over a raster collection.

use crate::{Bbox, Error, Link, Result, Sortby, Validate, filter::Expr};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// The only filter language the registration endpoint is sent.
pub const CQL2_JSON: &str = "cql2-json";

/// The body POSTed to `searches/register`.
///
/// # Examples
///
/// ```
/// use eo_maxar::{Bbox, mosaic::RegisterSearch, filter::Expr};
///
/// let register = RegisterSearch::new(
///     "Kahramanmaras-turkey-earthquake-23",
///     Bbox::new(36.0, 36.9, 37.5, 37.8),
///     Expr::lt(Expr::property("datetime"), "2023-02-06T00:00:00Z"),
///     "Pre-event",
/// );
/// assert_eq!(register.filter_lang, "cql2-json");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterSearch {
    /// Always `cql2-json`.
    #[serde(rename = "filter-lang")]
    pub filter_lang: String,

    /// The filter, always `and(in(collection, [id]), <caller filter>)`.
    pub filter: Expr,

    /// The sort directive deciding which scene renders on top.
    pub sortby: Vec<Sortby>,

    /// Metadata stored with the search.
    pub metadata: SearchMetadata,
}

/// Metadata stored alongside a registered search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// A display name, e.g. `Pre-event`.
    pub name: String,

    /// The area of interest.
    pub bounds: Bbox,
}

/// The response to a mosaic registration.
///
/// The `id` is an opaque capability token; it is redeemed against the tile
/// resolution endpoint and nothing else about the search is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicRegisterResponse {
    /// The search id.
    pub id: String,

    /// Links to the search's tile endpoints.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// Which side of an event a mosaic covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Strictly before the event.
    Pre,

    /// At or after the event. The event instant itself is post-event.
    Post,
}

impl RegisterSearch {
    /// Scopes `filter` to one collection and sorts least cloudy first.
    pub fn new(
        collection_id: impl ToString,
        bbox: Bbox,
        filter: Expr,
        name: impl ToString,
    ) -> RegisterSearch {
        RegisterSearch {
            filter_lang: CQL2_JSON.to_string(),
            filter: Expr::and(
                Expr::in_list("collection", [collection_id.to_string()]),
                filter,
            ),
            sortby: vec![Sortby::least_cloudy()],
            metadata: SearchMetadata {
                name: name.to_string(),
                bounds: bbox,
            },
        }
    }
}

impl MosaicRegisterResponse {
    /// Creates a response with just an id.
    pub fn new(id: impl ToString) -> MosaicRegisterResponse {
        MosaicRegisterResponse {
            id: id.to_string(),
            links: Vec::new(),
            additional_fields: Map::new(),
        }
    }
}

impl Validate for MosaicRegisterResponse {
    fn valid(self) -> Result<MosaicRegisterResponse> {
        if self.id.is_empty() {
            Err(Error::EmptySearchId)
        } else {
            Ok(self)
        }
    }
}

impl Period {
    /// The CQL2 comparison used against the event date.
    pub fn op(&self) -> &'static str {
        match self {
            Period::Pre => "lt",
            Period::Post => "ge",
        }
    }

    /// The display name stored with the registered search.
    pub fn name(&self) -> &'static str {
        match self {
            Period::Pre => "Pre-event",
            Period::Post => "Post-event",
        }
    }

    /// Returns the datetime filter for this side of the event.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use eo_maxar::mosaic::Period;
    /// use serde_json::json;
    ///
    /// let event_date = Utc.with_ymd_and_hms(2023, 2, 6, 0, 0, 0).unwrap();
    /// assert_eq!(
    ///     serde_json::to_value(Period::Post.filter(event_date)).unwrap(),
    ///     json!({"op": "ge", "args": [{"property": "datetime"}, "2023-02-06T00:00:00Z"]})
    /// );
    /// ```
    pub fn filter(&self, event_date: DateTime<Utc>) -> Expr {
        Expr::op(
            self.op(),
            [
                Expr::property("datetime"),
                Expr::literal(event_date.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            ],
        )
    }

    /// Returns the side of the event `datetime` falls on.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use eo_maxar::mosaic::Period;
    ///
    /// let event_date = Utc.with_ymd_and_hms(2023, 2, 6, 0, 0, 0).unwrap();
    /// assert_eq!(Period::classify(event_date, event_date), Period::Post);
    /// ```
    pub fn classify(datetime: DateTime<Utc>, event_date: DateTime<Utc>) -> Period {
        if datetime < event_date {
            Period::Pre
        } else {
            Period::Post
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Period> {
        match s {
            "pre" => Ok(Period::Pre),
            "post" => Ok(Period::Post),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Pre => f.write_str("pre"),
            Period::Post => f.write_str("post"),
        }
    }
}
