use thiserror::Error;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [chrono::ParseError]
    #[error(transparent)]
    ChronoParse(#[from] chrono::ParseError),

    /// [cql2::Error]
    #[error(transparent)]
    Cql2(#[from] cql2::Error),

    /// A mosaic registration response carried an empty search id.
    #[error("mosaic registration returned an empty search id")]
    EmptySearchId,

    /// This vector is not a valid bounding box.
    #[error("invalid bbox: {0:?}")]
    InvalidBbox(Vec<f64>),

    /// The event period is neither `pre` nor `post`.
    #[error("invalid period: {0} (expected \"pre\" or \"post\")")]
    InvalidPeriod(String),

    /// The zoom range is inverted.
    #[error("invalid zoom range: minzoom={minzoom} is greater than maxzoom={maxzoom}")]
    InvalidZoomRange {
        /// The requested minimum zoom.
        minzoom: u8,

        /// The requested maximum zoom.
        maxzoom: u8,
    },

    /// Returned when there is not a required field on an object.
    #[error("no \"{0}\" field in the JSON object")]
    MissingField(&'static str),

    /// There are no items, when items are required.
    #[error("no items")]
    NoItems,

    /// A collection's extent has no spatial bounding boxes.
    #[error("collection {0} has no spatial extent")]
    NoSpatialExtent(String),

    /// A tile endpoint has no tile url templates.
    #[error("tilejson has no tile urls")]
    NoTiles,

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Where an error sits in the client's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A non-success HTTP status.
    Remote,

    /// A response body that doesn't match the expected shape.
    Validation,

    /// A bad parameter from the caller, raised before any network call.
    Usage,

    /// A connection-level failure (refused, reset, dns).
    Transport,

    /// Unusable configuration.
    Config,
}

impl Error {
    /// Returns this error's place in the taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{Error, ErrorKind};
    ///
    /// let error = Error::InvalidPeriod("during".to_string());
    /// assert_eq!(error.kind(), ErrorKind::Usage);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Cql2(_)
            | Error::InvalidBbox(_)
            | Error::InvalidPeriod(_)
            | Error::InvalidZoomRange { .. }
            | Error::NoItems => ErrorKind::Usage,
            Error::ChronoParse(_)
            | Error::EmptySearchId
            | Error::MissingField(_)
            | Error::NoSpatialExtent(_)
            | Error::NoTiles
            | Error::SerdeJson(_) => ErrorKind::Validation,
        }
    }
}
