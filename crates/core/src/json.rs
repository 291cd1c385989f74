use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::io::Write;

/// Checks the invariants that serde's shape checks can't express.
pub trait Validate: Sized {
    /// Returns the value unchanged if it is valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{MosaicRegisterResponse, Validate};
    ///
    /// let response = MosaicRegisterResponse::new("a-search-id");
    /// let response = response.valid().unwrap();
    /// MosaicRegisterResponse::new("").valid().unwrap_err();
    /// ```
    fn valid(self) -> Result<Self>;
}

/// Create a validated record from JSON.
pub trait FromJson: DeserializeOwned + Validate {
    /// Creates a record from JSON bytes, then validates it.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{FromJson, TileJson};
    ///
    /// let tilejson = TileJson::from_json_slice(br#"{
    ///     "tiles": ["http://raster.test/tiles/{z}/{x}/{y}"],
    ///     "minzoom": 12,
    ///     "maxzoom": 22,
    ///     "bounds": [-180.0, -90.0, 180.0, 90.0]
    /// }"#).unwrap();
    /// assert_eq!(tilejson.minzoom, 12);
    /// ```
    fn from_json_slice(slice: &[u8]) -> Result<Self> {
        serde_json::from_slice::<Self>(slice)
            .map_err(Error::from)?
            .valid()
    }

    /// Creates a record from a JSON value, then validates it.
    fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value::<Self>(value)
            .map_err(Error::from)?
            .valid()
    }
}

/// Writes a record to JSON bytes.
pub trait ToJson: Serialize {
    /// Writes a value as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{ToJson, MosaicRegisterResponse};
    ///
    /// let mut buf = Vec::new();
    /// MosaicRegisterResponse::new("an-id").to_json_writer(&mut buf, true).unwrap();
    /// ```
    fn to_json_writer(&self, writer: impl Write, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self).map_err(Error::from)
        } else {
            serde_json::to_writer(writer, self).map_err(Error::from)
        }
    }

    /// Writes a value as JSON bytes.
    fn to_json_vec(&self, pretty: bool) -> Result<Vec<u8>> {
        if pretty {
            serde_json::to_vec_pretty(self).map_err(Error::from)
        } else {
            serde_json::to_vec(self).map_err(Error::from)
        }
    }
}

impl<T: DeserializeOwned + Validate> FromJson for T {}
impl<T: Serialize> ToJson for T {}

impl<T: Validate> Validate for Vec<T> {
    fn valid(self) -> Result<Self> {
        self.into_iter().map(Validate::valid).collect()
    }
}
