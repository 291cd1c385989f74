use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A two-dimensional bounding box: `[min_x, min_y, max_x, max_y]`.
///
/// Longitudes are `x`, latitudes are `y`. Anything other than exactly four
/// numbers is rejected when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bbox([f64; 4]);

impl Bbox {
    /// Creates a new bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::Bbox;
    ///
    /// let bbox = Bbox::new(36.0, 36.9, 37.5, 37.8);
    /// assert_eq!(bbox.min_x(), 36.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Bbox {
        Bbox([min_x, min_y, max_x, max_y])
    }

    /// The western edge.
    pub fn min_x(&self) -> f64 {
        self.0[0]
    }

    /// The southern edge.
    pub fn min_y(&self) -> f64 {
        self.0[1]
    }

    /// The eastern edge.
    pub fn max_x(&self) -> f64 {
        self.0[2]
    }

    /// The northern edge.
    pub fn max_y(&self) -> f64 {
        self.0[3]
    }

    /// Returns the center as `[lat, lon]`, the order map widgets expect.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::Bbox;
    ///
    /// let bbox = Bbox::new(10.0, 20.0, 12.0, 24.0);
    /// assert_eq!(bbox.center(), [22.0, 11.0]);
    /// ```
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_y() + self.max_y()) / 2.0,
            (self.min_x() + self.max_x()) / 2.0,
        ]
    }

    /// Returns `[[min_y, min_x], [max_y, max_x]]`, the south-west and
    /// north-east corners in lat/lon order.
    pub fn lat_lon_bounds(&self) -> [[f64; 2]; 2] {
        [
            [self.min_y(), self.min_x()],
            [self.max_y(), self.max_x()],
        ]
    }

    /// Returns this box as a closed polygon.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::Bbox;
    ///
    /// let polygon = Bbox::new(0.0, 0.0, 1.0, 1.0).to_polygon();
    /// if let geojson::Value::Polygon(rings) = polygon.value {
    ///     assert_eq!(rings[0].len(), 5);
    ///     assert_eq!(rings[0][0], rings[0][4]);
    /// }
    /// ```
    pub fn to_polygon(&self) -> geojson::Geometry {
        let (x0, y0, x1, y1) = (self.min_x(), self.min_y(), self.max_x(), self.max_y());
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![x0, y0],
            vec![x1, y0],
            vec![x1, y1],
            vec![x0, y1],
            vec![x0, y0],
        ]]))
    }

    /// Returns the four numbers as a vector.
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl From<[f64; 4]> for Bbox {
    fn from(value: [f64; 4]) -> Self {
        Bbox(value)
    }
}

impl TryFrom<Vec<f64>> for Bbox {
    type Error = Error;

    fn try_from(value: Vec<f64>) -> Result<Bbox> {
        <[f64; 4]>::try_from(value)
            .map(Bbox)
            .map_err(Error::InvalidBbox)
    }
}

impl FromStr for Bbox {
    type Err = Error;

    /// Parses `min_x,min_y,max_x,max_y`.
    fn from_str(s: &str) -> Result<Bbox> {
        let mut values = Vec::with_capacity(4);
        for part in s.split(',') {
            let value = part
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidBbox(values.clone()))?;
            values.push(value);
        }
        Bbox::try_from(values)
    }
}

impl fmt::Display for Bbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x(),
            self.min_y(),
            self.max_x(),
            self.max_y()
        )
    }
}
