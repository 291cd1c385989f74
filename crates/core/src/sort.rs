use serde::{Deserialize, Serialize};
use std::fmt;

/// The cloud-cover property Maxar tiles are sorted on.
pub const CLOUDS_PERCENT: &str = "tile:clouds_percent";

/// One field of a sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sortby {
    /// The property to sort on.
    pub field: String,

    /// The sort direction.
    pub direction: Direction,
}

/// A sort direction, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,

    /// Descending.
    Desc,
}

impl Sortby {
    /// Sorts ascending on a field.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{Direction, Sortby};
    ///
    /// let sortby = Sortby::asc("tile:clouds_percent");
    /// assert_eq!(sortby.direction, Direction::Asc);
    /// ```
    pub fn asc(field: impl ToString) -> Sortby {
        Sortby {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    /// Sorts descending on a field.
    pub fn desc(field: impl ToString) -> Sortby {
        Sortby {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }

    /// Least cloudy first, so the clearest scene renders on top.
    pub fn least_cloudy() -> Sortby {
        Sortby::asc(CLOUDS_PERCENT)
    }
}

impl fmt::Display for Sortby {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Asc => write!(f, "+{}", self.field),
            Direction::Desc => write!(f, "-{}", self.field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Sortby;
    use serde_json::json;

    #[test]
    fn serialize() {
        assert_eq!(
            serde_json::to_value(Sortby::least_cloudy()).unwrap(),
            json!({"field": "tile:clouds_percent", "direction": "asc"})
        );
        assert_eq!(
            serde_json::to_value(Sortby::desc("datetime")).unwrap(),
            json!({"field": "datetime", "direction": "desc"})
        );
    }

    #[test]
    fn display() {
        assert_eq!(Sortby::least_cloudy().to_string(), "+tile:clouds_percent");
        assert_eq!(Sortby::desc("datetime").to_string(), "-datetime");
    }
}
