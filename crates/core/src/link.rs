use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A relation-typed hyperlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The actual link in the format of an URL.
    pub href: String,

    /// Relationship between the current document and the linked document.
    pub rel: String,

    /// Media type of the referenced entity.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// A human readable title to be used in rendered displays of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional fields, e.g. `method` or `body` on POST pagination links.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// Anything with an ordered sequence of links.
pub trait Links {
    /// Returns a reference to this object's links.
    fn links(&self) -> &[Link];

    /// Returns the first link with the given rel type.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::{Link, Links};
    ///
    /// let links = vec![Link::new("http://stac.test/collections?page=2", "next")];
    /// assert!(links.link("next").is_some());
    /// assert!(links.link("prev").is_none());
    /// ```
    fn link(&self, rel: &str) -> Option<&Link> {
        self.links().iter().find(|link| link.rel == rel)
    }

    /// Returns the href of the `next` link, if there is one.
    fn next_href(&self) -> Option<&str> {
        self.link("next").map(|link| link.href.as_str())
    }
}

impl Link {
    /// Creates a new link.
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            title: None,
            additional_fields: Map::new(),
        }
    }
}

impl Links for Vec<Link> {
    fn links(&self) -> &[Link] {
        self
    }
}
