use eo_maxar::{Item, Link, Links, Result, Validate};
use serde::Deserialize;

/// One page of a cursor-paginated listing.
///
/// The cursor is the `next` link; a page without one is the last.
pub(crate) trait Page: Links + Validate + serde::de::DeserializeOwned {
    /// What each page contributes to the listing.
    type Entry;

    /// Consumes the page, returning its entries in server order.
    fn into_entries(self) -> Vec<Self::Entry>;
}

/// A page of `GET /collections`.
#[derive(Debug, Deserialize)]
pub(crate) struct CollectionsPage {
    #[serde(default)]
    collections: Vec<CollectionId>,

    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct CollectionId {
    id: String,
}

/// A page of `GET /collections/{id}/items`.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemsPage {
    features: Vec<Item>,

    #[serde(default)]
    links: Vec<Link>,
}

impl Page for CollectionsPage {
    type Entry = String;

    fn into_entries(self) -> Vec<String> {
        self.collections.into_iter().map(|c| c.id).collect()
    }
}

impl Links for CollectionsPage {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

impl Validate for CollectionsPage {
    fn valid(self) -> Result<Self> {
        Ok(self)
    }
}

impl Page for ItemsPage {
    type Entry = Item;

    fn into_entries(self) -> Vec<Item> {
        self.features
    }
}

impl Links for ItemsPage {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

impl Validate for ItemsPage {
    fn valid(mut self) -> Result<Self> {
        self.features = self.features.valid()?;
        Ok(self)
    }
}
