use serde::{Deserialize, Serialize};

/// A page as returned by the pages listing or detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    /// Positive page id
    pub id: u64,
    /// Page title
    pub title: String,
    /// Descriptor attached by the API, if readable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Opaque page descriptor attached by the API under `meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Wagtail page model, e.g. `home.HomePage`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    /// API URL of the page detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    /// Public URL of the rendered page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    /// URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Whether the page is listed in site menus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_menus: Option<bool>,
    /// First publication timestamp as sent by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_published_at: Option<String>,
}

/// The distinguished home page, fetched with all fields expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePage {
    /// Id, title and meta shared with every page
    #[serde(flatten)]
    pub page: PageSummary,
    /// Introductory text
    pub intro: String,
    /// Hero image, when one is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageRef>,
}

/// Image metadata, normalized from the API's `meta` block.
///
/// Only carried along for rendering; the image bytes are never fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Positive image id
    pub id: u64,
    /// Image title, empty when the API omits it
    pub title: String,
    /// Where the image can be fetched from
    pub urls: ImageUrls,
    /// Wagtail image model, e.g. `wagtailimages.Image`
    #[serde(rename = "type")]
    pub image_type: String,
}

/// Links published for an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    /// API URL of the image detail
    pub detail: Option<String>,
    /// URL of the original file
    pub download: Option<String>,
}

/// Envelope wrapping every collection response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
    /// Items on this page of results
    pub items: Vec<T>,
    /// Envelope metadata
    pub meta: CollectionMeta,
}

/// Metadata sent alongside collection items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMeta {
    /// Total matching items on the server
    #[serde(alias = "totalCount")]
    pub total_count: u64,
}

impl<T> Collection<T> {
    /// Number of items reported by the server, which may exceed `items.len()`.
    pub const fn total_count(&self) -> u64 {
        self.meta.total_count
    }

    /// Discard the envelope and keep the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
