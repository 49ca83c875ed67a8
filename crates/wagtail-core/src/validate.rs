//! Schema checks applied to every payload at the resource client boundary.
//!
//! Responses arrive as untyped JSON. Each checker inspects the shape and
//! produces a [`Validated`] value; only [`Validated::Valid`] payloads are
//! turned into typed data, so the store downstream sees a single failure
//! channel ([`Error::MalformedResponse`]).

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{Collection, CollectionMeta, HomePage, ImageRef, ImageUrls, PageMeta, PageSummary};
use crate::{Error, Result};

/// Outcome of checking one payload against its expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Validated<T> {
    /// The payload matched and was converted.
    Valid(T),
    /// The payload did not match; the reason names the offending field.
    Invalid(String),
}

impl<T> Validated<T> {
    /// Convert into the crate result type, mapping `Invalid` to
    /// [`Error::MalformedResponse`].
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(reason) => Err(Error::MalformedResponse(reason)),
        }
    }

    /// Whether the payload passed its check.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Transform a valid value, passing an invalid reason through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Self::Valid(value) => Validated::Valid(f(value)),
            Self::Invalid(reason) => Validated::Invalid(reason),
        }
    }

    fn and_then<U>(self, f: impl FnOnce(T) -> Validated<U>) -> Validated<U> {
        match self {
            Self::Valid(value) => f(value),
            Self::Invalid(reason) => Validated::Invalid(reason),
        }
    }
}

fn object<'a>(value: &'a Value, what: &str) -> Validated<&'a Map<String, Value>> {
    value
        .as_object()
        .map_or_else(|| Validated::Invalid(format!("{what} is not an object")), Validated::Valid)
}

fn positive_id(fields: &Map<String, Value>, what: &str) -> Validated<u64> {
    match fields.get("id").and_then(Value::as_u64) {
        Some(id) if id > 0 => Validated::Valid(id),
        Some(_) => Validated::Invalid(format!("{what} id must be positive")),
        None => Validated::Invalid(format!("{what} is missing an integer id")),
    }
}

fn required_string(fields: &Map<String, Value>, key: &str, what: &str) -> Validated<String> {
    match fields.get(key).and_then(Value::as_str) {
        Some(s) => Validated::Valid(s.to_owned()),
        None => Validated::Invalid(format!("{what} is missing a string {key}")),
    }
}

fn optional_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Raw items and reported total of a collection envelope.
pub(crate) struct Envelope<'a> {
    pub(crate) items: &'a [Value],
    pub(crate) total_count: u64,
}

/// Check the envelope shape only, leaving items unchecked and uncopied.
pub(crate) fn envelope(value: &Value) -> Validated<Envelope<'_>> {
    object(value, "response").and_then(|fields| {
        let Some(items) = fields.get("items").and_then(Value::as_array) else {
            return Validated::Invalid("response items is not an array".to_string());
        };

        let total_count = fields.get("meta").and_then(|meta| {
            meta.get("total_count")
                .or_else(|| meta.get("totalCount"))
                .and_then(Value::as_u64)
        });
        let Some(total_count) = total_count else {
            return Validated::Invalid("response meta.total_count is not an integer".to_string());
        };

        Validated::Valid(Envelope { items, total_count })
    })
}

/// Check a collection envelope: `{ items: [...], meta: { total_count } }`.
///
/// Every item is passed through `item`; the first failing item invalidates
/// the whole collection.
pub fn collection<T>(
    value: &Value,
    item: impl Fn(&Value) -> Validated<T>,
) -> Validated<Collection<T>> {
    envelope(value).and_then(|raw| {
        let mut items = Vec::with_capacity(raw.items.len());
        for (index, entry) in raw.items.iter().enumerate() {
            match item(entry) {
                Validated::Valid(parsed) => items.push(parsed),
                Validated::Invalid(reason) => {
                    return Validated::Invalid(format!("items[{index}]: {reason}"));
                },
            }
        }

        Validated::Valid(Collection {
            items,
            meta: CollectionMeta {
                total_count: raw.total_count,
            },
        })
    })
}

/// Check a page object: at least a positive integer `id` and a string `title`.
///
/// `meta` is opaque; if it cannot be read it is dropped rather than failing
/// the page.
pub fn page(value: &Value) -> Validated<PageSummary> {
    object(value, "page").and_then(|fields| {
        positive_id(fields, "page").and_then(|id| {
            required_string(fields, "title", "page").map(|title| PageSummary {
                id,
                title,
                meta: page_meta(fields),
            })
        })
    })
}

fn page_meta(fields: &Map<String, Value>) -> Option<PageMeta> {
    let raw = fields.get("meta")?;
    match serde_json::from_value::<PageMeta>(raw.clone()) {
        Ok(meta) => Some(meta),
        Err(err) => {
            debug!("Ignoring unreadable page meta: {}", err);
            None
        },
    }
}

/// Check a home page: a [`page`] plus a string `intro` and an optional
/// embedded `featured_image`.
pub fn home_page(value: &Value) -> Validated<HomePage> {
    page(value).and_then(|page| {
        object(value, "home page").and_then(|fields| {
            required_string(fields, "intro", "home page").and_then(|intro| {
                let featured_image = match fields.get("featured_image") {
                    None | Some(Value::Null) => Validated::Valid(None),
                    Some(raw) => image(raw).map(Some),
                };
                featured_image.map(|featured_image| HomePage {
                    page,
                    intro,
                    featured_image,
                })
            })
        })
    })
}

/// Check an image and normalize it into an [`ImageRef`].
///
/// The API nests urls and type under `meta`; those move onto the reference.
/// Only `id` is mandatory, since embedded images are often trimmed down.
pub fn image(value: &Value) -> Validated<ImageRef> {
    object(value, "image").and_then(|fields| {
        positive_id(fields, "image").and_then(|id| {
            let title = match fields.get("title") {
                None => String::new(),
                Some(Value::String(title)) => title.clone(),
                Some(_) => return Validated::Invalid("image title is not a string".to_string()),
            };
            let meta = fields.get("meta").and_then(Value::as_object);
            let urls = ImageUrls {
                detail: meta.and_then(|m| optional_string(m, "detail_url")),
                download: meta.and_then(|m| optional_string(m, "download_url")),
            };
            let image_type = meta
                .and_then(|m| optional_string(m, "type"))
                .unwrap_or_default();
            Validated::Valid(ImageRef {
                id,
                title,
                urls,
                image_type,
            })
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_collection_accepts_wagtail_envelope() {
        let value = json!({
            "meta": { "total_count": 1 },
            "items": [{ "id": 1, "title": "Home", "meta": { "type": "home.HomePage", "slug": "home" } }]
        });

        let Validated::Valid(pages) = collection(&value, page) else {
            panic!("Expected a valid collection");
        };
        assert_eq!(pages.total_count(), 1);
        assert_eq!(pages.items[0].title, "Home");
        assert_eq!(
            pages.items[0].meta.as_ref().and_then(|m| m.slug.as_deref()),
            Some("home")
        );
    }

    #[test]
    fn test_collection_accepts_camel_case_total() {
        let value = json!({ "meta": { "totalCount": 0 }, "items": [] });
        assert!(collection(&value, page).is_valid());
    }

    #[test]
    fn test_collection_rejects_missing_meta() {
        let value = json!({ "items": [] });
        assert_eq!(
            collection(&value, page),
            Validated::Invalid("response meta.total_count is not an integer".to_string())
        );
    }

    #[test]
    fn test_envelope_leaves_items_unchecked() {
        let value = json!({ "meta": { "total_count": 5 }, "items": [1, "two"] });

        let Validated::Valid(raw) = envelope(&value) else {
            panic!("Expected a valid envelope");
        };
        assert_eq!(raw.total_count, 5);
        assert_eq!(raw.items.len(), 2);
        assert!(!envelope(&json!({ "meta": { "total_count": 0 } })).is_valid());
    }

    #[test]
    fn test_collection_reports_failing_item_index() {
        let value = json!({
            "meta": { "total_count": 2 },
            "items": [{ "id": 1, "title": "ok" }, { "id": 2 }]
        });
        match collection(&value, page) {
            Validated::Invalid(reason) => assert!(reason.starts_with("items[1]")),
            Validated::Valid(_) => panic!("Expected invalid collection"),
        }
    }

    #[test]
    fn test_page_requires_id_and_title() {
        assert!(page(&json!({ "id": 3, "title": "About" })).is_valid());
        assert!(!page(&json!({ "title": "About" })).is_valid());
        assert!(!page(&json!({ "id": 3 })).is_valid());
        assert!(!page(&json!({ "id": 0, "title": "Zero" })).is_valid());
        assert!(!page(&json!({ "id": "3", "title": "About" })).is_valid());
        assert!(!page(&json!(null)).is_valid());
    }

    #[test]
    fn test_page_drops_unreadable_meta() {
        let value = json!({ "id": 3, "title": "About", "meta": "not-an-object" });
        let Validated::Valid(parsed) = page(&value) else {
            panic!("Expected a valid page");
        };
        assert_eq!(parsed.meta, None);
    }

    #[test]
    fn test_home_page_normalizes_featured_image() {
        let value = json!({
            "id": 1,
            "title": "Home",
            "intro": "Welcome",
            "featured_image": {
                "id": 9,
                "title": "Hero",
                "meta": {
                    "type": "wagtailimages.Image",
                    "detail_url": "http://localhost/api/v2/images/9/",
                    "download_url": "/media/original_images/hero.jpg"
                }
            }
        });

        let Validated::Valid(home) = home_page(&value) else {
            panic!("Expected a valid home page");
        };
        let image = home.featured_image.unwrap();
        assert_eq!(image.id, 9);
        assert_eq!(image.image_type, "wagtailimages.Image");
        assert_eq!(
            image.urls.download.as_deref(),
            Some("/media/original_images/hero.jpg")
        );
    }

    #[test]
    fn test_home_page_requires_intro() {
        assert!(!home_page(&json!({ "id": 1, "title": "Home" })).is_valid());
        assert!(home_page(&json!({ "id": 1, "title": "Home", "intro": "", "featured_image": null })).is_valid());
    }

    #[test]
    fn test_home_page_rejects_non_object_image() {
        let value = json!({ "id": 1, "title": "Home", "intro": "Hi", "featured_image": 9 });
        assert_eq!(
            home_page(&value),
            Validated::Invalid("image is not an object".to_string())
        );
    }

    #[test]
    fn test_into_result_maps_to_malformed_response() {
        let err = page(&json!([])).into_result().unwrap_err();
        assert!(err.is_malformed());
    }

    fn non_array() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            ".*".prop_map(Value::String),
            Just(json!({ "nested": [] })),
        ]
    }

    proptest! {
        #[test]
        fn test_non_array_items_never_validate(items in non_array()) {
            let value = json!({ "items": items, "meta": { "total_count": 1 } });
            prop_assert!(!collection(&value, page).is_valid());
        }

        #[test]
        fn test_well_formed_pages_always_validate(id in 1u64..=u64::from(u32::MAX), title in ".*") {
            let value = json!({ "id": id, "title": title.clone() });
            prop_assert_eq!(
                page(&value),
                Validated::Valid(PageSummary { id, title, meta: None })
            );
        }
    }
}
