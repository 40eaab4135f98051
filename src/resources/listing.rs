use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Ya360Client;
use crate::error::Ya360Error;
use crate::fetch::PageSet;
use crate::params::RequestParams;

/// Records flattened from a multi-page collection.
///
/// `failed_pages` lists the pages that could not be fetched or decoded, so an
/// empty `items` with an empty `failed_pages` really means "nothing there".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub failed_pages: Vec<u32>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failed_pages: Vec::new(),
        }
    }
}

impl<T> Listing<T> {
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Listing<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Fetch every page of a collection and flatten its `key` arrays.
///
/// Page failures are reported through `Listing::failed_pages`; only errors that
/// prevent any request from being made (no token) are returned.
pub async fn fetch_listing<T>(
    client: &Ya360Client,
    url: &str,
    params: &RequestParams,
    key: &str,
) -> Result<Listing<T>, Ya360Error>
where
    T: DeserializeOwned + PartialEq,
{
    let params = if params.is_paginated() {
        params.clone()
    } else {
        params.clone().page(1).per_page(super::DEFAULT_PER_PAGE)
    };
    let pages = client.fetch(url, Some(&params)).await?;
    Ok(collect_records(pages, key))
}

/// Decode the `key` array of every page and append records not already
/// collected. Equality is structural, over the whole decoded record.
///
/// A page without the array, or with an undecodable record, is counted as
/// failed and contributes nothing.
pub fn collect_records<T>(pages: PageSet, key: &str) -> Listing<T>
where
    T: DeserializeOwned + PartialEq,
{
    let mut listing = Listing {
        items: Vec::new(),
        failed_pages: pages.failed_pages,
    };

    for page in pages.pages {
        match decode_array::<T>(&page.body, key) {
            Ok(records) => {
                for record in records {
                    if !listing.items.contains(&record) {
                        listing.items.push(record);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(page = ?page.number, error = %e, "skipping undecodable page");
                listing.failed_pages.push(page.number.unwrap_or(0));
            }
        }
    }
    listing.failed_pages.sort_unstable();
    listing
}

/// Decode the array stored under `key` in a response body.
pub fn decode_array<T: DeserializeOwned>(
    body: &serde_json::Value,
    key: &str,
) -> Result<Vec<T>, Ya360Error> {
    let array = body
        .get(key)
        .filter(|v| v.is_array())
        .ok_or_else(|| Ya360Error::Parse(format!("response has no '{key}' array")))?;
    serde_json::from_value(array.clone())
        .map_err(|e| Ya360Error::Parse(format!("cannot decode '{key}': {e}")))
}

/// Decode a whole response body as one record.
pub fn decode<T: DeserializeOwned>(body: serde_json::Value, what: &str) -> Result<T, Ya360Error> {
    serde_json::from_value(body).map_err(|e| Ya360Error::Parse(format!("cannot decode {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Page;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    fn page(number: u32, body: serde_json::Value) -> Page {
        Page {
            number: Some(number),
            body,
        }
    }

    #[test]
    fn flattens_pages_in_order() {
        let set = PageSet {
            pages: vec![
                page(1, json!({ "items": [{ "id": 1, "name": "a" }] })),
                page(2, json!({ "items": [{ "id": 2, "name": "b" }, { "id": 3, "name": "c" }] })),
            ],
            failed_pages: vec![],
        };
        let listing: Listing<Item> = collect_records(set, "items");
        let ids: Vec<u32> = listing.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(listing.is_complete());
    }

    #[test]
    fn structurally_equal_records_appear_once() {
        let set = PageSet {
            pages: vec![
                page(0, json!({ "items": [{ "id": 1, "name": "a" }] })),
                page(1, json!({ "items": [{ "id": 1, "name": "a" }, { "id": 1, "name": "renamed" }] })),
            ],
            failed_pages: vec![],
        };
        let listing: Listing<Item> = collect_records(set, "items");
        // Same id but different name is a different record.
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn page_missing_array_counts_as_failed() {
        let set = PageSet {
            pages: vec![
                page(1, json!({ "items": [{ "id": 1, "name": "a" }] })),
                page(3, json!({ "pages": 3 })),
            ],
            failed_pages: vec![2],
        };
        let listing: Listing<Item> = collect_records(set, "items");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.failed_pages, vec![2, 3]);
        assert!(!listing.is_complete());
    }

    #[test]
    fn decode_array_rejects_non_arrays() {
        let err = decode_array::<Item>(&json!({ "items": {} }), "items").unwrap_err();
        assert!(err.to_string().contains("no 'items' array"));
    }
}
