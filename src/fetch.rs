use futures::future::join_all;
use serde_json::Value;

use crate::error::Ya360Error;
use crate::http::ApiClient;
use crate::params::RequestParams;

/// One successfully fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page number, `None` for a non-paginated request.
    pub number: Option<u32>,
    pub body: Value,
}

/// Result of a fetch: page bodies in ascending page order plus the page
/// numbers whose request failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSet {
    pub pages: Vec<Page>,
    pub failed_pages: Vec<u32>,
}

impl PageSet {
    fn single(body: Value) -> Self {
        Self {
            pages: vec![Page { number: None, body }],
            failed_pages: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Value> {
        self.pages.iter().map(|p| &p.body)
    }

    pub fn into_bodies(self) -> Vec<Value> {
        self.pages.into_iter().map(|p| p.body).collect()
    }
}

/// Authenticated GET that expands page-numbered collections.
///
/// Borrows the bearer for its whole lifetime, so the token cannot be replaced
/// while a fan-out is in flight.
#[derive(Debug, Clone, Copy)]
pub struct PaginatedFetcher<'a> {
    api: &'a ApiClient,
    bearer: &'a str,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(api: &'a ApiClient, bearer: &'a str) -> Self {
        Self { api, bearer }
    }

    /// Single GET; errors propagate.
    pub async fn fetch_one(
        &self,
        url: &str,
        params: Option<&RequestParams>,
    ) -> Result<Value, Ya360Error> {
        self.api.get(url, self.bearer, params).await
    }

    /// GET `url`, expanding to every page when `params` asks for pagination.
    ///
    /// Without pagination this is a single request whose failure is returned
    /// as an error. With pagination, failures never surface as errors: a failed
    /// first request yields an empty set and a failed later page is left out,
    /// both recorded in `failed_pages`.
    pub async fn fetch(
        &self,
        url: &str,
        params: Option<&RequestParams>,
    ) -> Result<PageSet, Ya360Error> {
        match params {
            Some(p) if p.is_paginated() => Ok(self.fetch_pages(url, p).await),
            _ => self.fetch_one(url, params).await.map(PageSet::single),
        }
    }

    async fn fetch_pages(&self, url: &str, params: &RequestParams) -> PageSet {
        let first_page = params.page.unwrap_or(1);
        let params = params.with_page(first_page);

        let first = match self.fetch_one(url, Some(&params)).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%url, page = first_page, error = %e, "first page failed");
                return PageSet {
                    pages: Vec::new(),
                    failed_pages: vec![first_page],
                };
            }
        };

        let total = page_count(&first);
        let mut set = PageSet {
            pages: vec![Page {
                number: Some(first_page),
                body: first,
            }],
            failed_pages: Vec::new(),
        };

        let remaining: Vec<u32> = match total {
            Some(total) if total > first_page => (first_page + 1..=total).collect(),
            _ => return set,
        };
        tracing::debug!(%url, pages = remaining.len(), "fanning out page requests");

        // Every leg is created before any is polled; join_all keeps input order.
        let legs = remaining.iter().map(|&page| {
            let page_params = params.with_page(page);
            async move { (page, self.fetch_one(url, Some(&page_params)).await) }
        });

        for (page, outcome) in join_all(legs).await {
            match outcome {
                Ok(body) => set.pages.push(Page {
                    number: Some(page),
                    body,
                }),
                Err(e) => {
                    tracing::warn!(%url, page, error = %e, "page request failed");
                    set.failed_pages.push(page);
                }
            }
        }
        set
    }
}

/// The `pages` count of a collection response, when present.
fn page_count(body: &Value) -> Option<u32> {
    let pages = body.get("pages")?;
    pages
        .as_u64()
        .or_else(|| pages.as_str().and_then(|s| s.trim().parse().ok()))
        .and_then(|n| u32::try_from(n).ok())
}
