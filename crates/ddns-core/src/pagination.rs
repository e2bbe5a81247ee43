//! Paginated list fetching with a per-instance cache
//!
//! Providers expose list endpoints one page at a time. [`PageCache::fetch_all`]
//! walks the pages until the provider's `result_info` says everything has been
//! seen, then keeps the complete list under a key (an account or zone ID) for
//! the lifetime of the cache.
//!
//! A cache entry is either [`Fetched::Partial`] (pages are still arriving) or
//! [`Fetched::Full`]. Only full entries are ever handed out; a failed fetch
//! removes its partial entry, so callers get the whole list or an error.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// Pagination metadata reported with each page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number the provider served
    #[serde(default)]
    pub page: u64,
    /// Page size used by the provider
    #[serde(default)]
    pub per_page: u64,
    /// Number of items on this page
    #[serde(default)]
    pub count: u64,
    /// Number of items across all pages
    #[serde(default)]
    pub total_count: u64,
}

impl PageInfo {
    /// Items served up to and including this page: `(page - 1) * per_page + count`
    pub fn seen(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .saturating_add(self.count)
    }

    /// Items the provider has yet to serve
    pub fn remaining(&self) -> u64 {
        self.total_count.saturating_sub(self.seen())
    }

    /// `(page - 1) * per_page + count >= total_count`
    pub fn is_last_page(&self) -> bool {
        self.seen() >= self.total_count
    }
}

/// One page of items
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in provider order
    pub items: Vec<T>,
    /// Pagination metadata; `None` means the endpoint is not paginated
    pub info: Option<PageInfo>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, info: Option<PageInfo>) -> Self {
        Self { items, info }
    }
}

/// Completeness marker of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetched {
    /// Pages are still being accumulated
    Partial,
    /// The termination condition held; the list is complete
    Full,
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    items: Vec<T>,
    fetched: Fetched,
}

/// Keyed cache of fully-paginated lists
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> PageCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete list cached under `key`, if any
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.entries
            .get(key)
            .filter(|entry| entry.fetched == Fetched::Full)
            .map(|entry| entry.items.as_slice())
    }

    /// Whether a complete list is cached under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drop whatever is cached under `key`. Returns `true` if something was removed.
    pub fn evict(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!("Evicted cached list for {}", key);
        }
        removed
    }

    /// Fetch every page for `key`, or return the cached list.
    ///
    /// The first request is page 0, which providers treat as "first page".
    /// Each following request asks for the page after the one the provider
    /// reported. Fetching stops once [`PageInfo::is_last_page`] holds, or
    /// after a page that carries no pagination metadata.
    ///
    /// # Errors
    ///
    /// Any error from `fetch_page` aborts the walk and is returned as-is.
    /// A provider that stops advancing (an empty page, or a page number that
    /// does not increase) before the termination condition holds yields
    /// [`Error::Pagination`]. Nothing is cached on failure.
    pub async fn fetch_all<F, Fut>(&mut self, key: &str, mut fetch_page: F) -> Result<Vec<T>>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        if let Some(items) = self.get(key) {
            debug!("Using cached list for {} ({} item(s))", key, items.len());
            return Ok(items.to_vec());
        }

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                items: Vec::new(),
                fetched: Fetched::Partial,
            },
        );

        match self.walk_pages(key, &mut fetch_page).await {
            Ok(pages) => {
                let entry = self
                    .entries
                    .get_mut(key)
                    .ok_or_else(|| Error::pagination(format!("cache entry for {key} vanished")))?;
                entry.fetched = Fetched::Full;
                debug!(
                    "Fetched {} item(s) for {} in {} page(s)",
                    entry.items.len(),
                    key,
                    pages
                );
                Ok(entry.items.clone())
            }
            Err(e) => {
                self.entries.remove(key);
                Err(e)
            }
        }
    }

    async fn walk_pages<F, Fut>(&mut self, key: &str, fetch_page: &mut F) -> Result<usize>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let mut page = 0;
        let mut requests = 0;

        loop {
            debug!("Fetching page {} for {}", page, key);
            let Page { items, info } = fetch_page(page).await?;
            requests += 1;

            let received = items.len() as u64;
            if let Some(entry) = self.entries.get_mut(key) {
                entry.items.extend(items);
            }

            let Some(info) = info else {
                return Ok(requests);
            };
            if info.is_last_page() {
                return Ok(requests);
            }

            if info.count.max(received) == 0 {
                return Err(Error::pagination(format!(
                    "page {} for {} was empty with {} of {} item(s) remaining",
                    info.page,
                    key,
                    info.remaining(),
                    info.total_count
                )));
            }

            let next = info.page.saturating_add(1);
            if next <= page {
                return Err(Error::pagination(format!(
                    "provider did not advance past page {} for {}",
                    info.page, key
                )));
            }
            page = next;
        }
    }
}
