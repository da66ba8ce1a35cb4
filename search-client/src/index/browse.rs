//! Cursor-based full-index scans.
//!
//! A [`BrowseIterator`] walks every document matching a query, one page at a
//! time. The service hands back an opaque cursor with each page; the iterator
//! passes it back verbatim to get the next one. Iteration cannot be rewound,
//! but [`Index::browse_from`] starts a fresh iterator from any cursor observed
//! earlier, which is how an interrupted scan is resumed.

use std::sync::Arc;

use futures::stream::{self, Stream};
use serde_json::Value;
use tracing::{debug, instrument};
use url::form_urlencoded;

use super::handle::IndexHandle;
use super::{decode, Index};
use crate::errors::{IndexError, Result};
use crate::interfaces::{Transport, TransportRequest};
use search_client_shared::{BrowsePage, Query};

/// Lazy, forward-only sequence of documents over the browse endpoint.
///
/// The protocol is `has_next` then `next`: [`has_next`](Self::has_next)
/// fetches pages as needed and stages the next document,
/// [`next`](Self::next) hands it over without touching the network. Once the
/// last page is drained, `has_next` returns `false` for good.
///
/// An iterator owns its state and must not be shared between callers.
pub struct BrowseIterator {
    transport: Arc<dyn Transport>,
    handle: IndexHandle,
    params: String,
    hits: Vec<Value>,
    position: usize,
    cursor: Option<String>,
    started: bool,
    staged: Option<Value>,
}

impl BrowseIterator {
    fn new(
        transport: Arc<dyn Transport>,
        handle: IndexHandle,
        query: &Query,
        cursor: Option<String>,
    ) -> Self {
        Self {
            transport,
            handle,
            params: query.to_query_string(),
            hits: Vec::new(),
            position: 0,
            cursor: cursor.filter(|c| !c.is_empty()),
            started: false,
            staged: None,
        }
    }

    /// Whether another document is available, fetching pages if needed.
    ///
    /// Calling it repeatedly without [`next`](Self::next) does not skip
    /// documents.
    pub async fn has_next(&mut self) -> Result<bool> {
        if self.staged.is_some() {
            return Ok(true);
        }

        loop {
            if self.position < self.hits.len() {
                let hit = std::mem::take(&mut self.hits[self.position]);
                self.position += 1;
                self.staged = Some(hit);
                return Ok(true);
            }

            if self.started && self.cursor.is_none() {
                return Ok(false);
            }

            self.fetch_page().await?;
        }
    }

    /// Take the document staged by the last successful
    /// [`has_next`](Self::has_next).
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The next document
    /// * `Err(IndexError::IllegalState)` - If no document is staged
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Value> {
        self.staged
            .take()
            .ok_or_else(|| IndexError::illegal_state("next() called without a successful has_next()"))
    }

    /// Removing documents while browsing is not supported.
    pub fn remove(&mut self) -> Result<()> {
        Err(IndexError::unsupported("cannot remove while browsing"))
    }

    /// Cursor of the next page to fetch, if any.
    ///
    /// Persist it to resume the scan later with [`Index::browse_from`].
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Consume the iterator as a stream of documents.
    ///
    /// The stream ends after the last document or after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        stream::try_unfold(self, |mut iterator| async move {
            if iterator.has_next().await? {
                let hit = iterator.next()?;
                Ok::<_, IndexError>(Some((hit, iterator)))
            } else {
                Ok(None)
            }
        })
    }

    #[instrument(skip(self), fields(index = %self.handle.name()))]
    async fn fetch_page(&mut self) -> Result<()> {
        let mut params = self.params.clone();
        if let Some(ref cursor) = self.cursor {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .append_pair("cursor", cursor)
                .finish();
            if !params.is_empty() {
                params.push('&');
            }
            params.push_str(&encoded);
        }

        let mut path = format!("{}/browse", self.handle.base_path());
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params);
        }

        let response = self.transport.send(TransportRequest::get(path).read()).await?;
        let page: BrowsePage = decode(response, "browse")?;

        self.cursor = page.next_cursor().map(str::to_string);
        debug!(
            hits = page.hits.len(),
            has_more = self.cursor.is_some(),
            "Fetched browse page"
        );

        self.hits = page.hits;
        self.position = 0;
        self.started = true;
        Ok(())
    }
}

impl Index {
    /// Scan every document matching `query`.
    ///
    /// The query is captured at this point; nothing is fetched until the
    /// first [`BrowseIterator::has_next`].
    pub fn browse(&self, query: &Query) -> BrowseIterator {
        BrowseIterator::new(self.transport.clone(), self.handle.clone(), query, None)
    }

    /// Resume a scan from a cursor returned by an earlier iterator.
    ///
    /// An empty cursor starts from the beginning.
    pub fn browse_from(&self, query: &Query, cursor: impl Into<String>) -> BrowseIterator {
        BrowseIterator::new(
            self.transport.clone(),
            self.handle.clone(),
            query,
            Some(cursor.into()),
        )
    }

    /// Fetch a single page by number.
    pub async fn browse_page(&self, page: u32, hits_per_page: Option<u32>) -> Result<BrowsePage> {
        let mut path = format!("{}/browse?page={}", self.handle.base_path(), page);
        if let Some(hits_per_page) = hits_per_page {
            path.push_str(&format!("&hitsPerPage={}", hits_per_page));
        }
        decode(self.send(TransportRequest::get(path).read()).await?, "browse")
    }
}
