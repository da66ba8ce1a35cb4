//! Delete every document matching a query.

use tracing::{debug, info, instrument};

use super::Index;
use crate::config::DELETE_BY_QUERY_BATCH_SIZE;
use crate::errors::{IndexError, Result};
use search_client_shared::{Query, SearchResponse, OBJECT_ID_FIELD};

impl Index {
    /// Delete every document matching `query`, waiting for each deletion
    /// batch to be published before searching again.
    ///
    /// The caller's query is left untouched; the search only retrieves
    /// identifiers and pages by a fixed batch size. Every other setting,
    /// `page` included, is kept. A caller-set `page` therefore skips the
    /// first matches, and the loop stops with an error once the remaining
    /// matches no longer reach that page. On success, a search for the same
    /// query matches nothing as of the last probe.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - The number of documents deleted
    /// * `Err(IndexError::MalformedResponse)` - If a hit has no identifier, or
    ///   matches are reported without hits (a page set past the last match
    ///   ends up here)
    /// * `Err(_)` - Any search, batch or wait error, as-is. Batches already
    ///   published stay deleted.
    #[instrument(skip(self, query), fields(index = %self.name()))]
    pub async fn delete_by_query(&self, query: &Query) -> Result<u64> {
        let query = query
            .clone()
            .with_attributes_to_retrieve([OBJECT_ID_FIELD])
            .with_hits_per_page(DELETE_BY_QUERY_BATCH_SIZE);

        let mut deleted: u64 = 0;
        let mut results = self.search(&query).await?;

        while results.nb_hits != 0 {
            let object_ids = matched_object_ids(&query, &results)?;

            let task = self.delete_objects(&object_ids).await?;
            self.wait_task(&task).await?;

            deleted += object_ids.len() as u64;
            debug!(batch = object_ids.len(), matched = results.nb_hits, "Deleted batch");

            results = self.search(&query).await?;
        }

        info!(deleted = deleted, "Delete by query complete");
        Ok(deleted)
    }
}

fn matched_object_ids(query: &Query, results: &SearchResponse) -> Result<Vec<String>> {
    if results.hits.is_empty() {
        let message = match query.page {
            Some(page) => format!(
                "{} matches remain but page {} of the query is empty; unset the page to delete them",
                results.nb_hits, page
            ),
            None => format!(
                "search reported {} matches but returned no hits",
                results.nb_hits
            ),
        };
        return Err(IndexError::malformed(message));
    }

    results
        .hits
        .iter()
        .map(|hit| {
            hit.get(OBJECT_ID_FIELD)
                .and_then(|id| id.as_str())
                .map(str::to_string)
                .ok_or_else(|| IndexError::malformed("search hit has no objectID"))
        })
        .collect()
}
