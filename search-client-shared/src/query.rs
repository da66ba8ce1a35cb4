//! Structured query configuration.
//!
//! A [`Query`] is opaque to the client beyond serialization: it is rendered
//! into a URL query string and appended to search and browse requests.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Query parameters for search and browse requests.
///
/// Only a handful of well-known options get dedicated fields. Anything else
/// the service understands can be passed through [`Query::with_param`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Full-text query.
    pub query: Option<String>,
    /// Attributes to include in each hit. `None` lets the service decide.
    pub attributes_to_retrieve: Option<Vec<String>>,
    /// Attributes to highlight.
    pub attributes_to_highlight: Option<Vec<String>>,
    /// Number of hits per page.
    pub hits_per_page: Option<u32>,
    /// Zero-based page number.
    pub page: Option<u32>,
    /// Filter expression.
    pub filters: Option<String>,
    /// Tag filter expression.
    pub tag_filters: Option<String>,
    /// Numeric filter expression.
    pub numeric_filters: Option<String>,
    /// Additional service-defined parameters, serialized in key order.
    pub extra: BTreeMap<String, String>,
}

impl Query {
    /// Create a query for the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Default::default()
        }
    }

    /// Restrict the attributes returned for each hit.
    pub fn with_attributes_to_retrieve<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_retrieve = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the attributes to highlight.
    pub fn with_attributes_to_highlight<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_highlight = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the page size.
    pub fn with_hits_per_page(mut self, hits_per_page: u32) -> Self {
        self.hits_per_page = Some(hits_per_page);
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the filter expression.
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    /// Set the tag filter expression.
    pub fn with_tag_filters(mut self, tag_filters: impl Into<String>) -> Self {
        self.tag_filters = Some(tag_filters.into());
        self
    }

    /// Set the numeric filter expression.
    pub fn with_numeric_filters(mut self, numeric_filters: impl Into<String>) -> Self {
        self.numeric_filters = Some(numeric_filters.into());
        self
    }

    /// Pass an arbitrary parameter through to the service.
    ///
    /// Later calls with the same key replace earlier ones.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Render the query as a form-encoded query string, without a leading `?`.
    ///
    /// Returns an empty string when no parameter is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if let Some(ref query) = self.query {
            serializer.append_pair("query", query);
        }
        if let Some(ref attributes) = self.attributes_to_retrieve {
            serializer.append_pair("attributesToRetrieve", &attributes.join(","));
        }
        if let Some(ref attributes) = self.attributes_to_highlight {
            serializer.append_pair("attributesToHighlight", &attributes.join(","));
        }
        if let Some(hits_per_page) = self.hits_per_page {
            serializer.append_pair("hitsPerPage", &hits_per_page.to_string());
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        if let Some(ref filters) = self.filters {
            serializer.append_pair("filters", filters);
        }
        if let Some(ref tag_filters) = self.tag_filters {
            serializer.append_pair("tagFilters", tag_filters);
        }
        if let Some(ref numeric_filters) = self.numeric_filters {
            serializer.append_pair("numericFilters", numeric_filters);
        }
        for (key, value) in &self.extra {
            serializer.append_pair(key, value);
        }

        serializer.finish()
    }
}
