//! Index handle and path encoding.

use crate::errors::{IndexError, Result};

/// Percent-encode a single path segment.
///
/// Everything outside the unreserved set is escaped, including `/`, so that
/// an identifier can never address a different resource.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Identifies one remote index by name.
///
/// Holds the encoded form of the name for path construction. Immutable once
/// built; creating a handle does not contact the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexHandle {
    name: String,
    encoded_name: String,
}

impl IndexHandle {
    /// Create a handle for `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexHandle)` - The handle
    /// * `Err(IndexError::InvalidArgument)` - If the name is empty
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(IndexError::invalid_argument("index name must not be empty"));
        }
        let encoded_name = encode_segment(&name);
        Ok(Self { name, encoded_name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoded_name(&self) -> &str {
        &self.encoded_name
    }

    /// Base path of the index, `/1/indexes/{encodedName}`.
    pub fn base_path(&self) -> String {
        format!("/1/indexes/{}", self.encoded_name)
    }

    /// Path of a single object, `/1/indexes/{encodedName}/{encodedId}`.
    pub(crate) fn object_path(&self, object_id: &str) -> String {
        format!("{}/{}", self.base_path(), encode_segment(object_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_name() {
        let handle = IndexHandle::new("my index/été").unwrap();
        assert_eq!(handle.name(), "my index/été");
        assert_eq!(handle.encoded_name(), "my%20index%2F%C3%A9t%C3%A9");
        assert_eq!(handle.base_path(), "/1/indexes/my%20index%2F%C3%A9t%C3%A9");
    }

    #[test]
    fn test_object_path() {
        let handle = IndexHandle::new("products").unwrap();
        assert_eq!(handle.object_path("a/b?c"), "/1/indexes/products/a%2Fb%3Fc");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            IndexHandle::new(""),
            Err(IndexError::InvalidArgument(_))
        ));
    }
}
