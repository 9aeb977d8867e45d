//! Content resolver seam
//!
//! The minimal set of scoped-tree operations the bridge needs from the
//! platform.

use std::fs::File;

use crate::error::ResolverError;
use crate::mime::MIME_TYPE_DIR;
use crate::storage::OpenMode;

/// Metadata row for one document in a scoped tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub document_id: String,
    pub display_name: String,
    pub mime_type: String,
}

impl DocumentRow {
    pub fn is_directory(&self) -> bool {
        self.mime_type == MIME_TYPE_DIR
    }
}

/// Access to a permission-scoped content tree.
///
/// Addresses are opaque strings made of the tree address followed by a
/// percent-encoded relative path.
pub trait ContentResolver {
    /// Metadata for `address`, or `None` if nothing is there.
    fn query_document(&self, address: &str) -> Result<Option<DocumentRow>, ResolverError>;

    /// Rows for every child of the directory at `address`.
    fn query_children(&self, address: &str) -> Result<Vec<DocumentRow>, ResolverError>;

    /// Creates `display_name` below `parent` and returns its address.
    ///
    /// `None` means the parent could not be resolved as a directory.
    fn create_document(
        &self,
        parent: &str,
        mime_type: &str,
        display_name: &str,
    ) -> Result<Option<String>, ResolverError>;

    fn delete_document(&self, address: &str) -> Result<bool, ResolverError>;

    /// Opens the document's contents. The returned file is owned by the caller.
    fn open_document(&self, address: &str, mode: OpenMode) -> Result<File, ResolverError>;
}

impl<T: ContentResolver + ?Sized> ContentResolver for &T {
    fn query_document(&self, address: &str) -> Result<Option<DocumentRow>, ResolverError> {
        (**self).query_document(address)
    }

    fn query_children(&self, address: &str) -> Result<Vec<DocumentRow>, ResolverError> {
        (**self).query_children(address)
    }

    fn create_document(
        &self,
        parent: &str,
        mime_type: &str,
        display_name: &str,
    ) -> Result<Option<String>, ResolverError> {
        (**self).create_document(parent, mime_type, display_name)
    }

    fn delete_document(&self, address: &str) -> Result<bool, ResolverError> {
        (**self).delete_document(address)
    }

    fn open_document(&self, address: &str, mode: OpenMode) -> Result<File, ResolverError> {
        (**self).open_document(address, mode)
    }
}
