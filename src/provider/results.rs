//! Provider result types
//!
//! Defines the records returned by provider queries. All of them are computed
//! from filesystem attributes at query time.

use std::fs::File;

/// Capability flags of one tree entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFlags {
    pub supports_write: bool,
    pub supports_delete: bool,
    pub supports_rename: bool,
    pub supports_thumbnail: bool,
    pub dir_supports_create: bool,
}

/// One file or directory in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub document_id: String,
    pub display_name: String,
    pub mime_type: String,
    pub size: u64,
    /// Milliseconds since the Unix epoch
    pub last_modified: u64,
    pub flags: EntryFlags,
}

impl TreeEntry {
    pub fn is_directory(&self) -> bool {
        self.mime_type == crate::mime::MIME_TYPE_DIR
    }
}

/// Capability flags of the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootFlags {
    pub supports_create: bool,
    pub supports_search: bool,
    pub supports_is_child: bool,
}

/// The single root exposed by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootRecord {
    pub root_id: String,
    pub document_id: String,
    pub title: String,
    pub flags: RootFlags,
    pub available_bytes: u64,
    pub mime_types: &'static str,
}

/// Result of a path lookup between two documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    /// Set only when the lookup started from the configured root
    pub root_id: Option<String>,
    /// Ids from the parent down to the child, both included
    pub ids: Vec<String>,
}

/// An opened thumbnail: a byte range of a file
#[derive(Debug)]
pub struct ThumbnailHandle {
    pub file: File,
    pub start_offset: u64,
    pub length: u64,
}
