//! Tree-browsing provider
//!
//! Exposes a host directory hierarchy to other processes. Every entry is
//! identified by its absolute path, so a document id can always be turned
//! back into the path it names.

mod entries;
mod operations;
mod results;
mod search;

pub use entries::{entry_for_path, file_for_doc_id};
pub use operations::DocumentProvider;
pub use results::{DocumentPath, EntryFlags, RootFlags, RootRecord, ThumbnailHandle, TreeEntry};

/// Root search result cap used when configuration does not override it.
pub const MAX_SEARCH_RESULTS: usize = 50;
