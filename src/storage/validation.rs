//! Path validation
//!
//! The single containment test used everywhere a path must lie inside a
//! directory. A directory contains itself and anything below it; `/a/bc` is
//! not inside `/a/b`.

use std::path::Path;

/// Returns true if `file` is `dir` itself or lies below it.
///
/// Comparison is by path component, so a shared string prefix alone is never
/// enough.
pub fn dir_contains(dir: &Path, file: &Path) -> bool {
    if dir.as_os_str().is_empty() || file.as_os_str().is_empty() {
        return false;
    }
    file.starts_with(dir)
}

/// Document-id flavoured wrapper around [`dir_contains`].
pub fn is_descendant(parent_id: &str, id: &str) -> bool {
    dir_contains(Path::new(parent_id), Path::new(id))
}

/// The document id of a path: its absolute string form.
pub fn document_id_for(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
