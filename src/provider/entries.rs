//! Entry resolution
//!
//! Conversions between document ids, paths and `TreeEntry` records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ProviderError;
use crate::mime;
use crate::provider::results::{EntryFlags, TreeEntry};
use crate::storage::{dir_contains, document_id_for, is_writable, last_modified_millis};

/// Resolves a document id to the canonical path it names below `base`.
///
/// `base` must itself be canonical. Ids that do not exist, or that resolve
/// outside `base` (through `..` or a link), are not found.
pub fn file_for_doc_id(base: &Path, document_id: &str) -> Result<PathBuf, ProviderError> {
    if document_id.is_empty() {
        return Err(ProviderError::NotFound("empty document id".into()));
    }
    let path = Path::new(document_id)
        .canonicalize()
        .map_err(|_| ProviderError::NotFound(format!("{document_id} not found")))?;
    if !dir_contains(base, &path) {
        return Err(ProviderError::NotFound(format!(
            "{document_id} is outside {}",
            base.display()
        )));
    }
    Ok(path)
}

/// Builds the entry for an existing path.
pub fn entry_for_path(path: &Path) -> Result<TreeEntry, ProviderError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ProviderError::NotFound(path.display().to_string()),
        _ => ProviderError::Failure(format!("cannot stat {}: {}", path.display(), e)),
    })?;

    let is_dir = metadata.is_dir();
    let mime_type = mime::mime_type_for(path, is_dir);
    let writable = is_writable(path);

    let mut flags = EntryFlags::default();
    if is_dir {
        flags.dir_supports_create = writable;
    } else {
        flags.supports_write = writable;
    }
    if path.parent().is_some_and(is_writable) {
        flags.supports_delete = true;
        flags.supports_rename = true;
    }
    flags.supports_thumbnail = mime::is_image(mime_type);

    Ok(TreeEntry {
        document_id: document_id_for(path),
        display_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        mime_type: mime_type.to_string(),
        size: metadata.len(),
        last_modified: last_modified_millis(&metadata),
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_round_trips_to_the_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let path = base.join("deck.ydk");
        fs::write(&path, b"main").unwrap();

        let id = document_id_for(&path);
        assert_eq!(file_for_doc_id(&base, &id).unwrap(), path);
        assert_eq!(file_for_doc_id(&base, &document_id_for(&base)).unwrap(), base);
    }

    #[test]
    fn missing_doc_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let id = document_id_for(&base.join("nope"));
        assert!(matches!(file_for_doc_id(&base, &id), Err(ProviderError::NotFound(_))));
        assert!(matches!(file_for_doc_id(&base, ""), Err(ProviderError::NotFound(_))));
    }

    #[test]
    fn ids_outside_the_base_are_not_found() {
        let base_dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let base = base_dir.path().canonicalize().unwrap();
        fs::write(other.path().join("secret.txt"), b"s").unwrap();
        fs::create_dir(base.join("a")).unwrap();

        let foreign = document_id_for(&other.path().join("secret.txt"));
        assert!(matches!(
            file_for_doc_id(&base, &foreign),
            Err(ProviderError::NotFound(_))
        ));

        let escape = format!("{}/a/../..", base.display());
        assert!(matches!(
            file_for_doc_id(&base, &escape),
            Err(ProviderError::NotFound(_))
        ));
    }

    #[test]
    fn dotted_ids_resolve_to_canonical_paths() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("a/b")).unwrap();
        fs::write(base.join("a/x.txt"), b"x").unwrap();

        let id = format!("{}/a/b/../x.txt", base.display());
        assert_eq!(file_for_doc_id(&base, &id).unwrap(), base.join("a/x.txt"));
    }

    #[test]
    fn file_entry_carries_size_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        fs::write(&path, [0u8; 16]).unwrap();

        let entry = entry_for_path(&path).unwrap();
        assert_eq!(entry.display_name, "art.png");
        assert_eq!(entry.mime_type, "image/png");
        assert_eq!(entry.size, 16);
        assert!(entry.flags.supports_write);
        assert!(entry.flags.supports_delete);
        assert!(entry.flags.supports_rename);
        assert!(entry.flags.supports_thumbnail);
        assert!(!entry.flags.dir_supports_create);
        assert!(entry.last_modified > 0);
    }

    #[test]
    fn directory_entry_is_marked_and_creatable() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("replay");
        fs::create_dir(&sub).unwrap();

        let entry = entry_for_path(&sub).unwrap();
        assert!(entry.is_directory());
        assert!(entry.flags.dir_supports_create);
        assert!(!entry.flags.supports_write);
        assert!(!entry.flags.supports_thumbnail);
    }
}
