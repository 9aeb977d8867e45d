//! Provider operations
//!
//! Queries and mutations over the configured base directory.

use log::{debug, error, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::mime::{self, MIME_TYPE_DIR};
use crate::provider::MAX_SEARCH_RESULTS;
use crate::provider::entries::{entry_for_path, file_for_doc_id};
use crate::provider::results::{DocumentPath, RootFlags, RootRecord, ThumbnailHandle, TreeEntry};
use crate::provider::search::search_tree;
use crate::storage::{
    DeleteStats, OpenMode, available_bytes, delete_recursive, dir_contains, document_id_for,
    is_descendant,
};

const ALL_MIME_TYPES: &str = "*/*";

/// Serves the tree rooted at the configured base directory.
///
/// All state is fixed at construction; queries always hit the filesystem.
#[derive(Debug, Clone)]
pub struct DocumentProvider {
    base_dir: Option<PathBuf>,
    private_root: PathBuf,
    title: String,
    max_search_results: usize,
}

impl DocumentProvider {
    pub fn new(base_dir: Option<PathBuf>, private_root: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.map(|dir| {
                dir.canonicalize()
                    .or_else(|_| std::path::absolute(&dir))
                    .unwrap_or(dir)
            }),
            private_root: private_root.into(),
            title: "docbridge".to_string(),
            max_search_results: MAX_SEARCH_RESULTS,
        }
    }

    /// Builds a provider from configuration, reading the working-directory file once.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let base_dir = config.base_dir();
        match &base_dir {
            Some(dir) => info!("Provider base directory: {}", dir.display()),
            None => warn!(
                "No working directory configured in {}",
                config.working_dir_file
            ),
        }
        Self::new(base_dir, config.private_storage_path())
            .with_title(&config.title)
            .with_max_search_results(config.max_search_results)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_max_search_results(mut self, max: usize) -> Self {
        self.max_search_results = max;
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    fn require_base_dir(&self) -> Result<&Path, ProviderError> {
        self.base_dir
            .as_deref()
            .ok_or_else(|| ProviderError::NotFound("no base directory configured".into()))
    }

    /// Canonical path for `document_id`, confined to the base directory.
    fn resolve(&self, document_id: &str) -> Result<PathBuf, ProviderError> {
        file_for_doc_id(self.require_base_dir()?, document_id)
    }

    /// Describes the single root.
    pub fn query_root(&self) -> Result<RootRecord, ProviderError> {
        let base = self.require_base_dir()?;
        let id = document_id_for(base);
        Ok(RootRecord {
            root_id: id.clone(),
            document_id: id,
            title: self.title.clone(),
            flags: RootFlags {
                supports_create: true,
                supports_search: true,
                supports_is_child: true,
            },
            available_bytes: available_bytes(base),
            mime_types: ALL_MIME_TYPES,
        })
    }

    pub fn query_entry(&self, document_id: &str) -> Result<TreeEntry, ProviderError> {
        let path = self.resolve(document_id)?;
        entry_for_path(&path)
    }

    /// Entries for every immediate child of `parent_id`, in no particular order.
    pub fn query_children(&self, parent_id: &str) -> Result<Vec<TreeEntry>, ProviderError> {
        let parent = self.resolve(parent_id)?;
        let entries = fs::read_dir(&parent).map_err(|e| {
            ProviderError::NotFound(format!("cannot list {}: {}", parent.display(), e))
        })?;

        let mut children = Vec::new();
        for entry in entries.flatten() {
            match entry_for_path(&entry.path()) {
                Ok(child) => children.push(child),
                // Vanished between listing and stat, or a dangling link.
                Err(e) => debug!("Skipping child {}: {}", entry.path().display(), e),
            }
        }
        Ok(children)
    }

    /// Ids from `parent_id` down to `child_id`, both included.
    ///
    /// Without a parent the configured root is used and reported back as the
    /// path's root.
    pub fn find_path(
        &self,
        parent_id: Option<&str>,
        child_id: &str,
    ) -> Result<DocumentPath, ProviderError> {
        let (root_id, parent_id) = match parent_id {
            Some(id) => (None, id.to_string()),
            None => {
                let root = document_id_for(self.require_base_dir()?);
                (Some(root.clone()), root)
            }
        };

        let parent = self.resolve(&parent_id)?;
        let child = self.resolve(child_id)?;
        if !dir_contains(&parent, &child) {
            return Err(ProviderError::NotFound(format!(
                "{} is not found under {}",
                child.display(),
                parent.display()
            )));
        }

        let mut ids = Vec::new();
        let mut current = Some(child.as_path());
        while let Some(step) = current {
            if !dir_contains(&parent, step) {
                break;
            }
            ids.push(document_id_for(step));
            current = step.parent();
        }
        ids.reverse();

        Ok(DocumentPath { root_id, ids })
    }

    /// Creates a file, or a directory when `mime_type` is the directory marker.
    ///
    /// Name collisions are resolved by appending ` (2)`, ` (3)`, ... Returns
    /// the new document id.
    pub fn create_entry(
        &self,
        parent_id: &str,
        mime_type: &str,
        display_name: &str,
    ) -> Result<String, ProviderError> {
        if display_name.is_empty() || display_name.contains('/') {
            return Err(ProviderError::Failure(format!(
                "invalid display name: {display_name:?}"
            )));
        }

        let parent = self.resolve(parent_id)?;
        let mut candidate = parent.join(display_name);
        let mut suffix = 2;
        while fs::symlink_metadata(&candidate).is_ok() {
            candidate = parent.join(format!("{display_name} ({suffix})"));
            suffix += 1;
        }

        let result = if mime_type == MIME_TYPE_DIR {
            fs::create_dir(&candidate)
        } else {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .map(drop)
        };

        match result {
            Ok(()) => {
                info!("Created document {}", candidate.display());
                Ok(document_id_for(&candidate))
            }
            Err(e) => {
                error!("Failed to create document {}: {}", candidate.display(), e);
                Err(ProviderError::Failure(format!(
                    "failed to create document with id {}",
                    candidate.display()
                )))
            }
        }
    }

    /// Deletes a file, or a directory and everything below it.
    ///
    /// Directories are emptied bottom-up; a failing descendant does not stop
    /// the others. Fails only if the entry itself could not be removed.
    pub fn delete_entry(&self, document_id: &str) -> Result<DeleteStats, ProviderError> {
        let path = self.resolve(document_id)?;
        let mut stats = DeleteStats::default();

        if delete_recursive(&path, &mut stats) {
            info!(
                "Deleted document {} ({} entries)",
                path.display(),
                stats.attempted
            );
            Ok(stats)
        } else {
            error!(
                "Failed to delete document {} ({}/{} removals failed)",
                path.display(),
                stats.failed,
                stats.attempted
            );
            Err(ProviderError::Failure(format!(
                "failed to delete document with id {document_id}"
            )))
        }
    }

    /// Renames an entry within its parent directory.
    ///
    /// An existing entry with the new name is never replaced; the rename is
    /// reported as not found instead.
    pub fn rename_entry(
        &self,
        document_id: &str,
        display_name: &str,
    ) -> Result<String, ProviderError> {
        if display_name.is_empty() || display_name.contains('/') {
            return Err(ProviderError::Failure(format!(
                "invalid display name: {display_name:?}"
            )));
        }

        let path = self.resolve(document_id)?;
        let parent = path.parent().ok_or_else(|| {
            ProviderError::Failure(format!("cannot rename root {}", path.display()))
        })?;
        let target = parent.join(display_name);

        if fs::symlink_metadata(&target).is_ok() {
            warn!(
                "Refusing to rename {} over existing {}",
                path.display(),
                target.display()
            );
            return Err(ProviderError::NotFound(format!(
                "{} already exists",
                target.display()
            )));
        }

        fs::rename(&path, &target).map_err(|e| {
            error!(
                "Failed to rename {} to {}: {}",
                path.display(),
                target.display(),
                e
            );
            ProviderError::Failure(format!("failed to rename {document_id}"))
        })?;

        info!("Renamed {} to {}", path.display(), target.display());
        Ok(document_id_for(&target))
    }

    /// Case-insensitive file name search below `root_id`.
    ///
    /// Stops after the configured number of matches.
    pub fn search_entries(
        &self,
        root_id: &str,
        query: &str,
    ) -> Result<Vec<TreeEntry>, ProviderError> {
        let root = self.resolve(root_id)?;
        let results = search_tree(&root, &self.private_root, query, self.max_search_results);
        debug!(
            "Search for {:?} under {} matched {} entries",
            query,
            root.display(),
            results.len()
        );
        Ok(results)
    }

    /// Whether `document_id` lies within `parent_id` once both are resolved.
    ///
    /// Ids that do not resolve below the base directory are never descendants.
    pub fn is_descendant(&self, parent_id: &str, document_id: &str) -> bool {
        match (self.resolve(parent_id), self.resolve(document_id)) {
            (Ok(parent), Ok(child)) => {
                is_descendant(&document_id_for(&parent), &document_id_for(&child))
            }
            _ => false,
        }
    }

    pub fn document_type(&self, document_id: &str) -> Result<String, ProviderError> {
        let path = self.resolve(document_id)?;
        Ok(mime::mime_type_for(&path, path.is_dir()).to_string())
    }

    /// Opens the document's contents in `mode` (`r`, `w`, `rw`, ...).
    pub fn open_document(&self, document_id: &str, mode: &str) -> Result<File, ProviderError> {
        let path = self.resolve(document_id)?;
        let mode: OpenMode = mode.parse().map_err(ProviderError::Failure)?;
        mode.open_options().open(&path).map_err(|e| open_error(&path, e))
    }

    /// Opens an image document for thumbnail reading.
    ///
    /// The size hint is accepted for protocol compatibility; the whole image
    /// is returned.
    pub fn open_thumbnail(
        &self,
        document_id: &str,
        _size_hint: (u32, u32),
    ) -> Result<ThumbnailHandle, ProviderError> {
        let path = self.resolve(document_id)?;
        let mime_type = mime::mime_type_for(&path, path.is_dir());
        if !mime::is_image(mime_type) {
            return Err(ProviderError::NotFound(format!(
                "{document_id} has no thumbnail ({mime_type})"
            )));
        }

        let file = File::open(&path).map_err(|e| open_error(&path, e))?;
        let length = file
            .metadata()
            .map_err(|e| ProviderError::Failure(e.to_string()))?
            .len();
        Ok(ThumbnailHandle {
            file,
            start_offset: 0,
            length,
        })
    }
}

fn open_error(path: &Path, e: io::Error) -> ProviderError {
    match e.kind() {
        io::ErrorKind::NotFound => ProviderError::NotFound(path.display().to_string()),
        _ => ProviderError::Failure(format!("cannot open {}: {}", path.display(), e)),
    }
}
