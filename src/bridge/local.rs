//! Host-directory content resolver
//!
//! Serves a directory on the host through tree addresses, so the bridge can
//! run where no platform resolver exists.

use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::address::{ENCODED_SEPARATOR, child_address};
use crate::bridge::resolver::{ContentResolver, DocumentRow};
use crate::error::ResolverError;
use crate::mime::{self, MIME_TYPE_DIR};
use crate::storage::OpenMode;

/// Resolves addresses below `tree_address` to paths below `base`.
#[derive(Debug, Clone)]
pub struct LocalTreeResolver {
    tree_address: String,
    base: PathBuf,
}

impl LocalTreeResolver {
    pub fn new(tree_address: impl Into<String>, base: impl Into<PathBuf>) -> Self {
        Self {
            tree_address: tree_address.into(),
            base: base.into(),
        }
    }

    pub fn tree_address(&self) -> &str {
        &self.tree_address
    }

    /// Host path named by `address`.
    pub fn path_for(&self, address: &str) -> Result<PathBuf, ResolverError> {
        let encoded = address
            .strip_prefix(&self.tree_address)
            .ok_or_else(|| ResolverError::InvalidArgument(address.to_string()))?;
        let decoded = urlencoding::decode(encoded)
            .map_err(|_| ResolverError::InvalidArgument(address.to_string()))?;

        let relative = Path::new(decoded.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ResolverError::InvalidArgument(address.to_string()));
        }
        Ok(self.base.join(relative))
    }

    fn row_for(address: &str, path: &Path, is_dir: bool) -> DocumentRow {
        DocumentRow {
            document_id: address.to_string(),
            display_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime::mime_type_for(path, is_dir).to_string(),
        }
    }
}

impl ContentResolver for LocalTreeResolver {
    fn query_document(&self, address: &str) -> Result<Option<DocumentRow>, ResolverError> {
        let path = self.path_for(address)?;
        match fs::metadata(&path) {
            Ok(metadata) => Ok(Some(Self::row_for(address, &path, metadata.is_dir()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn query_children(&self, address: &str) -> Result<Vec<DocumentRow>, ResolverError> {
        let path = self.path_for(address)?;
        if !path.is_dir() {
            return Err(ResolverError::InvalidArgument(format!(
                "{address} is not a directory"
            )));
        }

        let mut rows = Vec::new();
        for entry in fs::read_dir(&path)?.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.path().is_dir();
            rows.push(Self::row_for(
                &child_address(address.trim_end_matches(ENCODED_SEPARATOR), &name),
                &entry.path(),
                is_dir,
            ));
        }
        Ok(rows)
    }

    fn create_document(
        &self,
        parent: &str,
        mime_type: &str,
        display_name: &str,
    ) -> Result<Option<String>, ResolverError> {
        if display_name.is_empty() || display_name.contains('/') {
            return Err(ResolverError::InvalidArgument(display_name.to_string()));
        }

        let parent_path = self.path_for(parent)?;
        if !parent_path.is_dir() {
            debug!("Cannot create {display_name}: {parent} is not a directory");
            return Ok(None);
        }

        let path = parent_path.join(display_name);
        if mime_type == MIME_TYPE_DIR {
            fs::create_dir(&path)?;
        } else {
            OpenOptions::new().write(true).create_new(true).open(&path)?;
        }
        Ok(Some(child_address(parent, display_name)))
    }

    fn delete_document(&self, address: &str) -> Result<bool, ResolverError> {
        let path = self.path_for(address)?;
        if path == self.base {
            return Err(ResolverError::InvalidArgument(
                "refusing to delete the tree root".into(),
            ));
        }
        let metadata = fs::symlink_metadata(&path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        Ok(true)
    }

    fn open_document(&self, address: &str, mode: OpenMode) -> Result<File, ResolverError> {
        let path = self.path_for(address)?;
        if path.is_dir() {
            return Err(ResolverError::InvalidArgument(format!(
                "{address} is a directory"
            )));
        }
        Ok(mode.open_options().open(&path)?)
    }
}
