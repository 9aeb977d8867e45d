//! Bridge operations
//!
//! Every public operation normalizes its path, runs against the resolver and
//! collapses failures into a plain signal (`false`, `None`, `-1`, an empty
//! list). Classification and creation are separate resolver calls; the tree
//! can change between them.

use log::{debug, error, info, warn};
use std::fs::File;
use std::path::Path;

use crate::address::{self, split_address};
use crate::bridge::copy::{DEFAULT_BUFFER_SIZE, stream_copy};
use crate::bridge::resolver::ContentResolver;
use crate::bridge::results::{CopyOutcome, ExistenceState};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::mime::{MIME_TYPE_DIR, OCTET_STREAM};
use crate::storage::OpenMode;

/// POSIX-like file access over a granted scoped tree.
#[derive(Debug, Clone)]
pub struct ScopedStorageBridge<R> {
    resolver: R,
    scoped_root: String,
    buffer_size: usize,
}

impl<R: ContentResolver> ScopedStorageBridge<R> {
    pub fn new(resolver: R, scoped_root: impl Into<String>) -> Self {
        Self {
            resolver,
            scoped_root: scoped_root.into(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn from_config(resolver: R, config: &BridgeConfig) -> Self {
        Self::new(resolver, config.scoped_root.clone()).with_buffer_size(config.copy_buffer_size)
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn scoped_root(&self) -> &str {
        &self.scoped_root
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Tree address for an application path.
    pub fn normalize(&self, path: &str) -> String {
        address::normalize(&self.scoped_root, path)
    }

    /// Classifies an already-normalized address.
    pub fn classify(&self, address: &str) -> ExistenceState {
        match self.resolver.query_document(address) {
            Ok(Some(row)) if row.is_directory() => ExistenceState::Folder,
            Ok(Some(_)) => ExistenceState::File,
            Ok(None) => ExistenceState::None,
            Err(e) => {
                debug!("Failed query for {address}: {e}");
                ExistenceState::None
            }
        }
    }

    /// Classifies an application path.
    pub fn exists(&self, path: &str) -> ExistenceState {
        self.classify(&self.normalize(path))
    }

    /// Ensures a directory exists at `path`, creating the last component if needed.
    pub fn create_directory(&self, path: &str) -> bool {
        let address = self.normalize(path);
        let result = match self.classify(&address) {
            ExistenceState::Folder => Ok(()),
            ExistenceState::None => self.create_at(&address, MIME_TYPE_DIR),
            ExistenceState::File => Err(BridgeError::Failure(format!(
                "{address} exists and is a file"
            ))),
        };
        report("create_directory", path, result).is_some()
    }

    /// Creates an empty binary file named by the encoded `leaf_name` below `parent_address`.
    pub fn create_file(&self, parent_address: &str, leaf_name: &str) -> bool {
        let name = urlencoding::decode(leaf_name)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| leaf_name.to_string());
        let result = self.create_child(parent_address, &name, OCTET_STREAM);
        report("create_file", parent_address, result).is_some()
    }

    /// Opens `path` in `mode`, creating it first for write-capable modes.
    pub fn open(&self, path: &str, mode: &str) -> Option<File> {
        let result = self.try_open(path, mode);
        report("open", path, result)
    }

    /// Like [`open`](Self::open), handing the raw descriptor to the caller.
    ///
    /// Returns -1 on failure. The caller owns and must close the descriptor.
    #[cfg(unix)]
    pub fn open_fd(&self, path: &str, mode: &str) -> std::os::fd::RawFd {
        use std::os::fd::IntoRawFd;

        self.open(path, mode).map_or(-1, IntoRawFd::into_raw_fd)
    }

    /// Names of the children of the directory at `path`.
    ///
    /// Directories carry a trailing `/`. Empty if `path` is not a readable directory.
    pub fn list(&self, path: &str) -> Vec<String> {
        let address = self.normalize(path);
        match self.resolver.query_children(&address) {
            Ok(rows) => rows
                .into_iter()
                .map(|row| {
                    if row.is_directory() {
                        format!("{}/", row.display_name)
                    } else {
                        row.display_name
                    }
                })
                .collect(),
            Err(e) => {
                report::<()>("list", path, Err(e.into()));
                Vec::new()
            }
        }
    }

    /// Deletes the entry at `path`.
    pub fn remove(&self, path: &str) -> bool {
        let address = self.normalize(path);
        let result = match self.resolver.query_document(&address) {
            Ok(Some(_)) => self
                .resolver
                .delete_document(&address)
                .map_err(BridgeError::from)
                .and_then(|deleted| {
                    if deleted {
                        Ok(())
                    } else {
                        Err(BridgeError::Failure(format!("{address} was not deleted")))
                    }
                }),
            Ok(None) => Err(BridgeError::NotFound(address.clone())),
            Err(e) => Err(e.into()),
        };
        report("remove", path, result).is_some()
    }

    /// Copies a host file into the directory at `dest_parent`, keeping its name.
    ///
    /// An existing entry of that name is left alone and reported as skipped.
    pub fn copy_into(&self, source: &Path, dest_parent: &str) -> CopyOutcome {
        let Some(name) = source.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            error!("copy_into: {} has no file name", source.display());
            return CopyOutcome::Failed;
        };
        let address = self.normalize(&format!("{dest_parent}/{name}"));

        if self.classify(&address) != ExistenceState::None {
            debug!("copy_into: {address} already exists, skipping");
            return CopyOutcome::SkippedExisting;
        }

        match self.try_copy(source, &address) {
            Ok(bytes) => {
                info!("Copied {} to {} ({} bytes)", source.display(), address, bytes);
                CopyOutcome::Copied(bytes)
            }
            Err(e) => {
                error!("Unexpected copy_into failure for {}: {}", source.display(), e);
                CopyOutcome::Failed
            }
        }
    }

    /// Whether the granted permission on the scoped root is still valid.
    pub fn has_access(&self) -> bool {
        let root = self.normalize(&self.scoped_root);
        match self.resolver.query_children(&root) {
            Ok(_) => true,
            Err(e) => match BridgeError::from(e) {
                BridgeError::PermissionDenied(msg) => {
                    debug!("Access to {root} revoked: {msg}");
                    false
                }
                other => {
                    error!("Unknown error probing access to {root}: {other}");
                    false
                }
            },
        }
    }

    fn try_open(&self, path: &str, mode: &str) -> Result<File, BridgeError> {
        let mode: OpenMode = mode.parse().map_err(BridgeError::Failure)?;
        let address = self.normalize(path);

        match self.classify(&address) {
            ExistenceState::Folder => {
                return Err(BridgeError::Failure(format!("{address} is a directory")));
            }
            ExistenceState::None if mode.is_read_only() => {
                return Err(BridgeError::NotFound(address));
            }
            ExistenceState::None => self.create_at(&address, OCTET_STREAM)?,
            ExistenceState::File => {}
        }

        Ok(self.resolver.open_document(&address, mode)?)
    }

    fn try_copy(&self, source: &Path, address: &str) -> Result<u64, BridgeError> {
        let mut input = File::open(source)?;
        self.create_at(address, OCTET_STREAM)?;
        let mut output = self.resolver.open_document(address, OpenMode::Write)?;
        Ok(stream_copy(&mut input, &mut output, self.buffer_size)?)
    }

    /// Creates the entry named by the last component of `address`.
    fn create_at(&self, address: &str, mime_type: &str) -> Result<(), BridgeError> {
        let split = split_address(address)
            .ok_or_else(|| BridgeError::Failure(format!("cannot split {address}")))?;
        self.create_child(split.parent, &split.decoded_leaf(), mime_type)
    }

    fn create_child(&self, parent: &str, name: &str, mime_type: &str) -> Result<(), BridgeError> {
        match self.resolver.create_document(parent, mime_type, name)? {
            Some(created) => {
                debug!("Created {created}");
                Ok(())
            }
            None => Err(BridgeError::Failure(format!(
                "could not resolve {parent} to create {name}"
            ))),
        }
    }
}

/// Logs a failed operation and collapses the result to an `Option`.
fn report<T>(operation: &str, path: &str, result: Result<T, BridgeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(BridgeError::NotFound(address)) => {
            debug!("{operation}: {path} not found ({address})");
            None
        }
        Err(e) => {
            warn!("{operation} failed for {path}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::LocalTreeResolver;
    use crate::bridge::resolver::DocumentRow;
    use crate::error::ResolverError;
    use std::fs;
    use std::io::{Read, Write};

    const ROOT: &str = "content://local/tree/primary%3AGame";

    fn bridge_for(dir: &Path) -> ScopedStorageBridge<LocalTreeResolver> {
        ScopedStorageBridge::new(LocalTreeResolver::new(ROOT, dir), ROOT)
    }

    fn path(rel: &str) -> String {
        format!("{ROOT}/{rel}")
    }

    #[test]
    fn classify_reports_the_three_states() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("deck")).unwrap();
        fs::write(dir.path().join("deck/a.ydk"), b"#main").unwrap();
        let bridge = bridge_for(dir.path());

        assert_eq!(bridge.exists(&path("deck")), ExistenceState::Folder);
        assert_eq!(bridge.exists(&path("deck/a.ydk")), ExistenceState::File);
        assert_eq!(bridge.exists(&path("deck/b.ydk")), ExistenceState::None);
        assert_eq!(bridge.classify("garbage"), ExistenceState::None);
    }

    #[test]
    fn create_directory_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_for(dir.path());

        assert!(bridge.create_directory(&path("replay")));
        assert!(dir.path().join("replay").is_dir());
        assert!(bridge.create_directory(&path("replay/")));
    }

    #[test]
    fn create_directory_over_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("replay"), b"").unwrap();
        let bridge = bridge_for(dir.path());
        assert!(!bridge.create_directory(&path("replay")));
    }

    #[test]
    fn create_directory_without_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_for(dir.path());
        assert!(!bridge.create_directory(&path("a/b")));
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn create_file_decodes_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_for(dir.path());
        assert!(bridge.create_file(ROOT, "new%20deck.ydk"));
        assert!(dir.path().join("new deck.ydk").is_file());
        assert!(!bridge.create_file(&format!("{ROOT}%2Fmissing"), "x"));
    }

    #[test]
    fn read_only_open_of_missing_file_has_no_side_effect() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_for(dir.path());

        assert!(bridge.open(&path("ghost.txt"), "r").is_none());
        assert!(!dir.path().join("ghost.txt").exists());
    }

    #[test]
    fn write_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_for(dir.path());

        let mut file = bridge.open(&path("new.txt"), "w").unwrap();
        file.write_all(b"hello").unwrap();
        drop(file);
        assert_eq!(fs::read(dir.path().join("new.txt")).unwrap(), b"hello");

        let mut file = bridge.open(&path("new.txt"), "r").unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn open_rejects_folders_and_bad_modes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("deck")).unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        let bridge = bridge_for(dir.path());

        assert!(bridge.open(&path("deck"), "rw").is_none());
        assert!(bridge.open(&path("a.txt"), "").is_none());
        assert!(bridge.open(&path("a.txt"), "zz").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn open_fd_hands_over_descriptor() {
        use std::os::fd::FromRawFd;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        let bridge = bridge_for(dir.path());

        assert_eq!(bridge.open_fd(&path("missing"), "r"), -1);

        let fd = bridge.open_fd(&path("a.txt"), "r");
        assert!(fd >= 0);
        // SAFETY: the bridge gave up ownership of fd.
        let mut file = unsafe { File::from_raw_fd(fd) };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"abc");
    }

    #[test]
    fn list_marks_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("deck")).unwrap();
        fs::write(dir.path().join("config.conf"), b"").unwrap();
        let bridge = bridge_for(dir.path());

        let mut names = bridge.list(ROOT);
        names.sort();
        assert_eq!(names, vec!["config.conf".to_string(), "deck/".to_string()]);
        assert!(bridge.list(&path("config.conf")).is_empty());
        assert!(bridge.list(&path("nowhere")).is_empty());
    }

    #[test]
    fn remove_deletes_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        let bridge = bridge_for(dir.path());

        assert!(bridge.remove(&path("a.txt")));
        assert!(!dir.path().join("a.txt").exists());
        assert!(!bridge.remove(&path("a.txt")));
    }

    #[test]
    fn copy_into_streams_and_skips_existing() {
        let src_dir = tempfile::tempdir().unwrap();
        let tree = tempfile::tempdir().unwrap();
        fs::create_dir(tree.path().join("pics")).unwrap();
        let source = src_dir.path().join("a.txt");
        fs::write(&source, vec![7u8; 5000]).unwrap();
        let bridge = bridge_for(tree.path()).with_buffer_size(1024);

        assert_eq!(bridge.copy_into(&source, &path("pics")), CopyOutcome::Copied(5000));
        assert_eq!(fs::read(tree.path().join("pics/a.txt")).unwrap(), vec![7u8; 5000]);

        fs::write(&source, b"changed").unwrap();
        let outcome = bridge.copy_into(&source, &path("pics"));
        assert_eq!(outcome, CopyOutcome::SkippedExisting);
        assert!(outcome.is_success());
        assert_eq!(fs::read(tree.path().join("pics/a.txt")).unwrap(), vec![7u8; 5000]);
    }

    #[test]
    fn copy_into_missing_source_fails_without_creating() {
        let tree = tempfile::tempdir().unwrap();
        let bridge = bridge_for(tree.path());
        let outcome = bridge.copy_into(&tree.path().join("nope.bin"), ROOT);
        assert_eq!(outcome, CopyOutcome::Failed);
        assert!(!tree.path().join("nope.bin").exists());
    }

    /// Resolver whose every call fails with the error `fail` builds.
    struct FailingResolver {
        fail: fn() -> ResolverError,
    }

    impl FailingResolver {
        fn denied() -> Self {
            Self {
                fail: || ResolverError::PermissionDenied("revoked".into()),
            }
        }

        fn broken() -> Self {
            Self {
                fail: || ResolverError::Io(std::io::Error::other("provider crashed")),
            }
        }
    }

    impl ContentResolver for FailingResolver {
        fn query_document(&self, _: &str) -> Result<Option<DocumentRow>, ResolverError> {
            Err((self.fail)())
        }

        fn query_children(&self, _: &str) -> Result<Vec<DocumentRow>, ResolverError> {
            Err((self.fail)())
        }

        fn create_document(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<Option<String>, ResolverError> {
            Err((self.fail)())
        }

        fn delete_document(&self, _: &str) -> Result<bool, ResolverError> {
            Err((self.fail)())
        }

        fn open_document(&self, _: &str, _: OpenMode) -> Result<File, ResolverError> {
            Err((self.fail)())
        }
    }

    #[test]
    fn revoked_permission_collapses_to_failure_signals() {
        let bridge = ScopedStorageBridge::new(FailingResolver::denied(), ROOT);
        assert!(!bridge.has_access());
        assert_eq!(bridge.exists(&path("a")), ExistenceState::None);
        assert!(bridge.list(ROOT).is_empty());
        assert!(!bridge.remove(&path("a")));
        assert!(bridge.open(&path("a"), "w").is_none());
    }

    #[test]
    fn unexpected_resolver_errors_deny_access() {
        let bridge = ScopedStorageBridge::new(FailingResolver::broken(), ROOT);
        assert!(!bridge.has_access());
        assert!(bridge.list(&path("deck")).is_empty());
        assert!(!bridge.create_directory(&path("deck")));
    }

    #[test]
    fn bridge_built_from_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir(&tree).unwrap();
        let config_path = dir.path().join("docbridge.toml");
        fs::write(
            &config_path,
            format!("[bridge]\nscoped_root = \"{ROOT}\"\ncopy_buffer_size = 3\n"),
        )
        .unwrap();
        let config = crate::config::AppConfig::load_from(config_path.to_str().unwrap()).unwrap();

        let bridge = ScopedStorageBridge::from_config(LocalTreeResolver::new(ROOT, &tree), &config.bridge);
        assert_eq!(bridge.scoped_root(), ROOT);
        assert_eq!(bridge.buffer_size, 3);

        let source = dir.path().join("deck.ydk");
        fs::write(&source, b"#main\n12345\n").unwrap();
        assert_eq!(bridge.copy_into(&source, ROOT), CopyOutcome::Copied(12));
        assert_eq!(fs::read(tree.join("deck.ydk")).unwrap(), b"#main\n12345\n");
        assert!(bridge.has_access());
    }

    #[test]
    fn has_access_on_live_tree() {
        let dir = tempfile::tempdir().unwrap();
        assert!(bridge_for(dir.path()).has_access());
    }
}
