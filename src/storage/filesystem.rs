//! File system operations
//!
//! Free-space probing, timestamps and recursive deletion.

use log::warn;
use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Bytes available to unprivileged callers on the filesystem holding `path`.
///
/// Returns 0 when the filesystem cannot be queried.
#[cfg(unix)]
pub fn available_bytes(path: &Path) -> u64 {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return 0;
    };
    // SAFETY: statvfs only writes into the zeroed struct we own.
    unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
            return 0;
        }
        (stat.f_bavail as u64).saturating_mul(stat.f_frsize as u64)
    }
}

#[cfg(not(unix))]
pub fn available_bytes(_path: &Path) -> u64 {
    0
}

/// Last modification time in milliseconds since the Unix epoch, 0 if unknown.
pub fn last_modified_millis(metadata: &fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|dur| dur.as_millis() as u64)
        .unwrap_or(0)
}

/// Tally of a recursive deletion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteStats {
    pub attempted: usize,
    pub failed: usize,
}

/// Deletes `path` bottom-up, children before their parent.
///
/// Every descendant is attempted even after earlier failures. Symlinks are
/// removed, never followed. Returns whether `path` itself was removed.
pub fn delete_recursive(path: &Path, stats: &mut DeleteStats) -> bool {
    delete_tree(path, stats, &mut remove_node)
}

fn remove_node(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// [`delete_recursive`] with the per-node removal supplied by the caller.
pub fn delete_tree<F>(path: &Path, stats: &mut DeleteStats, remove: &mut F) -> bool
where
    F: FnMut(&Path, bool) -> io::Result<()>,
{
    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if is_dir {
        match fs::read_dir(path) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    delete_tree(&entry.path(), stats, remove);
                }
            }
            Err(e) => warn!("Cannot list {} for deletion: {}", path.display(), e),
        }
    }

    stats.attempted += 1;
    match remove(path, is_dir) {
        Ok(()) => true,
        Err(e) => {
            stats.failed += 1;
            warn!("Failed to delete {}: {}", path.display(), e);
            false
        }
    }
}
