//! File permissions
//!
//! Handles write-permission probing for entry flags.

use std::path::Path;

/// Check if the calling process may write to `path`
#[cfg(unix)]
pub fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

/// Check if the calling process may write to `path`
#[cfg(not(unix))]
pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_temp_dir_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_writable(dir.path()));
    }

    #[test]
    fn missing_path_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_writable(&dir.path().join("nope")));
    }
}
