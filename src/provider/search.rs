//! Breadth-first file name search

use log::debug;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::entries::entry_for_path;
use crate::provider::results::TreeEntry;
use crate::storage::dir_contains;

/// Searches below `root` for files whose name contains `query`, ignoring case.
///
/// Paths that canonicalize outside `boundary` are pruned without being
/// descended into; a path that cannot be canonicalized is treated as inside.
/// Each directory is visited once even when reachable through several links.
pub(crate) fn search_tree(
    root: &Path,
    boundary: &Path,
    query: &str,
    max_results: usize,
) -> Vec<TreeEntry> {
    let query = query.to_lowercase();
    let boundary = boundary
        .canonicalize()
        .unwrap_or_else(|_| boundary.to_path_buf());

    let mut results = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut pending = VecDeque::from([root.to_path_buf()]);

    while results.len() < max_results {
        let Some(path) = pending.pop_front() else {
            break;
        };

        let canonical = path.canonicalize().ok();
        if let Some(canonical) = &canonical {
            if !dir_contains(&boundary, canonical) {
                debug!("Search pruned {} (outside {})", path.display(), boundary.display());
                continue;
            }
        }

        if path.is_dir() {
            if let Some(canonical) = canonical {
                if !visited.insert(canonical) {
                    continue;
                }
            }
            match fs::read_dir(&path) {
                Ok(entries) => pending.extend(entries.flatten().map(|entry| entry.path())),
                Err(e) => debug!("Search cannot list {}: {}", path.display(), e),
            }
            continue;
        }

        let matches = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().to_lowercase().contains(&query));
        if matches {
            if let Ok(entry) = entry_for_path(&path) {
                results.push(entry);
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Dogs")).unwrap();
        fs::write(root.join("Dogs/BigDog.png"), b"").unwrap();
        fs::write(root.join("cat.png"), b"").unwrap();

        let found = search_tree(root, root, "DOG", 50);
        let names: Vec<_> = found.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["BigDog.png"]);
    }

    #[test]
    fn stops_at_the_cap() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..60 {
            fs::write(dir.path().join(format!("dog{i}.txt")), b"").unwrap();
        }
        assert_eq!(search_tree(dir.path(), dir.path(), "dog", 50).len(), 50);
    }

    #[test]
    fn paths_outside_boundary_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let inside = dir.path().join("inside");
        let outside = dir.path().join("outside");
        fs::create_dir_all(&inside).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(inside.join("dog.txt"), b"").unwrap();
        fs::write(outside.join("dog.txt"), b"").unwrap();

        let found = search_tree(dir.path(), &inside, "dog", 50);
        // The root itself lies outside the boundary, so nothing is visited.
        assert!(found.is_empty());

        let found = search_tree(&inside, &inside, "dog", 50);
        assert_eq!(found.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycles_terminate() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        std::os::unix::fs::symlink(dir.path(), sub.join("loop")).unwrap();
        fs::write(sub.join("dog.txt"), b"").unwrap();

        let found = search_tree(dir.path(), dir.path(), "dog", 50);
        assert_eq!(found.len(), 1);
    }
}
