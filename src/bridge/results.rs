//! Bridge result types

/// What an address currently refers to.
///
/// Always queried fresh; nothing caches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceState {
    None,
    File,
    Folder,
}

/// Outcome of copying a host file into the scoped tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Bytes written to the new destination entry
    Copied(u64),
    /// An entry with the same name was already there; nothing was written
    SkippedExisting,
    Failed,
}

impl CopyOutcome {
    /// Copied and skipped both count as success for callers.
    pub fn is_success(self) -> bool {
        !matches!(self, CopyOutcome::Failed)
    }
}
