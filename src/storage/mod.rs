//! Host filesystem helpers
//!
//! Path containment, access modes, permission probes and recursive deletion
//! shared by the tree-browsing provider and the host-backed content resolver.

pub mod filesystem;
pub mod mode;
pub mod permissions;
pub mod validation;

pub use filesystem::{
    DeleteStats, available_bytes, delete_recursive, delete_tree, last_modified_millis,
};
pub use mode::OpenMode;
pub use permissions::is_writable;
pub use validation::{dir_contains, document_id_for, is_descendant};
