//! docbridge
//!
//! Path-based file access over two storage models: a tree-browsing provider
//! that exposes a host directory by absolute-path document ids, and a bridge
//! that serves POSIX-like requests from a permission-scoped content tree.

pub mod address;
pub mod bridge;
pub mod config;
pub mod error;
pub mod mime;
pub mod protocol;
pub mod provider;
pub mod server;
pub mod storage;

pub use bridge::{CopyOutcome, ExistenceState, LocalTreeResolver, ScopedStorageBridge};
pub use provider::DocumentProvider;
pub use server::Server;
