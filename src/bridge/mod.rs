//! Scoped storage bridge
//!
//! Serves POSIX-like file requests (classify, open, create, list, delete,
//! copy) against a content tree the host granted access to. Requests arrive as
//! plain paths and are normalized to tree addresses before every call.
//!
//! The platform side is reached through [`ContentResolver`].
//! [`LocalTreeResolver`] serves a host directory through the same addressing
//! scheme.

mod copy;
mod local;
mod operations;
mod resolver;
mod results;

pub use local::LocalTreeResolver;
pub use operations::ScopedStorageBridge;
pub use resolver::{ContentResolver, DocumentRow};
pub use results::{CopyOutcome, ExistenceState};
