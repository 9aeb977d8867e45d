//! Document protocol server
//!
//! Accepts TCP connections and serves the document protocol, one task per
//! client.

pub mod core;
pub mod session;

pub use self::core::Server;
