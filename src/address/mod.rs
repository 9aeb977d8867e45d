//! Scoped address helpers
//!
//! Textual manipulation of content-tree addresses. A scoped root is opaque:
//! it is only ever used as a prefix, never parsed.

mod normalize;
mod split;

pub use normalize::normalize;
pub use split::{ENCODED_SEPARATOR, SplitAddress, child_address, split_address};
