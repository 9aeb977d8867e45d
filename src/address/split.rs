//! Address splitting
//!
//! Splits an already-encoded address at its last encoded separator.

use std::borrow::Cow;

/// Percent-encoded `/`.
pub const ENCODED_SEPARATOR: &str = "%2F";

/// An encoded address split into its parent tree address and leaf name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAddress<'a> {
    pub parent: &'a str,
    /// Leaf name, still percent-encoded.
    pub leaf: &'a str,
}

impl SplitAddress<'_> {
    /// The leaf name with percent-encoding removed.
    ///
    /// Falls back to the raw leaf if it does not decode to UTF-8.
    pub fn decoded_leaf(&self) -> Cow<'_, str> {
        urlencoding::decode(self.leaf).unwrap_or(Cow::Borrowed(self.leaf))
    }
}

/// Splits `address` into (parent, leaf) at the last encoded separator.
///
/// One trailing separator is dropped first so a directory address never
/// yields an empty leaf. Returns `None` when no separator remains.
pub fn split_address(address: &str) -> Option<SplitAddress<'_>> {
    let trimmed = address.strip_suffix(ENCODED_SEPARATOR).unwrap_or(address);
    let idx = trimmed.rfind(ENCODED_SEPARATOR)?;
    Some(SplitAddress {
        parent: &trimmed[..idx],
        leaf: &trimmed[idx + ENCODED_SEPARATOR.len()..],
    })
}

/// Address of `name` directly below `parent`.
pub fn child_address(parent: &str, name: &str) -> String {
    format!("{parent}{ENCODED_SEPARATOR}{}", urlencoding::encode(name))
}
