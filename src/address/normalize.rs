//! Path normalization

/// Rewrites an application path into an address under `scoped_root`.
///
/// A leading `scoped_root` is stripped, the remainder is percent-encoded
/// (separators included) and the literal root is put back in front.
pub fn normalize(scoped_root: &str, path: &str) -> String {
    let relative = path.strip_prefix(scoped_root).unwrap_or(path);
    format!("{scoped_root}{}", urlencoding::encode(relative))
}
