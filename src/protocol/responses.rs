//! Protocol response handling
//!
//! Defines reply codes and the line formats for roots and entries.

use crate::provider::{RootRecord, TreeEntry};

pub const OK: u16 = 200;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
/// Data follows the reply line
pub const FILE_STATUS_OK: u16 = 150;
pub const ACTION_OK: u16 = 250;
pub const CREATED: u16 = 257;
pub const SERVICE_UNAVAILABLE: u16 = 421;

/// Format a reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

fn flag(set: bool, c: char) -> char {
    if set { c } else { '-' }
}

/// `id \t name \t mime \t size \t mtime \t flags`, flags as `wdrtc`.
pub fn format_entry(entry: &TreeEntry) -> String {
    let flags: String = [
        flag(entry.flags.supports_write, 'w'),
        flag(entry.flags.supports_delete, 'd'),
        flag(entry.flags.supports_rename, 'r'),
        flag(entry.flags.supports_thumbnail, 't'),
        flag(entry.flags.dir_supports_create, 'c'),
    ]
    .iter()
    .collect();

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\r\n",
        entry.document_id,
        entry.display_name,
        entry.mime_type,
        entry.size,
        entry.last_modified,
        flags
    )
}

/// `root id \t document id \t title \t flags \t available bytes \t mime types`, flags as `csi`.
pub fn format_root(root: &RootRecord) -> String {
    let flags: String = [
        flag(root.flags.supports_create, 'c'),
        flag(root.flags.supports_search, 's'),
        flag(root.flags.supports_is_child, 'i'),
    ]
    .iter()
    .collect();

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\r\n",
        root.root_id, root.document_id, root.title, flags, root.available_bytes, root.mime_types
    )
}

/// A `150` header, one line per item and a closing `226`.
pub fn format_listing<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = format_response(FILE_STATUS_OK, "Listing follows");
    let mut count = 0usize;
    for line in lines {
        out.push_str(&line);
        count += 1;
    }
    out.push_str(&format_response(
        TRANSFER_COMPLETE,
        &format!("{count} entries"),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::EntryFlags;

    #[test]
    fn entry_line_has_six_fields() {
        let entry = TreeEntry {
            document_id: "/data/a b.png".into(),
            display_name: "a b.png".into(),
            mime_type: "image/png".into(),
            size: 12,
            last_modified: 1_700_000_000_000,
            flags: EntryFlags {
                supports_write: true,
                supports_thumbnail: true,
                ..EntryFlags::default()
            },
        };
        assert_eq!(
            format_entry(&entry),
            "/data/a b.png\ta b.png\timage/png\t12\t1700000000000\tw--t-\r\n"
        );
    }

    #[test]
    fn listing_is_framed() {
        let out = format_listing(vec!["x\r\n".to_string()]);
        assert_eq!(out, "150 Listing follows\r\nx\r\n226 1 entries\r\n");
    }
}
