//! MIME classification
//!
//! Directories get a fixed marker type; files are typed by extension.

use std::path::Path;

/// Type reported for directories.
pub const MIME_TYPE_DIR: &str = "vnd.android.document/directory";

/// Fallback for files with no known type.
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_PLAIN: &str = "text/plain";

/// Extensions treated as plain text when the table has no entry for them.
const PLAIN_TEXT_EXTENSIONS: [&str; 3] = ["lua", "md", "log"];

/// MIME type of a file name, by lowercase extension.
pub fn mime_type_for_name(name: &str) -> &'static str {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    let extension = extension.to_lowercase();

    if let Some(mime) = mime_guess::from_ext(&extension).first_raw() {
        return mime;
    }
    if PLAIN_TEXT_EXTENSIONS.contains(&extension.as_str()) {
        return TEXT_PLAIN;
    }
    OCTET_STREAM
}

/// MIME type of the entry at `path`.
pub fn mime_type_for(path: &Path, is_dir: bool) -> &'static str {
    if is_dir {
        return MIME_TYPE_DIR;
    }
    path.file_name()
        .map(|name| mime_type_for_name(&name.to_string_lossy()))
        .unwrap_or(OCTET_STREAM)
}

pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_get_the_marker() {
        assert_eq!(mime_type_for(Path::new("/x/pics.png"), true), MIME_TYPE_DIR);
    }

    #[test]
    fn known_extensions_use_the_table() {
        assert_eq!(mime_type_for_name("card.PNG"), "image/png");
        assert_eq!(mime_type_for_name("notes.txt"), "text/plain");
    }

    #[test]
    fn script_like_extensions_fall_back_to_text() {
        assert!(mime_type_for_name("c12345.lua").starts_with("text/"));
        assert!(mime_type_for_name("debug.log").starts_with("text/"));
    }

    #[test]
    fn unknown_or_missing_extension_is_binary() {
        assert_eq!(mime_type_for_name("deck.ydk"), OCTET_STREAM);
        assert_eq!(mime_type_for_name("Makefile"), OCTET_STREAM);
    }
}
