// src/output/paths.rs
//! Pure functions for path calculations and filename generation.
//!
//! The renderer and the asset coordinator both derive asset locations from
//! here, so an `<img src>` always names the file the coordinator writes.

use crate::constants::{FILES_DIR, IMAGES_DIR, MAX_TITLE_STEM_CHARS};
use crate::model::Block;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Relative location of an image or board snapshot: `images/<token>.png`.
pub fn image_relative_path(token: &str) -> String {
    format!("{}/{}.png", IMAGES_DIR, sanitize_filename(token))
}

/// Relative location of an attachment: `files/<name>`, or
/// `files/<token>` when the block carries no file name.
pub fn file_relative_path(name: &str, token: &str) -> String {
    let base = if name.trim().is_empty() { token } else { name };
    format!("{}/{}", FILES_DIR, sanitize_filename(base))
}

/// Attachment destinations of one document, keyed by media token.
///
/// The first attachment to use a name keeps `files/<name>`; a later one with
/// a different token and the same name gets `files/<token>_<name>`. Build it
/// from the blocks in document order so every user agrees on who is first.
#[derive(Debug, Clone, Default)]
pub struct AttachmentPaths {
    by_token: HashMap<String, String>,
}

impl AttachmentPaths {
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        let mut by_token = HashMap::new();
        let mut taken = HashSet::new();

        for block in blocks {
            let Block::File(file) = block else { continue };
            if file.token.is_empty() || by_token.contains_key(&file.token) {
                continue;
            }
            let mut path = file_relative_path(&file.name, &file.token);
            if taken.contains(&path) {
                path = file_relative_path(&format!("{}_{}", file.token, file.name), &file.token);
                log::debug!("Attachment name {} is shared; saving {} as {}", file.name, file.token, path);
            }
            taken.insert(path.clone());
            by_token.insert(file.token.clone(), path);
        }

        Self { by_token }
    }

    /// Destination of the attachment `token`. Tokens not seen at build time
    /// fall back to [`file_relative_path`].
    pub fn path_for(&self, name: &str, token: &str) -> String {
        self.by_token
            .get(token)
            .cloned()
            .unwrap_or_else(|| file_relative_path(name, token))
    }
}

/// Joins a forward-slash relative path onto `base`.
pub fn resolve_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(base.to_path_buf(), |path, part| path.join(part))
}

/// File name of the exported HTML: sanitized title plus the document id.
pub fn html_file_name(title: &str, document_id: &str) -> String {
    document_file_name(title, document_id, "html")
}

/// File name of the block dump written by `--dump-blocks`.
pub fn blocks_dump_file_name(title: &str, document_id: &str) -> String {
    document_file_name(title, document_id, "blocks.json")
}

fn document_file_name(title: &str, document_id: &str, extension: &str) -> String {
    let safe_title = sanitize_filename(title);
    if safe_title == "unnamed" {
        format!("Untitled_{}.{}", document_id, extension)
    } else {
        format!("{}_{}.{}", safe_title, document_id, extension)
    }
}

/// Sanitizes a string to be safe for use as a filename.
pub fn sanitize_filename(name: &str) -> String {
    let safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();

    // Trim whitespace and dots
    let trimmed = safe_name.trim().trim_matches('.');

    // Limit length on a character boundary
    let limited: String = trimmed.chars().take(MAX_TITLE_STEM_CHARS).collect();
    let limited = limited.trim_end();

    if limited.is_empty() {
        "unnamed".to_string()
    } else {
        limited.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello/World"), "Hello_World");
        assert_eq!(sanitize_filename("Test:File*Name"), "Test_File_Name");
        assert_eq!(sanitize_filename("   spaces   "), "spaces");
        assert_eq!(sanitize_filename("...dots..."), "dots");
        assert_eq!(sanitize_filename(""), "unnamed");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
    }

    #[test]
    fn test_long_titles_are_cut_on_char_boundaries() {
        let title = "文档".repeat(100);
        let safe = sanitize_filename(&title);
        assert_eq!(safe.chars().count(), MAX_TITLE_STEM_CHARS);
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(image_relative_path("boxAbc"), "images/boxAbc.png");
        assert_eq!(file_relative_path("report.pdf", "boxF"), "files/report.pdf");
        assert_eq!(file_relative_path("", "boxF"), "files/boxF");
        assert_eq!(file_relative_path("a/b.txt", "boxF"), "files/a_b.txt");
    }

    #[test]
    fn test_attachments_sharing_a_name_get_distinct_paths() {
        use crate::model::{BlockCommon, FileBlock};
        use crate::types::BlockId;

        let file = |block_id: &str, token: &str, name: &str| {
            Block::File(FileBlock {
                common: BlockCommon::new(BlockId::parse(block_id).unwrap()),
                token: token.to_string(),
                name: name.to_string(),
            })
        };
        let blocks = vec![
            file("f1", "boxA", "report.pdf"),
            file("f2", "boxB", "report.pdf"),
            file("f3", "boxA", "report.pdf"),
            file("f4", "boxC", "notes.txt"),
        ];
        let paths = AttachmentPaths::from_blocks(&blocks);

        assert_eq!(paths.path_for("report.pdf", "boxA"), "files/report.pdf");
        assert_eq!(paths.path_for("report.pdf", "boxB"), "files/boxB_report.pdf");
        assert_eq!(paths.path_for("notes.txt", "boxC"), "files/notes.txt");
        assert_eq!(paths.path_for("other.txt", "boxZ"), "files/other.txt");
    }

    #[test]
    fn test_html_file_name() {
        assert_eq!(html_file_name("Weekly Plan", "doxAbc"), "Weekly Plan_doxAbc.html");
        assert_eq!(html_file_name("", "doxAbc"), "Untitled_doxAbc.html");
        assert_eq!(
            blocks_dump_file_name("Plan", "doxAbc"),
            "Plan_doxAbc.blocks.json"
        );
    }

    #[test]
    fn test_resolve_relative() {
        let base = Path::new("/out");
        assert_eq!(
            resolve_relative(base, "images/x.png"),
            Path::new("/out").join("images").join("x.png")
        );
    }
}
