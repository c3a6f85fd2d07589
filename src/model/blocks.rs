use super::common::BlockCommon;
use super::text::{Align, TextBlockContent};
use crate::types::{BackgroundColor, BlockId, FontColor};
use serde::{Deserialize, Serialize};

/// Document root block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Plain paragraph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading block, level 1 through 9
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadingBlock {
    pub common: BlockCommon,
    pub level: u8,
    pub content: TextBlockContent,
}

impl HeadingBlock {
    /// HTML only has six heading levels; deeper levels collapse onto `h6`.
    pub fn html_level(&self) -> u8 {
        self.level.clamp(1, 6)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BulletBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderedBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    /// Explicit sequence number; `None` when the API reports `auto`.
    pub sequence: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub language: u32,
    pub wrap: bool,
}

impl CodeBlock {
    pub fn language_name(&self) -> &'static str {
        code_language_name(self.language)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Block-level equation; content holds the LaTeX source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquationBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitableBlock {
    pub common: BlockCommon,
    pub token: String,
    pub view_type: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub background_color: Option<BackgroundColor>,
    pub border_color: Option<FontColor>,
    pub text_color: Option<FontColor>,
    pub emoji_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatCardBlock {
    pub common: BlockCommon,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// File attachment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileBlock {
    pub common: BlockCommon,
    pub token: String,
    pub name: String,
}

/// Multi-column layout; children are grid columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBlock {
    pub common: BlockCommon,
    pub column_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridColumnBlock {
    pub common: BlockCommon,
    pub width_ratio: u32,
}

/// Embedded third-party page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IframeBlock {
    pub common: BlockCommon,
    pub iframe_type: u32,
    /// Percent-encoded, as delivered.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageBlock {
    pub common: BlockCommon,
    pub token: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub align: Align,
}

/// Embedded spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetBlock {
    pub common: BlockCommon,
    pub token: String,
}

/// A merged-cell span; `1 x 1` means no merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeSpan {
    pub row_span: u32,
    pub col_span: u32,
}

impl Default for MergeSpan {
    fn default() -> Self {
        Self {
            row_span: 1,
            col_span: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableProperty {
    pub row_size: u32,
    pub column_size: u32,
    pub column_width: Vec<u32>,
    /// Row-major, one entry per cell when present.
    pub merge_info: Vec<MergeSpan>,
    pub header_row: bool,
    pub header_column: bool,
}

/// Table block; `cells` lists table-cell ids in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub cells: Vec<BlockId>,
    pub property: Option<TableProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableCellBlock {
    pub common: BlockCommon,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewBlock {
    pub common: BlockCommon,
    pub view_type: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteContainerBlock {
    pub common: BlockCommon,
}

/// Whiteboard, exported as a PNG snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardBlock {
    pub common: BlockCommon,
    pub token: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub align: Align,
}

/// Any block type this exporter does not know; emits no markup of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UndefinedBlock {
    pub common: BlockCommon,
    pub raw_type: u32,
}

/// Maps the API's numeric code-language enum onto a highlighter class name.
pub fn code_language_name(language: u32) -> &'static str {
    match language {
        1 => "plaintext",
        2 => "abap",
        3 => "ada",
        4 => "apache",
        5 => "apex",
        6 => "assembly",
        7 => "bash",
        8 => "csharp",
        9 => "cpp",
        10 => "c",
        11 => "cobol",
        12 => "css",
        13 => "coffeescript",
        14 => "d",
        15 => "dart",
        16 => "delphi",
        17 => "django",
        18 => "dockerfile",
        19 => "erlang",
        20 => "fortran",
        21 => "foxpro",
        22 => "go",
        23 => "groovy",
        24 => "html",
        25 => "htmlbars",
        26 => "http",
        27 => "haskell",
        28 => "json",
        29 => "java",
        30 => "javascript",
        31 => "julia",
        32 => "kotlin",
        33 => "latex",
        34 => "lisp",
        35 => "logo",
        36 => "lua",
        37 => "matlab",
        38 => "makefile",
        39 => "markdown",
        40 => "nginx",
        41 => "objectivec",
        42 => "openedgeabl",
        43 => "php",
        44 => "perl",
        45 => "postscript",
        46 => "powershell",
        47 => "prolog",
        48 => "protobuf",
        49 => "python",
        50 => "r",
        51 => "rpg",
        52 => "ruby",
        53 => "rust",
        54 => "sas",
        55 => "scss",
        56 => "sql",
        57 => "scala",
        58 => "scheme",
        59 => "scratch",
        60 => "shell",
        61 => "swift",
        62 => "thrift",
        63 => "typescript",
        64 => "vbscript",
        65 => "vbnet",
        66 => "xml",
        67 => "yaml",
        68 => "cmake",
        69 => "diff",
        70 => "gherkin",
        71 => "graphql",
        72 => "glsl",
        73 => "properties",
        74 => "solidity",
        75 => "toml",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_language_names() {
        assert_eq!(code_language_name(7), "bash");
        assert_eq!(code_language_name(53), "rust");
        assert_eq!(code_language_name(63), "typescript");
        assert_eq!(code_language_name(0), "plaintext");
        assert_eq!(code_language_name(999), "plaintext");
    }

    #[test]
    fn test_heading_level_clamps_for_html() {
        let heading = HeadingBlock {
            common: BlockCommon::new(BlockId::from_raw("h".to_string())),
            level: 9,
            content: TextBlockContent::default(),
        };
        assert_eq!(heading.html_level(), 6);
    }
}
