// src/api/responses.rs
//! Wire types for the docx open API.
//!
//! These mirror the JSON exactly and are converted into the domain model by
//! [`super::adapter`]. Everything optional on the wire is optional or
//! defaulted here so a sparse block still deserializes.

use serde::Deserialize;
use serde_json::{Map, Value};

/// The `{code, msg, data}` envelope every JSON endpoint answers with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// The token endpoint answers without a `data` wrapper.
#[derive(Debug, Deserialize)]
pub struct TenantTokenResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub tenant_access_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expire: u64,
}

#[derive(Debug, Deserialize)]
pub struct DocumentData {
    pub document: RawDocument,
}

#[derive(Debug, Deserialize)]
pub struct RawDocument {
    pub document_id: String,
    #[serde(default)]
    pub revision_id: i64,
    #[serde(default)]
    pub title: String,
}

/// One page of the block listing.
#[derive(Debug, Deserialize)]
pub struct BlockPage {
    #[serde(default)]
    pub items: Vec<RawBlock>,
    #[serde(default)]
    pub has_more: bool,
    pub page_token: Option<String>,
}

/// A block as listed. The variant payload sits under a key named after the
/// block type (`text`, `heading2`, `image`, ...) and is kept untyped until
/// the adapter knows which shape to expect.
#[derive(Debug, Deserialize)]
pub struct RawBlock {
    pub block_id: String,
    pub block_type: u32,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub comment_ids: Vec<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawText {
    #[serde(default)]
    pub elements: Vec<RawTextElement>,
    #[serde(default)]
    pub style: RawTextStyle,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTextStyle {
    pub align: Option<u8>,
    #[serde(default)]
    pub done: bool,
    pub language: Option<u32>,
    #[serde(default)]
    pub wrap: bool,
    pub sequence: Option<String>,
}

/// Exactly one of the fields is set per element.
#[derive(Debug, Default, Deserialize)]
pub struct RawTextElement {
    pub text_run: Option<RawTextRun>,
    pub mention_user: Option<RawMentionUser>,
    pub mention_doc: Option<RawMentionDoc>,
    pub equation: Option<RawTextRun>,
    pub file: Option<RawInlineFile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTextRun {
    #[serde(default)]
    pub content: String,
    pub text_element_style: Option<RawTextElementStyle>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMentionUser {
    #[serde(default)]
    pub user_id: String,
    pub text_element_style: Option<RawTextElementStyle>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMentionDoc {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub text_element_style: Option<RawTextElementStyle>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawInlineFile {
    #[serde(default)]
    pub file_token: String,
    pub text_element_style: Option<RawTextElementStyle>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTextElementStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub inline_code: bool,
    pub text_color: Option<u8>,
    pub background_color: Option<u8>,
    pub link: Option<RawLink>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub token: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub align: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFile {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCallout {
    pub background_color: Option<u8>,
    pub border_color: Option<u8>,
    pub text_color: Option<u8>,
    pub emoji_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTable {
    #[serde(default)]
    pub cells: Vec<String>,
    pub property: Option<RawTableProperty>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTableProperty {
    #[serde(default)]
    pub row_size: u32,
    #[serde(default)]
    pub column_size: u32,
    #[serde(default)]
    pub column_width: Vec<u32>,
    #[serde(default)]
    pub merge_info: Vec<RawMergeInfo>,
    #[serde(default)]
    pub header_row: bool,
    #[serde(default)]
    pub header_column: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMergeInfo {
    #[serde(default = "one")]
    pub row_span: u32,
    #[serde(default = "one")]
    pub col_span: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGrid {
    #[serde(default)]
    pub column_size: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGridColumn {
    #[serde(default)]
    pub width_ratio: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawIframe {
    #[serde(default)]
    pub component: RawIframeComponent,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawIframeComponent {
    #[serde(default)]
    pub iframe_type: u32,
    #[serde(default)]
    pub url: String,
}

/// Shared by sheets and bitables.
#[derive(Debug, Default, Deserialize)]
pub struct RawEmbeddedToken {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub view_type: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawChatCard {
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawView {
    #[serde(default)]
    pub view_type: u8,
}
