// src/lib.rs
//! feishu2html library — exports Feishu/Lark docx documents as standalone HTML.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`, `RetryPolicy`
//! - **Configuration** — `CommandLineInput`, `ExportConfig`
//! - **Domain model** — `Block` and its payloads, `TextElement`, `Forest`
//! - **Domain types** — `BlockId`, `DocumentId`, palette colours, `RenderedHtml`
//! - **API client** — `DocumentRepository`, `FeishuHttpClient`, `RateLimiter`
//! - **Formatting** — `render_blocks`, `render_document`, `StylesheetMode`
//! - **Export** — `AssetCoordinator`, `DocumentExporter`

mod analytics;
pub mod api;
pub mod assets;
mod config;
mod constants;
mod error;
mod error_recovery;
pub mod formatting;
pub mod model;
pub mod output;
mod pipeline;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, FeishuErrorCode};
pub use crate::error_recovery::{with_retry, with_retry_if, RetryPolicy};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig};
pub use crate::constants::DEFAULT_API_BASE_URL;

// --- Domain Model ---
pub use crate::model::{
    build_forest, Block, BlockCommon, BlockNode, BlockType, DocumentContent, DocumentInfo,
    Forest, TextBlockContent, TextElement, TextElementStyle,
};

// --- Domain Types ---
pub use crate::types::{
    AppCredentials, BackgroundColor, BlockId, DocumentId, FontColor, LinkTarget, RenderedHtml,
};

// --- API Client ---
pub use crate::api::{DocumentRepository, FeishuHttpClient, RateLimiter};

// --- Formatting ---
pub use crate::formatting::{render_blocks, render_document, StylesheetMode};

// --- Export ---
pub use crate::analytics::{measure_content, measure_content_detailed, ContentMeasurement};
pub use crate::assets::{AssetCoordinator, AssetReport};
pub use crate::pipeline::{DocumentExporter, ExportOutcome};
