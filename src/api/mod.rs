// src/api/mod.rs
//! Document API interaction: the ability to retrieve a docx document and
//! its assets.
//!
//! Business logic depends on [`DocumentRepository`], never on HTTP details.
//! The HTTP implementation, response parsing and rate limiting live in the
//! submodules.

pub mod adapter;
pub mod client;
pub mod parser;
pub mod rate_limiter;
mod responses;

use crate::error::AppError;
use crate::model::{Block, DocumentContent, DocumentInfo};
use crate::types::DocumentId;
use std::path::Path;

/// The ability to retrieve documents and their binary assets.
#[async_trait::async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn get_document_info(&self, id: &DocumentId) -> Result<DocumentInfo, AppError>;

    /// Metadata plus every block of the document, keyed by block id.
    async fn get_document_raw_content(&self, id: &DocumentId) -> Result<DocumentContent, AppError>;

    /// Blocks reachable from the page block, in document order.
    fn get_ordered_blocks(&self, content: &DocumentContent) -> Vec<Block> {
        content
            .forest()
            .ordered_blocks()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Downloads a media file (image or attachment) to `dest`.
    async fn download_file(&self, token: &str, dest: &Path) -> Result<(), AppError>;

    /// Exports a board as PNG to `dest`.
    async fn export_board(&self, token: &str, dest: &Path) -> Result<(), AppError>;
}

pub use client::FeishuHttpClient;
pub use rate_limiter::RateLimiter;
