// src/pipeline.rs
//! The export pipeline: fetch → build forest → download assets → render → deliver.
//!
//! Documents in a batch are exported one after another. Only the asset
//! downloads of a single document run concurrently.

use crate::analytics::{measure_content_detailed, undefined_block_count};
use crate::api::{DocumentRepository, RateLimiter};
use crate::assets::{AssetCoordinator, AssetReport};
use crate::config::ExportConfig;
use crate::error::AppError;
use crate::error_recovery::{with_retry, RetryPolicy};
use crate::formatting::{render_document, StylesheetMode};
use crate::output::{deliver, plan_document_output, OutputReport};
use crate::types::DocumentId;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// What one successful export produced.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub document_id: DocumentId,
    pub title: String,
    pub html_path: Option<PathBuf>,
    pub blocks_rendered: usize,
    pub assets: AssetReport,
    pub output: OutputReport,
}

/// Exports documents from a [`DocumentRepository`] into an output directory.
pub struct DocumentExporter {
    repository: Arc<dyn DocumentRepository>,
    assets: AssetCoordinator,
    output_dir: PathBuf,
    stylesheet: StylesheetMode,
    dump_blocks: bool,
    retry: RetryPolicy,
}

impl DocumentExporter {
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        limiter: Arc<RateLimiter>,
        config: &ExportConfig,
    ) -> Self {
        let assets = AssetCoordinator::new(
            Arc::clone(&repository),
            limiter,
            config.output_dir.clone(),
            config.concurrency,
        );
        Self {
            repository,
            assets,
            output_dir: config.output_dir.clone(),
            stylesheet: config.stylesheet,
            dump_blocks: config.dump_blocks,
            retry: config.retry_policy(),
        }
    }

    /// Exports one document. Asset failures are logged and counted; any
    /// other failure is returned.
    pub async fn export_document(&self, id: &DocumentId) -> Result<ExportOutcome, AppError> {
        let started = Instant::now();
        log::info!("Exporting document {}", id);

        let content = with_retry(&self.retry, || self.repository.get_document_raw_content(id)).await?;
        let forest = content.forest();

        let metrics = measure_content_detailed(&forest, content.blocks.len());
        log::info!(
            "'{}': {} block(s), nesting depth {}, {} asset reference(s)",
            content.document.display_title(),
            metrics.total_blocks,
            metrics.deepest_nesting,
            metrics.asset_references()
        );
        if metrics.unreachable_blocks > 0 {
            log::warn!(
                "{} block(s) are not reachable from the page block and will not be exported",
                metrics.unreachable_blocks
            );
        }
        let undefined = undefined_block_count(&forest);
        if undefined > 0 {
            log::debug!("{} block(s) of an unknown type render their children only", undefined);
        }

        let ordered = self.repository.get_ordered_blocks(&content);
        let assets = self.assets.download_assets(&ordered).await;

        let html = render_document(&content, &forest, self.stylesheet)?;
        let dump = if self.dump_blocks {
            Some(serde_json::to_string_pretty(&content.blocks)?)
        } else {
            None
        };

        let plan = plan_document_output(&self.output_dir, &content.document, html, self.stylesheet, dump);
        let html_path = plan.html_path().cloned();
        let output = deliver(plan).await;
        if !output.is_success() {
            return Err(AppError::DeliveryFailed {
                failures: output.failed.iter().map(ToString::to_string).collect(),
            });
        }

        if let Some(path) = &html_path {
            log::info!(
                "Exported '{}' to {} in {:?}",
                content.document.display_title(),
                path.display(),
                started.elapsed()
            );
        }

        Ok(ExportOutcome {
            document_id: id.clone(),
            title: content.document.display_title().to_string(),
            html_path,
            blocks_rendered: metrics.total_blocks,
            assets,
            output,
        })
    }

    /// Exports every document in order. A failed document is logged and
    /// counted; the rest still run. Returns `BatchIncomplete` if any failed.
    pub async fn export_batch(&self, ids: &[DocumentId]) -> Result<Vec<ExportOutcome>, AppError> {
        let mut outcomes = Vec::with_capacity(ids.len());
        let mut failed = 0;

        for (index, id) in ids.iter().enumerate() {
            log::info!("[{}/{}] {}", index + 1, ids.len(), id);
            match self.export_document(id).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    log::error!("Failed to export {}: {}", id, e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(AppError::BatchIncomplete {
                failed,
                total: ids.len(),
            });
        }
        Ok(outcomes)
    }
}
