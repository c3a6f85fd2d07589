// src/assets/mod.rs
//! Downloads the images, attachments and board snapshots a document
//! references, so the exported HTML can point at local copies.
//!
//! Every asset becomes its own task. Tasks go through the shared rate
//! limiter and a semaphore that bounds how many run at once. A failed
//! download is logged and counted; it never cancels its siblings or the
//! export. Images (boards included) and attachments are tracked in
//! separate task sets, and [`AssetCoordinator::download_assets`] returns
//! only after both are drained.

use crate::api::{DocumentRepository, RateLimiter};
use crate::constants::{MAX_DOWNLOAD_CONCURRENCY, MIN_DOWNLOAD_CONCURRENCY};
use crate::error::AppError;
use crate::model::Block;
use crate::output::{image_relative_path, resolve_relative, AttachmentPaths};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Board,
    File,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Board => write!(f, "board"),
            AssetKind::File => write!(f, "file"),
        }
    }
}

/// One asset to fetch, with its destination relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetJob {
    pub kind: AssetKind,
    pub token: String,
    pub relative_path: String,
}

/// Collects the assets referenced by `blocks`, in document order.
///
/// A destination referenced more than once is scheduled once. Attachments
/// are placed per [`AttachmentPaths`], the same mapping the renderer links to.
pub fn collect_asset_jobs(blocks: &[Block]) -> Vec<AssetJob> {
    let attachments = AttachmentPaths::from_blocks(blocks);
    let mut seen = HashSet::new();
    let mut jobs = Vec::new();

    for block in blocks {
        let job = match block {
            Block::Image(image) if !image.token.is_empty() => AssetJob {
                kind: AssetKind::Image,
                token: image.token.clone(),
                relative_path: image_relative_path(&image.token),
            },
            Block::Board(board) if !board.token.is_empty() => AssetJob {
                kind: AssetKind::Board,
                token: board.token.clone(),
                relative_path: image_relative_path(&board.token),
            },
            Block::File(file) if !file.token.is_empty() => AssetJob {
                kind: AssetKind::File,
                token: file.token.clone(),
                relative_path: attachments.path_for(&file.name, &file.token),
            },
            _ => continue,
        };

        if seen.insert(job.relative_path.clone()) {
            jobs.push(job);
        } else {
            log::debug!("Asset {} already scheduled", job.relative_path);
        }
    }

    jobs
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetCounts {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of one coordinator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Images and board snapshots
    pub images: AssetCounts,
    /// Attachments
    pub files: AssetCounts,
}

impl AssetReport {
    pub fn downloaded(&self) -> usize {
        self.images.downloaded + self.files.downloaded
    }

    pub fn skipped(&self) -> usize {
        self.images.skipped + self.files.skipped
    }

    pub fn failed(&self) -> usize {
        self.images.failed + self.files.failed
    }

    fn counts_mut(&mut self, kind: AssetKind) -> &mut AssetCounts {
        match kind {
            AssetKind::File => &mut self.files,
            AssetKind::Image | AssetKind::Board => &mut self.images,
        }
    }
}

type TaskOutcome = (AssetJob, Result<(), AppError>);

/// Fetches a document's assets into the output directory.
pub struct AssetCoordinator {
    repository: Arc<dyn DocumentRepository>,
    limiter: Arc<RateLimiter>,
    output_dir: PathBuf,
    permits: Arc<Semaphore>,
}

impl AssetCoordinator {
    /// `concurrency` of `None` derives a default from the CPU count.
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        limiter: Arc<RateLimiter>,
        output_dir: impl Into<PathBuf>,
        concurrency: Option<usize>,
    ) -> Self {
        let concurrency = concurrency
            .unwrap_or_else(Self::default_concurrency)
            .max(1);
        Self {
            repository,
            limiter,
            output_dir: output_dir.into(),
            permits: Arc::new(Semaphore::new(concurrency)),
        }
    }

    pub fn default_concurrency() -> usize {
        num_cpus::get().clamp(MIN_DOWNLOAD_CONCURRENCY, MAX_DOWNLOAD_CONCURRENCY)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Downloads every asset referenced by `blocks` that is not already on
    /// disk, and waits for all of them.
    pub async fn download_assets(&self, blocks: &[Block]) -> AssetReport {
        let mut report = AssetReport::default();
        let mut images: JoinSet<TaskOutcome> = JoinSet::new();
        let mut files: JoinSet<TaskOutcome> = JoinSet::new();

        for job in collect_asset_jobs(blocks) {
            let dest = resolve_relative(&self.output_dir, &job.relative_path);
            match tokio::fs::try_exists(&dest).await {
                Ok(true) => {
                    log::debug!("{} already exists, skipping", dest.display());
                    report.counts_mut(job.kind).skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => log::warn!("Could not check {}: {}", dest.display(), e),
            }

            let set = match job.kind {
                AssetKind::File => &mut files,
                AssetKind::Image | AssetKind::Board => &mut images,
            };
            let repository = Arc::clone(&self.repository);
            let limiter = Arc::clone(&self.limiter);
            let permits = Arc::clone(&self.permits);

            set.spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        let err = AppError::InternalError {
                            message: format!("Download semaphore closed: {}", e),
                            source: None,
                        };
                        return (job, Err(err));
                    }
                };
                let result = limiter
                    .execute(|| fetch_asset(repository.as_ref(), &job, &dest))
                    .await;
                (job, result)
            });
        }

        drain(&mut images, &mut report).await;
        drain(&mut files, &mut report).await;

        log::info!(
            "Assets: {} downloaded, {} already present, {} failed",
            report.downloaded(),
            report.skipped(),
            report.failed()
        );
        report
    }
}

async fn fetch_asset(
    repository: &dyn DocumentRepository,
    job: &AssetJob,
    dest: &Path,
) -> Result<(), AppError> {
    match job.kind {
        AssetKind::Board => repository.export_board(&job.token, dest).await,
        AssetKind::Image | AssetKind::File => repository.download_file(&job.token, dest).await,
    }
}

async fn drain(set: &mut JoinSet<TaskOutcome>, report: &mut AssetReport) {
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((job, Ok(()))) => {
                log::debug!("Downloaded {} {}", job.kind, job.relative_path);
                report.counts_mut(job.kind).downloaded += 1;
            }
            Ok((job, Err(e))) => {
                log::warn!("Failed to download {} {}: {}", job.kind, job.token, e);
                report.counts_mut(job.kind).failed += 1;
            }
            Err(e) => {
                log::error!("Asset download task failed to complete: {}", e);
                // The kind is lost with the task; count it against images.
                report.images.failed += 1;
            }
        }
    }
}
