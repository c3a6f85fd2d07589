// src/output/writer.rs
//! The only place export files are written.

use super::types::{FailedWrite, OutputPlan, OutputReport, PlannedFile, WrittenFile};
use crate::error::AppError;

/// Writes every planned file, creating parent directories as needed.
pub async fn deliver(plan: OutputPlan) -> OutputReport {
    let mut report = OutputReport::default();

    for file in plan.files {
        match write_file(&file).await {
            Ok(()) => report.written.push(WrittenFile {
                bytes: file.content.len(),
                path: file.path,
            }),
            Err(e) => {
                log::error!("Failed to write {}: {}", file.path.display(), e);
                report.failed.push(FailedWrite {
                    path: file.path,
                    error: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Wrote {} file(s), {} byte(s); {} failed",
        report.written.len(),
        report.bytes_written(),
        report.failed.len()
    );
    report
}

async fn write_file(file: &PlannedFile) -> Result<(), AppError> {
    if let Some(parent) = file.path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&file.path, &file.content).await?;
    log::debug!("Wrote {}", file.path.display());
    Ok(())
}
