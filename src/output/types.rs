// src/output/types.rs
//! What one export writes and how the writing went.

use std::path::PathBuf;

/// Files an export writes, in order.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub files: Vec<PlannedFile>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: PathBuf, content: String) -> Self {
        self.files.push(PlannedFile { path, content });
        self
    }

    /// Path of the first HTML file in the plan.
    pub fn html_path(&self) -> Option<&PathBuf> {
        self.files
            .iter()
            .map(|file| &file.path)
            .find(|path| path.extension().is_some_and(|ext| ext == "html"))
    }
}

#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct FailedWrite {
    pub path: PathBuf,
    pub error: String,
}

impl std::fmt::Display for FailedWrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Outcome of [`super::deliver`]. A failed write does not stop later ones.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub written: Vec<WrittenFile>,
    pub failed: Vec<FailedWrite>,
}

impl OutputReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn bytes_written(&self) -> usize {
        self.written.iter().map(|file| file.bytes).sum()
    }
}
