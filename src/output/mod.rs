// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Path derivation and planning are pure functions; only [`deliver`]
//! touches the filesystem.

mod paths;
mod plan;
mod types;
mod writer;

pub use paths::{
    blocks_dump_file_name, file_relative_path, AttachmentPaths, html_file_name, image_relative_path,
    resolve_relative, sanitize_filename,
};
pub use plan::plan_document_output;
pub use types::{FailedWrite, OutputPlan, OutputReport, PlannedFile, WrittenFile};
pub use writer::deliver;
