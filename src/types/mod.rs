use thiserror::Error;

mod colors;
mod domain_types;
mod ids;

pub use colors::*;
pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid document ID format: {0}")]
    InvalidId(String),

    #[error("Invalid palette color index: {0}")]
    InvalidColor(u8),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: u64, min: u64, max: u64 },

    #[error("Invalid app credentials: {reason}")]
    InvalidCredentials { reason: String },

    #[error("Invalid stylesheet mode: {0} (expected 'inline' or 'external')")]
    InvalidStylesheetMode(String),
}
