use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentMarker;

/// Type aliases for specific ID types
pub type BlockId = Id<BlockMarker>;
pub type DocumentId = Id<DocumentMarker>;

/// Tokens and block ids are url-safe alphanumerics.
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("Failed to compile token regex - this is a bug")
});

/// Matches `/docx/<token>` (and the legacy `/docs/<token>`) inside a document URL.
static DOCUMENT_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(?:docx|docs)/([A-Za-z0-9_-]+)(?:[/?#]|$)")
        .expect("Failed to compile document URL regex - this is a bug")
});

impl<T> Id<T> {
    /// Parses a raw identifier, rejecting empty or non-token input.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        if !TOKEN_REGEX.is_match(trimmed) {
            return Err(ValidationError::InvalidId(format!(
                "'{}' contains characters outside [A-Za-z0-9_-]",
                trimmed
            )));
        }
        Ok(Self::from_raw(trimmed.to_string()))
    }

    /// Create an ID from a string the API already vouched for (internal use)
    pub(crate) fn from_raw(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl DocumentId {
    /// Accepts either a bare document token or a docx URL.
    ///
    /// ```ignore
    /// DocumentId::from_input("https://example.feishu.cn/docx/Abc123?from=home")
    /// ```
    pub fn from_input(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();

        if input.starts_with("http://") || input.starts_with("https://") {
            let parsed = url::Url::parse(input).map_err(|e| ValidationError::InvalidUrl {
                url: input.to_string(),
                reason: e.to_string(),
            })?;
            return DOCUMENT_URL_REGEX
                .captures(parsed.path())
                .and_then(|captures| captures.get(1))
                .map(|token| Self::from_raw(token.as_str().to_string()))
                .ok_or_else(|| {
                    ValidationError::InvalidId(format!("No document token found in URL: {}", input))
                });
        }

        Self::parse(input)
    }

    /// The root page block of a docx document shares the document's id.
    pub fn page_block_id(&self) -> BlockId {
        BlockId::from_raw(self.value.clone())
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_raw(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parsing() {
        let id = BlockId::parse("doxcnAbCdEf123").unwrap();
        assert_eq!(id.as_str(), "doxcnAbCdEf123");

        let id = BlockId::parse("  padded_id-1  ").unwrap();
        assert_eq!(id.as_str(), "padded_id-1");
    }

    #[test]
    fn test_invalid_ids() {
        assert!(BlockId::parse("").is_err());
        assert!(BlockId::parse("has space").is_err());
        assert!(BlockId::parse("slash/inside").is_err());
    }

    #[test]
    fn test_document_id_from_url() {
        let id = DocumentId::from_input("https://acme.feishu.cn/docx/Xy12AbC34dEf?from=from_copylink")
            .unwrap();
        assert_eq!(id.as_str(), "Xy12AbC34dEf");

        let id = DocumentId::from_input("https://acme.larksuite.com/docx/Xy12AbC34dEf").unwrap();
        assert_eq!(id.as_str(), "Xy12AbC34dEf");

        assert!(DocumentId::from_input("https://acme.feishu.cn/wiki/").is_err());
    }

    #[test]
    fn test_page_block_id_matches_document() {
        let id = DocumentId::from_input("Xy12AbC34dEf").unwrap();
        assert_eq!(id.page_block_id().as_str(), "Xy12AbC34dEf");
    }
}
