// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Internal-app credentials exchanged for a tenant access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
    app_id: String,
    app_secret: String,
}

impl AppCredentials {
    /// Create credentials with validation
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let app_id = app_id.into().trim().to_string();
        let app_secret = app_secret.into().trim().to_string();

        if app_id.is_empty() {
            return Err(ValidationError::InvalidCredentials {
                reason: "app id cannot be empty".to_string(),
            });
        }
        if app_secret.is_empty() {
            return Err(ValidationError::InvalidCredentials {
                reason: "app secret cannot be empty".to_string(),
            });
        }
        if !app_id.starts_with("cli_") {
            return Err(ValidationError::InvalidCredentials {
                reason: "app id must start with 'cli_'".to_string(),
            });
        }

        Ok(Self { app_id, app_secret })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    /// Create credentials without validation (only for testing)
    #[cfg(test)]
    pub fn new_unchecked(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.app_id)
    }
}

/// A hyperlink target that is safe to place in an `href`.
///
/// The document API delivers link URLs percent-encoded; the target is
/// decoded first and only `http`, `https` and `mailto` schemes are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget(Url);

impl LinkTarget {
    const ALLOWED_SCHEMES: &'static [&'static str] = &["http", "https", "mailto"];

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let decoded = urlencoding::decode(raw.trim()).map_err(|e| ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        let parsed = Url::parse(&decoded).map_err(|e| ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if !Self::ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(ValidationError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self(parsed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Serialize for LinkTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LinkTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LinkTarget::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The final output of the render stage: a complete HTML document.
#[derive(Debug, Clone)]
pub struct RenderedHtml(String);

impl RenderedHtml {
    pub fn new(content: String) -> Self {
        Self(content)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RenderedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
