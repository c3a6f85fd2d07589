// src/api/client.rs
//! HTTP client for the docx open API.
//!
//! Handles tenant-token authentication, the JSON endpoints (document
//! metadata and paginated block listing) and the two binary endpoints
//! (media download and board export). JSON calls pass through the shared
//! [`RateLimiter`]; binary downloads are throttled by their caller.

use super::parser::{
    parse_block_page, parse_document_info, parse_download_error, parse_tenant_token,
    rate_limit_error,
};
use super::rate_limiter::RateLimiter;
use super::DocumentRepository;
use crate::constants::{
    API_REQUEST_TIMEOUT, BLOCKS_PAGE_SIZE, DOWNLOAD_TIMEOUT, MAX_BLOCK_PAGES,
    TOKEN_REFRESH_MARGIN,
};
use crate::error::AppError;
use crate::model::{DocumentContent, DocumentInfo};
use crate::types::{AppCredentials, DocumentId};
use indexmap::IndexMap;
use parking_lot::Mutex;
use reqwest::{header, Client, Response, StatusCode};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TENANT_TOKEN_PATH: &str = "open-apis/auth/v3/tenant_access_token/internal";

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Document API client authenticated as an internal app.
pub struct FeishuHttpClient {
    client: Client,
    base_url: String,
    credentials: AppCredentials,
    token: Mutex<Option<CachedToken>>,
    limiter: Arc<RateLimiter>,
}

impl FeishuHttpClient {
    /// Creates a client for `base_url` (e.g. `https://open.feishu.cn`).
    pub fn new(
        base_url: &str,
        credentials: AppCredentials,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, AppError> {
        let base = url::Url::parse(base_url).map_err(|e| {
            AppError::MissingConfiguration(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;

        let client = Client::builder()
            .default_headers(Self::create_headers())
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
            limiter,
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns a valid tenant access token, fetching a new one when the
    /// cached token is missing or about to expire.
    async fn tenant_token(&self) -> Result<String, AppError> {
        let cached = self.token.lock().clone();
        if let Some(cached) = cached {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.value);
            }
        }

        log::debug!("Requesting tenant access token for {}", self.credentials);
        let body = serde_json::json!({
            "app_id": self.credentials.app_id(),
            "app_secret": self.credentials.app_secret(),
        });
        let body = &body;
        let (value, expire) = self
            .limiter
            .execute(|| async move {
                let response = self
                    .client
                    .post(self.url(TENANT_TOKEN_PATH))
                    .timeout(API_REQUEST_TIMEOUT)
                    .json(body)
                    .send()
                    .await?;
                parse_tenant_token(extract_response_text(response).await?)
            })
            .await?;

        let lifetime = Duration::from_secs(expire).saturating_sub(TOKEN_REFRESH_MARGIN);
        *self.token.lock() = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    fn invalidate_token(&self) {
        *self.token.lock() = None;
    }

    /// Makes an authenticated, rate-limited GET request and returns the body.
    ///
    /// A rate-limited answer (HTTP 429 or the frequency-limit code) is resent
    /// by the limiter; any other answer is returned for the caller to parse.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<String>, AppError> {
        let token = self.tenant_token().await?;
        let url = self.url(path);
        log::debug!("GET {}", url);

        let (url, token) = (&url, &token);
        self.limiter
            .execute(|| async move {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(token)
                    .query(query)
                    .timeout(API_REQUEST_TIMEOUT)
                    .send()
                    .await?;
                let result = extract_response_text(response).await?;
                match rate_limit_error(&result) {
                    Some(err) => Err(err),
                    None => Ok(result),
                }
            })
            .await
    }

    /// Downloads a binary endpoint into `dest` via a sibling `.part` file.
    async fn download_to(&self, path: &str, dest: &Path) -> Result<(), AppError> {
        let token = self.tenant_token().await?;
        let url = self.url(path);
        log::debug!("Downloading {} -> {}", url, dest.display());

        let response = self.client.get(&url).bearer_auth(&token).send().await?;
        if !response.status().is_success() {
            let err = parse_download_error(extract_response_text(response).await?);
            if matches!(err, AppError::Authentication(_)) {
                self.invalidate_token();
            }
            return Err(err);
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let partial = dest.with_extension(match dest.extension() {
            Some(ext) => format!("{}.part", ext.to_string_lossy()),
            None => "part".to_string(),
        });
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, dest).await?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), dest.display());
        Ok(())
    }

    fn checked<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(AppError::Authentication(_)) = &result {
            self.invalidate_token();
        }
        result
    }
}

#[async_trait::async_trait]
impl DocumentRepository for FeishuHttpClient {
    async fn get_document_info(&self, id: &DocumentId) -> Result<DocumentInfo, AppError> {
        let path = format!("open-apis/docx/v1/documents/{}", id);
        let result = self.get(&path, &[]).await?;
        self.checked(parse_document_info(result))
    }

    async fn get_document_raw_content(&self, id: &DocumentId) -> Result<DocumentContent, AppError> {
        let document = self.get_document_info(id).await?;
        let path = format!("open-apis/docx/v1/documents/{}/blocks", id);

        let mut blocks = IndexMap::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_BLOCK_PAGES {
            let mut query = vec![
                ("page_size", BLOCKS_PAGE_SIZE.to_string()),
                ("document_revision_id", "-1".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }

            let result = self.get(&path, &query).await?;
            let (items, next) = self.checked(parse_block_page(result))?;
            log::debug!("Block page {} of {}: {} block(s)", page, id, items.len());

            for block in items {
                let block_id = block.id().clone();
                if blocks.contains_key(&block_id) {
                    log::warn!("Duplicate block {} in listing; keeping the first", block_id);
                    continue;
                }
                blocks.insert(block_id, block);
            }

            match next {
                Some(token) => page_token = Some(token),
                None => {
                    log::info!("Fetched {} block(s) for document {}", blocks.len(), id);
                    return Ok(DocumentContent { document, blocks });
                }
            }
        }

        Err(AppError::MalformedResponse(format!(
            "Block listing for {} did not finish within {} pages",
            id, MAX_BLOCK_PAGES
        )))
    }

    async fn download_file(&self, token: &str, dest: &Path) -> Result<(), AppError> {
        let path = format!(
            "open-apis/drive/v1/medias/{}/download",
            urlencoding::encode(token)
        );
        self.download_to(&path, dest).await
    }

    async fn export_board(&self, token: &str, dest: &Path) -> Result<(), AppError> {
        let path = format!(
            "open-apis/board/v1/whiteboards/{}/download_as_image",
            urlencoding::encode(token)
        );
        self.download_to(&path, dest).await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
    /// From `Retry-After` or the gateway's `x-ogw-ratelimit-reset` header.
    pub retry_after: Option<Duration>,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let retry_after = retry_after(response.headers());
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
        retry_after,
    })
}

fn retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    [header::RETRY_AFTER.as_str(), "x-ogw-ratelimit-reset"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Result<FeishuHttpClient, AppError> {
        FeishuHttpClient::new(
            base,
            AppCredentials::new_unchecked("cli_test", "secret"),
            Arc::new(RateLimiter::new(3).unwrap()),
        )
    }

    #[test]
    fn test_url_joining() {
        let client = client("https://open.feishu.cn/").unwrap();
        assert_eq!(
            client.url("/open-apis/docx/v1/documents/abc"),
            "https://open.feishu.cn/open-apis/docx/v1/documents/abc"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            client("not a url"),
            Err(AppError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn test_retry_after_headers() {
        let mut headers = header::HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert("x-ogw-ratelimit-reset", header::HeaderValue::from_static("4"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(4)));

        headers.insert(header::RETRY_AFTER, header::HeaderValue::from_static("2"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));
    }
}
