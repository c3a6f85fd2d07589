// src/api/parser.rs
//! Envelope parsing: turns raw HTTP responses into typed payloads or
//! classified [`AppError`]s.

use super::adapter::{convert_block, convert_document};
use super::client::ApiResponse;
use super::responses::{BlockPage, DocumentData, Envelope, TenantTokenResponse};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::AppError;
use crate::model::{Block, DocumentInfo};
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};

/// Parse a `{code, msg, data}` response and return its `data`.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let status = result.status.as_u16();
    let envelope: Envelope<T> = match serde_json::from_str(&result.data) {
        Ok(envelope) => envelope,
        Err(e) if result.status.is_success() => {
            log::error!("Failed to parse response from {}: {}", result.url, e);
            return Err(AppError::MalformedResponse(format!(
                "{} (body: {})",
                e,
                preview(&result.data)
            )));
        }
        Err(_) => {
            return Err(AppError::from_api_response(
                -1,
                status,
                format!("HTTP {} from {}: {}", status, result.url, preview(&result.data)),
                result.retry_after,
            ));
        }
    };

    if envelope.code != 0 || !result.status.is_success() {
        return Err(AppError::from_api_response(
            envelope.code,
            status,
            envelope.msg,
            result.retry_after,
        ));
    }

    envelope.data.ok_or_else(|| {
        AppError::MalformedResponse(format!("Response from {} has no data", result.url))
    })
}

/// Returns the rate-limit error a response carries, if any.
///
/// Looks at the HTTP status and the envelope `code` only, so the limiter can
/// back off and resend a request before its payload is parsed.
pub fn rate_limit_error(result: &ApiResponse<String>) -> Option<AppError> {
    if result.status == StatusCode::TOO_MANY_REQUESTS {
        return Some(AppError::RateLimited {
            retry_after: result.retry_after,
        });
    }

    let envelope: Envelope<IgnoredAny> = serde_json::from_str(&result.data).ok()?;
    if envelope.code == 0 {
        return None;
    }
    let err = AppError::from_api_response(
        envelope.code,
        result.status.as_u16(),
        envelope.msg,
        result.retry_after,
    );
    err.is_rate_limited().then_some(err)
}

/// Parse the token endpoint, returning the token and its lifetime in seconds.
pub fn parse_tenant_token(result: ApiResponse<String>) -> Result<(String, u64), AppError> {
    let status = result.status.as_u16();
    let response: TenantTokenResponse = serde_json::from_str(&result.data).map_err(|e| {
        if result.status.is_success() {
            AppError::MalformedResponse(e.to_string())
        } else {
            AppError::from_api_response(-1, status, preview(&result.data), result.retry_after)
        }
    })?;

    if response.code != 0 {
        // The token endpoint reports rejected credentials with its own codes.
        let err = AppError::from_api_response(response.code, status, &response.msg, result.retry_after);
        return Err(match err {
            AppError::Api { code, message, .. } => {
                AppError::Authentication(format!("code {}: {}", code, message))
            }
            other => other,
        });
    }

    let token = response
        .tenant_access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::MalformedResponse("Token response has no token".to_string()))?;
    Ok((token, response.expire))
}

pub fn parse_document_info(result: ApiResponse<String>) -> Result<DocumentInfo, AppError> {
    let data: DocumentData = parse_api_response(result)?;
    convert_document(data.document)
}

/// Parse one page of the block listing.
///
/// Returns the converted blocks and the token of the next page, if any.
pub fn parse_block_page(
    result: ApiResponse<String>,
) -> Result<(Vec<Block>, Option<String>), AppError> {
    let page: BlockPage = parse_api_response(result)?;
    let blocks = page
        .items
        .into_iter()
        .map(convert_block)
        .collect::<Result<Vec<_>, _>>()?;
    let next = if page.has_more {
        page.page_token.filter(|t| !t.is_empty())
    } else {
        None
    };
    Ok((blocks, next))
}

/// Parse the error body of a failed binary download.
pub fn parse_download_error(result: ApiResponse<String>) -> AppError {
    match parse_api_response::<serde_json::Value>(result) {
        Err(e) => e,
        Ok(_) => AppError::MalformedResponse("Download failed without an error body".to_string()),
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn response(status: u16, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            url: "https://open.feishu.cn/test".to_string(),
            retry_after: None,
        }
    }

    #[test]
    fn test_success_envelope_yields_data() {
        let info = parse_document_info(response(
            200,
            r#"{"code":0,"msg":"success","data":{"document":{"document_id":"doxAbc","revision_id":7,"title":"Plan"}}}"#,
        ))
        .unwrap();

        assert_eq!(info.document_id.as_str(), "doxAbc");
        assert_eq!(info.revision_id, 7);
        assert_eq!(info.title, "Plan");
    }

    #[test]
    fn test_error_codes_are_classified() {
        let err = parse_document_info(response(
            403,
            r#"{"code":1770032,"msg":"forbidden"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, AppError::InsufficientPermission(_)));

        let err = parse_document_info(response(400, r#"{"code":99991400,"msg":"limit"}"#))
            .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_http_429_without_json_is_rate_limited() {
        let mut result = response(429, "Too Many Requests");
        result.retry_after = Some(Duration::from_secs(3));

        let err = parse_api_response::<serde_json::Value>(result).unwrap_err();
        assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_rate_limit_is_read_from_status_or_code() {
        let mut limited = response(400, r#"{"code":99991400,"msg":"request trigger frequency limit"}"#);
        limited.retry_after = Some(Duration::from_secs(2));
        let err = rate_limit_error(&limited).unwrap();
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));

        assert!(rate_limit_error(&response(429, "busy")).is_some());
        assert!(rate_limit_error(&response(403, r#"{"code":1770032,"msg":"forbidden"}"#)).is_none());
        assert!(rate_limit_error(&response(200, r#"{"code":0,"data":{}}"#)).is_none());
        assert!(rate_limit_error(&response(502, "<html>bad gateway</html>")).is_none());
    }

    #[test]
    fn test_malformed_success_body() {
        let err = parse_document_info(response(200, "<html>oops</html>")).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_block_page_pagination_token() {
        let (blocks, next) = parse_block_page(response(
            200,
            r#"{"code":0,"data":{"items":[{"block_id":"doxAbc","block_type":1,"page":{}}],"has_more":true,"page_token":"p2"}}"#,
        ))
        .unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(next.as_deref(), Some("p2"));

        let (_, next) = parse_block_page(response(
            200,
            r#"{"code":0,"data":{"items":[],"has_more":false,"page_token":"stale"}}"#,
        ))
        .unwrap();
        assert_eq!(next, None);
    }

    #[test]
    fn test_tenant_token() {
        let (token, expire) = parse_tenant_token(response(
            200,
            r#"{"code":0,"msg":"ok","tenant_access_token":"t-123","expire":7200}"#,
        ))
        .unwrap();
        assert_eq!(token, "t-123");
        assert_eq!(expire, 7200);

        let err = parse_tenant_token(response(200, r#"{"code":10014,"msg":"app secret invalid"}"#))
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }
}
