//! Shared HTTP request handling for the REST providers.
//!
//! Every provider builds its own `RequestBuilder` (auth header, URL, body) and
//! hands it to [`HttpUtils`], which sends it, logs it, classifies transport
//! failures and retries the transient ones.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Send one request and read the response body.
    ///
    /// Transport timeouts become [`ProviderError::Timeout`], other transport
    /// failures and HTTP 502-504 become [`ProviderError::NetworkError`], and
    /// HTTP 429 becomes [`ProviderError::RateLimited`]. Any other status is
    /// returned to the caller for provider-specific mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<HttpResponse, ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: format!("Timed out reading response body: {e}"),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!("[{provider_name}] Response Body: {}", truncate_for_log(&body));

        Ok(HttpResponse { status, body })
    }

    /// [`execute_request`](Self::execute_request) with retries for transient failures.
    ///
    /// Backoff is 100ms, 200ms, 400ms, ... capped at 10s; a `Retry-After` hint
    /// is honoured up to 30s. Business errors are returned immediately.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<HttpResponse, ProviderError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, provider_name, method_name, url).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, provider_name, method_name, url)
                    .await;
            };

            match Self::execute_request(req, provider_name, method_name, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] {} {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        method_name,
                        url,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }

    /// Turn a non-2xx response into the provider's mapped error.
    ///
    /// The HTTP status becomes the raw error code; the message is pulled from
    /// the usual JSON error fields, falling back to the raw body.
    pub fn ensure_success<M: ProviderErrorMapper>(
        mapper: &M,
        response: HttpResponse,
        context: ErrorContext,
    ) -> Result<String, ProviderError> {
        if response.is_success() {
            return Ok(response.body);
        }
        let message = extract_error_message(&response.body)
            .unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.body.trim()));
        let err = mapper.map_error(
            RawApiError::with_code(response.status.to_string(), message),
            context,
        );
        if err.is_expected() {
            log::warn!("{err}");
        } else {
            log::error!("{err}");
        }
        Err(err)
    }

    /// Parse JSON response
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// Pick the human-readable message out of a JSON error body.
///
/// Covers the shapes used by the supported APIs: `{"error": "..."}`,
/// `{"detail": "..."}`, `{"message": "..."}` and `{"error": {"message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.get("error").and_then(|e| e.as_str()),
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str()),
        value.get("detail").and_then(|d| d.as_str()),
        value.get("message").and_then(|m| m.as_str()),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Network errors, timeouts and rate limiting are worth another attempt.
fn is_retryable(error: &ProviderError) -> bool {
    matches!(
        error,
        ProviderError::NetworkError { .. }
            | ProviderError::Timeout { .. }
            | ProviderError::RateLimited { .. }
    )
}

/// `Retry-After` (capped at 30s) when present, otherwise exponential backoff.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestMapper;

    impl ProviderErrorMapper for TestMapper {
        fn provider_name(&self) -> &'static str {
            "test"
        }

        fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
            match raw.code.as_deref() {
                Some("404") => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.domain_or_unknown(),
                    raw_message: Some(raw.message),
                },
                _ => self.unknown_error(raw),
            }
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    // ---- retry classification ----

    #[test]
    fn transient_errors_are_retryable() {
        assert!(is_retryable(&ProviderError::NetworkError {
            provider: "test".into(),
            detail: "reset".into(),
        }));
        assert!(is_retryable(&ProviderError::Timeout {
            provider: "test".into(),
            detail: "30s".into(),
        }));
        assert!(is_retryable(&ProviderError::RateLimited {
            provider: "test".into(),
            retry_after: None,
            raw_message: None,
        }));
    }

    #[test]
    fn business_errors_are_not_retryable() {
        assert!(!is_retryable(&ProviderError::ZoneExists {
            provider: "test".into(),
            domain: "example.com".into(),
        }));
        assert!(!is_retryable(&ProviderError::NotImplemented {
            provider: "test".into(),
            operation: "list_domains".into(),
        }));
        assert!(!is_retryable(&ProviderError::DomainNotFound {
            provider: "test".into(),
            domain: "x".into(),
            raw_message: None,
        }));
    }

    // ---- delays ----

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(40), Duration::from_millis(10_000));
    }

    #[test]
    fn retry_after_is_capped() {
        let e = ProviderError::RateLimited {
            provider: "test".into(),
            retry_after: Some(120),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(30));
    }

    // ---- status mapping ----

    #[test]
    fn success_returns_body() {
        let body = HttpUtils::ensure_success(&TestMapper, response(204, ""), ErrorContext::default());
        assert!(matches!(body, Ok(ref b) if b.is_empty()));
    }

    #[test]
    fn failure_goes_through_mapper() {
        let err = HttpUtils::ensure_success(
            &TestMapper,
            response(404, r#"{"error": "Could not find domain 'example.com.'"}"#),
            ErrorContext::domain("example.com"),
        );
        assert!(matches!(
            err,
            Err(ProviderError::DomainNotFound { ref domain, raw_message: Some(ref m), .. })
                if domain == "example.com" && m.starts_with("Could not find domain")
        ));
    }

    #[test]
    fn unknown_failure_keeps_upstream_message() {
        let err = HttpUtils::ensure_success(
            &TestMapper,
            response(500, "backend exploded"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            Err(ProviderError::Unknown { ref raw_code, ref raw_message, .. })
                if raw_code.as_deref() == Some("500") && raw_message == "HTTP 500: backend exploded"
        ));
    }

    // ---- error message extraction ----

    #[test]
    fn extract_message_shapes() {
        assert_eq!(
            extract_error_message(r#"{"error":"Conflict"}"#).as_deref(),
            Some("Conflict")
        );
        assert_eq!(
            extract_error_message(r#"{"error":{"code":"not_found","message":"zone not found"}}"#)
                .as_deref(),
            Some("zone not found")
        );
        assert_eq!(
            extract_error_message(r#"{"detail":"Not found."}"#).as_deref(),
            Some("Not found.")
        );
        assert_eq!(extract_error_message("<html>"), None);
    }

    // ---- parse_json ----

    #[test]
    fn parse_json_invalid() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo, ProviderError> = HttpUtils::parse_json("not json", "test");
        assert!(matches!(result, Err(ProviderError::ParseError { .. })));
    }
}
