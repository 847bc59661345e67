//! Vultr HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::providers::common::json_body;
use crate::traits::{ErrorContext, ProviderErrorMapper};

use super::VultrProvider;

impl VultrProvider {
    pub(crate) async fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<String> {
        let url = format!("{}{path}", self.api_base);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key);

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(json_body(self.provider_name(), body)?);
        }

        let response = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            method.as_str(),
            &url,
            self.max_retries,
        )
        .await?;

        HttpUtils::ensure_success(self, response, ctx)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let body = self.request::<()>(Method::GET, path, None, ctx).await?;
        HttpUtils::parse_json(&body, self.provider_name())
    }
}
