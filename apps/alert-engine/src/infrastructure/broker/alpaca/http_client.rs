//! HTTP client wrapper for the Alpaca trading API.
//!
//! Every call is a single attempt. Status codes are categorized into
//! [`AlpacaError`] variants and the caller decides what to do with them.

use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::AlpacaErrorResponse;
use super::config::AlpacaConfig;
use super::error::AlpacaError;

/// HTTP client for the Alpaca trading API.
#[derive(Debug, Clone)]
pub struct AlpacaHttpClient {
    client: Client,
    api_key: String,
    api_secret: String,
    trading_base_url: Url,
}

impl AlpacaHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(AlpacaError::AuthenticationFailed);
        }

        let trading_base_url = Url::parse(config.trading_base_url())
            .map_err(|e| AlpacaError::Network(format!("invalid trading base URL: {e}")))?;
        if trading_base_url.cannot_be_a_base() {
            return Err(AlpacaError::Network(format!(
                "invalid trading base URL: {trading_base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AlpacaError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            trading_base_url,
        })
    }

    /// Make a GET request to the trading API.
    ///
    /// Each entry of `segments` becomes one percent-encoded path segment, so a
    /// `/` inside an id stays inside that segment.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AlpacaError> {
        self.get_with_query(segments, &[]).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, AlpacaError> {
        self.request(Method::GET, segments, query, None::<&()>).await
    }

    /// Make a POST request to the trading API.
    #[allow(clippy::future_not_send)]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AlpacaError> {
        self.request(Method::POST, segments, &[], Some(body)).await
    }

    /// Make a DELETE request to the trading API.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), AlpacaError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, segments, &[], None::<&()>)
            .await?;
        Ok(())
    }

    /// Build the request URL from encoded path segments and query pairs.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.trading_base_url.clone();
        // Checked in `new`: the base URL can carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    #[allow(clippy::future_not_send)]
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, AlpacaError> {
        let url = self.endpoint(segments, query);
        let path = url.path().to_string();

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.api_secret);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %method, path = %path, error = %e, "Alpaca request failed");
            AlpacaError::Network(e.to_string())
        })?;

        let status = response.status();

        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| AlpacaError::Network(e.to_string()))?;
            if text.is_empty() {
                return serde_json::from_str("null")
                    .map_err(|e| AlpacaError::JsonParse(e.to_string()));
            }
            return serde_json::from_str(&text).map_err(|e| AlpacaError::JsonParse(e.to_string()));
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let error_body = response.text().await.unwrap_or_default();

        let (error_code, error_message) =
            match serde_json::from_str::<AlpacaErrorResponse>(&error_body) {
                Ok(err) => (
                    err.code_text()
                        .unwrap_or_else(|| status.as_u16().to_string()),
                    err.message,
                ),
                Err(_) => (status.as_u16().to_string(), error_body),
            };

        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            code = %error_code,
            message = %error_message,
            "Alpaca returned an error"
        );

        Err(categorize_status(
            status,
            segments.last().copied().unwrap_or_default(),
            error_code,
            error_message,
            retry_after,
        ))
    }
}

/// Map a failed response to an [`AlpacaError`]. `resource` is the last
/// path segment of the request, the order id for order lookups.
fn categorize_status(
    status: StatusCode,
    resource: &str,
    code: String,
    message: String,
    retry_after: Option<u64>,
) -> AlpacaError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => AlpacaError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(60),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AlpacaError::AuthenticationFailed,
        StatusCode::NOT_FOUND => AlpacaError::OrderNotFound {
            order_id: resource.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY => AlpacaError::OrderRejected(message),
        s if s.is_server_error() => AlpacaError::Unavailable {
            status: s.as_u16(),
            message,
        },
        _ => AlpacaError::Api { code, message },
    }
}
