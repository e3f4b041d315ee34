//! # HTTP Vendor Adapter
//!
//! Production [`VendorClient`] over the vendor's REST API. Wraps a
//! `reqwest::Client` with the vendor base URL, bearer authentication,
//! and a per-request timeout. Retries are NOT built in — the vendor
//! side redelivers its callback, and operators re-dispatch manually if
//! an order never left the building.

use std::time::Duration;

use serde::Serialize;

use crate::order::TranslationOrder;
use crate::vendor::{VendorClient, VendorError};

/// Configuration for the HTTP vendor adapter.
#[derive(Debug, Clone)]
pub struct VendorConfig {
    /// Base URL of the vendor API (e.g. `https://translate.example.com/api/v2`).
    pub base_url: String,
    /// Bearer token for vendor authentication.
    pub api_key: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl VendorConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }
}

/// HTTP client for the translation vendor.
#[derive(Debug)]
pub struct HttpVendorClient {
    client: reqwest::Client,
    base_url: String,
}

/// Wire format of an outbound order.
#[derive(Serialize)]
struct DispatchRequest {
    order_id: String,
    entity_id: String,
    source_language: String,
    target_languages: Vec<String>,
    subscriber_contact: String,
}

impl DispatchRequest {
    fn from_order(order: &TranslationOrder) -> Self {
        Self {
            order_id: order.id.as_uuid().to_string(),
            entity_id: order.entity_id.as_uuid().to_string(),
            source_language: order.source_language.to_string(),
            target_languages: order
                .target_languages
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
            subscriber_contact: order.subscriber_contact.clone(),
        }
    }
}

impl HttpVendorClient {
    /// Build the adapter from configuration.
    pub fn new(config: VendorConfig) -> Result<Self, VendorError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| VendorError::Rejected {
                reason: "invalid API key characters".to_string(),
            })?;
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| VendorError::Unreachable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

impl VendorClient for HttpVendorClient {
    async fn dispatch_order(&self, order: &TranslationOrder) -> Result<(), VendorError> {
        let url = format!("{}/orders", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&DispatchRequest::from_order(order))
            .send()
            .await
            .map_err(|e| VendorError::Unreachable {
                reason: format!("POST {url}: {e}"),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(VendorError::Rejected {
                reason: format!("POST {url}: HTTP {status}: {excerpt}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            HttpVendorClient::new(VendorConfig::new("https://translate.example.com/api/", "key"))
                .unwrap();
        assert_eq!(client.base_url, "https://translate.example.com/api");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = HttpVendorClient::new(VendorConfig::new("https://x", "bad\nkey"));
        assert!(matches!(result, Err(VendorError::Rejected { .. })));
    }
}
