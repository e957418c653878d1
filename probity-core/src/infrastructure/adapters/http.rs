// probity-core/src/infrastructure/adapters/http.rs

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::payload::{HttpRequest, HttpResponse, HttpVerb};
use crate::error::ProbityError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::http::HttpClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed client. Certificate checking is per request, so one client
/// of each kind is kept.
pub struct ReqwestClient {
    verifying: Client,
    permissive: Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, InfrastructureError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, InfrastructureError> {
        Ok(Self {
            verifying: Client::builder().timeout(timeout).build()?,
            permissive: Client::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(true)
                .build()?,
        })
    }
}

fn method(verb: HttpVerb) -> Method {
    match verb {
        HttpVerb::Get => Method::GET,
        HttpVerb::Post => Method::POST,
        HttpVerb::Put => Method::PUT,
        HttpVerb::Patch => Method::PATCH,
        HttpVerb::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ProbityError> {
        let client = if request.verify_ssl {
            &self.verifying
        } else {
            &self.permissive
        };

        let mut builder = client.request(method(request.verb), &request.endpoint);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query_parameters.is_empty() {
            builder = builder.query(&request.query_parameters);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(InfrastructureError::from)?;

        let status = response.status();
        let url = response.url().to_string();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = response.text().await.map_err(InfrastructureError::from)?;

        debug!(status = status.as_u16(), url = %url, bytes = text.len(), "Response received");

        Ok(HttpResponse {
            status_code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            url,
            headers,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() -> Result<()> {
        let client = ReqwestClient::with_timeout(Duration::from_secs(2))?;
        let request = HttpRequest {
            verb: HttpVerb::Get,
            endpoint: "http://127.0.0.1:1/health".into(),
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
            body: None,
            verify_ssl: true,
        };
        assert!(client.send(&request).await.is_err());
        Ok(())
    }
}
