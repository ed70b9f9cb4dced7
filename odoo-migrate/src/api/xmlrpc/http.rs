//! XML-RPC over HTTP using reqwest

use async_trait::async_trait;
use serde_json::Value;

use super::{Endpoint, RpcError, RpcTransport, decode_response, encode_call};

/// Posts XML-RPC documents to `{base_url}/xmlrpc/2/{common,object}`
///
/// No timeout is configured here; reqwest's defaults apply.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, endpoint: Endpoint, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let url = self.endpoint_url(endpoint);
        let body = encode_call(method, &params)?;

        log::debug!("XML-RPC {} -> {}", method, url);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RpcError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_response(&text)
    }
}
