//! Thin JSON transport over reqwest.
//!
//! Remote failures are surfaced immediately; there is no retry policy.

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A single error entry as reported by the remote service.
#[derive(Debug, Deserialize)]
struct ServiceError {
    message: String,
    #[serde(rename = "errorCode")]
    error_code: String,
}

/// JSON client for the packaging service endpoints.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a bearer-authenticated GET and deserializes the JSON response.
    #[tracing::instrument(skip(self, token))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let request = self.client.get(url).bearer_auth(token).query(query);
        Self::send_json(request).await
    }

    /// Posts form-encoded parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, params))]
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        debug!("POST form to {}...", url);

        let request = self.client.post(url).form(params);
        Self::send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Server returned status {}: {}",
                status,
                describe_error(&body),
            ));
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }
}

/// Extracts the service's error message from a response body.
///
/// Failures arrive as a JSON array of `{message, errorCode}` entries;
/// anything else is passed through verbatim.
fn describe_error(body: &str) -> String {
    match serde_json::from_str::<Vec<ServiceError>>(body) {
        Ok(errors) if !errors.is_empty() => errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.error_code))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.to_string(),
    }
}
